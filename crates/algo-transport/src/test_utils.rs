//! Test utilities for the HTTP clients.
//!
//! Endpoints are served by a `wiremock` [`MockServer`]. The clients block, so
//! tests drive them through [`blocking`] to keep them off the async runtime.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answer `verb route` once with `status` and a JSON body. The call must
/// carry `token` in `token_header`; the server verifies both on drop.
pub(crate) async fn mount_json(
    server: &MockServer,
    verb: &str,
    route: &str,
    (token_header, token): (&str, &str),
    status: u16,
    body: &str,
) {
    Mock::given(method(verb))
        .and(path(route))
        .and(header(token_header, token))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "application/json"))
        .expect(1)
        .mount(server)
        .await;
}

/// Run blocking client code on the blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}
