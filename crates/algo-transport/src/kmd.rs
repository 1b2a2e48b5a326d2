//! Wallet service (kmd v1) client.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use algo_sandbox_types::encoding::base64_decode;
use algo_sandbox_types::Address;

use crate::network::{ClientConfig, HttpService};
use crate::WalletApi;

const TOKEN_HEADER: &str = "X-KMD-API-Token";

/// A wallet known to the wallet service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ListWalletsResponse {
    #[serde(default)]
    wallets: Vec<WalletInfo>,
}

#[derive(Debug, Deserialize)]
struct InitHandleResponse {
    wallet_handle_token: String,
}

#[derive(Debug, Deserialize)]
struct ListKeysResponse {
    #[serde(default)]
    addresses: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExportKeyResponse {
    private_key: String,
}

/// Blocking kmd client.
#[derive(Clone)]
pub struct KmdClient {
    http: HttpService,
}

impl KmdClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpService::new("kmd", TOKEN_HEADER, config),
        }
    }
}

impl WalletApi for KmdClient {
    fn list_wallets(&self) -> Result<Vec<WalletInfo>> {
        let resp: ListWalletsResponse = self.http.get_json("/v1/wallets")?;
        Ok(resp.wallets)
    }

    fn init_wallet_handle(&self, wallet_id: &str, password: &str) -> Result<String> {
        let resp: InitHandleResponse = self.http.post_json(
            "/v1/wallet/init",
            &json!({ "wallet_id": wallet_id, "wallet_password": password }),
        )?;
        Ok(resp.wallet_handle_token)
    }

    fn list_keys(&self, handle: &str) -> Result<Vec<Address>> {
        let resp: ListKeysResponse = self
            .http
            .post_json("/v1/key/list", &json!({ "wallet_handle_token": handle }))?;
        resp.addresses.iter().map(|a| a.parse()).collect()
    }

    fn export_key(&self, handle: &str, password: &str, address: &Address) -> Result<Vec<u8>> {
        let resp: ExportKeyResponse = self.http.post_json(
            "/v1/key/export",
            &json!({
                "wallet_handle_token": handle,
                "address": address.to_string(),
                "wallet_password": password,
            }),
        )?;
        let key = base64_decode(&resp.private_key, "exported private key")?;
        if key.len() != 64 {
            return Err(anyhow!(
                "Exported key for {} has {} bytes, expected 64",
                address,
                key.len()
            ));
        }
        Ok(key)
    }

    fn release_wallet_handle(&self, handle: &str) -> Result<()> {
        let _: serde_json::Value = self
            .http
            .post_json("/v1/wallet/release", &json!({ "wallet_handle_token": handle }))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{blocking, mount_json};
    use wiremock::MockServer;

    const TOKEN: (&str, &str) = (TOKEN_HEADER, "kmd-token");

    fn client(endpoint: &str) -> KmdClient {
        KmdClient::new(&ClientConfig::new(endpoint, "kmd-token"))
    }

    #[tokio::test]
    async fn test_list_wallets() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "GET",
            "/v1/wallets",
            TOKEN,
            200,
            r#"{"wallets": [{"id": "abc", "name": "unencrypted-default-wallet", "driver_name": "sqlite"}]}"#,
        )
        .await;

        let kmd = client(&server.uri());
        let wallets = blocking(move || kmd.list_wallets()).await.unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].id, "abc");
    }

    #[tokio::test]
    async fn test_init_handle_sends_credentials() {
        let server = MockServer::start().await;
        let body = r#"{"wallet_handle_token": "h-1"}"#;
        mount_json(&server, "POST", "/v1/wallet/init", TOKEN, 200, body).await;

        let kmd = client(&server.uri());
        let handle = blocking(move || kmd.init_wallet_handle("abc", "")).await.unwrap();
        assert_eq!(handle, "h-1");

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["wallet_id"], "abc");
        assert_eq!(sent["wallet_password"], "");
    }

    #[tokio::test]
    async fn test_export_key_checks_length() {
        let server = MockServer::start().await;
        let body = r#"{"private_key": "AQID"}"#;
        mount_json(&server, "POST", "/v1/key/export", TOKEN, 200, body).await;

        let kmd = client(&server.uri());
        let err = blocking(move || kmd.export_key("h-1", "", &Address::ZERO))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expected 64"));
    }

    #[tokio::test]
    async fn test_list_keys_rejects_bad_address() {
        let server = MockServer::start().await;
        let body = r#"{"addresses": ["NOT-AN-ADDRESS"]}"#;
        mount_json(&server, "POST", "/v1/key/list", TOKEN, 200, body).await;

        let kmd = client(&server.uri());
        assert!(blocking(move || kmd.list_keys("h-1")).await.is_err());
    }
}
