//! Command-line behavior of the `algo-sandbox` binary.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use algo_sandbox_core::builder::payment_txn;
use algo_sandbox_core::DryRunBuilder;
use algo_sandbox_types::Account;

use common::fixtures::{AUCTION_DELTA_JSON, HIGHEST_BIDDER_ADDRESS, OWNER_ADDRESS};
use common::MockNode;

fn algo_sandbox() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("algo-sandbox").unwrap()
}

#[test]
fn test_decode_state_prints_readable_json() {
    let temp_dir = TempDir::new().unwrap();
    let delta_path = temp_dir.path().join("delta.json");
    std::fs::write(&delta_path, AUCTION_DELTA_JSON).unwrap();

    let output = algo_sandbox()
        .arg("decode-state")
        .arg(&delta_path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["owner"], OWNER_ADDRESS);
    assert_eq!(json["highestBidder"], HIGHEST_BIDDER_ADDRESS);
    assert_eq!(json["auctionEnd"], 1654814877);
    assert_eq!(json["highestBid"], 222222);
    assert_eq!(json.as_object().unwrap().len(), 4);
}

#[test]
fn test_decode_state_from_response() {
    let temp_dir = TempDir::new().unwrap();
    let response_path = temp_dir.path().join("response.json");
    let response = format!(
        r#"{{"error": "", "protocol-version": "future", "txns": [{{"global-delta": {}}}]}}"#,
        AUCTION_DELTA_JSON
    );
    std::fs::write(&response_path, response).unwrap();

    algo_sandbox()
        .arg("decode-state")
        .arg(&response_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(OWNER_ADDRESS));

    algo_sandbox()
        .arg("decode-state")
        .arg(&response_path)
        .arg("--txn")
        .arg("3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no index 3"));
}

#[test]
fn test_decode_state_rejects_bad_action() {
    let temp_dir = TempDir::new().unwrap();
    let delta_path = temp_dir.path().join("delta.json");
    std::fs::write(
        &delta_path,
        r#"[{"key": "b3duZXI=", "value": {"action": 9, "uint": 1}}]"#,
    )
    .unwrap();

    algo_sandbox()
        .arg("decode-state")
        .arg(&delta_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("b3duZXI="));
}

#[test]
fn test_inspect_dryrun_json() {
    let temp_dir = TempDir::new().unwrap();
    let node = MockNode::new();
    let (alice, bob) = (Account::generate(), Account::generate());
    let txn = payment_txn(&node.params, alice.address(), bob.address(), 5).unwrap();
    let stx = alice.sign_transaction(txn).unwrap();

    let handle = DryRunBuilder::new(&node, temp_dir.path())
        .build_from(&[stx], "pay", None)
        .unwrap();

    let output = algo_sandbox()
        .arg("inspect-dryrun")
        .arg(handle.path())
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["latest_timestamp"], 1);
    assert_eq!(json["txns"].as_array().unwrap().len(), 1);
    assert_eq!(json["txns"][0]["type"], "pay");
    assert_eq!(json["txns"][0]["sender"], alice.address().to_string());
    assert_eq!(json["txns"][0]["fee"], 1000);
}

#[test]
fn test_inspect_dryrun_rejects_garbage() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.dr");
    std::fs::write(&path, b"not msgpack").unwrap();

    algo_sandbox()
        .arg("inspect-dryrun")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a dry-run request"));
}

#[test]
fn test_json_errors() {
    let output = algo_sandbox()
        .arg("inspect-dryrun")
        .arg("/nonexistent/app_create.dr")
        .arg("--json")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Failed to read /nonexistent/app_create.dr"));
}

#[test]
fn test_help_lists_commands() {
    algo_sandbox()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("decode-state"))
        .stdout(predicate::str::contains("inspect-dryrun"))
        .stdout(predicate::str::contains("run"));
}
