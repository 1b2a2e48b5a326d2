//! Wallet provisioning against the mock wallet service.

mod common;

use algo_sandbox_core::provisioner::{list_funded_accounts, WalletHandle};
use algo_sandbox_core::HarnessError;
use algo_transport::WalletApi;

use common::mocks::WALLET_ID;
use common::MockWallet;

const WALLET: &str = "unencrypted-default-wallet";

#[test]
fn test_accounts_in_listed_order() {
    let wallet = MockWallet::with_accounts(4);
    let accounts = list_funded_accounts(&wallet, WALLET, "").unwrap();
    let expected: Vec<_> = wallet.accounts.iter().map(|a| a.address()).collect();
    let actual: Vec<_> = accounts.iter().map(|a| a.address()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_handle_released_after_exports() {
    let wallet = MockWallet::with_accounts(3);
    list_funded_accounts(&wallet, WALLET, "").unwrap();

    assert_eq!(wallet.open_handles(), 0);
    assert_eq!(wallet.released(), vec!["handle-1"]);
    let calls = wallet.calls();
    assert_eq!(calls.last().map(String::as_str), Some("release"));
    assert_eq!(calls.iter().filter(|c| *c == "export").count(), 3);
}

#[test]
fn test_handle_released_when_export_fails() {
    let mut wallet = MockWallet::with_accounts(3);
    wallet.fail_export_for = Some(wallet.accounts[1].address());

    let err = list_funded_accounts(&wallet, WALLET, "").unwrap_err();
    assert!(format!("{:#}", err).contains("refused"));
    assert_eq!(wallet.open_handles(), 0);
    assert_eq!(wallet.released().len(), 1);
}

#[test]
fn test_missing_wallet() {
    let wallet = MockWallet::with_accounts(1);
    let err = list_funded_accounts(&wallet, "no-such-wallet", "").unwrap_err();
    assert_eq!(
        err.downcast_ref::<HarnessError>(),
        Some(&HarnessError::WalletNotFound {
            name: "no-such-wallet".into()
        })
    );
    assert_eq!(wallet.calls(), vec!["list_wallets"]);
}

#[test]
fn test_empty_wallet_yields_no_accounts() {
    let wallet = MockWallet::with_accounts(0);
    assert!(list_funded_accounts(&wallet, WALLET, "").unwrap().is_empty());
    assert_eq!(wallet.open_handles(), 0);
}

#[test]
fn test_guard_releases_on_panic() {
    let wallet = MockWallet::with_accounts(1);
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let handle = WalletHandle::open(&wallet, WALLET_ID, "").unwrap();
        assert_eq!(handle.list_keys().unwrap().len(), 1);
        panic!("scenario step failed");
    }));
    assert!(outcome.is_err());
    assert_eq!(wallet.open_handles(), 0);
    assert_eq!(wallet.released(), vec!["handle-1"]);
}

#[test]
fn test_each_call_gets_a_fresh_handle() {
    let wallet = MockWallet::with_accounts(2);
    list_funded_accounts(&wallet, WALLET, "").unwrap();
    list_funded_accounts(&wallet, WALLET, "").unwrap();
    assert_eq!(wallet.released(), vec!["handle-1", "handle-2"]);
    assert!(wallet.release_wallet_handle("handle-1").is_err());
}
