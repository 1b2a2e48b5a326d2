//! Funded accounts from the wallet service.
//!
//! A wallet session is held by a [`WalletHandle`] guard that releases the
//! handle token when dropped, whichever way the enclosing scope exits.

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use algo_sandbox_types::{Account, Address};
use algo_transport::WalletApi;

use crate::errors::HarnessError;

/// An open wallet session. Released on drop.
pub struct WalletHandle<'a> {
    wallet: &'a dyn WalletApi,
    token: String,
}

impl<'a> WalletHandle<'a> {
    pub fn open(wallet: &'a dyn WalletApi, wallet_id: &str, password: &str) -> Result<Self> {
        let token = wallet
            .init_wallet_handle(wallet_id, password)
            .with_context(|| format!("Failed to open wallet {}", wallet_id))?;
        debug!(wallet_id, "opened wallet handle");
        Ok(Self { wallet, token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn list_keys(&self) -> Result<Vec<Address>> {
        self.wallet.list_keys(&self.token)
    }

    /// Export the secret keys of `addresses` in parallel, preserving order.
    ///
    /// Every export has finished (or failed) before this returns.
    pub fn export_keys(&self, password: &str, addresses: &[Address]) -> Result<Vec<Vec<u8>>> {
        addresses
            .par_iter()
            .map(|address| {
                self.wallet
                    .export_key(&self.token, password, address)
                    .with_context(|| format!("Failed to export key for {}", address))
            })
            .collect()
    }
}

impl Drop for WalletHandle<'_> {
    fn drop(&mut self) {
        match self.wallet.release_wallet_handle(&self.token) {
            Ok(()) => debug!("released wallet handle"),
            Err(e) => warn!(error = %e, "failed to release wallet handle"),
        }
    }
}

/// Id of the wallet called `name`.
pub fn find_wallet_id(wallet: &dyn WalletApi, name: &str) -> Result<String> {
    let wallets = wallet.list_wallets().context("Failed to list wallets")?;
    wallets
        .into_iter()
        .find(|w| w.name == name)
        .map(|w| w.id)
        .ok_or_else(|| {
            HarnessError::WalletNotFound {
                name: name.to_string(),
            }
            .into()
        })
}

/// All accounts held by the named wallet, in the order the wallet lists them.
pub fn list_funded_accounts(
    wallet: &dyn WalletApi,
    wallet_name: &str,
    password: &str,
) -> Result<Vec<Account>> {
    let wallet_id = find_wallet_id(wallet, wallet_name)?;

    let keys = {
        let handle = WalletHandle::open(wallet, &wallet_id, password)?;
        let addresses = handle.list_keys().context("Failed to list wallet keys")?;
        handle.export_keys(password, &addresses)?
    };

    let accounts = keys
        .iter()
        .map(|key| Account::from_secret_key(key))
        .collect::<Result<Vec<_>>>()?;
    info!(wallet = wallet_name, count = accounts.len(), "loaded funded accounts");
    Ok(accounts)
}

/// A fresh random account. It holds no funds until something pays it.
pub fn generate_account() -> Account {
    let account = Account::generate();
    debug!(address = %account.address(), "generated account");
    account
}
