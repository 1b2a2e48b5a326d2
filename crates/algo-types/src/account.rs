//! Signing accounts.
//!
//! Wallet exports hand back a 64-byte ed25519 keypair: the 32-byte seed
//! followed by the 32-byte public key. The public key half is the address.

use anyhow::{anyhow, Result};
use ed25519_dalek::{Signer, SigningKey, KEYPAIR_LENGTH};
use std::fmt;

use crate::address::Address;
use crate::transaction::{Signature, SignedTransaction, Transaction};

/// An address together with the secret key that controls it.
#[derive(Clone)]
pub struct Account {
    address: Address,
    signing_key: SigningKey,
}

impl Account {
    /// Derive an account from exported 64-byte secret key material.
    ///
    /// Fails when the input is not 64 bytes or when the trailing public key
    /// does not belong to the leading seed.
    pub fn from_secret_key(secret_key: &[u8]) -> Result<Self> {
        let keypair: &[u8; KEYPAIR_LENGTH] = secret_key.try_into().map_err(|_| {
            anyhow!(
                "Invalid secret key length: expected {} bytes, got {}",
                KEYPAIR_LENGTH,
                secret_key.len()
            )
        })?;
        let signing_key = SigningKey::from_keypair_bytes(keypair)
            .map_err(|e| anyhow!("Secret key does not match its public key: {}", e))?;
        let address = Address::from_slice(&secret_key[32..])?;
        Ok(Self {
            address,
            signing_key,
        })
    }

    /// Create a fresh random account.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        let address = Address::new(signing_key.verifying_key().to_bytes());
        Self {
            address,
            signing_key,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// 64-byte secret key (seed followed by public key).
    pub fn secret_key(&self) -> [u8; KEYPAIR_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }

    /// Sign a transaction. The transaction's sender must be this account.
    pub fn sign_transaction(&self, txn: Transaction) -> Result<SignedTransaction> {
        if txn.sender != self.address {
            return Err(anyhow!(
                "Cannot sign for {} with the key of {}",
                txn.sender,
                self.address
            ));
        }
        let signature = self.signing_key.sign(&txn.bytes_to_sign()?);
        Ok(SignedTransaction::with_sig(txn, Signature(signature.to_bytes())))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Account {}
