//! Transaction submission and confirmation polling.

use anyhow::{Context, Result};
use tracing::{debug, info};

use algo_sandbox_types::{SignedTransaction, TransactionId};
use algo_transport::{NodeApi, PendingTransaction};

use crate::errors::HarnessError;

/// Submit a signed transaction and wait up to `rounds` rounds for it.
pub fn send_transaction(
    node: &dyn NodeApi,
    signed: &SignedTransaction,
    rounds: u64,
) -> Result<PendingTransaction> {
    send_raw(node, &signed.encode()?, rounds)
}

/// Submit encoded signed bytes (one transaction or a concatenated group).
pub fn send_raw(node: &dyn NodeApi, signed: &[u8], rounds: u64) -> Result<PendingTransaction> {
    let txid = node
        .send_raw_transaction(signed)
        .context("Failed to submit transaction")?;
    debug!(%txid, "submitted transaction");
    wait_for_confirmation(node, &txid, rounds)
}

/// Poll until `txid` is confirmed, rejected, or `rounds` rounds have passed.
///
/// Rounds are counted from the one after the node's current round.
pub fn wait_for_confirmation(
    node: &dyn NodeApi,
    txid: &TransactionId,
    rounds: u64,
) -> Result<PendingTransaction> {
    let start = node
        .status()
        .context("Failed to read node status")?
        .last_round
        .saturating_add(1);
    let end = start.saturating_add(rounds);
    let mut current = start;

    while current < end {
        let pending = node.pending_transaction(txid)?;
        if pending.is_confirmed() {
            info!(%txid, round = pending.confirmed_round, "transaction confirmed");
            return Ok(pending);
        }
        if !pending.pool_error.is_empty() {
            return Err(HarnessError::TransactionRejected {
                txid: txid.to_string(),
                reason: pending.pool_error,
            }
            .into());
        }
        debug!(%txid, round = current, "waiting for confirmation");
        node.status_after_block(current)?;
        current += 1;
    }

    Err(HarnessError::ConfirmationTimeout {
        txid: txid.to_string(),
        rounds,
    }
    .into())
}
