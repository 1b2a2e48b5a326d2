//! Harness error types.
//!
//! Every failure the core reports on purpose is one of these variants, carried
//! inside `anyhow::Error`. Tests tell them apart with `downcast_ref`.
//! Transport failures keep their own type ([`algo_transport::RpcError`]).

/// Structured errors raised by the harness core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// No wallet with the requested name exists on the wallet service.
    WalletNotFound {
        /// Name that was looked up
        name: String,
    },

    /// A dry run was requested without any transactions.
    EmptyTransactionList,

    /// A signed transaction could not be decoded.
    MalformedTransaction {
        /// Position of the transaction in the input
        index: usize,
        reason: String,
    },

    /// A state-delta entry could not be decoded.
    MalformedDelta {
        /// The raw (base64) key of the entry
        key: String,
        reason: String,
    },

    /// The node dropped the transaction from its pool.
    TransactionRejected { txid: String, reason: String },

    /// The transaction was not confirmed within the round bound.
    ConfirmationTimeout { txid: String, rounds: u64 },

    /// The dry-run service reported an error for the whole request.
    DryRunFailed { message: String },
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarnessError::WalletNotFound { name } => write!(f, "No wallet named: {}", name),
            HarnessError::EmptyTransactionList => {
                write!(f, "Dry run needs at least one signed transaction")
            }
            HarnessError::MalformedTransaction { index, reason } => {
                write!(f, "Signed transaction #{} is malformed: {}", index, reason)
            }
            HarnessError::MalformedDelta { key, reason } => {
                write!(f, "State delta entry '{}' is malformed: {}", key, reason)
            }
            HarnessError::TransactionRejected { txid, reason } => {
                write!(f, "Transaction {} rejected: {}", txid, reason)
            }
            HarnessError::ConfirmationTimeout { txid, rounds } => write!(
                f,
                "Transaction {} not confirmed after {} rounds",
                txid, rounds
            ),
            HarnessError::DryRunFailed { message } => write!(f, "Dry run failed: {}", message),
        }
    }
}

impl std::error::Error for HarnessError {}

/// Find a [`HarnessError`] anywhere in an error chain.
pub fn harness_error(err: &anyhow::Error) -> Option<&HarnessError> {
    err.chain().find_map(|e| e.downcast_ref::<HarnessError>())
}
