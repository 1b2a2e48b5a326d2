//! Transaction assembly and signing.
//!
//! The `*_txn` functions are pure: they shape an unsigned [`Transaction`] from
//! explicit [`SuggestedParams`]. [`TransactionBuilder`] fetches the params from
//! the node, fills in the fee and signs.

use anyhow::{Context, Result};
use tracing::debug;

use algo_sandbox_types::{
    Account, Address, OnComplete, SignedTransaction, StateSchema, SuggestedParams, Transaction,
    TxType,
};
use algo_transport::NodeApi;

/// Compiled programs of an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPrograms {
    pub approval: Vec<u8>,
    pub clear: Vec<u8>,
}

pub fn payment_txn(
    params: &SuggestedParams,
    sender: Address,
    receiver: Address,
    amount: u64,
) -> Result<Transaction> {
    let mut txn = Transaction::with_params(TxType::Payment, sender, params);
    txn.receiver = Some(receiver);
    txn.amount = amount;
    txn.assign_fee(params)?;
    Ok(txn)
}

/// Zero-amount self payment that sends the whole remaining balance to `close_to`.
pub fn close_account_txn(
    params: &SuggestedParams,
    account: Address,
    close_to: Address,
) -> Result<Transaction> {
    let mut txn = Transaction::with_params(TxType::Payment, account, params);
    txn.receiver = Some(account);
    txn.close_remainder_to = Some(close_to);
    txn.assign_fee(params)?;
    Ok(txn)
}

/// Application-create call (app id 0, NoOp).
pub fn app_create_txn(
    params: &SuggestedParams,
    creator: Address,
    programs: &AppPrograms,
    global_schema: StateSchema,
    local_schema: StateSchema,
) -> Result<Transaction> {
    let mut txn = Transaction::with_params(TxType::ApplicationCall, creator, params);
    txn.on_complete = OnComplete::NoOp;
    txn.approval_program = programs.approval.clone();
    txn.clear_program = programs.clear.clone();
    txn.global_schema = global_schema;
    txn.local_schema = local_schema;
    txn.assign_fee(params)?;
    Ok(txn)
}

/// Builds signed transactions against the node's current parameters.
pub struct TransactionBuilder<'a> {
    node: &'a dyn NodeApi,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(node: &'a dyn NodeApi) -> Self {
        Self { node }
    }

    fn params(&self) -> Result<SuggestedParams> {
        self.node
            .suggested_params()
            .context("Failed to fetch suggested params")
    }

    pub fn payment(&self, from: &Account, to: &Address, amount: u64) -> Result<SignedTransaction> {
        let txn = payment_txn(&self.params()?, from.address(), *to, amount)?;
        debug!(from = %from.address(), to = %to, amount, fee = txn.fee, "built payment");
        from.sign_transaction(txn)
    }

    pub fn close_account(&self, account: &Account, close_to: &Address) -> Result<SignedTransaction> {
        let txn = close_account_txn(&self.params()?, account.address(), *close_to)?;
        debug!(account = %account.address(), close_to = %close_to, "built close-out");
        account.sign_transaction(txn)
    }

    pub fn app_create(
        &self,
        creator: &Account,
        programs: &AppPrograms,
        global_schema: StateSchema,
        local_schema: StateSchema,
    ) -> Result<SignedTransaction> {
        let txn = app_create_txn(
            &self.params()?,
            creator.address(),
            programs,
            global_schema,
            local_schema,
        )?;
        debug!(creator = %creator.address(), fee = txn.fee, "built app create");
        creator.sign_transaction(txn)
    }
}
