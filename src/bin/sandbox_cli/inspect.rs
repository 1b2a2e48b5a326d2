//! inspect-dryrun command - summarize a persisted dry-run request

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use algo_sandbox_types::DryRunRequest;

use super::output::{print_json, short_address};

#[derive(Parser, Debug)]
pub struct InspectDryRunCmd {
    /// Path to a `.dr` file
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct DryRunSummary {
    pub latest_timestamp: u64,
    pub round: u64,
    pub protocol_version: String,
    pub txns: Vec<TxnSummary>,
    pub accounts: Vec<String>,
    pub apps: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct TxnSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub sender: String,
    pub fee: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,
}

impl DryRunSummary {
    pub fn from_request(request: &DryRunRequest) -> Result<Self> {
        let txns = request
            .txns
            .iter()
            .map(|stx| {
                let txn = &stx.txn;
                Ok(TxnSummary {
                    id: stx.id()?.to_string(),
                    tx_type: txn.tx_type.as_str().to_string(),
                    sender: txn.sender.to_string(),
                    fee: txn.fee,
                    app_id: (txn.tx_type == algo_sandbox_types::TxType::ApplicationCall)
                        .then_some(txn.app_id),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            latest_timestamp: request.latest_timestamp,
            round: request.round,
            protocol_version: request.protocol_version.clone(),
            txns,
            accounts: request.accounts.iter().map(|a| a.address.clone()).collect(),
            apps: request.apps.iter().map(|a| a.id).collect(),
        })
    }
}

impl InspectDryRunCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let bytes = std::fs::read(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let request = DryRunRequest::decode(&bytes)
            .with_context(|| format!("{} is not a dry-run request", self.file.display()))?;
        let summary = DryRunSummary::from_request(&request)?;

        if json_output {
            return print_json(&summary);
        }

        println!("Dry run: {}", self.file.display());
        println!("  latest-timestamp: {}", summary.latest_timestamp);
        if summary.round > 0 {
            println!("  round: {}", summary.round);
        }
        println!("  transactions: {}", summary.txns.len());
        for (idx, txn) in summary.txns.iter().enumerate() {
            let app = txn
                .app_id
                .map(|id| format!(" app={}", id))
                .unwrap_or_default();
            println!(
                "    [{}] {} {} from {} fee={}{}",
                idx,
                txn.tx_type,
                txn.id,
                short_address(&txn.sender),
                txn.fee,
                app
            );
        }
        println!("  accounts: {}", summary.accounts.len());
        for address in &summary.accounts {
            println!("    {}", address);
        }
        if !summary.apps.is_empty() {
            println!("  apps: {:?}", summary.apps);
        }
        Ok(())
    }
}
