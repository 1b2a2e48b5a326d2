//! decode-state command - print a state delta as readable JSON

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Deserialize;

use algo_sandbox_core::state_delta::{decode_state, ReadableDelta};
use algo_sandbox_types::{DryRunResponse, StateDeltaEntry};

use super::output::print_json;

#[derive(Parser, Debug)]
pub struct DecodeStateCmd {
    /// JSON file holding either a delta array or a full dry-run response
    pub file: PathBuf,

    /// Transaction to read when the file is a dry-run response
    #[arg(long, default_value = "0")]
    pub txn: usize,

    /// Decode local deltas instead of the global delta
    #[arg(long)]
    pub local: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DeltaInput {
    Delta(Vec<StateDeltaEntry>),
    Response(DryRunResponse),
}

impl DecodeStateCmd {
    pub fn execute(&self) -> Result<()> {
        let text = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let input: DeltaInput = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a state delta", self.file.display()))?;

        match input {
            DeltaInput::Delta(_) if self.local => {
                Err(anyhow!("--local needs a dry-run response, not a bare delta"))
            }
            DeltaInput::Delta(delta) => print_json(&decode_state(&delta)?),
            DeltaInput::Response(response) => {
                let txn = response.txns.get(self.txn).ok_or_else(|| {
                    anyhow!(
                        "Dry-run response has {} transactions, no index {}",
                        response.txns.len(),
                        self.txn
                    )
                })?;
                if self.local {
                    print_json(&txn.readable_local_deltas()?)
                } else {
                    print_json(&txn.readable_global_delta()?)
                }
            }
        }
    }
}
