//! run command - execute the app-creation scenario against a sandbox

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;

use algo_sandbox::{AppCreationScenario, Harness};
use algo_sandbox_core::state_delta::{ReadableDelta, ReadableState};
use algo_sandbox_core::HarnessConfig;

use super::output::print_json;

#[derive(Parser, Debug)]
pub struct RunCmd {
    /// JSON config file (defaults to the stock local sandbox)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Approval program source
    #[arg(long)]
    pub approval: Option<PathBuf>,

    /// Clear-state program source
    #[arg(long)]
    pub clear: Option<PathBuf>,

    /// Directory for `.dr` files
    #[arg(long)]
    pub dryrun_dir: Option<PathBuf>,

    /// Leave the creator account open after the run
    #[arg(long)]
    pub keep: bool,
}

#[derive(Serialize)]
struct RunReport {
    creator: String,
    dry_run: PathBuf,
    approval_passed: bool,
    app_call_messages: Vec<String>,
    global_delta: ReadableState,
}

impl RunCmd {
    fn config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_json_file(path)?,
            None => HarnessConfig::default(),
        }
        .apply_env();
        if let Some(approval) = &self.approval {
            config.approval_path = approval.clone();
        }
        if let Some(clear) = &self.clear {
            config.clear_path = clear.clone();
        }
        if let Some(dir) = &self.dryrun_dir {
            config.dryrun_dir = dir.clone();
        }
        Ok(config)
    }

    pub fn execute(&self, json_output: bool) -> Result<()> {
        let harness = Harness::connect(self.config()?);
        let scenario = AppCreationScenario::setup(&harness)?;

        let txn = scenario.app_txn();
        let report = RunReport {
            creator: scenario.creator.address().to_string(),
            dry_run: scenario.dry_run_path.clone(),
            approval_passed: scenario.approval_passed(),
            app_call_messages: txn.map(|t| t.app_call_messages.clone()).unwrap_or_default(),
            global_delta: match txn {
                Some(t) => t.readable_global_delta()?,
                None => ReadableState::new(),
            },
        };

        if !self.keep {
            scenario.teardown(&harness)?;
        }

        if json_output {
            print_json(&report)?;
        } else {
            println!("Creator: {}", report.creator);
            println!("Dry run written to {}", report.dry_run.display());
            println!("App call messages: {:?}", report.app_call_messages);
            if !report.global_delta.is_empty() {
                println!("Global delta:");
                for (key, value) in &report.global_delta {
                    println!("  {}: {}", key, serde_json::to_string(value)?);
                }
            }
        }

        if report.approval_passed {
            Ok(())
        } else {
            Err(anyhow!("Approval program did not pass"))
        }
    }
}
