//! Substrate staking auto payout.
//!
//! Claims every unclaimed staking reward of the configured validators in a
//! single signed `Utility.batch` extrinsic.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI flags ──┐
//!               ├─▶ config ──▶ lifecycle::run
//!   TOML file ──┘                  │
//!                                  ├─▶ blockchain::wallet    (unlock keystore)
//!                                  ├─▶ blockchain::client    (connect, balance, active era)
//!                                  ├─▶ payout::scanner       (unclaimed eras per validator)
//!                                  ├─▶ blockchain::transaction (one signed batch)
//!                                  └─▶ observability::audit  (optional log line)
//!
//!   Result<RunOutcome, RunError> ──▶ exit code (0 success / nothing to claim, 1 fatal)
//! ```

use std::process::ExitCode;

use clap::Parser;

use staking_autopayout::cli::Cli;
use staking_autopayout::lifecycle::outcome::format_hash;
use staking_autopayout::lifecycle::{self, RunOutcome};
use staking_autopayout::observability::{console, init_logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    console::banner();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            tracing::error!(error = %e, "Invalid configuration");
            console::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.observability.log_level);

    tracing::info!(
        validators = config.validators.len(),
        rpc_url = %config.chain.rpc_url,
        audit = config.audit.enabled,
        "Configuration loaded"
    );

    match lifecycle::run(&config).await {
        Ok(outcome) => {
            match &outcome {
                RunOutcome::Submitted { tx_hash, payouts } => {
                    let hash = format_hash(tx_hash);
                    let detail = match console::explorer_link(
                        config.chain.explorer_tx_url.as_deref(),
                        &hash,
                    ) {
                        Some(link) => format!("Claimed {} payouts, check tx: {}", payouts, link),
                        None => format!("Claimed {} payouts, transaction hash is {}", payouts, hash),
                    };
                    console::success(&detail);
                }
                RunOutcome::NothingToClaim => {
                    console::warning("There's no unclaimed rewards, exiting!");
                }
            }
            outcome.exit_code()
        }
        Err(e) => {
            tracing::error!(error = %e, "Payout run failed");
            console::error(&e.to_string());
            e.exit_code()
        }
    }
}
