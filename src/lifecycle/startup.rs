//! Run orchestration.
//!
//! # Phases
//! ```text
//! Start → AccountLoaded → Connected → BalanceChecked → Scanned → {Submitted | NoOpExit}
//! ```
//!
//! # Design Decisions
//! - Fail fast: any error ends the run, nothing is retried
//! - Nothing is written to the chain before the scan has completed
//! - The chain connection lives inside `run` and is released on every exit path
//! - Only terminal outcomes reach the audit log

use crate::blockchain::{Account, ChainClient, ChainQuery, KeystoreFile, ValidatorId};
use crate::config::{AccountConfig, AutopayoutConfig, ConfigError};
use crate::lifecycle::outcome::{format_hash, RunError, RunOutcome, RunPhase};
use crate::observability::{console, AuditLog};
use crate::payout::RewardScanner;

/// Execute one payout run against the configured node.
pub async fn run(config: &AutopayoutConfig) -> Result<RunOutcome, RunError> {
    enter(RunPhase::Start);
    let validators = config
        .validator_ids()
        .map_err(|e| ConfigError::Validation(vec![e]))?;

    let keystore = KeystoreFile::read(&config.account.keystore_path)?;
    let password = resolve_password(&config.account, &keystore)?;
    console::step(&format!("Importing account {}", keystore.address));
    let account = keystore.unlock(&password)?;
    enter(RunPhase::AccountLoaded);

    console::step(&format!("Connecting to {}", config.chain.rpc_url));
    let chain = ChainClient::connect(&config.chain)
        .await
        .map_err(RunError::Connection)?;
    enter(RunPhase::Connected);

    claim_and_record(config, &validators, &account, &chain).await
}

/// [`claim_rewards`], then append the outcome to the audit log when enabled.
///
/// Fatal errors are returned without writing an audit line.
pub async fn claim_and_record<C: ChainQuery>(
    config: &AutopayoutConfig,
    validators: &[ValidatorId],
    account: &Account,
    chain: &C,
) -> Result<RunOutcome, RunError> {
    let outcome = claim_rewards(config, validators, account, chain).await?;
    enter(outcome.phase());

    if let Some(audit) = AuditLog::from_config(&config.audit) {
        record_outcome(&audit, &outcome);
    }
    Ok(outcome)
}

/// Balance check, scan and submission over an already connected chain.
pub async fn claim_rewards<C: ChainQuery>(
    config: &AutopayoutConfig,
    validators: &[ValidatorId],
    account: &Account,
    chain: &C,
) -> Result<RunOutcome, RunError> {
    let balance = chain
        .get_available_balance(account.account_id())
        .await
        .map_err(RunError::Chain)?;
    if balance == 0 {
        return Err(RunError::InsufficientFunds {
            address: account.address().to_string(),
        });
    }
    console::step(&format!(
        "Account {} available balance is {}",
        account.address(),
        balance
    ));
    enter(RunPhase::BalanceChecked);

    let active_era = chain.get_active_era().await.map_err(RunError::Chain)?;
    console::step(&format!("Active era is {}", active_era));

    let report = RewardScanner::new(chain)
        .with_concurrency(config.scan.concurrency)
        .scan(active_era, validators)
        .await
        .map_err(RunError::Chain)?;
    for scan in &report.validators {
        console::step(&format!(
            "Claimed eras for validator {}: {:?}",
            scan.validator, scan.claimed
        ));
        console::step(&format!(
            "Unclaimed eras for validator {}: {:?}",
            scan.validator, scan.unclaimed
        ));
    }
    enter(RunPhase::Scanned);

    let batch = report.to_batch();
    if batch.is_empty() {
        return Ok(RunOutcome::NothingToClaim);
    }

    let nonce = chain
        .get_account_nonce(account.account_id())
        .await
        .map_err(RunError::Chain)?;
    let tx_hash = chain
        .submit_batch(&batch, account.signer(), nonce)
        .await
        .map_err(RunError::Submission)?;

    tracing::info!(
        tx_hash = %format_hash(&tx_hash),
        payouts = batch.len(),
        nonce = nonce,
        "Payout batch submitted"
    );
    Ok(RunOutcome::Submitted {
        tx_hash,
        payouts: batch.len(),
    })
}

/// Append the outcome to the audit log. Failures are logged, not fatal.
pub fn record_outcome(audit: &AuditLog, outcome: &RunOutcome) {
    if let Err(e) = audit.append(&outcome.audit_text()) {
        tracing::warn!(
            path = %audit.path().display(),
            error = %e,
            "Failed to append to audit log"
        );
    }
}

fn resolve_password(account: &AccountConfig, keystore: &KeystoreFile) -> Result<String, RunError> {
    match &account.password {
        Some(password) => Ok(password.clone()),
        None => rpassword::prompt_password(format!("Enter password for {}: ", keystore.address))
            .map_err(RunError::PasswordPrompt),
    }
}

fn enter(phase: RunPhase) {
    tracing::debug!(phase = %phase, "Run phase");
}
