//! Run outcome, fatal errors and their exit codes.

use std::fmt;
use std::process::ExitCode;

use thiserror::Error;

use crate::blockchain::{ChainError, TxHash, WalletError};
use crate::config::ConfigError;

/// Audit text for an empty scan.
pub const NO_UNCLAIMED_REWARDS: &str = "There's no unclaimed rewards";

/// Stages of a payout run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    AccountLoaded,
    Connected,
    BalanceChecked,
    Scanned,
    Submitted,
    NoOpExit,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Start => "start",
            RunPhase::AccountLoaded => "account_loaded",
            RunPhase::Connected => "connected",
            RunPhase::BalanceChecked => "balance_checked",
            RunPhase::Scanned => "scanned",
            RunPhase::Submitted => "submitted",
            RunPhase::NoOpExit => "no_op_exit",
        };
        f.write_str(name)
    }
}

/// Successful end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// One batch carrying `payouts` calls was accepted by the node.
    Submitted { tx_hash: TxHash, payouts: usize },
    /// No validator had unclaimed eras in the window.
    NothingToClaim,
}

impl RunOutcome {
    pub fn phase(&self) -> RunPhase {
        match self {
            RunOutcome::Submitted { .. } => RunPhase::Submitted,
            RunOutcome::NothingToClaim => RunPhase::NoOpExit,
        }
    }

    /// Text recorded in the audit log.
    pub fn audit_text(&self) -> String {
        match self {
            RunOutcome::Submitted { tx_hash, .. } => {
                format!("Claimed rewards, transaction hash is {}", format_hash(tx_hash))
            }
            RunOutcome::NothingToClaim => NO_UNCLAIMED_REWARDS.to_string(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::SUCCESS
    }
}

/// Full `0x`-prefixed hex; `Display` on hashes abbreviates.
pub fn format_hash(hash: &TxHash) -> String {
    format!("{:?}", hash)
}

/// Fatal run failure. Every variant exits with status 1.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration or keystore file problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Keystore missing or malformed.
    #[error(transparent)]
    Keystore(WalletError),

    /// Password wrong or missing.
    #[error(transparent)]
    Auth(WalletError),

    /// Interactive password prompt failed.
    #[error("Cannot read password: {0}")]
    PasswordPrompt(#[source] std::io::Error),

    /// Node unreachable.
    #[error(transparent)]
    Connection(ChainError),

    /// Signing account cannot pay fees.
    #[error("Account {address} doesn't have available funds")]
    InsufficientFunds { address: String },

    /// A chain read failed during the run.
    #[error(transparent)]
    Chain(ChainError),

    /// Signing or broadcasting the batch failed.
    #[error(transparent)]
    Submission(ChainError),
}

impl From<WalletError> for RunError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Read { .. } | WalletError::Format { .. } => RunError::Keystore(err),
            _ => RunError::Auth(err),
        }
    }
}

impl RunError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }
}
