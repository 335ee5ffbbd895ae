//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the payout run.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for a payout run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AutopayoutConfig {
    /// Signing account settings.
    pub account: AccountConfig,

    /// Validator stash addresses (SS58) whose rewards are claimed.
    pub validators: Vec<String>,

    /// Chain connection settings.
    pub chain: ChainConfig,

    /// Era scan settings.
    pub scan: ScanConfig,

    /// Append-only outcome log.
    pub audit: AuditConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Signing account configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Path to the exported account JSON (polkadot-js format).
    pub keystore_path: PathBuf,

    /// Keystore password. Prompted interactively when absent.
    pub password: Option<String>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            keystore_path: PathBuf::from("keystores/account.json"),
            password: None,
        }
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("keystore_path", &self.keystore_path)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Which utility call wraps the payouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// `Utility.batch`: stops at the first failing call, earlier calls stay applied.
    #[default]
    Batch,
    /// `Utility.batch_all`: all calls succeed or the whole batch reverts.
    BatchAll,
}

impl BatchMode {
    /// Call name inside the Utility pallet.
    pub fn call_name(self) -> &'static str {
        match self {
            BatchMode::Batch => "batch",
            BatchMode::BatchAll => "batch_all",
        }
    }
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Node WebSocket endpoint.
    pub rpc_url: String,

    /// Timeout in seconds for connecting and for each read. Submission is unbounded.
    pub rpc_timeout_secs: u64,

    /// Utility call used for the payout batch.
    pub batch_mode: BatchMode,

    /// Explorer URL prefix; the transaction hash is appended to it.
    pub explorer_tx_url: Option<String>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "ws://127.0.0.1:9944".to_string(),
            rpc_timeout_secs: 30,
            batch_mode: BatchMode::default(),
            explorer_tx_url: None,
        }
    }
}

/// Era scan configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum in-flight era reward point queries.
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Outcome log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Append one line per run outcome.
    pub enabled: bool,

    /// Log file path.
    pub path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("autopayout.log"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
