//! Chain-specific types and error definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use subxt::utils::AccountId32;
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::{BatchMode, ChainConfig};

/// Staking era index.
pub type Era = u32;

/// Native token amount in plancks.
pub type Balance = u128;

/// Hash returned once an extrinsic has been accepted into the pool.
pub type TxHash = subxt::utils::H256;

/// Validator stash account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidatorId(pub AccountId32);

impl ValidatorId {
    /// Raw 32-byte public key of the stash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }
}

impl From<AccountId32> for ValidatorId {
    fn from(account: AccountId32) -> Self {
        Self(account)
    }
}

impl FromStr for ValidatorId {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountId32::from_str(s.trim())
            .map(Self)
            .map_err(|e| ChainError::InvalidAddress(format!("'{}': {}", s, e)))
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reward points earned by validators during one era.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraRewardPoints {
    pub era: Era,
    pub total: u32,
    pub individual: BTreeMap<ValidatorId, u32>,
}

impl EraRewardPoints {
    /// Whether the validator earned any points in this era.
    pub fn contains(&self, validator: &ValidatorId) -> bool {
        self.individual.contains_key(validator)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Could not establish the RPC connection.
    #[error("Connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    /// RPC request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {secs} seconds while {operation}")]
    Timeout { operation: &'static str, secs: u64 },

    /// Storage value did not have the expected shape.
    #[error("Decode error in {entry}: {reason}")]
    Decode { entry: &'static str, reason: String },

    /// A required storage value is missing.
    #[error("Storage entry {0} is empty")]
    MissingStorage(&'static str),

    /// Signing or broadcasting the batch failed.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// An address string is not valid SS58.
    #[error("Invalid address {0}")]
    InvalidAddress(String),
}

impl From<subxt::Error> for ChainError {
    fn from(err: subxt::Error) -> Self {
        ChainError::Rpc(err.to_string())
    }
}

/// Result type for blockchain operations.
pub type ChainResult<T> = Result<T, ChainError>;
