//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Keystore file + password
//!     → wallet.rs (decrypt, signing account)
//!     → client.rs (RPC connection with timeouts, staking queries)
//!     → transaction.rs (Utility batch of payout_stakers, sign, submit)
//! ```
//!
//! # Security Constraints
//! - Never log passwords or key material
//! - All RPC calls have configurable timeouts
//! - The payout scanner only sees the `ChainQuery` trait

pub mod client;
pub mod query;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use query::ChainQuery;
pub use types::{Balance, ChainError, ChainResult, Era, EraRewardPoints, TxHash, ValidatorId};
pub use wallet::{Account, KeystoreFile, WalletError};
