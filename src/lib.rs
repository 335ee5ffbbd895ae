//! Staking reward auto-payout library.

pub mod blockchain;
pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod payout;

pub use config::AutopayoutConfig;
pub use lifecycle::{RunError, RunOutcome};
pub use payout::{BatchTransaction, RewardScanner};
