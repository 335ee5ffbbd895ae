//! Reward payout subsystem.
//!
//! # Data Flow
//! ```text
//! active era + validator list
//!     → window.rs (84 eras preceding the active era)
//!     → scanner.rs (reward point membership, claimed-era filter)
//!     → batch.rs (ordered payout calls)
//!     → blockchain::transaction (Utility batch payload, signed submission)
//! ```

pub mod batch;
pub mod scanner;
pub mod window;

pub use batch::{BatchTransaction, PayoutCall};
pub use scanner::{RewardScanner, ScanReport, ValidatorScan};
pub use window::{EraWindow, REWARD_HISTORY_DEPTH};
