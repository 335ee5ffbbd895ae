//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load account → Connect → Check balance → Scan → Submit or no-op
//!
//! Outcome (outcome.rs):
//!     Result<RunOutcome, RunError> → process exit code
//! ```
//!
//! # Design Decisions
//! - Ordered, sequential phases; any failure is fatal
//! - Exit codes are decided only at the process boundary

pub mod outcome;
pub mod startup;

pub use outcome::{RunError, RunOutcome, RunPhase};
pub use startup::{claim_and_record, claim_rewards, record_outcome, run};
