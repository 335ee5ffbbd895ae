//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! The run boundary produces:
//!     → console.rs (banner, progress, colored verdict)
//!     → audit.rs (one appended line per finished run, when enabled)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event
//! - Secrets never reach any sink

pub mod audit;
pub mod console;
pub mod logging;

pub use audit::AuditLog;
pub use logging::init_logging;
