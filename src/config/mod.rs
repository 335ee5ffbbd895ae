//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli.rs (command line flags override file values)
//!     → validation.rs (semantic checks)
//!     → AutopayoutConfig (validated, immutable)
//!     → passed by reference into the run
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, ConfigError};
pub use schema::{
    AccountConfig, AuditConfig, AutopayoutConfig, BatchMode, ChainConfig, ObservabilityConfig,
    ScanConfig,
};
pub use validation::{validate_config, ValidationError};
