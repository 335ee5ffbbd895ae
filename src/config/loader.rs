//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AutopayoutConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read and deserialize a TOML file without semantic checks.
///
/// Callers validate once CLI flags have been layered on top.
pub fn read_config(path: &Path) -> Result<AutopayoutConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "autopayout-loader-{}-{}.toml",
            std::process::id(),
            name
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let path = write_temp(
            "valid",
            r#"validators = ["5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"]"#,
        );
        let config = read_config(&path).unwrap();
        assert_eq!(config.validators.len(), 1);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/nonexistent/autopayout.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/autopayout.toml"));
    }

    #[test]
    fn test_parse_error() {
        let path = write_temp("broken", "validators = [");
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_empty_file_reads_defaults() {
        let path = write_temp("empty", "");
        let config = read_config(&path).unwrap();
        assert!(config.validators.is_empty());
        assert_eq!(config.chain.rpc_url, "ws://127.0.0.1:9944");
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![ValidationError {
            field: "validators".to_string(),
            message: "at least one validator is required".to_string(),
        }]);
        assert!(err.to_string().starts_with("Validation failed: validators:"));
    }
}
