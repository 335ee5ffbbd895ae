//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validator addresses parse as SS58 and are not repeated
//! - Validate value ranges (timeouts > 0, concurrency > 0)
//! - Endpoint is a WebSocket or HTTP URL
//!
//! # Notes
//! - Every problem is reported in one pass
//! - Runs on the merged file + flags result, before any keystore or network access

use std::collections::BTreeSet;
use std::fmt;

use crate::blockchain::types::ValidatorId;
use crate::config::schema::AutopayoutConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &AutopayoutConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.validators.is_empty() {
        errors.push(ValidationError::new(
            "validators",
            "at least one validator address is required",
        ));
    }

    let mut seen = BTreeSet::new();
    for (i, address) in config.validators.iter().enumerate() {
        match address.parse::<ValidatorId>() {
            Ok(id) => {
                if !seen.insert(id) {
                    errors.push(ValidationError::new(
                        format!("validators[{}]", i),
                        format!("duplicate validator {}", address),
                    ));
                }
            }
            Err(e) => errors.push(ValidationError::new(format!("validators[{}]", i), e.to_string())),
        }
    }

    if config.account.keystore_path.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "account.keystore_path",
            "keystore path must not be empty",
        ));
    }

    match url::Url::parse(&config.chain.rpc_url) {
        Ok(url) => {
            if !matches!(url.scheme(), "ws" | "wss" | "http" | "https") {
                errors.push(ValidationError::new(
                    "chain.rpc_url",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
        }
        Err(e) => errors.push(ValidationError::new(
            "chain.rpc_url",
            format!("invalid URL '{}': {}", config.chain.rpc_url, e),
        )),
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "chain.rpc_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.scan.concurrency == 0 {
        errors.push(ValidationError::new(
            "scan.concurrency",
            "must be greater than zero",
        ));
    }

    if config.audit.enabled && config.audit.path.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "audit.path",
            "path required when audit log is enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl AutopayoutConfig {
    /// Parsed validator list, in configured order.
    ///
    /// Only fails on configs that skipped [`validate_config`].
    pub fn validator_ids(&self) -> Result<Vec<ValidatorId>, ValidationError> {
        self.validators
            .iter()
            .enumerate()
            .map(|(i, address)| {
                address
                    .parse()
                    .map_err(|e: crate::blockchain::ChainError| {
                        ValidationError::new(format!("validators[{}]", i), e.to_string())
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

    fn valid_config() -> AutopayoutConfig {
        AutopayoutConfig {
            validators: vec![ALICE.to_string(), BOB.to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
        let ids = valid_config().validator_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].to_string(), ALICE);
    }

    #[test]
    fn test_empty_validators_rejected() {
        let config = AutopayoutConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "validators"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.validators.push("garbage".to_string());
        config.validators.push(ALICE.to_string());
        config.chain.rpc_url = "ftp://node".to_string();
        config.chain.rpc_timeout_secs = 0;
        config.scan.concurrency = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "validators[2]",
                "validators[3]",
                "chain.rpc_url",
                "chain.rpc_timeout_secs",
                "scan.concurrency"
            ]
        );
        assert!(errors[1].message.contains("duplicate"));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = valid_config();
        config.chain.rpc_url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "chain.rpc_url");
    }
}
