//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{read_config, validate_config, AutopayoutConfig, ConfigError};

/// Default config file, read only when present.
pub const DEFAULT_CONFIG_PATH: &str = "autopayout.toml";

#[derive(Parser, Debug, Default)]
#[command(name = "staking-autopayout")]
#[command(version, about = "Claim unclaimed staking rewards for a set of validators", long_about = None)]
#[command(after_help = "Example: staking-autopayout -a keystores/account.json -v <validator_stash_address>")]
pub struct Cli {
    /// Config file path [default: autopayout.toml, if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Account json file path
    #[arg(short, long)]
    pub account: Option<PathBuf>,

    /// Account password, prompted on stdin if not set
    #[arg(short, long)]
    pub password: Option<String>,

    /// Validator stash address (repeatable)
    #[arg(short, long = "validator", value_name = "ADDRESS")]
    pub validators: Vec<String>,

    /// Append the outcome to the log file
    #[arg(short, long)]
    pub log: bool,

    /// Node WebSocket endpoint
    #[arg(short, long, value_name = "URL")]
    pub node: Option<String>,
}

impl Cli {
    /// Merge the config file (if any) with flags and validate the result.
    pub fn resolve_config(&self) -> Result<AutopayoutConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => read_config(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    read_config(&default_path)?
                } else {
                    AutopayoutConfig::default()
                }
            }
        };

        let config = self.apply(config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overlay flags onto a loaded config. Flags win.
    pub fn apply(&self, mut config: AutopayoutConfig) -> AutopayoutConfig {
        if let Some(account) = &self.account {
            config.account.keystore_path = account.clone();
        }
        if let Some(password) = &self.password {
            config.account.password = Some(password.clone());
        }
        if !self.validators.is_empty() {
            config.validators = self.validators.clone();
        }
        if self.log {
            config.audit.enabled = true;
        }
        if let Some(node) = &self.node {
            config.chain.rpc_url = node.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from([
            "staking-autopayout",
            "-a",
            "keystores/account.json",
            "-p",
            "secret",
            "-v",
            ALICE,
            "-v",
            BOB,
            "-l",
        ])
        .unwrap();

        assert_eq!(cli.account, Some(PathBuf::from("keystores/account.json")));
        assert_eq!(cli.password.as_deref(), Some("secret"));
        assert_eq!(cli.validators, vec![ALICE.to_string(), BOB.to_string()]);
        assert!(cli.log);
    }

    #[test]
    fn test_flags_override_file() {
        let file: AutopayoutConfig = toml::from_str(&format!(
            r#"
            validators = ["{}"]
            [account]
            keystore_path = "from-file.json"
            password = "file-password"
            "#,
            ALICE
        ))
        .unwrap();

        let cli = Cli {
            validators: vec![BOB.to_string()],
            node: Some("wss://rpc.example.org".to_string()),
            log: true,
            ..Default::default()
        };
        let merged = cli.apply(file);

        assert_eq!(merged.validators, vec![BOB.to_string()]);
        assert_eq!(merged.account.keystore_path, PathBuf::from("from-file.json"));
        assert_eq!(merged.account.password.as_deref(), Some("file-password"));
        assert_eq!(merged.chain.rpc_url, "wss://rpc.example.org");
        assert!(merged.audit.enabled);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/autopayout.toml")),
            ..Default::default()
        };
        assert!(matches!(cli.resolve_config(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_merged_config_is_validated() {
        let path = std::env::temp_dir().join(format!(
            "autopayout-cli-{}-invalid.toml",
            std::process::id()
        ));
        std::fs::write(&path, "validators = [\"bogus\"]\n").unwrap();
        let cli = Cli {
            config: Some(path.clone()),
            ..Default::default()
        };

        let result = cli.resolve_config();
        std::fs::remove_file(&path).ok();

        match result {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field.starts_with("validators")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_flags_repair_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "autopayout-cli-{}-repaired.toml",
            std::process::id()
        ));
        std::fs::write(&path, "validators = [\"bogus\"]\n").unwrap();
        let cli = Cli {
            config: Some(path.clone()),
            validators: vec![ALICE.to_string()],
            ..Default::default()
        };

        let result = cli.resolve_config();
        std::fs::remove_file(&path).ok();

        assert_eq!(result.unwrap().validators, vec![ALICE.to_string()]);
    }
}
