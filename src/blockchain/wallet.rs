//! Signing account loaded from an exported keystore file.
//!
//! # Security
//! - Keys are decrypted in memory only, never written back
//! - Passwords and key material are never logged or serialized

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use subxt::utils::AccountId32;
use subxt_signer::sr25519::Keypair;
use thiserror::Error;

/// Errors loading or unlocking the signing account.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Keystore file missing or unreadable.
    #[error("Can't open {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Keystore file is not an exported account JSON.
    #[error("Invalid keystore {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    /// No password was supplied.
    #[error("No password supplied for {0}")]
    EmptyPassword(String),

    /// Wrong password or unsupported encryption.
    #[error("Unable to decrypt account {address}: {reason}")]
    Decrypt { address: String, reason: String },

    /// Decrypted key does not belong to the declared address.
    #[error("Keystore address {declared} does not match decrypted key {actual}")]
    AddressMismatch { declared: String, actual: String },
}

/// Exported account JSON, still encrypted.
#[derive(Clone, Deserialize)]
pub struct KeystoreFile {
    /// SS58 address of the account.
    pub address: String,
    #[serde(default)]
    pub meta: KeystoreMeta,
    #[serde(skip)]
    raw: String,
    #[serde(skip)]
    path: PathBuf,
}

/// Human-facing metadata stored alongside the key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeystoreMeta {
    #[serde(default)]
    pub name: Option<String>,
}

impl KeystoreFile {
    /// Read a keystore without decrypting it.
    pub fn read(path: &Path) -> Result<Self, WalletError> {
        let raw = fs::read_to_string(path).map_err(|source| WalletError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, WalletError> {
        let mut file: KeystoreFile =
            serde_json::from_str(raw).map_err(|e| WalletError::Format {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        file.raw = raw.to_string();
        file.path = path.to_path_buf();
        Ok(file)
    }

    /// Decrypt the key with `password`.
    pub fn unlock(&self, password: &str) -> Result<Account, WalletError> {
        if password.is_empty() {
            return Err(WalletError::EmptyPassword(self.address.clone()));
        }

        let keypair = subxt_signer::polkadot_js_compat::decrypt_json(&self.raw, password)
            .map_err(|e| WalletError::Decrypt {
                address: self.address.clone(),
                reason: e.to_string(),
            })?;

        let account = Account::from_keypair(keypair);
        let declared = AccountId32::from_str(&self.address).map_err(|e| WalletError::Format {
            path: self.path.clone(),
            reason: format!("address '{}': {}", self.address, e),
        })?;
        if declared != *account.account_id() {
            return Err(WalletError::AddressMismatch {
                declared: self.address.clone(),
                actual: account.account_id().to_string(),
            });
        }

        tracing::info!(
            address = %self.address,
            name = ?self.meta.name,
            "Account imported"
        );
        Ok(account.with_address(self.address.clone()))
    }
}

impl fmt::Debug for KeystoreFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreFile")
            .field("address", &self.address)
            .field("path", &self.path)
            .finish()
    }
}

/// Unlocked signing account.
#[derive(Clone)]
pub struct Account {
    keypair: Keypair,
    account_id: AccountId32,
    /// Address as written in the keystore (keeps the chain's SS58 prefix).
    address: String,
}

impl Account {
    /// Wrap an already unlocked keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        let account_id = keypair.public_key().to_account_id();
        Self {
            address: account_id.to_string(),
            keypair,
            account_id,
        }
    }

    fn with_address(mut self, address: String) -> Self {
        self.address = address;
        self
    }

    pub fn account_id(&self) -> &AccountId32 {
        &self.account_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn signer(&self) -> &Keypair {
        &self.keypair
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subxt_signer::sr25519::dev;

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

    fn keystore_json(address: &str) -> String {
        format!(
            r#"{{
                "address": "{}",
                "encoded": "{}",
                "encoding": {{
                    "content": ["pkcs8", "sr25519"],
                    "type": ["scrypt", "xsalsa20-poly1305"],
                    "version": "3"
                }},
                "meta": {{ "name": "payer" }}
            }}"#,
            address,
            // 120 zero bytes: well-formed length, invalid scrypt parameters.
            "A".repeat(160)
        )
    }

    #[test]
    fn test_account_from_dev_keypair() {
        let account = Account::from_keypair(dev::alice());
        assert_eq!(account.address(), ALICE);
        assert_eq!(account.account_id().to_string(), ALICE);
    }

    #[test]
    fn test_debug_hides_key() {
        let account = Account::from_keypair(dev::alice());
        let debug = format!("{:?}", account);
        assert!(debug.contains(ALICE));
        assert!(!debug.contains("keypair"));
    }

    #[test]
    fn test_parse_keystore_metadata() {
        let file = KeystoreFile::parse(&keystore_json(ALICE), Path::new("payer.json")).unwrap();
        assert_eq!(file.address, ALICE);
        assert_eq!(file.meta.name.as_deref(), Some("payer"));
    }

    #[test]
    fn test_missing_keystore() {
        let err = KeystoreFile::read(Path::new("/nonexistent/account.json")).unwrap_err();
        assert!(matches!(err, WalletError::Read { .. }));
        assert!(err.to_string().starts_with("Can't open /nonexistent/account.json"));
    }

    #[test]
    fn test_not_json() {
        let err = KeystoreFile::parse("not json", Path::new("payer.json")).unwrap_err();
        assert!(matches!(err, WalletError::Format { .. }));
    }

    #[test]
    fn test_empty_password_rejected() {
        let file = KeystoreFile::parse(&keystore_json(ALICE), Path::new("payer.json")).unwrap();
        let err = file.unlock("").unwrap_err();
        assert!(matches!(err, WalletError::EmptyPassword(_)));
    }

    #[test]
    fn test_undecryptable_key() {
        let file = KeystoreFile::parse(&keystore_json(ALICE), Path::new("payer.json")).unwrap();
        let err = file.unlock("wrong").unwrap_err();
        assert!(matches!(err, WalletError::Decrypt { .. }));
    }
}
