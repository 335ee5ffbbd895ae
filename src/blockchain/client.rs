//! Substrate RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the node WebSocket endpoint
//! - Query staking and account state through dynamic storage access
//! - Bound every read with the configured timeout
//! - Submit the signed payout batch

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::time::Duration;

use subxt::dynamic::Value;
use subxt::ext::codec::Decode;
use subxt::ext::scale_value::{At, ValueDef};
use subxt::utils::AccountId32;
use subxt::{OnlineClient, PolkadotConfig};
use subxt_signer::sr25519::Keypair;
use tokio::time::timeout;

use crate::blockchain::query::ChainQuery;
use crate::blockchain::transaction;
use crate::blockchain::types::{
    Balance, ChainConfig, ChainError, ChainResult, Era, EraRewardPoints, TxHash, ValidatorId,
};
use crate::payout::{BatchTransaction, EraWindow};

/// `pallet_staking::ActiveEraInfo`.
#[derive(Debug, Decode)]
#[codec(crate = subxt::ext::codec)]
struct ActiveEraInfo {
    index: u32,
    #[allow(dead_code)]
    start: Option<u64>,
}

/// `pallet_staking::EraRewardPoints<AccountId>`.
#[derive(Debug, Decode)]
#[codec(crate = subxt::ext::codec)]
struct RawEraRewardPoints {
    total: u32,
    individual: BTreeMap<AccountId32, u32>,
}

/// Node connection scoped to one payout run.
///
/// The underlying RPC connection closes when the client is dropped.
pub struct ChainClient {
    api: OnlineClient<PolkadotConfig>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Connect to the configured endpoint.
    ///
    /// `ws://` and `http://` endpoints are accepted for local nodes.
    pub async fn connect(config: &ChainConfig) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let url = config.rpc_url.as_str();
        let insecure = url.starts_with("ws://") || url.starts_with("http://");

        let connecting = async {
            if insecure {
                OnlineClient::<PolkadotConfig>::from_insecure_url(url).await
            } else {
                OnlineClient::<PolkadotConfig>::from_url(url).await
            }
        };

        let api = match timeout(timeout_duration, connecting).await {
            Ok(Ok(api)) => api,
            Ok(Err(e)) => {
                return Err(ChainError::Connection {
                    url: config.rpc_url.clone(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(ChainError::Connection {
                    url: config.rpc_url.clone(),
                    reason: format!("no response within {} seconds", config.rpc_timeout_secs),
                })
            }
        };

        tracing::info!(
            rpc_url = %config.rpc_url,
            spec_version = api.runtime_version().spec_version,
            "Chain client connected"
        );

        Ok(Self {
            api,
            config: config.clone(),
            timeout_duration,
        })
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> ChainResult<T>
    where
        F: Future<Output = ChainResult<T>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(result) => result,
            Err(_) => Err(ChainError::Timeout {
                operation,
                secs: self.config.rpc_timeout_secs,
            }),
        }
    }

    fn has_paged_claims(&self) -> bool {
        self.api
            .metadata()
            .pallet_by_name("Staking")
            .and_then(|pallet| pallet.storage())
            .and_then(|storage| storage.entry_by_name("ClaimedRewards"))
            .is_some()
    }

    /// Eras recorded in the stash's staking ledger.
    async fn ledger_claimed_rewards(&self, validator: &ValidatorId) -> ChainResult<BTreeSet<Era>> {
        let storage = self.api.storage().at_latest().await?;

        let bonded = subxt::dynamic::storage(
            "Staking",
            "Bonded",
            vec![Value::from_bytes(validator.as_bytes())],
        );
        let Some(controller) = storage.fetch(&bonded).await? else {
            tracing::warn!(validator = %validator, "Stash is not bonded");
            return Ok(BTreeSet::new());
        };
        let controller = AccountId32::decode(&mut controller.encoded()).map_err(|e| {
            ChainError::Decode {
                entry: "Staking.Bonded",
                reason: e.to_string(),
            }
        })?;

        let ledger = subxt::dynamic::storage(
            "Staking",
            "Ledger",
            vec![Value::from_bytes(controller.0)],
        );
        let Some(ledger) = storage.fetch(&ledger).await? else {
            tracing::warn!(validator = %validator, "No staking ledger for controller");
            return Ok(BTreeSet::new());
        };
        let ledger = ledger.to_value().map_err(subxt::Error::from)?;

        let mut eras = BTreeSet::new();
        if let Some(claimed) = ledger
            .at("legacy_claimed_rewards")
            .or_else(|| ledger.at("claimed_rewards"))
        {
            collect_eras(claimed, &mut eras);
        }
        Ok(eras)
    }

    /// Eras in `window` whose every exposure page has been paid out.
    async fn paged_claimed_rewards(
        &self,
        validator: &ValidatorId,
        window: EraWindow,
    ) -> ChainResult<BTreeSet<Era>> {
        let storage = self.api.storage().at_latest().await?;
        let mut eras = BTreeSet::new();
        for era in window.eras() {
            let keys = || {
                vec![
                    Value::u128(u128::from(era)),
                    Value::from_bytes(validator.as_bytes()),
                ]
            };
            let claimed = subxt::dynamic::storage("Staking", "ClaimedRewards", keys());
            let Some(pages) = storage.fetch(&claimed).await? else {
                continue;
            };
            let mut claimed_pages = BTreeSet::new();
            collect_eras(&pages.to_value().map_err(subxt::Error::from)?, &mut claimed_pages);
            if claimed_pages.is_empty() {
                continue;
            }

            let overview = subxt::dynamic::storage("Staking", "ErasStakersOverview", keys());
            let page_count = match storage.fetch(&overview).await? {
                Some(overview) => overview
                    .to_value().map_err(subxt::Error::from)?
                    .at("page_count")
                    .and_then(|v| v.as_u128())
                    .and_then(|n| u32::try_from(n).ok()),
                None => None,
            };
            if all_pages_claimed(&claimed_pages, page_count) {
                eras.insert(era);
            } else {
                tracing::debug!(
                    validator = %validator,
                    era = era,
                    claimed_pages = ?claimed_pages,
                    page_count = ?page_count,
                    "Era partially claimed"
                );
            }
        }
        Ok(eras)
    }
}

impl ChainQuery for ChainClient {
    async fn get_active_era(&self) -> ChainResult<Era> {
        self.timed("fetching active era", async {
            let address = subxt::dynamic::storage("Staking", "ActiveEra", Vec::<Value>::new());
            let value = self
                .api
                .storage()
                .at_latest()
                .await?
                .fetch(&address)
                .await?
                .ok_or(ChainError::MissingStorage("Staking.ActiveEra"))?;
            let info = ActiveEraInfo::decode(&mut value.encoded()).map_err(|e| {
                ChainError::Decode {
                    entry: "Staking.ActiveEra",
                    reason: e.to_string(),
                }
            })?;
            Ok(info.index)
        })
        .await
    }

    async fn get_available_balance(&self, account: &AccountId32) -> ChainResult<Balance> {
        self.timed("fetching account balance", async {
            let address = subxt::dynamic::storage(
                "System",
                "Account",
                vec![Value::from_bytes(account.0)],
            );
            let info = self
                .api
                .storage()
                .at_latest()
                .await?
                .fetch_or_default(&address)
                .await?
                .to_value().map_err(subxt::Error::from)?;

            let data = info.at("data");
            let free = data
                .at("free")
                .and_then(|v| v.as_u128())
                .ok_or(ChainError::Decode {
                    entry: "System.Account",
                    reason: "missing data.free".to_string(),
                })?;
            // Current runtimes expose `frozen`; older ones split it in two.
            let frozen = match data.at("frozen").and_then(|v| v.as_u128()) {
                Some(frozen) => frozen,
                None => {
                    let misc = data.at("misc_frozen").and_then(|v| v.as_u128()).unwrap_or(0);
                    let fee = data.at("fee_frozen").and_then(|v| v.as_u128()).unwrap_or(0);
                    misc.max(fee)
                }
            };
            Ok(free.saturating_sub(frozen))
        })
        .await
    }

    async fn get_claimed_rewards(
        &self,
        validator: &ValidatorId,
        window: EraWindow,
    ) -> ChainResult<BTreeSet<Era>> {
        self.timed("fetching claimed rewards", async {
            let mut eras = self.ledger_claimed_rewards(validator).await?;
            if self.has_paged_claims() {
                eras.extend(self.paged_claimed_rewards(validator, window).await?);
            }
            Ok(eras)
        })
        .await
    }

    async fn get_era_reward_points(&self, era: Era) -> ChainResult<EraRewardPoints> {
        self.timed("fetching era reward points", async {
            let address = subxt::dynamic::storage(
                "Staking",
                "ErasRewardPoints",
                vec![Value::u128(u128::from(era))],
            );
            let value = self
                .api
                .storage()
                .at_latest()
                .await?
                .fetch_or_default(&address)
                .await?;
            let raw = RawEraRewardPoints::decode(&mut value.encoded()).map_err(|e| {
                ChainError::Decode {
                    entry: "Staking.ErasRewardPoints",
                    reason: e.to_string(),
                }
            })?;

            Ok(EraRewardPoints {
                era,
                total: raw.total,
                individual: raw
                    .individual
                    .into_iter()
                    .map(|(account, points)| (ValidatorId(account), points))
                    .collect(),
            })
        })
        .await
    }

    async fn get_account_nonce(&self, account: &AccountId32) -> ChainResult<u64> {
        self.timed("fetching account nonce", async {
            Ok(self.api.tx().account_nonce(account).await?)
        })
        .await
    }

    async fn submit_batch(
        &self,
        batch: &BatchTransaction,
        signer: &Keypair,
        nonce: u64,
    ) -> ChainResult<TxHash> {
        // Not bounded by `rpc_timeout_secs`; a broadcast extrinsic is never reported
        // as failed by a timeout.
        transaction::submit(&self.api, batch, self.config.batch_mode, signer, nonce).await
    }
}

impl Drop for ChainClient {
    fn drop(&mut self) {
        tracing::debug!(rpc_url = %self.config.rpc_url, "Chain connection released");
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

/// An era is settled once the claimed pages cover its exposure.
///
/// Without `ErasStakersOverview` metadata the exposure is a single page.
fn all_pages_claimed(claimed_pages: &BTreeSet<Era>, page_count: Option<u32>) -> bool {
    let required = page_count.unwrap_or(1).max(1) as usize;
    claimed_pages.len() >= required
}

/// Collect every integer leaf of a (possibly nested) sequence value.
fn collect_eras<T>(value: &subxt::ext::scale_value::Value<T>, eras: &mut BTreeSet<Era>) {
    match &value.value {
        ValueDef::Composite(composite) => {
            for inner in composite.values() {
                collect_eras(inner, eras);
            }
        }
        _ => {
            if let Some(era) = value.as_u128().and_then(|n| Era::try_from(n).ok()) {
                eras.insert(era);
            }
        }
    }
}
