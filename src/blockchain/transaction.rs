//! Payout batch encoding and submission.
//!
//! # Responsibilities
//! - Turn payout calls into dynamic `Staking.payout_stakers` calls
//! - Wrap them in a single `Utility.batch` (or `batch_all`) call
//! - Sign with an explicit nonce and submit once, without retry

use subxt::dynamic::Value;
use subxt::tx::DynamicPayload;
use subxt::OnlineClient;
use subxt::PolkadotConfig;
use subxt_signer::sr25519::Keypair;

use crate::blockchain::types::{BatchMode, ChainError, ChainResult, TxHash};
use crate::payout::{BatchTransaction, PayoutCall};

/// Dynamic `Staking.payout_stakers(validator_stash, era)` call.
pub fn payout_call(call: &PayoutCall) -> DynamicPayload {
    subxt::dynamic::tx(
        "Staking",
        "payout_stakers",
        vec![
            Value::from_bytes(call.validator.as_bytes()),
            Value::u128(u128::from(call.era)),
        ],
    )
}

/// Single utility call carrying every payout of the batch.
pub fn batch_payload(batch: &BatchTransaction, mode: BatchMode) -> DynamicPayload {
    let calls: Vec<Value> = batch
        .calls()
        .iter()
        .map(|call| payout_call(call).into_value())
        .collect();

    subxt::dynamic::tx(
        "Utility",
        mode.call_name(),
        vec![Value::unnamed_composite(calls)],
    )
}

/// Sign `batch` with `signer` at `nonce` and submit it.
///
/// Returns once the node has accepted the extrinsic into its pool.
pub async fn submit(
    api: &OnlineClient<PolkadotConfig>,
    batch: &BatchTransaction,
    mode: BatchMode,
    signer: &Keypair,
    nonce: u64,
) -> ChainResult<TxHash> {
    let payload = batch_payload(batch, mode);
    let params = subxt::config::polkadot::PolkadotExtrinsicParamsBuilder::<PolkadotConfig>::new()
        .nonce(nonce)
        .build();

    tracing::debug!(
        calls = batch.len(),
        nonce = nonce,
        call = mode.call_name(),
        "Signing payout batch"
    );

    api.tx()
        .sign_and_submit(&payload, signer, params)
        .await
        .map_err(|e| ChainError::Submission(e.to_string()))
}
