//! Chain capability consumed by the payout scanner.
//!
//! [`ChainClient`](crate::blockchain::ChainClient) implements it against a live node;
//! tests implement it in memory.

use std::collections::BTreeSet;

use subxt::utils::AccountId32;
use subxt_signer::sr25519::Keypair;

use crate::blockchain::types::{Balance, ChainResult, Era, EraRewardPoints, TxHash, ValidatorId};
use crate::payout::{BatchTransaction, EraWindow};

/// Reads and the single write a payout run needs from the chain.
#[allow(async_fn_in_trait)]
pub trait ChainQuery {
    /// Index of the era currently in progress.
    async fn get_active_era(&self) -> ChainResult<Era>;

    /// Spendable balance of an account.
    async fn get_available_balance(&self, account: &AccountId32) -> ChainResult<Balance>;

    /// Eras already paid out for a validator.
    ///
    /// `window` is the scanned range; paged claims are only looked up inside it.
    async fn get_claimed_rewards(
        &self,
        validator: &ValidatorId,
        window: EraWindow,
    ) -> ChainResult<BTreeSet<Era>>;

    /// Validators that earned points in an era.
    async fn get_era_reward_points(&self, era: Era) -> ChainResult<EraRewardPoints>;

    /// Next nonce for an account.
    async fn get_account_nonce(&self, account: &AccountId32) -> ChainResult<u64>;

    /// Sign and submit the batch as one extrinsic.
    async fn submit_batch(
        &self,
        batch: &BatchTransaction,
        signer: &Keypair,
        nonce: u64,
    ) -> ChainResult<TxHash>;
}
