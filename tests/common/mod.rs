//! Shared utilities for integration tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use staking_autopayout::blockchain::{
    Balance, ChainError, ChainQuery, ChainResult, Era, EraRewardPoints, TxHash, ValidatorId,
};
use staking_autopayout::payout::{BatchTransaction, EraWindow};
use subxt::utils::AccountId32;
use subxt_signer::sr25519::Keypair;

/// A chain read or write observed by [`FakeChain`].
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ActiveEra,
    Balance,
    Claimed(ValidatorId),
    EraPoints(Era),
    Nonce,
    Submit,
}

/// In-memory chain state with call recording.
#[derive(Default)]
pub struct FakeChain {
    pub active_era: Era,
    pub balance: Balance,
    pub nonce: u64,
    pub claimed: BTreeMap<ValidatorId, BTreeSet<Era>>,
    pub points: BTreeMap<Era, BTreeSet<ValidatorId>>,
    pub fail_era: Option<Era>,
    pub fail_submit: bool,
    pub calls: RefCell<Vec<Call>>,
    pub claimed_windows: RefCell<Vec<EraWindow>>,
    pub submissions: RefCell<Vec<(BatchTransaction, u64)>>,
}

#[allow(dead_code)]
impl FakeChain {
    pub fn new(active_era: Era) -> Self {
        Self {
            active_era,
            balance: 1_000_000_000_000,
            nonce: 7,
            ..Default::default()
        }
    }

    /// Give `validator` reward points in every listed era.
    pub fn with_points(mut self, validator: &ValidatorId, eras: impl IntoIterator<Item = Era>) -> Self {
        for era in eras {
            self.points.entry(era).or_default().insert(validator.clone());
        }
        self
    }

    /// Mark eras as already paid out for `validator`.
    pub fn with_claimed(mut self, validator: &ValidatorId, eras: impl IntoIterator<Item = Era>) -> Self {
        self.claimed
            .entry(validator.clone())
            .or_default()
            .extend(eras);
        self
    }

    pub fn recorded(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn scan_reads(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Claimed(_) | Call::EraPoints(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl ChainQuery for FakeChain {
    async fn get_active_era(&self) -> ChainResult<Era> {
        self.record(Call::ActiveEra);
        Ok(self.active_era)
    }

    async fn get_available_balance(&self, _account: &AccountId32) -> ChainResult<Balance> {
        self.record(Call::Balance);
        Ok(self.balance)
    }

    async fn get_claimed_rewards(
        &self,
        validator: &ValidatorId,
        window: EraWindow,
    ) -> ChainResult<BTreeSet<Era>> {
        self.record(Call::Claimed(validator.clone()));
        self.claimed_windows.borrow_mut().push(window);
        Ok(self.claimed.get(validator).cloned().unwrap_or_default())
    }

    async fn get_era_reward_points(&self, era: Era) -> ChainResult<EraRewardPoints> {
        self.record(Call::EraPoints(era));
        if self.fail_era == Some(era) {
            return Err(ChainError::Rpc(format!("era {} unavailable", era)));
        }
        let individual: BTreeMap<ValidatorId, u32> = self
            .points
            .get(&era)
            .map(|validators| validators.iter().map(|v| (v.clone(), 20)).collect())
            .unwrap_or_default();
        Ok(EraRewardPoints {
            era,
            total: 20 * individual.len() as u32,
            individual,
        })
    }

    async fn get_account_nonce(&self, _account: &AccountId32) -> ChainResult<u64> {
        self.record(Call::Nonce);
        Ok(self.nonce)
    }

    async fn submit_batch(
        &self,
        batch: &BatchTransaction,
        _signer: &Keypair,
        nonce: u64,
    ) -> ChainResult<TxHash> {
        self.record(Call::Submit);
        if self.fail_submit {
            return Err(ChainError::Submission("1010: Invalid Transaction".to_string()));
        }
        self.submissions.borrow_mut().push((batch.clone(), nonce));
        Ok(TxHash::repeat_byte(0x42))
    }
}

pub fn validator(n: u8) -> ValidatorId {
    ValidatorId(AccountId32([n; 32]))
}
