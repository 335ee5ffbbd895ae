//! Unclaimed reward detection.
//!
//! # Algorithm
//! 1. Compute the window of the 84 eras preceding the active era.
//! 2. Fetch reward points for every era of the window once, up to `concurrency`
//!    queries in flight, results kept in ascending era order.
//! 3. For each validator in configured order, fetch its claimed eras once and keep
//!    every era where it earned points and has not been paid out.
//!
//! Any failed read aborts the scan. Nothing is written to the chain here.

use std::collections::BTreeSet;

use futures_util::stream::{self, StreamExt, TryStreamExt};

use crate::blockchain::query::ChainQuery;
use crate::blockchain::types::{ChainResult, Era, EraRewardPoints, ValidatorId};
use crate::payout::batch::{BatchTransaction, PayoutCall};
use crate::payout::window::EraWindow;

/// Scan result for one validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorScan {
    pub validator: ValidatorId,
    /// Claimed eras as recorded on chain, including those outside the window.
    pub claimed: BTreeSet<Era>,
    /// Unclaimed eras inside the window, ascending.
    pub unclaimed: Vec<Era>,
}

/// Per-validator results of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub window: EraWindow,
    pub validators: Vec<ValidatorScan>,
}

impl ScanReport {
    /// Payout calls for every unclaimed era, validator order then era order.
    pub fn to_batch(&self) -> BatchTransaction {
        self.validators
            .iter()
            .flat_map(|scan| {
                scan.unclaimed
                    .iter()
                    .map(move |era| PayoutCall::new(scan.validator.clone(), *era))
            })
            .collect()
    }

    /// Total number of unclaimed eras across validators.
    pub fn unclaimed_count(&self) -> usize {
        self.validators.iter().map(|scan| scan.unclaimed.len()).sum()
    }
}

/// Finds unclaimed eras through a [`ChainQuery`].
pub struct RewardScanner<'a, C> {
    chain: &'a C,
    concurrency: usize,
}

impl<'a, C: ChainQuery> RewardScanner<'a, C> {
    /// Scanner issuing one era query at a time.
    pub fn new(chain: &'a C) -> Self {
        Self {
            chain,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` era point queries in flight.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Build the payout batch for `validators` as of `active_era`.
    pub async fn compute_batch(
        &self,
        active_era: Era,
        validators: &[ValidatorId],
    ) -> ChainResult<BatchTransaction> {
        Ok(self.scan(active_era, validators).await?.to_batch())
    }

    /// Scan the window and report claimed and unclaimed eras per validator.
    pub async fn scan(&self, active_era: Era, validators: &[ValidatorId]) -> ChainResult<ScanReport> {
        let window = EraWindow::preceding(active_era);
        let mut report = ScanReport {
            window,
            validators: Vec::with_capacity(validators.len()),
        };
        if validators.is_empty() {
            return Ok(report);
        }

        tracing::debug!(
            start = window.start(),
            end = window.end(),
            concurrency = self.concurrency,
            "Fetching era reward points"
        );
        let points = self.fetch_era_points(window).await?;

        for validator in validators {
            let claimed = self.chain.get_claimed_rewards(validator, window).await?;
            let unclaimed: Vec<Era> = window
                .eras()
                .zip(points.iter())
                .filter(|(era, points)| points.contains(validator) && !claimed.contains(era))
                .map(|(era, _)| era)
                .collect();

            tracing::info!(
                validator = %validator,
                claimed = ?claimed,
                "Claimed eras"
            );
            tracing::info!(
                validator = %validator,
                unclaimed = ?unclaimed,
                "Unclaimed eras"
            );

            report.validators.push(ValidatorScan {
                validator: validator.clone(),
                claimed,
                unclaimed,
            });
        }

        Ok(report)
    }

    async fn fetch_era_points(&self, window: EraWindow) -> ChainResult<Vec<EraRewardPoints>> {
        stream::iter(window.eras())
            .map(|era| self.chain.get_era_reward_points(era))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
