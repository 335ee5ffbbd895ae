//! Payout calls and the batch that carries them.

use std::fmt;

use crate::blockchain::types::{Era, ValidatorId};

/// One `Staking.payout_stakers` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutCall {
    pub validator: ValidatorId,
    pub era: Era,
}

impl PayoutCall {
    pub fn new(validator: ValidatorId, era: Era) -> Self {
        Self { validator, era }
    }
}

impl fmt::Display for PayoutCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payout_stakers({}, {})", self.validator, self.era)
    }
}

/// Ordered payout calls submitted under a single signature and nonce.
///
/// Calls are grouped by validator in configured order, eras ascending within a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTransaction {
    calls: Vec<PayoutCall>,
}

impl BatchTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, call: PayoutCall) {
        self.calls.push(call);
    }

    pub fn calls(&self) -> &[PayoutCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Eras claimed for one validator, in batch order.
    pub fn eras_for(&self, validator: &ValidatorId) -> Vec<Era> {
        self.calls
            .iter()
            .filter(|call| &call.validator == validator)
            .map(|call| call.era)
            .collect()
    }
}

impl FromIterator<PayoutCall> for BatchTransaction {
    fn from_iter<I: IntoIterator<Item = PayoutCall>>(iter: I) -> Self {
        Self {
            calls: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BatchTransaction {
    type Item = &'a PayoutCall;
    type IntoIter = std::slice::Iter<'a, PayoutCall>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subxt::utils::AccountId32;

    #[test]
    fn test_eras_for_validator() {
        let v1 = ValidatorId(AccountId32([1; 32]));
        let v2 = ValidatorId(AccountId32([2; 32]));
        let batch: BatchTransaction = [
            PayoutCall::new(v1.clone(), 5),
            PayoutCall::new(v1.clone(), 6),
            PayoutCall::new(v2.clone(), 5),
        ]
        .into_iter()
        .collect();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.eras_for(&v1), vec![5, 6]);
        assert_eq!(batch.eras_for(&v2), vec![5]);
    }

    #[test]
    fn test_empty_batch() {
        let batch = BatchTransaction::new();
        assert!(batch.is_empty());
        assert_eq!(batch.calls().len(), 0);
    }
}
