//! Lookback window of claimable eras.

use std::ops::Range;

use crate::blockchain::types::Era;

/// Number of eras before the active one whose rewards can still be claimed.
pub const REWARD_HISTORY_DEPTH: Era = 84;

/// Half-open range `[start, end)` of eras to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraWindow {
    start: Era,
    end: Era,
}

impl EraWindow {
    /// The [`REWARD_HISTORY_DEPTH`] eras preceding `active_era`.
    ///
    /// Starts at era 0 when the chain is younger than the history depth.
    pub fn preceding(active_era: Era) -> Self {
        Self {
            start: active_era.saturating_sub(REWARD_HISTORY_DEPTH),
            end: active_era,
        }
    }

    pub fn start(&self) -> Era {
        self.start
    }

    pub fn end(&self) -> Era {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Eras in ascending order.
    pub fn eras(&self) -> Range<Era> {
        self.start..self.end
    }
}
