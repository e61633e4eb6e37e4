//! Per-side ether state for one battle.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::combo::ComboName;

use super::slots::{SlotChange, SlotSchedule};

/// Result of folding a new running gain into the turn accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EtherProgress {
    /// Points added to the accumulator.
    pub added: u64,
    /// Bursts fired by this addition.
    pub bursts: u32,
}

/// What a turn commit banked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnCommit {
    pub banked: u64,
    pub total: u64,
    pub slot_change: Option<SlotChange>,
}

/// Ether bookkeeping for one side.
///
/// `accumulated` is the burst accumulator; it only ever drops by whole
/// thresholds, keeping any remainder. Usage counters live for the whole
/// battle and are dropped with it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EtherState {
    pub accumulated: u64,
    /// Running gain already credited this turn.
    pub turn_gain: u64,
    /// Flat ether from relic changes this turn.
    pub turn_bonus: u64,
    pub banked: u64,
    pub slot: u32,
    usage: OrdMap<ComboName, u32>,
}

impl EtherState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Times a combo has been committed this battle.
    #[must_use]
    pub fn usage(&self, combo: ComboName) -> u32 {
        self.usage.get(&combo).copied().unwrap_or(0)
    }

    /// Increment the usage counter of a combo.
    pub fn record_use(&mut self, combo: ComboName) {
        let next = self.usage(combo).saturating_add(1);
        self.usage.insert(combo, next);
    }

    /// Clear usage counters.
    pub fn reset_usage(&mut self) {
        self.usage = OrdMap::new();
    }

    /// Fold the latest running turn gain into the accumulator.
    ///
    /// The running gain never moves backwards; only its increase is added.
    pub fn record_gain(&mut self, running_gain: u64, threshold: u64) -> EtherProgress {
        let added = running_gain.saturating_sub(self.turn_gain);
        self.turn_gain = self.turn_gain.max(running_gain);
        self.accumulate(added, threshold)
    }

    /// Add flat ether from a relic.
    pub fn record_bonus(&mut self, amount: u64, threshold: u64) -> EtherProgress {
        self.turn_bonus = self.turn_bonus.saturating_add(amount);
        self.accumulate(amount, threshold)
    }

    fn accumulate(&mut self, added: u64, threshold: u64) -> EtherProgress {
        self.accumulated = self.accumulated.saturating_add(added);
        let mut bursts = 0;
        if threshold > 0 {
            while self.accumulated >= threshold {
                self.accumulated -= threshold;
                bursts += 1;
            }
        }
        EtherProgress { added, bursts }
    }

    /// Bank this turn's gain and count the turn's combo.
    pub fn commit_turn(&mut self, combo: Option<ComboName>, schedule: &SlotSchedule) -> TurnCommit {
        if let Some(combo) = combo {
            self.record_use(combo);
        }
        let banked = self.turn_gain.saturating_add(self.turn_bonus);
        self.banked = self.banked.saturating_add(banked);
        self.turn_gain = 0;
        self.turn_bonus = 0;

        let slot = schedule.slot_for(self.banked);
        let slot_change = (slot != self.slot).then(|| SlotChange { from: self.slot, to: slot });
        self.slot = slot;

        TurnCommit {
            banked,
            total: self.banked,
            slot_change,
        }
    }

    /// Turn-start reset of the running gain. The burst accumulator keeps
    /// its remainder across turns.
    pub fn begin_turn(&mut self) {
        self.turn_gain = 0;
        self.turn_bonus = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_is_clamped_non_decreasing() {
        let mut state = EtherState::new();
        assert_eq!(state.record_gain(30, 100).added, 30);
        assert_eq!(state.record_gain(20, 100).added, 0);
        assert_eq!(state.record_gain(45, 100).added, 15);
        assert_eq!(state.turn_gain, 45);
        assert_eq!(state.accumulated, 45);
    }

    #[test]
    fn test_burst_carries_remainder() {
        let mut state = EtherState::new();
        state.record_gain(80, 100);
        let progress = state.record_gain(130, 100);

        assert_eq!(progress.bursts, 1);
        assert_eq!(state.accumulated, 30);

        let progress = state.record_bonus(250, 100);
        assert_eq!(progress.bursts, 2);
        assert_eq!(state.accumulated, 80);
    }

    #[test]
    fn test_remainder_survives_turn_start() {
        let mut state = EtherState::new();
        state.record_gain(130, 100);
        state.commit_turn(None, &SlotSchedule::default());
        state.begin_turn();

        assert_eq!(state.accumulated, 30);
        assert_eq!(state.turn_gain, 0);

        // The next turn's first 70 points complete a burst.
        assert_eq!(state.record_gain(70, 100).bursts, 1);
        assert_eq!(state.accumulated, 0);
    }

    #[test]
    fn test_commit_banks_and_changes_slot() {
        let schedule = SlotSchedule::new(vec![50, 100]).unwrap();
        let mut state = EtherState::new();
        state.record_gain(60, 1000);

        let commit = state.commit_turn(Some(ComboName::Pair), &schedule);

        assert_eq!(commit.banked, 60);
        assert_eq!(commit.slot_change, Some(SlotChange { from: 0, to: 1 }));
        assert_eq!(state.usage(ComboName::Pair), 1);
        assert_eq!(state.turn_gain, 0);

        let commit = state.commit_turn(None, &schedule);
        assert_eq!(commit.banked, 0);
        assert_eq!(commit.slot_change, None);
        assert_eq!(state.usage(ComboName::Pair), 1);
    }

    #[test]
    fn test_reset_usage() {
        let mut state = EtherState::new();
        state.record_use(ComboName::Flush);
        state.reset_usage();
        assert_eq!(state.usage(ComboName::Flush), 0);
    }
}
