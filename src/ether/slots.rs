//! Slot schedule: banked ether to tier.
//!
//! A schedule is a strictly increasing list of cumulative ether totals.
//! The slot for a banked total is the number of thresholds it has reached.

use serde::{Deserialize, Serialize};

use crate::core::CatalogError;

/// Strictly increasing cumulative-cost schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct SlotSchedule {
    thresholds: Vec<u64>,
}

/// A change of slot caused by banking ether.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChange {
    pub from: u32,
    pub to: u32,
}

impl SlotSchedule {
    /// Build a schedule, rejecting thresholds that do not strictly increase.
    pub fn new(thresholds: Vec<u64>) -> Result<Self, CatalogError> {
        let mut previous = 0;
        for (index, &value) in thresholds.iter().enumerate() {
            if value <= previous {
                return Err(CatalogError::NonIncreasingSlots { index, value, previous });
            }
            previous = value;
        }
        Ok(Self { thresholds })
    }

    /// Load from a JSON array of thresholds.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let thresholds: Vec<u64> = serde_json::from_str(json)?;
        Self::new(thresholds)
    }

    /// Slot reached by a banked total.
    #[must_use]
    pub fn slot_for(&self, banked: u64) -> u32 {
        self.thresholds.partition_point(|&t| t <= banked) as u32
    }

    /// Cumulative total needed to reach the slot after `slot`, if any.
    #[must_use]
    pub fn next_threshold(&self, slot: u32) -> Option<u64> {
        self.thresholds.get(slot as usize).copied()
    }

    #[must_use]
    pub fn max_slot(&self) -> u32 {
        self.thresholds.len() as u32
    }

    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }
}

impl Default for SlotSchedule {
    fn default() -> Self {
        Self {
            thresholds: vec![100, 250, 450, 700, 1000],
        }
    }
}

impl TryFrom<Vec<u64>> for SlotSchedule {
    type Error = CatalogError;

    fn try_from(thresholds: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(thresholds)
    }
}

impl From<SlotSchedule> for Vec<u64> {
    fn from(schedule: SlotSchedule) -> Self {
        schedule.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_for() {
        let schedule = SlotSchedule::new(vec![10, 30, 60]).unwrap();

        assert_eq!(schedule.slot_for(0), 0);
        assert_eq!(schedule.slot_for(9), 0);
        assert_eq!(schedule.slot_for(10), 1);
        assert_eq!(schedule.slot_for(59), 2);
        assert_eq!(schedule.slot_for(1000), 3);
        assert_eq!(schedule.next_threshold(1), Some(30));
        assert_eq!(schedule.next_threshold(3), None);
    }

    #[test]
    fn test_rejects_non_increasing() {
        let err = SlotSchedule::new(vec![10, 10]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NonIncreasingSlots { index: 1, value: 10, previous: 10 }
        ));
        assert!(SlotSchedule::new(vec![0]).is_err());
    }

    #[test]
    fn test_json() {
        let schedule = SlotSchedule::from_json("[5, 15]").unwrap();
        assert_eq!(schedule.max_slot(), 2);
        assert!(SlotSchedule::from_json("[15, 5]").is_err());
        assert!(serde_json::from_str::<SlotSchedule>("[3, 2]").is_err());
    }
}
