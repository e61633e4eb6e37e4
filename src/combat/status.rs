//! Status effects: per-combatant stacking, duration-bounded modifiers.
//!
//! The map is sparse: only active effects have an entry. Merging follows a
//! per-kind rule (see [`StatusKind::merge`]) and decay runs exactly once per
//! turn end, after the turn-end relics have resolved.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::CombatConfig;

/// Kinds of status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Adds its value to outgoing damage per hit.
    Strength,
    /// Multiplies incoming damage by the configured vulnerable multiplier.
    Vulnerable,
    /// Multiplies outgoing damage by the configured weak multiplier.
    Weak,
    /// Adds its value to block gained from cards.
    Fortify,
    /// Loses its value in hp at each turn end, ignoring block.
    Poison,
    /// Queued actions are skipped while active. Duration only.
    Stun,
}

impl StatusKind {
    /// Kinds that carry no value, only a remaining duration.
    #[must_use]
    pub const fn is_duration_only(self) -> bool {
        matches!(self, StatusKind::Stun)
    }

    /// Merge a new application into an existing entry.
    ///
    /// Valued kinds add stacks and refresh duration to the larger of the two.
    /// Duration-only kinds extend the remaining duration.
    #[must_use]
    pub fn merge(self, existing: StatusEntry, amount: i64, duration: u32) -> StatusEntry {
        if self.is_duration_only() {
            StatusEntry {
                value: 0,
                remaining: existing.remaining.saturating_add(duration),
            }
        } else {
            StatusEntry {
                value: existing.value + amount,
                remaining: existing.remaining.max(duration),
            }
        }
    }
}

/// Which combatant a grant lands on, relative to whoever caused it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Actor,
    Opponent,
}

/// A request to apply a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGrant {
    pub kind: StatusKind,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub duration: u32,
    pub target: Target,
}

impl StatusGrant {
    #[must_use]
    pub const fn new(kind: StatusKind, amount: i64, duration: u32, target: Target) -> Self {
        Self { kind, amount, duration, target }
    }
}

/// An active status: stacks (or value) plus remaining turn ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub value: i64,
    pub remaining: u32,
}

/// What a turn-end decay did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecayReport {
    /// Hp the owner loses to poison this turn end.
    pub poison_damage: i64,
    /// Kinds whose duration ran out and were removed.
    pub expired: Vec<StatusKind>,
}

/// Sparse status map for one combatant.
///
/// Backed by `im::OrdMap` so cloning a battle state is O(1) and decay
/// iterates kinds in a fixed order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    entries: OrdMap<StatusKind, StatusEntry>,
}

impl StatusEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a status, merging with any existing entry.
    ///
    /// A zero-duration application is a no-op.
    pub fn apply(&mut self, kind: StatusKind, amount: i64, duration: u32) {
        if duration == 0 {
            return;
        }
        let merged = match self.entries.get(&kind) {
            Some(existing) => kind.merge(*existing, amount, duration),
            None => kind.merge(StatusEntry::default(), amount, duration),
        };
        self.entries.insert(kind, merged);
    }

    /// Get the entry for a kind.
    #[must_use]
    pub fn get(&self, kind: StatusKind) -> Option<&StatusEntry> {
        self.entries.get(&kind)
    }

    /// Get the value for a kind, or 0 if inactive.
    #[must_use]
    pub fn value(&self, kind: StatusKind) -> i64 {
        self.entries.get(&kind).map_or(0, |e| e.value)
    }

    #[must_use]
    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Incoming damage multiplier from statuses.
    #[must_use]
    pub fn incoming_multiplier(&self, config: &CombatConfig) -> f64 {
        if self.is_active(StatusKind::Vulnerable) {
            config.vulnerable_multiplier
        } else {
            1.0
        }
    }

    /// Outgoing damage multiplier from statuses.
    #[must_use]
    pub fn outgoing_multiplier(&self, config: &CombatConfig) -> f64 {
        if self.is_active(StatusKind::Weak) {
            config.weak_multiplier
        } else {
            1.0
        }
    }

    /// Tick every entry down by one turn end.
    ///
    /// Poison is read before its own duration ticks, so a poison applied
    /// with duration 1 still deals its damage once.
    pub fn decay(&mut self) -> DecayReport {
        let mut report = DecayReport {
            poison_damage: self.value(StatusKind::Poison).max(0),
            expired: Vec::new(),
        };

        let mut next = OrdMap::new();
        for (kind, entry) in &self.entries {
            let remaining = entry.remaining.saturating_sub(1);
            if remaining == 0 {
                report.expired.push(*kind);
            } else {
                next.insert(*kind, StatusEntry { value: entry.value, remaining });
            }
        }
        self.entries = next;
        report
    }

    /// Iterate active entries in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (&StatusKind, &StatusEntry)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
