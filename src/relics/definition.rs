//! Relic definitions.
//!
//! A relic has exactly one trigger. Passive relics carry stat deltas and an
//! optional ether modifier; every other trigger carries a change record that
//! the engine applies when the trigger's event happens.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Rarity;
use crate::combat::StatusGrant;
use crate::ether::EtherModifier;

use super::condition::RelicCondition;

/// Identifier for relic definitions.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelicId(pub String);

impl RelicId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RelicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelicId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The closed set of relic triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelicTrigger {
    Passive,
    OnCombatStart,
    OnCombatEnd,
    OnTurnStart,
    OnTurnEnd,
    OnCardPlayed,
    OnDamageTaken,
    OnCombo,
    OnGraceGain,
    OnTokenGain,
    OnRelicActivate,
    OnCardExhaust,
    OnDeath,
    OnNodeMove,
}

impl RelicTrigger {
    pub const ALL: [RelicTrigger; 14] = [
        RelicTrigger::Passive,
        RelicTrigger::OnCombatStart,
        RelicTrigger::OnCombatEnd,
        RelicTrigger::OnTurnStart,
        RelicTrigger::OnTurnEnd,
        RelicTrigger::OnCardPlayed,
        RelicTrigger::OnDamageTaken,
        RelicTrigger::OnCombo,
        RelicTrigger::OnGraceGain,
        RelicTrigger::OnTokenGain,
        RelicTrigger::OnRelicActivate,
        RelicTrigger::OnCardExhaust,
        RelicTrigger::OnDeath,
        RelicTrigger::OnNodeMove,
    ];

    /// The catalog tag, e.g. `ON_TURN_START`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            RelicTrigger::Passive => "PASSIVE",
            RelicTrigger::OnCombatStart => "ON_COMBAT_START",
            RelicTrigger::OnCombatEnd => "ON_COMBAT_END",
            RelicTrigger::OnTurnStart => "ON_TURN_START",
            RelicTrigger::OnTurnEnd => "ON_TURN_END",
            RelicTrigger::OnCardPlayed => "ON_CARD_PLAYED",
            RelicTrigger::OnDamageTaken => "ON_DAMAGE_TAKEN",
            RelicTrigger::OnCombo => "ON_COMBO",
            RelicTrigger::OnGraceGain => "ON_GRACE_GAIN",
            RelicTrigger::OnTokenGain => "ON_TOKEN_GAIN",
            RelicTrigger::OnRelicActivate => "ON_RELIC_ACTIVATE",
            RelicTrigger::OnCardExhaust => "ON_CARD_EXHAUST",
            RelicTrigger::OnDeath => "ON_DEATH",
            RelicTrigger::OnNodeMove => "ON_NODE_MOVE",
        }
    }

    /// Parse a catalog tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

impl std::fmt::Display for RelicTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Continuously summed stat deltas from passive relics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PassiveStats {
    pub max_energy: i64,
    pub max_hp: i64,
    pub max_submit_cards: i64,
    pub max_speed: i64,
    pub hand_size: i64,
    pub strength: i64,
    /// Added to the 1.0 per-card ether multiplier.
    pub ether_card_multiplier: f64,
}

impl PassiveStats {
    /// Add another set of deltas.
    pub fn merge(&mut self, other: &PassiveStats) {
        self.max_energy += other.max_energy;
        self.max_hp += other.max_hp;
        self.max_submit_cards += other.max_submit_cards;
        self.max_speed += other.max_speed;
        self.hand_size += other.hand_size;
        self.strength += other.strength;
        self.ether_card_multiplier += other.ether_card_multiplier;
    }

    /// Per-card ether multiplier (1.0 with no relics).
    #[must_use]
    pub fn card_multiplier(&self) -> f64 {
        1.0 + self.ether_card_multiplier
    }
}

/// Additive deltas a triggered relic asks the engine to apply.
///
/// Amounts are relative to the relic's owner; `damage` hits the opposing
/// side and statuses land per their own target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelicChanges {
    pub heal: i64,
    pub block: i64,
    pub strength: i64,
    pub energy: i64,
    pub ether: u64,
    pub counter: i64,
    pub damage: i64,
    pub statuses: SmallVec<[StatusGrant; 2]>,
}

impl RelicChanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_heal(mut self, heal: i64) -> Self {
        self.heal = heal;
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: i64) -> Self {
        self.block = block;
        self
    }

    #[must_use]
    pub fn with_strength(mut self, strength: i64) -> Self {
        self.strength = strength;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy: i64) -> Self {
        self.energy = energy;
        self
    }

    #[must_use]
    pub fn with_ether(mut self, ether: u64) -> Self {
        self.ether = ether;
        self
    }

    #[must_use]
    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = damage;
        self
    }

    #[must_use]
    pub fn with_status(mut self, grant: StatusGrant) -> Self {
        self.statuses.push(grant);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A triggered relic's effect: changes applied when the condition holds,
/// and an optional alternate when it does not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggeredEffect {
    pub changes: RelicChanges,
    pub condition: RelicCondition,
    pub fallback: Option<RelicChanges>,
}

/// What a relic does, keyed by trigger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RelicEffect {
    Passive {
        stats: PassiveStats,
        ether: Option<EtherModifier>,
    },
    Triggered {
        trigger: RelicTrigger,
        effect: TriggeredEffect,
    },
}

/// Static relic definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelicDefinition {
    pub id: RelicId,
    pub name: String,
    pub rarity: Rarity,
    pub effect: RelicEffect,
}

impl RelicDefinition {
    /// A passive relic.
    #[must_use]
    pub fn passive(id: impl Into<String>, name: impl Into<String>, stats: PassiveStats) -> Self {
        Self {
            id: RelicId::new(id),
            name: name.into(),
            rarity: Rarity::Common,
            effect: RelicEffect::Passive { stats, ether: None },
        }
    }

    /// A passive relic that only modifies ether gain.
    #[must_use]
    pub fn ether(id: impl Into<String>, name: impl Into<String>, modifier: EtherModifier) -> Self {
        Self {
            id: RelicId::new(id),
            name: name.into(),
            rarity: Rarity::Common,
            effect: RelicEffect::Passive {
                stats: PassiveStats::default(),
                ether: Some(modifier),
            },
        }
    }

    /// A triggered relic with an unconditional effect.
    ///
    /// Passing `RelicTrigger::Passive` produces a passive relic with no stats.
    #[must_use]
    pub fn triggered(
        id: impl Into<String>,
        name: impl Into<String>,
        trigger: RelicTrigger,
        changes: RelicChanges,
    ) -> Self {
        let effect = if trigger == RelicTrigger::Passive {
            RelicEffect::Passive {
                stats: PassiveStats::default(),
                ether: None,
            }
        } else {
            RelicEffect::Triggered {
                trigger,
                effect: TriggeredEffect {
                    changes,
                    condition: RelicCondition::Always,
                    fallback: None,
                },
            }
        };
        Self {
            id: RelicId::new(id),
            name: name.into(),
            rarity: Rarity::Common,
            effect,
        }
    }

    /// Gate a triggered effect on a condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: RelicCondition, fallback: Option<RelicChanges>) -> Self {
        if let RelicEffect::Triggered { effect, .. } = &mut self.effect {
            effect.condition = condition;
            effect.fallback = fallback;
        }
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn trigger(&self) -> RelicTrigger {
        match &self.effect {
            RelicEffect::Passive { .. } => RelicTrigger::Passive,
            RelicEffect::Triggered { trigger, .. } => *trigger,
        }
    }
}
