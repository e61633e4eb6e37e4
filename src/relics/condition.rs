//! Relic conditions.
//!
//! Conditional relics carry a predicate over a [`ConditionContext`], a
//! plain serializable slice of the turn and the relic owner's state built
//! by the engine at the moment the trigger fires.

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::combo::ComboName;

/// A predicate a triggered relic must satisfy to apply its main effect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelicCondition {
    // === Owner State ===

    /// Owner hp is strictly below this percentage of max hp.
    HpBelowPercent(u32),

    /// Owner hp is below max hp.
    IsDamaged,

    /// Unspent energy (after pending same-side actions) is at least N.
    EnergyRemainingAtLeast(u32),

    /// Unspent energy (after pending same-side actions) is at most N.
    EnergyRemainingAtMost(u32),

    // === Turn State ===

    /// At most N attack cards of the owner remain queued.
    AttacksRemainingAtMost(u32),

    /// The card that caused the event has this type.
    CardTypeIs(CardType),

    /// The owner's current combo is this one.
    ComboIs(ComboName),

    /// The turn counter is at least N.
    TurnAtLeast(u32),

    // === Combinators ===

    All(Vec<RelicCondition>),

    Any(Vec<RelicCondition>),

    Not(Box<RelicCondition>),

    // === Special ===

    #[default]
    Always,

    Never,
}

impl RelicCondition {
    /// Create an AND condition.
    pub fn all(conditions: impl IntoIterator<Item = RelicCondition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = RelicCondition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    /// Negate this condition.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    pub fn and(self, other: RelicCondition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }
}

/// State visible to relic conditions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionContext {
    pub turn: u32,
    pub hp: i64,
    pub max_hp: i64,
    pub energy_remaining: u32,
    pub attacks_remaining: u32,
    pub card_type: Option<CardType>,
    pub combo: Option<ComboName>,
}

impl ConditionContext {
    #[must_use]
    pub fn new(turn: u32, hp: i64, max_hp: i64) -> Self {
        Self {
            turn,
            hp,
            max_hp,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_energy_remaining(mut self, energy: u32) -> Self {
        self.energy_remaining = energy;
        self
    }

    #[must_use]
    pub fn with_attacks_remaining(mut self, attacks: u32) -> Self {
        self.attacks_remaining = attacks;
        self
    }

    #[must_use]
    pub fn with_card_type(mut self, card_type: CardType) -> Self {
        self.card_type = Some(card_type);
        self
    }

    #[must_use]
    pub fn with_combo(mut self, combo: Option<ComboName>) -> Self {
        self.combo = combo;
        self
    }
}

/// Evaluator for relic conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check if a condition is satisfied.
    pub fn evaluate(condition: &RelicCondition, ctx: &ConditionContext) -> bool {
        match condition {
            RelicCondition::HpBelowPercent(percent) => {
                ctx.max_hp > 0 && ctx.hp * 100 < ctx.max_hp * i64::from(*percent)
            }

            RelicCondition::IsDamaged => ctx.hp < ctx.max_hp,

            RelicCondition::EnergyRemainingAtLeast(min) => ctx.energy_remaining >= *min,

            RelicCondition::EnergyRemainingAtMost(max) => ctx.energy_remaining <= *max,

            RelicCondition::AttacksRemainingAtMost(max) => ctx.attacks_remaining <= *max,

            RelicCondition::CardTypeIs(card_type) => ctx.card_type == Some(*card_type),

            RelicCondition::ComboIs(combo) => ctx.combo == Some(*combo),

            RelicCondition::TurnAtLeast(turn) => ctx.turn >= *turn,

            RelicCondition::All(conditions) => conditions.iter().all(|c| Self::evaluate(c, ctx)),

            RelicCondition::Any(conditions) => conditions.iter().any(|c| Self::evaluate(c, ctx)),

            RelicCondition::Not(inner) => !Self::evaluate(inner, ctx),

            RelicCondition::Always => true,

            RelicCondition::Never => false,
        }
    }
}
