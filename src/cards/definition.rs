//! Card definitions - immutable catalog entries.
//!
//! A `CardDefinition` holds everything the engine needs to resolve a card:
//! costs, core numbers (damage, hits, block, counter), trait tags, an
//! optional status application, and an optional special-effect handler.
//! Definitions are never mutated once the catalog is loaded.

use serde::{Deserialize, Serialize};

use crate::combat::{StatusGrant, Target};

/// Unique identifier for a card definition.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Card type. Doubles as the "suit" for combo detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Attack,
    Defense,
    Support,
}

/// Rarity tier. Determines a card's base ether value, independent of
/// the combo the card takes part in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Special,
    Legendary,
}

/// Special handler run after a card's core numbers resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialEffect {
    /// Stun the opponent; their queued actions are skipped while it lasts.
    Stun { duration: u32 },

    /// Strike additional times.
    MultiHit { extra_hits: u32 },

    /// Bonus damage per hit when this is the actor's last attack of the round.
    LastStrike { bonus_damage: i64 },

    /// Move the target side's pending queue entries by `delta` speed.
    TimelineShift { delta: i64, target: Target },

    /// Return the card to hand at the next turn start instead of discarding it.
    Recall,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ether_combat::cards::{CardDefinition, CardType};
///
/// let strike = CardDefinition::new("strike", "Strike", CardType::Attack)
///     .with_costs(1, 4)
///     .with_damage(6, 1);
///
/// assert_eq!(strike.damage, 6);
/// assert!(strike.is_attack());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,

    pub name: String,

    #[serde(rename = "type")]
    pub card_type: CardType,

    /// Energy spent when the card resolves; also the combo "rank".
    #[serde(default)]
    pub action_cost: u32,

    /// Timeline distance the card occupies.
    #[serde(default)]
    pub speed_cost: u32,

    #[serde(default)]
    pub damage: i64,

    #[serde(default = "default_hits")]
    pub hits: u32,

    #[serde(default)]
    pub block: i64,

    /// Counter stacks granted to the actor.
    #[serde(default)]
    pub counter: i64,

    #[serde(default)]
    pub rarity: Rarity,

    #[serde(default)]
    pub traits: Vec<String>,

    #[serde(default)]
    pub status: Option<StatusGrant>,

    #[serde(default)]
    pub special: Option<SpecialEffect>,
}

fn default_hits() -> u32 {
    1
}

impl CardDefinition {
    /// Trait tag marking a card that leaves the deck once resolved.
    pub const EXHAUST: &'static str = "exhaust";

    /// Create a card with zero costs and no effects.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            card_type,
            action_cost: 0,
            speed_cost: 0,
            damage: 0,
            hits: 1,
            block: 0,
            counter: 0,
            rarity: Rarity::Common,
            traits: Vec::new(),
            status: None,
            special: None,
        }
    }

    /// Set action and speed costs (builder pattern).
    #[must_use]
    pub fn with_costs(mut self, action_cost: u32, speed_cost: u32) -> Self {
        self.action_cost = action_cost;
        self.speed_cost = speed_cost;
        self
    }

    /// Set damage per hit and hit count (builder pattern).
    #[must_use]
    pub fn with_damage(mut self, damage: i64, hits: u32) -> Self {
        self.damage = damage;
        self.hits = hits;
        self
    }

    /// Set block gained (builder pattern).
    #[must_use]
    pub fn with_block(mut self, block: i64) -> Self {
        self.block = block;
        self
    }

    /// Set counter stacks gained (builder pattern).
    #[must_use]
    pub fn with_counter(mut self, counter: i64) -> Self {
        self.counter = counter;
        self
    }

    /// Set rarity (builder pattern).
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Add a trait tag (builder pattern).
    #[must_use]
    pub fn with_trait(mut self, tag: impl Into<String>) -> Self {
        self.traits.push(tag.into());
        self
    }

    /// Set the status application (builder pattern).
    #[must_use]
    pub fn with_status(mut self, grant: StatusGrant) -> Self {
        self.status = Some(grant);
        self
    }

    /// Set the special handler (builder pattern).
    #[must_use]
    pub fn with_special(mut self, special: SpecialEffect) -> Self {
        self.special = Some(special);
        self
    }

    #[must_use]
    pub fn is_attack(&self) -> bool {
        self.card_type == CardType::Attack
    }

    #[must_use]
    pub fn has_trait(&self, tag: &str) -> bool {
        self.traits.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::StatusKind;

    #[test]
    fn test_card_id() {
        let id = CardId::new("strike");
        assert_eq!(id.as_str(), "strike");
        assert_eq!(format!("{}", id), "strike");
    }

    #[test]
    fn test_builder() {
        let card = CardDefinition::new("bash", "Bash", CardType::Attack)
            .with_costs(2, 6)
            .with_damage(8, 1)
            .with_rarity(Rarity::Rare)
            .with_trait(CardDefinition::EXHAUST)
            .with_status(StatusGrant::new(StatusKind::Vulnerable, 1, 2, Target::Opponent));

        assert_eq!(card.action_cost, 2);
        assert_eq!(card.speed_cost, 6);
        assert_eq!(card.rarity, Rarity::Rare);
        assert!(card.has_trait("exhaust"));
        assert!(!card.has_trait("retain"));
        assert!(card.status.is_some());
    }

    #[test]
    fn test_json_defaults() {
        let card: CardDefinition = serde_json::from_str(
            r#"{ "id": "guard", "name": "Guard", "type": "defense", "action_cost": 1, "block": 5 }"#,
        )
        .unwrap();

        assert_eq!(card.card_type, CardType::Defense);
        assert_eq!(card.hits, 1);
        assert_eq!(card.rarity, Rarity::Common);
        assert!(card.special.is_none());
    }

    #[test]
    fn test_special_json() {
        let card: CardDefinition = serde_json::from_str(
            r#"{ "id": "feint", "name": "Feint", "type": "support",
                 "special": { "kind": "timeline_shift", "delta": 5, "target": "opponent" } }"#,
        )
        .unwrap();

        assert_eq!(
            card.special,
            Some(SpecialEffect::TimelineShift { delta: 5, target: Target::Opponent })
        );
    }
}
