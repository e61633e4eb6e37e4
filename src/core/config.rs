//! Combat configuration.
//!
//! Hosts configure the engine once per run by providing a `CombatConfig`.
//! Every field has a default, so a JSON document only needs to name the
//! values it overrides:
//!
//! ```
//! use ether_combat::core::CombatConfig;
//!
//! let config = CombatConfig::from_json(r#"{ "max_submit_cards": 3 }"#).unwrap();
//! assert_eq!(config.max_submit_cards, 3);
//! assert_eq!(config.burst_threshold, 100);
//! ```

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// Numeric rules of a battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Cards the player may submit per round before relic bonuses.
    pub max_submit_cards: usize,

    /// Summed speedCost cap for one submission before relic bonuses.
    pub max_speed: u32,

    /// Cards drawn into the player's hand at each turn start.
    pub hand_size: usize,

    /// Per-turn ether accumulation that triggers a burst.
    pub burst_threshold: u64,

    /// Damage dealt to the opposing side when a burst fires.
    pub burst_damage: i64,

    /// Per-use factor applied to repeated combos (`base ^ usage`).
    pub deflation_base: f64,

    /// Smallest gain a deflated, non-zero combo gain may round down to.
    pub min_deflated_gain: u64,

    /// Reference-book multiplier step per card.
    pub reference_book_per_card: f64,

    /// How many times per battle the player may rewind `respond -> select`.
    pub rewinds_per_battle: u32,

    /// How many times per turn the player may redraw the hand.
    pub redraws_per_turn: u32,

    /// Incoming damage multiplier while the Vulnerable status is active.
    pub vulnerable_multiplier: f64,

    /// Outgoing damage multiplier while the Weak status is active.
    pub weak_multiplier: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_submit_cards: 1,
            max_speed: 30,
            hand_size: 5,
            burst_threshold: 100,
            burst_damage: 10,
            deflation_base: 0.5,
            min_deflated_gain: 0,
            reference_book_per_card: 0.1,
            rewinds_per_battle: 1,
            redraws_per_turn: 1,
            vulnerable_multiplier: 1.5,
            weak_multiplier: 0.75,
        }
    }
}

impl CombatConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the submit cap.
    #[must_use]
    pub fn with_max_submit_cards(mut self, max: usize) -> Self {
        self.max_submit_cards = max;
        self
    }

    /// Set the speed cap.
    #[must_use]
    pub fn with_max_speed(mut self, max: u32) -> Self {
        self.max_speed = max;
        self
    }

    /// Set the hand size.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    /// Set the burst threshold and damage.
    #[must_use]
    pub fn with_burst(mut self, threshold: u64, damage: i64) -> Self {
        self.burst_threshold = threshold;
        self.burst_damage = damage;
        self
    }

    /// Set the floor for deflated gains.
    #[must_use]
    pub fn with_min_deflated_gain(mut self, min: u64) -> Self {
        self.min_deflated_gain = min;
        self
    }

    /// Set the rewind allowance.
    #[must_use]
    pub fn with_rewinds(mut self, rewinds: u32) -> Self {
        self.rewinds_per_battle = rewinds;
        self
    }
}
