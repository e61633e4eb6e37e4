//! Interchange with the persistent meta-state store.
//!
//! The store hands the battle a read-only [`MetaSnapshot`] at combat start
//! and receives a [`CombatResult`] at combat end. Rewards are produced by an
//! injected [`RewardSource`] so any randomness stays outside the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Rarity};
use crate::combat::Combatant;
use crate::core::{BattleRng, Side};
use crate::relics::RelicId;

use super::state::{BattlePhase, BattleState};

/// Read-only inputs copied in at combat start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaSnapshot {
    /// Deck in draw order.
    pub deck: Vec<CardId>,
    /// Owned relics in persisted display order.
    pub relics: Vec<RelicId>,
    /// Rarity overrides for upgraded cards.
    pub rarities: BTreeMap<CardId, Rarity>,
    pub hp: i64,
    pub max_hp: i64,
    pub max_energy: u32,
}

impl MetaSnapshot {
    /// A snapshot at full hp with an empty deck and no relics.
    #[must_use]
    pub fn new(max_hp: i64, max_energy: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            max_energy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = CardId>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_relics(mut self, relics: impl IntoIterator<Item = RelicId>) -> Self {
        self.relics = relics.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, card: CardId, rarity: Rarity) -> Self {
        self.rarities.insert(card, rarity);
        self
    }

    #[must_use]
    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = hp;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    /// Outcome for a terminal phase.
    #[must_use]
    pub fn from_phase(phase: BattlePhase) -> Option<Self> {
        match phase {
            BattlePhase::Victory => Some(Outcome::Victory),
            BattlePhase::Defeat => Some(Outcome::Defeat),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub gold: u32,
    pub cards: Vec<CardId>,
    pub relics: Vec<RelicId>,
}

/// Record handed back to the meta-state store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub outcome: Outcome,
    pub rewards: Rewards,
    pub final_combatant: Combatant,
    /// Cards exhausted during the battle.
    pub consumed_items: Vec<CardId>,
    pub banked_ether: u64,
    pub turns: u32,
}

/// What survives an aborted battle: only ether already banked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortResult {
    pub banked_ether: u64,
}

/// Produces the rewards part of a combat result.
pub trait RewardSource {
    fn rewards(&mut self, outcome: Outcome, state: &BattleState) -> Rewards;
}

/// The same rewards after every victory; nothing after a defeat.
#[derive(Clone, Debug, Default)]
pub struct FixedRewards {
    pub victory: Rewards,
}

impl FixedRewards {
    #[must_use]
    pub fn new(victory: Rewards) -> Self {
        Self { victory }
    }
}

impl RewardSource for FixedRewards {
    fn rewards(&mut self, outcome: Outcome, _state: &BattleState) -> Rewards {
        match outcome {
            Outcome::Victory => self.victory.clone(),
            Outcome::Defeat => Rewards::default(),
        }
    }
}

/// Seeded random rewards: gold in a range plus card picks from a pool.
///
/// Gold scales with the slot the player reached.
#[derive(Clone, Debug)]
pub struct RollingRewards {
    rng: BattleRng,
    card_pool: Vec<CardId>,
    card_picks: usize,
    gold_min: u32,
    gold_max: u32,
    gold_per_slot: u32,
}

impl RollingRewards {
    #[must_use]
    pub fn new(seed: u64, card_pool: Vec<CardId>) -> Self {
        Self {
            rng: BattleRng::new(seed),
            card_pool,
            card_picks: 1,
            gold_min: 10,
            gold_max: 20,
            gold_per_slot: 5,
        }
    }

    #[must_use]
    pub fn with_gold(mut self, min: u32, max: u32, per_slot: u32) -> Self {
        self.gold_min = min.min(max);
        self.gold_max = max.max(min);
        self.gold_per_slot = per_slot;
        self
    }

    #[must_use]
    pub fn with_card_picks(mut self, picks: usize) -> Self {
        self.card_picks = picks;
        self
    }
}

impl RewardSource for RollingRewards {
    fn rewards(&mut self, outcome: Outcome, state: &BattleState) -> Rewards {
        if outcome == Outcome::Defeat {
            return Rewards::default();
        }
        let slot = state.ether[Side::Player].slot;
        let gold = self.rng.gen_range_inclusive(self.gold_min..=self.gold_max)
            + self.gold_per_slot.saturating_mul(slot);
        let cards = (0..self.card_picks)
            .filter_map(|_| self.rng.choose(&self.card_pool).cloned())
            .collect();
        Rewards {
            gold,
            cards,
            relics: Vec::new(),
        }
    }
}
