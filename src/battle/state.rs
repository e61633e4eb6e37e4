//! Battle state: one explicit value owned by the engine.
//!
//! ## BattleState
//!
//! Everything a battle needs between steps:
//! - Phase, turn counter and per-round limits
//! - Both combatants and both sides' ether
//! - The player's piles and the opponent's card pool
//! - Owned relics (in display order) and the round's queue
//!
//! Collections are `im` persistent structures, so the step function can
//! clone the prior state cheaply and return a new one. A state serializes
//! to a bincode checkpoint and back without loss.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, CardId, Rarity};
use crate::combat::Combatant;
use crate::combo::ComboName;
use crate::core::{CombatConfig, Side, SideMap};
use crate::ether::EtherState;
use crate::relics::{PassiveStats, RelicPipeline};

use super::enemy::EnemyDefinition;
use super::meta::MetaSnapshot;
use super::piles::Piles;
use super::queue::ActionQueue;
use super::tables::CombatTables;

/// Phase of the battle state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Select,
    Respond,
    Resolve,
    Victory,
    Defeat,
}

impl BattlePhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat)
    }
}

impl std::fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BattlePhase::Select => "select",
            BattlePhase::Respond => "respond",
            BattlePhase::Resolve => "resolve",
            BattlePhase::Victory => "victory",
            BattlePhase::Defeat => "defeat",
        };
        f.write_str(name)
    }
}

/// Per-battle submission limits after passive relic bonuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitLimits {
    pub max_cards: usize,
    pub max_speed: u32,
    pub hand_size: usize,
}

impl SubmitLimits {
    #[must_use]
    pub fn new(config: &CombatConfig, passive: &PassiveStats) -> Self {
        let adjust = |base: i64, bonus: i64, floor: i64| (base + bonus).max(floor);
        Self {
            max_cards: adjust(config.max_submit_cards as i64, passive.max_submit_cards, 1) as usize,
            max_speed: adjust(i64::from(config.max_speed), passive.max_speed, 0).min(i64::from(u32::MAX)) as u32,
            hand_size: adjust(config.hand_size as i64, passive.hand_size, 0) as usize,
        }
    }
}

/// Complete state of one battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub phase: BattlePhase,

    /// Turn number (starts at 1).
    pub turn: u32,

    pub limits: SubmitLimits,

    pub combatants: SideMap<Combatant>,

    pub ether: SideMap<EtherState>,

    pub piles: Piles,

    pub enemy_id: String,

    pub enemy_pool: Vector<CardId>,

    pub enemy_max_cards: usize,

    pub relics: RelicPipeline,

    /// Rarity overrides from the meta snapshot (upgrades).
    pub rarities: OrdMap<CardId, Rarity>,

    pub queue: ActionQueue,

    /// This round's selections, in submission order.
    pub submitted: SideMap<Vector<CardId>>,

    /// Cards each side has resolved this turn.
    pub consumed: SideMap<Vector<CardId>>,

    /// Combo over `consumed`, as last detected.
    pub combos: SideMap<Option<ComboName>>,

    /// Hand before the pending submission, kept until resolution starts.
    pub pre_submit_hand: Option<Vector<CardId>>,

    pub rewinds_left: u32,

    pub redraws_left: u32,

    /// Set once the combat-end relics have run and a result was produced.
    pub finished: bool,
}

impl BattleState {
    /// Build the initial state. No relic has fired and no card is drawn yet.
    #[must_use]
    pub fn new(tables: &CombatTables, snapshot: &MetaSnapshot, enemy: &EnemyDefinition) -> Self {
        let relics = RelicPipeline::new(&tables.relics, snapshot.relics.iter().cloned());
        let passive = relics.passive().clone();

        let max_hp = (snapshot.max_hp + passive.max_hp).max(1);
        let max_energy = (i64::from(snapshot.max_energy) + passive.max_energy).clamp(0, i64::from(u32::MAX)) as u32;
        let mut player = Combatant::new(max_hp, max_energy).with_hp(snapshot.hp);
        player.strength = passive.strength;

        let enemy_combatant = Combatant::new(enemy.hp, enemy.energy);

        Self {
            phase: BattlePhase::Select,
            turn: 1,
            limits: SubmitLimits::new(&tables.config, &passive),
            combatants: SideMap::from_pair(player, enemy_combatant),
            ether: SideMap::default(),
            piles: Piles::from_deck(snapshot.deck.iter().cloned()),
            enemy_id: enemy.id.clone(),
            enemy_pool: enemy.cards.iter().cloned().collect(),
            enemy_max_cards: enemy.max_cards,
            relics,
            rarities: snapshot.rarities.iter().map(|(id, r)| (id.clone(), *r)).collect(),
            queue: ActionQueue::new(),
            submitted: SideMap::default(),
            consumed: SideMap::default(),
            combos: SideMap::default(),
            pre_submit_hand: None,
            rewinds_left: tables.config.rewinds_per_battle,
            redraws_left: tables.config.redraws_per_turn,
            finished: false,
        }
    }

    #[must_use]
    pub fn player(&self) -> &Combatant {
        &self.combatants[Side::Player]
    }

    #[must_use]
    pub fn enemy(&self) -> &Combatant {
        &self.combatants[Side::Enemy]
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Effective rarity of a card, after upgrades.
    #[must_use]
    pub fn rarity_of(&self, card: &CardDefinition) -> Rarity {
        self.rarities.get(&card.id).copied().unwrap_or(card.rarity)
    }

    /// Serialize to a compact checkpoint.
    pub fn to_checkpoint(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Restore from a checkpoint.
    pub fn from_checkpoint(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardType};
    use crate::relics::{RelicCatalog, RelicDefinition, RelicId};

    fn tables() -> CombatTables {
        let mut cards = CardCatalog::new();
        cards
            .register(CardDefinition::new("strike", "Strike", CardType::Attack).with_damage(6, 1))
            .unwrap();
        let mut relics = RelicCatalog::new();
        let stats = PassiveStats {
            max_energy: 1,
            max_hp: 10,
            max_submit_cards: 2,
            ..PassiveStats::default()
        };
        relics.register(RelicDefinition::passive("crown", "Crown", stats)).unwrap();
        CombatTables::new(cards, relics)
    }

    #[test]
    fn test_new_applies_passives() {
        let tables = tables();
        let snapshot = MetaSnapshot::new(40, 3)
            .with_deck([CardId::new("strike")])
            .with_relics([RelicId::new("crown")]);
        let enemy = EnemyDefinition::new("slime", "Slime", 20);

        let state = BattleState::new(&tables, &snapshot, &enemy);

        assert_eq!(state.player().max_hp, 50);
        assert_eq!(state.player().hp, 40);
        assert_eq!(state.player().max_energy, 4);
        assert_eq!(state.limits.max_cards, 3);
        assert_eq!(state.enemy().hp, 20);
        assert_eq!(state.phase, BattlePhase::Select);
        assert_eq!(state.piles.draw.len(), 1);
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let tables = tables();
        let snapshot = MetaSnapshot::new(30, 3).with_deck([CardId::new("strike")]);
        let state = BattleState::new(&tables, &snapshot, &EnemyDefinition::new("slime", "Slime", 20));

        let bytes = state.to_checkpoint().unwrap();
        let restored = BattleState::from_checkpoint(&bytes).unwrap();
        assert_eq!(state, restored);
    }

    #[test]
    fn test_rarity_override() {
        let tables = tables();
        let snapshot = MetaSnapshot::new(30, 3).with_rarity(CardId::new("strike"), Rarity::Legendary);
        let state = BattleState::new(&tables, &snapshot, &EnemyDefinition::new("slime", "Slime", 20));
        let strike = tables.cards.get(&CardId::new("strike")).unwrap();

        assert_eq!(state.rarity_of(strike), Rarity::Legendary);
    }
}
