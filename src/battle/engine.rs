//! The turn resolution engine.
//!
//! `TurnEngine` owns one battle: the shared tables, the current state, the
//! injected opponent and the events not yet collected by the host. It drives
//! the phase machine
//!
//! ```text
//! select -> respond -> resolve -> select ... -> victory | defeat
//! ```
//!
//! and rejects any command issued in the wrong phase without touching the
//! state. Resolution itself is delegated to the pure [`step`](super::step::step)
//! function; the engine only swaps in the state each step returns.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use ether_combat::battle::{
//!     BattlePhase, CombatTables, EnemyDefinition, MetaSnapshot, ScriptedOpponent, TurnEngine,
//! };
//! use ether_combat::cards::{CardCatalog, CardDefinition, CardId, CardType};
//! use ether_combat::relics::RelicCatalog;
//!
//! let mut cards = CardCatalog::new();
//! cards
//!     .register(CardDefinition::new("strike", "Strike", CardType::Attack).with_costs(1, 3).with_damage(6, 1))
//!     .unwrap();
//! let tables = Arc::new(CombatTables::new(cards, RelicCatalog::new()));
//!
//! let snapshot = MetaSnapshot::new(30, 3).with_deck(vec![CardId::new("strike"); 5]);
//! let enemy = EnemyDefinition::new("dummy", "Dummy", 6);
//! let mut engine = TurnEngine::start(tables, &snapshot, &enemy, Box::new(ScriptedOpponent::idle()));
//!
//! engine.submit(&[0]).unwrap();
//! engine.begin_resolve().unwrap();
//! engine.resolve_all();
//!
//! assert_eq!(engine.phase(), BattlePhase::Victory);
//! ```

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::cards::{CardDefinition, CardId};
use crate::combo::{ComboDetector, ComboResult};
use crate::core::{CommandError, Side, SubmitError};
use crate::ether::EtherGain;

use super::enemy::EnemyDefinition;
use super::event::BattleEvent;
use super::meta::{AbortResult, CombatResult, MetaSnapshot, Outcome, RewardSource};
use super::opponent::{OpponentDecision, OpponentView};
use super::state::{BattlePhase, BattleState};
use super::step::{build_queue, end_combat, start_combat, step};
use super::tables::CombatTables;

/// Live preview of a selection: combo and ether, computed read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionPreview {
    pub combo: Option<ComboResult>,
    pub ether: EtherGain,
}

/// Drives one battle.
pub struct TurnEngine {
    tables: Arc<CombatTables>,
    state: BattleState,
    opponent: Box<dyn OpponentDecision>,
    events: Vec<BattleEvent>,
}

impl TurnEngine {
    /// Start a battle: fires combat-start and turn-start relics and draws
    /// the first hand.
    pub fn start(
        tables: Arc<CombatTables>,
        snapshot: &MetaSnapshot,
        enemy: &EnemyDefinition,
        opponent: Box<dyn OpponentDecision>,
    ) -> Self {
        let outcome = start_combat(&tables, snapshot, enemy);
        debug!(enemy = %enemy.id, "combat started");
        Self {
            tables,
            state: outcome.state,
            opponent,
            events: outcome.events,
        }
    }

    /// Continue a battle from a saved state.
    pub fn resume(tables: Arc<CombatTables>, state: BattleState, opponent: Box<dyn OpponentDecision>) -> Self {
        Self {
            tables,
            state,
            opponent,
            events: Vec::new(),
        }
    }

    /// Continue a battle from a bincode checkpoint.
    pub fn from_checkpoint(
        tables: Arc<CombatTables>,
        bytes: &[u8],
        opponent: Box<dyn OpponentDecision>,
    ) -> Result<Self, bincode::Error> {
        let state = BattleState::from_checkpoint(bytes)?;
        Ok(Self::resume(tables, state, opponent))
    }

    pub fn checkpoint(&self) -> Result<Vec<u8>, bincode::Error> {
        self.state.to_checkpoint()
    }

    #[must_use]
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    #[must_use]
    pub fn tables(&self) -> &CombatTables {
        &self.tables
    }

    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_phase(&mut self, to: BattlePhase) {
        let from = self.state.phase;
        self.state.phase = to;
        self.events.push(BattleEvent::PhaseChanged { from, to });
    }

    fn require_phase(&self, expected: BattlePhase) -> Result<(), CommandError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(CommandError::WrongPhase {
                expected,
                actual: self.state.phase,
            })
        }
    }

    // === Select ===

    /// Preview the combo and ether a selection of hand cards would yield.
    ///
    /// Returns `None` if an index is out of range or names an unknown card.
    #[must_use]
    pub fn preview(&self, hand_indices: &[usize]) -> Option<SelectionPreview> {
        let cards = self.hand_cards(hand_indices)?;
        let combo = ComboDetector::detect(&cards);
        let ether = self.tables.economy().preview(
            &cards,
            |c| self.state.rarity_of(c),
            self.state.relics.passive().card_multiplier(),
            &self.state.relics.ether_modifiers(),
            &self.state.ether[Side::Player],
        );
        Some(SelectionPreview { combo, ether })
    }

    fn hand_cards(&self, hand_indices: &[usize]) -> Option<Vec<&CardDefinition>> {
        hand_indices
            .iter()
            .map(|&i| self.state.piles.hand.get(i).and_then(|id| self.tables.cards.get(id)))
            .collect()
    }

    /// Submit hand cards for this round. On success the opponent chooses its
    /// cards and the battle moves to `respond`; on failure nothing changes.
    pub fn submit(&mut self, hand_indices: &[usize]) -> Result<(), SubmitError> {
        self.validate_submission(hand_indices)?;

        let hand_before = self.state.piles.hand.clone();
        let taken = self.state.piles.take_from_hand(hand_indices);
        self.state.pre_submit_hand = Some(hand_before);
        self.state.submitted[Side::Player] = taken.into_iter().collect();

        let enemy_cards = self.choose_enemy_cards();
        self.state.submitted[Side::Enemy] = enemy_cards.into_iter().collect();

        debug!(turn = self.state.turn, "selection submitted");
        self.set_phase(BattlePhase::Respond);
        Ok(())
    }

    fn validate_submission(&self, hand_indices: &[usize]) -> Result<(), SubmitError> {
        if self.state.phase != BattlePhase::Select {
            return Err(SubmitError::WrongPhase(self.state.phase));
        }
        if hand_indices.is_empty() {
            return Err(SubmitError::EmptySelection);
        }
        let limits = self.state.limits;
        if hand_indices.len() > limits.max_cards {
            return Err(SubmitError::TooManyCards {
                max: limits.max_cards,
                got: hand_indices.len(),
            });
        }

        let mut seen = FxHashSet::default();
        let mut energy = 0u32;
        let mut speed = 0u32;
        for &index in hand_indices {
            if !seen.insert(index) {
                return Err(SubmitError::DuplicateIndex(index));
            }
            let id = self
                .state
                .piles
                .hand
                .get(index)
                .ok_or(SubmitError::UnknownHandIndex(index))?;
            let card = self
                .tables
                .cards
                .get(id)
                .ok_or_else(|| SubmitError::UnknownCard(id.to_string()))?;
            energy = energy.saturating_add(card.action_cost);
            speed = speed.saturating_add(card.speed_cost);
        }

        let available = self.state.player().energy;
        if energy > available {
            return Err(SubmitError::NotEnoughEnergy {
                needed: energy,
                available,
            });
        }
        if speed > limits.max_speed {
            return Err(SubmitError::SpeedExceeded {
                max: limits.max_speed,
                total: speed,
            });
        }
        Ok(())
    }

    /// Ask the opponent, then trim its answer to known, affordable cards
    /// within its per-round cap.
    fn choose_enemy_cards(&mut self) -> Vec<CardId> {
        let pool: Vec<CardId> = self.state.enemy_pool.iter().cloned().collect();
        let view = OpponentView {
            turn: self.state.turn,
            enemy: self.state.enemy(),
            player: self.state.player(),
            pool: &pool,
            max_cards: self.state.enemy_max_cards,
            cards: &self.tables.cards,
        };
        let chosen = self.opponent.choose(&view);

        let mut energy = self.state.enemy().energy;
        let mut accepted = Vec::new();
        for id in chosen {
            if accepted.len() >= self.state.enemy_max_cards {
                warn!(card = %id, "opponent exceeded its card cap; extra card dropped");
                break;
            }
            let Some(card) = self.tables.cards.get(&id) else {
                warn!(card = %id, "opponent chose an unknown card; ignored");
                continue;
            };
            if card.action_cost > energy {
                warn!(card = %id, "opponent cannot afford card; ignored");
                continue;
            }
            energy -= card.action_cost;
            accepted.push(id);
        }
        accepted
    }

    /// Draw a fresh hand. Limited per turn.
    pub fn redraw(&mut self) -> Result<(), CommandError> {
        self.require_phase(BattlePhase::Select)?;
        if self.state.redraws_left == 0 {
            return Err(CommandError::Exhausted("redraws"));
        }
        self.state.redraws_left -= 1;
        self.state.piles.discard_hand();
        let count = self.state.piles.draw(self.state.limits.hand_size);
        self.events.push(BattleEvent::CardsDrawn { count });
        Ok(())
    }

    // === Respond ===

    /// Take back the submission and return to `select`. Limited per battle.
    pub fn rewind(&mut self) -> Result<(), CommandError> {
        self.require_phase(BattlePhase::Respond)?;
        if self.state.rewinds_left == 0 {
            return Err(CommandError::Exhausted("rewinds"));
        }
        let Some(hand) = self.state.pre_submit_hand.take() else {
            return Err(CommandError::Exhausted("saved hand"));
        };
        self.state.rewinds_left -= 1;
        self.state.piles.hand = hand;
        self.state.submitted = Default::default();
        self.set_phase(BattlePhase::Select);
        Ok(())
    }

    /// Build the round's queue and enter `resolve`.
    pub fn begin_resolve(&mut self) -> Result<(), CommandError> {
        self.require_phase(BattlePhase::Respond)?;
        self.state.queue = build_queue(&self.tables, &self.state);
        self.state.pre_submit_hand = None;
        debug!(actions = self.state.queue.len(), "queue built");
        self.set_phase(BattlePhase::Resolve);
        Ok(())
    }

    // === Resolve ===

    /// Resolve one action, or run the end-of-round transition once the
    /// queue is empty. Returns false when there was nothing to do.
    pub fn step(&mut self) -> bool {
        if self.state.phase != BattlePhase::Resolve {
            return false;
        }
        let outcome = step(&self.tables, &self.state);
        self.state = outcome.state;
        self.events.extend(outcome.events);
        true
    }

    /// Step until the round is over or the battle has ended.
    pub fn resolve_all(&mut self) {
        while self.step() {}
    }

    // === End ===

    /// Run the combat-end relics and produce the result record.
    pub fn finish(&mut self, rewards: &mut dyn RewardSource) -> Result<CombatResult, CommandError> {
        let Some(outcome) = Outcome::from_phase(self.state.phase) else {
            return Err(CommandError::NotTerminal(self.state.phase));
        };
        if self.state.finished {
            return Err(CommandError::Exhausted("combat result"));
        }

        let ended = end_combat(&self.tables, &self.state);
        self.state = ended.state;
        self.events.extend(ended.events);

        let player = self.state.player().clone();
        debug!(?outcome, turns = self.state.turn, "combat finished");
        Ok(CombatResult {
            outcome,
            rewards: rewards.rewards(outcome, &self.state),
            final_combatant: player,
            consumed_items: self.state.piles.exhaust.iter().cloned().collect(),
            banked_ether: self.state.ether[Side::Player].banked,
            turns: self.state.turn,
        })
    }

    /// Abandon the battle. Only ether already banked survives.
    #[must_use]
    pub fn abort(self) -> AbortResult {
        debug!(phase = %self.state.phase, "combat aborted");
        AbortResult {
            banked_ether: self.state.ether[Side::Player].banked,
        }
    }
}

impl std::fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnEngine")
            .field("state", &self.state)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}
