//! Opponent decision suppliers.
//!
//! The engine asks an [`OpponentDecision`] for the opponent's cards once per
//! round, before the respond phase. It assumes nothing about the strategy;
//! whatever comes back is trimmed to known cards, the per-round cap and the
//! opponent's energy.

use crate::cards::{CardCatalog, CardId};
use crate::combat::Combatant;
use crate::core::BattleRng;

/// What a decision supplier may look at.
pub struct OpponentView<'a> {
    pub turn: u32,
    pub enemy: &'a Combatant,
    pub player: &'a Combatant,
    /// Cards the opponent may choose from.
    pub pool: &'a [CardId],
    pub max_cards: usize,
    pub cards: &'a CardCatalog,
}

/// Chooses the opponent's cards for a round.
pub trait OpponentDecision {
    fn choose(&mut self, view: &OpponentView<'_>) -> Vec<CardId>;
}

impl<F> OpponentDecision for F
where
    F: FnMut(&OpponentView<'_>) -> Vec<CardId>,
{
    fn choose(&mut self, view: &OpponentView<'_>) -> Vec<CardId> {
        self(view)
    }
}

/// Plays a fixed script, one entry per round, cycling.
#[derive(Clone, Debug, Default)]
pub struct ScriptedOpponent {
    rounds: Vec<Vec<CardId>>,
    next: usize,
}

impl ScriptedOpponent {
    #[must_use]
    pub fn new(rounds: Vec<Vec<CardId>>) -> Self {
        Self { rounds, next: 0 }
    }

    /// Play the same card every round.
    #[must_use]
    pub fn repeat(card: impl Into<String>) -> Self {
        Self::new(vec![vec![CardId::new(card)]])
    }

    /// Never play anything.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }
}

impl OpponentDecision for ScriptedOpponent {
    fn choose(&mut self, _view: &OpponentView<'_>) -> Vec<CardId> {
        if self.rounds.is_empty() {
            return Vec::new();
        }
        let round = self.rounds[self.next % self.rounds.len()].clone();
        self.next += 1;
        round
    }
}

/// Picks random affordable cards from the pool.
#[derive(Clone, Debug)]
pub struct RandomOpponent {
    rng: BattleRng,
}

impl RandomOpponent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: BattleRng::new(seed),
        }
    }
}

impl OpponentDecision for RandomOpponent {
    fn choose(&mut self, view: &OpponentView<'_>) -> Vec<CardId> {
        let mut energy = view.enemy.energy;
        let mut chosen = Vec::new();
        for _ in 0..view.max_cards {
            let affordable: Vec<&CardId> = view
                .pool
                .iter()
                .filter(|id| view.cards.get(id).is_some_and(|c| c.action_cost <= energy))
                .collect();
            let Some(pick) = self.rng.choose(&affordable) else {
                break;
            };
            if let Some(card) = view.cards.get(pick) {
                energy -= card.action_cost;
            }
            chosen.push((*pick).clone());
        }
        chosen
    }
}
