//! The player's card piles.
//!
//! Cards move between ordered piles: draw, hand, discard, exhaust, and a
//! holding pile for recalled cards that return to hand at the next turn
//! start. Nothing is shuffled; when the draw pile runs dry the discard
//! pile is moved under it in order.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Pile a card is sent to after it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    Discard,
    Exhaust,
    Recall,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piles {
    pub draw: Vector<CardId>,
    pub hand: Vector<CardId>,
    pub discard: Vector<CardId>,
    pub exhaust: Vector<CardId>,
    pub recalled: Vector<CardId>,
}

impl Piles {
    /// Start with the whole deck in the draw pile, top first.
    #[must_use]
    pub fn from_deck(deck: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            draw: deck.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Draw up to `count` cards into the hand. Returns how many were drawn.
    pub fn draw(&mut self, count: usize) -> usize {
        let mut drawn = 0;
        while drawn < count {
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.draw.append(std::mem::take(&mut self.discard));
            }
            if let Some(card) = self.draw.pop_front() {
                self.hand.push_back(card);
                drawn += 1;
            }
        }
        drawn
    }

    /// Put recalled cards back into the hand.
    pub fn return_recalled(&mut self) -> Vec<CardId> {
        let recalled: Vec<CardId> = std::mem::take(&mut self.recalled).into_iter().collect();
        self.hand.extend(recalled.iter().cloned());
        recalled
    }

    /// Move the whole hand to the discard pile.
    pub fn discard_hand(&mut self) {
        self.discard.append(std::mem::take(&mut self.hand));
    }

    /// Take the cards at the given hand indices, in the given order.
    ///
    /// Indices must be valid and distinct; the caller validates them.
    pub fn take_from_hand(&mut self, indices: &[usize]) -> Vec<CardId> {
        let taken: Vec<CardId> = indices.iter().filter_map(|&i| self.hand.get(i).cloned()).collect();
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for index in sorted {
            if index < self.hand.len() {
                self.hand.remove(index);
            }
        }
        taken
    }

    /// Send a resolved card to its destination.
    pub fn settle(&mut self, card: CardId, destination: Destination) {
        match destination {
            Destination::Discard => self.discard.push_back(card),
            Destination::Exhaust => self.exhaust.push_back(card),
            Destination::Recall => self.recalled.push_back(card),
        }
    }
}
