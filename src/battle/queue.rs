//! The round's action queue.
//!
//! Built once per round from both sides' submissions. Each side's cards get
//! a cumulative speed position (running sum of speedCost in submission
//! order) and the merged list is sorted ascending by position. Ties go to
//! the player, then to submission order.
//!
//! `q_index` only moves forward. The one permitted rearrangement is
//! [`ActionQueue::shift`], which touches pending entries of one side and
//! keeps every untouched entry in its relative order.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::Side;

/// One queued card play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedAction {
    pub actor: Side,
    pub card: CardId,
    /// Speed position on the timeline.
    pub position: i64,
    /// Submission index within the actor's own selection.
    pub order: u32,
}

/// Speed-ordered actions plus a forward-only cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionQueue {
    entries: Vector<QueuedAction>,
    q_index: usize,
}

impl ActionQueue {
    /// Create an empty, finished queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge both sides' selections, given as `(card, speed_cost)`.
    #[must_use]
    pub fn build(player: &[(CardId, u32)], enemy: &[(CardId, u32)]) -> Self {
        let mut entries: Vec<QueuedAction> = Vec::with_capacity(player.len() + enemy.len());
        for (side, cards) in [(Side::Player, player), (Side::Enemy, enemy)] {
            let mut position = 0i64;
            for (order, (card, speed)) in cards.iter().enumerate() {
                position += i64::from(*speed);
                entries.push(QueuedAction {
                    actor: side,
                    card: card.clone(),
                    position,
                    order: order as u32,
                });
            }
        }
        entries.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then(a.actor.cmp(&b.actor))
                .then(a.order.cmp(&b.order))
        });

        Self {
            entries: entries.into_iter().collect(),
            q_index: 0,
        }
    }

    #[must_use]
    pub fn q_index(&self) -> usize {
        self.q_index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once every entry has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.q_index >= self.entries.len()
    }

    /// The next entry to resolve.
    #[must_use]
    pub fn current(&self) -> Option<&QueuedAction> {
        self.entries.get(self.q_index)
    }

    /// Advance the cursor by one.
    pub fn advance(&mut self) {
        debug_assert!(self.q_index < self.entries.len(), "advanced past the end of the queue");
        if self.q_index < self.entries.len() {
            self.q_index += 1;
        }
    }

    /// Entries after the current one.
    pub fn upcoming(&self) -> impl Iterator<Item = &QueuedAction> {
        self.entries.iter().skip(self.q_index + 1)
    }

    /// Entries not yet resolved, including the current one.
    pub fn pending(&self) -> impl Iterator<Item = &QueuedAction> {
        self.entries.iter().skip(self.q_index)
    }

    /// All entries in order.
    pub fn entries(&self) -> impl Iterator<Item = &QueuedAction> {
        self.entries.iter()
    }

    /// Discard every pending entry.
    pub fn discard_pending(&mut self) {
        self.entries.truncate(self.q_index);
    }

    /// Move the upcoming entries of `target` by `delta` speed, then re-sort
    /// the upcoming part by position. Returns how many entries moved.
    ///
    /// The sort is stable, so untouched entries keep their relative order.
    pub fn shift(&mut self, target: Side, delta: i64) -> usize {
        let start = (self.q_index + 1).min(self.entries.len());
        let mut upcoming: Vec<QueuedAction> = self.entries.iter().skip(start).cloned().collect();
        let mut moved = 0;
        for entry in upcoming.iter_mut().filter(|e| e.actor == target) {
            entry.position += delta;
            moved += 1;
        }
        if moved == 0 {
            return 0;
        }
        upcoming.sort_by_key(|e| e.position);

        self.entries.truncate(start);
        self.entries.extend(upcoming);
        moved
    }
}
