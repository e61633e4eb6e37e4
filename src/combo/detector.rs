//! Poker-style combo classification.
//!
//! Cards are grouped by actionCost (the "rank") and by card type (the
//! "suit"). Matching ranks form pairs, triples and so on; four or more
//! cards of one type form a flush.
//!
//! When a selection satisfies several combos, exactly one is returned,
//! chosen by this fixed precedence (highest first):
//!
//! 1. `FiveOfAKind` - five cards of one rank
//! 2. `FourOfAKind` - four cards of one rank
//! 3. `FullHouse`   - a triple plus a pair of another rank
//! 4. `Flush`       - four or more cards of one type
//! 5. `Triple`      - three cards of one rank
//! 6. `TwoPair`     - two pairs of different ranks
//! 7. `Pair`        - two cards of one rank
//!
//! Detection is pure: it reads nothing but its input and may be called for
//! live previews and final resolution alike.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardDefinition, CardType};

/// Named combo, declared from lowest to highest precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboName {
    Pair,
    TwoPair,
    Triple,
    Flush,
    FullHouse,
    FourOfAKind,
    FiveOfAKind,
}

impl ComboName {
    /// All combos, highest precedence first.
    pub const PRECEDENCE: [ComboName; 7] = [
        ComboName::FiveOfAKind,
        ComboName::FourOfAKind,
        ComboName::FullHouse,
        ComboName::Flush,
        ComboName::Triple,
        ComboName::TwoPair,
        ComboName::Pair,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ComboName::Pair => "pair",
            ComboName::TwoPair => "two_pair",
            ComboName::Triple => "triple",
            ComboName::Flush => "flush",
            ComboName::FullHouse => "full_house",
            ComboName::FourOfAKind => "four_of_a_kind",
            ComboName::FiveOfAKind => "five_of_a_kind",
        }
    }
}

impl std::fmt::Display for ComboName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected combo and the input indices that form it (ascending).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboResult {
    pub name: ComboName,
    pub indices: SmallVec<[usize; 5]>,
}

impl ComboResult {
    fn new(name: ComboName, mut indices: SmallVec<[usize; 5]>) -> Self {
        indices.sort_unstable();
        Self { name, indices }
    }
}

/// Stateless combo classifier.
pub struct ComboDetector;

impl ComboDetector {
    /// Classify a selection of cards.
    #[must_use]
    pub fn detect(cards: &[&CardDefinition]) -> Option<ComboResult> {
        let keys: SmallVec<[(u32, CardType); 8]> =
            cards.iter().map(|c| (c.action_cost, c.card_type)).collect();
        Self::detect_keys(&keys)
    }

    /// Classify a selection given as (rank, suit) pairs.
    #[must_use]
    pub fn detect_keys(keys: &[(u32, CardType)]) -> Option<ComboResult> {
        if keys.len() < 2 {
            return None;
        }

        let mut by_rank: BTreeMap<u32, SmallVec<[usize; 5]>> = BTreeMap::new();
        let mut by_suit: BTreeMap<CardType, SmallVec<[usize; 5]>> = BTreeMap::new();
        for (i, &(rank, suit)) in keys.iter().enumerate() {
            by_rank.entry(rank).or_default().push(i);
            by_suit.entry(suit).or_default().push(i);
        }

        // Largest groups first; among equal sizes, the higher rank wins.
        let mut ranks: Vec<(u32, SmallVec<[usize; 5]>)> = by_rank.into_iter().collect();
        ranks.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(b.0.cmp(&a.0)));

        let first = ranks.first().map_or(0, |g| g.1.len());
        let second = ranks.get(1).map_or(0, |g| g.1.len());
        let groups = &ranks;
        let take = move |group: usize, n: usize| groups[group].1.iter().copied().take(n);

        if first >= 5 {
            return Some(ComboResult::new(ComboName::FiveOfAKind, take(0, 5).collect()));
        }
        if first >= 4 {
            return Some(ComboResult::new(ComboName::FourOfAKind, take(0, 4).collect()));
        }
        if first >= 3 && second >= 2 {
            let indices = take(0, 3).chain(take(1, 2)).collect();
            return Some(ComboResult::new(ComboName::FullHouse, indices));
        }

        let flush = by_suit
            .into_iter()
            .filter(|(_, members)| members.len() >= 4)
            .max_by(|a, b| a.1.len().cmp(&b.1.len()).then(b.0.cmp(&a.0)));
        if let Some((_, members)) = flush {
            return Some(ComboResult::new(ComboName::Flush, members));
        }

        if first >= 3 {
            return Some(ComboResult::new(ComboName::Triple, take(0, 3).collect()));
        }
        if first >= 2 && second >= 2 {
            let indices = take(0, 2).chain(take(1, 2)).collect();
            return Some(ComboResult::new(ComboName::TwoPair, indices));
        }
        if first >= 2 {
            return Some(ComboResult::new(ComboName::Pair, take(0, 2).collect()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardType::{Attack, Defense, Support};

    fn name(keys: &[(u32, CardType)]) -> Option<ComboName> {
        ComboDetector::detect_keys(keys).map(|r| r.name)
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(name(&[]), None);
        assert_eq!(name(&[(1, Attack)]), None);
    }

    #[test]
    fn test_no_combo() {
        assert_eq!(name(&[(1, Attack), (2, Attack), (3, Defense)]), None);
    }

    #[test]
    fn test_pair() {
        let result = ComboDetector::detect_keys(&[(2, Attack), (1, Defense), (2, Attack)]).unwrap();
        assert_eq!(result.name, ComboName::Pair);
        assert_eq!(result.indices.as_slice(), &[0, 2]);
    }

    #[test]
    fn test_two_pair() {
        assert_eq!(name(&[(1, Attack), (1, Defense), (2, Support), (2, Attack)]), Some(ComboName::TwoPair));
    }

    #[test]
    fn test_triple() {
        assert_eq!(name(&[(3, Attack), (3, Defense), (3, Support)]), Some(ComboName::Triple));
    }

    #[test]
    fn test_flush_needs_four() {
        assert_eq!(name(&[(1, Attack), (2, Attack), (3, Attack)]), None);
        assert_eq!(name(&[(1, Attack), (2, Attack), (3, Attack), (4, Attack)]), Some(ComboName::Flush));
    }

    #[test]
    fn test_full_house() {
        let result = ComboDetector::detect_keys(&[
            (1, Attack),
            (2, Defense),
            (1, Support),
            (2, Attack),
            (1, Defense),
        ])
        .unwrap();
        assert_eq!(result.name, ComboName::FullHouse);
        assert_eq!(result.indices.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_four_beats_flush() {
        let keys = [(2, Attack), (2, Attack), (2, Attack), (2, Attack)];
        assert_eq!(name(&keys), Some(ComboName::FourOfAKind));
    }

    #[test]
    fn test_five_of_a_kind_beats_everything() {
        let keys = [(1, Attack); 5];
        assert_eq!(name(&keys), Some(ComboName::FiveOfAKind));
    }

    #[test]
    fn test_flush_beats_triple() {
        let keys = [(1, Attack), (1, Attack), (1, Attack), (2, Attack)];
        assert_eq!(name(&keys), Some(ComboName::Flush));
    }

    #[test]
    fn test_higher_rank_pair_chosen() {
        let result = ComboDetector::detect_keys(&[(1, Attack), (1, Defense), (3, Attack), (3, Support), (5, Support)]).unwrap();
        assert_eq!(result.name, ComboName::TwoPair);
        assert_eq!(result.indices.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_precedence_is_total_and_descending() {
        let mut sorted = ComboName::PRECEDENCE;
        sorted.sort();
        sorted.reverse();
        assert_eq!(sorted, ComboName::PRECEDENCE);
    }
}
