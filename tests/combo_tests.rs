//! Combo detection integration tests.
//!
//! These tests check the precedence order over realistic hands and that
//! detection is a pure function of its input.

use ether_combat::cards::{CardDefinition, CardType};
use ether_combat::combo::{ComboDetector, ComboName, ComboTable};
use proptest::prelude::*;

fn card(id: &str, cost: u32, card_type: CardType) -> CardDefinition {
    CardDefinition::new(id, id, card_type).with_costs(cost, 1)
}

fn detect(cards: &[CardDefinition]) -> Option<ComboName> {
    let refs: Vec<&CardDefinition> = cards.iter().collect();
    ComboDetector::detect(&refs).map(|r| r.name)
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_pair_from_two_attacks() {
    let cards = [card("a", 2, CardType::Attack), card("b", 2, CardType::Attack)];
    assert_eq!(detect(&cards), Some(ComboName::Pair));
}

#[test]
fn test_full_house_beats_flush() {
    // Five attacks: a flush, but also a triple of 1s and a pair of 3s.
    let cards = [
        card("a", 1, CardType::Attack),
        card("b", 1, CardType::Attack),
        card("c", 1, CardType::Attack),
        card("d", 3, CardType::Attack),
        card("e", 3, CardType::Attack),
    ];
    assert_eq!(detect(&cards), Some(ComboName::FullHouse));
}

#[test]
fn test_flush_beats_two_pair() {
    let cards = [
        card("a", 1, CardType::Defense),
        card("b", 1, CardType::Defense),
        card("c", 2, CardType::Defense),
        card("d", 2, CardType::Defense),
    ];
    assert_eq!(detect(&cards), Some(ComboName::Flush));
}

#[test]
fn test_mixed_types_no_combo() {
    let cards = [
        card("a", 1, CardType::Attack),
        card("b", 2, CardType::Defense),
        card("c", 3, CardType::Support),
        card("d", 4, CardType::Attack),
    ];
    assert_eq!(detect(&cards), None);
}

#[test]
fn test_contributing_indices() {
    let cards = [
        card("a", 5, CardType::Support),
        card("b", 2, CardType::Attack),
        card("c", 5, CardType::Defense),
    ];
    let refs: Vec<&CardDefinition> = cards.iter().collect();
    let result = ComboDetector::detect(&refs).unwrap();

    assert_eq!(result.name, ComboName::Pair);
    assert_eq!(result.indices.as_slice(), &[0, 2]);
}

#[test]
fn test_table_lookup() {
    let table = ComboTable::default();
    assert_eq!(table.multiplier(Some(ComboName::Pair)), 1.5);
    assert_eq!(table.multiplier(Some(ComboName::Flush)), 3.0);
    assert_eq!(table.multiplier(None), 1.0);

    let custom = ComboTable::from_json(r#"{ "pair": 2.0 }"#).unwrap();
    assert_eq!(custom.multiplier(Some(ComboName::Pair)), 2.0);
    assert_eq!(custom.multiplier(Some(ComboName::Triple)), 2.5);
}

// =============================================================================
// Properties
// =============================================================================

fn card_type() -> impl Strategy<Value = CardType> {
    prop_oneof![Just(CardType::Attack), Just(CardType::Defense), Just(CardType::Support)]
}

proptest! {
    #[test]
    fn prop_detection_is_deterministic(keys in prop::collection::vec((0u32..6, card_type()), 0..8)) {
        let first = ComboDetector::detect_keys(&keys);
        let second = ComboDetector::detect_keys(&keys);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_indices_are_valid_and_sorted(keys in prop::collection::vec((0u32..6, card_type()), 0..8)) {
        if let Some(result) = ComboDetector::detect_keys(&keys) {
            prop_assert!(result.indices.len() >= 2);
            prop_assert!(result.indices.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(result.indices.iter().all(|&i| i < keys.len()));
        }
    }

    #[test]
    fn prop_order_does_not_change_name(keys in prop::collection::vec((0u32..6, card_type()), 0..8)) {
        let mut reversed = keys.clone();
        reversed.reverse();
        let forward = ComboDetector::detect_keys(&keys).map(|r| r.name);
        let backward = ComboDetector::detect_keys(&reversed).map(|r| r.name);
        prop_assert_eq!(forward, backward);
    }
}
