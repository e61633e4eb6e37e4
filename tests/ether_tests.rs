//! Ether economy integration tests.
//!
//! Covers the gain formula, deflation across turns of one battle, relic
//! multiplier composition and banking through a live engine.

use std::sync::Arc;

use ether_combat::battle::{BattleEvent, CombatTables, EnemyDefinition, MetaSnapshot, ScriptedOpponent, TurnEngine};
use ether_combat::cards::{CardCatalog, CardDefinition, CardId, CardType, Rarity};
use ether_combat::combo::{ComboName, ComboTable};
use ether_combat::core::{CombatConfig, Side};
use ether_combat::ether::{EtherEconomy, EtherModifier, EtherState, EtherTable, MultiplierContext, SlotSchedule};
use ether_combat::relics::{RelicCatalog, RelicDefinition, RelicId, RelicPipeline};

fn attack(id: &str, cost: u32) -> CardDefinition {
    CardDefinition::new(id, id, CardType::Attack).with_costs(cost, 1)
}

// =============================================================================
// Gain Formula
// =============================================================================

/// Two common attacks at cost 2 form a pair worth round(20 * 1.5).
#[test]
fn test_pair_gain_then_deflated() {
    let (values, combos, config) = (EtherTable::default(), ComboTable::default(), CombatConfig::default());
    let economy = EtherEconomy::new(&values, &combos, &config);
    let a = attack("a", 2);
    let b = attack("b", 2);
    let mut state = EtherState::new();

    let first = economy.preview(&[&a, &b], |c| c.rarity, 1.0, &[], &state);
    assert_eq!(first.combo, Some(ComboName::Pair));
    assert_eq!(first.base_points, 20.0);
    assert_eq!(first.multiplier, 1.5);
    assert_eq!(first.gain, 30);

    state.record_use(ComboName::Pair);
    let second = economy.preview(&[&a, &b], |c| c.rarity, 1.0, &[], &state);
    assert_eq!(second.gain, 15);
}

#[test]
fn test_deflation_law() {
    let (values, combos, config) = (EtherTable::default(), ComboTable::default(), CombatConfig::default());
    let economy = EtherEconomy::new(&values, &combos, &config);
    let a = attack("a", 3);
    let b = attack("b", 3);
    let mut state = EtherState::new();

    let base = economy.preview(&[&a, &b], |c| c.rarity, 1.0, &[], &state).gain;
    for n in 1..=6 {
        let gain = economy.preview(&[&a, &b], |c| c.rarity, 1.0, &[], &state).gain;
        let expected = (base as f64 * 0.5f64.powi(n - 1)).round() as u64;
        assert_eq!(gain, expected, "use {n}");
        state.record_use(ComboName::Pair);
    }

    // Other combos are unaffected by pair usage.
    let c = attack("c", 3);
    let triple = economy.preview(&[&a, &b, &c], |c| c.rarity, 1.0, &[], &state);
    assert_eq!(triple.deflation, 1.0);
}

#[test]
fn test_upgraded_rarity_raises_base() {
    let (values, combos, config) = (EtherTable::default(), ComboTable::default(), CombatConfig::default());
    let economy = EtherEconomy::new(&values, &combos, &config);
    let a = attack("a", 1);

    let plain = economy.preview(&[&a], |c| c.rarity, 1.0, &[], &EtherState::new());
    let upgraded = economy.preview(&[&a], |_| Rarity::Legendary, 1.0, &[], &EtherState::new());
    assert!(upgraded.gain > plain.gain);
}

// =============================================================================
// Relic Composition
// =============================================================================

/// A per-card relic followed by a five-card relic: 1 + 2*5 = 11, then 11 * 5.
#[test]
fn test_per_card_then_five_card_bonus() {
    let mut catalog = RelicCatalog::new();
    catalog
        .register(RelicDefinition::ether("etherGem", "Ether Gem", EtherModifier::PerCard { bonus: 2.0 }))
        .unwrap();
    catalog
        .register(RelicDefinition::ether(
            "devilDice",
            "Devil Dice",
            EtherModifier::FiveCardBonus { factor: 5.0 },
        ))
        .unwrap();
    let pipeline = RelicPipeline::new(&catalog, [RelicId::new("etherGem"), RelicId::new("devilDice")]);

    let (values, combos, config) = (EtherTable::default(), ComboTable::default(), CombatConfig::default());
    let economy = EtherEconomy::new(&values, &combos, &config);
    let modifiers = pipeline.ether_modifiers();

    let after_gem = economy.combo_multiplier(None, &modifiers, &MultiplierContext::new(5).without_five_card_bonus());
    assert_eq!(after_gem, 11.0);

    let full = economy.combo_multiplier(None, &modifiers, &MultiplierContext::new(5));
    assert_eq!(full, 55.0);
}

#[test]
fn test_reference_book_scales_with_cards() {
    let (values, combos, config) = (EtherTable::default(), ComboTable::default(), CombatConfig::default());
    let economy = EtherEconomy::new(&values, &combos, &config);

    let mult = economy.combo_multiplier(
        Some(ComboName::Pair),
        &[EtherModifier::ReferenceBook],
        &MultiplierContext::new(3),
    );
    assert!((mult - 1.5 * 1.3).abs() < 1e-9);
}

// =============================================================================
// Engine Banking
// =============================================================================

fn pair_battle() -> (Arc<CombatTables>, MetaSnapshot, EnemyDefinition) {
    let mut cards = CardCatalog::new();
    cards.register(attack("a", 2)).unwrap();
    cards.register(attack("b", 2)).unwrap();
    let config = CombatConfig::default().with_max_submit_cards(2).with_hand_size(2);
    let tables = CombatTables::new(cards, RelicCatalog::new())
        .with_config(config)
        .with_slots(SlotSchedule::new(vec![40, 100]).unwrap());

    let snapshot = MetaSnapshot::new(30, 4).with_deck([CardId::new("a"), CardId::new("b")]);
    let enemy = EnemyDefinition::new("wall", "Wall", 500);
    (Arc::new(tables), snapshot, enemy)
}

fn play_round(engine: &mut TurnEngine) {
    engine.submit(&[0, 1]).unwrap();
    engine.begin_resolve().unwrap();
    engine.resolve_all();
}

fn banked(events: &[BattleEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::EtherBanked { side: Side::Player, amount, .. } => Some(*amount),
            _ => None,
        })
        .collect()
}

#[test]
fn test_repeated_pair_banks_deflated_gain() {
    let (tables, snapshot, enemy) = pair_battle();
    let mut engine = TurnEngine::start(tables, &snapshot, &enemy, Box::new(ScriptedOpponent::idle()));
    engine.drain_events();

    play_round(&mut engine);
    assert_eq!(banked(&engine.drain_events()), vec![30]);
    assert_eq!(engine.state().ether[Side::Player].usage(ComboName::Pair), 1);

    play_round(&mut engine);
    let events = engine.drain_events();
    assert_eq!(banked(&events), vec![15]);
    assert!(events.iter().any(|e| matches!(
        e,
        BattleEvent::SlotChanged { side: Side::Player, from: 0, to: 1 }
    )));

    let ether = &engine.state().ether[Side::Player];
    assert_eq!(ether.banked, 45);
    assert_eq!(ether.slot, 1);
    assert_eq!(ether.usage(ComboName::Pair), 2);
}

#[test]
fn test_running_gain_accrues_per_action() {
    let (tables, snapshot, enemy) = pair_battle();
    let mut engine = TurnEngine::start(tables, &snapshot, &enemy, Box::new(ScriptedOpponent::idle()));
    engine.submit(&[0, 1]).unwrap();
    engine.begin_resolve().unwrap();
    engine.drain_events();

    // First card alone: no combo, 10 points. Second completes the pair: 30 total.
    let mut gained = Vec::new();
    for _ in 0..2 {
        assert!(engine.step());
        for event in engine.drain_events() {
            if let BattleEvent::ActionResolved { ether_gained, .. } = event {
                gained.push(ether_gained);
            }
        }
    }
    assert_eq!(gained, vec![10, 20]);
    assert_eq!(engine.state().ether[Side::Player].turn_gain, 30);
    assert_eq!(engine.state().ether[Side::Player].banked, 0);
}

#[test]
fn test_usage_resets_for_new_battle() {
    let (tables, snapshot, enemy) = pair_battle();
    let mut engine = TurnEngine::start(Arc::clone(&tables), &snapshot, &enemy, Box::new(ScriptedOpponent::idle()));
    play_round(&mut engine);
    assert_eq!(engine.state().ether[Side::Player].usage(ComboName::Pair), 1);

    let mut fresh = TurnEngine::start(tables, &snapshot, &enemy, Box::new(ScriptedOpponent::idle()));
    assert_eq!(fresh.state().ether[Side::Player].usage(ComboName::Pair), 0);

    fresh.drain_events();
    play_round(&mut fresh);
    assert_eq!(banked(&fresh.drain_events()), vec![30]);
}

#[test]
fn test_preview_is_read_only() {
    let (tables, snapshot, enemy) = pair_battle();
    let engine = TurnEngine::start(tables, &snapshot, &enemy, Box::new(ScriptedOpponent::idle()));
    let before = engine.state().clone();

    let preview = engine.preview(&[0, 1]).unwrap();
    assert_eq!(preview.combo.clone().map(|c| c.name), Some(ComboName::Pair));
    assert_eq!(preview.ether.gain, 30);
    assert_eq!(engine.preview(&[0, 1]).unwrap(), preview);
    assert!(engine.preview(&[7]).is_none());
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_burst_damages_opponent_and_carries_remainder() {
    let mut cards = CardCatalog::new();
    cards.register(attack("gem", 1).with_rarity(Rarity::Legendary)).unwrap();
    let config = CombatConfig::default().with_burst(60, 7);
    let tables = Arc::new(CombatTables::new(cards, RelicCatalog::new()).with_config(config));
    let snapshot = MetaSnapshot::new(30, 3).with_deck([CardId::new("gem")]);
    let enemy = EnemyDefinition::new("wall", "Wall", 50);

    let mut engine = TurnEngine::start(tables, &snapshot, &enemy, Box::new(ScriptedOpponent::idle()));
    engine.submit(&[0]).unwrap();
    engine.begin_resolve().unwrap();
    assert!(engine.step());

    let events = engine.drain_events();
    assert!(events.iter().any(|e| matches!(e, BattleEvent::EtherBurst { side: Side::Player, damage: 7 })));
    assert_eq!(engine.state().enemy().hp, 43);
    assert_eq!(engine.state().ether[Side::Player].accumulated, 40);
}

#[test]
fn test_burst_remainder_carries_into_next_turn() {
    let mut cards = CardCatalog::new();
    cards.register(attack("gem", 1).with_rarity(Rarity::Legendary)).unwrap();
    let config = CombatConfig::default().with_burst(60, 7);
    let tables = Arc::new(CombatTables::new(cards, RelicCatalog::new()).with_config(config));
    let snapshot = MetaSnapshot::new(30, 3).with_deck([CardId::new("gem")]);
    let enemy = EnemyDefinition::new("wall", "Wall", 50);

    let mut engine = TurnEngine::start(tables, &snapshot, &enemy, Box::new(ScriptedOpponent::idle()));
    engine.submit(&[0]).unwrap();
    engine.begin_resolve().unwrap();
    engine.resolve_all();
    assert_eq!(engine.state().turn, 2);
    assert_eq!(engine.state().ether[Side::Player].accumulated, 40);

    // 40 carried + 100 = 140: two more bursts, 20 left over.
    engine.drain_events();
    engine.submit(&[0]).unwrap();
    engine.begin_resolve().unwrap();
    engine.step();
    let bursts = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, BattleEvent::EtherBurst { side: Side::Player, .. }))
        .count();
    assert_eq!(bursts, 2);
    assert_eq!(engine.state().ether[Side::Player].accumulated, 20);
}
