//! The step function.
//!
//! `step` is a pure function of the prior state: it clones the state, runs
//! exactly one unit of work and returns the new state with the events it
//! produced. A unit of work is either one queued action or, once the queue
//! is exhausted, the transition to the next round. Hosts suspend between
//! steps to animate; resuming later replays identically.
//!
//! ## Action order
//!
//! 1. Skip if the card is unknown or the actor is stunned
//! 2. Spend energy; read unspent energy and remaining attacks
//! 3. Core effect: damage, block, counter, status, special handler
//! 4. Relic hooks: damage taken (for the card's hits), then card played,
//!    combo and exhaust
//! 5. Ether for the cards the actor has consumed so far this turn; an
//!    opposing burst is its own damage-taken event
//! 6. Death relics, then the terminal check
//!
//! ## Turn end order
//!
//! Turn-end relics, commit ether, status decay (both sides), damage-taken
//! relics for poison, death relics, terminal check, then the next turn's
//! reset, turn-start relics and draw.
//!
//! ## Damage taken
//!
//! Every source of player hp loss (hits, counters, bursts, poison, relic
//! changes) is tallied as it happens. The damage-taken hook fires once per
//! source at the next hook point, before any later heal can hide the loss.

use tracing::{debug, warn};

use crate::cards::{CardDefinition, SpecialEffect};
use crate::combat::{StatusKind, Target};
use crate::combo::{ComboDetector, ComboName};
use crate::core::{Side, SideMap};
use crate::relics::{ConditionContext, RelicActivation, RelicChanges, RelicTrigger};

use super::enemy::EnemyDefinition;
use super::event::{BattleEvent, CombatantDelta, SkipReason};
use super::meta::MetaSnapshot;
use super::piles::Destination;
use super::queue::ActionQueue;
use super::state::{BattlePhase, BattleState};
use super::tables::CombatTables;

/// New state plus what happened on the way.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub state: BattleState,
    pub events: Vec<BattleEvent>,
}

/// Create a battle: initial state, combat-start and turn-start relics, and
/// the first hand.
#[must_use]
pub fn start_combat(tables: &CombatTables, snapshot: &MetaSnapshot, enemy: &EnemyDefinition) -> StepOutcome {
    let mut resolver = Resolver::new(tables, BattleState::new(tables, snapshot, enemy));
    resolver.begin_turn(true);
    resolver.finish()
}

/// Run one unit of work. Outside the resolve phase this is a no-op.
#[must_use]
pub fn step(tables: &CombatTables, state: &BattleState) -> StepOutcome {
    let mut resolver = Resolver::new(tables, state.clone());
    if state.phase != BattlePhase::Resolve {
        debug!(phase = %state.phase, "step outside resolve ignored");
    } else if state.queue.is_finished() {
        resolver.end_turn();
    } else {
        resolver.resolve_action();
    }
    resolver.finish()
}

/// Run combat-end relics and bank outstanding ether on a terminal state.
#[must_use]
pub fn end_combat(tables: &CombatTables, state: &BattleState) -> StepOutcome {
    let mut resolver = Resolver::new(tables, state.clone());
    debug_assert!(state.phase.is_terminal(), "combat end on a live battle");
    if state.phase.is_terminal() && !state.finished {
        let ctx = resolver.context(None, 0, 0);
        resolver.fire_all(&[RelicTrigger::OnCombatEnd], &ctx);
        resolver.commit_ether();
        resolver.state.finished = true;
    }
    resolver.finish()
}

/// Build the round's queue from both sides' submissions.
#[must_use]
pub fn build_queue(tables: &CombatTables, state: &BattleState) -> ActionQueue {
    let speeds = |side: Side| -> Vec<_> {
        state.submitted[side]
            .iter()
            .map(|id| {
                let speed = tables.cards.get(id).map_or(0, |c| c.speed_cost);
                (id.clone(), speed)
            })
            .collect()
    };
    ActionQueue::build(&speeds(Side::Player), &speeds(Side::Enemy))
}

struct Resolver<'a> {
    tables: &'a CombatTables,
    state: BattleState,
    events: Vec<BattleEvent>,
    /// Player hp lost since the damage-taken hook last ran.
    damage_taken: i64,
}

impl<'a> Resolver<'a> {
    fn new(tables: &'a CombatTables, state: BattleState) -> Self {
        Self {
            tables,
            state,
            events: Vec::new(),
            damage_taken: 0,
        }
    }

    fn finish(self) -> StepOutcome {
        StepOutcome {
            state: self.state,
            events: self.events,
        }
    }

    fn set_phase(&mut self, to: BattlePhase) {
        let from = self.state.phase;
        if from != to {
            debug!(%from, %to, "phase change");
            self.state.phase = to;
            self.events.push(BattleEvent::PhaseChanged { from, to });
        }
    }

    // === Relics ===

    /// Relic view of the player for the current moment.
    fn context(&self, card: Option<&CardDefinition>, energy_remaining: u32, attacks_remaining: u32) -> ConditionContext {
        let player = self.state.player();
        let mut ctx = ConditionContext::new(self.state.turn, player.hp, player.max_hp)
            .with_energy_remaining(energy_remaining)
            .with_attacks_remaining(attacks_remaining)
            .with_combo(self.state.combos[Side::Player]);
        if let Some(card) = card {
            ctx = ctx.with_card_type(card.card_type);
        }
        ctx
    }

    /// Fire one trigger and apply each activation's changes in relic order.
    fn fire(&mut self, trigger: RelicTrigger, ctx: &ConditionContext) -> Vec<RelicActivation> {
        let activations = self.state.relics.fire(&self.tables.relics, trigger, ctx);
        for activation in &activations {
            self.events.push(BattleEvent::RelicActivated {
                relic: activation.relic.clone(),
                trigger,
            });
            self.apply_changes(&activation.changes);
        }
        activations
    }

    /// Fire triggers in order, then the damage-taken hook for any hp they
    /// cost, then the relic-activate hook once if anything fired.
    fn fire_all(&mut self, triggers: &[RelicTrigger], ctx: &ConditionContext) {
        let mut activations = Vec::new();
        for trigger in triggers {
            activations.extend(self.fire(*trigger, ctx));
        }
        activations.extend(self.flush_damage_taken(None, ctx.energy_remaining, ctx.attacks_remaining));
        self.relic_activate(&activations, None, ctx.energy_remaining, ctx.attacks_remaining);
    }

    /// Tally player hp loss for the next damage-taken hook.
    fn note_hp_loss(&mut self, side: Side, hp_lost: i64) {
        if side == Side::Player && hp_lost > 0 {
            self.damage_taken += hp_lost;
        }
    }

    /// Fire the damage-taken hook once if the player lost hp since the last
    /// call. Hp lost to the hook's own changes does not fire it again.
    fn flush_damage_taken(
        &mut self,
        card: Option<&CardDefinition>,
        energy_remaining: u32,
        attacks_remaining: u32,
    ) -> Vec<RelicActivation> {
        if self.damage_taken == 0 {
            return Vec::new();
        }
        self.damage_taken = 0;
        let ctx = self.context(card, energy_remaining, attacks_remaining);
        let activations = self.fire(RelicTrigger::OnDamageTaken, &ctx);
        self.damage_taken = 0;
        activations
    }

    /// Fire the relic-activate hook once for a batch of activations. Its own
    /// activations, and any hp they cost, do not cascade.
    fn relic_activate(
        &mut self,
        activations: &[RelicActivation],
        card: Option<&CardDefinition>,
        energy_remaining: u32,
        attacks_remaining: u32,
    ) {
        if activations.is_empty() {
            return;
        }
        let ctx = self.context(card, energy_remaining, attacks_remaining);
        self.fire(RelicTrigger::OnRelicActivate, &ctx);
        self.damage_taken = 0;
    }

    /// Apply one relic's changes. Amounts are relative to the player.
    fn apply_changes(&mut self, changes: &RelicChanges) {
        let owner = Side::Player;
        let threshold = self.tables.config.burst_threshold;
        let mut lost = 0;
        {
            let player = &mut self.state.combatants[owner];
            if changes.heal > 0 {
                player.heal(changes.heal);
            } else if changes.heal < 0 {
                lost = player.lose_hp(-changes.heal);
            }
            player.gain_block(changes.block);
            player.strength += changes.strength;
            player.adjust_energy(changes.energy);
            player.counter = (player.counter + changes.counter).max(0);
        }
        self.note_hp_loss(owner, lost);
        if changes.damage > 0 {
            self.state.combatants[owner.opponent()].take_damage(changes.damage);
        }
        for grant in &changes.statuses {
            let side = resolve_target(owner, grant.target);
            self.state.combatants[side]
                .statuses
                .apply(grant.kind, grant.amount, grant.duration);
        }
        if changes.ether > 0 {
            let progress = self.state.ether[owner].record_bonus(changes.ether, threshold);
            self.bursts(owner, progress.bursts);
        }
    }

    // === Ether ===

    /// Recompute the side's running turn gain over its consumed cards and
    /// credit any increase. Returns the points added.
    fn accrue_ether(&mut self, side: Side) -> u64 {
        let tables = self.tables;
        let consumed: Vec<&CardDefinition> = self.state.consumed[side]
            .iter()
            .filter_map(|id| tables.cards.get(id))
            .collect();
        let (modifiers, card_multiplier) = match side {
            Side::Player => (
                self.state.relics.ether_modifiers(),
                self.state.relics.passive().card_multiplier(),
            ),
            Side::Enemy => (Vec::new(), 1.0),
        };
        let state = &self.state;
        let gain = tables.economy().preview(
            &consumed,
            |c| state.rarity_of(c),
            card_multiplier,
            &modifiers,
            &state.ether[side],
        );

        let progress = self.state.ether[side].record_gain(gain.gain, tables.config.burst_threshold);
        self.bursts(side, progress.bursts);
        progress.added
    }

    fn bursts(&mut self, side: Side, bursts: u32) {
        let damage = self.tables.config.burst_damage;
        for _ in 0..bursts {
            debug!(%side, damage, "ether burst");
            let report = self.state.combatants[side.opponent()].take_damage(damage);
            self.note_hp_loss(side.opponent(), report.hp_lost);
            self.events.push(BattleEvent::EtherBurst { side, damage });
        }
    }

    /// Bank both sides' turn gain and count their turn combos.
    fn commit_ether(&mut self) {
        for side in Side::ALL {
            let combo = self.state.combos[side];
            let commit = self.state.ether[side].commit_turn(combo, &self.tables.slots);
            if commit.banked > 0 {
                self.events.push(BattleEvent::EtherBanked {
                    side,
                    amount: commit.banked,
                    total: commit.total,
                });
            }
            if let Some(change) = commit.slot_change {
                self.events.push(BattleEvent::SlotChanged {
                    side,
                    from: change.from,
                    to: change.to,
                });
            }
        }
    }

    /// Re-detect the side's combo over its consumed cards. Returns the combo
    /// when it changed to a new one.
    fn detect_combo(&mut self, side: Side) -> Option<ComboName> {
        let tables = self.tables;
        let consumed: Vec<&CardDefinition> = self.state.consumed[side]
            .iter()
            .filter_map(|id| tables.cards.get(id))
            .collect();
        let combo = ComboDetector::detect(&consumed).map(|r| r.name);
        let previous = std::mem::replace(&mut self.state.combos[side], combo);
        match combo {
            Some(name) if combo != previous => {
                self.events.push(BattleEvent::ComboDetected { side, combo: name });
                Some(name)
            }
            _ => None,
        }
    }

    // === Actions ===

    fn resolve_action(&mut self) {
        let Some(action) = self.state.queue.current().cloned() else {
            debug_assert!(false, "resolve past the end of the queue");
            return;
        };
        let q_index = self.state.queue.q_index();
        let actor = action.actor;
        let tables = self.tables;

        let Some(card) = tables.cards.get(&action.card) else {
            warn!(card = %action.card, %actor, "unknown card in queue skipped");
            self.events.push(BattleEvent::ActionSkipped {
                actor,
                card: action.card,
                reason: SkipReason::UnknownCard,
            });
            self.state.queue.advance();
            return;
        };

        if self.state.combatants[actor].statuses.is_active(StatusKind::Stun) {
            debug!(%actor, card = %card.id, "stunned; action skipped");
            if actor == Side::Player {
                self.state.piles.settle(card.id.clone(), Destination::Discard);
            }
            self.events.push(BattleEvent::ActionSkipped {
                actor,
                card: action.card,
                reason: SkipReason::Stunned,
            });
            self.state.queue.advance();
            return;
        }

        let before = self.state.combatants.clone();
        self.state.combatants[actor].spend_energy(card.action_cost);

        let mut pending_cost = 0u32;
        let mut attacks_remaining = 0u32;
        for upcoming in self.state.queue.upcoming().filter(|a| a.actor == actor) {
            if let Some(def) = tables.cards.get(&upcoming.card) {
                pending_cost = pending_cost.saturating_add(def.action_cost);
                if def.is_attack() {
                    attacks_remaining += 1;
                }
            }
        }
        let energy_remaining = self.state.combatants[actor].energy.saturating_sub(pending_cost);

        let destination = self.play_card(actor, card, attacks_remaining);

        self.state.consumed[actor].push_back(card.id.clone());
        let combo_change = self.detect_combo(actor);

        let mut activations = self.flush_damage_taken(Some(card), energy_remaining, attacks_remaining);
        if actor == Side::Player {
            let ctx = self.context(Some(card), energy_remaining, attacks_remaining);
            activations.extend(self.fire(RelicTrigger::OnCardPlayed, &ctx));
            if combo_change.is_some() {
                let ctx = self.context(Some(card), energy_remaining, attacks_remaining);
                activations.extend(self.fire(RelicTrigger::OnCombo, &ctx));
            }
            if destination == Destination::Exhaust {
                self.events.push(BattleEvent::CardExhausted { card: card.id.clone() });
                let ctx = self.context(Some(card), energy_remaining, attacks_remaining);
                activations.extend(self.fire(RelicTrigger::OnCardExhaust, &ctx));
            }
            self.state.piles.settle(card.id.clone(), destination);
        }
        activations.extend(self.flush_damage_taken(Some(card), energy_remaining, attacks_remaining));

        let ether_gained = self.accrue_ether(actor);
        activations.extend(self.flush_damage_taken(Some(card), energy_remaining, attacks_remaining));
        self.state.queue.advance();

        if self.state.player().is_defeated() {
            let ctx = self.context(Some(card), energy_remaining, attacks_remaining);
            activations.extend(self.fire(RelicTrigger::OnDeath, &ctx));
            activations.extend(self.flush_damage_taken(Some(card), energy_remaining, attacks_remaining));
        }
        self.relic_activate(&activations, Some(card), energy_remaining, attacks_remaining);

        let deltas = SideMap::new(|side| {
            CombatantDelta::between(&before[side], &self.state.combatants[side])
        });
        self.events.push(BattleEvent::ActionResolved {
            actor,
            card: card.id.clone(),
            q_index,
            deltas,
            ether_gained,
            relics: activations.into_iter().map(|a| a.relic).collect(),
        });

        self.check_terminal();
    }

    /// Apply a card's core effect and special handler. Returns where the
    /// card goes afterwards.
    fn play_card(&mut self, actor: Side, card: &CardDefinition, attacks_remaining: u32) -> Destination {
        let tables = self.tables;
        let config = &tables.config;
        let target = actor.opponent();

        if card.damage > 0 {
            let mut hits = card.hits;
            let mut bonus = 0;
            match card.special {
                Some(SpecialEffect::MultiHit { extra_hits }) => hits += extra_hits,
                Some(SpecialEffect::LastStrike { bonus_damage }) if attacks_remaining == 0 => {
                    bonus = bonus_damage;
                }
                _ => {}
            }

            let attacker = &self.state.combatants[actor];
            let per_hit = (card.damage + attacker.total_strength() + bonus).max(0);
            let outgoing = attacker.statuses.outgoing_multiplier(config);

            for _ in 0..hits {
                if self.state.combatants[target].is_defeated() || self.state.combatants[actor].is_defeated() {
                    break;
                }
                let defender = &mut self.state.combatants[target];
                let amount = (per_hit as f64 * outgoing * defender.incoming_multiplier(config)).round() as i64;
                let report = defender.take_damage(amount);
                let counter = defender.counter;
                self.note_hp_loss(target, report.hp_lost);
                if counter > 0 {
                    let report = self.state.combatants[actor].take_damage(counter);
                    self.note_hp_loss(actor, report.hp_lost);
                }
            }
        }

        if card.block > 0 {
            let fortify = self.state.combatants[actor].statuses.value(StatusKind::Fortify);
            self.state.combatants[actor].gain_block(card.block + fortify.max(0));
        }

        if card.counter != 0 {
            let combatant = &mut self.state.combatants[actor];
            combatant.counter = (combatant.counter + card.counter).max(0);
        }

        if let Some(grant) = card.status {
            let side = resolve_target(actor, grant.target);
            self.state.combatants[side]
                .statuses
                .apply(grant.kind, grant.amount, grant.duration);
        }

        let mut destination = if card.has_trait(CardDefinition::EXHAUST) {
            Destination::Exhaust
        } else {
            Destination::Discard
        };

        match card.special {
            Some(SpecialEffect::Stun { duration }) => {
                self.state.combatants[target].statuses.apply(StatusKind::Stun, 0, duration);
            }
            Some(SpecialEffect::TimelineShift { delta, target: shifted }) => {
                let side = resolve_target(actor, shifted);
                let moved = self.state.queue.shift(side, delta);
                self.events.push(BattleEvent::QueueShifted {
                    target: side,
                    delta,
                    moved,
                });
            }
            Some(SpecialEffect::Recall) => destination = Destination::Recall,
            _ => {}
        }

        destination
    }

    // === Terminal ===

    /// Move to a terminal phase if either side is down. Both down is a
    /// defeat. Pending queue entries are discarded.
    fn check_terminal(&mut self) -> bool {
        let outcome = if self.state.player().is_defeated() {
            BattlePhase::Defeat
        } else if self.state.enemy().is_defeated() {
            BattlePhase::Victory
        } else {
            return false;
        };
        self.state.queue.discard_pending();
        self.set_phase(outcome);
        true
    }

    // === Turns ===

    fn end_turn(&mut self) {
        let energy = self.state.player().energy;
        let ctx = self.context(None, energy, 0);
        self.fire_all(&[RelicTrigger::OnTurnEnd], &ctx);

        self.commit_ether();

        self.state.piles.discard_hand();

        for side in Side::ALL {
            let report = self.state.combatants[side].statuses.decay();
            if report.poison_damage > 0 {
                let lost = self.state.combatants[side].lose_hp(report.poison_damage);
                self.note_hp_loss(side, lost);
                self.events.push(BattleEvent::PoisonDamage {
                    side,
                    amount: report.poison_damage,
                });
            }
            for kind in report.expired {
                self.events.push(BattleEvent::StatusExpired { side, kind });
            }
        }

        let mut activations = self.flush_damage_taken(None, 0, 0);
        if self.state.player().is_defeated() {
            let ctx = self.context(None, 0, 0);
            activations.extend(self.fire(RelicTrigger::OnDeath, &ctx));
            activations.extend(self.flush_damage_taken(None, 0, 0));
        }
        self.relic_activate(&activations, None, 0, 0);
        if self.check_terminal() {
            return;
        }

        self.state.turn += 1;
        self.begin_turn(false);
    }

    /// Reset per-turn state, run start relics and draw the hand.
    fn begin_turn(&mut self, first: bool) {
        for side in Side::ALL {
            self.state.combatants[side].begin_turn();
            self.state.ether[side].begin_turn();
        }
        self.state.queue = ActionQueue::new();
        self.state.submitted = Default::default();
        self.state.consumed = Default::default();
        self.state.combos = Default::default();
        self.state.pre_submit_hand = None;
        self.state.redraws_left = self.tables.config.redraws_per_turn;
        self.events.push(BattleEvent::TurnStarted { turn: self.state.turn });

        let energy = self.state.player().energy;
        let ctx = self.context(None, energy, 0);
        let triggers: &[RelicTrigger] = if first {
            &[RelicTrigger::OnCombatStart, RelicTrigger::OnTurnStart]
        } else {
            &[RelicTrigger::OnTurnStart]
        };
        self.fire_all(triggers, &ctx);

        for card in self.state.piles.return_recalled() {
            self.events.push(BattleEvent::CardRecalled { card });
        }
        let count = self.state.piles.draw(self.state.limits.hand_size);
        self.events.push(BattleEvent::CardsDrawn { count });

        if !self.check_terminal() {
            self.set_phase(BattlePhase::Select);
        }
    }
}

fn resolve_target(actor: Side, target: Target) -> Side {
    match target {
        Target::Actor => actor,
        Target::Opponent => actor.opponent(),
    }
}
