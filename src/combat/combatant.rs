//! Combatant state: one side's hp, defenses, energy and statuses.

use serde::{Deserialize, Serialize};

use super::status::{StatusEffects, StatusKind};
use crate::core::CombatConfig;

/// How an incoming hit was split between block and hp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub absorbed: i64,
    pub hp_lost: i64,
}

/// A combatant, owned by exactly one side and mutated only by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub hp: i64,
    pub max_hp: i64,
    pub block: i64,
    /// Permanent strength; temporary strength lives in `statuses`.
    pub strength: i64,
    /// Base incoming damage multiplier (1.0 = normal).
    pub vulnerability: f64,
    /// Counter stacks: damage reflected to an attacker per hit received.
    pub counter: i64,
    pub energy: u32,
    pub max_energy: u32,
    pub statuses: StatusEffects,
}

impl Combatant {
    /// Create a combatant at full hp and energy.
    #[must_use]
    pub fn new(max_hp: i64, max_energy: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            block: 0,
            strength: 0,
            vulnerability: 1.0,
            counter: 0,
            energy: max_energy,
            max_energy,
            statuses: StatusEffects::new(),
        }
    }

    /// Set current hp (builder pattern), clamped to max hp.
    #[must_use]
    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.hp < self.max_hp
    }

    /// Strength applied to each outgoing hit.
    #[must_use]
    pub fn total_strength(&self) -> i64 {
        self.strength + self.statuses.value(StatusKind::Strength)
    }

    /// Incoming multiplier at the moment a hit lands.
    #[must_use]
    pub fn incoming_multiplier(&self, config: &CombatConfig) -> f64 {
        self.vulnerability * self.statuses.incoming_multiplier(config)
    }

    /// Take a hit. Block absorbs first and is consumed immediately.
    pub fn take_damage(&mut self, amount: i64) -> DamageReport {
        let amount = amount.max(0);
        let absorbed = amount.min(self.block);
        self.block -= absorbed;
        let hp_lost = amount - absorbed;
        self.hp -= hp_lost;
        DamageReport { absorbed, hp_lost }
    }

    /// Lose hp directly, bypassing block.
    pub fn lose_hp(&mut self, amount: i64) -> i64 {
        let amount = amount.max(0);
        self.hp -= amount;
        amount
    }

    /// Heal up to max hp. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i64) -> i64 {
        if amount <= 0 || self.hp >= self.max_hp {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// Gain block, floored at zero.
    pub fn gain_block(&mut self, amount: i64) {
        self.block = (self.block + amount).max(0);
    }

    /// Adjust energy by a signed delta, floored at zero.
    pub fn adjust_energy(&mut self, delta: i64) {
        self.energy = (i64::from(self.energy) + delta).clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// Spend energy for a resolving card.
    pub fn spend_energy(&mut self, cost: u32) {
        self.energy = self.energy.saturating_sub(cost);
    }

    /// Turn-start reset of per-turn defenses and energy.
    pub fn begin_turn(&mut self) {
        self.block = 0;
        self.counter = 0;
        self.energy = self.max_energy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_hit() {
        let mut c = Combatant::new(50, 3);
        let report = c.take_damage(10);

        assert_eq!(report, DamageReport { absorbed: 0, hp_lost: 10 });
        assert_eq!(c.hp, 40);
        assert_eq!(c.block, 0);
    }

    #[test]
    fn test_block_absorbs_first() {
        let mut c = Combatant::new(50, 3);
        c.gain_block(6);

        let report = c.take_damage(10);
        assert_eq!(report.absorbed, 6);
        assert_eq!(report.hp_lost, 4);
        assert_eq!(c.block, 0);
        assert_eq!(c.hp, 46);
    }

    #[test]
    fn test_block_partially_remains() {
        let mut c = Combatant::new(50, 3);
        c.gain_block(12);
        c.take_damage(5);
        assert_eq!(c.block, 7);
        assert_eq!(c.hp, 50);
    }

    #[test]
    fn test_heal_capped() {
        let mut c = Combatant::new(30, 3).with_hp(25);
        assert_eq!(c.heal(10), 5);
        assert_eq!(c.hp, 30);
        assert_eq!(c.heal(10), 0);
    }

    #[test]
    fn test_energy_adjust_floors() {
        let mut c = Combatant::new(30, 3);
        c.adjust_energy(-5);
        assert_eq!(c.energy, 0);
        c.adjust_energy(2);
        assert_eq!(c.energy, 2);
    }

    #[test]
    fn test_total_strength() {
        let mut c = Combatant::new(30, 3);
        c.strength = 2;
        c.statuses.apply(StatusKind::Strength, 3, 1);
        assert_eq!(c.total_strength(), 5);
    }

    #[test]
    fn test_begin_turn() {
        let mut c = Combatant::new(30, 4);
        c.gain_block(5);
        c.counter = 2;
        c.spend_energy(3);
        c.begin_turn();

        assert_eq!(c.block, 0);
        assert_eq!(c.counter, 0);
        assert_eq!(c.energy, 4);
    }
}
