//! Ether gain computation.
//!
//! ## Formula
//!
//! ```text
//! base  = sum(rarity value) * per-card relic multiplier
//! mult  = combo table value, then relic modifiers (see below)
//! gain  = round(base * mult * deflation_base ^ usage(combo))
//! ```
//!
//! Relic modifiers compose in three phases. Within each phase relics apply
//! in the persisted relic order:
//!
//! 1. `PerCard` (`mult += bonus * cards`) and `Factor` (`mult *= factor`)
//! 2. `ReferenceBook` (`mult *= 1 + per_card * cards`), if the context allows it
//! 3. `FiveCardBonus` (`mult *= factor`), if the context allows it and at
//!    least five cards are counted
//!
//! Everything here is read-only. Usage counters only move when a turn is
//! committed through [`EtherState::commit_turn`](super::EtherState::commit_turn).

use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, Rarity};
use crate::combo::{ComboDetector, ComboName, ComboTable};
use crate::core::{CatalogError, CombatConfig};

use super::state::EtherState;

/// Ether value per card rarity tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtherTable {
    pub common: u64,
    pub rare: u64,
    pub special: u64,
    pub legendary: u64,
}

impl Default for EtherTable {
    fn default() -> Self {
        Self {
            common: 10,
            rare: 25,
            special: 50,
            legendary: 100,
        }
    }
}

impl EtherTable {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn value(&self, rarity: Rarity) -> u64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Special => self.special,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// An ether-multiplier contribution from one owned relic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtherModifier {
    /// `mult += bonus * cards`
    PerCard { bonus: f64 },
    /// `mult *= factor`
    Factor { factor: f64 },
    /// `mult *= 1 + reference_book_per_card * cards`
    ReferenceBook,
    /// `mult *= factor` when at least five cards are counted.
    FiveCardBonus { factor: f64 },
}

/// Inputs to one combo-multiplier computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiplierContext {
    pub cards_count: usize,
    pub include_ref_book: bool,
    pub include_five_card: bool,
}

impl MultiplierContext {
    /// Count `cards_count` cards with every modifier phase enabled.
    #[must_use]
    pub const fn new(cards_count: usize) -> Self {
        Self {
            cards_count,
            include_ref_book: true,
            include_five_card: true,
        }
    }

    #[must_use]
    pub const fn without_reference_book(mut self) -> Self {
        self.include_ref_book = false;
        self
    }

    #[must_use]
    pub const fn without_five_card_bonus(mut self) -> Self {
        self.include_five_card = false;
        self
    }
}

/// Breakdown of one ether computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EtherGain {
    pub base_points: f64,
    pub combo: Option<ComboName>,
    pub multiplier: f64,
    pub deflation: f64,
    pub gain: u64,
}

/// Read-only view over the ether tables.
#[derive(Clone, Copy)]
pub struct EtherEconomy<'a> {
    values: &'a EtherTable,
    combos: &'a ComboTable,
    config: &'a CombatConfig,
}

impl<'a> EtherEconomy<'a> {
    #[must_use]
    pub fn new(values: &'a EtherTable, combos: &'a ComboTable, config: &'a CombatConfig) -> Self {
        Self { values, combos, config }
    }

    /// Sum of rarity values, scaled by the per-card relic multiplier.
    ///
    /// `rarity_of` lets the caller substitute upgraded rarities.
    #[must_use]
    pub fn base_points(
        &self,
        cards: &[&CardDefinition],
        rarity_of: impl Fn(&CardDefinition) -> Rarity,
        card_multiplier: f64,
    ) -> f64 {
        let sum: u64 = cards.iter().map(|c| self.values.value(rarity_of(c))).sum();
        sum as f64 * card_multiplier
    }

    /// Combo table value composed with relic modifiers.
    #[must_use]
    pub fn combo_multiplier(
        &self,
        combo: Option<ComboName>,
        modifiers: &[EtherModifier],
        ctx: &MultiplierContext,
    ) -> f64 {
        let count = ctx.cards_count as f64;
        let mut mult = self.combos.multiplier(combo);

        for modifier in modifiers {
            match *modifier {
                EtherModifier::PerCard { bonus } => mult += bonus * count,
                EtherModifier::Factor { factor } => mult *= factor,
                _ => {}
            }
        }

        if ctx.include_ref_book {
            for modifier in modifiers {
                if let EtherModifier::ReferenceBook = modifier {
                    mult *= 1.0 + self.config.reference_book_per_card * count;
                }
            }
        }

        if ctx.include_five_card && ctx.cards_count >= 5 {
            for modifier in modifiers {
                if let EtherModifier::FiveCardBonus { factor } = *modifier {
                    mult *= factor;
                }
            }
        }

        mult
    }

    /// Deflation factor after `usage` prior uses of a combo.
    #[must_use]
    pub fn deflation(&self, usage: u32) -> f64 {
        self.config.deflation_base.powi(usage.min(i32::MAX as u32) as i32)
    }

    /// Compute the gain for a set of cards without touching any counter.
    ///
    /// `usage` is read to apply deflation for the detected combo.
    #[must_use]
    pub fn preview(
        &self,
        cards: &[&CardDefinition],
        rarity_of: impl Fn(&CardDefinition) -> Rarity,
        card_multiplier: f64,
        modifiers: &[EtherModifier],
        usage: &EtherState,
    ) -> EtherGain {
        let combo = ComboDetector::detect(cards).map(|r| r.name);
        let base_points = self.base_points(cards, rarity_of, card_multiplier);
        let multiplier = self.combo_multiplier(combo, modifiers, &MultiplierContext::new(cards.len()));
        let deflation = combo.map_or(1.0, |c| self.deflation(usage.usage(c)));

        let raw = base_points * multiplier * deflation;
        let mut gain = raw.round().max(0.0) as u64;
        if deflation < 1.0 && raw > 0.0 {
            gain = gain.max(self.config.min_deflated_gain);
        }

        EtherGain {
            base_points,
            combo,
            multiplier,
            deflation,
            gain,
        }
    }
}
