//! Combo multiplier table.

use serde::{Deserialize, Serialize};

use super::detector::ComboName;
use crate::core::CatalogError;

/// Base ether multiplier per combo. A selection with no combo uses 1.0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboTable {
    pub pair: f64,
    pub two_pair: f64,
    pub triple: f64,
    pub flush: f64,
    pub full_house: f64,
    pub four_of_a_kind: f64,
    pub five_of_a_kind: f64,
}

impl Default for ComboTable {
    fn default() -> Self {
        Self {
            pair: 1.5,
            two_pair: 2.0,
            triple: 2.5,
            flush: 3.0,
            full_house: 3.5,
            four_of_a_kind: 4.0,
            five_of_a_kind: 5.0,
        }
    }
}

impl ComboTable {
    /// Load a table from JSON. Missing entries keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Multiplier for a detected combo, or 1.0 when there is none.
    #[must_use]
    pub fn multiplier(&self, combo: Option<ComboName>) -> f64 {
        match combo {
            None => 1.0,
            Some(ComboName::Pair) => self.pair,
            Some(ComboName::TwoPair) => self.two_pair,
            Some(ComboName::Triple) => self.triple,
            Some(ComboName::Flush) => self.flush,
            Some(ComboName::FullHouse) => self.full_house,
            Some(ComboName::FourOfAKind) => self.four_of_a_kind,
            Some(ComboName::FiveOfAKind) => self.five_of_a_kind,
        }
    }
}
