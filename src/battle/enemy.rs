//! Enemy definitions and catalog.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::CatalogError;

/// Static enemy definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    pub hp: i64,
    #[serde(default = "default_energy")]
    pub energy: u32,
    /// Cards the opponent may choose from each round.
    pub cards: Vec<CardId>,
    /// Most cards the opponent plays per round.
    #[serde(default = "default_max_cards")]
    pub max_cards: usize,
}

fn default_energy() -> u32 {
    3
}

fn default_max_cards() -> usize {
    1
}

impl EnemyDefinition {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, hp: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hp,
            energy: default_energy(),
            cards: Vec::new(),
            max_cards: default_max_cards(),
        }
    }

    #[must_use]
    pub fn with_energy(mut self, energy: u32) -> Self {
        self.energy = energy;
        self
    }

    #[must_use]
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = CardId>, max_cards: usize) -> Self {
        self.cards = cards.into_iter().collect();
        self.max_cards = max_cards;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct EnemyCatalog {
    enemies: FxHashMap<String, EnemyDefinition>,
}

impl EnemyCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON array of enemies.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let enemies: Vec<EnemyDefinition> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for enemy in enemies {
            catalog.register(enemy)?;
        }
        Ok(catalog)
    }

    pub fn register(&mut self, enemy: EnemyDefinition) -> Result<(), CatalogError> {
        if self.enemies.contains_key(&enemy.id) {
            return Err(CatalogError::DuplicateId {
                kind: "enemy",
                id: enemy.id,
            });
        }
        self.enemies.insert(enemy.id.clone(), enemy);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults() {
        let catalog = EnemyCatalog::from_json(
            r#"[{ "id": "slime", "name": "Slime", "hp": 20, "cards": ["spit"] }]"#,
        )
        .unwrap();

        let slime = catalog.get("slime").unwrap();
        assert_eq!(slime.energy, 3);
        assert_eq!(slime.max_cards, 1);
        assert_eq!(slime.cards, vec![CardId::new("spit")]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = EnemyCatalog::new();
        catalog.register(EnemyDefinition::new("a", "A", 5)).unwrap();
        assert!(catalog.register(EnemyDefinition::new("a", "A", 5)).is_err());
    }
}
