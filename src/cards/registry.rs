//! Card catalog for definition lookup.
//!
//! The catalog is loaded once at startup and shared read-only by every
//! battle.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::core::CatalogError;

/// Catalog of card definitions keyed by id.
///
/// ## Example
///
/// ```
/// use ether_combat::cards::{CardCatalog, CardDefinition, CardId, CardType};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::new("strike", "Strike", CardType::Attack)).unwrap();
///
/// assert_eq!(catalog.get(&CardId::new("strike")).unwrap().name, "Strike");
/// assert!(catalog.get(&CardId::new("missing")).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON array of card definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for card in cards {
            catalog.register(card)?;
        }
        Ok(catalog)
    }

    /// Register a card definition.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        if self.cards.contains_key(&card.id) {
            return Err(CatalogError::DuplicateId {
                kind: "card",
                id: card.id.0,
            });
        }
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Check if a card exists.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Resolve a list of ids, dropping (and logging) unknown ones.
    #[must_use]
    pub fn resolve_all<'a>(&'a self, ids: &[CardId]) -> Vec<&'a CardDefinition> {
        ids.iter()
            .filter_map(|id| {
                let card = self.get(id);
                if card.is_none() {
                    tracing::warn!(card = %id, "unknown card id ignored");
                }
                card
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
