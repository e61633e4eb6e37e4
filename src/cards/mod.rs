//! Card system: definitions and catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardType`: Attack / defense / support, also the combo "suit"
//! - `Rarity`: Tier that sets a card's base ether value
//! - `CardDefinition`: Immutable card data
//! - `CardCatalog`: Definition lookup

pub mod definition;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardType, Rarity, SpecialEffect};
pub use registry::CardCatalog;
