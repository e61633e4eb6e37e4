//! Relics: persistent equippable modifiers.
//!
//! ## Key Types
//!
//! - `RelicDefinition`: Catalog entry with exactly one trigger
//! - `RelicEffect`: Passive stats or a triggered change record
//! - `RelicCondition`: Predicate gating a triggered effect
//! - `RelicCatalog`: Lenient JSON-decoded lookup by id
//! - `RelicPipeline`: Owned relics in display order; fires triggers

pub mod catalog;
pub mod condition;
pub mod definition;
pub mod pipeline;

pub use catalog::RelicCatalog;
pub use condition::{ConditionContext, ConditionEvaluator, RelicCondition};
pub use definition::{
    PassiveStats, RelicChanges, RelicDefinition, RelicEffect, RelicId, RelicTrigger, TriggeredEffect,
};
pub use pipeline::{RelicActivation, RelicPipeline};
