//! Combatants and their status effects.

pub mod combatant;
pub mod status;

pub use combatant::{Combatant, DamageReport};
pub use status::{DecayReport, StatusEffects, StatusEntry, StatusGrant, StatusKind, Target};
