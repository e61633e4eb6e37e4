//! Core types: sides, configuration, errors, RNG.
//!
//! These are shared by every other module and carry no combat rules of
//! their own.

pub mod side;
pub mod config;
pub mod error;
pub mod rng;

pub use side::{Side, SideMap};
pub use config::CombatConfig;
pub use error::{CatalogError, CommandError, SubmitError};
pub use rng::{BattleRng, BattleRngState};
