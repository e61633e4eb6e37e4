//! Error types.
//!
//! Only configuration loading and player commands can fail. Everything the
//! engine does while resolving is total: unknown references and malformed
//! payload fields degrade to no-ops and are logged instead.

use thiserror::Error;

use crate::battle::BattlePhase;

/// A configuration table could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("slot schedule must be strictly increasing (entry {index} is {value}, previous {previous})")]
    NonIncreasingSlots { index: usize, value: u64, previous: u64 },
}

/// A player submission was refused. The battle state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("submissions are only accepted in the select phase (current: {0:?})")]
    WrongPhase(BattlePhase),

    #[error("selection is empty")]
    EmptySelection,

    #[error("selected {got} cards but at most {max} may be submitted")]
    TooManyCards { max: usize, got: usize },

    #[error("selection costs {needed} energy but only {available} is available")]
    NotEnoughEnergy { needed: u32, available: u32 },

    #[error("selection speed {total} exceeds the cap of {max}")]
    SpeedExceeded { max: u32, total: u32 },

    #[error("hand index {0} is out of range")]
    UnknownHandIndex(usize),

    #[error("hand index {0} selected twice")]
    DuplicateIndex(usize),

    #[error("card '{0}' is not in the catalog")]
    UnknownCard(String),
}

/// A phase-control command was refused. The battle state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("command requires phase {expected:?} (current: {actual:?})")]
    WrongPhase {
        expected: BattlePhase,
        actual: BattlePhase,
    },

    #[error("no {0} remaining")]
    Exhausted(&'static str),

    #[error("battle has not ended (current: {0:?})")]
    NotTerminal(BattlePhase),
}
