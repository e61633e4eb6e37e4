//! # ether-combat
//!
//! A deterministic card-combat core: speed-ordered action queues, an
//! ordered relic pipeline, status effects and a combo-driven ether economy.
//!
//! ## Design Principles
//!
//! 1. **Explicit State**: A battle is one [`BattleState`] value. Every
//!    resolve step takes the prior state and returns a new one, so any
//!    step can be checkpointed, replayed or inspected.
//!
//! 2. **Injected Decisions**: The opponent's choices and reward rolls come
//!    from suppliers handed to the engine. The core never draws a random
//!    number on its own.
//!
//! 3. **Table-Driven Rules**: Cards, relics, enemies, combo multipliers,
//!    rarity values and slot thresholds are loaded once into
//!    [`CombatTables`] and shared read-only.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Collections are `im` vectors and maps,
//!   so cloning the state between steps is cheap.
//!
//! - **Total Resolution**: Unknown references and malformed payloads degrade
//!   to logged no-ops. Only loading tables and player commands return errors.
//!
//! ## Modules
//!
//! - `core`: Sides, configuration, errors, RNG
//! - `cards`: Card definitions and catalog
//! - `combat`: Combatants and status effects
//! - `combo`: Combo detection and multiplier table
//! - `ether`: Ether gain, deflation, banking and slots
//! - `relics`: Relic catalog, conditions and trigger pipeline
//! - `battle`: Battle state, action queue, step function and engine

pub mod core;
pub mod cards;
pub mod combat;
pub mod combo;
pub mod ether;
pub mod relics;
pub mod battle;

// Re-export commonly used types
pub use crate::core::{
    BattleRng, BattleRngState, CatalogError, CombatConfig, CommandError, Side, SideMap, SubmitError,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardId, CardType, Rarity, SpecialEffect};

pub use crate::combat::{Combatant, StatusEffects, StatusGrant, StatusKind, Target};

pub use crate::combo::{ComboDetector, ComboName, ComboResult, ComboTable};

pub use crate::ether::{EtherEconomy, EtherGain, EtherModifier, EtherState, EtherTable, SlotSchedule};

pub use crate::relics::{
    RelicCatalog, RelicChanges, RelicCondition, RelicDefinition, RelicId, RelicPipeline, RelicTrigger,
};

pub use crate::battle::{
    BattleEvent, BattlePhase, BattleState, CombatResult, CombatTables, EnemyDefinition, MetaSnapshot,
    OpponentDecision, TurnEngine,
};
