//! Ether economy: gain computation, per-side state and slot tiers.
//!
//! ## Key Types
//!
//! - `EtherEconomy`: Read-only gain computation (combo, relics, deflation)
//! - `EtherState`: Per-side accumulator, bank, slot and combo usage
//! - `SlotSchedule`: Cumulative thresholds mapping banked ether to slots

pub mod economy;
pub mod slots;
pub mod state;

pub use economy::{EtherEconomy, EtherGain, EtherModifier, EtherTable, MultiplierContext};
pub use slots::{SlotChange, SlotSchedule};
pub use state::{EtherProgress, EtherState, TurnCommit};
