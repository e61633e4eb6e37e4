//! Poker-style combos over played cards and their ether multipliers.

pub mod detector;
pub mod table;

pub use detector::{ComboDetector, ComboName, ComboResult};
pub use table::ComboTable;
