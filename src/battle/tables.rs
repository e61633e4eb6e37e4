//! Immutable configuration tables shared by every battle.

use crate::cards::CardCatalog;
use crate::combo::ComboTable;
use crate::core::CombatConfig;
use crate::ether::{EtherEconomy, EtherTable, SlotSchedule};
use crate::relics::RelicCatalog;

use super::enemy::EnemyCatalog;

/// Everything loaded once per run: catalogs, numeric tables and config.
///
/// Engines hold this behind an `Arc`; nothing in it changes during a battle.
#[derive(Clone, Debug, Default)]
pub struct CombatTables {
    pub cards: CardCatalog,
    pub relics: RelicCatalog,
    pub enemies: EnemyCatalog,
    pub combos: ComboTable,
    pub ether: EtherTable,
    pub slots: SlotSchedule,
    pub config: CombatConfig,
}

impl CombatTables {
    /// Tables with the given catalogs and default numbers.
    #[must_use]
    pub fn new(cards: CardCatalog, relics: RelicCatalog) -> Self {
        Self {
            cards,
            relics,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_enemies(mut self, enemies: EnemyCatalog) -> Self {
        self.enemies = enemies;
        self
    }

    #[must_use]
    pub fn with_combos(mut self, combos: ComboTable) -> Self {
        self.combos = combos;
        self
    }

    #[must_use]
    pub fn with_ether(mut self, ether: EtherTable) -> Self {
        self.ether = ether;
        self
    }

    #[must_use]
    pub fn with_slots(mut self, slots: SlotSchedule) -> Self {
        self.slots = slots;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    /// Ether computation over these tables.
    #[must_use]
    pub fn economy(&self) -> EtherEconomy<'_> {
        EtherEconomy::new(&self.ether, &self.combos, &self.config)
    }
}
