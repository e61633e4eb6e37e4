//! Events emitted for the presentation layer.
//!
//! The engine never waits on these. Each step returns the events it
//! produced, in the order things happened; a host can animate from them
//! without re-deriving any rule.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::combat::{Combatant, StatusKind};
use crate::combo::ComboName;
use crate::core::{Side, SideMap};
use crate::relics::{RelicId, RelicTrigger};

use super::state::BattlePhase;

/// Numeric change to one combatant over one action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantDelta {
    pub hp: i64,
    pub block: i64,
    pub energy: i64,
    pub strength: i64,
    pub counter: i64,
}

impl CombatantDelta {
    /// Difference between two snapshots of the same combatant.
    #[must_use]
    pub fn between(before: &Combatant, after: &Combatant) -> Self {
        Self {
            hp: after.hp - before.hp,
            block: after.block - before.block,
            energy: i64::from(after.energy) - i64::from(before.energy),
            strength: after.strength - before.strength,
            counter: after.counter - before.counter,
        }
    }
}

/// Why a queued action did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    Stunned,
    UnknownCard,
}

/// Something that happened in a battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    PhaseChanged {
        from: BattlePhase,
        to: BattlePhase,
    },

    TurnStarted {
        turn: u32,
    },

    CardsDrawn {
        count: usize,
    },

    /// One queued action finished resolving.
    ActionResolved {
        actor: Side,
        card: CardId,
        q_index: usize,
        deltas: SideMap<CombatantDelta>,
        ether_gained: u64,
        relics: Vec<RelicId>,
    },

    ActionSkipped {
        actor: Side,
        card: CardId,
        reason: SkipReason,
    },

    RelicActivated {
        relic: RelicId,
        trigger: RelicTrigger,
    },

    ComboDetected {
        side: Side,
        combo: ComboName,
    },

    EtherBurst {
        side: Side,
        damage: i64,
    },

    EtherBanked {
        side: Side,
        amount: u64,
        total: u64,
    },

    SlotChanged {
        side: Side,
        from: u32,
        to: u32,
    },

    QueueShifted {
        target: Side,
        delta: i64,
        moved: usize,
    },

    CardRecalled {
        card: CardId,
    },

    CardExhausted {
        card: CardId,
    },

    PoisonDamage {
        side: Side,
        amount: i64,
    },

    StatusExpired {
        side: Side,
        kind: StatusKind,
    },
}
