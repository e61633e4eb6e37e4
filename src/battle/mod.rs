//! Turn resolution: the battle state machine and its step function.
//!
//! ## Key Types
//!
//! - `BattleState`: Complete, serializable state of one battle
//! - `ActionQueue`: Speed-ordered actions for one round
//! - `TurnEngine`: Owns a battle and drives select / respond / resolve
//! - `BattleEvent`: Everything that happened, for hosts to render
//! - `MetaSnapshot` / `CombatResult`: Interchange with the meta-state store

pub mod enemy;
pub mod engine;
pub mod event;
pub mod meta;
pub mod opponent;
pub mod piles;
pub mod queue;
pub mod state;
pub mod step;
pub mod tables;

pub use enemy::{EnemyCatalog, EnemyDefinition};
pub use engine::{SelectionPreview, TurnEngine};
pub use event::{BattleEvent, CombatantDelta, SkipReason};
pub use meta::{AbortResult, CombatResult, FixedRewards, MetaSnapshot, Outcome, RewardSource, Rewards, RollingRewards};
pub use opponent::{OpponentDecision, OpponentView, RandomOpponent, ScriptedOpponent};
pub use piles::{Destination, Piles};
pub use queue::{ActionQueue, QueuedAction};
pub use state::{BattlePhase, BattleState, SubmitLimits};
pub use step::{build_queue, end_combat, start_combat, step, StepOutcome};
pub use tables::CombatTables;
