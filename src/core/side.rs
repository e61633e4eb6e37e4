//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two sides: the player and the opposing actor.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side` for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One side of a battle.
///
/// The declaration order is also the queue tie-break order: when two
/// actions share a speed position, the player's resolves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// Both sides in tie-break order.
    pub const ALL: [Side; 2] = [Side::Player, Side::Enemy];

    /// Get the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Get the slot index (0 for the player, 1 for the enemy).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use ether_combat::core::{Side, SideMap};
///
/// let mut points: SideMap<u32> = SideMap::new(|_| 0);
/// points[Side::Enemy] += 5;
///
/// assert_eq!(points[Side::Player], 0);
/// assert_eq!(points[Side::Enemy], 5);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Player), factory(Side::Enemy)],
        }
    }

    /// Create a SideMap from explicit player and enemy values.
    pub fn from_pair(player: T, enemy: T) -> Self {
        Self {
            data: [player, enemy],
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
