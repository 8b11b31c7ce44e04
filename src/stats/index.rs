use std::cmp::Ordering;
use std::fmt;

use crate::errors::{Error, Result};

/// Sentinel meaning "latest recorded index". Accepted at the interface,
/// never stored as a key.
pub const LATEST: i64 = -1;

/// Match index from the league's perspective: one tick per recorded match,
/// shared by every entity of a play type.
#[derive(Debug, Clone, Copy)]
pub struct LeagueIndex {
    value: i64,
    locked: bool,
}

/// Match index from one entity's perspective: one tick per match that entity
/// actually played. Never interchangeable with [`LeagueIndex`] without going
/// through the translator.
#[derive(Debug, Clone, Copy)]
pub struct PlayerIndex {
    value: i64,
    locked: bool,
}

macro_rules! index_impl {
    ($name:ident, $label:literal) => {
        impl $name {
            /// Index 0 means "before any match"; -1 is the latest sentinel.
            pub fn new(value: i64) -> Result<Self> {
                if value < LATEST {
                    return Err(Error::IndexOutOfRange(value));
                }
                Ok(Self {
                    value,
                    locked: false,
                })
            }

            pub fn zero() -> Self {
                Self {
                    value: 0,
                    locked: false,
                }
            }

            pub fn latest() -> Self {
                Self {
                    value: LATEST,
                    locked: false,
                }
            }

            pub fn value(&self) -> i64 {
                self.value
            }

            pub fn is_latest(&self) -> bool {
                self.value == LATEST
            }

            pub fn is_locked(&self) -> bool {
                self.locked
            }

            /// Fails on a locked index; a stored copy stays immutable no
            /// matter who still holds a handle to an unlocked twin.
            pub fn advance(&mut self, delta: i64) -> Result<()> {
                if self.locked {
                    return Err(Error::LockedIndex);
                }
                let next = self.value + delta;
                if next < LATEST {
                    return Err(Error::IndexOutOfRange(next));
                }
                self.value = next;
                Ok(())
            }

            /// Independent immutable copy (value semantics).
            pub fn locked(&self) -> Self {
                Self {
                    value: self.value,
                    locked: true,
                }
            }

            /// Independent mutable copy.
            pub fn unlocked(&self) -> Self {
                Self {
                    value: self.value,
                    locked: false,
                }
            }
        }

        // The lock flag is bookkeeping, not identity: ordering, equality and
        // hashing consider the value only.
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.value == other.value
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.value.cmp(&other.value)
            }
        }

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.value.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.value)
            }
        }
    };
}

index_impl!(LeagueIndex, "league index");
index_impl!(PlayerIndex, "player index");

/// An index of either clock, for queries that accept both. Conversion to a
/// concrete clock always goes through the statistics translator; the two
/// wrapped types never unify implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatIndex {
    League(LeagueIndex),
    Player(PlayerIndex),
}

impl StatIndex {
    pub fn value(&self) -> i64 {
        match self {
            StatIndex::League(i) => i.value(),
            StatIndex::Player(i) => i.value(),
        }
    }

    pub fn is_latest(&self) -> bool {
        self.value() == LATEST
    }
}

impl From<LeagueIndex> for StatIndex {
    fn from(index: LeagueIndex) -> Self {
        StatIndex::League(index)
    }
}

impl From<PlayerIndex> for StatIndex {
    fn from(index: PlayerIndex) -> Self {
        StatIndex::Player(index)
    }
}

impl fmt::Display for StatIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatIndex::League(i) => i.fmt(f),
            StatIndex::Player(i) => i.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_values_below_latest_sentinel() {
        assert_eq!(LeagueIndex::new(-2).unwrap_err(), Error::IndexOutOfRange(-2));
        assert_eq!(PlayerIndex::new(-5).unwrap_err(), Error::IndexOutOfRange(-5));
    }

    #[test]
    fn test_zero_and_latest_are_legal() {
        assert_eq!(LeagueIndex::new(0).unwrap().value(), 0);
        assert!(LeagueIndex::new(-1).unwrap().is_latest());
        assert!(PlayerIndex::latest().is_latest());
    }

    #[test]
    fn test_advance_moves_unlocked_index() {
        let mut index = PlayerIndex::new(1).unwrap();
        index.advance(2).unwrap();
        assert_eq!(index.value(), 3);
    }

    #[test]
    fn test_advance_fails_on_locked_index() {
        let mut index = LeagueIndex::new(4).unwrap().locked();
        assert_eq!(index.advance(1).unwrap_err(), Error::LockedIndex);
        assert_eq!(index.value(), 4);

        let mut unlocked = index.unlocked();
        unlocked.advance(1).unwrap();
        assert_eq!(unlocked.value(), 5);
        // the locked original is untouched
        assert_eq!(index.value(), 4);
    }

    #[test]
    fn test_advance_cannot_go_below_sentinel() {
        let mut index = LeagueIndex::zero();
        assert_eq!(index.advance(-3).unwrap_err(), Error::IndexOutOfRange(-3));
    }

    #[test]
    fn test_ordering_ignores_lock_flag() {
        let a = PlayerIndex::new(2).unwrap().locked();
        let b = PlayerIndex::new(2).unwrap();
        assert_eq!(a, b);
        assert!(PlayerIndex::new(1).unwrap() < b);
    }

    #[test]
    fn test_stat_index_wraps_both_clocks() {
        let league: StatIndex = LeagueIndex::new(3).unwrap().into();
        let player: StatIndex = PlayerIndex::new(3).unwrap().into();
        assert_eq!(league.value(), player.value());
        // but the variants stay distinct
        assert_ne!(league, player);
    }
}
