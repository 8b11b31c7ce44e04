use thiserror::Error;

use crate::stats::series::SeriesName;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the league statistics and scoring core.
///
/// Division-by-zero style edge cases (no matches played, zero opponent
/// average, zero total games) are deliberately absent: they are defined to
/// yield 0 and belong to the normal contract, not the taxonomy.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Index value below the `-1` latest sentinel.
    #[error("index value {0} is invalid, must be greater than or equal to -1")]
    IndexOutOfRange(i64),

    /// Attempt to modify an index that was locked after being stored.
    #[error("cannot modify a locked index")]
    LockedIndex,

    /// A league/personal index pair was registered twice.
    #[error("league index {0} is already registered")]
    DuplicateIndex(i64),

    /// Results recorded for a league index older than the latest one seen.
    #[error("cannot record results at league index {given}, latest is {latest}")]
    BackToTheFuture { given: i64, latest: i64 },

    /// Second write to a first-write-wins series slot.
    #[error("refusing to overwrite {series} at personal index {index}")]
    Overwrite { series: SeriesName, index: i64 },

    /// Derived data requested or written before any match result exists.
    #[error("no match recorded yet for this entity")]
    NoMatchPlayedYet,

    /// An exact, non-extendable lookup hit an index that was never registered.
    #[error("{series} has no value at personal index {index}")]
    SeriesIndexNotFound { series: SeriesName, index: i64 },

    /// Integer written to a float series or vice versa.
    #[error("{series} holds {expected} values, got {given}")]
    SeriesKindMismatch {
        series: SeriesName,
        expected: &'static str,
        given: &'static str,
    },

    /// Only the derived series (match points, rank) may be reset.
    #[error("{0} is not a resettable series")]
    NotResettable(SeriesName),

    /// Ranks are 1-based.
    #[error("rank must be greater than or equal to 1, got {0}")]
    InvalidRank(i64),

    /// Level scoring factors live in (0, 1].
    #[error("level scoring factor {0} is outside (0, 1]")]
    InvalidLevelFactor(f64),

    /// Level revision for a match the entity has not played yet.
    #[error("cannot revise level at match index {index}, only {played} matches played")]
    LevelRevisionTooEarly { index: i64, played: i64 },

    /// Registry lookup on an unknown name.
    #[error("playing entity '{0}' is not registered with the league")]
    UnknownEntity(String),

    /// Registry insert with a name already taken.
    #[error("playing entity '{0}' already exists")]
    DuplicateEntity(String),

    /// A match where one side faces itself (or a team containing itself).
    #[error("'{0}' cannot play against itself")]
    SelfPlay(String),

    /// Singles entity matched against a doubles entity.
    #[error("cannot mix singles and doubles in one match ('{0}' vs '{1}')")]
    MixedPlayTypes(String, String),

    /// Doubles match whose four player slots are not distinct.
    #[error("doubles rosters overlap between '{0}' and '{1}'")]
    OverlappingRosters(String, String),
}
