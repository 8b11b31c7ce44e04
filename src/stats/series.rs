use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{Error, Result};

/// The per-entity time series tracked by the statistics core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeriesName {
    GamesWon,
    GamesLost,
    MatchPoints,
    Rank,
    LevelFactor,
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeriesName::GamesWon => "games won",
            SeriesName::GamesLost => "games lost",
            SeriesName::MatchPoints => "match points",
            SeriesName::Rank => "rank",
            SeriesName::LevelFactor => "level scoring factor",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Integer,
    Float,
}

/// A single sample in a series; the kind is fixed per series at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesValue {
    Integer(i64),
    Float(f64),
}

impl SeriesValue {
    pub fn kind(&self) -> SeriesKind {
        match self {
            SeriesValue::Integer(_) => SeriesKind::Integer,
            SeriesValue::Float(_) => SeriesKind::Float,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind() {
            SeriesKind::Integer => "integer",
            SeriesKind::Float => "float",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SeriesValue::Integer(value) => Some(*value),
            SeriesValue::Float(_) => None,
        }
    }

    /// Numeric view for averages and display; integers widen losslessly.
    pub fn to_f64(&self) -> f64 {
        match self {
            SeriesValue::Integer(value) => *value as f64,
            SeriesValue::Float(value) => *value,
        }
    }
}

/// One sparse, seeded, append-mostly time series keyed by personal index.
///
/// Index 0 always holds the seed (initial points, initial level, ...).
/// Whether a missing key falls back to the latest earlier sample
/// (`extendable`), whether a slot may be re-assigned (`overwritable`), and
/// whether a recomputation pass may wipe it back to the seed (`resettable`)
/// are fixed per series.
#[derive(Debug)]
pub struct Series {
    name: SeriesName,
    kind: SeriesKind,
    extendable: bool,
    overwritable: bool,
    resettable: bool,
    seed: SeriesValue,
    entries: BTreeMap<i64, SeriesValue>,
}

impl Series {
    pub fn new(
        name: SeriesName,
        seed: SeriesValue,
        extendable: bool,
        overwritable: bool,
        resettable: bool,
    ) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(0, seed);
        Self {
            name,
            kind: seed.kind(),
            extendable,
            overwritable,
            resettable,
            seed,
            entries,
        }
    }

    pub fn name(&self) -> SeriesName {
        self.name
    }

    pub fn is_extendable(&self) -> bool {
        self.extendable
    }

    /// Largest key with a recorded sample (at least 0, the seed).
    pub fn latest_key(&self) -> i64 {
        self.entries.keys().next_back().copied().unwrap_or(0)
    }

    pub fn contains(&self, key: i64) -> bool {
        self.entries.contains_key(&key)
    }

    /// Writes a sample, enforcing the declared kind and, for
    /// first-write-wins series, the no-overwrite rule.
    pub fn insert(&mut self, key: i64, value: SeriesValue) -> Result<()> {
        if value.kind() != self.kind {
            return Err(Error::SeriesKindMismatch {
                series: self.name,
                expected: self.seed.kind_label(),
                given: value.kind_label(),
            });
        }
        if !self.overwritable && self.entries.contains_key(&key) {
            return Err(Error::Overwrite {
                series: self.name,
                index: key,
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Reads the sample at `key`, extending forward from the latest earlier
    /// sample when the series allows it.
    pub fn get(&self, key: i64) -> Result<SeriesValue> {
        if let Some(value) = self.entries.get(&key) {
            return Ok(*value);
        }
        if self.extendable {
            // seed at 0 guarantees the range is never empty
            let (_, value) = self
                .entries
                .range(..=key)
                .next_back()
                .expect("series always holds its seed");
            return Ok(*value);
        }
        if self.entries.len() == 1 {
            return Err(Error::NoMatchPlayedYet);
        }
        Err(Error::SeriesIndexNotFound {
            series: self.name,
            index: key,
        })
    }

    /// Sum of all samples with key at or below `key`, seed included.
    pub fn cumulative(&self, key: i64) -> SeriesValue {
        match self.kind {
            SeriesKind::Integer => {
                let total = self
                    .entries
                    .range(..=key)
                    .filter_map(|(_, value)| value.as_integer())
                    .sum();
                SeriesValue::Integer(total)
            }
            SeriesKind::Float => {
                let total = self.entries.range(..=key).map(|(_, value)| value.to_f64()).sum();
                SeriesValue::Float(total)
            }
        }
    }

    /// Wipes everything but the seed. Only the derived series allow this.
    pub fn reset(&mut self) -> Result<()> {
        if !self.resettable {
            return Err(Error::NotResettable(self.name));
        }
        self.entries.clear();
        self.entries.insert(0, self.seed);
        Ok(())
    }
}
