//! Merge policies for parallel relationships.
//!
//! Every policy is a closed-form associative and commutative fold over `f64`
//! values, so the merged result does not depend on which duplicate is seen
//! first. `SINGLE` is the one exception: it keeps the running value, and the
//! compressor feeds duplicates in input order, which makes it "first wins".

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// How duplicate `(source, target)` pairs are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aggregation {
    /// Keep every parallel relationship.
    #[default]
    None,
    /// Keep the first relationship, drop the rest.
    Single,
    /// Sum property values.
    Sum,
    /// Keep the smallest property value.
    Min,
    /// Keep the largest property value.
    Max,
    /// Count parallel relationships.
    Count,
}

impl Aggregation {
    /// All policies, in declaration order.
    pub const ALL: [Aggregation; 6] = [
        Aggregation::None,
        Aggregation::Single,
        Aggregation::Sum,
        Aggregation::Min,
        Aggregation::Max,
        Aggregation::Count,
    ];

    /// Returns `true` if duplicates are kept as-is.
    #[inline]
    pub const fn keeps_parallel(self) -> bool {
        matches!(self, Aggregation::None)
    }

    /// Maps an incoming value to the value that enters the fold.
    #[inline]
    pub fn normalize(self, value: f64) -> f64 {
        match self {
            Aggregation::Count => 1.0,
            _ => value,
        }
    }

    /// Folds a normalized `value` into `running`.
    #[inline]
    pub fn merge(self, running: f64, value: f64) -> f64 {
        match self {
            Aggregation::None | Aggregation::Single => running,
            Aggregation::Sum | Aggregation::Count => running + value,
            Aggregation::Min => running.min(value),
            Aggregation::Max => running.max(value),
        }
    }

    /// Normalizes raw `f64` bits.
    #[inline]
    pub fn normalize_bits(self, value: u64) -> u64 {
        self.normalize(f64::from_bits(value)).to_bits()
    }

    /// [`merge`](Self::merge) on the bit patterns stored in property pages.
    ///
    /// `value` is normalized here, `running` is expected to be normalized
    /// already.
    #[inline]
    pub fn merge_bits(self, running: u64, value: u64) -> u64 {
        match self {
            Aggregation::None | Aggregation::Single => running,
            _ => self
                .merge(f64::from_bits(running), self.normalize(f64::from_bits(value)))
                .to_bits(),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Aggregation::None => "NONE",
            Aggregation::Single => "SINGLE",
            Aggregation::Sum => "SUM",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
            Aggregation::Count => "COUNT",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aggregation {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aggregation::ALL
            .into_iter()
            .find(|agg| agg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BuildError::Config(format!("unknown aggregation `{s}`")))
    }
}
