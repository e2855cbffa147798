//! Build configuration.

use serde::{Deserialize, Serialize};

use crate::aggregation::Aggregation;
use crate::alloc::PageLayout;
use crate::collections::huge_array::MAX_SIZE;
use crate::error::{BuildError, Result};

/// Default bump allocator page shift (`1 << 18` elements per page).
pub const DEFAULT_PAGE_SHIFT: u32 = 18;

/// Default number of nodes handed to one compressor by the importer.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// On-heap representation of the adjacency blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionKind {
    /// Raw `u64` target ids.
    #[default]
    Uncompressed,
    /// Delta encoded, variable-length byte blocks.
    DeltaVarLong,
}

/// Everything a factory needs to size its tables and pick its policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Number of nodes; ids are `0..node_count`.
    pub node_count: u64,
    /// Adjacency block representation.
    pub compression: CompressionKind,
    /// Topology policy, used when there are no property channels.
    pub aggregation: Aggregation,
    /// One policy per property channel.
    pub property_aggregations: Vec<Aggregation>,
    /// Reorder properties without merging, even if channels ask for merges.
    pub no_aggregation: bool,
    /// Bump allocator page shift.
    pub page_shift: u32,
    /// Nodes per importer partition.
    pub batch_size: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            node_count: 0,
            compression: CompressionKind::default(),
            aggregation: Aggregation::default(),
            property_aggregations: Vec::new(),
            no_aggregation: false,
            page_shift: DEFAULT_PAGE_SHIFT,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl BuildConfig {
    /// Creates a default configuration for `node_count` nodes.
    pub fn new(node_count: u64) -> Self {
        Self {
            node_count,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`BuildError::Config`] for malformed JSON or unknown fields, and
    /// any [`validate`](Self::validate) error.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the block representation.
    #[must_use]
    pub fn with_compression(mut self, compression: CompressionKind) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the topology aggregation.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Sets one aggregation per property channel.
    #[must_use]
    pub fn with_property_aggregations(mut self, aggregations: impl Into<Vec<Aggregation>>) -> Self {
        self.property_aggregations = aggregations.into();
        self
    }

    /// Sets the build-wide "reorder only" flag.
    #[must_use]
    pub fn with_no_aggregation(mut self, no_aggregation: bool) -> Self {
        self.no_aggregation = no_aggregation;
        self
    }

    /// Sets the bump allocator page shift.
    #[must_use]
    pub fn with_page_shift(mut self, page_shift: u32) -> Self {
        self.page_shift = page_shift;
        self
    }

    /// Sets the importer partition size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Number of property channels.
    #[inline]
    pub fn property_count(&self) -> usize {
        self.property_aggregations.len()
    }

    /// Returns `true` when parallel relationships survive compression.
    ///
    /// Either the caller asked for it explicitly, or every policy in play is
    /// `NONE`.
    pub fn skips_aggregation(&self) -> bool {
        if self.no_aggregation {
            return true;
        }
        if self.property_aggregations.is_empty() {
            self.aggregation.keeps_parallel()
        } else {
            self.property_aggregations.iter().all(|agg| agg.keeps_parallel())
        }
    }

    /// Allocator page layout derived from `page_shift`.
    ///
    /// # Errors
    /// [`BuildError::InvalidPageShift`] if the shift is out of range.
    pub fn page_layout(&self) -> Result<PageLayout> {
        PageLayout::new(self.page_shift)
    }

    /// Performs every construction-time check.
    ///
    /// # Errors
    /// - [`BuildError::NodeCountOverflow`] if the node tables cannot be addressed.
    /// - [`BuildError::InvalidPageShift`] for an unsupported page shift.
    /// - [`BuildError::MixedAggregation`] if `NONE` is combined with merging policies.
    /// - [`BuildError::Config`] for a zero batch size.
    pub fn validate(&self) -> Result<()> {
        if self.node_count > MAX_SIZE {
            return Err(BuildError::NodeCountOverflow {
                size: self.node_count,
                max: MAX_SIZE,
            });
        }
        self.page_layout()?;
        if self.batch_size == 0 {
            return Err(BuildError::Config("batch_size must be positive".into()));
        }

        let keeps = self
            .property_aggregations
            .iter()
            .filter(|agg| agg.keeps_parallel())
            .count();
        if keeps > 0 && keeps < self.property_aggregations.len() {
            let names: Vec<String> = self
                .property_aggregations
                .iter()
                .map(ToString::to_string)
                .collect();
            return Err(BuildError::MixedAggregation(names.join(", ")));
        }
        Ok(())
    }
}
