//! Error type shared by configuration, allocation and compression.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors raised while configuring or running an adjacency build.
///
/// Everything here is a rejection: the build has no transient failures and
/// nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The requested element count needs more pages than can be addressed.
    #[error("size {size} exceeds the addressable maximum of {max}")]
    NodeCountOverflow {
        /// Requested element count.
        size: u64,
        /// Largest supported element count.
        max: u64,
    },
    /// The allocator ran out of addressable page indices.
    #[error("page index space exhausted after {pages} pages")]
    PageIndexOverflow {
        /// Number of pages claimed so far.
        pages: usize,
    },
    /// A page shift outside the supported range.
    #[error("page shift {shift} is outside {min}..={max}")]
    InvalidPageShift {
        /// Requested shift.
        shift: u32,
        /// Smallest supported shift.
        min: u32,
        /// Largest supported shift.
        max: u32,
    },
    /// `NONE` combined with merging aggregations on other channels.
    #[error("aggregation NONE cannot be combined with merging aggregations ({0})")]
    MixedAggregation(String),
    /// Node id outside `0..node_count`.
    #[error("node {node} is outside 0..{node_count}")]
    NodeOutOfRange {
        /// Offending node.
        node: u64,
        /// Configured node count.
        node_count: u64,
    },
    /// The node's degree and offset were already written.
    #[error("node {0} has already been compressed")]
    NodeAlreadyProcessed(u64),
    /// A compress call passed the wrong number of property channels.
    #[error("expected {expected} property channels, got {actual}")]
    PropertyChannelMismatch {
        /// Channels configured on the factory.
        expected: usize,
        /// Channels passed by the caller.
        actual: usize,
    },
    /// A property channel does not have one value per target.
    #[error("property channel {channel} holds {actual} values for {expected} targets")]
    PropertyLengthMismatch {
        /// Channel index.
        channel: usize,
        /// Number of targets.
        expected: usize,
        /// Number of values in the channel.
        actual: usize,
    },
    /// A single node has more targets than a degree can hold.
    #[error("degree {0} exceeds i32::MAX")]
    DegreeOverflow(usize),
    /// A positional write does not fit the slot its bump write reserved.
    #[error("positional write of {length} elements at offset {offset} of page {page} overruns its capacity of {capacity}")]
    PositionalOverrun {
        /// Page index of the target address.
        page: usize,
        /// In-page offset of the target address.
        offset: usize,
        /// Elements to write.
        length: usize,
        /// Largest extent reservable at that address.
        capacity: usize,
    },
    /// Variable-length input ended early or carried an over-long value.
    #[error("malformed variable-length input: {0}")]
    MalformedInput(&'static str),
    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
