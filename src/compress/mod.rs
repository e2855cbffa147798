//! Adjacency compressors and their factories.
//!
//! A factory owns everything shared by one build: the degree and offset
//! tables and the page allocators. Workers each take a compressor from it,
//! feed it one node at a time, and drop it. Compressors borrow the factory,
//! so [`AdjacencyCompressorFactory::build`] can only run once all of them
//! are gone.
//!
//! Per node, a compressor:
//! 1. validates the batch (node range, property channel shapes),
//! 2. decodes it into a reusable buffer,
//! 3. sorts the targets and aggregates parallel relationships,
//! 4. writes the targets (and every property channel) into pages,
//! 5. records degree and offset.

mod aggregate;
mod configured;
mod delta_varlong;
mod uncompressed;
mod worker;

pub use configured::{ConfiguredCompressor, ConfiguredCompressorFactory};
pub use delta_varlong::{DeltaVarLongCompressor, DeltaVarLongCompressorFactory};
pub use uncompressed::{UncompressedCompressor, UncompressedCompressorFactory};

use crate::error::Result;
use crate::graph::{AdjacencyList, AdjacencyListsWithProperties};

/// Targets of one node as handed to a compressor.
#[derive(Debug, Clone, Copy)]
pub enum Targets<'a> {
    /// Plain ids, any order.
    Raw(&'a [u64]),
    /// `count` ids as zig-zag delta vlongs, any order, the first delta taken
    /// from zero.
    Compressed {
        /// Encoded stream.
        bytes: &'a [u8],
        /// Number of ids in the stream.
        count: usize,
    },
}

impl Targets<'_> {
    /// Number of ids before aggregation.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Targets::Raw(ids) => ids.len(),
            Targets::Compressed { count, .. } => *count,
        }
    }

    /// Returns `true` if there are no ids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a [u64]> for Targets<'a> {
    fn from(ids: &'a [u64]) -> Self {
        Targets::Raw(ids)
    }
}

/// Compresses one node's relationships at a time.
pub trait AdjacencyCompressor {
    /// Compresses the relationships of `node`.
    ///
    /// `properties` holds one slice per configured channel, each aligned
    /// with `targets`, carrying `f64` bit patterns. Returns the degree after
    /// aggregation.
    ///
    /// # Errors
    /// - [`BuildError::NodeOutOfRange`](crate::BuildError::NodeOutOfRange) for an unknown node.
    /// - [`BuildError::NodeAlreadyProcessed`](crate::BuildError::NodeAlreadyProcessed) on a second call for `node`.
    /// - [`BuildError::PropertyChannelMismatch`](crate::BuildError::PropertyChannelMismatch) and
    ///   [`BuildError::PropertyLengthMismatch`](crate::BuildError::PropertyLengthMismatch) for misshapen properties.
    /// - [`BuildError::MalformedInput`](crate::BuildError::MalformedInput) for a broken compressed stream.
    /// - Allocation errors from the page allocators.
    fn compress(&mut self, node: u64, targets: Targets<'_>, properties: &[&[u64]]) -> Result<u32>;
}

/// Creates compressors for concurrent use and assembles their output.
pub trait AdjacencyCompressorFactory: Sync {
    /// Compressor handed to one worker.
    type Compressor<'a>: AdjacencyCompressor + Send
    where
        Self: 'a;

    /// Read side produced by [`build`](Self::build).
    type Adjacency: AdjacencyList;

    /// Returns a compressor with its own scratch space and page handles.
    fn create_compressor(&self) -> Self::Compressor<'_>;

    /// Number of nodes.
    fn node_count(&self) -> u64;

    /// Number of property channels.
    fn property_count(&self) -> usize;

    /// Freezes every table and page into the read side.
    ///
    /// Nodes that were never compressed read as degree 0.
    fn build(self) -> AdjacencyListsWithProperties<Self::Adjacency>
    where
        Self: Sized;
}
