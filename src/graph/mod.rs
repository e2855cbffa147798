//! Read side of a finished build.
//!
//! Everything here is immutable: pages and tables were frozen by the
//! factory's `build`. Cursors borrow the pages and never allocate.
//!
//! - `uncompressed`: raw `u64` adjacency blocks
//! - `compressed`: delta-varlong adjacency blocks
//! - `properties`: per-channel property blocks
//! - `configured`: either representation, picked by configuration

pub mod compressed;
pub mod configured;
pub mod properties;
pub mod uncompressed;

pub use compressed::{CompressedAdjacencyCursor, CompressedAdjacencyList};
pub use configured::{ConfiguredAdjacencyCursor, ConfiguredAdjacencyList};
pub use properties::{AdjacencyProperties, PropertyCursor};
pub use uncompressed::{UncompressedAdjacencyCursor, UncompressedAdjacencyList};

/// Forward iteration over one node's neighbors, in ascending id order.
pub trait AdjacencyCursor: Iterator<Item = u64> {
    /// Next id without consuming it.
    fn peek(&self) -> Option<u64>;

    /// Ids not yet returned.
    fn remaining(&self) -> usize;

    /// Degree of the node this cursor walks.
    fn size(&self) -> usize;

    /// Skips to the first id strictly greater than `target` and returns it.
    fn skip_until(&mut self, target: u64) -> Option<u64> {
        loop {
            let next = self.next()?;
            if next > target {
                return Some(next);
            }
        }
    }

    /// Skips to the first id greater than or equal to `target` and returns it.
    fn advance_to(&mut self, target: u64) -> Option<u64> {
        loop {
            let next = self.next()?;
            if next >= target {
                return Some(next);
            }
        }
    }
}

/// Immutable per-node adjacency.
pub trait AdjacencyList: Send + Sync {
    /// Cursor type returned by [`adjacency_cursor`](Self::adjacency_cursor).
    type Cursor<'a>: AdjacencyCursor
    where
        Self: 'a;

    /// Number of nodes.
    fn node_count(&self) -> u64;

    /// Out-degree of `node` after aggregation.
    ///
    /// # Panics
    /// If `node >= self.node_count()`.
    fn degree(&self, node: u64) -> u32;

    /// Cursor over the neighbors of `node`.
    ///
    /// # Panics
    /// If `node >= self.node_count()`.
    fn adjacency_cursor(&self, node: u64) -> Self::Cursor<'_>;

    /// Heap bytes held by tables and pages.
    fn memory_usage(&self) -> usize;

    /// Sum of all degrees.
    fn relationship_count(&self) -> u64 {
        (0..self.node_count()).map(|node| u64::from(self.degree(node))).sum()
    }
}

/// Adjacency plus one property list per configured channel.
#[derive(Debug)]
pub struct AdjacencyListsWithProperties<L> {
    /// Topology.
    pub adjacency: L,
    /// Property channels, in configuration order.
    pub properties: Vec<AdjacencyProperties>,
}

impl<L> AdjacencyListsWithProperties<L> {
    /// Maps the topology, keeping the properties.
    pub fn map_adjacency<M>(self, f: impl FnOnce(L) -> M) -> AdjacencyListsWithProperties<M> {
        AdjacencyListsWithProperties {
            adjacency: f(self.adjacency),
            properties: self.properties,
        }
    }
}
