use tracing::info;

use super::worker::{SharedTables, Worker};
use super::{AdjacencyCompressor, AdjacencyCompressorFactory, Targets};
use crate::alloc::{BumpAllocator, LocalAllocator};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::graph::{AdjacencyList, AdjacencyListsWithProperties, UncompressedAdjacencyList};

/// Factory writing targets as raw `u64` ids.
pub struct UncompressedCompressorFactory {
    tables: SharedTables,
    adjacency: BumpAllocator<u64>,
}

impl UncompressedCompressorFactory {
    /// Sizes the node tables and allocators for `config`.
    ///
    /// # Errors
    /// Any error from [`BuildConfig::validate`].
    pub fn new(config: &BuildConfig) -> Result<Self> {
        let tables = SharedTables::new(config)?;
        let adjacency = BumpAllocator::new(tables.layout());
        Ok(Self { tables, adjacency })
    }
}

impl AdjacencyCompressorFactory for UncompressedCompressorFactory {
    type Compressor<'a> = UncompressedCompressor<'a>;
    type Adjacency = UncompressedAdjacencyList;

    fn create_compressor(&self) -> Self::Compressor<'_> {
        UncompressedCompressor {
            adjacency: self.adjacency.new_local_allocator(),
            worker: self.tables.worker(),
        }
    }

    fn node_count(&self) -> u64 {
        self.tables.node_count()
    }

    fn property_count(&self) -> usize {
        self.tables.property_count()
    }

    fn build(self) -> AdjacencyListsWithProperties<Self::Adjacency> {
        let pages = self.adjacency.into_pages();
        let (degrees, offsets, properties) = self.tables.finish();
        let adjacency = UncompressedAdjacencyList::new(degrees, offsets, pages);
        info!(
            nodes = adjacency.node_count(),
            relationships = adjacency.relationship_count(),
            channels = properties.len(),
            bytes = adjacency.memory_usage(),
            "factory.build"
        );
        AdjacencyListsWithProperties {
            adjacency,
            properties,
        }
    }
}

/// Compressor of an [`UncompressedCompressorFactory`].
pub struct UncompressedCompressor<'a> {
    adjacency: LocalAllocator<'a, u64>,
    worker: Worker<'a>,
}

impl AdjacencyCompressor for UncompressedCompressor<'_> {
    fn compress(&mut self, node: u64, targets: Targets<'_>, properties: &[&[u64]]) -> Result<u32> {
        let degree = self.worker.prepare(node, targets, properties)?;
        let address = self.adjacency.write(self.worker.targets())?;
        self.worker.commit(node, degree, address)?;
        Ok(degree)
    }
}
