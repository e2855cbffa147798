use tracing::info;

use super::worker::{SharedTables, Worker};
use super::{AdjacencyCompressor, AdjacencyCompressorFactory, Targets};
use crate::alloc::{BumpAllocator, LocalAllocator};
use crate::codec::encode_sorted_deltas;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::graph::{AdjacencyList, AdjacencyListsWithProperties, CompressedAdjacencyList};

/// Factory writing targets as delta encoded vlong bytes.
pub struct DeltaVarLongCompressorFactory {
    tables: SharedTables,
    adjacency: BumpAllocator<u8>,
}

impl DeltaVarLongCompressorFactory {
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

impl AdjacencyCompressorFactory for DeltaVarLongCompressorFactory {
    type Compressor<'a> = DeltaVarLongCompressor<'a>;
    type Adjacency = CompressedAdjacencyList;

    fn create_compressor(&self) -> Self::Compressor<'_> {
        DeltaVarLongCompressor {
            adjacency: self.adjacency.new_local_allocator(),
            bytes: Vec::new(),
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
        let adjacency = CompressedAdjacencyList::new(degrees, offsets, pages);
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

/// Compressor of a [`DeltaVarLongCompressorFactory`].
pub struct DeltaVarLongCompressor<'a> {
    adjacency: LocalAllocator<'a, u8>,
    bytes: Vec<u8>,
    worker: Worker<'a>,
}

impl AdjacencyCompressor for DeltaVarLongCompressor<'_> {
    fn compress(&mut self, node: u64, targets: Targets<'_>, properties: &[&[u64]]) -> Result<u32> {
        let degree = self.worker.prepare(node, targets, properties)?;
        self.bytes.clear();
        encode_sorted_deltas(self.worker.targets(), &mut self.bytes);
        let address = self.adjacency.write(&self.bytes)?;
        self.worker.commit(node, degree, address)?;
        Ok(degree)
    }
}
