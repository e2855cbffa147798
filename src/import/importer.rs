use core::ops::Range;

use tracing::{debug, info, warn};

use super::ChunkedAdjacencyLists;
use crate::compress::{AdjacencyCompressor, AdjacencyCompressorFactory, ConfiguredCompressorFactory};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::graph::{AdjacencyListsWithProperties, ConfiguredAdjacencyList};

/// Output of [`AdjacencyImporter::build`].
#[derive(Debug)]
pub struct ImportResult {
    /// Adjacency and property lists.
    pub lists: AdjacencyListsWithProperties<ConfiguredAdjacencyList>,
    /// Relationships that survived aggregation.
    pub relationship_count: u64,
}

/// Collects relationships and turns them into compressed adjacency.
#[derive(Debug)]
pub struct AdjacencyImporter {
    config: BuildConfig,
    lists: ChunkedAdjacencyLists,
}

impl AdjacencyImporter {
    /// Creates an importer for `config`.
    ///
    /// # Errors
    /// Any error from [`BuildConfig::validate`].
    pub fn new(config: BuildConfig) -> Result<Self> {
        config.validate()?;
        let lists = ChunkedAdjacencyLists::new(config.node_count, config.property_count())?;
        Ok(Self { config, lists })
    }

    /// Configuration this importer was created with.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Stages `source -> target` with one value per property channel.
    ///
    /// # Errors
    /// [`BuildError::NodeOutOfRange`](crate::BuildError::NodeOutOfRange) or
    /// [`BuildError::PropertyChannelMismatch`](crate::BuildError::PropertyChannelMismatch).
    pub fn add_relationship(&mut self, source: u64, target: u64, properties: &[f64]) -> Result<()> {
        self.lists.add_one(source, target, properties)
    }

    /// Stages many targets of `source`; `properties` carries `f64` bits.
    ///
    /// # Errors
    /// See [`ChunkedAdjacencyLists::add`].
    pub fn add_targets(&mut self, source: u64, targets: &[u64], properties: &[&[u64]]) -> Result<()> {
        self.lists.add(source, targets, properties)
    }

    /// Relationships staged so far, before aggregation.
    pub fn staged_relationships(&self) -> u64 {
        self.lists.relationship_count()
    }

    /// Compresses every node, `batch_size` nodes per compressor.
    ///
    /// # Errors
    /// The first error any batch reports.
    pub fn build(self) -> Result<ImportResult> {
        let factory = ConfiguredCompressorFactory::new(&self.config)?;
        let node_count = self.lists.node_count();
        let batch = self.config.batch_size as u64;
        let partitions: Vec<Range<u64>> = (0..node_count)
            .step_by(self.config.batch_size)
            .map(|start| start..(start + batch).min(node_count))
            .collect();

        let relationship_count = compress_partitions(&factory, &self.lists, &partitions)?;
        info!(
            nodes = node_count,
            partitions = partitions.len(),
            staged = self.lists.relationship_count(),
            relationships = relationship_count,
            "importer.build"
        );
        Ok(ImportResult {
            lists: factory.build(),
            relationship_count,
        })
    }
}

#[cfg(feature = "parallel")]
fn compress_partitions<F: AdjacencyCompressorFactory>(
    factory: &F,
    lists: &ChunkedAdjacencyLists,
    partitions: &[Range<u64>],
) -> Result<u64> {
    use rayon::prelude::*;

    partitions
        .par_iter()
        .map(|nodes| compress_partition(factory, lists, nodes.clone()))
        .try_reduce(|| 0, |a, b| Ok(a + b))
}

#[cfg(not(feature = "parallel"))]
fn compress_partitions<F: AdjacencyCompressorFactory>(
    factory: &F,
    lists: &ChunkedAdjacencyLists,
    partitions: &[Range<u64>],
) -> Result<u64> {
    partitions
        .iter()
        .map(|nodes| compress_partition(factory, lists, nodes.clone()))
        .sum()
}

fn compress_partition<F: AdjacencyCompressorFactory>(
    factory: &F,
    lists: &ChunkedAdjacencyLists,
    nodes: Range<u64>,
) -> Result<u64> {
    let mut compressor = factory.create_compressor();
    let mut properties: Vec<&[u64]> = Vec::with_capacity(lists.property_count());
    let mut relationships = 0u64;
    let start = nodes.start;

    for node in nodes {
        properties.clear();
        properties.extend(lists.properties(node));
        let degree = compressor
            .compress(node, lists.targets(node), &properties)
            .map_err(|err| {
                warn!(node, error = %err, "importer.compress_rejected");
                err
            })?;
        relationships += u64::from(degree);
    }
    debug!(start, relationships, "importer.partition_done");
    Ok(relationships)
}
