use super::{
    AdjacencyCompressor, AdjacencyCompressorFactory, DeltaVarLongCompressor,
    DeltaVarLongCompressorFactory, Targets, UncompressedCompressor, UncompressedCompressorFactory,
};
use crate::config::{BuildConfig, CompressionKind};
use crate::error::Result;
use crate::graph::{AdjacencyListsWithProperties, ConfiguredAdjacencyList};

/// Factory whose representation is chosen by [`BuildConfig::compression`].
pub enum ConfiguredCompressorFactory {
    /// Raw ids.
    Uncompressed(UncompressedCompressorFactory),
    /// Delta-varlong bytes.
    DeltaVarLong(DeltaVarLongCompressorFactory),
}

impl ConfiguredCompressorFactory {
    /// Creates the factory `config.compression` names.
    ///
    /// # Errors
    /// Any error from [`BuildConfig::validate`].
    pub fn new(config: &BuildConfig) -> Result<Self> {
        Ok(match config.compression {
            CompressionKind::Uncompressed => Self::Uncompressed(UncompressedCompressorFactory::new(config)?),
            CompressionKind::DeltaVarLong => Self::DeltaVarLong(DeltaVarLongCompressorFactory::new(config)?),
        })
    }

    /// Representation this factory writes.
    pub fn kind(&self) -> CompressionKind {
        match self {
            Self::Uncompressed(_) => CompressionKind::Uncompressed,
            Self::DeltaVarLong(_) => CompressionKind::DeltaVarLong,
        }
    }
}

impl AdjacencyCompressorFactory for ConfiguredCompressorFactory {
    type Compressor<'a> = ConfiguredCompressor<'a>;
    type Adjacency = ConfiguredAdjacencyList;

    fn create_compressor(&self) -> Self::Compressor<'_> {
        match self {
            Self::Uncompressed(factory) => ConfiguredCompressor::Uncompressed(factory.create_compressor()),
            Self::DeltaVarLong(factory) => ConfiguredCompressor::DeltaVarLong(factory.create_compressor()),
        }
    }

    fn node_count(&self) -> u64 {
        match self {
            Self::Uncompressed(factory) => factory.node_count(),
            Self::DeltaVarLong(factory) => factory.node_count(),
        }
    }

    fn property_count(&self) -> usize {
        match self {
            Self::Uncompressed(factory) => factory.property_count(),
            Self::DeltaVarLong(factory) => factory.property_count(),
        }
    }

    fn build(self) -> AdjacencyListsWithProperties<Self::Adjacency> {
        match self {
            Self::Uncompressed(factory) => factory.build().map_adjacency(ConfiguredAdjacencyList::Uncompressed),
            Self::DeltaVarLong(factory) => factory.build().map_adjacency(ConfiguredAdjacencyList::DeltaVarLong),
        }
    }
}

/// Compressor of a [`ConfiguredCompressorFactory`].
pub enum ConfiguredCompressor<'a> {
    /// Raw ids.
    Uncompressed(UncompressedCompressor<'a>),
    /// Delta-varlong bytes.
    DeltaVarLong(DeltaVarLongCompressor<'a>),
}

impl AdjacencyCompressor for ConfiguredCompressor<'_> {
    #[inline]
    fn compress(&mut self, node: u64, targets: Targets<'_>, properties: &[&[u64]]) -> Result<u32> {
        match self {
            Self::Uncompressed(compressor) => compressor.compress(node, targets, properties),
            Self::DeltaVarLong(compressor) => compressor.compress(node, targets, properties),
        }
    }
}
