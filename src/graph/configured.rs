//! Adjacency of either representation.

use super::{
    AdjacencyCursor, AdjacencyList, CompressedAdjacencyCursor, CompressedAdjacencyList,
    UncompressedAdjacencyCursor, UncompressedAdjacencyList,
};
use crate::config::CompressionKind;

/// The adjacency produced by a configured factory.
#[derive(Debug)]
pub enum ConfiguredAdjacencyList {
    /// Raw ids.
    Uncompressed(UncompressedAdjacencyList),
    /// Delta-varlong bytes.
    DeltaVarLong(CompressedAdjacencyList),
}

impl ConfiguredAdjacencyList {
    /// Representation of the blocks.
    pub fn kind(&self) -> CompressionKind {
        match self {
            Self::Uncompressed(_) => CompressionKind::Uncompressed,
            Self::DeltaVarLong(_) => CompressionKind::DeltaVarLong,
        }
    }
}

impl AdjacencyList for ConfiguredAdjacencyList {
    type Cursor<'a> = ConfiguredAdjacencyCursor<'a>;

    fn node_count(&self) -> u64 {
        match self {
            Self::Uncompressed(list) => list.node_count(),
            Self::DeltaVarLong(list) => list.node_count(),
        }
    }

    fn degree(&self, node: u64) -> u32 {
        match self {
            Self::Uncompressed(list) => list.degree(node),
            Self::DeltaVarLong(list) => list.degree(node),
        }
    }

    fn adjacency_cursor(&self, node: u64) -> Self::Cursor<'_> {
        match self {
            Self::Uncompressed(list) => ConfiguredAdjacencyCursor::Uncompressed(list.adjacency_cursor(node)),
            Self::DeltaVarLong(list) => ConfiguredAdjacencyCursor::DeltaVarLong(list.adjacency_cursor(node)),
        }
    }

    fn memory_usage(&self) -> usize {
        match self {
            Self::Uncompressed(list) => list.memory_usage(),
            Self::DeltaVarLong(list) => list.memory_usage(),
        }
    }
}

/// Cursor of a [`ConfiguredAdjacencyList`].
pub enum ConfiguredAdjacencyCursor<'a> {
    /// Over raw ids.
    Uncompressed(UncompressedAdjacencyCursor<'a>),
    /// Over delta-varlong bytes.
    DeltaVarLong(CompressedAdjacencyCursor<'a>),
}

impl Iterator for ConfiguredAdjacencyCursor<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        match self {
            Self::Uncompressed(cursor) => cursor.next(),
            Self::DeltaVarLong(cursor) => cursor.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ConfiguredAdjacencyCursor<'_> {}

impl AdjacencyCursor for ConfiguredAdjacencyCursor<'_> {
    #[inline]
    fn peek(&self) -> Option<u64> {
        match self {
            Self::Uncompressed(cursor) => cursor.peek(),
            Self::DeltaVarLong(cursor) => cursor.peek(),
        }
    }

    #[inline]
    fn remaining(&self) -> usize {
        match self {
            Self::Uncompressed(cursor) => cursor.remaining(),
            Self::DeltaVarLong(cursor) => cursor.remaining(),
        }
    }

    #[inline]
    fn size(&self) -> usize {
        match self {
            Self::Uncompressed(cursor) => cursor.size(),
            Self::DeltaVarLong(cursor) => cursor.size(),
        }
    }
}
