//! Raw `u64` adjacency blocks.

use std::sync::Arc;

use super::{AdjacencyCursor, AdjacencyList};
use crate::alloc::{Address, Pages};
use crate::collections::{HugeIntArray, HugeLongArray};

/// Adjacency stored as plain target ids.
#[derive(Debug)]
pub struct UncompressedAdjacencyList {
    degrees: Arc<HugeIntArray>,
    offsets: HugeLongArray,
    pages: Pages<u64>,
}

impl UncompressedAdjacencyList {
    pub(crate) fn new(degrees: Arc<HugeIntArray>, offsets: HugeLongArray, pages: Pages<u64>) -> Self {
        Self {
            degrees,
            offsets,
            pages,
        }
    }

    /// The neighbors of `node` as a slice.
    ///
    /// # Panics
    /// If `node` is out of range.
    pub fn targets(&self, node: u64) -> &[u64] {
        let degree = self.degrees.get(node) as usize;
        if degree == 0 {
            return &[];
        }
        self.pages.slice(Address::from_raw(self.offsets.get(node)), degree)
    }
}

impl AdjacencyList for UncompressedAdjacencyList {
    type Cursor<'a> = UncompressedAdjacencyCursor<'a>;

    fn node_count(&self) -> u64 {
        self.degrees.size()
    }

    #[inline]
    fn degree(&self, node: u64) -> u32 {
        self.degrees.get(node)
    }

    #[inline]
    fn adjacency_cursor(&self, node: u64) -> Self::Cursor<'_> {
        UncompressedAdjacencyCursor::new(self.targets(node))
    }

    fn memory_usage(&self) -> usize {
        self.degrees.memory_usage() + self.offsets.memory_usage() + self.pages.memory_usage()
    }
}

/// Cursor over a raw adjacency block.
pub struct UncompressedAdjacencyCursor<'a> {
    targets: &'a [u64],
    index: usize,
}

impl<'a> UncompressedAdjacencyCursor<'a> {
    #[inline]
    pub(crate) fn new(targets: &'a [u64]) -> Self {
        Self { targets, index: 0 }
    }
}

impl Iterator for UncompressedAdjacencyCursor<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let result = *self.targets.get(self.index)?;
        self.index += 1;
        Some(result)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for UncompressedAdjacencyCursor<'_> {}

impl AdjacencyCursor for UncompressedAdjacencyCursor<'_> {
    #[inline]
    fn peek(&self) -> Option<u64> {
        self.targets.get(self.index).copied()
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.targets.len() - self.index
    }

    #[inline]
    fn size(&self) -> usize {
        self.targets.len()
    }
}
