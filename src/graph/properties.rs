//! Property blocks of one channel.

use std::sync::Arc;

use crate::alloc::{Address, Pages};
use crate::collections::{HugeIntArray, HugeLongArray};

/// One property channel: a value per surviving relationship, aligned with
/// the adjacency block of the same node.
#[derive(Debug)]
pub struct AdjacencyProperties {
    degrees: Arc<HugeIntArray>,
    offsets: HugeLongArray,
    pages: Pages<u64>,
}

impl AdjacencyProperties {
    pub(crate) fn new(degrees: Arc<HugeIntArray>, offsets: HugeLongArray, pages: Pages<u64>) -> Self {
        Self {
            degrees,
            offsets,
            pages,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> u64 {
        self.degrees.size()
    }

    /// Raw `f64` bit patterns for `node`, in neighbor order.
    ///
    /// # Panics
    /// If `node` is out of range.
    pub fn values(&self, node: u64) -> &[u64] {
        let degree = self.degrees.get(node) as usize;
        if degree == 0 {
            return &[];
        }
        self.pages.slice(Address::from_raw(self.offsets.get(node)), degree)
    }

    /// Cursor over the values of `node`.
    ///
    /// # Panics
    /// If `node` is out of range.
    pub fn property_cursor(&self, node: u64) -> PropertyCursor<'_> {
        PropertyCursor {
            values: self.values(node),
            index: 0,
        }
    }

    /// Heap bytes held by offsets and pages; degrees are shared with the
    /// adjacency list and not counted here.
    pub fn memory_usage(&self) -> usize {
        self.offsets.memory_usage() + self.pages.memory_usage()
    }
}

/// Cursor over one node's property values.
pub struct PropertyCursor<'a> {
    values: &'a [u64],
    index: usize,
}

impl PropertyCursor<'_> {
    /// Next value decoded as `f64`.
    #[inline]
    pub fn next_f64(&mut self) -> Option<f64> {
        self.next().map(f64::from_bits)
    }

    /// Values not yet returned.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.values.len() - self.index
    }
}

impl Iterator for PropertyCursor<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let value = *self.values.get(self.index)?;
        self.index += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PropertyCursor<'_> {}
