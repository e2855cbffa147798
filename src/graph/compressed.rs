//! Delta-varlong adjacency blocks.
//!
//! A block is the node's sorted ids as plain vlong deltas, the first from
//! zero. Its byte length is not stored: the degree says how many values to
//! read, and a block never crosses a page.

use std::sync::Arc;

use super::{AdjacencyCursor, AdjacencyList};
use crate::alloc::{Address, Pages};
use crate::codec::varlong::read_vlong;
use crate::collections::{HugeIntArray, HugeLongArray};

/// Adjacency stored as delta encoded bytes.
#[derive(Debug)]
pub struct CompressedAdjacencyList {
    degrees: Arc<HugeIntArray>,
    offsets: HugeLongArray,
    pages: Pages<u8>,
}

impl CompressedAdjacencyList {
    pub(crate) fn new(degrees: Arc<HugeIntArray>, offsets: HugeLongArray, pages: Pages<u8>) -> Self {
        Self {
            degrees,
            offsets,
            pages,
        }
    }
}

impl AdjacencyList for CompressedAdjacencyList {
    type Cursor<'a> = CompressedAdjacencyCursor<'a>;

    fn node_count(&self) -> u64 {
        self.degrees.size()
    }

    #[inline]
    fn degree(&self, node: u64) -> u32 {
        self.degrees.get(node)
    }

    fn adjacency_cursor(&self, node: u64) -> Self::Cursor<'_> {
        let degree = self.degrees.get(node) as usize;
        if degree == 0 {
            return CompressedAdjacencyCursor::new(&[], 0);
        }
        let bytes = self.pages.tail(Address::from_raw(self.offsets.get(node)));
        CompressedAdjacencyCursor::new(bytes, degree)
    }

    fn memory_usage(&self) -> usize {
        self.degrees.memory_usage() + self.offsets.memory_usage() + self.pages.memory_usage()
    }
}

/// Cursor decoding a delta-varlong block one id ahead.
pub struct CompressedAdjacencyCursor<'a> {
    bytes: &'a [u8],
    position: usize,
    undecoded: usize,
    last: u64,
    next: Option<u64>,
    size: usize,
}

impl<'a> CompressedAdjacencyCursor<'a> {
    fn new(bytes: &'a [u8], degree: usize) -> Self {
        let mut cursor = Self {
            bytes,
            position: 0,
            undecoded: degree,
            last: 0,
            next: None,
            size: degree,
        };
        cursor.next = cursor.decode();
        cursor
    }

    #[inline]
    fn decode(&mut self) -> Option<u64> {
        if self.undecoded == 0 {
            return None;
        }
        self.undecoded -= 1;
        self.last += read_vlong(self.bytes, &mut self.position);
        Some(self.last)
    }
}

impl Iterator for CompressedAdjacencyCursor<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.decode();
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CompressedAdjacencyCursor<'_> {}

impl AdjacencyCursor for CompressedAdjacencyCursor<'_> {
    #[inline]
    fn peek(&self) -> Option<u64> {
        self.next
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.undecoded + usize::from(self.next.is_some())
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }
}
