//! Per-node staging buffers filled before compression.

use crate::codec::encode_delta_vlongs_from;
use crate::compress::Targets;
use crate::error::{BuildError, Result};

#[derive(Debug, Default, Clone)]
struct NodeBuffer {
    bytes: Vec<u8>,
    last: u64,
    count: usize,
    properties: Vec<Vec<u64>>,
}

/// Relationships grouped by source node, targets kept as zig-zag deltas.
///
/// Appends keep the caller's order; sorting and aggregation happen later in
/// the compressor.
#[derive(Debug)]
pub struct ChunkedAdjacencyLists {
    nodes: Vec<NodeBuffer>,
    property_count: usize,
}

impl ChunkedAdjacencyLists {
    /// Empty buffers for `node_count` nodes and `property_count` channels.
    ///
    /// # Errors
    /// [`BuildError::NodeCountOverflow`] if `node_count` does not fit memory
    /// indexing on this target.
    pub fn new(node_count: u64, property_count: usize) -> Result<Self> {
        let len = usize::try_from(node_count).map_err(|_| BuildError::NodeCountOverflow {
            size: node_count,
            max: usize::MAX as u64,
        })?;
        let empty = NodeBuffer {
            properties: vec![Vec::new(); property_count],
            ..NodeBuffer::default()
        };
        Ok(Self {
            nodes: vec![empty; len],
            property_count,
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> u64 {
        self.nodes.len() as u64
    }

    /// Number of property channels.
    #[inline]
    pub fn property_count(&self) -> usize {
        self.property_count
    }

    /// Appends `targets` to `source`, with one value slice per channel.
    ///
    /// # Errors
    /// - [`BuildError::NodeOutOfRange`] if `source` or any target is unknown.
    /// - [`BuildError::PropertyChannelMismatch`] / [`BuildError::PropertyLengthMismatch`]
    ///   for misshapen properties.
    pub fn add(&mut self, source: u64, targets: &[u64], properties: &[&[u64]]) -> Result<()> {
        if properties.len() != self.property_count {
            return Err(BuildError::PropertyChannelMismatch {
                expected: self.property_count,
                actual: properties.len(),
            });
        }
        for (channel, values) in properties.iter().enumerate() {
            if values.len() != targets.len() {
                return Err(BuildError::PropertyLengthMismatch {
                    channel,
                    expected: targets.len(),
                    actual: values.len(),
                });
            }
        }
        let node_count = self.node_count();
        if let Some(&target) = targets.iter().find(|&&target| target >= node_count) {
            return Err(BuildError::NodeOutOfRange { node: target, node_count });
        }

        let buffer = self.buffer_mut(source)?;
        encode_delta_vlongs_from(buffer.last, targets, &mut buffer.bytes);
        if let Some(&last) = targets.last() {
            buffer.last = last;
        }
        buffer.count += targets.len();
        for (channel, values) in buffer.properties.iter_mut().zip(properties) {
            channel.extend_from_slice(values);
        }
        Ok(())
    }

    /// Appends a single relationship with `f64` property values.
    ///
    /// # Errors
    /// As [`add`](Self::add).
    pub fn add_one(&mut self, source: u64, target: u64, properties: &[f64]) -> Result<()> {
        if properties.len() != self.property_count {
            return Err(BuildError::PropertyChannelMismatch {
                expected: self.property_count,
                actual: properties.len(),
            });
        }
        let node_count = self.node_count();
        if target >= node_count {
            return Err(BuildError::NodeOutOfRange { node: target, node_count });
        }

        let buffer = self.buffer_mut(source)?;
        encode_delta_vlongs_from(buffer.last, &[target], &mut buffer.bytes);
        buffer.last = target;
        buffer.count += 1;
        for (channel, &value) in buffer.properties.iter_mut().zip(properties) {
            channel.push(value.to_bits());
        }
        Ok(())
    }

    /// Number of relationships appended to `node`, before aggregation.
    ///
    /// # Panics
    /// If `node` is out of range.
    pub fn degree(&self, node: u64) -> usize {
        self.nodes[node as usize].count
    }

    /// Encoded targets of `node`.
    ///
    /// # Panics
    /// If `node` is out of range.
    pub fn targets(&self, node: u64) -> Targets<'_> {
        let buffer = &self.nodes[node as usize];
        Targets::Compressed {
            bytes: &buffer.bytes,
            count: buffer.count,
        }
    }

    /// Property channels of `node`, each aligned with its targets.
    ///
    /// # Panics
    /// If `node` is out of range.
    pub fn properties(&self, node: u64) -> impl Iterator<Item = &[u64]> + '_ {
        self.nodes[node as usize].properties.iter().map(Vec::as_slice)
    }

    /// Total relationships appended.
    pub fn relationship_count(&self) -> u64 {
        self.nodes.iter().map(|node| node.count as u64).sum()
    }

    fn buffer_mut(&mut self, source: u64) -> Result<&mut NodeBuffer> {
        let node_count = self.node_count();
        usize::try_from(source)
            .ok()
            .and_then(|index| self.nodes.get_mut(index))
            .ok_or(BuildError::NodeOutOfRange {
                node: source,
                node_count,
            })
    }
}
