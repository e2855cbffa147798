//! State shared by both compressor flavours.
//!
//! [`SharedTables`] lives in the factory: node tables plus one bump allocator
//! per property channel. [`Worker`] is the per-compressor half: scratch
//! buffers and local allocator handles. A compressor asks its worker to
//! [`prepare`](Worker::prepare) a batch, writes the surviving ids in its own
//! representation, then hands the resulting address to
//! [`commit`](Worker::commit).

use std::sync::Arc;

use tracing::debug;

use super::aggregate::{sort_and_dedup, PropertyAggregator};
use super::Targets;
use crate::aggregation::Aggregation;
use crate::alloc::{Address, BumpAllocator, LocalAllocator, LocalPositionalAllocator, PageLayout};
use crate::codec::decode_delta_vlongs;
use crate::collections::{HugeIntArray, HugeLongArray, LongArrayBuffer};
use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::graph::AdjacencyProperties;

/// Largest degree a node may have.
const MAX_DEGREE: usize = i32::MAX as usize;

/// Node tables and property allocators of one build.
pub(crate) struct SharedTables {
    node_count: u64,
    layout: PageLayout,
    degrees: HugeIntArray,
    offsets: HugeLongArray,
    property_offsets: Vec<HugeLongArray>,
    property_allocators: Vec<BumpAllocator<u64>>,
    aggregations: Vec<Aggregation>,
    keep_parallel: bool,
}

impl SharedTables {
    pub(crate) fn new(config: &BuildConfig) -> Result<Self> {
        config.validate()?;
        let layout = config.page_layout()?;
        let node_count = config.node_count;
        let channels = config.property_count();

        let property_offsets = (0..channels)
            .map(|_| HugeLongArray::new(node_count))
            .collect::<Result<Vec<_>>>()?;
        let property_allocators = (0..channels).map(|_| BumpAllocator::new(layout)).collect();

        Ok(Self {
            node_count,
            layout,
            degrees: HugeIntArray::new(node_count)?,
            offsets: HugeLongArray::with_default(node_count, Address::UNSET.raw())?,
            property_offsets,
            property_allocators,
            aggregations: config.property_aggregations.clone(),
            keep_parallel: config.skips_aggregation(),
        })
    }

    #[inline]
    pub(crate) fn node_count(&self) -> u64 {
        self.node_count
    }

    #[inline]
    pub(crate) fn layout(&self) -> PageLayout {
        self.layout
    }

    #[inline]
    pub(crate) fn property_count(&self) -> usize {
        self.aggregations.len()
    }

    pub(crate) fn worker(&self) -> Worker<'_> {
        let mut allocators = self.property_allocators.iter();
        let first = allocators.next().map(BumpAllocator::new_local_allocator);
        let rest = allocators.map(BumpAllocator::new_local_positional_allocator).collect();
        debug!(channels = self.property_count(), "compressor.created");
        Worker {
            tables: self,
            targets: LongArrayBuffer::new(),
            aggregator: PropertyAggregator::new(self.property_count()),
            first_property: first,
            other_properties: rest,
        }
    }

    /// Freezes the tables. Returns the shared degrees, the adjacency offsets
    /// and the finished property lists.
    pub(crate) fn finish(self) -> (Arc<HugeIntArray>, HugeLongArray, Vec<AdjacencyProperties>) {
        let degrees = Arc::new(self.degrees);
        let properties = self
            .property_offsets
            .into_iter()
            .zip(self.property_allocators)
            .map(|(offsets, allocator)| {
                AdjacencyProperties::new(Arc::clone(&degrees), offsets, allocator.into_pages())
            })
            .collect();
        (degrees, self.offsets, properties)
    }
}

/// Per-compressor scratch state.
pub(crate) struct Worker<'a> {
    tables: &'a SharedTables,
    targets: LongArrayBuffer,
    aggregator: PropertyAggregator,
    first_property: Option<LocalAllocator<'a, u64>>,
    other_properties: Vec<LocalPositionalAllocator<'a, u64>>,
}

impl Worker<'_> {
    /// Validates and aggregates one batch.
    ///
    /// Afterwards [`targets`](Self::targets) holds the surviving ids in
    /// ascending order and the aggregated property values are staged for
    /// [`commit`](Self::commit). Nothing is written to shared state.
    pub(crate) fn prepare(&mut self, node: u64, targets: Targets<'_>, properties: &[&[u64]]) -> Result<u32> {
        let tables = self.tables;
        if node >= tables.node_count {
            return Err(BuildError::NodeOutOfRange {
                node,
                node_count: tables.node_count,
            });
        }
        if tables.offsets.get(node) != Address::UNSET.raw() {
            return Err(BuildError::NodeAlreadyProcessed(node));
        }
        if properties.len() != tables.property_count() {
            return Err(BuildError::PropertyChannelMismatch {
                expected: tables.property_count(),
                actual: properties.len(),
            });
        }
        let count = targets.len();
        for (channel, values) in properties.iter().enumerate() {
            if values.len() != count {
                return Err(BuildError::PropertyLengthMismatch {
                    channel,
                    expected: count,
                    actual: values.len(),
                });
            }
        }
        if count > MAX_DEGREE {
            return Err(BuildError::DegreeOverflow(count));
        }

        match targets {
            Targets::Raw(ids) => {
                self.targets.copy_from(ids);
            }
            Targets::Compressed { bytes, .. } => {
                decode_delta_vlongs(bytes, count, self.targets.ensure_length(count))?;
            }
        }

        let degree = if properties.is_empty() {
            sort_and_dedup(self.targets.as_mut_slice(), tables.keep_parallel)
        } else {
            let degree = self.aggregator.aggregate(
                self.targets.as_slice(),
                properties,
                &tables.aggregations,
                tables.keep_parallel,
            );
            self.targets.copy_from(self.aggregator.targets());
            degree
        };
        self.targets.truncate(degree);
        u32::try_from(degree).map_err(|_| BuildError::DegreeOverflow(degree))
    }

    /// Surviving ids of the last [`prepare`](Self::prepare).
    #[inline]
    pub(crate) fn targets(&self) -> &[u64] {
        self.targets.as_slice()
    }

    /// Writes the staged properties and publishes degree and offsets.
    ///
    /// Property values land in worker-owned pages first. The node is then
    /// claimed by a compare-and-set on its adjacency offset, and only the
    /// winner stores property offsets and degree. A caller that loses the
    /// race leaves every table entry untouched.
    pub(crate) fn commit(&mut self, node: u64, degree: u32, address: Address) -> Result<()> {
        let tables = self.tables;

        let mut property_address = Address::EMPTY;
        if let Some(first) = self.first_property.as_mut() {
            property_address = first.write(self.aggregator.channel(0))?;
        }
        for (index, positional) in self.other_properties.iter_mut().enumerate() {
            positional.write_at(property_address, self.aggregator.channel(index + 1))?;
        }

        tables
            .offsets
            .compare_and_set(node, Address::UNSET.raw(), address.raw())
            .map_err(|_| BuildError::NodeAlreadyProcessed(node))?;
        for offsets in tables.property_offsets.iter() {
            offsets.set(node, property_address.raw());
        }
        tables.degrees.set(node, degree);
        Ok(())
    }
}
