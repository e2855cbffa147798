//! # `pagegraph` - Paged Adjacency Storage
//!
//! Builds immutable, columnar adjacency for graphs with up to billions of
//! relationships. Many workers compress nodes concurrently into shared paged
//! arenas; the result is read through allocation-free cursors.
//!
//! ## Architecture
//!
//! 1. **Paged arrays** (`HugeIntArray`, `HugeLongArray`):
//!    - Fixed-size tables split into pages of `1 << 14` atomic cells
//!    - Per-node degrees and block offsets
//!
//! 2. **Page allocators** (`BumpAllocator`, `LocalAllocator`, `LocalPositionalAllocator`):
//!    - One atomic page cursor shared by all workers
//!    - Each worker appends into pages it owns exclusively
//!    - Opaque [`Address`] handles pack page index and offset
//!
//! 3. **Compressors** (`UncompressedCompressor`, `DeltaVarLongCompressor`):
//!    - Decode, sort and aggregate one node's targets
//!    - Write targets and property channels into pages
//!
//! 4. **Read side** (`AdjacencyList`, `AdjacencyProperties`):
//!    - Degrees, cursors and property cursors over frozen pages
//!
//! ## Example
//!
//! ```rust
//! use pagegraph::{
//!     AdjacencyCompressor, AdjacencyCompressorFactory, AdjacencyList, Aggregation,
//!     BuildConfig, CompressionKind, ConfiguredCompressorFactory, Targets,
//! };
//!
//! let config = BuildConfig::new(4)
//!     .with_compression(CompressionKind::DeltaVarLong)
//!     .with_aggregation(Aggregation::Single);
//! let factory = ConfiguredCompressorFactory::new(&config)?;
//!
//! std::thread::scope(|scope| {
//!     for worker in 0..2u64 {
//!         let factory = &factory;
//!         scope.spawn(move || {
//!             let mut compressor = factory.create_compressor();
//!             for node in (worker..4).step_by(2) {
//!                 let targets = [3, node, 3, 0];
//!                 compressor.compress(node, Targets::Raw(&targets), &[]).unwrap();
//!             }
//!         });
//!     }
//! });
//!
//! let lists = factory.build();
//! let neighbors: Vec<u64> = lists.adjacency.adjacency_cursor(1).collect();
//! assert_eq!(neighbors, vec![0, 1, 3]);
//! # Ok::<(), pagegraph::BuildError>(())
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]

pub mod aggregation;
pub mod alloc;
pub mod codec;
pub mod collections;
pub mod compress;
pub mod config;
pub mod error;
pub mod graph;
pub mod import;

pub use aggregation::Aggregation;
pub use alloc::{Address, BumpAllocator, LocalAllocator, LocalPositionalAllocator, PageLayout, Pages};
pub use collections::{HugeArray, HugeIntArray, HugeLongArray, LongArrayBuffer};
pub use compress::{
    AdjacencyCompressor, AdjacencyCompressorFactory, ConfiguredCompressor, ConfiguredCompressorFactory,
    DeltaVarLongCompressor, DeltaVarLongCompressorFactory, Targets, UncompressedCompressor,
    UncompressedCompressorFactory,
};
pub use config::{BuildConfig, CompressionKind};
pub use error::{BuildError, Result};
pub use graph::{
    AdjacencyCursor, AdjacencyList, AdjacencyListsWithProperties, AdjacencyProperties,
    CompressedAdjacencyList, ConfiguredAdjacencyList, PropertyCursor, UncompressedAdjacencyList,
};
pub use import::{AdjacencyImporter, ChunkedAdjacencyLists, ImportResult};

// Compile-time assertions for layout and geometry
const _: () = {
    use core::mem;

    // Addresses are plain integers in the offset tables.
    assert!(mem::size_of::<Address>() == mem::size_of::<u64>());

    // Node tables span exactly `i32::MAX` pages.
    assert!(collections::huge_array::MAX_SIZE >> collections::huge_array::PAGE_SHIFT == i32::MAX as u64);

    assert!(config::DEFAULT_PAGE_SHIFT >= alloc::address::MIN_PAGE_SHIFT);
    assert!(config::DEFAULT_PAGE_SHIFT <= alloc::address::MAX_PAGE_SHIFT);
};
