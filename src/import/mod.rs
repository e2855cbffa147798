//! Bulk import: stage relationships per node, then compress in batches.
//!
//! ```
//! use pagegraph::{AdjacencyImporter, AdjacencyList, Aggregation, BuildConfig};
//!
//! let config = BuildConfig::new(3).with_property_aggregations([Aggregation::Sum]);
//! let mut importer = AdjacencyImporter::new(config)?;
//! importer.add_relationship(0, 2, &[1.0])?;
//! importer.add_relationship(0, 2, &[2.0])?;
//! importer.add_relationship(0, 1, &[5.0])?;
//!
//! let result = importer.build()?;
//! let neighbors: Vec<u64> = result.lists.adjacency.adjacency_cursor(0).collect();
//! assert_eq!(neighbors, vec![1, 2]);
//! assert_eq!(result.relationship_count, 2);
//! # Ok::<(), pagegraph::BuildError>(())
//! ```

mod chunked;
mod importer;

pub use chunked::ChunkedAdjacencyLists;
pub use importer::{AdjacencyImporter, ImportResult};
