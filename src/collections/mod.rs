//! Paged arrays and scratch buffers.
//!
//! - `huge_array`: fixed-size arrays split into pages, writable concurrently
//! - `buffer`: per-worker scratch space that grows and never shrinks

pub mod buffer;
pub mod huge_array;

pub use buffer::LongArrayBuffer;
pub use huge_array::{HugeArray, HugeIntArray, HugeLongArray, PageValue};
