//! Byte-level encodings for adjacency blocks.
//!
//! Input batches arrive as zig-zag delta vlongs and are decoded here before
//! aggregation; the delta-varlong compressor writes sorted plain deltas.

pub mod varlong;

pub use varlong::{
    decode_delta_vlongs, decode_vlong, encode_delta_vlongs, encode_delta_vlongs_from,
    encode_sorted_deltas, encode_vlong, encoded_vlong_size, zig_zag, zig_zag_decode,
    MAX_VLONG_BYTES,
};
