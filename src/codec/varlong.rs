//! Zig-zag and variable-length integer coding.
//!
//! A value is written as little-endian groups of 7 bits. The last byte of a
//! value carries the high bit; every other byte has it clear. Deltas between
//! unsorted ids may be negative, so input batches zig-zag them first; sorted
//! output blocks store plain deltas.

use crate::error::{BuildError, Result};

/// Longest encoding of a `u64`.
pub const MAX_VLONG_BYTES: usize = 10;

const STOP_BIT: u8 = 0x80;
const PAYLOAD: u8 = 0x7F;

/// Maps signed values to unsigned so small magnitudes stay small.
#[inline(always)]
pub const fn zig_zag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zig_zag`].
#[inline(always)]
pub const fn zig_zag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Bytes needed to encode `value`.
#[inline]
pub const fn encoded_vlong_size(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        bits.div_ceil(7)
    }
}

/// Appends `value` to `out`, returning the number of bytes written.
#[inline]
pub fn encode_vlong(mut value: u64, out: &mut Vec<u8>) -> usize {
    let mut written = 1;
    while value > u64::from(PAYLOAD) {
        out.push((value as u8) & PAYLOAD);
        value >>= 7;
        written += 1;
    }
    out.push(value as u8 | STOP_BIT);
    written
}

/// Decodes one value from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
/// [`BuildError::MalformedInput`] if `bytes` ends before a stop bit or the
/// value does not fit a `u64`.
#[inline]
pub fn decode_vlong(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in bytes.iter().take(MAX_VLONG_BYTES).enumerate() {
        let payload = u64::from(byte & PAYLOAD);
        let shift = 7 * i as u32;
        if i == MAX_VLONG_BYTES - 1 && payload > 1 {
            return Err(BuildError::MalformedInput("value does not fit in 64 bits"));
        }
        value |= payload << shift;
        if byte & STOP_BIT != 0 {
            return Ok((value, i + 1));
        }
    }
    if bytes.len() >= MAX_VLONG_BYTES {
        Err(BuildError::MalformedInput("value longer than 10 bytes"))
    } else {
        Err(BuildError::MalformedInput("truncated value"))
    }
}

/// Reads one value from trusted, already validated bytes.
///
/// # Panics
/// If the bytes end before a stop bit.
#[inline(always)]
pub(crate) fn read_vlong(bytes: &[u8], position: &mut usize) -> u64 {
    let mut value = 0u64;
    let mut shift = 0;
    loop {
        let byte = bytes[*position];
        *position += 1;
        value |= u64::from(byte & PAYLOAD) << shift;
        if byte & STOP_BIT != 0 {
            return value;
        }
        shift += 7;
    }
}

/// Appends `values` as zig-zag deltas, each from its predecessor (the first
/// from zero). Order is preserved; values need not be sorted.
///
/// Returns the number of bytes written.
pub fn encode_delta_vlongs(values: &[u64], out: &mut Vec<u8>) -> usize {
    encode_delta_vlongs_from(0, values, out)
}

/// Like [`encode_delta_vlongs`], but the first delta is taken from
/// `previous`. Used to append to an existing delta stream.
pub fn encode_delta_vlongs_from(mut previous: u64, values: &[u64], out: &mut Vec<u8>) -> usize {
    let mut written = 0;
    for &value in values {
        let delta = value.wrapping_sub(previous) as i64;
        written += encode_vlong(zig_zag(delta), out);
        previous = value;
    }
    written
}

/// Decodes `count` zig-zag deltas into absolute values.
///
/// Writes into `out[..count]` and returns the number of bytes consumed.
///
/// # Errors
/// [`BuildError::MalformedInput`] on truncated or over-long values.
///
/// # Panics
/// If `out` is shorter than `count`.
pub fn decode_delta_vlongs(bytes: &[u8], count: usize, out: &mut [u64]) -> Result<usize> {
    let mut position = 0;
    let mut previous = 0u64;
    for slot in &mut out[..count] {
        let (raw, consumed) = decode_vlong(&bytes[position..])?;
        position += consumed;
        previous = previous.wrapping_add(zig_zag_decode(raw) as u64);
        *slot = previous;
    }
    Ok(position)
}

/// Appends ascending `values` as plain deltas (the first from zero).
///
/// Returns the number of bytes written.
pub fn encode_sorted_deltas(values: &[u64], out: &mut Vec<u8>) -> usize {
    let mut previous = 0u64;
    let mut written = 0;
    for &value in values {
        debug_assert!(value >= previous, "values must be ascending");
        written += encode_vlong(value - previous, out);
        previous = value;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zig_zag_maps_small_magnitudes_to_small_values() {
        assert_eq!(zig_zag(0), 0);
        assert_eq!(zig_zag(-1), 1);
        assert_eq!(zig_zag(1), 2);
        assert_eq!(zig_zag(-2), 3);
        assert_eq!(zig_zag(i64::MAX), u64::MAX - 1);
        assert_eq!(zig_zag(i64::MIN), u64::MAX);
        for v in [-1000i64, -1, 0, 1, 12345, i64::MIN, i64::MAX] {
            assert_eq!(zig_zag_decode(zig_zag(v)), v);
        }
    }

    #[test]
    fn stop_bit_marks_the_last_byte() {
        let mut out = Vec::new();
        assert_eq!(encode_vlong(5, &mut out), 1);
        assert_eq!(out, vec![0x85]);

        out.clear();
        assert_eq!(encode_vlong(300, &mut out), 2);
        assert_eq!(out, vec![(300 & 0x7F) as u8, (300 >> 7) as u8 | 0x80]);
        assert_eq!(decode_vlong(&out).unwrap(), (300, 2));
    }

    #[test]
    fn sizes_match_encoding() {
        for v in [0, 1, 127, 128, 16_383, 16_384, u64::from(u32::MAX), u64::MAX] {
            let mut out = Vec::new();
            let written = encode_vlong(v, &mut out);
            assert_eq!(written, encoded_vlong_size(v));
            assert_eq!(written, out.len());
            assert_eq!(decode_vlong(&out).unwrap(), (v, written));
        }
        assert_eq!(encoded_vlong_size(u64::MAX), MAX_VLONG_BYTES);
    }

    #[test]
    fn unsorted_deltas_survive() {
        let values = [40, 2, 2, 17, 0, 99];
        let mut bytes = Vec::new();
        let written = encode_delta_vlongs(&values, &mut bytes);

        let mut out = [0u64; 6];
        assert_eq!(decode_delta_vlongs(&bytes, values.len(), &mut out).unwrap(), written);
        assert_eq!(out, values);
    }

    #[test]
    fn appended_streams_decode_as_one() {
        let mut bytes = Vec::new();
        encode_delta_vlongs(&[7, 3], &mut bytes);
        encode_delta_vlongs_from(3, &[9, 1], &mut bytes);

        let mut out = [0u64; 4];
        decode_delta_vlongs(&bytes, 4, &mut out).unwrap();
        assert_eq!(out, [7, 3, 9, 1]);
    }

    #[test]
    fn rejects_truncated_input() {
        let mut bytes = Vec::new();
        encode_delta_vlongs(&[1, 1_000_000], &mut bytes);
        bytes.pop();
        let mut out = [0u64; 2];
        assert!(matches!(
            decode_delta_vlongs(&bytes, 2, &mut out),
            Err(BuildError::MalformedInput(_))
        ));
    }

    #[test]
    fn rejects_over_long_values() {
        let bytes = [0x7F; 11];
        assert!(decode_vlong(&bytes).is_err());
        let mut overflow = vec![0x7F; 9];
        overflow.push(0x82);
        assert!(decode_vlong(&overflow).is_err());
    }

    #[test]
    fn sorted_deltas_read_back() {
        let values = [3, 3, 10, 500, 70_000];
        let mut bytes = Vec::new();
        encode_sorted_deltas(&values, &mut bytes);
        let mut position = 0;
        let mut previous = 0;
        for &expected in &values {
            previous += read_vlong(&bytes, &mut position);
            assert_eq!(previous, expected);
        }
        assert_eq!(position, bytes.len());
    }
}
