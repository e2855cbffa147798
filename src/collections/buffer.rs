//! Reusable scratch buffer for per-node work.

/// A `u64` buffer whose capacity only ever grows.
///
/// One lives inside every compressor; each node reuses it instead of
/// allocating a fresh vector.
#[derive(Debug, Default)]
pub struct LongArrayBuffer {
    buffer: Vec<u64>,
    length: usize,
}

impl LongArrayBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            length: 0,
        }
    }

    /// Creates a buffer with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity],
            length: 0,
        }
    }

    /// Ensures room for `length` values and makes them the active prefix.
    ///
    /// Contents of the prefix are unspecified afterwards.
    pub fn ensure_length(&mut self, length: usize) -> &mut [u64] {
        if self.buffer.len() < length {
            let grown = length.next_power_of_two().max(self.buffer.len());
            self.buffer.resize(grown, 0);
        }
        self.length = length;
        &mut self.buffer[..length]
    }

    /// Replaces the active prefix with a copy of `values`.
    pub fn copy_from(&mut self, values: &[u64]) -> &mut [u64] {
        let dst = self.ensure_length(values.len());
        dst.copy_from_slice(values);
        dst
    }

    /// Shrinks the active prefix; never releases memory.
    pub fn truncate(&mut self, length: usize) {
        self.length = self.length.min(length);
    }

    /// Active prefix.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.buffer[..self.length]
    }

    /// Active prefix, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.buffer[..self.length]
    }

    /// Length of the active prefix.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the active prefix is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Allocated capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_never_shrinks() {
        let mut buffer = LongArrayBuffer::new();
        buffer.copy_from(&[1, 2, 3, 4, 5]);
        let capacity = buffer.capacity();
        assert!(capacity >= 5);

        buffer.copy_from(&[9]);
        assert_eq!(buffer.as_slice(), &[9]);
        assert_eq!(buffer.capacity(), capacity);

        buffer.truncate(0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), capacity);
    }
}
