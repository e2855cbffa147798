//! `HugeArray`: a fixed-size array split into pages.
//!
//! Goals:
//! - address more elements than a single allocation comfortably holds
//! - predictable allocation (every page but the last is exactly `PAGE_SIZE`)
//! - concurrent writes to disjoint indices through `&self`
//!
//! This is the backing store for the per-node degree and offset tables.
//! Elements live in atomic cells; all accesses use `Relaxed` ordering because
//! the tables are published to readers by moving ownership (the factory's
//! `build` consumes it), which already synchronizes.

use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::error::{BuildError, Result};

/// log2 of the page size.
pub const PAGE_SHIFT: u32 = 14;
/// Elements per page.
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
const PAGE_MASK: usize = PAGE_SIZE - 1;

/// Largest supported element count: `i32::MAX` full pages.
pub const MAX_SIZE: u64 = (i32::MAX as u64) << PAGE_SHIFT;

/// Element types a [`HugeArray`] can hold.
pub trait PageValue: Copy + PartialEq + Send + Sync + 'static {
    /// Atomic cell storing one element.
    type Cell: Send + Sync;

    /// Zero value.
    const ZERO: Self;

    /// Creates a cell.
    fn cell(value: Self) -> Self::Cell;
    /// Reads a cell.
    fn load(cell: &Self::Cell) -> Self;
    /// Writes a cell.
    fn store(cell: &Self::Cell, value: Self);
    /// Replaces `current` with `new`, returning the observed value on failure.
    fn compare_exchange(cell: &Self::Cell, current: Self, new: Self) -> core::result::Result<Self, Self>;
}

macro_rules! page_value {
    ($ty:ty, $atomic:ty) => {
        impl PageValue for $ty {
            type Cell = $atomic;

            const ZERO: Self = 0;

            #[inline(always)]
            fn cell(value: Self) -> Self::Cell {
                <$atomic>::new(value)
            }

            #[inline(always)]
            fn load(cell: &Self::Cell) -> Self {
                cell.load(Ordering::Relaxed)
            }

            #[inline(always)]
            fn store(cell: &Self::Cell, value: Self) {
                cell.store(value, Ordering::Relaxed);
            }

            #[inline(always)]
            fn compare_exchange(cell: &Self::Cell, current: Self, new: Self) -> core::result::Result<Self, Self> {
                cell.compare_exchange(current, new, Ordering::Relaxed, Ordering::Relaxed)
            }
        }
    };
}

page_value!(u32, AtomicU32);
page_value!(u64, AtomicU64);

/// Paged array of `u32`, used for degrees.
pub type HugeIntArray = HugeArray<u32>;
/// Paged array of `u64`, used for offsets.
pub type HugeLongArray = HugeArray<u64>;

/// A fixed-size, paged array of atomic cells.
pub struct HugeArray<T: PageValue> {
    pages: Vec<Box<[T::Cell]>>,
    size: u64,
}

impl<T: PageValue> HugeArray<T> {
    /// Creates a zero-filled array of `size` elements.
    ///
    /// # Errors
    /// [`BuildError::NodeCountOverflow`] if `size` exceeds [`MAX_SIZE`].
    pub fn new(size: u64) -> Result<Self> {
        Self::with_default(size, T::ZERO)
    }

    /// Creates an array of `size` elements, all set to `value`.
    ///
    /// # Errors
    /// [`BuildError::NodeCountOverflow`] if `size` exceeds [`MAX_SIZE`].
    pub fn with_default(size: u64, value: T) -> Result<Self> {
        if size > MAX_SIZE {
            return Err(BuildError::NodeCountOverflow { size, max: MAX_SIZE });
        }
        // MAX_SIZE fits in usize on 64-bit targets; on 32-bit the conversion
        // is the real limit.
        let len = usize::try_from(size).map_err(|_| BuildError::NodeCountOverflow {
            size,
            max: usize::MAX as u64,
        })?;

        let page_count = len.div_ceil(PAGE_SIZE);
        let mut pages = Vec::with_capacity(page_count);
        let mut remaining = len;
        while remaining > 0 {
            let page_len = remaining.min(PAGE_SIZE);
            pages.push((0..page_len).map(|_| T::cell(value)).collect::<Box<[_]>>());
            remaining -= page_len;
        }
        Ok(Self { pages, size })
    }

    /// Number of elements.
    #[inline(always)]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if the array holds no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of allocated pages.
    #[inline(always)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Reads element `index`.
    ///
    /// # Panics
    /// If `index >= self.size()`.
    #[inline]
    pub fn get(&self, index: u64) -> T {
        T::load(self.cell(index))
    }

    /// Writes element `index`.
    ///
    /// # Panics
    /// If `index >= self.size()`.
    #[inline]
    pub fn set(&self, index: u64, value: T) {
        T::store(self.cell(index), value);
    }

    /// Writes `value` only if the element still equals `expected`.
    ///
    /// Returns the value actually found on failure.
    ///
    /// # Panics
    /// If `index >= self.size()`.
    #[inline]
    pub fn compare_and_set(&self, index: u64, expected: T, value: T) -> core::result::Result<(), T> {
        T::compare_exchange(self.cell(index), expected, value).map(|_| ())
    }

    /// Iterates all elements in index order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.pages.iter().flat_map(|page| page.iter().map(T::load))
    }

    /// Heap bytes held by the pages.
    pub fn memory_usage(&self) -> usize {
        self.pages.len() * core::mem::size_of::<Box<[T::Cell]>>()
            + self.size as usize * core::mem::size_of::<T::Cell>()
    }

    #[inline(always)]
    fn cell(&self, index: u64) -> &T::Cell {
        assert!(
            index < self.size,
            "index {index} out of bounds for HugeArray of size {}",
            self.size
        );
        let (page, offset) = index_split(index as usize);
        &self.pages[page][offset]
    }
}

impl<T: PageValue + core::fmt::Debug> core::fmt::Debug for HugeArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HugeArray")
            .field("size", &self.size)
            .field("pages", &self.pages.len())
            .finish()
    }
}

#[inline(always)]
fn index_split(index: usize) -> (usize, usize) {
    (index >> PAGE_SHIFT, index & PAGE_MASK)
}
