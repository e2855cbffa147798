//! Page/offset packing for allocator addresses.

use crate::error::{BuildError, Result};

/// Smallest supported page shift.
pub const MIN_PAGE_SHIFT: u32 = 2;
/// Largest supported page shift; in-page offsets stay within `i32`.
pub const MAX_PAGE_SHIFT: u32 = 30;
/// Page indices stay within `i32`.
pub const MAX_PAGES: usize = i32::MAX as usize;

/// Location of a block written by a bump allocator.
///
/// Opaque outside the allocator: only a [`PageLayout`] knows how to split it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Address(u64);

impl Address {
    /// Address recorded for empty blocks.
    pub const EMPTY: Address = Address(0);

    /// Marks a table slot that has not been written. Never produced by an
    /// allocator: it would need a page index beyond [`MAX_PAGES`].
    pub(crate) const UNSET: Address = Address(u64::MAX);

    /// Rebuilds an address from its raw representation.
    #[inline(always)]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw representation, as stored in offset tables.
    #[inline(always)]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Page geometry shared by an allocator and the pages it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageLayout {
    shift: u32,
}

impl PageLayout {
    /// Creates a layout with `1 << shift` elements per page.
    ///
    /// # Errors
    /// [`BuildError::InvalidPageShift`] if `shift` is outside
    /// `MIN_PAGE_SHIFT..=MAX_PAGE_SHIFT`.
    pub fn new(shift: u32) -> Result<Self> {
        if !(MIN_PAGE_SHIFT..=MAX_PAGE_SHIFT).contains(&shift) {
            return Err(BuildError::InvalidPageShift {
                shift,
                min: MIN_PAGE_SHIFT,
                max: MAX_PAGE_SHIFT,
            });
        }
        Ok(Self { shift })
    }

    /// log2 of the page size.
    #[inline(always)]
    pub const fn shift(self) -> u32 {
        self.shift
    }

    /// Elements per regular page.
    #[inline(always)]
    pub const fn page_size(self) -> usize {
        1 << self.shift
    }

    #[inline(always)]
    const fn mask(self) -> u64 {
        (1 << self.shift) - 1
    }

    /// Packs a page index and in-page offset.
    #[inline(always)]
    pub(crate) fn address(self, page: usize, offset: usize) -> Address {
        debug_assert!(page <= MAX_PAGES);
        debug_assert!(offset < self.page_size());
        Address(((page as u64) << self.shift) | offset as u64)
    }

    /// Page index of `address`.
    #[inline(always)]
    pub fn page_index(self, address: Address) -> usize {
        (address.0 >> self.shift) as usize
    }

    /// In-page offset of `address`.
    #[inline(always)]
    pub fn offset(self, address: Address) -> usize {
        (address.0 & self.mask()) as usize
    }
}
