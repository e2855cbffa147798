//! Immutable pages produced by a finalized allocator.

use super::address::{Address, PageLayout};

/// Read-only page table.
pub struct Pages<T> {
    layout: PageLayout,
    pages: Box<[Box<[T]>]>,
}

impl<T> Pages<T> {
    pub(crate) fn new(layout: PageLayout, pages: Box<[Box<[T]>]>) -> Self {
        Self { layout, pages }
    }

    /// Page geometry used to decode addresses.
    #[inline]
    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Number of pages.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page `index`.
    ///
    /// # Panics
    /// If `index >= self.page_count()`.
    #[inline]
    pub fn page(&self, index: usize) -> &[T] {
        &self.pages[index]
    }

    /// `length` elements starting at `address`.
    ///
    /// # Panics
    /// If the range is not inside a single written page.
    #[inline]
    pub fn slice(&self, address: Address, length: usize) -> &[T] {
        let tail = self.tail(address);
        assert!(
            length <= tail.len(),
            "block of {length} elements at {address:?} exceeds its page"
        );
        &tail[..length]
    }

    /// Everything from `address` to the end of its page.
    ///
    /// # Panics
    /// If `address` points outside the written pages.
    #[inline]
    pub fn tail(&self, address: Address) -> &[T] {
        let page = &self.pages[self.layout.page_index(address)];
        let offset = self.layout.offset(address);
        assert!(offset <= page.len(), "offset {offset} outside page of length {}", page.len());
        &page[offset..]
    }

    /// Heap bytes held by the pages.
    pub fn memory_usage(&self) -> usize {
        self.pages.len() * core::mem::size_of::<Box<[T]>>()
            + self
                .pages
                .iter()
                .map(|page| page.len() * core::mem::size_of::<T>())
                .sum::<usize>()
    }
}

impl<T> core::fmt::Debug for Pages<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pages")
            .field("layout", &self.layout)
            .field("page_count", &self.pages.len())
            .finish()
    }
}
