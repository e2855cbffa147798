//! Page-based bump allocator shared by many workers.
//!
//! Workers never share a page. Each [`LocalAllocator`] claims whole pages
//! from a single atomic cursor and appends into its current page without any
//! synchronization. When a page is full (or the local allocator goes away)
//! the page is handed back to the shared page table, indexed by the page
//! index it was claimed under.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crossbeam_utils::CachePadded;
use tracing::{debug, trace, warn};

use super::address::{Address, PageLayout, MAX_PAGES};
use super::pages::Pages;
use super::positional::LocalPositionalAllocator;
use crate::error::{BuildError, Result};

/// Element types stored in allocator pages.
pub trait PageElement: Copy + Default + Send + Sync + 'static {}

impl PageElement for u8 {}
impl PageElement for u64 {}

/// Shared state of a page bump allocator.
///
/// Local allocators borrow it, so [`into_pages`](Self::into_pages) can only
/// run once every local allocator has been dropped.
pub struct BumpAllocator<T: PageElement> {
    layout: PageLayout,
    next_page: CachePadded<AtomicUsize>,
    pages: Mutex<Vec<Option<Box<[T]>>>>,
}

impl<T: PageElement> BumpAllocator<T> {
    /// Creates an allocator with the given page geometry.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            next_page: CachePadded::new(AtomicUsize::new(0)),
            pages: Mutex::new(Vec::new()),
        }
    }

    /// Page geometry.
    #[inline]
    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Pages claimed so far through the atomic cursor.
    #[inline]
    pub fn pages_claimed(&self) -> usize {
        self.next_page.load(Ordering::Acquire)
    }

    /// Returns an appending handle for one worker.
    pub fn new_local_allocator(&self) -> LocalAllocator<'_, T> {
        LocalAllocator {
            allocator: self,
            current: None,
        }
    }

    /// Returns a handle that writes at previously returned addresses.
    ///
    /// Addresses must come from a bump write on an allocator with the same
    /// layout; this allocator then mirrors that allocator's page indices.
    pub fn new_local_positional_allocator(&self) -> LocalPositionalAllocator<'_, T> {
        LocalPositionalAllocator::new(self)
    }

    /// Finalizes the allocator into immutable pages.
    ///
    /// Page indices that were never handed back become empty pages.
    pub fn into_pages(self) -> Pages<T> {
        let claimed = self.next_page.load(Ordering::Acquire);
        let slots = self.pages.into_inner().unwrap_or_else(PoisonError::into_inner);
        let count = slots.len().max(claimed);

        let mut pages: Vec<Box<[T]>> = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_default())
            .collect();
        pages.resize_with(count, Box::default);

        debug!(pages = pages.len(), page_size = self.layout.page_size(), "bump_allocator.into_pages");
        Pages::new(self.layout, pages.into_boxed_slice())
    }

    /// Claims the next page index.
    pub(crate) fn claim_page(&self) -> Result<usize> {
        let mut current = self.next_page.load(Ordering::Relaxed);
        loop {
            if current >= MAX_PAGES {
                return Err(BuildError::PageIndexOverflow { pages: current });
            }
            match self.next_page.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    trace!(page = current, "bump_allocator.claim_page");
                    return Ok(current);
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Stores a finished page under `index`.
    pub(crate) fn retire(&self, index: usize, page: Box<[T]>) {
        let mut pages = self.pages.lock().unwrap_or_else(PoisonError::into_inner);
        if pages.len() <= index {
            pages.resize_with(index + 1, || None);
        }
        let slot = &mut pages[index];
        if let Some(existing) = slot {
            // Two handles wrote the same page; keep the larger extent.
            warn!(page = index, "bump_allocator.page_retired_twice");
            debug_assert!(false, "page {index} retired twice");
            if existing.len() >= page.len() {
                return;
            }
        }
        *slot = Some(page);
    }
}

impl<T: PageElement> core::fmt::Debug for BumpAllocator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BumpAllocator")
            .field("layout", &self.layout)
            .field("pages_claimed", &self.pages_claimed())
            .finish()
    }
}

/// A page owned by exactly one local handle while it is being written.
pub(crate) struct OpenPage<T> {
    pub(crate) index: usize,
    pub(crate) data: Vec<T>,
}

/// Appending, single-worker handle on a [`BumpAllocator`].
///
/// A handle belongs to the worker that created it; writes take `&mut self`.
/// Its current page is handed back on [`close`](Self::close) or drop.
pub struct LocalAllocator<'a, T: PageElement> {
    allocator: &'a BumpAllocator<T>,
    current: Option<OpenPage<T>>,
}

impl<'a, T: PageElement> LocalAllocator<'a, T> {
    /// Appends `data` and returns where it landed.
    ///
    /// Blocks never straddle pages: if `data` does not fit the current page
    /// a new page is claimed, and if it is longer than a page it gets a page
    /// of its own, sized exactly, at offset 0. Empty writes return
    /// [`Address::EMPTY`] and claim nothing.
    ///
    /// # Errors
    /// [`BuildError::PageIndexOverflow`] once the page index space is exhausted.
    pub fn write(&mut self, data: &[T]) -> Result<Address> {
        let layout = self.allocator.layout;
        let page_size = layout.page_size();
        let length = data.len();

        if length == 0 {
            return Ok(Address::EMPTY);
        }
        if length > page_size {
            return self.write_oversized(data);
        }

        if let Some(page) = self.current.as_mut() {
            let offset = page.data.len();
            if offset + length <= page_size {
                page.data.extend_from_slice(data);
                return Ok(layout.address(page.index, offset));
            }
        }

        self.retire_current();
        let index = self.allocator.claim_page()?;
        let mut page = Vec::with_capacity(page_size);
        page.extend_from_slice(data);
        self.current = Some(OpenPage { index, data: page });
        Ok(layout.address(index, 0))
    }

    /// Hands the current page back to the shared allocator.
    pub fn close(mut self) {
        self.retire_current();
    }

    fn write_oversized(&mut self, data: &[T]) -> Result<Address> {
        let index = self.allocator.claim_page()?;
        debug!(page = index, length = data.len(), "bump_allocator.oversized_page");
        self.allocator.retire(index, data.into());
        Ok(self.allocator.layout.address(index, 0))
    }

    fn retire_current(&mut self) {
        if let Some(page) = self.current.take() {
            self.allocator.retire(page.index, page.data.into_boxed_slice());
        }
    }
}

impl<T: PageElement> Drop for LocalAllocator<'_, T> {
    fn drop(&mut self) {
        self.retire_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(shift: u32) -> PageLayout {
        PageLayout::new(shift).unwrap()
    }

    #[test]
    fn appends_within_a_page() {
        let allocator = BumpAllocator::<u64>::new(layout(4));
        let mut local = allocator.new_local_allocator();
        let a = local.write(&[1, 2, 3]).unwrap();
        let b = local.write(&[4, 5]).unwrap();
        local.close();

        let l = allocator.layout();
        assert_eq!((l.page_index(a), l.offset(a)), (0, 0));
        assert_eq!((l.page_index(b), l.offset(b)), (0, 3));

        let pages = allocator.into_pages();
        assert_eq!(pages.slice(a, 3), &[1, 2, 3]);
        assert_eq!(pages.slice(b, 2), &[4, 5]);
    }

    #[test]
    fn overflow_claims_a_new_page() {
        let allocator = BumpAllocator::<u64>::new(layout(2));
        let mut local = allocator.new_local_allocator();
        let a = local.write(&[1, 2, 3]).unwrap();
        let b = local.write(&[4, 5]).unwrap();
        drop(local);

        let l = allocator.layout();
        assert_eq!(l.page_index(a), 0);
        assert_eq!((l.page_index(b), l.offset(b)), (1, 0));
        assert_eq!(allocator.pages_claimed(), 2);

        let pages = allocator.into_pages();
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.slice(b, 2), &[4, 5]);
    }

    #[test]
    fn oversized_write_gets_an_exact_page() {
        let allocator = BumpAllocator::<u8>::new(layout(2));
        let mut local = allocator.new_local_allocator();
        let small = local.write(&[7]).unwrap();
        let big = local.write(&[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        let after = local.write(&[8]).unwrap();
        local.close();

        let l = allocator.layout();
        assert_eq!(l.page_index(small), 0);
        assert_eq!((l.page_index(big), l.offset(big)), (1, 0));
        // the open page survives the oversized write
        assert_eq!((l.page_index(after), l.offset(after)), (0, 1));

        let pages = allocator.into_pages();
        assert_eq!(pages.page(1).len(), 9);
        assert_eq!(pages.slice(big, 9), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(pages.slice(after, 1), &[8]);
    }

    #[test]
    fn empty_writes_claim_nothing() {
        let allocator = BumpAllocator::<u64>::new(layout(4));
        let mut local = allocator.new_local_allocator();
        assert_eq!(local.write(&[]).unwrap(), Address::EMPTY);
        local.close();
        assert_eq!(allocator.pages_claimed(), 0);
        assert_eq!(allocator.into_pages().page_count(), 0);
    }

    #[test]
    fn local_allocators_never_share_pages() {
        let allocator = BumpAllocator::<u64>::new(layout(3));
        let mut first = allocator.new_local_allocator();
        let mut second = allocator.new_local_allocator();
        let a = first.write(&[1]).unwrap();
        let b = second.write(&[2]).unwrap();
        let l = allocator.layout();
        assert_ne!(l.page_index(a), l.page_index(b));
        drop(first);
        drop(second);

        let pages = allocator.into_pages();
        assert_eq!(pages.slice(a, 1), &[1]);
        assert_eq!(pages.slice(b, 1), &[2]);
    }

    #[test]
    fn exhausted_page_cursor_fails_the_write() {
        let allocator = BumpAllocator::<u64>::new(layout(2));
        allocator.next_page.store(MAX_PAGES, Ordering::Relaxed);
        let mut local = allocator.new_local_allocator();
        assert_eq!(
            local.write(&[1]),
            Err(BuildError::PageIndexOverflow { pages: MAX_PAGES })
        );
        local.close();
        assert_eq!(allocator.pages_claimed(), MAX_PAGES);
    }
}
