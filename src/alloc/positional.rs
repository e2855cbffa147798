//! Positional writes into slots reserved by another allocator.
//!
//! Property channels after the first are written at the address the first
//! channel's bump write returned. The page index in that address was claimed
//! by exactly one worker, so the positional handle of that same worker is the
//! only writer of the mirrored page and can own it without synchronization.

use tracing::debug;

use super::address::Address;
use super::bump::{BumpAllocator, OpenPage, PageElement};
use crate::error::{BuildError, Result};

/// Single-worker handle writing at addresses returned by a bump write.
pub struct LocalPositionalAllocator<'a, T: PageElement> {
    allocator: &'a BumpAllocator<T>,
    current: Option<OpenPage<T>>,
}

impl<'a, T: PageElement> LocalPositionalAllocator<'a, T> {
    pub(crate) fn new(allocator: &'a BumpAllocator<T>) -> Self {
        Self {
            allocator,
            current: None,
        }
    }

    /// Writes `data` at `address`.
    ///
    /// The write must fit the extent a bump write of `data.len()` elements
    /// could have reserved at that address: within the page, or an exact
    /// oversized page when the offset is 0.
    ///
    /// # Errors
    /// [`BuildError::PositionalOverrun`] if the write exceeds that extent.
    pub fn write_at(&mut self, address: Address, data: &[T]) -> Result<()> {
        let layout = self.allocator.layout();
        let page_size = layout.page_size();
        let length = data.len();
        if length == 0 {
            return Ok(());
        }

        let page = layout.page_index(address);
        let offset = layout.offset(address);
        let capacity = if offset == 0 { page_size.max(length) } else { page_size };
        if offset + length > capacity {
            return Err(BuildError::PositionalOverrun {
                page,
                offset,
                length,
                capacity,
            });
        }

        if length > page_size {
            debug!(page, length, "positional_allocator.oversized_page");
            self.allocator.retire(page, data.into());
            return Ok(());
        }

        if self.current.as_ref().map_or(true, |open| open.index != page) {
            self.retire_current();
            self.current = Some(OpenPage {
                index: page,
                data: Vec::with_capacity(page_size),
            });
        }

        if let Some(open) = self.current.as_mut() {
            let end = offset + length;
            if open.data.len() < end {
                open.data.resize(end, T::default());
            }
            open.data[offset..end].copy_from_slice(data);
        }
        Ok(())
    }

    /// Hands the current page back to the shared allocator.
    pub fn close(mut self) {
        self.retire_current();
    }

    fn retire_current(&mut self) {
        if let Some(page) = self.current.take() {
            self.allocator.retire(page.index, page.data.into_boxed_slice());
        }
    }
}

impl<T: PageElement> Drop for LocalPositionalAllocator<'_, T> {
    fn drop(&mut self) {
        self.retire_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::PageLayout;

    #[test]
    fn mirrors_primary_addresses() {
        let layout = PageLayout::new(3).unwrap();
        let primary = BumpAllocator::<u64>::new(layout);
        let mirror = BumpAllocator::<u64>::new(layout);

        let mut bump = primary.new_local_allocator();
        let mut positional = mirror.new_local_positional_allocator();

        let blocks: [&[u64]; 5] = [&[1, 2, 3], &[4, 5, 6, 7], &[8, 9], &[10; 12], &[11]];
        let mut addresses = Vec::new();
        for block in blocks {
            let address = bump.write(block).unwrap();
            let mirrored: Vec<u64> = block.iter().map(|v| v * 100).collect();
            positional.write_at(address, &mirrored).unwrap();
            addresses.push((address, mirrored));
        }
        bump.close();
        positional.close();

        let primary_pages = primary.into_pages();
        let mirror_pages = mirror.into_pages();
        assert_eq!(primary_pages.page_count(), mirror_pages.page_count());
        for (address, mirrored) in addresses {
            assert_eq!(mirror_pages.slice(address, mirrored.len()), mirrored.as_slice());
            let original: Vec<u64> = primary_pages
                .slice(address, mirrored.len())
                .iter()
                .map(|v| v * 100)
                .collect();
            assert_eq!(original, mirrored);
        }
    }

    #[test]
    fn rejects_writes_past_the_page() {
        let layout = PageLayout::new(2).unwrap();
        let mirror = BumpAllocator::<u64>::new(layout);
        let mut positional = mirror.new_local_positional_allocator();

        let address = layout.address(0, 2);
        let err = positional.write_at(address, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            BuildError::PositionalOverrun {
                page: 0,
                offset: 2,
                length: 3,
                capacity: 4,
            }
        );
        assert!(positional.write_at(address, &[1, 2]).is_ok());
    }

    #[test]
    fn empty_write_is_a_no_op() {
        let layout = PageLayout::new(2).unwrap();
        let mirror = BumpAllocator::<u64>::new(layout);
        let mut positional = mirror.new_local_positional_allocator();
        positional.write_at(Address::EMPTY, &[]).unwrap();
        drop(positional);
        assert_eq!(mirror.into_pages().page_count(), 0);
    }
}
