//! # Paging
//!
//! Zero-based pages over newest-first order lists.

use serde::{Deserialize, Serialize};

/// Largest page a caller can ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page used when the caller does not say.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A page request. `number` is zero-based; `size` is always within
/// `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Page {
            number,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn first(size: u32) -> Self {
        Page::new(0, size)
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Tightens the size to `max` (itself kept within `1..=MAX_PAGE_SIZE`).
    pub fn limited_to(self, max: u32) -> Self {
        Page::new(self.number, self.size.min(max.clamp(1, MAX_PAGE_SIZE)))
    }

    /// Rows to skip.
    pub fn offset(&self) -> u32 {
        self.number.saturating_mul(self.size)
    }

    pub fn next(&self) -> Self {
        Page::new(self.number.saturating_add(1), self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus what is needed to ask for the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    /// Matching rows across all pages.
    pub total: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, page: Page, total: i64) -> Self {
        Paged {
            items,
            page: page.number(),
            size: page.size(),
            total,
        }
    }

    pub fn total_pages(&self) -> i64 {
        if self.total <= 0 {
            0
        } else {
            (self.total + i64::from(self.size) - 1) / i64::from(self.size)
        }
    }

    pub fn has_next(&self) -> bool {
        i64::from(self.page) + 1 < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_clamped() {
        assert_eq!(Page::new(0, 0).size(), 1);
        assert_eq!(Page::new(0, 500).size(), MAX_PAGE_SIZE);
        assert_eq!(Page::new(3, 10).offset(), 30);
        assert_eq!(Page::new(0, 50).limited_to(20).size(), 20);
        assert_eq!(Page::new(0, 50).limited_to(0).size(), 1);
    }

    #[test]
    fn test_offset_does_not_overflow() {
        assert_eq!(Page::new(u32::MAX, 100).offset(), u32::MAX);
    }

    #[test]
    fn test_paged_navigation() {
        let paged: Paged<u8> = Paged::new(vec![1, 2], Page::new(0, 2), 5);
        assert_eq!(paged.total_pages(), 3);
        assert!(paged.has_next());

        let last: Paged<u8> = Paged::new(vec![5], Page::new(2, 2), 5);
        assert!(!last.has_next());

        let empty: Paged<u8> = Paged::new(vec![], Page::default(), 0);
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
    }
}
