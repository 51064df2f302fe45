//! Offset pagination for list queries.
//!
//! ```rust
//! use sieve_crud::Pagination;
//!
//! let page_3 = Pagination::page(3, 25);
//! assert_eq!(page_3.skip, Some(50));
//! assert_eq!(page_3.take, Some(25));
//! assert_eq!(page_3.to_sql(), "LIMIT 25 OFFSET 50");
//!
//! assert!(Pagination::new().is_empty());
//! ```

use std::fmt::Write;

/// Skip/take window over a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Number of records to skip.
    pub skip: Option<u64>,
    /// Maximum number of records to take.
    pub take: Option<u64>,
}

impl Pagination {
    /// No window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of records to skip.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the maximum number of records to take.
    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    /// The first `n` records.
    pub fn first(n: u64) -> Self {
        Self::new().take(n)
    }

    /// A page, 1-indexed. Page 0 is treated as page 1.
    pub fn page(page: u64, page_size: u64) -> Self {
        let skip = page.saturating_sub(1).saturating_mul(page_size);
        Self {
            skip: Some(skip),
            take: Some(page_size),
        }
    }

    /// Check if no window is set.
    pub fn is_empty(&self) -> bool {
        self.skip.is_none() && self.take.is_none()
    }

    /// Apply the window to an iterator.
    pub fn apply<I: Iterator>(&self, iter: I) -> impl Iterator<Item = I::Item> {
        let skip = self.skip.map_or(0, |s| usize::try_from(s).unwrap_or(usize::MAX));
        let take = self.take.map_or(usize::MAX, |t| usize::try_from(t).unwrap_or(usize::MAX));
        iter.skip(skip).take(take)
    }

    /// `LIMIT`/`OFFSET` clause.
    pub fn to_sql(&self) -> String {
        let mut sql = String::with_capacity(32);
        if let Some(take) = self.take {
            let _ = write!(sql, "LIMIT {take}");
        }
        if let Some(skip) = self.skip {
            if !sql.is_empty() {
                sql.push(' ');
            }
            let _ = write!(sql, "OFFSET {skip}");
        }
        sql
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    /// Records on this page.
    pub items: Vec<R>,
    /// Records matching the filter across all pages.
    pub total: u64,
    /// Records skipped before this page.
    pub skip: u64,
    /// Requested page size, if any.
    pub take: Option<u64>,
}

impl<R> Page<R> {
    /// Build a page from a window and its results.
    pub fn new(items: Vec<R>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            skip: pagination.skip.unwrap_or(0),
            take: pagination.take,
        }
    }

    /// Check if records remain after this page.
    pub fn has_more(&self) -> bool {
        self.skip + (self.items.len() as u64) < self.total
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map the records.
    pub fn map<T>(self, f: impl FnMut(R) -> T) -> Page<T> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            skip: self.skip,
            take: self.take,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        assert_eq!(Pagination::page(1, 10).skip, Some(0));
        assert_eq!(Pagination::page(0, 10).skip, Some(0));
        assert_eq!(Pagination::first(5).to_sql(), "LIMIT 5");
        assert_eq!(Pagination::new().skip(3).to_sql(), "OFFSET 3");
    }

    #[test]
    fn test_apply() {
        let window: Vec<_> = Pagination::page(2, 3).apply(1..=10).collect();
        assert_eq!(window, [4, 5, 6]);

        let all: Vec<_> = Pagination::new().apply(1..=3).collect();
        assert_eq!(all, [1, 2, 3]);
    }

    #[test]
    fn test_has_more() {
        let pagination = Pagination::page(1, 2);
        assert!(Page::new(vec![1, 2], 3, &pagination).has_more());
        assert!(!Page::new(vec![3], 3, &Pagination::page(2, 2)).has_more());
        assert!(!Page::<i32>::new(vec![], 0, &Pagination::new()).has_more());
    }
}
