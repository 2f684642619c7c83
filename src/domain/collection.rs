use serde::{Deserialize, Serialize};

use crate::domain::types::PageSize;

/// One page of records together with the server-side total.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionResult<T> {
    pub items: Vec<T>,
    /// Total matching records server-side, independent of the page size.
    pub total_count: usize,
}

impl<T> CollectionResult<T> {
    pub fn new(items: Vec<T>, total_count: usize) -> Self {
        Self { items, total_count }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Number of pages needed to show `total_count` records.
    pub fn total_pages(&self, page_size: PageSize) -> usize {
        self.total_count.div_ceil(page_size.get() as usize)
    }

    /// Drops every item matching `predicate` and shrinks the total accordingly.
    ///
    /// Returns the number of removed items.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        let removed = before - self.items.len();
        self.total_count = self.total_count.saturating_sub(removed);
        removed
    }
}

impl<T> Default for CollectionResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let size = PageSize::new(10).expect("valid page size");
        assert_eq!(CollectionResult::<u8>::new(vec![], 0).total_pages(size), 0);
        assert_eq!(CollectionResult::<u8>::new(vec![], 10).total_pages(size), 1);
        assert_eq!(CollectionResult::<u8>::new(vec![], 11).total_pages(size), 2);
    }

    #[test]
    fn remove_where_updates_total() {
        let mut result = CollectionResult::new(vec![1, 2, 3], 10);
        assert_eq!(result.remove_where(|v| *v == 2), 1);
        assert_eq!(result.items, vec![1, 3]);
        assert_eq!(result.total_count, 9);
    }
}
