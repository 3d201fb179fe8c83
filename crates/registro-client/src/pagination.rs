//! Local paging over the fetched record list.

/// Records per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// 1-based page arithmetic.
///
/// An empty list still has one (empty) page, and out-of-range page numbers
/// are clamped to the nearest valid page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub fn clamp(&self, page: usize, total: usize) -> usize {
        page.clamp(1, self.page_count(total))
    }

    /// The items on `page` (clamped).
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let page = self.clamp(page, items.len());
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        &items[start.min(items.len())..end]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_set_has_one_empty_page() {
        let p = Paginator::default();
        assert_eq!(p.page_count(0), 1);
        assert!(p.page::<u8>(&[], 1).is_empty());
        assert!(p.page::<u8>(&[], 5).is_empty());
    }

    #[test]
    fn counts_partial_last_page() {
        let p = Paginator::default();
        assert_eq!(p.page_count(20), 1);
        assert_eq!(p.page_count(21), 2);
        assert_eq!(p.page_count(45), 3);
    }

    #[test]
    fn slices_and_clamps() {
        let items: Vec<u32> = (0..45).collect();
        let p = Paginator::default();
        assert_eq!(p.page(&items, 1), &items[0..20]);
        assert_eq!(p.page(&items, 3), &items[40..45]);
        assert_eq!(p.page(&items, 0), &items[0..20]);
        assert_eq!(p.page(&items, 99), &items[40..45]);
    }

    #[test]
    fn zero_page_size_is_one() {
        let p = Paginator::new(0);
        assert_eq!(p.page_size(), 1);
        assert_eq!(p.page_count(3), 3);
    }
}
