//! Paginator: fixed-size pages over an ordered sequence.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number as requested.
    pub page: usize,
    /// Always ≥ 1, even for an empty sequence.
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `max(1, ceil(count / page_size))`. A zero page size is treated as 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamps a requested page into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices page `page_number` (1-based). Out-of-range requests yield an empty page.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page_number: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);

    let slice = match page_number.checked_sub(1) {
        Some(index) => {
            let start = index.saturating_mul(page_size);
            if start < items.len() {
                let end = (start + page_size).min(items.len());
                items[start..end].to_vec()
            } else {
                Vec::new()
            }
        }
        None => Vec::new(),
    };

    Page {
        items: slice,
        page: page_number,
        total_pages,
        total_items: items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forty_two_items_make_six_pages() {
        let items: Vec<u32> = (1..=42).collect();
        let page = paginate(&items, 8, 6);
        assert_eq!(page.total_pages, 6);
        assert_eq!(page.items, vec![41, 42]);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let items: Vec<u32> = (1..=42).collect();
        let page = paginate(&items, 8, 7);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 6);
    }

    #[test]
    fn test_page_zero_is_empty() {
        let items = vec![1, 2, 3];
        assert!(paginate(&items, 2, 0).items.is_empty());
    }

    #[test]
    fn test_empty_sequence_has_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 8, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_pages_never_exceed_page_size_and_cover_all_items() {
        for count in 0..30usize {
            let items: Vec<usize> = (0..count).collect();
            for size in 1..10usize {
                let pages = total_pages(count, size);
                assert!(pages * size >= count);
                let mut seen = Vec::new();
                for n in 1..=pages {
                    let page = paginate(&items, size, n);
                    assert!(page.items.len() <= size);
                    seen.extend(page.items);
                }
                assert_eq!(seen, items);
            }
        }
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let items = vec![1, 2, 3];
        assert!(paginate(&items, 8, usize::MAX).items.is_empty());
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 6), 1);
        assert_eq!(clamp_page(9, 6), 6);
        assert_eq!(clamp_page(3, 0), 1);
    }
}
