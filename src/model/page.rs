use serde::Serialize;

/// Page sizes offered by the listing view.
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 20, 50];

/// Query parameters of the listing endpoint. `page_number` is one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: u32,
    pub page_size: u32,
}

/// Canonical page record produced by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u32,
    /// Always one-based.
    pub current_page: u32,
}

/// Derived pagination controls for the listing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    /// One-based index of the first item shown, 0 when the list is empty.
    /// Never greater than `end_item`.
    pub start_item: u64,
    pub end_item: u64,
    pub total_count: u64,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl PaginationView {
    pub fn new(current_page: u32, page_size: u32, total_count: u64, total_pages: u32) -> Self {
        let page = u64::from(current_page.max(1));
        let size = u64::from(page_size);
        let end_item = (page * size).min(total_count);
        let start_item = if total_count == 0 {
            0
        } else {
            ((page - 1) * size + 1).min(end_item)
        };
        Self {
            start_item,
            end_item,
            total_count,
            is_first_page: current_page <= 1,
            is_last_page: total_pages == 0 || current_page == total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        !self.is_first_page
    }

    pub fn has_next(&self) -> bool {
        !self.is_last_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_of_middle_page() {
        let view = PaginationView::new(2, 10, 25, 3);
        assert_eq!((view.start_item, view.end_item), (11, 20));
        assert!(view.has_previous());
        assert!(view.has_next());
    }

    #[test]
    fn test_view_of_last_partial_page() {
        let view = PaginationView::new(3, 10, 25, 3);
        assert_eq!((view.start_item, view.end_item), (21, 25));
        assert!(view.is_last_page);
    }

    #[test]
    fn test_page_past_the_end_never_starts_after_it_ends() {
        // A bare array keeps the requested page even when it holds fewer items.
        let view = PaginationView::new(5, 10, 3, 1);
        assert_eq!((view.start_item, view.end_item), (3, 3));
        assert!(view.start_item <= view.end_item);
    }

    #[test]
    fn test_view_of_empty_listing() {
        let view = PaginationView::new(1, 10, 0, 0);
        assert_eq!((view.start_item, view.end_item), (0, 0));
        assert!(view.is_first_page);
        assert!(view.is_last_page);
    }
}
