use crate::model::{Action, PaginationView};

/// Listing and creation state of the actions view.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionsState {
    /// Items of the last successfully normalized page. Kept while a new fetch is in flight.
    pub items: Vec<Action>,
    /// One-based.
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub is_loading: bool,
    pub error: Option<String>,

    pub is_modal_open: bool,
    pub is_creating: bool,
    pub create_error: Option<String>,
    pub create_success: bool,
}

impl ActionsState {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            page_size,
            total_count: 0,
            total_pages: 0,
            is_loading: false,
            error: None,
            is_modal_open: false,
            is_creating: false,
            create_error: None,
            create_success: false,
        }
    }

    pub fn pagination(&self) -> PaginationView {
        PaginationView::new(
            self.current_page,
            self.page_size,
            self.total_count,
            self.total_pages,
        )
    }

    /// Items of the loaded page matching `term`. A blank term keeps everything.
    pub fn filtered(&self, term: &str) -> Vec<Action> {
        let term = term.trim();
        if term.is_empty() {
            return self.items.clone();
        }
        self.items
            .iter()
            .filter(|action| action.matches(term))
            .cloned()
            .collect()
    }
}

impl Default for ActionsState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}
