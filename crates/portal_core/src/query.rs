use crate::CategoryId;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Server-delegated criteria of the article listing.
///
/// `page` is always at least 1 and falls back to 1 whenever the search text
/// or the category changes. Fields are only reachable through the setters so
/// that rule cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    search_text: String,
    category_id: Option<CategoryId>,
    page: u32,
    page_size: u32,
}

impl Query {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_text: String::new(),
            category_id: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns `true` when the query changed.
    pub fn set_search_text(&mut self, text: &str) -> bool {
        if self.search_text == text {
            return false;
        }
        self.search_text = text.to_string();
        self.page = 1;
        true
    }

    /// An empty id clears the category. Returns `true` when the query changed.
    pub fn set_category(&mut self, category_id: Option<CategoryId>) -> bool {
        let category_id = category_id.filter(|id| !id.trim().is_empty());
        if self.category_id == category_id {
            return false;
        }
        self.category_id = category_id;
        self.page = 1;
        true
    }

    /// Page 0 is treated as page 1. Upper bounds are checked by the listing.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if self.page == page {
            return false;
        }
        self.page = page;
        true
    }

    /// Clears search and category and goes back to page 1.
    pub fn reset(&mut self) -> bool {
        let cleared = Self::new(self.page_size);
        if *self == cleared {
            return false;
        }
        *self = cleared;
        true
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
