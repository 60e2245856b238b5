use crate::refine::{source_facet, visible_results, SortOrder, ViewState};
use crate::{Article, CategoryId, CoreError, Query, RemoteFailure, RequestSeq, ResultPage, Sequencer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingStatus {
    #[default]
    Idle,
    Fetching,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

/// A fetch the listing wants issued, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: RequestSeq,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageApplied {
    /// Superseded by a newer request; nothing changed.
    Stale,
    Loaded,
    Failed(RemoteFailure),
}

/// Filter/sort/paginate state of the article list.
///
/// Search, category and page are delegated to the server and every change to
/// them yields a [`FetchTicket`]. Source and sort order only refine the page
/// already held and never yield one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Listing {
    query: Query,
    raw_search: String,
    view: ViewState,
    page: Option<ResultPage>,
    /// Page count reported for the current search and category. Unknown
    /// until the first page of a changed filter has landed.
    page_count: Option<u32>,
    facet: Vec<String>,
    status: ListingStatus,
    last_error: Option<String>,
    sequencer: Sequencer,
}

impl Listing {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: Query::new(page_size),
            ..Self::default()
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn raw_search(&self) -> &str {
        &self.raw_search
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn status(&self) -> ListingStatus {
        self.status
    }

    pub fn page(&self) -> Option<&ResultPage> {
        self.page.as_ref()
    }

    /// Distinct sources of the current page only.
    pub fn facet(&self) -> &[String] {
        &self.facet
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// (Re)issues the current query. Used at start-up and for explicit refresh.
    pub fn refresh(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    /// Records raw, not yet debounced, search input.
    pub fn type_search(&mut self, raw: &str) {
        self.raw_search = raw.to_string();
    }

    /// Applies a debounced search value.
    ///
    /// A settled value that no longer matches the raw input is stale (the
    /// input was edited or reset meanwhile) and is ignored.
    pub fn settle_search(&mut self, settled: &str) -> Option<FetchTicket> {
        if settled != self.raw_search {
            return None;
        }
        self.query
            .set_search_text(settled)
            .then(|| self.begin_filtered_fetch())
    }

    pub fn select_category(&mut self, category_id: Option<CategoryId>) -> Option<FetchTicket> {
        self.query
            .set_category(category_id)
            .then(|| self.begin_filtered_fetch())
    }

    /// Moves to `page`, which must lie in `1..=total_pages`. While a changed
    /// filter is still loading only page 1 is known to exist.
    pub fn go_to_page(&mut self, page: u32) -> Result<Option<FetchTicket>, CoreError> {
        let total_pages = self.total_pages();
        if page < 1 || page > total_pages {
            return Err(CoreError::InvalidPage {
                requested: page,
                total_pages,
            });
        }
        Ok(self.query.set_page(page).then(|| self.begin_fetch()))
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.page_info().has_next {
            return None;
        }
        self.go_to_page(self.query.page() + 1).ok().flatten()
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        if !self.page_info().has_previous {
            return None;
        }
        self.go_to_page(self.query.page() - 1).ok().flatten()
    }

    /// Returns `true` when the selection changed. Never fetches.
    pub fn select_source(&mut self, source: Option<String>) -> bool {
        let source = source.filter(|s| !s.trim().is_empty());
        if self.view.selected_source == source {
            return false;
        }
        self.view.selected_source = source;
        true
    }

    /// Returns `true` when the order changed. Never fetches.
    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        if self.view.sort_order == order {
            return false;
        }
        self.view.sort_order = order;
        true
    }

    /// Clears every criterion; fetches only if the server-side query changed.
    pub fn reset_filters(&mut self) -> Option<FetchTicket> {
        self.raw_search.clear();
        self.view = ViewState::default();
        self.query.reset().then(|| self.begin_filtered_fetch())
    }

    /// Folds a completed fetch into the listing.
    pub fn apply_page(
        &mut self,
        seq: RequestSeq,
        result: Result<ResultPage, RemoteFailure>,
    ) -> PageApplied {
        if !self.sequencer.accept_latest(seq) {
            return PageApplied::Stale;
        }
        match result {
            Ok(page) => {
                self.facet = source_facet(&page.items);
                self.page_count = Some(page.total_pages.max(1));
                self.page = Some(page);
                self.status = ListingStatus::Ready;
                self.last_error = None;
                PageApplied::Loaded
            }
            Err(failure) => {
                self.status = ListingStatus::Error;
                self.last_error = Some(failure.to_string());
                PageApplied::Failed(failure)
            }
        }
    }

    pub fn visible_results(&self) -> Vec<Article> {
        self.page
            .as_ref()
            .map(|page| visible_results(&page.items, &self.view))
            .unwrap_or_default()
    }

    pub fn page_info(&self) -> PageInfo {
        let current_page = self.query.page();
        let total_pages = self.total_pages();
        PageInfo {
            current_page,
            total_pages,
            total: self.page.as_ref().map(|page| page.total).unwrap_or(0),
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }

    fn total_pages(&self) -> u32 {
        self.page_count.unwrap_or(1)
    }

    fn begin_filtered_fetch(&mut self) -> FetchTicket {
        self.page_count = None;
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.status = ListingStatus::Fetching;
        FetchTicket {
            seq: self.sequencer.issue(),
            query: self.query.clone(),
        }
    }
}
