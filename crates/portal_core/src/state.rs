use crate::gate::guard;
use crate::view_model::{AppViewModel, DashboardView, ListingView};
use crate::{
    Article, ArticleId, AuthContext, Category, Dashboard, ExportKind, GateState, JobRunState,
    Listing, RequestSeq, Sequencer, DEFAULT_PAGE_SIZE,
};

/// Detail view of a single article, fetched independently of the list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ArticleDetail {
    requested: Option<ArticleId>,
    article: Option<Article>,
    sequencer: Sequencer,
}

impl ArticleDetail {
    pub(crate) fn open(&mut self, id: ArticleId) -> RequestSeq {
        self.requested = Some(id);
        self.article = None;
        self.sequencer.issue()
    }

    pub(crate) fn close(&mut self) {
        self.requested = None;
        self.article = None;
    }

    /// Returns `false` for superseded responses or after the detail was closed.
    pub(crate) fn accept(&mut self, seq: RequestSeq) -> bool {
        self.requested.is_some() && self.sequencer.accept_latest(seq)
    }

    pub(crate) fn show(&mut self, article: Article) {
        self.article = Some(article);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    auth: AuthContext,
    listing: Listing,
    categories: Vec<Category>,
    detail: ArticleDetail,
    dashboard: Dashboard,
    dashboard_open: bool,
    exports_pending: Vec<ExportKind>,
    dirty: bool,
}

impl AppState {
    pub fn new(page_size: u32) -> Self {
        Self {
            auth: AuthContext::start(),
            listing: Listing::new(page_size),
            categories: Vec::new(),
            detail: ArticleDetail::default(),
            dashboard: Dashboard::new(),
            dashboard_open: false,
            exports_pending: Vec::new(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let listing = &self.listing;
        let dashboard = &self.dashboard;
        AppViewModel {
            listing: ListingView {
                query: listing.query().clone(),
                raw_search: listing.raw_search().to_string(),
                view_state: listing.view_state().clone(),
                visible: listing.visible_results(),
                facet: listing.facet().to_vec(),
                page_info: listing.page_info(),
                status: listing.status(),
                last_error: listing.last_error().map(ToOwned::to_owned),
            },
            categories: self.categories.clone(),
            detail: self.detail.article.clone(),
            gate: self.auth.gate(),
            admin: self.dashboard_open.then(|| {
                guard(&self.auth.status(), || DashboardView {
                    job: dashboard.job_state(),
                    stats: dashboard.stats().copied(),
                    stats_loading: dashboard.is_loading_stats(),
                    can_run_job: dashboard.job_state() == JobRunState::Idle,
                    last_outcome: dashboard.last_outcome(),
                })
            }),
            exports_pending: self.exports_pending.clone(),
            dirty: self.dirty,
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_dashboard_open(&self) -> bool {
        self.dashboard_open
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_admin(&self) -> bool {
        self.auth.gate() == GateState::Granted
    }

    pub(crate) fn auth_mut(&mut self) -> &mut AuthContext {
        &mut self.auth
    }

    pub(crate) fn logout(&mut self) {
        let auth = std::mem::take(&mut self.auth);
        self.auth = auth.logout();
        self.dashboard_open = false;
    }

    pub(crate) fn listing_mut(&mut self) -> &mut Listing {
        &mut self.listing
    }

    pub(crate) fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub(crate) fn detail_mut(&mut self) -> &mut ArticleDetail {
        &mut self.detail
    }

    pub(crate) fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub(crate) fn set_dashboard_open(&mut self, open: bool) {
        self.dashboard_open = open;
    }

    /// Returns `false` when an export of that kind is already in flight.
    pub(crate) fn begin_export(&mut self, kind: ExportKind) -> bool {
        if self.exports_pending.contains(&kind) {
            return false;
        }
        self.exports_pending.push(kind);
        true
    }

    pub(crate) fn finish_export(&mut self, kind: ExportKind) {
        self.exports_pending.retain(|pending| *pending != kind);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
