use crate::{
    Article, Category, ExportKind, GateState, GateView, JobOutcome, JobRunState, ListingStatus,
    PageInfo, Query, StatsSnapshot, ViewState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub query: Query,
    pub raw_search: String,
    pub view_state: ViewState,
    pub visible: Vec<Article>,
    pub facet: Vec<String>,
    pub page_info: PageInfo,
    pub status: ListingStatus,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub job: JobRunState,
    pub stats: Option<StatsSnapshot>,
    pub stats_loading: bool,
    pub can_run_job: bool,
    pub last_outcome: Option<JobOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub listing: ListingView,
    pub categories: Vec<Category>,
    pub detail: Option<Article>,
    pub gate: GateState,
    /// `None` while the dashboard is closed.
    pub admin: Option<GateView<DashboardView>>,
    pub exports_pending: Vec<ExportKind>,
    pub dirty: bool,
}
