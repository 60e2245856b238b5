//! Portal core: pure state machines and view-model helpers.
mod auth;
mod dashboard;
mod effect;
mod error;
mod gate;
mod listing;
mod model;
mod msg;
mod query;
mod refine;
mod sequence;
mod state;
mod update;
mod view_model;

pub use auth::{AuthContext, AuthStatus};
pub use dashboard::{Dashboard, JobOutcome, JobRunState, JobSettlement, StatsApplied};
pub use effect::{Effect, Notification, NotificationLevel};
pub use error::{CoreError, RemoteFailure, RemoteFailureKind};
pub use gate::{guard, GateState, GateView, PUBLIC_ENTRY};
pub use listing::{FetchTicket, Listing, ListingStatus, PageApplied, PageInfo};
pub use model::{
    Article, ArticleDraft, ArticleId, ArticleKind, ArticleMutation, Category, CategoryDraft,
    CategoryId, CategoryMutation, CurrentUser, ExportKind, JobReceipt, MutationAction, ResultPage,
    StatsSnapshot,
};
pub use msg::Msg;
pub use query::{Query, DEFAULT_PAGE_SIZE};
pub use refine::{
    source_facet, source_name, timeline_millis, visible_results, SortOrder, ViewState,
    EXTERNAL_SOURCE, ORIGINAL_SOURCE,
};
pub use sequence::{RequestSeq, Sequencer};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, DashboardView, ListingView};
