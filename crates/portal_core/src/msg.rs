use std::path::PathBuf;

use crate::{
    Article, ArticleId, ArticleMutation, Category, CategoryId, CategoryMutation, CurrentUser,
    ExportKind, JobReceipt, MutationAction, RemoteFailure, RequestSeq, ResultPage, SortOrder,
    StatsSnapshot,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Application start: resolve auth, load categories and the first page.
    Started,
    /// Current user lookup finished; `Ok(None)` means no session.
    AuthResolved(Result<Option<CurrentUser>, RemoteFailure>),
    LoggedOut,

    /// Raw keystroke-level search input.
    SearchTyped(String),
    /// Debounced search value.
    SearchSettled(String),
    CategorySelected(Option<CategoryId>),
    PageRequested(u32),
    NextPageClicked,
    PreviousPageClicked,
    SourceSelected(Option<String>),
    SortOrderChanged(SortOrder),
    FiltersReset,
    RefreshRequested,
    ArticlesLoaded {
        seq: RequestSeq,
        result: Result<ResultPage, RemoteFailure>,
    },
    CategoriesLoaded(Result<Vec<Category>, RemoteFailure>),

    ArticleOpened(ArticleId),
    ArticleLoaded {
        seq: RequestSeq,
        result: Result<Article, RemoteFailure>,
    },
    ArticleClosed,

    DashboardOpened,
    DashboardClosed,
    RunJobClicked,
    JobSettled(Result<JobReceipt, RemoteFailure>),
    StatsLoaded {
        seq: RequestSeq,
        result: Result<StatsSnapshot, RemoteFailure>,
    },
    ExportClicked(ExportKind),
    ExportSettled {
        kind: ExportKind,
        result: Result<PathBuf, RemoteFailure>,
    },
    ArticleMutationRequested(ArticleMutation),
    ArticleMutated {
        action: MutationAction,
        result: Result<Option<Article>, RemoteFailure>,
    },
    CategoryMutationRequested(CategoryMutation),
    CategoryMutated {
        action: MutationAction,
        result: Result<Option<Category>, RemoteFailure>,
    },
}
