use std::fmt;
use std::path::PathBuf;

use portal_core::{
    Article, ArticleId, ArticleMutation, Category, CategoryMutation, CurrentUser, ExportKind,
    JobReceipt, MutationAction, Query, RequestSeq, ResultPage, StatsSnapshot,
};
use thiserror::Error;

/// Work the engine can be asked to perform against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    ResolveAuth,
    FetchCategories,
    FetchArticles { seq: RequestSeq, query: Query },
    FetchArticle { seq: RequestSeq, id: ArticleId },
    FetchStats { seq: RequestSeq },
    TriggerJob,
    MutateArticle(ArticleMutation),
    MutateCategory(CategoryMutation),
    Export(ExportKind),
}

/// Completion of an [`EngineCommand`], or a settled debounced value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AuthResolved(Result<Option<CurrentUser>, GatewayError>),
    CategoriesLoaded(Result<Vec<Category>, GatewayError>),
    ArticlesLoaded {
        seq: RequestSeq,
        result: Result<ResultPage, GatewayError>,
    },
    ArticleLoaded {
        seq: RequestSeq,
        result: Result<Article, GatewayError>,
    },
    StatsLoaded {
        seq: RequestSeq,
        result: Result<StatsSnapshot, GatewayError>,
    },
    JobSettled(Result<JobReceipt, GatewayError>),
    ArticleMutated {
        action: MutationAction,
        result: Result<Option<Article>, GatewayError>,
    },
    CategoryMutated {
        action: MutationAction,
        result: Result<Option<Category>, GatewayError>,
    },
    ExportSettled {
        kind: ExportKind,
        result: Result<PathBuf, GatewayError>,
    },
    SearchSettled(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: FailureKind,
    pub message: String,
}

impl GatewayError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedResponse, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedResponse,
    ExportFailed(ExportKind),
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::ExportFailed(kind) => write!(f, "export of {kind} failed"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}
