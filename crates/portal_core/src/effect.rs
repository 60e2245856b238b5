use crate::{ArticleId, ArticleMutation, CategoryMutation, ExportKind, Query, RequestSeq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ResolveAuth,
    FetchCategories,
    FetchArticles { seq: RequestSeq, query: Query },
    FetchArticle { seq: RequestSeq, id: ArticleId },
    FetchStats { seq: RequestSeq },
    TriggerJob,
    MutateArticle(ArticleMutation),
    MutateCategory(CategoryMutation),
    ExportCsv(ExportKind),
    /// Feed raw search input to the debouncer.
    DebounceSearch(String),
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One-shot user-facing message (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Error, text)
    }

    fn with_level(level: NotificationLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}
