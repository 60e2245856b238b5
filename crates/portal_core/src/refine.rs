//! Client-local refinement of an already fetched page: source filter and
//! date ordering. Nothing in here ever causes a remote fetch.
use std::cmp::Reverse;
use std::collections::HashSet;

use url::Url;

use crate::Article;

/// Source label for staff-authored articles without a source URL.
pub const ORIGINAL_SOURCE: &str = "Original";
/// Source label for a source URL without a usable host.
pub const EXTERNAL_SOURCE: &str = "External";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Oldest => "oldest",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "latest" | "newest" => Some(SortOrder::Latest),
            "oldest" => Some(SortOrder::Oldest),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Latest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Latest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub sort_order: SortOrder,
    pub selected_source: Option<String>,
}

/// Human-readable source of an article.
///
/// Explicit label first, then the `source_url` host without a leading
/// `www.`, then [`ORIGINAL_SOURCE`]. Display and filtering both go through
/// this function.
pub fn source_name(article: &Article) -> String {
    if let Some(label) = article.source_label() {
        return label.to_string();
    }
    let raw_url = article
        .source_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    match raw_url {
        None => ORIGINAL_SOURCE.to_string(),
        Some(raw) => Url::parse(raw)
            .ok()
            .and_then(|url| url.host_str().map(ToOwned::to_owned))
            .map(|host| match host.strip_prefix("www.") {
                Some(stripped) => stripped.to_string(),
                None => host,
            })
            .unwrap_or_else(|| EXTERNAL_SOURCE.to_string()),
    }
}

/// Distinct source names of `items`, in first-seen order.
pub fn source_facet(items: &[Article]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(source_name)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Sort key: publication date, else creation date, else the epoch.
pub fn timeline_millis(article: &Article) -> i64 {
    article
        .timeline_date()
        .map(|date| date.timestamp_millis())
        .unwrap_or(0)
}

/// Applies the source filter, then a stable sort by [`timeline_millis`].
pub fn visible_results(items: &[Article], view: &ViewState) -> Vec<Article> {
    let selected = view
        .selected_source
        .as_deref()
        .filter(|source| !source.is_empty());
    let mut visible: Vec<Article> = items
        .iter()
        .filter(|item| selected.map_or(true, |source| source_name(item) == source))
        .cloned()
        .collect();
    match view.sort_order {
        SortOrder::Latest => visible.sort_by_key(|item| Reverse(timeline_millis(item))),
        SortOrder::Oldest => visible.sort_by_key(timeline_millis),
    }
    visible
}
