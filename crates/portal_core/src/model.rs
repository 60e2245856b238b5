use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type ArticleId = String;
pub type CategoryId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleKind {
    #[default]
    Original,
    Scraped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, alias = "_id", deserialize_with = "flexible_id")]
    pub id: CategoryId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Read model of a news article as served by the collection endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(alias = "_id", deserialize_with = "flexible_id")]
    pub id: ArticleId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(rename = "type", default)]
    pub kind: ArticleKind,
    #[serde(default)]
    pub is_published: Option<bool>,
}

impl Article {
    /// Explicit source label, `sourceName` first, ignoring blank values.
    pub fn source_label(&self) -> Option<&str> {
        [self.source_name.as_deref(), self.source.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|label| !label.is_empty())
    }

    /// Publication date, falling back to the creation date.
    pub fn timeline_date(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.created_at)
    }
}

/// One page of the article collection. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage {
    pub items: Vec<Article>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub total_articles: u64,
    pub original_count: u64,
    pub scraped_count: u64,
    pub category_count: u64,
}

/// What the job trigger reports back: a delta, never a total.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobReceipt {
    pub accepted_count: u64,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.trim().eq_ignore_ascii_case("admin")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportKind {
    News,
    Stats,
    Categories,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::News, ExportKind::Stats, ExportKind::Categories];

    /// Path segment of the export endpoint and prefix of the saved file.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportKind::News => "news",
            ExportKind::Stats => "stats",
            ExportKind::Categories => "categories",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown export kind '{wanted}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationAction::Create => "created",
            MutationAction::Update => "updated",
            MutationAction::Delete => "deleted",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleMutation {
    Create(ArticleDraft),
    Update { id: ArticleId, draft: ArticleDraft },
    Delete { id: ArticleId },
}

impl ArticleMutation {
    pub fn action(&self) -> MutationAction {
        match self {
            ArticleMutation::Create(_) => MutationAction::Create,
            ArticleMutation::Update { .. } => MutationAction::Update,
            ArticleMutation::Delete { .. } => MutationAction::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMutation {
    Create(CategoryDraft),
    Update { id: CategoryId, draft: CategoryDraft },
    Delete { id: CategoryId },
}

impl CategoryMutation {
    pub fn action(&self) -> MutationAction {
        match self {
            CategoryMutation::Create(_) => MutationAction::Create,
            CategoryMutation::Update { .. } => MutationAction::Update,
            CategoryMutation::Delete { .. } => MutationAction::Delete,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

// Backends disagree on numeric vs string ids.
fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
