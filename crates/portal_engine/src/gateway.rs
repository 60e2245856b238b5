use std::time::Duration;

use futures_util::StreamExt;
use portal_core::{
    Article, ArticleMutation, Category, CategoryMutation, CurrentUser, ExportKind, JobReceipt,
    Query, ResultPage, StatsSnapshot,
};
use portal_logging::{portal_debug, portal_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::envelope;
use crate::{FailureKind, GatewayError};

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// API root, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_export_bytes: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            bearer_token: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_export_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Remote news collection: listing, detail, admin job, mutations and exports.
#[async_trait::async_trait]
pub trait CollectionGateway: Send + Sync {
    /// `Ok(None)` when there is no session to resolve.
    async fn current_user(&self) -> Result<Option<CurrentUser>, GatewayError>;
    async fn fetch_articles(&self, query: &Query) -> Result<ResultPage, GatewayError>;
    async fn fetch_article(&self, id: &str) -> Result<Article, GatewayError>;
    async fn fetch_categories(&self) -> Result<Vec<Category>, GatewayError>;
    async fn fetch_stats(&self) -> Result<StatsSnapshot, GatewayError>;
    async fn trigger_job(&self) -> Result<JobReceipt, GatewayError>;
    async fn mutate_article(
        &self,
        mutation: &ArticleMutation,
    ) -> Result<Option<Article>, GatewayError>;
    async fn mutate_category(
        &self,
        mutation: &CategoryMutation,
    ) -> Result<Option<Category>, GatewayError>;
    /// Raw CSV bytes of one export kind.
    async fn export_csv(&self, kind: ExportKind) -> Result<Vec<u8>, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    settings: GatewaySettings,
    base: Url,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| GatewayError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::new(
                FailureKind::InvalidUrl,
                format!("{base} cannot be used as an API root"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GatewayError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        portal_debug!("{method} {url}");
        let builder = self.client.request(method, url);
        match self.settings.bearer_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn with_json<T: Serialize>(
        builder: RequestBuilder,
        body: &T,
    ) -> Result<RequestBuilder, GatewayError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|err| GatewayError::malformed(format!("request body: {err}")))?;
        Ok(builder.header(CONTENT_TYPE, "application/json").body(bytes))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, GatewayError> {
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            portal_warn!("{} answered {status}", response.url());
            return Err(GatewayError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }

    async fn read_body(&self, builder: RequestBuilder) -> Result<Vec<u8>, GatewayError> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }

    async fn read_json(&self, builder: RequestBuilder) -> Result<serde_json::Value, GatewayError> {
        let bytes = self.read_body(builder).await?;
        envelope::parse(&bytes)
    }
}

#[async_trait::async_trait]
impl CollectionGateway for HttpGateway {
    async fn current_user(&self) -> Result<Option<CurrentUser>, GatewayError> {
        if self.settings.bearer_token.is_none() {
            return Ok(None);
        }
        let request = self.request(Method::GET, self.endpoint(&["auth", "profile"]));
        match self.read_json(request).await {
            Ok(body) => envelope::current_user(body),
            // A rejected token is an anonymous visitor, not a failure.
            Err(err)
                if matches!(
                    err.kind,
                    FailureKind::HttpStatus(code)
                        if code == StatusCode::UNAUTHORIZED.as_u16()
                            || code == StatusCode::FORBIDDEN.as_u16()
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn fetch_articles(&self, query: &Query) -> Result<ResultPage, GatewayError> {
        let mut url = self.endpoint(&["news"]);
        {
            let mut pairs = url.query_pairs_mut();
            if !query.search_text().is_empty() {
                pairs.append_pair("search", query.search_text());
            }
            if let Some(category_id) = query.category_id() {
                pairs.append_pair("categoryId", category_id);
            }
            pairs
                .append_pair("page", &query.page().to_string())
                .append_pair("limit", &query.page_size().to_string())
                .append_pair("isPublished", "true");
        }
        let body = self.read_json(self.request(Method::GET, url)).await?;
        envelope::article_page(body, query.page())
    }

    async fn fetch_article(&self, id: &str) -> Result<Article, GatewayError> {
        let body = self
            .read_json(self.request(Method::GET, self.endpoint(&["news", id])))
            .await?;
        envelope::article(body)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, GatewayError> {
        let body = self
            .read_json(self.request(Method::GET, self.endpoint(&["categories"])))
            .await?;
        envelope::categories(body)
    }

    async fn fetch_stats(&self) -> Result<StatsSnapshot, GatewayError> {
        let body = self
            .read_json(self.request(Method::GET, self.endpoint(&["scraper", "stats"])))
            .await?;
        envelope::stats(body)
    }

    async fn trigger_job(&self) -> Result<JobReceipt, GatewayError> {
        let body = self
            .read_json(self.request(Method::POST, self.endpoint(&["scraper", "run"])))
            .await?;
        envelope::job_receipt(body)
    }

    async fn mutate_article(
        &self,
        mutation: &ArticleMutation,
    ) -> Result<Option<Article>, GatewayError> {
        let request = match mutation {
            ArticleMutation::Create(draft) => Self::with_json(
                self.request(Method::POST, self.endpoint(&["news"])),
                draft,
            )?,
            ArticleMutation::Update { id, draft } => Self::with_json(
                self.request(Method::PUT, self.endpoint(&["news", id.as_str()])),
                draft,
            )?,
            ArticleMutation::Delete { id } => {
                self.read_body(self.request(Method::DELETE, self.endpoint(&["news", id.as_str()])))
                    .await?;
                return Ok(None);
            }
        };
        let bytes = self.read_body(request).await?;
        envelope::optional_record(&bytes)
    }

    async fn mutate_category(
        &self,
        mutation: &CategoryMutation,
    ) -> Result<Option<Category>, GatewayError> {
        let request = match mutation {
            CategoryMutation::Create(draft) => Self::with_json(
                self.request(Method::POST, self.endpoint(&["categories"])),
                draft,
            )?,
            CategoryMutation::Update { id, draft } => Self::with_json(
                self.request(Method::PUT, self.endpoint(&["categories", id.as_str()])),
                draft,
            )?,
            CategoryMutation::Delete { id } => {
                self.read_body(self.request(Method::DELETE, self.endpoint(&["categories", id.as_str()])))
                    .await?;
                return Ok(None);
            }
        };
        let bytes = self.read_body(request).await?;
        envelope::optional_record(&bytes)
    }

    async fn export_csv(&self, kind: ExportKind) -> Result<Vec<u8>, GatewayError> {
        let max_bytes = self.settings.max_export_bytes;
        let response = self
            .request(Method::GET, self.endpoint(&["export", kind.as_str()]))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            portal_warn!("export {kind} answered {status}");
            return Err(GatewayError::new(
                FailureKind::ExportFailed(kind),
                status.to_string(),
            ));
        }
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> GatewayError {
    GatewayError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "export exceeds size limit",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::new(FailureKind::Timeout, err.to_string());
    }
    GatewayError::new(FailureKind::Network, err.to_string())
}
