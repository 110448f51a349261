//! HTTP catalog provider for the `/api/*` endpoints.
//!
//! | Operation                  | Endpoint                    |
//! |----------------------------|-----------------------------|
//! | `list_categories`          | `GET /api/categories`       |
//! | `list_prompts_by_category` | `GET /api/categories/{id}`  |
//! | `get_prompt_detail`        | `GET /api/prompts/{id}`     |
//! | `search`                   | `GET /api/search?q={text}`  |
//!
//! Errors arrive as non-2xx responses with a JSON body carrying a
//! human-readable `message` (or `error`) field.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{DataProvider, EntityKind, ProviderError, ProviderResult, searchable_query};
use crate::models::{Category, PromptDetail, PromptSummary, SearchResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Path segment encoding: keep unreserved characters readable
const SEGMENT_ENCODE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Catalog served over HTTP
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: Url,
}

impl HttpProvider {
    /// Create a provider for a base URL such as `http://localhost:3000/`
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid catalog URL: {}", base_url))?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding the identifier segment
    pub(crate) fn endpoint(&self, path: &str, id: Option<&str>) -> ProviderResult<Url> {
        let relative = match id {
            Some(id) => format!("{}/{}", path, utf8_percent_encode(id, SEGMENT_ENCODE_SET)),
            None => path.to_string(),
        };
        self.base_url
            .join(&relative)
            .map_err(|e| ProviderError::Transport(format!("Invalid endpoint {}: {}", relative, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        not_found: impl FnOnce() -> ProviderError,
    ) -> ProviderResult<T> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::Transport(format!("Invalid response body: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body, not_found))
    }
}

/// Translate a non-2xx response into the provider error taxonomy
pub(crate) fn error_for_status(
    status: StatusCode,
    body: &str,
    not_found: impl FnOnce() -> ProviderError,
) -> ProviderError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());

    match status {
        StatusCode::NOT_FOUND => not_found(),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::Validation(message)
        }
        _ => ProviderError::Transport(format!("{} ({})", message, status.as_u16())),
    }
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn list_categories(&self) -> ProviderResult<Vec<Category>> {
        let url = self.endpoint("api/categories", None)?;
        let catalog = url.to_string();
        self.get_json(url, || ProviderError::NotFound { kind: EntityKind::Catalog, id: catalog })
            .await
    }

    async fn list_prompts_by_category(
        &self,
        category_id: &str,
    ) -> ProviderResult<Vec<PromptSummary>> {
        let url = self.endpoint("api/categories", Some(category_id))?;
        self.get_json(url, || ProviderError::category_not_found(category_id)).await
    }

    async fn get_prompt_detail(&self, prompt_id: &str) -> ProviderResult<PromptDetail> {
        let url = self.endpoint("api/prompts", Some(prompt_id))?;
        self.get_json(url, || ProviderError::prompt_not_found(prompt_id)).await
    }

    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchResult>> {
        let Some(query) = searchable_query(query) else {
            return Ok(Vec::new());
        };

        let mut url = self.endpoint("api/search", None)?;
        url.query_pairs_mut().append_pair("q", query);
        // A 404 from the search endpoint means the route itself is missing
        let route = url.path().to_string();
        self.get_json(url, || ProviderError::Transport(format!("Search endpoint not found: {}", route)))
            .await
    }
}
