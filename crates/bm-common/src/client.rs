//! HTTP client for the upstream resource service.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::model::Resource;
use crate::normalize::{extract_items, lenient, map_resources, normalize_resource};
use crate::views::directory::ResourceStatistics;

const ERROR_BODY_PREVIEW: usize = 200;
const DEFAULT_SEARCH_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{message}")]
    HttpStatus { status: u16, message: String },
    #[error("unexpected upstream payload: {0}")]
    Decode(String),
    #[error("invalid upstream configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid resource id: {0:?}")]
    InvalidId(String),
}

impl ClientError {
    /// HTTP status returned by upstream, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(*status),
            ClientError::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ClientError::InvalidConfig("base URL is empty".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must be http(s): {base_url}"
            )));
        }
        if timeout.is_zero() {
            return Err(ClientError::InvalidConfig("timeout must be positive".into()));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            timeout,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of the upstream skill search. `page` is zero-based there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSearch {
    pub skills: Vec<String>,
    pub location: String,
    pub experience: f64,
    pub page: u32,
    pub limit: u32,
}

impl Default for SkillSearch {
    fn default() -> Self {
        Self {
            skills: Vec::new(),
            location: String::new(),
            experience: 0.0,
            page: 0,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftBlockRequest {
    pub account_id: String,
    pub blocked_until: NaiveDate,
}

/// Everything the service reads from or delegates to upstream.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn resources(&self, now: DateTime<Utc>) -> Result<Vec<Resource>, ClientError>;
    async fn resource(&self, id: &str, now: DateTime<Utc>) -> Result<Resource, ClientError>;
    async fn statistics(&self) -> Result<ResourceStatistics, ClientError>;
    async fn locations(&self) -> Result<Vec<String>, ClientError>;
    async fn skills(&self) -> Result<Vec<String>, ClientError>;
    async fn accounts(&self) -> Result<Vec<Account>, ClientError>;
    async fn search_by_skills(
        &self,
        query: &SkillSearch,
        now: DateTime<Utc>,
    ) -> Result<Vec<Resource>, ClientError>;
    async fn soft_block(
        &self,
        resource_id: &str,
        request: &SoftBlockRequest,
        now: DateTime<Utc>,
    ) -> Result<Resource, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ResourceApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ResourceApiClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Appends percent-encoded segments to the base URL path.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| ClientError::InvalidConfig(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `/api/v1/resources/{id}` followed by `tail`. Ids that would walk the
    /// path are rejected before any request is made.
    fn resource_url(&self, id: &str, tail: &[&str]) -> Result<Url, ClientError> {
        if id.trim().is_empty() || id == "." || id == ".." {
            return Err(ClientError::InvalidId(id.to_string()));
        }
        let mut segments = vec!["api", "v1", "resources", id];
        segments.extend_from_slice(tail);
        self.url(&segments)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let response = request
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            error!(status = status.as_u16(), %url, %message, "upstream returned an error");
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
    }

    async fn get(&self, url: Url) -> Result<Value, ClientError> {
        debug!(method = "GET", %url, "upstream request");
        self.send(self.http.request(Method::GET, url)).await
    }

    pub async fn list_resources(&self, now: DateTime<Utc>) -> Result<Vec<Resource>, ClientError> {
        let body = self.get(self.url(&["api", "v1", "resources"])?).await?;
        Ok(map_resources(extract_items(&body), now))
    }

    pub async fn get_resource(&self, id: &str, now: DateTime<Utc>) -> Result<Resource, ClientError> {
        let body = self.get(self.resource_url(id, &[])?).await?;
        normalize_resource(unwrap_envelope(&body), now)
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    pub async fn statistics(&self) -> Result<ResourceStatistics, ClientError> {
        let body = self.get(self.url(&["api", "v1", "resources", "stats"])?).await?;
        ResourceStatistics::deserialize(unwrap_envelope(&body))
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    pub async fn locations(&self) -> Result<Vec<String>, ClientError> {
        let body = self.get(self.url(&["api", "v1", "resources", "locations"])?).await?;
        Ok(strings(&body))
    }

    pub async fn skills(&self) -> Result<Vec<String>, ClientError> {
        let body = self.get(self.url(&["api", "v1", "resources", "skills"])?).await?;
        Ok(strings(&body))
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, ClientError> {
        let body = self.get(self.url(&["api", "v1", "accounts"])?).await?;
        Ok(extract_items(&body)
            .iter()
            .filter_map(|item| Account::deserialize(item).ok())
            .collect())
    }

    pub async fn search_by_skills(
        &self,
        query: &SkillSearch,
        now: DateTime<Utc>,
    ) -> Result<Vec<Resource>, ClientError> {
        let url = self.url(&["api", "v1", "resources", "search-by-skills"])?;
        debug!(method = "POST", %url, skills = query.skills.len(), "upstream request");
        let body = self
            .send(self.http.request(Method::POST, url).json(query))
            .await?;
        Ok(map_resources(extract_items(&body), now))
    }

    /// Creates or extends a block; upstream answers with the updated resource.
    pub async fn soft_block(
        &self,
        resource_id: &str,
        request: &SoftBlockRequest,
        now: DateTime<Utc>,
    ) -> Result<Resource, ClientError> {
        let url = self.resource_url(resource_id, &["soft-block"])?;
        debug!(method = "POST", %url, account_id = %request.account_id, "upstream request");
        let blocked_until = request.blocked_until.format("%Y-%m-%d").to_string();
        let body = self
            .send(self.http.request(Method::POST, url).query(&[
                ("accountId", request.account_id.as_str()),
                ("blockedUntil", blocked_until.as_str()),
            ]))
            .await?;
        normalize_resource(unwrap_envelope(&body), now)
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ResourceSource for ResourceApiClient {
    async fn resources(&self, now: DateTime<Utc>) -> Result<Vec<Resource>, ClientError> {
        self.list_resources(now).await
    }

    async fn resource(&self, id: &str, now: DateTime<Utc>) -> Result<Resource, ClientError> {
        self.get_resource(id, now).await
    }

    async fn statistics(&self) -> Result<ResourceStatistics, ClientError> {
        ResourceApiClient::statistics(self).await
    }

    async fn locations(&self) -> Result<Vec<String>, ClientError> {
        ResourceApiClient::locations(self).await
    }

    async fn skills(&self) -> Result<Vec<String>, ClientError> {
        ResourceApiClient::skills(self).await
    }

    async fn accounts(&self) -> Result<Vec<Account>, ClientError> {
        ResourceApiClient::accounts(self).await
    }

    async fn search_by_skills(
        &self,
        query: &SkillSearch,
        now: DateTime<Utc>,
    ) -> Result<Vec<Resource>, ClientError> {
        ResourceApiClient::search_by_skills(self, query, now).await
    }

    async fn soft_block(
        &self,
        resource_id: &str,
        request: &SoftBlockRequest,
        now: DateTime<Utc>,
    ) -> Result<Resource, ClientError> {
        ResourceApiClient::soft_block(self, resource_id, request, now).await
    }
}

/// Single-object responses may arrive bare or wrapped as `{"data": {...}}`.
fn unwrap_envelope(body: &Value) -> &Value {
    match body.get("data") {
        Some(inner @ Value::Object(_)) => inner,
        _ => body,
    }
}

fn strings(body: &Value) -> Vec<String> {
    extract_items(body)
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// Human-readable message for a failed upstream call: the body's
/// `message`, `error` or `detail` when it is JSON, else the status line
/// plus the start of the raw body.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = format!(
        "API Error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    );
    if body.is_empty() {
        return fallback;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(json) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) => {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            format!("{fallback} - {preview}")
        }
    }
}
