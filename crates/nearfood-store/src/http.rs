//! HTTP implementation of the store traits against the hosted backend.
//!
//! The table API speaks PostgREST conventions: equality filters as
//! `column=eq.value` query params, `Prefer: return=representation` to get
//! written rows back, and a `Content-Range` header carrying exact counts.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::auth::{AuthApi, AuthSession, SessionUser};
use crate::query::{Filter, Row, Select};
use crate::retry::RetryPolicy;
use crate::store::TableStore;
use crate::StoreError;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base URL, e.g. `https://project.example-baas.dev`.
    pub base_url: String,
    /// Project API key sent on every request.
    pub api_key: String,
}

/// Store client talking to the real backend over HTTP.
pub struct HttpStore {
    client: reqwest::Client,
    config: HttpStoreConfig,
    read_retry: RetryPolicy,
}

impl HttpStore {
    pub fn new(config: HttpStoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            read_retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.base_url.trim_end_matches('/'))
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.config.api_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url).headers(self.headers())
    }

    /// Apply equality filters and paging to a table request.
    fn apply_query(mut req: RequestBuilder, query: &Select) -> RequestBuilder {
        for f in &query.filters {
            req = req.query(&[(f.column.as_str(), format!("eq.{}", render_value(&f.value)))]);
        }
        if !query.order.is_empty() {
            let order = query
                .order
                .iter()
                .map(|o| {
                    let dir = if o.descending { "desc" } else { "asc" };
                    format!("{}.{dir}", o.column)
                })
                .collect::<Vec<_>>()
                .join(",");
            req = req.query(&[("order", order)]);
        }
        if let Some(limit) = query.limit {
            req = req.query(&[("limit", limit.to_string())]);
        }
        if let Some(offset) = query.offset {
            req = req.query(&[("offset", offset.to_string())]);
        }
        req
    }

    fn apply_filters(mut req: RequestBuilder, filters: &[Filter]) -> RequestBuilder {
        for f in filters {
            req = req.query(&[(f.column.as_str(), format!("eq.{}", render_value(&f.value)))]);
        }
        req
    }

    async fn rows_from(response: Response) -> Result<Vec<Row>, StoreError> {
        let response = check_status(response)?;
        let value: Value = response.json().await?;
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::Object(map) => Ok(map),
                    other => Err(StoreError::Deserialize(format!(
                        "expected object row, got {other}"
                    ))),
                })
                .collect(),
            Value::Object(map) => Ok(vec![map]),
            other => Err(StoreError::Deserialize(format!(
                "expected row array, got {other}"
            ))),
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn check_status(response: Response) -> Result<Response, StoreError> {
    match response.status() {
        s if s.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized),
        StatusCode::NOT_FOUND => Err(StoreError::NotFound),
        StatusCode::CONFLICT => Err(StoreError::Conflict("backend rejected write".into())),
        s => Err(StoreError::Http { status: s.as_u16() }),
    }
}

/// Total from a `Content-Range` header such as `0-19/83`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

#[async_trait]
impl TableStore for HttpStore {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError> {
        self.read_retry
            .run(|| async {
                let req = Self::apply_query(
                    self.request(Method::GET, &self.table_url(&query.table)),
                    query,
                );
                Self::rows_from(req.send().await?).await
            })
            .await
    }

    async fn select_one(&self, query: &Select) -> Result<Row, StoreError> {
        let mut query = query.clone();
        query.limit = Some(1);
        self.select(&query)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        let response = self
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&Value::Object(row))
            .send()
            .await?;
        Self::rows_from(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Deserialize("insert returned no row".into()))
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        let req = Self::apply_filters(self.request(Method::PATCH, &self.table_url(table)), filters)
            .header("Prefer", "return=representation")
            .json(&Value::Object(patch));
        Self::rows_from(req.send().await?).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let req = Self::apply_filters(self.request(Method::DELETE, &self.table_url(table)), filters)
            .header("Prefer", "return=representation");
        let rows = Self::rows_from(req.send().await?).await?;
        Ok(rows.len() as u64)
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        self.read_retry
            .run(|| async {
                let req =
                    Self::apply_filters(self.request(Method::GET, &self.table_url(table)), filters)
                        .header("Prefer", "count=exact")
                        .query(&[("limit", "1")]);
                let response = check_status(req.send().await?)?;
                let total = response
                    .headers()
                    .get("content-range")
                    .and_then(|v| v.to_str().ok())
                    .and_then(parse_content_range);
                match total {
                    Some(n) => Ok(n),
                    None => {
                        // Backend without exact counts; fall back to body length.
                        Ok(Self::rows_from(response).await?.len() as u64)
                    }
                }
            })
            .await
    }
}

#[derive(serde::Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl AuthApi for HttpStore {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let response = self
            .request(Method::POST, &self.auth_url("signup"))
            .json(&CredentialsBody { email, password })
            .send()
            .await?;
        Ok(check_status(response)?.json().await?)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let response = self
            .request(Method::POST, &self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&CredentialsBody { email, password })
            .send()
            .await?;
        Ok(check_status(response)?.json().await?)
    }

    async fn session_user(&self, token: &str) -> Result<SessionUser, StoreError> {
        let response = self
            .request(Method::GET, &self.auth_url("user"))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;
        Ok(check_status(response)?.json().await?)
    }
}
