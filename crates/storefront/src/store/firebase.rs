//! Firebase Realtime Database client.
//!
//! Uses the REST API: every path maps to `{database_url}/{path}.json`.
//! Reads are `GET` (with `orderBy`/`equalTo` for queries), merges are `PATCH`,
//! deletes are `DELETE` and pushes are `POST` answering `{"name": "<key>"}`.

use std::sync::Arc;

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use url::Url;

use super::{DocumentStore, StoreError};
use crate::config::FirebaseConfig;

/// Client for the Firebase Realtime Database REST API.
#[derive(Clone)]
pub struct FirebaseStore {
    inner: Arc<FirebaseStoreInner>,
}

struct FirebaseStoreInner {
    client: reqwest::Client,
    database_url: Url,
    auth_token: Option<String>,
}

/// Body returned by a `POST`.
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: Option<String>,
}

impl FirebaseStore {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            inner: Arc::new(FirebaseStoreInner {
                client: reqwest::Client::new(),
                database_url: config.database_url.clone(),
                auth_token: config
                    .auth_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
            }),
        }
    }

    /// Build the REST URL for a path.
    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        let path = path.trim_matches('/');
        if path.is_empty() || path.split('/').any(str::is_empty) {
            return Err(StoreError::InvalidPath(path.to_string()));
        }

        let mut url = self.inner.database_url.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}/{path}.json"));

        if let Some(token) = &self.inner.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    /// Send a request and return the response body.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<String, StoreError> {
        let mut request = self.inner.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Document store returned non-success status"
            );
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        Ok(response_text)
    }

    /// Parse a read response; JSON `null` and empty objects mean "absent".
    fn parse_read(body: &str) -> Result<Option<Value>, StoreError> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse document store response"
            );
            StoreError::Parse(e)
        })?;

        Ok(match value {
            Value::Null => None,
            Value::Object(ref map) if map.is_empty() => None,
            other => Some(other),
        })
    }
}

impl DocumentStore for FirebaseStore {
    #[instrument(skip(self))]
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let url = self.endpoint(path)?;
        let body = self.execute(Method::GET, url, None).await?;
        let value = Self::parse_read(&body)?;
        debug!(found = value.is_some(), "Read path");
        Ok(value)
    }

    #[instrument(skip(self))]
    async fn query(
        &self,
        path: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        let mut url = self.endpoint(path)?;
        // Firebase expects JSON-encoded query parameters.
        url.query_pairs_mut()
            .append_pair("orderBy", &Value::from(field).to_string())
            .append_pair("equalTo", &Value::from(value).to_string());

        let body = self.execute(Method::GET, url, None).await?;
        Self::parse_read(&body)
    }

    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        let url = self.endpoint(path)?;
        self.execute(Method::PATCH, url, Some(&Value::Object(fields)))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        let url = self.endpoint(path)?;
        self.execute(Method::DELETE, url, None).await?;
        Ok(())
    }

    #[instrument(skip(self, value))]
    async fn push(&self, path: &str, value: Value) -> Result<String, StoreError> {
        let url = self.endpoint(path)?;
        let body = self.execute(Method::POST, url, Some(&value)).await?;
        let response: PushResponse = serde_json::from_str(&body)?;
        response
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| StoreError::MissingKey(path.to_string()))
    }
}
