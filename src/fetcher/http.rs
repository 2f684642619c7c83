//! reqwest-backed [`CollectionApi`] for REST collection endpoints.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::dto::query::SerializedQuery;
use crate::fetcher::{CollectionApi, FetchError};

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::failed(format!("network error: {err}"))
    }
}

/// Issues `GET <url>?<serialized query>` and returns the JSON body.
#[derive(Clone, Debug)]
pub struct HttpCollectionApi {
    client: Client,
    url: String,
}

impl HttpCollectionApi {
    /// Builds the transport. Without a timeout a hanging endpoint keeps the
    /// list loading until the next query change supersedes the request.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CollectionApi for HttpCollectionApi {
    async fn fetch(&self, query: &SerializedQuery) -> Result<Value, FetchError> {
        log::debug!("GET {} page={} search={:?}", self.url, query.page, query.search);

        let response = self.client.get(&self.url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("server responded with {status}"));
            return Err(FetchError::failed(message));
        }

        Ok(response.json::<Value>().await?)
    }
}
