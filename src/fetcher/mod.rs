//! Remote collection fetching.
//!
//! A [`CollectionApi`] performs the actual network call and returns the raw
//! JSON payload; a per-endpoint [`ResponseAdapter`] turns that payload into a
//! [`CollectionResult`]. [`RemoteCollectionFetcher`] glues the two together
//! behind the [`CollectionFetch`] seam used by the list controller.

use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::collection::CollectionResult;
use crate::domain::query::Query;
use crate::dto::query::{QueryCodecError, SerializedQuery};

#[cfg(feature = "server")]
pub mod http;

/// The single failure kind of a collection fetch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("fetch failed: {message}")]
    FetchFailed { message: String },
}

impl FetchError {
    pub fn failed(message: impl Into<String>) -> Self {
        FetchError::FetchFailed {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FetchError::FetchFailed { message } => message,
        }
    }
}

impl From<QueryCodecError> for FetchError {
    fn from(err: QueryCodecError) -> Self {
        FetchError::failed(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::failed(format!("malformed payload: {err}"))
    }
}

/// Transport capability returning the raw payload of one collection request.
pub trait CollectionApi: Send + Sync + 'static {
    fn fetch(
        &self,
        query: &SerializedQuery,
    ) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// Wraps an async closure as a [`CollectionApi`].
pub struct FnApi<F>(pub F);

impl<F, Fut> CollectionApi for FnApi<F>
where
    F: Fn(SerializedQuery) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, FetchError>> + Send,
{
    fn fetch(
        &self,
        query: &SerializedQuery,
    ) -> impl Future<Output = Result<Value, FetchError>> + Send {
        (self.0)(query.clone())
    }
}

/// Normalizes one endpoint's payload into the canonical result shape.
pub trait ResponseAdapter<T>: Send + Sync + 'static {
    fn adapt(&self, raw: Value) -> Result<CollectionResult<T>, FetchError>;
}

impl<T, F> ResponseAdapter<T> for F
where
    F: Fn(Value) -> Result<CollectionResult<T>, FetchError> + Send + Sync + 'static,
{
    fn adapt(&self, raw: Value) -> Result<CollectionResult<T>, FetchError> {
        self(raw)
    }
}

/// Adapter for `{success, data: {<items>, <total>}}`-style envelopes with
/// endpoint-specific key names.
#[derive(Clone, Debug)]
pub struct EnvelopeAdapter {
    success_key: Option<String>,
    data_key: Option<String>,
    items_key: String,
    total_key: String,
}

impl Default for EnvelopeAdapter {
    fn default() -> Self {
        Self {
            success_key: Some("success".to_string()),
            data_key: Some("data".to_string()),
            items_key: "items".to_string(),
            total_key: "totalCount".to_string(),
        }
    }
}

impl EnvelopeAdapter {
    pub fn new(items_key: impl Into<String>, total_key: impl Into<String>) -> Self {
        Self {
            items_key: items_key.into(),
            total_key: total_key.into(),
            ..Self::default()
        }
    }

    /// Key of the boolean success flag; `None` when the endpoint has none.
    pub fn success_key(mut self, key: Option<&str>) -> Self {
        self.success_key = key.map(str::to_string);
        self
    }

    /// Key of the nested data object; `None` reads items from the top level.
    pub fn data_key(mut self, key: Option<&str>) -> Self {
        self.data_key = key.map(str::to_string);
        self
    }

    fn error_message(raw: &Value) -> Option<&str> {
        raw.get("message")
            .or_else(|| raw.get("error"))
            .and_then(Value::as_str)
    }
}

impl<T> ResponseAdapter<T> for EnvelopeAdapter
where
    T: DeserializeOwned + 'static,
{
    fn adapt(&self, mut raw: Value) -> Result<CollectionResult<T>, FetchError> {
        if let Some(key) = &self.success_key {
            if raw.get(key).and_then(Value::as_bool) != Some(true) {
                let message = Self::error_message(&raw)
                    .unwrap_or("response is missing a success indicator")
                    .to_string();
                return Err(FetchError::failed(message));
            }
        }

        let mut payload = match &self.data_key {
            Some(key) => match raw.get_mut(key.as_str()).map(Value::take) {
                None | Some(Value::Null) => Value::Object(Default::default()),
                Some(data) => data,
            },
            None => raw,
        };

        let items = match payload.get_mut(self.items_key.as_str()).map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()?,
            Some(_) => {
                return Err(FetchError::failed(format!(
                    "`{}` is not an array",
                    self.items_key
                )));
            }
        };

        let total_count = match payload.get(self.total_key.as_str()) {
            None | Some(Value::Null) => 0,
            Some(total) => total
                .as_u64()
                .and_then(|t| usize::try_from(t).ok())
                .ok_or_else(|| {
                    FetchError::failed(format!(
                        "`{}` is not a non-negative integer",
                        self.total_key
                    ))
                })?,
        };

        Ok(CollectionResult::new(items, total_count))
    }
}

/// Turns a [`Query`] into one page of records.
pub trait CollectionFetch: Send + Sync + 'static {
    type Record: Clone + Send + 'static;

    fn fetch(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<CollectionResult<Self::Record>, FetchError>> + Send;
}

/// Serializes the query, performs exactly one call and adapts the payload.
pub struct RemoteCollectionFetcher<A, D, T> {
    api: A,
    adapter: D,
    _record: PhantomData<fn() -> T>,
}

impl<A, D, T> RemoteCollectionFetcher<A, D, T>
where
    A: CollectionApi,
    D: ResponseAdapter<T>,
{
    pub fn new(api: A, adapter: D) -> Self {
        Self {
            api,
            adapter,
            _record: PhantomData,
        }
    }
}

impl<A, D, T> CollectionFetch for RemoteCollectionFetcher<A, D, T>
where
    A: CollectionApi,
    D: ResponseAdapter<T>,
    T: Clone + Send + 'static,
{
    type Record = T;

    async fn fetch(&self, query: &Query) -> Result<CollectionResult<T>, FetchError> {
        let serialized = SerializedQuery::encode(query)?;
        let raw = self.api.fetch(&serialized).await?;
        self.adapter.adapt(raw)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Clone, Debug, Deserialize, PartialEq)]
    struct Row {
        id: i32,
    }

    fn adapt(adapter: &EnvelopeAdapter, raw: Value) -> Result<CollectionResult<Row>, FetchError> {
        adapter.adapt(raw)
    }

    #[test]
    fn missing_items_and_total_normalize_to_empty() {
        let result = adapt(&EnvelopeAdapter::default(), json!({"success": true, "data": {}}))
            .expect("normalizes");
        assert_eq!(result, CollectionResult::empty());

        let result = adapt(&EnvelopeAdapter::default(), json!({"success": true}))
            .expect("normalizes");
        assert_eq!(result, CollectionResult::empty());
    }

    #[test]
    fn endpoint_specific_keys_are_read() {
        let adapter = EnvelopeAdapter::new("payouts", "total");
        let result = adapt(
            &adapter,
            json!({"success": true, "data": {"payouts": [{"id": 1}, {"id": 2}], "total": 7}}),
        )
        .expect("adapts");

        assert_eq!(result.items, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(result.total_count, 7);
    }

    #[test]
    fn top_level_payload_without_success_flag() {
        let adapter = EnvelopeAdapter::new("users", "count")
            .success_key(None)
            .data_key(None);
        let result = adapt(&adapter, json!({"users": [{"id": 3}], "count": 1})).expect("adapts");

        assert_eq!(result.items, vec![Row { id: 3 }]);
    }

    #[test]
    fn missing_or_false_success_flag_fails() {
        let missing = adapt(&EnvelopeAdapter::default(), json!({"data": {"items": []}}));
        assert!(matches!(missing, Err(FetchError::FetchFailed { .. })));

        let rejected = adapt(
            &EnvelopeAdapter::default(),
            json!({"success": false, "message": "forbidden"}),
        );
        assert_eq!(rejected, Err(FetchError::failed("forbidden")));
    }

    #[test]
    fn malformed_fields_fail() {
        let adapter = EnvelopeAdapter::default();
        let not_array = adapt(&adapter, json!({"success": true, "data": {"items": {}}}));
        assert!(not_array.is_err());

        let negative = adapt(&adapter, json!({"success": true, "data": {"totalCount": -1}}));
        assert!(negative.is_err());

        let bad_row = adapt(
            &adapter,
            json!({"success": true, "data": {"items": [{"id": "x"}]}}),
        );
        assert!(bad_row.is_err());
    }

    #[tokio::test]
    async fn remote_fetcher_serializes_and_adapts() {
        let api = FnApi(|query: SerializedQuery| async move {
            assert_eq!(query.search, "acme");
            assert_eq!(query.page, 1);
            Ok(json!({"success": true, "data": {"items": [{"id": 9}], "totalCount": 1}}))
        });
        let fetcher = RemoteCollectionFetcher::<_, _, Row>::new(api, EnvelopeAdapter::default());

        let result = fetcher
            .fetch(&Query::default().with_search("acme"))
            .await
            .expect("fetches");

        assert_eq!(result.items, vec![Row { id: 9 }]);
        assert_eq!(result.total_count, 1);
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let api = FnApi(|_query: SerializedQuery| async move {
            Err::<Value, _>(FetchError::failed("connection refused"))
        });
        let fetcher = RemoteCollectionFetcher::<_, _, Row>::new(api, EnvelopeAdapter::default());

        let result = fetcher.fetch(&Query::default()).await;

        assert_eq!(result, Err(FetchError::failed("connection refused")));
    }
}
