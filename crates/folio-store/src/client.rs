//! The document store client.
//!
//! [`StoreContext`] owns the HTTP client, the configuration, and the
//! optional query cache. It is constructed once and passed by
//! reference; all methods take `&self` and share no mutable state, so
//! callers may issue any number of concurrent requests, each producing
//! its own immutable document snapshot.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use folio_core::resolve::{AssetUrlBuilder, ResolverContext};
use folio_core::{DEFAULT_MAX_DEPTH, ProjectedQuery, document_ref_ids, resolve};
use folio_doc_types::{Document, FieldValue};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::cache::QueryCache;
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

pub struct StoreContext {
    config: StoreConfig,
    http: reqwest::Client,
    cache: Option<QueryCache>,
}

/// Wire envelope of a query response.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: serde_json::Value,
}

impl StoreContext {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(StoreError::Client)?;
        let cache = config.cache_ttl.map(QueryCache::new);
        Ok(Self {
            config,
            http,
            cache,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Execute a query, returning the matching documents in the order
    /// the store's `ordering` produced them.
    pub async fn execute(&self, query: &ProjectedQuery) -> Result<Vec<Document>> {
        self.execute_with_deadline(query, self.config.timeout).await
    }

    /// Execute with a caller-supplied deadline instead of the
    /// configured default. On expiry the call fails with
    /// [`StoreError::Timeout`] rather than hanging.
    pub async fn execute_with_deadline(
        &self,
        query: &ProjectedQuery,
        deadline: Duration,
    ) -> Result<Vec<Document>> {
        if let Some(cache) = &self.cache {
            if let Some(documents) = cache.get(query) {
                tracing::debug!(entity = %query.entity_kind, "query cache hit");
                return Ok(documents);
            }
        }

        let (groq, params) = query.to_groq();
        let mut documents = self.run_query(&groq, &params, deadline).await?;
        for document in &mut documents {
            materialize_projection(document, query);
        }

        if let Some(cache) = &self.cache {
            cache.put(query.clone(), documents.clone());
        }
        Ok(documents)
    }

    /// Point lookup: the first matching document, or `None`.
    ///
    /// No match is a valid empty result, never an error.
    pub async fn execute_one(&self, query: &ProjectedQuery) -> Result<Option<Document>> {
        Ok(self.execute(query).await?.into_iter().next())
    }

    /// Execute, racing the request against external cancellation.
    ///
    /// Nothing shared is written until the call resolves, so
    /// cancellation degrades to discarding the eventual result.
    pub async fn execute_cancellable(
        &self,
        query: &ProjectedQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Document>> {
        tokio::select! {
            _ = cancel.cancelled() => Err(StoreError::Cancelled),
            result = self.execute(query) => result,
        }
    }

    /// Fetch the snapshot arena for one document's references: every
    /// document the reference graph reaches, up to the resolver's depth
    /// bound, one round per level of nesting.
    pub async fn fetch_snapshots(&self, document: &Document) -> Result<HashMap<String, Document>> {
        let mut snapshots: HashMap<String, Document> = HashMap::new();
        let mut pending = document_ref_ids(document);

        for _ in 0..DEFAULT_MAX_DEPTH {
            pending.retain(|id| !snapshots.contains_key(id));
            if pending.is_empty() {
                break;
            }
            let ids: Vec<serde_json::Value> = pending
                .iter()
                .map(|id| serde_json::Value::String(id.clone()))
                .collect();
            let params = BTreeMap::from([("ids".to_owned(), serde_json::Value::Array(ids))]);
            let targets = self
                .run_query("*[_id in $ids]", &params, self.config.timeout)
                .await?;

            // ids with no matching document stay absent from the arena
            // and later resolve to Unresolved markers
            pending.clear();
            for target in targets {
                pending.extend(document_ref_ids(&target));
                snapshots.insert(target.id.clone(), target);
            }
        }
        Ok(snapshots)
    }

    /// The asset URL builder for this store's delivery endpoint.
    pub fn asset_url_builder(&self) -> AssetUrlBuilder {
        AssetUrlBuilder::new(
            &self.config.asset_endpoint,
            &self.config.project_id,
            &self.config.dataset,
        )
    }

    /// Execute and resolve in one step: fetch the result set, fetch
    /// each document's reference snapshots, and return resolved
    /// documents ready for narrowing.
    pub async fn execute_resolved(&self, query: &ProjectedQuery) -> Result<Vec<Document>> {
        let documents = self.execute(query).await?;
        let mut resolved = Vec::with_capacity(documents.len());
        for document in &documents {
            let snapshots = self.fetch_snapshots(document).await?;
            let ctx =
                ResolverContext::new(self.asset_url_builder()).with_snapshots(snapshots);
            resolved.push(resolve(document, &ctx));
        }
        Ok(resolved)
    }

    async fn run_query(
        &self,
        groq: &str,
        params: &BTreeMap<String, serde_json::Value>,
        deadline: Duration,
    ) -> Result<Vec<Document>> {
        let mut request = self
            .http
            .get(self.config.query_url())
            .query(&[("query", groq)]);
        for (name, value) in params {
            // parameter values travel JSON-encoded
            request = request.query(&[(format!("${name}"), value.to_string())]);
        }
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%groq, "executing store query");
        // one budget for the whole exchange: connecting, sending, and
        // reading the body together must fit the deadline
        let body = tokio::time::timeout(deadline, dispatch(request, deadline))
            .await
            .map_err(|_| StoreError::Timeout(deadline))??;
        decode_result(body.result)
    }
}

async fn dispatch(request: reqwest::RequestBuilder, deadline: Duration) -> Result<QueryResponse> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            StoreError::Timeout(deadline)
        } else {
            StoreError::Unavailable(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(StoreError::Http {
            status: status.as_u16(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

/// Decode the `result` payload: an array of documents, a single
/// document, or null (a valid empty result).
fn decode_result(result: serde_json::Value) -> Result<Vec<Document>> {
    match result {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|e| StoreError::Decode(e.to_string()))
            })
            .collect(),
        other => serde_json::from_value(other)
            .map(|doc| vec![doc])
            .map_err(|e| StoreError::Decode(e.to_string())),
    }
}

/// Make the result reflect the projection exactly: every projected
/// field the store omitted becomes an explicit null, never a silently
/// missing key.
fn materialize_projection(document: &mut Document, query: &ProjectedQuery) {
    for field in query.effective_fields() {
        if !document.fields.contains_key(field) {
            document.fields.insert(field.to_owned(), FieldValue::Null);
        }
    }
}
