use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use docindex_cache::{SchemaCache, SchemaKey};
use docindex_types::{FieldPath, MappingNode, Resolution, resolve_path};

use crate::{DocumentStore, Error, IndexResponse, Result};

/// Decorator that enforces `non-nullable` mapping declarations in front of
/// any [`DocumentStore`].
///
/// Registering a mapping extracts the non-nullable field paths and caches
/// them keyed by (collection, document type) before forwarding the unaltered
/// mapping to the inner store. Writing a document resolves every cached path
/// against it: if any resolves to an explicit null, the write fails with
/// [`Error::NullNonNullableField`] and the inner store is never invoked. An
/// absent field is valid; the constraint is "not explicitly null", not "must
/// be present".
///
/// Writes for a (collection, document type) pair with no registered mapping
/// pass through untouched, as does every result and error from the inner
/// store.
#[derive(Debug)]
pub struct ValidatingClient<S> {
    inner: S,
    cache: Arc<SchemaCache>,
}

impl<S> ValidatingClient<S> {
    /// Wrap `inner` with a fresh schema cache.
    pub fn new(inner: S) -> Self {
        Self::with_cache(inner, Arc::new(SchemaCache::new()))
    }

    /// Wrap `inner` sharing `cache`, e.g. with other decorated clients
    /// talking to the same server.
    pub fn with_cache(inner: S, cache: Arc<SchemaCache>) -> Self {
        Self { inner, cache }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The schema cache consulted on every write.
    pub fn cache(&self) -> &Arc<SchemaCache> {
        &self.cache
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for ValidatingClient<S> {
    async fn register_mapping(
        &self,
        collection: &str,
        doc_type: &str,
        mapping: &MappingNode,
    ) -> Result<()> {
        // Cached before forwarding; a failed remote registration does not
        // roll the entry back.
        self.cache.put(
            SchemaKey::new(collection, doc_type),
            mapping.non_nullable_paths(),
        );
        self.inner
            .register_mapping(collection, doc_type, mapping)
            .await
    }

    async fn write_document(
        &self,
        collection: &str,
        doc_type: &str,
        document: &Value,
    ) -> Result<IndexResponse> {
        let Some(paths) = self.cache.get(&SchemaKey::new(collection, doc_type)) else {
            // No mapping registered means no constraint.
            return self.inner.write_document(collection, doc_type, document).await;
        };

        let violations: Vec<FieldPath> = paths
            .iter()
            .filter(|path| matches!(resolve_path(document, path), Resolution::Null))
            .cloned()
            .collect();

        if !violations.is_empty() {
            debug!(
                collection,
                doc_type,
                fields = violations.len(),
                "rejecting write: explicit null in non-nullable fields"
            );
            return Err(Error::NullNonNullableField { fields: violations });
        }

        self.inner.write_document(collection, doc_type, document).await
    }
}
