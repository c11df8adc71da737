use async_trait::async_trait;
use serde_json::Value;

use docindex_types::MappingNode;

use crate::{Client, IndexResponse, Result};

/// The two write-path operations a document store exposes: registering a
/// type's mapping and storing a document.
///
/// [`Client`] implements this by forwarding to the HTTP API;
/// [`ValidatingClient`](crate::ValidatingClient) wraps any implementation to
/// enforce non-nullable mappings in front of it. Composing the two replaces
/// the usual pattern of patching methods on a shared client object.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Registers `mapping` for documents of `doc_type` under `collection`.
    async fn register_mapping(
        &self,
        collection: &str,
        doc_type: &str,
        mapping: &MappingNode,
    ) -> Result<()>;

    /// Stores `document` under `collection` as a `doc_type` document.
    async fn write_document(
        &self,
        collection: &str,
        doc_type: &str,
        document: &Value,
    ) -> Result<IndexResponse>;
}

#[async_trait]
impl DocumentStore for Client {
    async fn register_mapping(
        &self,
        collection: &str,
        doc_type: &str,
        mapping: &MappingNode,
    ) -> Result<()> {
        self.put_mapping(collection, doc_type, mapping).await
    }

    async fn write_document(
        &self,
        collection: &str,
        doc_type: &str,
        document: &Value,
    ) -> Result<IndexResponse> {
        self.index_document(collection, doc_type, document).await
    }
}
