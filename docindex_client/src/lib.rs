//! Client for a document-index HTTP API, with write-time enforcement of
//! `non-nullable` mapping declarations.
//!
//! [`Client`] is the plain HTTP transport. Wrapping it (or any other
//! [`DocumentStore`]) in a [`ValidatingClient`] makes mapping registration
//! populate a schema cache and makes every document write fail locally, before
//! anything is sent, if a field declared `non-nullable` is explicitly null.
//!
//! ```no_run
//! # use docindex_client::{Client, DocumentStore, ValidatingClient};
//! # use serde_json::json;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let client = ValidatingClient::new(Client::new("http://localhost:9200")?);
//!
//! let mapping = serde_json::from_value(json!({
//!     "properties": {
//!         "message": { "type": "string", "non-nullable": true }
//!     }
//! }))?;
//! client.register_mapping("tweets", "tweet", &mapping).await?;
//!
//! // Rejected locally: "message" is explicitly null.
//! let err = client
//!     .write_document("tweets", "tweet", &json!({ "message": null }))
//!     .await
//!     .unwrap_err();
//! assert!(err.to_string().contains("non-nullable"));
//! # Ok(())
//! # }
//! ```

use reqwest::{IntoUrl, Method, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

pub use docindex_types::{FieldPath, MappingNode};

mod store;
mod validate;

pub use store::DocumentStore;
pub use validate::ValidatingClient;

/// Primary error type for the [`Client`]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("base URL error: {0}")]
    BaseUrl(#[source] reqwest::Error),

    #[error("request URL error: {0}")]
    RequestUrl(#[from] url::ParseError),

    #[error("failed to parse JSON response: {0}")]
    Json(#[source] reqwest::Error),

    #[error("failed to parse plaintext response: {0}")]
    Text(#[source] reqwest::Error),

    #[error("server responded with error [{code}]: {message}")]
    ApiError { code: StatusCode, message: String },

    #[error("failed to send {method} {url} request: {source}")]
    RequestSend {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A write held an explicit null in one or more fields whose mapping
    /// declares them `non-nullable`. Raised before the request is sent;
    /// retrying with the same document fails again.
    #[error("{}", null_field_message(.fields))]
    NullNonNullableField {
        /// The violating field paths, every one of them.
        fields: Vec<FieldPath>,
    },
}

impl Error {
    fn request_send(method: Method, url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::RequestSend {
            method,
            url: url.into(),
            source,
        }
    }
}

fn null_field_message(fields: &[FieldPath]) -> String {
    let plural = if fields.len() > 1 { "s" } else { "" };
    let list = fields
        .iter()
        .map(|field| format!("\"{field}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Null value for non-nullable field{plural} {list}")
}

pub type Result<T> = std::result::Result<T, Error>;

/// Acknowledgement returned by the index API for a stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Server-assigned identifier of the stored document.
    #[serde(rename = "_id")]
    pub id: String,
    /// Whether the write created a new document rather than replacing one.
    pub created: bool,
}

/// HTTP client for a document-index server.
///
/// Performs no validation of its own; see [`ValidatingClient`] for the
/// schema-aware wrapper.
#[derive(Debug, Clone)]
pub struct Client {
    /// The base URL of the document-index server
    base_url: Url,
    /// The `Bearer` token to use for authenticating on each request
    auth_token: Option<Secret<String>>,
    /// A [`reqwest::Client`] for handling HTTP requests
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new [`Client`]
    pub fn new<U: IntoUrl>(base_url: U) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into_url().map_err(Error::BaseUrl)?,
            auth_token: None,
            http_client: reqwest::Client::new(),
        })
    }

    /// Set the `Bearer` token that will be sent with each request
    pub fn with_auth_token<S: Into<String>>(mut self, auth_token: S) -> Self {
        self.auth_token = Some(Secret::new(auth_token.into()));
        self
    }

    /// Check that the server is reachable and answering.
    pub async fn ping(&self) -> Result<()> {
        let resp = self
            .request(Method::GET, "/")?
            .send()
            .await
            .map_err(|src| Error::request_send(Method::GET, "/", src))?;
        self.acknowledge(resp).await
    }

    /// Create `collection` on the server.
    pub async fn create_collection(&self, collection: &str) -> Result<()> {
        let path = format!("/{collection}");
        let resp = self
            .request(Method::PUT, &path)?
            .send()
            .await
            .map_err(|src| Error::request_send(Method::PUT, &path, src))?;
        self.acknowledge(resp).await
    }

    /// Delete `collection` and every document in it.
    pub async fn delete_collection(&self, collection: &str) -> Result<()> {
        let path = format!("/{collection}");
        let resp = self
            .request(Method::DELETE, &path)?
            .send()
            .await
            .map_err(|src| Error::request_send(Method::DELETE, &path, src))?;
        self.acknowledge(resp).await
    }

    /// Register `mapping` for documents of `doc_type` under `collection`.
    pub async fn put_mapping(
        &self,
        collection: &str,
        doc_type: &str,
        mapping: &MappingNode,
    ) -> Result<()> {
        let path = format!("/{collection}/_mapping/{doc_type}");
        let resp = self
            .request(Method::PUT, &path)?
            .json(mapping)
            .send()
            .await
            .map_err(|src| Error::request_send(Method::PUT, &path, src))?;
        self.acknowledge(resp).await
    }

    /// Fetch the mapping registered for `doc_type` under `collection`.
    pub async fn get_mapping(&self, collection: &str, doc_type: &str) -> Result<MappingNode> {
        let path = format!("/{collection}/_mapping/{doc_type}");
        let resp = self
            .request(Method::GET, &path)?
            .send()
            .await
            .map_err(|src| Error::request_send(Method::GET, &path, src))?;
        match resp.status() {
            status if status.is_success() => resp.json().await.map_err(Error::Json),
            code => Err(Error::ApiError {
                code,
                message: resp.text().await.map_err(Error::Text)?,
            }),
        }
    }

    /// Remove the mapping registered for `doc_type` under `collection`.
    pub async fn delete_mapping(&self, collection: &str, doc_type: &str) -> Result<()> {
        let path = format!("/{collection}/_mapping/{doc_type}");
        let resp = self
            .request(Method::DELETE, &path)?
            .send()
            .await
            .map_err(|src| Error::request_send(Method::DELETE, &path, src))?;
        self.acknowledge(resp).await
    }

    /// Store `document` under `collection` as a `doc_type` document.
    pub async fn index_document(
        &self,
        collection: &str,
        doc_type: &str,
        document: &Value,
    ) -> Result<IndexResponse> {
        let path = format!("/{collection}/{doc_type}");
        let resp = self
            .request(Method::POST, &path)?
            .json(document)
            .send()
            .await
            .map_err(|src| Error::request_send(Method::POST, &path, src))?;
        match resp.status() {
            status if status.is_success() => resp.json().await.map_err(Error::Json),
            code => Err(Error::ApiError {
                code,
                message: resp.text().await.map_err(Error::Text)?,
            }),
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder> {
        let url = self.base_url.join(path)?;
        let mut req = self.http_client.request(method, url);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token.expose_secret());
        }
        Ok(req)
    }

    async fn acknowledge(&self, resp: reqwest::Response) -> Result<()> {
        match resp.status() {
            status if status.is_success() => Ok(()),
            code => Err(Error::ApiError {
                code,
                message: resp.text().await.map_err(Error::Text)?,
            }),
        }
    }
}
