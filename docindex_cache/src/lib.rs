//! Process-wide cache of the non-nullable field paths registered per
//! (collection, document type) pair.
//!
//! Populated whenever a mapping is registered through the validating client;
//! consulted on every document write. The cache is the only shared mutable
//! state in the write-guarding layer.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use docindex_types::FieldPath;

/// Cache key for a registered mapping.
///
/// A struct key rather than a concatenated string: `("ab", "c")` and
/// `("a", "bc")` must never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaKey {
    collection: Arc<str>,
    doc_type: Arc<str>,
}

impl SchemaKey {
    pub fn new(collection: impl Into<Arc<str>>, doc_type: impl Into<Arc<str>>) -> Self {
        Self {
            collection: collection.into(),
            doc_type: doc_type.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }
}

/// Maps each registered (collection, document type) pair to the set of field
/// paths that must never hold an explicit null.
///
/// `put` replaces an entry wholesale; re-registering a mapping drops any
/// constraints the new mapping no longer declares. `get` distinguishes "never
/// registered" (`None`, no constraint to enforce) from "registered with zero
/// non-nullable fields" (an empty set, which validates trivially).
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<SchemaKey, Arc<BTreeSet<FieldPath>>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `paths` for `key`, replacing any prior entry.
    pub fn put(&self, key: SchemaKey, paths: BTreeSet<FieldPath>) {
        debug!(
            collection = key.collection(),
            doc_type = key.doc_type(),
            fields = paths.len(),
            "caching non-nullable field paths"
        );
        self.entries.write().insert(key, Arc::new(paths));
    }

    /// The paths registered for `key`, or `None` if no mapping has been
    /// registered for it.
    pub fn get(&self, key: &SchemaKey) -> Option<Arc<BTreeSet<FieldPath>>> {
        self.entries.read().get(key).map(Arc::clone)
    }

    /// Number of (collection, document type) pairs with a registered mapping.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
