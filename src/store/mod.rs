//! Store adapters - the persistence I/O behind a repository.
//!
//! A [`Store`] performs raw writes, field patches, reads and filtered,
//! cursor-paginated queries against a document datastore. The repository
//! layer adds the active-flag policy and error tagging on top.
//!
//! `InMemoryStore` is a complete adapter for tests and development.

mod in_memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::entity::{Entity, ACTIVE_FIELD};

pub use in_memory::InMemoryStore;

/// Field name -> new value, for partial updates. Keys are persisted field
/// names (after serde renames), not Rust identifiers.
pub type FieldMap = serde_json::Map<String, Value>;

/// Equality filter on one persisted field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `active == true`.
    pub fn active() -> Self {
        Self::eq(ACTIVE_FIELD, true)
    }

    /// Whether a stored document satisfies this filter.
    pub fn matches(&self, document: &Value) -> bool {
        document.get(&self.field) == Some(&self.value)
    }
}

/// Outcome of a bulk write.
///
/// `ids` may be non-empty while `error` is set: stores that commit items
/// individually report per-item failures without rolling back successes.
/// When non-empty, `ids` is order-correspondent to the input and holds an
/// empty string where an item was not written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkPut {
    pub ids: Vec<String>,
    pub error: Option<StoreError>,
}

/// One page as returned by the adapter. `next_token` is empty at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage<E> {
    pub items: Vec<E>,
    pub next_token: String,
}

/// Error type for store adapter operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No document with this id in the collection.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },
    /// Tried to create an entity that already carries an identifier.
    #[error("entity already has an identifier: {0}")]
    IdAlreadyAssigned(String),
    /// The continuation token is malformed or belongs to another query.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
    /// Serialization/deserialization error.
    #[error("store serialization error: {0}")]
    Serde(String),
    /// Storage-level error (transport, lock poisoning, backend failure).
    #[error("store error: {0}")]
    Storage(String),
    /// Some items of a bulk write failed.
    #[error("bulk write failed for {failed} of {total} items: {first}")]
    Partial {
        failed: usize,
        total: usize,
        first: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// Abstract document storage.
///
/// Methods are generic over the entity type; the collection comes from
/// `E::COLLECTION`. Ids are assigned by the store on `put`/`bulk_put` and are
/// not part of the persisted document body.
#[async_trait]
pub trait Store: Send + Sync {
    /// Write a new document and return its assigned id.
    async fn put<E: Entity>(&self, entity: &E) -> Result<String, StoreError>;

    /// Write many new documents in one request. See [`BulkPut`].
    async fn bulk_put<E: Entity>(&self, entities: &[E]) -> BulkPut;

    /// Merge `fields` into an existing document.
    async fn patch<E: Entity>(&self, id: &str, fields: &FieldMap) -> Result<(), StoreError>;

    /// Read one document. Fails with `NotFound` when no document has this id.
    async fn get_by_id<E: Entity>(&self, id: &str) -> Result<E, StoreError>;

    /// Read every document matching `filter` (all documents when `None`).
    async fn query<E: Entity>(&self, filter: Option<&Filter>) -> Result<Vec<E>, StoreError>;

    /// Read at most `limit` documents matching `filter`, continuing after `cursor`.
    /// An empty `cursor` starts from the beginning.
    async fn query_page<E: Entity>(
        &self,
        filter: Option<&Filter>,
        limit: usize,
        cursor: &str,
    ) -> Result<RawPage<E>, StoreError>;

    /// Physically remove a document. Removing a missing id is not an error.
    async fn delete<E: Entity>(&self, id: &str) -> Result<(), StoreError>;
}
