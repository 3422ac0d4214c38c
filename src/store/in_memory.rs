//! InMemoryStore - HashMap-backed document store for testing and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{BulkPut, FieldMap, Filter, RawPage, Store, StoreError};
use crate::entity::Entity;

/// Internal stored representation of a document.
struct StoredDocument {
    seq: u64,
    bytes: Vec<u8>,
}

/// One collection: documents by id, plus insertion order for pagination.
#[derive(Default)]
struct Collection {
    next_seq: u64,
    order: BTreeMap<u64, String>,
    documents: HashMap<String, StoredDocument>,
}

impl Collection {
    fn insert(&mut self, id: String, bytes: Vec<u8>) {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.order.insert(seq, id.clone());
        self.documents.insert(id, StoredDocument { seq, bytes });
    }
}

/// Position encoded inside a continuation token.
#[derive(Serialize, Deserialize)]
struct CursorPosition {
    collection: String,
    after: u64,
}

/// In-memory document store.
///
/// Documents are kept as serialized JSON per collection, in insertion order.
/// Ids are random UUIDs. Clone-friendly via Arc; clones share storage.
#[derive(Clone)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of documents physically present in `E`'s collection,
    /// active or not.
    pub fn count<E: Entity>(&self) -> Result<usize, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        Ok(collections
            .get(E::COLLECTION)
            .map(|c| c.documents.len())
            .unwrap_or(0))
    }

    /// The persisted document body for `id`, as stored.
    pub fn raw_document<E: Entity>(&self, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        match collections
            .get(E::COLLECTION)
            .and_then(|c| c.documents.get(id))
        {
            Some(stored) => Ok(Some(serde_json::from_slice(&stored.bytes)?)),
            None => Ok(None),
        }
    }

    fn encode_document<E: Entity>(entity: &E) -> Result<Vec<u8>, StoreError> {
        if entity.has_id() {
            return Err(StoreError::IdAlreadyAssigned(entity.id().to_string()));
        }
        let document = serde_json::to_value(entity)?;
        if !document.is_object() {
            return Err(StoreError::Serde(format!(
                "{} does not serialize to a document object",
                E::COLLECTION
            )));
        }
        Ok(serde_json::to_vec(&document)?)
    }

    fn decode_document<E: Entity>(id: &str, document: Value) -> Result<E, StoreError> {
        let mut entity: E = serde_json::from_value(document)?;
        entity.set_id(id.to_string());
        Ok(entity)
    }

    fn encode_cursor(collection: &str, after: u64) -> Result<String, StoreError> {
        let bytes = bitcode::serialize(&CursorPosition {
            collection: collection.to_string(),
            after,
        })
        .map_err(|e| StoreError::Serde(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode_cursor(collection: &str, token: &str) -> Result<u64, StoreError> {
        if token.is_empty() {
            return Ok(0);
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
        let position: CursorPosition = bitcode::deserialize(&bytes)
            .map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
        if position.collection != collection {
            return Err(StoreError::InvalidCursor(format!(
                "token belongs to collection `{}`, not `{}`",
                position.collection, collection
            )));
        }
        Ok(position.after)
    }

    fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn put<E: Entity>(&self, entity: &E) -> Result<String, StoreError> {
        let bytes = Self::encode_document(entity)?;

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let id = Self::new_id();
        collections
            .entry(E::COLLECTION.to_string())
            .or_default()
            .insert(id.clone(), bytes);

        Ok(id)
    }

    async fn bulk_put<E: Entity>(&self, entities: &[E]) -> BulkPut {
        let mut collections = match self.collections.write() {
            Ok(guard) => guard,
            Err(_) => {
                return BulkPut {
                    ids: Vec::new(),
                    error: Some(StoreError::Storage("lock poisoned".into())),
                }
            }
        };
        let collection = collections.entry(E::COLLECTION.to_string()).or_default();

        let mut ids = Vec::with_capacity(entities.len());
        let mut failed = 0;
        let mut first_failure = None;

        for entity in entities {
            match Self::encode_document(entity) {
                Ok(bytes) => {
                    let id = Self::new_id();
                    collection.insert(id.clone(), bytes);
                    ids.push(id);
                }
                Err(err) => {
                    failed += 1;
                    first_failure.get_or_insert(err);
                    ids.push(String::new());
                }
            }
        }

        let error = first_failure.map(|first| StoreError::Partial {
            failed,
            total: entities.len(),
            first: first.to_string(),
        });

        if failed == entities.len() {
            ids.clear();
        }

        BulkPut { ids, error }
    }

    async fn patch<E: Entity>(&self, id: &str, fields: &FieldMap) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let stored = collections
            .get_mut(E::COLLECTION)
            .and_then(|c| c.documents.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: E::COLLECTION.to_string(),
                id: id.to_string(),
            })?;

        let mut document: Value = serde_json::from_slice(&stored.bytes)?;
        let object = document.as_object_mut().ok_or_else(|| {
            StoreError::Serde(format!("stored {}/{} is not an object", E::COLLECTION, id))
        })?;
        for (field, value) in fields {
            object.insert(field.clone(), value.clone());
        }

        // Store the entity's own serialization, so keys it never persists
        // (the id, unknown fields) do not stick. Unreadable patches fail here.
        let entity: E = serde_json::from_value(document)?;
        stored.bytes = serde_json::to_vec(&entity)?;
        Ok(())
    }

    async fn get_by_id<E: Entity>(&self, id: &str) -> Result<E, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let stored = collections
            .get(E::COLLECTION)
            .and_then(|c| c.documents.get(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: E::COLLECTION.to_string(),
                id: id.to_string(),
            })?;

        let document: Value = serde_json::from_slice(&stored.bytes)?;
        Self::decode_document(id, document)
    }

    async fn query<E: Entity>(&self, filter: Option<&Filter>) -> Result<Vec<E>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let collection = match collections.get(E::COLLECTION) {
            Some(c) => c,
            None => return Ok(Vec::new()),
        };

        let mut results = Vec::new();
        for id in collection.order.values() {
            let Some(stored) = collection.documents.get(id) else {
                continue;
            };
            let document: Value = serde_json::from_slice(&stored.bytes)?;
            if filter.map_or(true, |f| f.matches(&document)) {
                results.push(Self::decode_document(id, document)?);
            }
        }

        Ok(results)
    }

    async fn query_page<E: Entity>(
        &self,
        filter: Option<&Filter>,
        limit: usize,
        cursor: &str,
    ) -> Result<RawPage<E>, StoreError> {
        let after = Self::decode_cursor(E::COLLECTION, cursor)?;
        let start = after
            .checked_add(1)
            .ok_or_else(|| StoreError::InvalidCursor(format!("position {after} is out of range")))?;

        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let collection = match collections.get(E::COLLECTION) {
            Some(c) => c,
            None => {
                return Ok(RawPage {
                    items: Vec::new(),
                    next_token: String::new(),
                })
            }
        };

        let mut items = Vec::new();
        let mut last_seq = after;
        let mut more = false;

        for (seq, id) in collection.order.range(start..) {
            let Some(stored) = collection.documents.get(id) else {
                continue;
            };
            let document: Value = serde_json::from_slice(&stored.bytes)?;
            if !filter.map_or(true, |f| f.matches(&document)) {
                continue;
            }
            if items.len() == limit {
                more = true;
                break;
            }
            items.push(Self::decode_document(id, document)?);
            last_seq = *seq;
        }

        let next_token = if more {
            Self::encode_cursor(E::COLLECTION, last_seq)?
        } else {
            String::new()
        };

        Ok(RawPage { items, next_token })
    }

    async fn delete<E: Entity>(&self, id: &str) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        if let Some(collection) = collections.get_mut(E::COLLECTION) {
            if let Some(stored) = collection.documents.remove(id) {
                collection.order.remove(&stored.seq);
            }
        }

        Ok(())
    }
}
