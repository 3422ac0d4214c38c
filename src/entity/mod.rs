//! Entities - the capability set every stored document type satisfies.
//!
//! An entity has a store-assigned identifier, an `active` soft-delete flag,
//! and a collection name that is constant per concrete type.
//!
//! ## Example
//!
//! ```ignore
//! use docrepo::{Entity, EntityBase};
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize, Entity)]
//! #[entity(collection = "menus")]
//! struct Menu {
//!     #[serde(flatten)]
//!     #[entity(base)]
//!     pub base: EntityBase,
//!     pub name: String,
//! }
//! ```

mod base;

use serde::{de::DeserializeOwned, Serialize};

pub use base::EntityBase;

/// Persisted name of the soft-delete flag. Every entity document carries it.
pub const ACTIVE_FIELD: &str = "active";

/// Trait for types that can be stored through a [`Repository`](crate::Repository).
///
/// The identifier must not be part of the serialized body: the store assigns
/// and tracks it. Mark it `#[serde(skip)]` (or embed an [`EntityBase`]).
/// The active flag must serialize under [`ACTIVE_FIELD`].
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection name for this entity type (e.g., "menus", "customers").
    /// Maps to a collection in Firestore/MongoDB, a table in SQL, a key prefix in KV stores.
    const COLLECTION: &'static str;

    /// Returns the store-assigned identifier. Empty before creation.
    fn id(&self) -> &str;

    /// Sets the identifier. Called by the repository once the store assigned one.
    fn set_id(&mut self, id: String);

    /// Returns whether the entity is visible to active-only reads.
    fn is_active(&self) -> bool;

    /// Sets the soft-delete flag.
    fn set_active(&mut self, active: bool);

    /// Returns whether the store has assigned an identifier yet.
    fn has_id(&self) -> bool {
        !self.id().is_empty()
    }
}
