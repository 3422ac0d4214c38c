//! Repositories - typed CRUD, pagination and soft delete over any [`Store`].
//!
//! ## Example
//!
//! ```ignore
//! use docrepo::{Context, InMemoryStore, Page, RepositoriesExt};
//!
//! let store = InMemoryStore::new();
//! let menus = store.repository::<Menu>();
//! let ctx = Context::background();
//!
//! let id = menus.create(&ctx, &mut menu).await?;
//! menus.soft_delete(&ctx, &id).await?;
//! assert!(menus.get_one(&ctx, &id, true).await.unwrap_err().is_not_found());
//!
//! let mut page = menus.first_page();
//! loop {
//!     page = menus.paginate(&ctx, &page, true).await?;
//!     // use page.items
//!     if !page.has_next() {
//!         break;
//!     }
//! }
//! ```
//!
//! Visibility of a record: nonexistent -> active (`create`) -> inactive
//! (`soft_delete`) -> nonexistent (`delete`). Going back from inactive to
//! active takes an explicit `update` of the `active` field; there is no
//! dedicated restore operation.

mod error;
mod repository;

use async_trait::async_trait;

use crate::config::RepositoryConfig;
use crate::context::Context;
use crate::entity::Entity;
use crate::page::Page;
use crate::store::{FieldMap, Store, StoreError};

pub use error::RepositoryError;
pub use repository::Repository;

/// Result of a bulk create.
///
/// `ids` is order-correspondent to the input. When the store committed some
/// items but reported an error, the call still succeeds: `suppressed` holds
/// that error and the failed positions hold empty ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkCreated {
    pub ids: Vec<String>,
    pub suppressed: Option<StoreError>,
}

impl BulkCreated {
    /// Whether every item was written.
    pub fn is_complete(&self) -> bool {
        self.suppressed.is_none()
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

/// The CRUD + pagination + soft-delete contract for one entity type.
///
/// Every call is scoped by a [`Context`] and fails with a cancellation-kind
/// error if the context ends before the store answers. No call retries.
#[async_trait]
pub trait CrudRepository<E: Entity>: Send + Sync {
    /// Mark `entity` active, write it, and record the store-assigned id on it.
    async fn create(&self, ctx: &Context, entity: &mut E) -> Result<String, RepositoryError>;

    /// Mark every entity active and write them in one bulk request.
    async fn create_all(
        &self,
        ctx: &Context,
        entities: &mut [E],
    ) -> Result<BulkCreated, RepositoryError>;

    /// Patch the named persisted fields. Does not touch `active` unless asked to.
    async fn update(&self, ctx: &Context, id: &str, fields: &FieldMap)
        -> Result<(), RepositoryError>;

    /// Fetch one entity. With `only_active`, an inactive record is not found.
    async fn get_one(&self, ctx: &Context, id: &str, only_active: bool)
        -> Result<E, RepositoryError>;

    /// Fetch the whole collection, or only its active records. No implicit limit.
    async fn get_all(&self, ctx: &Context, only_active: bool) -> Result<Vec<E>, RepositoryError>;

    /// Fetch the page after `prev`, using its limit and token.
    async fn paginate(
        &self,
        ctx: &Context,
        prev: &Page<E>,
        only_active: bool,
    ) -> Result<Page<E>, RepositoryError>;

    /// Physically remove the record. Irreversible.
    async fn delete(&self, ctx: &Context, id: &str) -> Result<(), RepositoryError>;

    /// Set `active = false`, keeping the record.
    async fn soft_delete(&self, ctx: &Context, id: &str) -> Result<(), RepositoryError>;
}

/// Extension trait for typed repository access on any clonable Store.
pub trait RepositoriesExt: Store + Clone + Sized {
    /// Get a typed repository with the default configuration.
    fn repository<E: Entity>(&self) -> Repository<Self, E> {
        Repository::new(self.clone())
    }

    /// Get a typed repository with `config`.
    fn repository_with<E: Entity>(&self, config: RepositoryConfig) -> Repository<Self, E> {
        Repository::with_config(self.clone(), config)
    }
}

impl<S: Store + Clone> RepositoriesExt for S {}
