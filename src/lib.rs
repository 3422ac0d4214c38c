// The Entity derive expands to `docrepo::Entity`; let that path resolve inside this crate too.
extern crate self as docrepo;

pub mod config;
pub mod context;
mod entity;
pub mod logging;
mod page;
mod repository;
pub mod store;

pub use config::{ConfigError, RepositoryConfig};
pub use context::{Context, Interrupted};
pub use entity::{Entity, EntityBase, ACTIVE_FIELD};
pub use page::Page;
pub use repository::{BulkCreated, CrudRepository, RepositoriesExt, Repository, RepositoryError};
pub use store::{BulkPut, FieldMap, Filter, InMemoryStore, RawPage, Store, StoreError};

// Re-export the derive; it shares the trait's name like serde's derives do.
pub use docrepo_macros::Entity;

// Re-export so adapters and callers can share the cancellation token type.
pub use tokio_util::sync::CancellationToken;
