//! Repository - the store-agnostic implementation of `CrudRepository`.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{BulkCreated, CrudRepository, RepositoryError};
use crate::config::RepositoryConfig;
use crate::context::Context;
use crate::entity::{Entity, ACTIVE_FIELD};
use crate::page::Page;
use crate::store::{FieldMap, Filter, Store, StoreError};

const OP_CREATE: &str = "repository.create";
const OP_CREATE_ALL: &str = "repository.create_all";
const OP_UPDATE: &str = "repository.update";
const OP_GET_ONE: &str = "repository.get_one";
const OP_GET_ALL: &str = "repository.get_all";
const OP_PAGINATE: &str = "repository.paginate";
const OP_DELETE: &str = "repository.delete";
const OP_SOFT_DELETE: &str = "repository.soft_delete";

/// Typed repository over store `S` for entity type `E`.
///
/// Stateless apart from its store handle and configuration, so a single
/// instance can serve concurrent callers.
#[derive(Clone)]
pub struct Repository<S, E> {
    store: S,
    config: RepositoryConfig,
    _marker: PhantomData<E>,
}

impl<S: Store, E: Entity> Repository<S, E> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    pub fn with_config(store: S, config: RepositoryConfig) -> Self {
        Self {
            store,
            config,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn collection(&self) -> &'static str {
        E::COLLECTION
    }

    /// A request page to start paginating with the configured default limit.
    pub fn first_page(&self) -> Page<E> {
        Page::first(self.config.default_page_limit)
    }

    fn active_filter(only_active: bool) -> Option<Filter> {
        only_active.then(Filter::active)
    }

    /// Run one store call under `ctx`, tagging failures with `op`.
    async fn call<T, F>(&self, ctx: &Context, op: &'static str, fut: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        match ctx.run(fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(RepositoryError::from_store(op, err)),
            Err(reason) => {
                warn!(op = op, collection = E::COLLECTION, ?reason, "store call interrupted");
                Err(RepositoryError::interrupted(op, reason))
            }
        }
    }
}

#[async_trait]
impl<S, E> CrudRepository<E> for Repository<S, E>
where
    S: Store,
    E: Entity,
{
    async fn create(&self, ctx: &Context, entity: &mut E) -> Result<String, RepositoryError> {
        entity.set_active(true);

        let id = self.call(ctx, OP_CREATE, self.store.put(&*entity)).await?;
        entity.set_id(id.clone());

        debug!(op = OP_CREATE, collection = E::COLLECTION, id = %id, "created");
        Ok(id)
    }

    async fn create_all(
        &self,
        ctx: &Context,
        entities: &mut [E],
    ) -> Result<BulkCreated, RepositoryError> {
        for entity in entities.iter_mut() {
            entity.set_active(true);
        }

        let outcome = match ctx.run(self.store.bulk_put(&*entities)).await {
            Ok(outcome) => outcome,
            Err(reason) => {
                warn!(op = OP_CREATE_ALL, collection = E::COLLECTION, ?reason, "store call interrupted");
                return Err(RepositoryError::interrupted(OP_CREATE_ALL, reason));
            }
        };

        let any_written = outcome.ids.iter().any(|id| !id.is_empty());
        if let Some(err) = &outcome.error {
            if !any_written {
                return Err(RepositoryError::from_store(OP_CREATE_ALL, err.clone()));
            }
            if self.config.log_partial_failures {
                warn!(
                    op = OP_CREATE_ALL,
                    collection = E::COLLECTION,
                    error = %err,
                    "bulk create partially failed"
                );
            }
        }

        for (entity, id) in entities.iter_mut().zip(&outcome.ids) {
            if !id.is_empty() {
                entity.set_id(id.clone());
            }
        }

        debug!(
            op = OP_CREATE_ALL,
            collection = E::COLLECTION,
            requested = entities.len(),
            created = outcome.ids.iter().filter(|id| !id.is_empty()).count(),
            "bulk created"
        );

        Ok(BulkCreated {
            ids: outcome.ids,
            suppressed: outcome.error,
        })
    }

    async fn update(
        &self,
        ctx: &Context,
        id: &str,
        fields: &FieldMap,
    ) -> Result<(), RepositoryError> {
        self.call(ctx, OP_UPDATE, self.store.patch::<E>(id, fields))
            .await?;

        debug!(op = OP_UPDATE, collection = E::COLLECTION, id = %id, fields = fields.len(), "updated");
        Ok(())
    }

    async fn get_one(
        &self,
        ctx: &Context,
        id: &str,
        only_active: bool,
    ) -> Result<E, RepositoryError> {
        let entity: E = self
            .call(ctx, OP_GET_ONE, self.store.get_by_id::<E>(id))
            .await?;

        if only_active && !entity.is_active() {
            debug!(op = OP_GET_ONE, collection = E::COLLECTION, id = %id, "inactive record hidden");
            return Err(RepositoryError::NotFound {
                op: OP_GET_ONE,
                collection: E::COLLECTION.to_string(),
                id: id.to_string(),
            });
        }

        Ok(entity)
    }

    async fn get_all(&self, ctx: &Context, only_active: bool) -> Result<Vec<E>, RepositoryError> {
        let filter = Self::active_filter(only_active);
        let entities = self
            .call(ctx, OP_GET_ALL, self.store.query::<E>(filter.as_ref()))
            .await?;

        debug!(
            op = OP_GET_ALL,
            collection = E::COLLECTION,
            only_active,
            count = entities.len(),
            "listed"
        );
        Ok(entities)
    }

    async fn paginate(
        &self,
        ctx: &Context,
        prev: &Page<E>,
        only_active: bool,
    ) -> Result<Page<E>, RepositoryError> {
        if prev.limit == 0 || prev.limit > self.config.max_page_limit {
            return Err(RepositoryError::InvalidArgument {
                op: OP_PAGINATE,
                message: format!(
                    "page limit must be between 1 and {}, got {}",
                    self.config.max_page_limit, prev.limit
                ),
            });
        }

        let filter = Self::active_filter(only_active);
        let raw = self
            .call(
                ctx,
                OP_PAGINATE,
                self.store
                    .query_page::<E>(filter.as_ref(), prev.limit, &prev.next_token),
            )
            .await?;

        debug!(
            op = OP_PAGINATE,
            collection = E::COLLECTION,
            only_active,
            count = raw.items.len(),
            last = raw.next_token.is_empty(),
            "paginated"
        );

        Ok(Page {
            items: raw.items,
            next_token: raw.next_token,
            limit: prev.limit,
        })
    }

    async fn delete(&self, ctx: &Context, id: &str) -> Result<(), RepositoryError> {
        self.call(ctx, OP_DELETE, self.store.delete::<E>(id)).await?;

        debug!(op = OP_DELETE, collection = E::COLLECTION, id = %id, "deleted");
        Ok(())
    }

    async fn soft_delete(&self, ctx: &Context, id: &str) -> Result<(), RepositoryError> {
        let mut fields = FieldMap::new();
        fields.insert(ACTIVE_FIELD.to_string(), Value::Bool(false));

        self.call(ctx, OP_SOFT_DELETE, self.store.patch::<E>(id, &fields))
            .await?;

        debug!(op = OP_SOFT_DELETE, collection = E::COLLECTION, id = %id, "soft deleted");
        Ok(())
    }
}
