//! Bulk create: ordering, soft success and hard failure.

use docrepo::{Context, CrudRepository, RepositoriesExt, RepositoryConfig, RepositoryError, StoreError};

use crate::menu::Menu;
use crate::menus;
use crate::support::DownStore;

#[tokio::test]
async fn create_all_returns_ids_in_input_order() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let mut batch = vec![Menu::new("all in 1", 1), Menu::new("all in 2", 2)];
    let created = repo.create_all(&ctx, &mut batch).await.unwrap();

    assert!(created.is_complete());
    assert_eq!(created.ids.len(), 2);
    assert_eq!(batch[0].base.id(), created.ids[0]);
    assert_eq!(batch[1].base.id(), created.ids[1]);

    let first = repo.get_one(&ctx, &created.ids[0], true).await.unwrap();
    let second = repo.get_one(&ctx, &created.ids[1], true).await.unwrap();
    assert_eq!(first.name, "all in 1");
    assert_eq!(second.name, "all in 2");
    assert!(first.base.is_active());
    assert!(second.base.is_active());
}

#[tokio::test]
async fn create_all_marks_every_entity_active() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let mut batch = vec![Menu::new("a", 1), Menu::new("b", 2)];
    for menu in batch.iter_mut() {
        menu.base.set_active(false);
    }

    repo.create_all(&ctx, &mut batch).await.unwrap();

    assert!(batch.iter().all(|m| m.base.is_active()));
    assert_eq!(repo.get_all(&ctx, true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn partial_failure_is_a_soft_success() {
    let (store, repo) = menus();
    let ctx = Context::background();

    let mut already_stored = Menu::new("old", 1);
    repo.create(&ctx, &mut already_stored).await.unwrap();

    let mut batch = vec![Menu::new("new 1", 2), already_stored, Menu::new("new 2", 3)];
    let created = repo.create_all(&ctx, &mut batch).await.unwrap();

    assert!(!created.is_complete());
    assert!(matches!(
        created.suppressed,
        Some(StoreError::Partial { failed: 1, total: 3, .. })
    ));
    assert_eq!(created.ids.len(), 3);
    assert!(!created.ids[0].is_empty());
    assert!(created.ids[1].is_empty());
    assert!(!created.ids[2].is_empty());

    assert_eq!(batch[0].base.id(), created.ids[0]);
    assert_eq!(batch[2].base.id(), created.ids[2]);
    assert_eq!(store.count::<Menu>().unwrap(), 3);
}

#[tokio::test]
async fn partial_failure_is_still_returned_when_logging_disabled() {
    let store = docrepo::InMemoryStore::new();
    let repo = store
        .repository_with::<Menu>(RepositoryConfig::default().with_log_partial_failures(false));
    let ctx = Context::background();

    let mut stored = Menu::new("old", 1);
    repo.create(&ctx, &mut stored).await.unwrap();

    let mut batch = vec![stored, Menu::new("new", 2)];
    let created = repo.create_all(&ctx, &mut batch).await.unwrap();
    assert!(created.suppressed.is_some());
    assert_eq!(created.into_ids().len(), 2);
}

#[tokio::test]
async fn total_failure_is_a_hard_error() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let mut stored = Menu::new("old", 1);
    repo.create(&ctx, &mut stored).await.unwrap();

    let mut batch = vec![stored];
    let err = repo.create_all(&ctx, &mut batch).await.unwrap_err();
    assert_eq!(err.op(), "repository.create_all");
    assert!(matches!(
        err,
        RepositoryError::Store {
            source: StoreError::Partial { failed: 1, total: 1, .. },
            ..
        }
    ));
}

#[tokio::test]
async fn adapter_failure_without_ids_is_a_hard_error() {
    let repo = DownStore.repository::<Menu>();
    let ctx = Context::background();

    let mut batch = vec![Menu::new("a", 1), Menu::new("b", 2)];
    let err = repo.create_all(&ctx, &mut batch).await.unwrap_err();
    assert_eq!(
        err,
        RepositoryError::Store {
            op: "repository.create_all",
            source: StoreError::Storage("backend unavailable".into()),
        }
    );
    assert!(batch.iter().all(|m| m.base.id().is_empty()));
}

#[tokio::test]
async fn empty_batch_creates_nothing() {
    let (store, repo) = menus();
    let ctx = Context::background();

    let created = repo.create_all(&ctx, &mut Vec::<Menu>::new()).await.unwrap();
    assert!(created.ids.is_empty());
    assert!(created.is_complete());
    assert_eq!(store.count::<Menu>().unwrap(), 0);
}
