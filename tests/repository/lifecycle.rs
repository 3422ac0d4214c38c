//! Single-entity operations: create, update, get, soft and hard delete.

use docrepo::{
    Context, CrudRepository, FieldMap, InMemoryStore, RepositoriesExt, RepositoryError,
    StoreError,
};
use serde_json::json;

use crate::menu::{Customer, Menu};
use crate::menus;
use crate::support::DownStore;

#[tokio::test]
async fn create_assigns_id_and_marks_active() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let mut menu = Menu::new("noodles", 350);
    menu.base.set_active(false);

    let id = repo.create(&ctx, &mut menu).await.unwrap();
    assert!(!id.is_empty());
    assert_eq!(menu.base.id(), id);
    assert!(menu.base.is_active());

    let loaded = repo.get_one(&ctx, &id, false).await.unwrap();
    assert!(loaded.base.is_active());
    assert_eq!(loaded.name, "noodles");
    assert_eq!(loaded.price, 350);
}

#[tokio::test]
async fn create_persists_active_but_not_id() {
    let (store, repo) = menus();
    let ctx = Context::background();

    let id = repo.create(&ctx, &mut Menu::new("rice", 100)).await.unwrap();

    let raw = store.raw_document::<Menu>(&id).unwrap().unwrap();
    assert_eq!(raw, json!({ "active": true, "name": "rice", "price": 100 }));
}

#[tokio::test]
async fn create_sets_explicit_active_field() {
    let store = InMemoryStore::new();
    let repo = store.repository::<Customer>();
    let ctx = Context::background();

    let mut customer = Customer::new("a@example.com");
    assert!(!customer.enabled);

    let id = repo.create(&ctx, &mut customer).await.unwrap();
    assert_eq!(customer.key, id);

    let loaded = repo.get_one(&ctx, &id, true).await.unwrap();
    assert!(loaded.enabled);
    assert_eq!(loaded.email, "a@example.com");
}

#[tokio::test]
async fn create_twice_with_same_entity_is_rejected() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let mut menu = Menu::new("soup", 200);
    let id = repo.create(&ctx, &mut menu).await.unwrap();

    let err = repo.create(&ctx, &mut menu).await.unwrap_err();
    assert_eq!(
        err,
        RepositoryError::Store {
            op: "repository.create",
            source: StoreError::IdAlreadyAssigned(id),
        }
    );
}

#[tokio::test]
async fn update_patches_only_named_fields() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let id = repo.create(&ctx, &mut Menu::new("tea", 100)).await.unwrap();

    let mut fields = FieldMap::new();
    fields.insert("price".into(), json!(3131));
    repo.update(&ctx, &id, &fields).await.unwrap();

    let loaded = repo.get_one(&ctx, &id, true).await.unwrap();
    assert_eq!(loaded.price, 3131);
    assert_eq!(loaded.name, "tea");
    assert!(loaded.base.is_active());
}

#[tokio::test]
async fn update_can_restore_a_soft_deleted_record() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let id = repo.create(&ctx, &mut Menu::new("cake", 900)).await.unwrap();
    repo.soft_delete(&ctx, &id).await.unwrap();
    assert!(repo.get_one(&ctx, &id, true).await.unwrap_err().is_not_found());

    let mut fields = FieldMap::new();
    fields.insert(docrepo::ACTIVE_FIELD.into(), json!(true));
    repo.update(&ctx, &id, &fields).await.unwrap();

    let loaded = repo.get_one(&ctx, &id, true).await.unwrap();
    assert!(loaded.base.is_active());
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let mut fields = FieldMap::new();
    fields.insert("price".into(), json!(1));
    let err = repo.update(&ctx, "missing", &fields).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.op(), "repository.update");
}

#[tokio::test]
async fn get_one_missing_is_not_found_for_both_modes() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    for only_active in [true, false] {
        let err = repo.get_one(&ctx, "missing", only_active).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

#[tokio::test]
async fn soft_delete_keeps_record_in_store() {
    let (store, repo) = menus();
    let ctx = Context::background();

    let id = repo.create(&ctx, &mut Menu::new("bread", 50)).await.unwrap();
    repo.soft_delete(&ctx, &id).await.unwrap();

    assert_eq!(store.count::<Menu>().unwrap(), 1);
    let raw = store.raw_document::<Menu>(&id).unwrap().unwrap();
    assert_eq!(raw["active"], json!(false));
    assert_eq!(raw["name"], json!("bread"));
}

#[tokio::test]
async fn soft_delete_missing_record_is_not_found() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let err = repo.soft_delete(&ctx, "missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.op(), "repository.soft_delete");
}

#[tokio::test]
async fn delete_removes_record_for_every_read_mode() {
    let (store, repo) = menus();
    let ctx = Context::background();

    let id = repo.create(&ctx, &mut Menu::new("pie", 400)).await.unwrap();
    repo.delete(&ctx, &id).await.unwrap();

    assert_eq!(store.count::<Menu>().unwrap(), 0);
    assert!(repo.get_one(&ctx, &id, true).await.unwrap_err().is_not_found());
    assert!(repo.get_one(&ctx, &id, false).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn delete_after_soft_delete_removes_record() {
    let (store, repo) = menus();
    let ctx = Context::background();

    let id = repo.create(&ctx, &mut Menu::new("jam", 10)).await.unwrap();
    repo.soft_delete(&ctx, &id).await.unwrap();
    repo.delete(&ctx, &id).await.unwrap();

    assert_eq!(store.count::<Menu>().unwrap(), 0);
    assert!(repo.get_one(&ctx, &id, false).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn get_all_active_is_subset_of_all() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    let mut ids = Vec::new();
    for n in 0..5 {
        ids.push(
            repo.create(&ctx, &mut Menu::new(&format!("dish {n}"), n))
                .await
                .unwrap(),
        );
    }
    repo.soft_delete(&ctx, &ids[1]).await.unwrap();
    repo.soft_delete(&ctx, &ids[3]).await.unwrap();

    let all = repo.get_all(&ctx, false).await.unwrap();
    let active = repo.get_all(&ctx, true).await.unwrap();

    assert_eq!(all.len(), 5);
    assert_eq!(active.len(), 3);
    assert!(active.iter().all(|m| m.base.is_active()));
    assert!(active.iter().all(|m| all.contains(m)));

    let active_ids: Vec<&str> = active.iter().map(|m| m.base.id()).collect();
    assert_eq!(active_ids, vec![ids[0].as_str(), ids[2].as_str(), ids[4].as_str()]);
}

#[tokio::test]
async fn get_all_on_empty_collection_is_empty() {
    let (_store, repo) = menus();
    let ctx = Context::background();

    assert!(repo.get_all(&ctx, false).await.unwrap().is_empty());
    assert!(repo.get_all(&ctx, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn adapter_failures_are_tagged_with_operation() {
    let repo = DownStore.repository::<Menu>();
    let ctx = Context::background();
    let down = StoreError::Storage("backend unavailable".into());

    let err = repo.create(&ctx, &mut Menu::new("x", 1)).await.unwrap_err();
    assert_eq!(
        err,
        RepositoryError::Store {
            op: "repository.create",
            source: down.clone(),
        }
    );

    let err = repo.get_one(&ctx, "id", false).await.unwrap_err();
    assert_eq!(err.op(), "repository.get_one");

    let err = repo.get_all(&ctx, true).await.unwrap_err();
    assert_eq!(err.op(), "repository.get_all");

    let err = repo.update(&ctx, "id", &FieldMap::new()).await.unwrap_err();
    assert_eq!(err.op(), "repository.update");

    let err = repo.soft_delete(&ctx, "id").await.unwrap_err();
    assert_eq!(err.op(), "repository.soft_delete");

    let err = repo.delete(&ctx, "id").await.unwrap_err();
    assert_eq!(
        err,
        RepositoryError::Store {
            op: "repository.delete",
            source: down,
        }
    );
}
