#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `AppStateBuilder` and the store wired through it.

use std::sync::Arc;

use user_directory_app::adapters::JsonFileStore;
use user_directory_app::AppStateBuilder;
use user_directory_core::environment::{BackendKind, EnvironmentProbe, RuntimeEnvironment};
use user_directory_core::error::CoreError;
use user_directory_core::traits::DocumentStore;
use user_directory_core::types::{UserDocument, UserFormData};

fn ann() -> UserFormData {
    UserFormData {
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        phone: "1234567890".to_string(),
        email: "ann@x.com".to_string(),
    }
}

fn local() -> EnvironmentProbe {
    EnvironmentProbe::Fixed(RuntimeEnvironment::Local)
}

#[tokio::test]
async fn first_read_initializes_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("server").join("db.json");
    let state = AppStateBuilder::new()
        .db_path(&path)
        .environment(local())
        .build();

    assert!(state.user_service.list_users().await.unwrap().is_empty());

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json, serde_json::json!({ "users": [] }));
}

#[tokio::test]
async fn records_survive_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("db.json");

    let created = {
        let state = AppStateBuilder::new()
            .db_path(&path)
            .environment(local())
            .build();
        state.user_service.create_user(ann()).await.unwrap()
    };

    let state = AppStateBuilder::new()
        .db_path(&path)
        .environment(local())
        .build();
    let users = state.user_service.list_users().await.unwrap();
    assert_eq!(users, vec![created]);
}

#[tokio::test]
async fn corrupt_file_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("db.json");
    std::fs::write(&path, "{ not json").unwrap();

    let state = AppStateBuilder::new()
        .db_path(&path)
        .environment(local())
        .build();

    assert!(matches!(
        state.user_service.list_users().await,
        Err(CoreError::StorageFatal(_))
    ));
    assert!(matches!(
        state.user_service.create_user(ann()).await,
        Err(CoreError::StorageFatal(_))
    ));
    // file left as it was
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[tokio::test]
async fn unwritable_path_falls_back_to_memory() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let state = AppStateBuilder::new()
        .db_path(blocker.join("db.json"))
        .environment(local())
        .build();

    let user = state.user_service.create_user(ann()).await.unwrap();

    let volatile = state.ctx.volatile_store().snapshot().await;
    assert_eq!(volatile.users, vec![user.clone()]);
    // reads are served from memory while the file cannot be created
    assert_eq!(state.user_service.list_users().await.unwrap(), vec![user]);
}

#[tokio::test]
async fn ephemeral_environment_skips_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("db.json");
    let state = AppStateBuilder::new()
        .db_path(&path)
        .environment(EnvironmentProbe::Fixed(RuntimeEnvironment::Ephemeral))
        .build();

    assert_eq!(state.ctx.active_backend(), BackendKind::Volatile);
    state.user_service.create_user(ann()).await.unwrap();

    assert!(!path.exists());
    assert_eq!(state.user_service.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn custom_durable_store_is_used() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(tmp.path().join("custom.json")));
    let state = AppStateBuilder::new()
        .durable_store(store.clone())
        .db_path(tmp.path().join("ignored.json"))
        .environment(local())
        .build();

    state.user_service.create_user(ann()).await.unwrap();

    assert_eq!(store.load().await.unwrap().unwrap().users.len(), 1);
    assert!(!tmp.path().join("ignored.json").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_keep_file_whole_and_emails_unique() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("db.json");
    let state = AppStateBuilder::new()
        .db_path(&path)
        .environment(local())
        .build();

    // 24 requests over 8 distinct emails, in mixed case
    let handles: Vec<_> = (0..24)
        .map(|i| {
            let svc = state.user_service.clone();
            let mut form = ann();
            form.email = if i % 3 == 0 {
                format!("USER{}@X.COM", i % 8)
            } else {
                format!("user{}@x.com", i % 8)
            };
            tokio::spawn(async move { svc.create_user(form).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(matches!(e, CoreError::DuplicateEmail(_)), "{e}"),
        }
    }
    assert_eq!(created, 8);

    let raw = std::fs::read_to_string(&path).unwrap();
    let stored: UserDocument = serde_json::from_str(&raw).unwrap();
    let mut emails: Vec<_> = stored.users.iter().map(|u| u.email.to_lowercase()).collect();
    emails.sort();
    emails.dedup();
    assert_eq!(emails.len(), 8);
    assert_eq!(stored.users.len(), 8);

    assert!(state.ctx.volatile_store().snapshot().await.users.is_empty());
}
