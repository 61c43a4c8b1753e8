//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::environment::{EnvironmentProbe, RuntimeEnvironment};
use crate::error::{CoreError, CoreResult};
use crate::services::{StoreContext, UserService};
use crate::traits::{DocumentStore, VolatileStore};
use crate::types::{User, UserDocument, UserFormData};

// ===== MockDocumentStore =====

/// Durable store stand-in: starts with nothing stored.
pub struct MockDocumentStore {
    document: RwLock<Option<UserDocument>>,
    /// 如果 Some，load 时返回此错误
    load_error: RwLock<Option<String>>,
    /// 如果 Some，save 时返回此错误（用于测试 fallback 路径）
    save_error: RwLock<Option<String>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self {
            document: RwLock::new(None),
            load_error: RwLock::new(None),
            save_error: RwLock::new(None),
            loads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
        }
    }

    pub async fn set_load_error(&self, err: Option<String>) {
        *self.load_error.write().await = err;
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub async fn stored(&self) -> Option<UserDocument> {
        self.document.read().await.clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Successful saves only.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn load(&self) -> CoreResult<Option<UserDocument>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(ref msg) = *self.load_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &UserDocument) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        *self.document.write().await = Some(document.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ===== Factories =====

pub fn sample_user(id: &str, email: &str) -> User {
    User::from_form(id.to_string(), form("Ann", "Lee", email))
}

pub fn form(first_name: &str, last_name: &str, email: &str) -> UserFormData {
    UserFormData {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone: "1234567890".to_string(),
        email: email.to_string(),
    }
}

/// `UserService` over a mock durable store in the given environment.
pub fn create_test_user_service(
    env: RuntimeEnvironment,
) -> (UserService, Arc<MockDocumentStore>, Arc<VolatileStore>) {
    let durable = Arc::new(MockDocumentStore::new());
    let volatile = Arc::new(VolatileStore::new());
    let ctx = Arc::new(StoreContext::new(
        durable.clone(),
        volatile.clone(),
        EnvironmentProbe::Fixed(env),
    ));
    (UserService::new(ctx), durable, volatile)
}
