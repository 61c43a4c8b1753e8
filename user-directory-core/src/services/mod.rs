//! 业务逻辑服务层

mod user_service;

pub use user_service::UserService;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::environment::{select_backend, BackendKind, EnvironmentProbe};
use crate::error::{CoreError, CoreResult};
use crate::traits::{DocumentStore, VolatileStore};
use crate::types::UserDocument;

/// 存储上下文 - 持有两个后端
///
/// 平台层在启动时创建一次此上下文，并注入持久化存储实现。
/// The volatile store lives exactly as long as this context.
pub struct StoreContext {
    /// 持久化存储（文件）
    durable_store: Arc<dyn DocumentStore>,
    /// 内存存储
    volatile_store: Arc<VolatileStore>,
    /// 运行环境探测
    environment: EnvironmentProbe,
    /// 串行化读-改-写
    write_lock: Mutex<()>,
    /// 串行化空文档初始化
    init_lock: Mutex<()>,
}

impl StoreContext {
    /// 创建存储上下文
    #[must_use]
    pub fn new(
        durable_store: Arc<dyn DocumentStore>,
        volatile_store: Arc<VolatileStore>,
        environment: EnvironmentProbe,
    ) -> Self {
        Self {
            durable_store,
            volatile_store,
            environment,
            write_lock: Mutex::new(()),
            init_lock: Mutex::new(()),
        }
    }

    /// Hold this across a read-modify-write so overlapping mutations
    /// apply one after another instead of overwriting each other.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    #[must_use]
    pub fn durable_store(&self) -> &Arc<dyn DocumentStore> {
        &self.durable_store
    }

    #[must_use]
    pub fn volatile_store(&self) -> &Arc<VolatileStore> {
        &self.volatile_store
    }

    /// Backend chosen for the environment as it is right now.
    #[must_use]
    pub fn active_backend(&self) -> BackendKind {
        select_backend(self.environment.current())
    }

    /// 读取完整文档
    ///
    /// Durable read failures other than "nothing stored yet" are fatal.
    /// A missing document is initialised empty and persisted first; if that
    /// persist fails the read is served from the volatile store.
    pub async fn read_document(&self) -> CoreResult<UserDocument> {
        match self.active_backend() {
            BackendKind::Volatile => self.read_volatile().await,
            BackendKind::Durable => match self.durable_store.load().await {
                Ok(Some(document)) => Ok(document),
                Ok(None) => self.initialize_durable().await,
                Err(e) => Err(self.fatal_read(e)),
            },
        }
    }

    /// 写入完整文档
    ///
    /// A failed durable write lands in the volatile store instead; the caller
    /// only sees an error if the volatile write fails too.
    pub async fn write_document(&self, document: &UserDocument) -> CoreResult<()> {
        match self.active_backend() {
            BackendKind::Volatile => self.volatile_store.save(document).await,
            BackendKind::Durable => {
                if let Err(e) = self.durable_store.save(document).await {
                    log::warn!(
                        "Failed to write {} store, falling back to volatile store: {e}",
                        self.durable_store.name()
                    );
                    return self.volatile_store.save(document).await;
                }
                Ok(())
            }
        }
    }

    /// Create the empty durable document, unless a concurrent caller got
    /// there first.
    async fn initialize_durable(&self) -> CoreResult<UserDocument> {
        let _guard = self.init_lock.lock().await;
        match self.durable_store.load().await {
            Ok(Some(document)) => return Ok(document),
            Ok(None) => {}
            Err(e) => return Err(self.fatal_read(e)),
        }

        log::info!(
            "No {} document found, initializing empty collection",
            self.durable_store.name()
        );
        let document = UserDocument::default();
        if let Err(e) = self.durable_store.save(&document).await {
            log::warn!(
                "Failed to initialize {} store, falling back to volatile store: {e}",
                self.durable_store.name()
            );
            return self.read_volatile().await;
        }
        Ok(document)
    }

    fn fatal_read(&self, e: CoreError) -> CoreError {
        let e = e.into_fatal();
        log::error!("Failed to read {} store: {e}", self.durable_store.name());
        e
    }

    async fn read_volatile(&self) -> CoreResult<UserDocument> {
        Ok(self.volatile_store.load().await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::RuntimeEnvironment;
    use crate::test_utils::{sample_user, MockDocumentStore};

    fn context(durable: &Arc<MockDocumentStore>, env: RuntimeEnvironment) -> StoreContext {
        StoreContext::new(
            durable.clone(),
            Arc::new(VolatileStore::new()),
            EnvironmentProbe::Fixed(env),
        )
    }

    #[tokio::test]
    async fn missing_document_is_initialized() {
        let durable = Arc::new(MockDocumentStore::new());
        let ctx = context(&durable, RuntimeEnvironment::Local);

        let doc = ctx.read_document().await.unwrap();
        assert!(doc.users.is_empty());
        assert_eq!(durable.stored().await, Some(UserDocument::default()));
        assert_eq!(durable.save_count(), 1);
    }

    #[tokio::test]
    async fn unreadable_document_is_fatal() {
        let durable = Arc::new(MockDocumentStore::new());
        durable.set_load_error(Some("permission denied".to_string())).await;
        let ctx = context(&durable, RuntimeEnvironment::Local);

        let err = ctx.read_document().await.unwrap_err();
        assert!(matches!(err, CoreError::StorageFatal(msg) if msg == "permission denied"));
    }

    #[tokio::test]
    async fn failed_initialization_reads_volatile() {
        let durable = Arc::new(MockDocumentStore::new());
        durable.set_save_error(Some("read-only filesystem".to_string())).await;
        let ctx = context(&durable, RuntimeEnvironment::Local);

        let seeded = UserDocument {
            users: vec![sample_user("u1", "ann@x.com")],
        };
        ctx.volatile_store().save(&seeded).await.unwrap();

        assert_eq!(ctx.read_document().await.unwrap(), seeded);
    }

    #[tokio::test]
    async fn failed_write_lands_in_volatile() {
        let durable = Arc::new(MockDocumentStore::new());
        durable.set_save_error(Some("disk full".to_string())).await;
        let ctx = context(&durable, RuntimeEnvironment::Local);

        let doc = UserDocument {
            users: vec![sample_user("u1", "ann@x.com")],
        };
        ctx.write_document(&doc).await.unwrap();

        assert_eq!(durable.stored().await, None);
        assert_eq!(ctx.volatile_store().snapshot().await, doc);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_reads_initialize_once() {
        let durable = Arc::new(MockDocumentStore::new());
        let ctx = Arc::new(context(&durable, RuntimeEnvironment::Local));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                tokio::spawn(async move { ctx.read_document().await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().unwrap().users.is_empty());
        }

        assert_eq!(durable.save_count(), 1);
    }

    #[tokio::test]
    async fn ephemeral_never_touches_durable() {
        let durable = Arc::new(MockDocumentStore::new());
        durable.set_load_error(Some("must not be read".to_string())).await;
        let ctx = context(&durable, RuntimeEnvironment::Ephemeral);

        let doc = UserDocument {
            users: vec![sample_user("u1", "ann@x.com")],
        };
        ctx.write_document(&doc).await.unwrap();
        assert_eq!(ctx.read_document().await.unwrap(), doc);

        assert_eq!(durable.load_count(), 0);
        assert_eq!(durable.save_count(), 0);
    }
}
