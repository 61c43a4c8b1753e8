//! Document persistence abstract Trait

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::UserDocument;

/// Whole-document persistence backend
///
/// Platform implementation:
/// - Local disk: `JsonFileStore` (user-directory-app)
/// - Process memory: `VolatileStore`
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Read the stored document
    ///
    /// Returns `Ok(None)` when nothing has been stored yet (e.g. the file does not exist).
    async fn load(&self) -> CoreResult<Option<UserDocument>>;

    /// Replace the stored document
    ///
    /// # Arguments
    /// * `document` - The full collection to persist
    async fn save(&self, document: &UserDocument) -> CoreResult<()>;
}

/// In-memory document store
///
/// Always holds a document (initially empty), so `load` never returns `None`.
/// Serves as the direct backend in ephemeral environments and as the fallback
/// target when a durable write fails.
#[derive(Clone, Default)]
pub struct VolatileStore {
    document: Arc<RwLock<UserDocument>>,
}

impl VolatileStore {
    /// Create an empty volatile store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current document
    pub async fn snapshot(&self) -> UserDocument {
        self.document.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for VolatileStore {
    fn name(&self) -> &'static str {
        "volatile"
    }

    async fn load(&self) -> CoreResult<Option<UserDocument>> {
        Ok(Some(self.document.read().await.clone()))
    }

    async fn save(&self, document: &UserDocument) -> CoreResult<()> {
        *self.document.write().await = document.clone();
        Ok(())
    }
}
