//! JSON file document store
//!
//! Durable backend: the whole collection lives in one pretty-printed JSON
//! document `{ "users": [...] }` at a fixed path.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use user_directory_core::error::{CoreError, CoreResult};
use user_directory_core::traits::DocumentStore;
use user_directory_core::types::UserDocument;

const DEFAULT_DIR: &str = "server";
const DEFAULT_FILE_NAME: &str = "db.json";
const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Document store backed by a JSON file on local disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        log::debug!("JSON file store path: {}", path.display());
        Self { path }
    }

    /// `server/db.json` under the current working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_DIR)
            .join(DEFAULT_FILE_NAME)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the store file, unique per save.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "json-file"
    }

    async fn load(&self) -> CoreResult<Option<UserDocument>> {
        let metadata = match fs::metadata(&self.path).await {
            Ok(m) => m,
            // a missing parent directory also means nothing is stored yet
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                log::debug!("Store file does not exist: {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read store file metadata: {e}"
                )))
            }
        };

        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Store file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_STORE_FILE_SIZE
            )));
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read store file: {e}")))?;

        let document: UserDocument = serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid store format: {e}")))?;

        Ok(Some(document))
    }

    async fn save(&self, document: &UserDocument) -> CoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        // readers only ever observe a complete file
        let tmp = self.temp_path();
        let written = match fs::write(&tmp, content).await {
            Ok(()) => fs::rename(&tmp, &self.path)
                .await
                .map_err(|e| CoreError::StorageError(format!("Failed to replace store file: {e}"))),
            Err(e) => Err(CoreError::StorageError(format!(
                "Failed to write store file: {e}"
            ))),
        };
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    log::warn!("Failed to remove {}: {cleanup}", tmp.display());
                }
            }
            return Err(e);
        }

        log::debug!(
            "Saved {} user(s) to {}",
            document.users.len(),
            self.path.display()
        );
        Ok(())
    }
}
