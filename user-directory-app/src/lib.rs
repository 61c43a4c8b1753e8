//! Platform-agnostic application bootstrap for the user directory.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter
//! injection). Building the state is the one explicit initialisation point of
//! the process-wide store context, including the volatile store's lifetime.

pub mod adapters;

use std::path::PathBuf;
use std::sync::Arc;

use user_directory_core::environment::EnvironmentProbe;
use user_directory_core::services::{StoreContext, UserService};
use user_directory_core::traits::{DocumentStore, VolatileStore};

use adapters::JsonFileStore;

/// Platform-agnostic application state.
///
/// Holds the `StoreContext` and the services built on it. Every frontend
/// constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Store context (holds both backends)
    pub ctx: Arc<StoreContext>,
    /// User service
    pub user_service: Arc<UserService>,
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Optional
/// - `durable_store` — defaults to `JsonFileStore` at `db_path` (or `server/db.json`)
/// - `environment` — defaults to `EnvironmentProbe::Detect`
pub struct AppStateBuilder {
    durable_store: Option<Arc<dyn DocumentStore>>,
    db_path: Option<PathBuf>,
    environment: EnvironmentProbe,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            durable_store: None,
            db_path: None,
            environment: EnvironmentProbe::Detect,
        }
    }

    #[must_use]
    pub fn durable_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.durable_store = Some(store);
        self
    }

    /// Path of the JSON document; ignored when `durable_store` is set.
    #[must_use]
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn environment(mut self, probe: EnvironmentProbe) -> Self {
        self.environment = probe;
        self
    }

    /// Build the `AppState`.
    pub fn build(self) -> AppState {
        let durable_store = self.durable_store.unwrap_or_else(|| {
            let path = self.db_path.unwrap_or_else(JsonFileStore::default_path);
            Arc::new(JsonFileStore::new(path)) as Arc<dyn DocumentStore>
        });

        log::info!(
            "Store initialized: durable backend '{}', environment {:?}",
            durable_store.name(),
            self.environment
        );

        let ctx = Arc::new(StoreContext::new(
            durable_store,
            Arc::new(VolatileStore::new()),
            self.environment,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&ctx)));

        AppState { ctx, user_service }
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
