//! User Directory Core Library
//!
//! Provides the record store behind the user directory, including:
//! - User records and the persisted document shape
//! - Field constraint table and validation
//! - Durable / volatile backend selection with write fallback
//! - The user service (list, get, create, update, delete)
//!
//! This library is platform-independent: the durable backend is abstracted
//! through the `DocumentStore` trait and injected by the application layer.

pub mod environment;
pub mod error;
pub mod schema;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use environment::{BackendKind, EnvironmentProbe, RuntimeEnvironment};
pub use error::{CoreError, CoreResult};
pub use services::{StoreContext, UserService};
pub use traits::{DocumentStore, VolatileStore};
