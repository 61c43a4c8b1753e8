//! Storage layer abstraction trait definition

mod document_store;

pub use document_store::{DocumentStore, VolatileStore};
