//! # stockchat Core
//!
//! Domain types, traits, and error definitions for the stockchat inventory
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod intent;
pub mod item;
pub mod provider;
pub mod schema;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, RetrievalError, StoreError};
pub use intent::{ActionParams, Intent};
pub use item::{InventoryStore, ItemRecord, NewItem};
pub use provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};
pub use schema::{ContextRetriever, SchemaDoc};
