//! Data store collaborator.
//!
//! # Responsibilities
//! - Find things by name
//! - Insert new things, rejecting taken names atomically
//!
//! # Design Decisions
//! - Handlers depend on the `ThingStore` trait, not on a backend
//! - Connection happens once at startup; failure there is fatal

pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryThingStore;

/// A stored thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thing {
    pub id: Uuid,
    pub name: String,
}

impl Thing {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid database URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported database scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("a thing named {0:?} already exists")]
    Duplicate(String),
}

#[async_trait]
pub trait ThingStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Thing>, StoreError>;

    /// Insert a thing. Fails with [`StoreError::Duplicate`] when the name is taken.
    async fn insert(&self, thing: Thing) -> Result<(), StoreError>;
}
