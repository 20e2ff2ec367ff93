//! Storage collaborator for todo documents.
//!
//! Every operation is a single document read or write; `list` is one query
//! plus one count. Operations addressed by id return `None` when the id does
//! not exist, leaving the not-found response to the caller.

pub mod database;
pub mod memory;
pub mod surreal;

use async_trait::async_trait;
use thiserror::Error;
use todo_core::{Page, Paginated, Todo, TodoFields, TodoFilter, TodoPatch};
use uuid::Uuid;

pub use database::{Database, DatabaseSettings, SharedStore};
pub use memory::MemoryStore;
pub use surreal::SurrealStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a store or while connecting to one.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection settings are missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Surreal(#[from] surrealdb::Error),

    /// A stored document could not be turned back into a `Todo`.
    #[error("corrupt document: {0}")]
    Corrupt(String),

    /// A value could not be represented in the stored type.
    #[error("value out of range: {0}")]
    OutOfRange(String),
}

#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// Matching documents newest first, windowed by `page`, with the total
    /// number of matches.
    async fn list(&self, filter: &TodoFilter, page: Page) -> StoreResult<Paginated<Todo>>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<Todo>>;

    /// Persist a new document. The store assigns the id and both timestamps.
    async fn create(&self, fields: TodoFields) -> StoreResult<Todo>;

    /// Overwrite every writable field of an existing document.
    async fn replace(&self, id: Uuid, fields: TodoFields) -> StoreResult<Option<Todo>>;

    /// Merge the supplied fields into an existing document.
    async fn update(&self, id: Uuid, patch: TodoPatch) -> StoreResult<Option<Todo>>;

    /// Remove a document, returning its last state.
    async fn delete(&self, id: Uuid) -> StoreResult<Option<Todo>>;
}
