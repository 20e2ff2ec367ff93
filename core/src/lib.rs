//! Domain core for the todo document service.
//!
//! # Overview
//! Defines the todo document, turns raw JSON write bodies into validated
//! typed updates, and interprets list query parameters. Nothing here
//! performs I/O; the server crate owns HTTP and storage.
//!
//! # Design
//! - Write bodies are whitelisted into a `TodoPatch` with optional fields
//!   instead of being passed around as a map.
//! - Schema defaults live in `TodoFields::with_title`, so every backend
//!   writes the same defaults.
//! - `TodoFilter::matches` is the reference list predicate.

pub mod error;
pub mod payload;
pub mod query;
pub mod types;

pub use error::ValidationError;
pub use payload::{parse_fields, parse_patch, TodoPatch, WRITABLE_FIELDS};
pub use query::{ListParams, Page, Paginated, TodoFilter, DEFAULT_LIMIT, MAX_LIMIT};
pub use types::{Priority, Todo, TodoFields, TodoStatus, COUNT_MAX, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
