//! Validation errors for todo payloads.
//!
//! # Design
//! `TitleRequired` gets a dedicated variant because create and replace both
//! reject a missing title before anything else is checked, and callers want
//! to report that case with a fixed message. Every other variant names the
//! offending field so the message can be returned to the client verbatim.

use thiserror::Error;

/// Errors returned while turning a request body into a `TodoPatch`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The request body was not a JSON object.
    #[error("request body must be a JSON object")]
    NotAnObject,

    /// Create or replace was attempted without a non-empty title.
    #[error("title is required")]
    TitleRequired,

    /// A string field was empty after trimming.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A string field exceeds its maximum length in characters.
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// A field had the wrong JSON type.
    #[error("{field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// An enumerated field held a value outside its variant set.
    #[error("invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },

    /// A count field was negative.
    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    /// A count field exceeded the storable range.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: &'static str, max: u64 },
}
