//! List filtering and pagination.
//!
//! # Design
//! `ListParams` is the raw query string exactly as the client sent it; every
//! value is a string so that an odd value never turns into a rejected
//! request. `TodoFilter` and `Page` are the interpreted forms the stores
//! work with. `TodoFilter::matches` is the reference semantics; a database
//! backend must translate the same predicate into its own query language.

use serde::{Deserialize, Serialize};

use crate::types::Todo;

/// Default page size.
pub const DEFAULT_LIMIT: usize = 100;

/// Largest page a single list call returns.
pub const MAX_LIMIT: usize = 500;

/// Raw list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub completed: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListParams {
    pub fn filter(&self) -> TodoFilter {
        TodoFilter {
            completed: self.completed.as_deref().map(|value| value == "true"),
            status: non_empty(&self.status),
            tag: non_empty(&self.tag),
            text: non_empty(&self.q).map(|q| q.to_lowercase()),
        }
    }

    /// Window handed to the store, with the limit capped at [`MAX_LIMIT`].
    pub fn page(&self) -> Page {
        Page::new(self.requested_limit(), self.requested_offset())
    }

    /// Limit as the client asked for it, before capping. Echoed back in
    /// list metadata.
    pub fn requested_limit(&self) -> usize {
        parse_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }

    pub fn requested_offset(&self) -> usize {
        parse_or(self.offset.as_deref(), 0)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

/// Conjunction of the supplied list filters. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    /// Compared against the status string, so an unknown value matches nothing.
    pub status: Option<String>,
    /// Exact member of `tags`.
    pub tag: Option<String>,
    /// Lowercased needle searched in title or description.
    pub text: Option<String>,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(completed) = self.completed {
            if todo.completed != completed {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if todo.status.as_str() != status {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !todo.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(needle) = &self.text {
            let in_title = todo.title.to_lowercase().contains(needle.as_str());
            let in_description = todo
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle.as_str()));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

/// Effective pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Caps `limit` at [`MAX_LIMIT`].
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: limit.min(MAX_LIMIT),
            offset,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}

/// One page of results plus the number of matches across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
}
