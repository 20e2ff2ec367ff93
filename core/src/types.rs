//! Domain types for the todo document.
//!
//! # Design
//! `Todo` is the stored document as clients see it. `TodoFields` is the
//! whitelisted, writable part of it with every schema default filled in, so
//! create and replace both start from a complete value and a backend never
//! has to know what the defaults are. System-managed fields (`id`,
//! `createdAt`, `updatedAt`) only exist on `Todo`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX_LEN: usize = 2000;

/// Largest value a count field may hold, the range of a signed 64-bit integer.
pub const COUNT_MAX: u64 = i64::MAX as u64;

/// Workflow state of a todo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ValidationError::InvalidVariant {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// How urgent a todo is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ValidationError::InvalidVariant {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// The writable fields of a todo, with schema defaults applied.
///
/// Built by `TodoPatch::into_fields` for create and replace. The title is
/// already trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub status: TodoStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub followers_count: u64,
    pub following_count: u64,
    pub publications_count: u64,
}

impl TodoFields {
    /// A field set holding `title` and the schema default for everything else.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
            status: TodoStatus::default(),
            due_date: None,
            priority: Priority::default(),
            tags: Vec::new(),
            followers_count: 0,
            following_count: 0,
            publications_count: 0,
        }
    }
}

/// A single todo document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub status: TodoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub followers_count: u64,
    pub following_count: u64,
    pub publications_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Assemble a document from its writable fields and system-managed values.
    pub fn from_fields(
        id: Uuid,
        fields: TodoFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            completed: fields.completed,
            status: fields.status,
            due_date: fields.due_date,
            priority: fields.priority,
            tags: fields.tags,
            followers_count: fields.followers_count,
            following_count: fields.following_count,
            publications_count: fields.publications_count,
            created_at,
            updated_at,
        }
    }

    /// The writable part of this document.
    pub fn fields(&self) -> TodoFields {
        TodoFields {
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
            status: self.status,
            due_date: self.due_date,
            priority: self.priority,
            tags: self.tags.clone(),
            followers_count: self.followers_count,
            following_count: self.following_count,
            publications_count: self.publications_count,
        }
    }

    /// Overwrite every writable field, leaving `id` and `created_at` alone.
    pub fn set_fields(&mut self, fields: TodoFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.completed = fields.completed;
        self.status = fields.status;
        self.due_date = fields.due_date;
        self.priority = fields.priority;
        self.tags = fields.tags;
        self.followers_count = fields.followers_count;
        self.following_count = fields.following_count;
        self.publications_count = fields.publications_count;
    }
}
