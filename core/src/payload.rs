//! Request body whitelisting.
//!
//! # Design
//! A write body is an arbitrary JSON object. Only the keys in
//! [`WRITABLE_FIELDS`] are looked at; everything else is dropped without an
//! error and never reaches storage. Each whitelisted key is type-checked and
//! normalised into a typed [`TodoPatch`], so the rest of the system never
//! handles a dynamically keyed map.
//!
//! Create and replace need a complete document and go through
//! [`parse_fields`]; partial update goes through [`parse_patch`].

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::types::{
    Priority, TodoFields, TodoStatus, COUNT_MAX, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
};

/// JSON keys a client may set on a todo.
pub const WRITABLE_FIELDS: [&str; 10] = [
    "title",
    "description",
    "completed",
    "status",
    "dueDate",
    "priority",
    "tags",
    "followersCount",
    "followingCount",
    "publicationsCount",
];

/// A validated partial update. `None` means "not supplied".
///
/// `description` and `due_date` are tri-state: `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub status: Option<TodoStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub publications_count: Option<u64>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build a complete field set, defaulting everything not supplied.
    ///
    /// Fails with `TitleRequired` when the title is missing or blank.
    pub fn into_fields(self) -> Result<TodoFields, ValidationError> {
        let title = match self.title {
            Some(title) if !title.is_empty() => title,
            _ => return Err(ValidationError::TitleRequired),
        };

        let mut fields = TodoFields::with_title(title);
        let rest = TodoPatch { title: None, ..self };
        rest.apply(&mut fields);
        Ok(fields)
    }

    /// Merge the supplied fields into `fields`, leaving the others untouched.
    pub fn apply(&self, fields: &mut TodoFields) {
        if let Some(title) = &self.title {
            fields.title = title.clone();
        }
        if let Some(description) = &self.description {
            fields.description = description.clone();
        }
        if let Some(completed) = self.completed {
            fields.completed = completed;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(due_date) = self.due_date {
            fields.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            fields.priority = priority;
        }
        if let Some(tags) = &self.tags {
            fields.tags = tags.clone();
        }
        if let Some(count) = self.followers_count {
            fields.followers_count = count;
        }
        if let Some(count) = self.following_count {
            fields.following_count = count;
        }
        if let Some(count) = self.publications_count {
            fields.publications_count = count;
        }
    }
}

/// Parse a create or replace body into a complete field set.
pub fn parse_fields(body: &Value) -> Result<TodoFields, ValidationError> {
    read_whitelisted(body)?.into_fields()
}

/// Parse a partial update body. Any subset of fields is allowed, but a
/// supplied title must not be blank.
pub fn parse_patch(body: &Value) -> Result<TodoPatch, ValidationError> {
    let patch = read_whitelisted(body)?;
    if patch.title.as_deref() == Some("") {
        return Err(ValidationError::Empty { field: "title" });
    }
    Ok(patch)
}

fn read_whitelisted(body: &Value) -> Result<TodoPatch, ValidationError> {
    let map = body.as_object().ok_or(ValidationError::NotAnObject)?;
    let count_of = |field: &'static str| map.get(field).map(|v| count(field, v)).transpose();

    // Fields are validated in `WRITABLE_FIELDS` order, so the first bad
    // field in that order is the one reported.
    Ok(TodoPatch {
        title: map
            .get("title")
            .map(|v| text("title", v, TITLE_MAX_LEN))
            .transpose()?,
        description: map
            .get("description")
            .map(|v| match v {
                Value::Null => Ok(None),
                _ => text("description", v, DESCRIPTION_MAX_LEN).map(Some),
            })
            .transpose()?,
        completed: map
            .get("completed")
            .map(|v| boolean("completed", v))
            .transpose()?,
        status: map
            .get("status")
            .map(|v| string("status", v).and_then(|s| s.parse()))
            .transpose()?,
        due_date: map.get("dueDate").map(due_date).transpose()?,
        priority: map
            .get("priority")
            .map(|v| string("priority", v).and_then(|s| s.parse()))
            .transpose()?,
        tags: map.get("tags").map(tags).transpose()?,
        followers_count: count_of("followersCount")?,
        following_count: count_of("followingCount")?,
        publications_count: count_of("publicationsCount")?,
    })
}

fn string<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or(ValidationError::InvalidType {
        field,
        expected: "a string",
    })
}

/// Trimmed string with a maximum length in characters.
fn text(field: &'static str, value: &Value, max: usize) -> Result<String, ValidationError> {
    let trimmed = string(field, value)?.trim();
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

fn boolean(field: &'static str, value: &Value) -> Result<bool, ValidationError> {
    value.as_bool().ok_or(ValidationError::InvalidType {
        field,
        expected: "a boolean",
    })
}

fn count(field: &'static str, value: &Value) -> Result<u64, ValidationError> {
    let invalid = ValidationError::InvalidType {
        field,
        expected: "a non-negative integer",
    };
    let Value::Number(number) = value else {
        return Err(invalid);
    };
    let n = match (number.as_u64(), number.as_f64()) {
        (Some(n), _) => n,
        (None, Some(f)) if f < 0.0 => return Err(ValidationError::Negative { field }),
        // Whole floats such as `3.0` are accepted; the cast saturates.
        (None, Some(f)) if f.fract() == 0.0 => f as u64,
        _ => return Err(invalid),
    };
    if n > COUNT_MAX {
        return Err(ValidationError::TooLarge {
            field,
            max: COUNT_MAX,
        });
    }
    Ok(n)
}

fn tags(value: &Value) -> Result<Vec<String>, ValidationError> {
    let invalid = ValidationError::InvalidType {
        field: "tags",
        expected: "an array of strings",
    };
    let Value::Array(items) = value else {
        return Err(invalid);
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or(invalid.clone()))
        .collect()
}

fn due_date(value: &Value) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let raw = match value {
        Value::Null => return Ok(None),
        Value::String(raw) => raw.trim(),
        _ => return Err(invalid_due_date()),
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| Some(at.and_utc()))
        .ok_or_else(invalid_due_date)
}

fn invalid_due_date() -> ValidationError {
    ValidationError::InvalidType {
        field: "dueDate",
        expected: "an RFC 3339 timestamp or a YYYY-MM-DD date",
    }
}

/// Keys of `body` that are not writable and will be dropped.
pub fn ignored_keys(body: &Map<String, Value>) -> Vec<&str> {
    body.keys()
        .map(String::as_str)
        .filter(|key| !WRITABLE_FIELDS.contains(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_defaults_everything_but_title() {
        let fields = parse_fields(&json!({ "title": "Buy milk" })).unwrap();
        assert_eq!(fields, TodoFields::with_title("Buy milk"));
    }

    #[test]
    fn missing_title_is_required_error() {
        let err = parse_fields(&json!({ "completed": true })).unwrap_err();
        assert_eq!(err, ValidationError::TitleRequired);
    }

    #[test]
    fn blank_title_is_required_error() {
        let err = parse_fields(&json!({ "title": "   " })).unwrap_err();
        assert_eq!(err, ValidationError::TitleRequired);
    }

    #[test]
    fn title_is_trimmed() {
        let fields = parse_fields(&json!({ "title": "  Walk dog \n" })).unwrap();
        assert_eq!(fields.title, "Walk dog");
    }

    #[test]
    fn title_length_counts_characters() {
        let ok = "é".repeat(TITLE_MAX_LEN);
        assert!(parse_fields(&json!({ "title": ok })).is_ok());

        let long = "x".repeat(TITLE_MAX_LEN + 1);
        let err = parse_fields(&json!({ "title": long })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "title",
                max: TITLE_MAX_LEN
            }
        );
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let body = json!({ "title": "t", "id": "abc", "createdAt": "x", "owner": 1 });
        let patch = parse_patch(&body).unwrap();
        assert_eq!(patch.title.as_deref(), Some("t"));
        assert_eq!(
            TodoPatch {
                title: None,
                ..patch
            },
            TodoPatch::default()
        );
        assert_eq!(ignored_keys(body.as_object().unwrap()), vec!["createdAt", "id", "owner"]);
    }

    #[test]
    fn patch_allows_any_subset() {
        let patch = parse_patch(&json!({ "completed": true })).unwrap();
        assert_eq!(patch.completed, Some(true));
        assert!(patch.title.is_none());

        assert!(parse_patch(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn patch_rejects_blank_title() {
        let err = parse_patch(&json!({ "title": " " })).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "title" });
    }

    #[test]
    fn null_description_clears() {
        let patch = parse_patch(&json!({ "description": null })).unwrap();
        assert_eq!(patch.description, Some(None));

        let mut fields = TodoFields::with_title("t");
        fields.description = Some("old".to_string());
        patch.apply(&mut fields);
        assert!(fields.description.is_none());
    }

    #[test]
    fn null_on_plain_field_is_type_error() {
        let err = parse_patch(&json!({ "completed": null })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { field: "completed", .. }));
    }

    #[test]
    fn enums_are_checked() {
        let err = parse_patch(&json!({ "status": "done" })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "status", .. }));

        let patch = parse_patch(&json!({ "status": "in_progress", "priority": "high" })).unwrap();
        assert_eq!(patch.status, Some(TodoStatus::InProgress));
        assert_eq!(patch.priority, Some(Priority::High));
    }

    #[test]
    fn counts_must_be_non_negative_integers() {
        let err = parse_patch(&json!({ "followersCount": -1 })).unwrap_err();
        assert_eq!(err, ValidationError::Negative { field: "followersCount" });

        let err = parse_patch(&json!({ "followingCount": 1.5 })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { field: "followingCount", .. }));

        let patch = parse_patch(&json!({ "publicationsCount": 4.0 })).unwrap();
        assert_eq!(patch.publications_count, Some(4));
    }

    #[test]
    fn counts_must_fit_signed_64_bits() {
        let patch = parse_patch(&json!({ "followersCount": COUNT_MAX })).unwrap();
        assert_eq!(patch.followers_count, Some(COUNT_MAX));

        let err = parse_patch(&json!({ "followersCount": u64::MAX })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLarge {
                field: "followersCount",
                max: COUNT_MAX
            }
        );

        let err = parse_patch(&json!({ "followingCount": 1e19 })).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { field: "followingCount", .. }));
    }

    #[test]
    fn due_date_accepts_timestamp_or_date() {
        let patch = parse_patch(&json!({ "dueDate": "2024-06-01T08:30:00+02:00" })).unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-06-01T06:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(patch.due_date, Some(Some(expected)));

        let patch = parse_patch(&json!({ "dueDate": "2024-06-01" })).unwrap();
        let midnight = DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(patch.due_date, Some(Some(midnight)));

        assert!(parse_patch(&json!({ "dueDate": "next tuesday" })).is_err());
    }

    #[test]
    fn tags_must_be_strings() {
        let err = parse_patch(&json!({ "tags": ["a", 1] })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { field: "tags", .. }));
    }

    #[test]
    fn every_writable_field_is_read() {
        let body = json!({
            "title": "t",
            "description": "d",
            "completed": true,
            "status": "completed",
            "dueDate": "2024-01-01",
            "priority": "low",
            "tags": ["x"],
            "followersCount": 1,
            "followingCount": 2,
            "publicationsCount": 3,
        });
        let map = body.as_object().unwrap();
        assert_eq!(map.len(), WRITABLE_FIELDS.len());
        assert!(ignored_keys(map).is_empty());

        let patch = parse_patch(&body).unwrap();
        assert!(patch.title.is_some());
        assert!(patch.description.is_some());
        assert!(patch.completed.is_some());
        assert!(patch.status.is_some());
        assert!(patch.due_date.is_some());
        assert!(patch.priority.is_some());
        assert!(patch.tags.is_some());
        assert!(patch.followers_count.is_some());
        assert!(patch.following_count.is_some());
        assert!(patch.publications_count.is_some());
    }

    #[test]
    fn body_must_be_object() {
        assert_eq!(parse_patch(&json!([1, 2])).unwrap_err(), ValidationError::NotAnObject);
    }
}
