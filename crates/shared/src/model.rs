use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{attr, child_text};

/// A typed resource instance built from a raw envelope fragment.
///
/// Models are constructed transiently per response and never cached. An
/// entity without an identifier is how the backend spells "not found", so
/// `id` is optional by contract.
pub trait Model: Sized + Send + Sync {
    /// Singular resource-type name on the wire, e.g. `"task"`.
    fn type_name() -> &'static str;

    fn from_element(element: &Value) -> Self;

    fn id(&self) -> Option<&str>;
}

/// The fields every resource element shares, parsed once and embedded by
/// concrete models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityData {
    pub id: Option<String>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub modification_time: Option<DateTime<Utc>>,
    pub in_use: bool,
    pub writable: bool,
}

impl EntityData {
    pub fn from_element(element: &Value) -> Self {
        Self {
            id: attr(element, "id").map(str::to_owned),
            name: child_text(element, "name").map(str::to_owned),
            comment: child_text(element, "comment").map(str::to_owned),
            creation_time: parse_time(child_text(element, "creation_time")),
            modification_time: parse_time(child_text(element, "modification_time")),
            in_use: child_text(element, "in_use") == Some("1"),
            writable: child_text(element, "writable") == Some("1"),
        }
    }
}

fn parse_time(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_shared_entity_fields() {
        let element = json!({
            "_id": "task-1",
            "name": "Weekly scan",
            "comment": "internal hosts",
            "creation_time": "2024-03-01T10:00:00Z",
            "in_use": "1",
            "writable": "0",
        });

        let data = EntityData::from_element(&element);
        assert_eq!(data.id.as_deref(), Some("task-1"));
        assert_eq!(data.name.as_deref(), Some("Weekly scan"));
        assert_eq!(data.comment.as_deref(), Some("internal hosts"));
        assert!(data.creation_time.is_some());
        assert!(data.modification_time.is_none());
        assert!(data.in_use);
        assert!(!data.writable);
    }

    #[test]
    fn missing_id_stays_absent() {
        let data = EntityData::from_element(&json!({"name": "orphan"}));
        assert_eq!(data.id, None);
    }
}
