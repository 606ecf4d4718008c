//! Extracts `{entities, echoed filter, counts}` from a located list envelope.

use serde_json::Value;
use shared::{
    counts::CollectionCounts,
    envelope::{as_i64, as_list, attr, child, child_text},
    filter::Filter,
    model::Model,
};

use crate::entities::CollectionList;

/// A located list envelope looks like
///
/// ```text
/// {
///   "task": [...],                                   // entities (may be bare)
///   "filters": { "term": "first=1 rows=10" },        // server-echoed filter
///   "task_count": { "__text": "42", "filtered": "12", "page": "10" },
///   "tasks": { "_start": "1", "_max": "10" }         // window attributes
/// }
/// ```
///
/// Every field is parsed defensively: absent entities mean an empty page,
/// absent counts default to zero.
pub fn parse_collection_list<M: Model>(
    list_root: &Value,
    singular: &str,
    plural: &str,
) -> CollectionList<M> {
    let entities = as_list(child(list_root, singular))
        .into_iter()
        .map(M::from_element)
        .collect();

    let filter = child(list_root, "filters")
        .and_then(|filters| child_text(filters, "term"))
        .map(Filter::parse)
        .unwrap_or_default();

    CollectionList {
        entities,
        filter,
        counts: parse_counts(list_root, singular, plural),
    }
}

fn parse_counts(list_root: &Value, singular: &str, plural: &str) -> CollectionCounts {
    let count_node = child(list_root, &format!("{singular}_count"));
    let window = child(list_root, plural);

    CollectionCounts {
        first: window
            .and_then(|w| attr(w, "start"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(1),
        all: count_node.and_then(as_i64).unwrap_or(0).max(0) as u64,
        filtered: count_int(count_node, "filtered"),
        length: count_int(count_node, "page"),
        rows: window
            .and_then(|w| attr(w, "max"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
    }
}

fn count_int(count_node: Option<&Value>, name: &str) -> u64 {
    count_node
        .and_then(|node| child(node, name))
        .and_then(as_i64)
        .unwrap_or(0)
        .max(0) as u64
}
