use serde_json::json;
use shared::{error::CommandError, filter::SortOrder};

use super::support::{CallKind, RecordingTransport};
use crate::{
    aggregates::{
        append_indexed, transform_aggregates, AggregateMode, AggregateRequest, SortSpec, SortStat,
    },
    command::TransportCommand,
    entities::EntitiesCommand,
    entity::element_path,
    factory::Task,
    params::Params,
};

#[test]
fn append_indexed_flattens_in_order() {
    let mut params = Params::new();
    append_indexed(&mut params, "data_columns", &["severity", "qod"]);
    assert_eq!(params.get("data_columns:0"), Some("severity"));
    assert_eq!(params.get("data_columns:1"), Some("qod"));

    append_indexed(&mut params, "text_columns", &[] as &[&str]);
    assert_eq!(params.keys_with_prefix("text_columns:").count(), 0);
}

#[test]
fn request_encoding_matches_the_wire_mini_language() {
    let request = AggregateRequest::grouped_by("family")
        .with_data_column("severity")
        .with_sort(SortSpec::new("severity", SortOrder::Descending, SortStat::Max))
        .with_max_groups(10);

    let params = request.to_params("task");
    assert_eq!(params.get("cmd"), None, "the command layer adds cmd, not the encoder");
    assert_eq!(params.get("aggregate_type"), Some("task"));
    assert_eq!(params.get("group_column"), Some("family"));
    assert_eq!(params.get("data_columns:0"), Some("severity"));
    assert_eq!(params.get("sort_fields:0"), Some("severity"));
    assert_eq!(params.get("sort_orders:0"), Some("descending"));
    assert_eq!(params.get("sort_stats:0"), Some("max"));
    assert_eq!(params.get("max_groups"), Some("10"));
}

#[test]
fn sort_triples_stay_aligned_per_index() {
    let request = AggregateRequest::grouped_by("family")
        .with_sort(SortSpec::new("severity", SortOrder::Descending, SortStat::Mean))
        .with_sort(SortSpec::new("count", SortOrder::Ascending, SortStat::Count));

    let params = request.to_params("result");
    assert_eq!(params.get("sort_fields:1"), Some("count"));
    assert_eq!(params.get("sort_orders:1"), Some("ascending"));
    assert_eq!(params.get("sort_stats:1"), Some("count"));
}

#[test]
fn word_counts_mode_and_subgroup_are_encoded() {
    let mut request = AggregateRequest::grouped_by("vulnerability")
        .with_text_column("name");
    request.mode = AggregateMode::WordCounts;
    request.subgroup_column = Some("severity_class".to_owned());

    let params = request.to_params("result");
    assert_eq!(params.get("aggregate_mode"), Some("word_counts"));
    assert_eq!(params.get("subgroup_column"), Some("severity_class"));
    assert_eq!(params.get("text_columns:0"), Some("name"));
    // Grouped mode is the wire default and is never sent explicitly.
    let grouped = AggregateRequest::grouped_by("family").to_params("result");
    assert!(!grouped.contains("aggregate_mode"));
}

#[test]
fn transform_preserves_group_order_and_pivots_stats_and_text() {
    let envelope = json!({
        "get_aggregates_response": {
            "aggregate": {
                "group": [
                    {
                        "value": "Web Servers",
                        "count": "7",
                        "c_count": "7",
                        "stats": {
                            "_column": "severity",
                            "min": "2.1", "max": "9.8", "mean": "5.5",
                            "sum": "38.5", "c_sum": "38.5",
                        },
                        "text": {"_column": "name", "__text": "apache"},
                    },
                    {
                        "value": "Databases",
                        "count": "3",
                        "c_count": "10",
                        "stats": [
                            {
                                "_column": "severity",
                                "min": "1.0", "max": "7.0", "mean": "4.0",
                                "sum": "12.0", "c_sum": "50.5",
                            },
                            {
                                "_column": "qod",
                                "min": "70", "max": "97", "mean": "80",
                                "sum": "240", "c_sum": "700",
                            },
                        ],
                    },
                ],
                "column_info": {
                    "aggregate_column": {
                        "name": "severity_max",
                        "column": "severity",
                        "stat": "max",
                        "data_type": "cvss",
                    }
                },
            }
        }
    });

    let aggregates = transform_aggregates(&envelope).unwrap();
    assert_eq!(aggregates.groups.len(), 2);

    let first = &aggregates.groups[0];
    assert_eq!(first.value, "Web Servers");
    assert_eq!((first.count, first.c_count), (7, 7));
    let severity = &first.stats["severity"];
    assert_eq!(
        (severity.min, severity.max, severity.mean, severity.sum, severity.c_sum),
        (2.1, 9.8, 5.5, 38.5, 38.5)
    );
    assert_eq!(first.text["name"], "apache");

    let second = &aggregates.groups[1];
    assert_eq!(second.value, "Databases");
    assert_eq!((second.count, second.c_count), (3, 10));
    assert_eq!(second.stats.len(), 2);
    assert_eq!(second.stats["qod"].mean, 80.0);
    assert!(second.text.is_empty());

    assert_eq!(aggregates.columns.len(), 1);
    assert_eq!(aggregates.columns[0].name, "severity_max");
    assert_eq!(aggregates.columns[0].data_type, "cvss");
}

#[test]
fn absent_group_field_is_zero_groups_not_an_error() {
    let envelope = json!({
        "get_aggregates_response": { "aggregate": {} }
    });
    let aggregates = transform_aggregates(&envelope).unwrap();
    assert!(aggregates.groups.is_empty());
}

#[test]
fn missing_aggregate_root_is_a_structural_error() {
    let err = transform_aggregates(&json!({"get_aggregates_response": {}})).unwrap_err();
    assert!(matches!(err, CommandError::MissingElement(name) if name == "aggregate"));

    let err = transform_aggregates(&json!({})).unwrap_err();
    assert!(matches!(err, CommandError::MissingElement(_)));
}

#[tokio::test]
async fn aggregates_round_trip_through_the_collection_command() {
    let transport = RecordingTransport::with_response(json!({
        "get_aggregates_response": {
            "aggregate": {
                "group": {"value": "High", "count": "4", "c_count": "4"},
            }
        }
    }));
    let tasks: EntitiesCommand<Task> = EntitiesCommand::new(
        TransportCommand::new(transport.clone()),
        "tasks",
        element_path(&["get_tasks_response"]),
    );

    let request = AggregateRequest::grouped_by("severity_class");
    let aggregates = tasks.aggregates(&request).await.unwrap();

    // A single bare group still comes back as one group.
    assert_eq!(aggregates.groups.len(), 1);
    assert_eq!(aggregates.groups[0].value, "High");

    let (kind, sent) = transport.single_call();
    assert_eq!(kind, CallKind::Read);
    assert_eq!(sent.get("cmd"), Some("get_aggregate"));
    assert_eq!(sent.get("aggregate_type"), Some("task"));
    assert_eq!(sent.get("group_column"), Some("severity_class"));
}
