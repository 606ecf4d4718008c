//! Group-by aggregation: request mini-language encoding and response
//! transform.
//!
//! The wire protocol has no native arrays in requests; every ordered input is
//! flattened to indexed keys (`data_columns:0`, `sort_fields:1`, ...).
//! Responses pivot per-column statistics and text payloads out of marker
//! lists into maps keyed by column name.

use std::collections::HashMap;

use serde_json::Value;
use shared::{
    envelope::{as_f64, as_i64, as_list, attr, child, child_text, text},
    error::{CommandError, Result},
    filter::{Filter, SortOrder},
};
use tracing::warn;

use crate::params::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregateMode {
    /// Standard grouping: one group per distinct value of the group column.
    #[default]
    Grouped,
    /// Tokenize a text column into one group per distinct word.
    WordCounts,
}

impl AggregateMode {
    fn as_param(self) -> Option<&'static str> {
        match self {
            AggregateMode::Grouped => None,
            AggregateMode::WordCounts => Some("word_counts"),
        }
    }
}

/// Which computed statistic drives ordering when sorting by a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortStat {
    #[default]
    Value,
    Count,
    CumulativeCount,
    Min,
    Max,
    Mean,
    Sum,
    CumulativeSum,
}

impl SortStat {
    fn as_param(self) -> &'static str {
        match self {
            SortStat::Value => "value",
            SortStat::Count => "count",
            SortStat::CumulativeCount => "c_count",
            SortStat::Min => "min",
            SortStat::Max => "max",
            SortStat::Mean => "mean",
            SortStat::Sum => "sum",
            SortStat::CumulativeSum => "c_sum",
        }
    }
}

/// One ordered sort directive. Entries reference columns by name, not by
/// index; only the (field, order, stat) triple itself must stay aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
    pub stat: SortStat,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder, stat: SortStat) -> Self {
        Self {
            field: field.into(),
            order,
            stat,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregateRequest {
    /// Primary grouping dimension.
    pub group_column: Option<String>,
    /// Second, nested grouping dimension under the primary one.
    pub subgroup_column: Option<String>,
    /// Numeric columns to compute statistics over.
    pub data_columns: Vec<String>,
    /// Opaque per-group text payloads, carried but not aggregated.
    pub text_columns: Vec<String>,
    pub sort: Vec<SortSpec>,
    pub mode: AggregateMode,
    /// Caps the returned group count.
    pub max_groups: Option<u64>,
    pub filter: Option<Filter>,
}

impl AggregateRequest {
    pub fn grouped_by(column: impl Into<String>) -> Self {
        Self {
            group_column: Some(column.into()),
            ..Self::default()
        }
    }

    pub fn with_data_column(mut self, column: impl Into<String>) -> Self {
        self.data_columns.push(column.into());
        self
    }

    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_columns.push(column.into());
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_max_groups(mut self, max_groups: u64) -> Self {
        self.max_groups = Some(max_groups);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Flatten to wire parameters for `aggregate_type = resource`.
    pub fn to_params(&self, resource_type: &str) -> Params {
        let mut params = Params::new().with("aggregate_type", resource_type);
        if let Some(group) = &self.group_column {
            params.set("group_column", group);
        }
        if let Some(subgroup) = &self.subgroup_column {
            params.set("subgroup_column", subgroup);
        }
        if let Some(mode) = self.mode.as_param() {
            params.set("aggregate_mode", mode);
        }
        if let Some(max_groups) = self.max_groups {
            params.set("max_groups", max_groups.to_string());
        }
        if let Some(filter) = &self.filter {
            params.set("filter", filter.to_string());
        }

        append_indexed(&mut params, "data_columns", &self.data_columns);
        append_indexed(&mut params, "text_columns", &self.text_columns);
        // The sort triple at index i must stay aligned across all three
        // prefixes, so the lists are derived from the same iteration.
        let fields: Vec<&str> = self.sort.iter().map(|s| s.field.as_str()).collect();
        let orders: Vec<&str> = self.sort.iter().map(|s| s.order.as_param()).collect();
        let stats: Vec<&str> = self.sort.iter().map(|s| s.stat.as_param()).collect();
        append_indexed(&mut params, "sort_fields", &fields);
        append_indexed(&mut params, "sort_orders", &orders);
        append_indexed(&mut params, "sort_stats", &stats);
        params
    }
}

/// Flatten an ordered list to `prefix:0`, `prefix:1`, ... keys.
pub fn append_indexed<S: AsRef<str>>(params: &mut Params, prefix: &str, values: &[S]) {
    for (index, value) in values.iter().enumerate() {
        params.set(format!("{prefix}:{index}"), value.as_ref());
    }
}

/// The five statistics computed per data column per group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
    /// Cumulative sum across the groups seen so far, in server order.
    pub c_sum: f64,
}

/// One row of a group-by result. Order is server-determined and preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateGroup {
    pub value: String,
    pub count: u64,
    /// Cumulative count, used by range-binning callers.
    pub c_count: u64,
    pub stats: HashMap<String, AggregateStats>,
    pub text: HashMap<String, String>,
}

/// Per-column legend the backend sends alongside the groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateColumn {
    pub name: String,
    pub column: String,
    pub stat: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregates {
    pub groups: Vec<AggregateGroup>,
    pub columns: Vec<AggregateColumn>,
}

/// Transform a raw aggregate envelope.
///
/// Zero groups is a valid outcome (empty list); a missing aggregate root is
/// a structural failure and errors out.
pub fn transform_aggregates(root: &Value) -> Result<Aggregates> {
    let aggregate = child(root, "get_aggregates_response")
        .and_then(|response| child(response, "aggregate"))
        .ok_or_else(|| CommandError::MissingElement("aggregate".to_owned()))?;

    let groups = as_list(child(aggregate, "group"))
        .into_iter()
        .map(parse_group)
        .collect();

    let columns = as_list(
        child(aggregate, "column_info").and_then(|info| child(info, "aggregate_column")),
    )
    .into_iter()
    .map(parse_column)
    .collect();

    Ok(Aggregates { groups, columns })
}

fn parse_group(element: &Value) -> AggregateGroup {
    let mut group = AggregateGroup {
        value: child_text(element, "value").unwrap_or_default().to_owned(),
        count: child(element, "count").and_then(as_i64).unwrap_or(0).max(0) as u64,
        c_count: child(element, "c_count")
            .and_then(as_i64)
            .unwrap_or(0)
            .max(0) as u64,
        ..AggregateGroup::default()
    };

    // Pivot the per-column stats list into a map keyed by column name.
    for stats in as_list(child(element, "stats")) {
        let Some(column) = attr(stats, "column") else {
            warn!("stats entry without column marker, skipping");
            continue;
        };
        group.stats.insert(
            column.to_owned(),
            AggregateStats {
                min: stat_value(stats, "min"),
                max: stat_value(stats, "max"),
                mean: stat_value(stats, "mean"),
                sum: stat_value(stats, "sum"),
                c_sum: stat_value(stats, "c_sum"),
            },
        );
    }

    // Same pivot for opaque text payloads.
    for entry in as_list(child(element, "text")) {
        let Some(column) = attr(entry, "column") else {
            warn!("text entry without column marker, skipping");
            continue;
        };
        group
            .text
            .insert(column.to_owned(), text(entry).unwrap_or_default().to_owned());
    }

    group
}

fn stat_value(stats: &Value, name: &str) -> f64 {
    child(stats, name).and_then(as_f64).unwrap_or(0.0)
}

fn parse_column(element: &Value) -> AggregateColumn {
    AggregateColumn {
        name: attr(element, "name").unwrap_or_default().to_owned(),
        column: child_text(element, "column").unwrap_or_default().to_owned(),
        stat: child_text(element, "stat").unwrap_or_default().to_owned(),
        data_type: child_text(element, "data_type")
            .unwrap_or_default()
            .to_owned(),
    }
}
