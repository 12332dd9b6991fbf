//! The structured result of translating a list request's query string.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use query_engine_metadata::metadata::SortDirection;

/// How to filter, sort and page the rows of a single table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRequest {
    /// `None` matches every row.
    pub predicate: Option<Predicate>,
    pub sort_order: Vec<SortEntry>,
    pub limit: u64,
    pub offset: u64,
}

/// A typed comparison against a column, or a conjunction of predicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    #[serde(rename_all = "camelCase")]
    Comparison {
        column: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        column_type: Option<String>,
        operator: ComparisonOperator,
        value: Value,
    },
    And(Vec<Predicate>),
}

impl Predicate {
    /// A comparison against a column with no storage type hint.
    pub fn comparison(column: impl Into<String>, operator: ComparisonOperator, value: Value) -> Self {
        Predicate::Comparison {
            column: column.into(),
            column_type: None,
            operator,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    /// Case-insensitive pattern match; the value carries the wildcards.
    ContainsInsensitive,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

/// A query-string value after interpretation according to its field's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Uuid(String),
}

impl Value {
    /// The textual form used when a value becomes part of a pattern.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) | Value::Uuid(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Timestamp(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// One key of the requested row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortEntry {
    pub column: String,
    pub direction: SortDirection,
}
