//! Metadata describing which fields of a resource may be filtered and sorted.

pub mod fields;

// re-export without modules
pub use fields::*;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The complete set of field capabilities for one resource (table),
/// plus the order applied when a request does not ask for one.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfiguration {
    /// Queryable fields keyed by the name used in the query string.
    pub fields: IndexMap<String, FieldSpec>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_sort: Vec<DefaultSort>,
}

impl QueryConfiguration {
    pub fn empty() -> Self {
        QueryConfiguration {
            fields: IndexMap::new(),
            default_sort: vec![],
        }
    }

    /// Lookup a field by its query-string name.
    pub fn lookup_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Add a field, replacing any previous field of the same name.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Append an entry to the default sort order.
    #[must_use]
    pub fn with_default_sort(mut self, field: impl Into<String>, order: SortDirection) -> Self {
        self.default_sort.push(DefaultSort {
            field: field.into(),
            order: Some(order),
        });
        self
    }
}

/// One entry of a resource's default sort order.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
pub struct DefaultSort {
    pub field: String,
    /// Only an explicit `asc` sorts ascending; an omitted order is descending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortDirection>,
}
