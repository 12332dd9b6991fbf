//! Per-field capabilities: value types, filter operators and sortability.

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How raw query-string values for a field are interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Date,
    Boolean,
    Uuid,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Date => "date",
            ValueType::Boolean => "boolean",
            ValueType::Uuid => "uuid",
        };
        write!(f, "{name}")
    }
}

/// The complete list of comparison operators a query string may ask for.
/// Each field opts in to a subset of these.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Like,
    Gte,
    Lte,
}

impl FilterOperator {
    /// The suffix used in a query-string key, as in `price_gte`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Like => "like",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }

    /// Recognise an operator suffix. Matching is exact and case-sensitive.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        enum_iterator::all::<FilterOperator>().find(|operator| operator.suffix() == suffix)
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// Direction of a sort entry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Information about a single queryable field of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// The storage column this field refers to.
    pub column: String,
    /// Storage type of the column, used to cast bound parameters
    /// (for example an enum type). Not interpreted by the translator.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub sortable: bool,
    /// Operators this field may be filtered with. When absent, the field
    /// cannot be filtered at all.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterOperator>>,
}

impl FieldSpec {
    /// A field that can be neither sorted nor filtered.
    pub fn new(column: impl Into<String>, value_type: ValueType) -> Self {
        FieldSpec {
            column: column.into(),
            column_type: None,
            value_type,
            sortable: false,
            filters: None,
        }
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    #[must_use]
    pub fn filterable(mut self, operators: &[FilterOperator]) -> Self {
        self.filters = Some(operators.to_vec());
        self
    }

    #[must_use]
    pub fn with_column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = Some(column_type.into());
        self
    }

    /// Whether the query string may use this operator on the field.
    pub fn allows(&self, operator: FilterOperator) -> bool {
        self.filters
            .as_ref()
            .is_some_and(|operators| operators.contains(&operator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operator_round_trips_through_its_suffix() {
        for operator in enum_iterator::all::<FilterOperator>() {
            assert_eq!(FilterOperator::from_suffix(operator.suffix()), Some(operator));
        }
    }

    #[test]
    fn suffixes_are_case_sensitive() {
        assert_eq!(FilterOperator::from_suffix("GTE"), None);
        assert_eq!(FilterOperator::from_suffix("in"), None);
        assert_eq!(FilterOperator::from_suffix(""), None);
    }

    #[test]
    fn fields_without_filters_allow_nothing() {
        let spec = FieldSpec::new("created_at", ValueType::Date).sortable();
        for operator in enum_iterator::all::<FilterOperator>() {
            assert!(!spec.allows(operator), "{operator} should not be allowed");
        }
    }

    #[test]
    fn allow_list_is_checked_by_membership() {
        let spec = FieldSpec::new("price", ValueType::Number)
            .filterable(&[FilterOperator::Gte, FilterOperator::Lte]);
        assert!(spec.allows(FilterOperator::Gte));
        assert!(spec.allows(FilterOperator::Lte));
        assert!(!spec.allows(FilterOperator::Eq));
        assert!(!spec.allows(FilterOperator::Like));
    }
}
