//! Handle filtering/where clauses translation.

use super::params::QueryParams;
use super::request::{ComparisonOperator, Predicate, Value};
use super::values;
use query_engine_metadata::metadata::{FieldSpec, FilterOperator, QueryConfiguration};

/// Conjoin the caller's predicates with every filter the query string
/// is permitted to express. `None` when there is nothing to conjoin.
pub fn resolve_predicate(
    params: &QueryParams,
    configuration: &QueryConfiguration,
    extra_predicates: Vec<Predicate>,
) -> Option<Predicate> {
    let conjuncts: Vec<Predicate> = extra_predicates
        .into_iter()
        .chain(
            params
                .iter()
                .filter(|(key, _)| !QueryParams::is_reserved(key))
                .filter_map(|(key, raw)| translate_filter(configuration, key, raw)),
        )
        .collect();

    if conjuncts.is_empty() {
        None
    } else {
        Some(Predicate::And(conjuncts))
    }
}

/// Translate one `field` or `field_operator` pair, dropping anything the
/// configuration does not permit.
fn translate_filter(configuration: &QueryConfiguration, key: &str, raw: &str) -> Option<Predicate> {
    let (field, operator) = split_field_and_operator(key);

    let Some(spec) = configuration.lookup_field(field) else {
        tracing::debug!(key, "ignoring filter on unknown field");
        return None;
    };

    // TODO: decide whether a comma-separated value should become an IN match.
    if raw.contains(',') {
        tracing::debug!(key, raw, "comma in filter value, matching it as a single value");
    }

    let Some(value) = values::parse_value(raw, spec.value_type) else {
        tracing::debug!(key, raw, value_type = %spec.value_type, "ignoring filter with malformed value");
        return None;
    };

    let operator = operator.unwrap_or(FilterOperator::Eq);
    if !spec.allows(operator) {
        tracing::debug!(key, %operator, "ignoring filter with disallowed operator");
        return None;
    }

    Some(make_comparison(spec, operator, value))
}

/// Everything after the last `_` is an operator if it names one;
/// otherwise the whole key is the field name.
pub fn split_field_and_operator(key: &str) -> (&str, Option<FilterOperator>) {
    match key.rfind('_') {
        Some(index) if index > 0 => match FilterOperator::from_suffix(&key[index + 1..]) {
            Some(operator) => (&key[..index], Some(operator)),
            None => (key, None),
        },
        _ => (key, None),
    }
}

fn make_comparison(spec: &FieldSpec, operator: FilterOperator, value: Value) -> Predicate {
    let (operator, value) = match operator {
        FilterOperator::Eq => (ComparisonOperator::Equal, value),
        FilterOperator::Ne => (ComparisonOperator::NotEqual, value),
        FilterOperator::Gte => (ComparisonOperator::GreaterThanOrEqual, value),
        FilterOperator::Lte => (ComparisonOperator::LessThanOrEqual, value),
        FilterOperator::Like => (
            ComparisonOperator::ContainsInsensitive,
            Value::String(format!("%{}%", value.to_text())),
        ),
    };
    Predicate::Comparison {
        column: spec.column.clone(),
        column_type: spec.column_type.clone(),
        operator,
        value,
    }
}
