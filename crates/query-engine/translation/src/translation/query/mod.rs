//! Translate the query string of a list request.

pub mod filtering;
pub mod pagination;
pub mod params;
pub mod request;
pub mod sorting;
pub mod values;

pub use params::QueryParams;
pub use request::{ComparisonOperator, ParsedRequest, Predicate, SortEntry, Value};

use query_engine_metadata::metadata::QueryConfiguration;

/// Translate query-string parameters into filter, sort and pagination
/// for a single table.
///
/// Nothing here fails: fragments naming unknown fields, disallowed
/// operators or malformed values are dropped. `extra_predicates` are
/// always part of the resulting conjunction.
pub fn parse(
    params: &QueryParams,
    configuration: &QueryConfiguration,
    extra_predicates: Vec<Predicate>,
) -> ParsedRequest {
    let window = pagination::resolve_window(params);

    let request = ParsedRequest {
        predicate: filtering::resolve_predicate(params, configuration, extra_predicates),
        sort_order: sorting::resolve_sort_order(params, configuration),
        limit: window.limit,
        offset: window.offset,
    };

    tracing::debug!(?request, "parsed list request");
    request
}
