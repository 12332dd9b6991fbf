//! Resolve the requested row order.

use super::params::{QueryParams, ORDER, SORT};
use super::request::SortEntry;
use query_engine_metadata::metadata::{QueryConfiguration, SortDirection};

/// Translate `_sort` / `_order` into sort entries over sortable fields.
/// Without a `_sort`, the configuration's default order applies.
pub fn resolve_sort_order(
    params: &QueryParams,
    configuration: &QueryConfiguration,
) -> Vec<SortEntry> {
    let requested = split_list(params.get(SORT));
    if requested.is_empty() {
        return default_sort_order(configuration);
    }

    let orders: Vec<String> = split_list(params.get(ORDER))
        .into_iter()
        .map(|order| order.to_lowercase())
        .collect();

    requested
        .iter()
        .enumerate()
        .filter_map(|(index, field)| {
            let Some(spec) = configuration.lookup_field(field) else {
                tracing::debug!(field = %field, "ignoring sort on unknown field");
                return None;
            };
            if !spec.sortable {
                tracing::debug!(field = %field, "ignoring sort on unsortable field");
                return None;
            }
            // positions are those of the request, skipped fields included.
            let direction = orders
                .get(index)
                .or_else(|| orders.first())
                .map_or(SortDirection::Asc, |order| direction_from_str(order));
            Some(SortEntry {
                column: spec.column.clone(),
                direction,
            })
        })
        .collect()
}

/// The configured default order, keeping only entries naming known fields.
/// Sortability is not checked here, and entries without an order sort
/// descending.
fn default_sort_order(configuration: &QueryConfiguration) -> Vec<SortEntry> {
    configuration
        .default_sort
        .iter()
        .filter_map(|default| {
            let spec = configuration.lookup_field(&default.field);
            if spec.is_none() {
                tracing::debug!(field = %default.field, "ignoring default sort on unknown field");
            }
            spec.map(|spec| SortEntry {
                column: spec.column.clone(),
                direction: default.order.unwrap_or(SortDirection::Desc),
            })
        })
        .collect()
}

/// Only `desc` sorts descending.
fn direction_from_str(order: &str) -> SortDirection {
    if order == "desc" {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    }
}

/// Split a comma-separated control value, dropping empty pieces.
fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(ToString::to_string)
        .collect()
}
