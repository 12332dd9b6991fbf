//! Resolve the `LIMIT`/`OFFSET` window of a list request.

use super::params::{QueryParams, END, LIMIT, PAGE, START};

/// Page size used when the request does not bound the window itself.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// A bounded window of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Window {
    fn default() -> Self {
        Window {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// The first matching rule wins:
///
/// 1. `_start` and `_end`, both non-negative: rows `[_start, _end)`.
/// 2. `_page` and `_limit`: page numbers start at 1.
/// 3. `_limit` alone: the first `_limit` rows.
/// 4. The default page size from the first row.
///
/// `_start` without `_end` does not move the offset.
pub fn resolve_window(params: &QueryParams) -> Window {
    let start = control_number(params, START);
    let end = control_number(params, END);
    let page = control_number(params, PAGE);
    let page_size = control_number(params, LIMIT);

    match (start, end, page, page_size) {
        (Some(start), Some(end), _, _) if start >= 0 && end >= 0 => Window {
            limit: non_negative(end.saturating_sub(start)),
            offset: non_negative(start),
        },
        (_, _, Some(page), Some(page_size)) => Window {
            limit: non_negative(page_size),
            offset: non_negative(page.saturating_sub(1).saturating_mul(page_size)),
        },
        (_, _, _, Some(page_size)) => Window {
            limit: non_negative(page_size),
            offset: 0,
        },
        _ => Window::default(),
    }
}

/// A control value that reads as an integer. Empty or malformed values
/// count as absent, and so do decimal or exponent spellings such as `10.0`
/// and `1e2` that a looser numeric conversion would accept.
fn control_number(params: &QueryParams, key: &str) -> Option<i64> {
    let raw = params.get(key)?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(number) => Some(number),
        Err(_) => {
            tracing::debug!(key, raw, "ignoring malformed pagination value");
            None
        }
    }
}

fn non_negative(number: i64) -> u64 {
    u64::try_from(number).unwrap_or(0)
}
