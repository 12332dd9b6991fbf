//! The decoded query string of a list request.

/// Query-string keys that control pagination and sorting rather than
/// naming a filterable field.
pub const START: &str = "_start";
pub const END: &str = "_end";
pub const SORT: &str = "_sort";
pub const ORDER: &str = "_order";
pub const PAGE: &str = "_page";
pub const LIMIT: &str = "_limit";

pub const RESERVED_KEYS: [&str; 6] = [START, END, SORT, ORDER, PAGE, LIMIT];

/// A multi-valued mapping from query-string keys to values.
/// Pairs are kept in the order they arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Decode an `application/x-www-form-urlencoded` query string.
    /// A leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// The first value supplied for a key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every key/value pair, including repeated keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_reserved(key: &str) -> bool {
        RESERVED_KEYS.contains(&key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QueryParams(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
