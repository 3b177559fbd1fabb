//! Cache key derivation and query parameter handling.

use std::fmt::Display;

// == Query Params ==
/// Ordered list of query parameters.
///
/// The same value feeds both the upstream URL and the cache key, so a
/// parameter that is skipped here is skipped in both places.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.pairs.push((name.into(), value.to_string()));
        self
    }

    /// Appends a parameter only when a value is present.
    pub fn push_opt<V: Display>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(name, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Parameters in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(QueryParams::new(), |params, (k, v)| params.push(k, v))
    }
}

// == Derive Key ==
/// Builds a cache key from a namespace and a parameter set.
///
/// Parameters are sorted by name and joined as `name=value` pairs with `&`,
/// so insertion order never affects the key. Without parameters the key is
/// just `base`.
pub fn derive_key(base: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        return base.to_string();
    }

    let mut sorted: Vec<&(String, String)> = params.pairs.iter().collect();
    sorted.sort();

    let joined = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, joined)
}
