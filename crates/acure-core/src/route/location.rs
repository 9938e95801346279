//! Hash-fragment parsing.
//!
//! Turns `#/path?k=v&k2=v2` into a [`ParsedLocation`]. Parsing never fails;
//! malformed input degrades to a best-effort result.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use url::form_urlencoded;

/// Query parameters in first-seen key order, last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, String)>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair. A repeated key keeps its original position and takes
    /// the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the map back into a `k=v&k2=v2` query string.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.entries.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for QueryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A hash route split into its path and query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLocation {
    pub path: String,
    pub query: QueryMap,
}

impl ParsedLocation {
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
            query: QueryMap::new(),
        }
    }
}

/// Parses a raw hash string such as `""`, `"#/"` or `"#/result?scanId=42"`.
///
/// The leading `#` is optional. The path is everything before the first `?`
/// (defaulting to `/`), the query is decoded with form-urlencoded rules.
pub fn parse_location(hash: &str) -> ParsedLocation {
    let clean = hash.strip_prefix('#').unwrap_or(hash);

    if clean.is_empty() || clean == "/" {
        return ParsedLocation::root();
    }

    let (path, query_string) = match clean.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (clean, None),
    };

    let query = query_string
        .map(|qs| {
            form_urlencoded::parse(qs.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    ParsedLocation {
        path: if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        },
        query,
    }
}

/// Normalizes a navigation target into a `#`-prefixed hash string.
pub fn to_hash(target: &str) -> String {
    if target.starts_with('#') {
        target.to_string()
    } else {
        format!("#{}", target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_root_hashes() {
        for input in ["", "#", "#/", "/"] {
            let parsed = parse_location(input);
            assert_eq!(parsed.path, "/", "input {:?}", input);
            assert!(parsed.query.is_empty());
        }
    }

    #[test]
    fn test_path_without_query_is_hash_sans_prefix() {
        for (input, path) in [
            ("#/dashboard", "/dashboard"),
            ("#/article-detail", "/article-detail"),
            ("/history", "/history"),
            ("#weird", "weird"),
        ] {
            let parsed = parse_location(input);
            assert_eq!(parsed.path, path);
            assert!(parsed.query.is_empty());
        }
    }

    #[test]
    fn test_result_with_scan_id() {
        let parsed = parse_location("#/result?scanId=42");
        assert_eq!(parsed.path, "/result");
        assert_eq!(parsed.query.get("scanId"), Some("42"));
        assert_eq!(parsed.query.len(), 1);
    }

    #[test]
    fn test_duplicate_keys_last_value_wins() {
        let parsed = parse_location("#/x?a=1&b=2&a=3");
        assert_eq!(parsed.query.get("a"), Some("3"));
        let keys: Vec<_> = parsed.query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_values_are_url_decoded() {
        let parsed = parse_location("#/article-detail?slug=cystic%20acne&q=a+b");
        assert_eq!(parsed.query.get("slug"), Some("cystic acne"));
        assert_eq!(parsed.query.get("q"), Some("a b"));
    }

    #[test]
    fn test_empty_path_before_query_defaults_to_root() {
        let parsed = parse_location("#?scanId=7");
        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.query.get("scanId"), Some("7"));
    }

    #[test]
    fn test_malformed_query_degrades() {
        let parsed = parse_location("#/result?&&flag&bad=%zz");
        assert_eq!(parsed.query.get("flag"), Some(""));
        assert_eq!(parsed.query.get("bad"), Some("%zz"));
    }

    #[test]
    fn test_to_hash_prefixes_once() {
        assert_eq!(to_hash("/login"), "#/login");
        assert_eq!(to_hash("#/login"), "#/login");
    }
}
