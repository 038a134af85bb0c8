//! Case-insensitive provider parameters.

use std::collections::HashMap;

/// Parameters parsed from the extended part of a provider reference.
///
/// Keys are lower-cased once on insertion, so every lookup is case-insensitive.
/// Later duplicates overwrite earlier ones.
///
/// # Examples
///
/// ```rust
/// use cloud_config_resolver::core::ParamStore;
///
/// let params = ParamStore::parse("Key=V&KEY=W");
/// assert_eq!(params.len(), 1);
/// assert_eq!(params.get("KEY"), Some("W"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamStore {
    values: HashMap<String, String>,
}

impl ParamStore {
    /// Create an empty parameter store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query-string-like token (`a=1&b=2`).
    ///
    /// A leading `?` and empty segments are ignored. A segment without `=`
    /// is stored with an empty value.
    pub fn parse(extended: &str) -> Self {
        let mut store = Self::new();
        let extended = extended.strip_prefix('?').unwrap_or(extended);

        for segment in extended.split('&') {
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            if key.is_empty() {
                continue;
            }
            store.set(key, value);
        }

        store
    }

    /// Insert or overwrite a parameter.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    /// Look up a parameter, ignoring key case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Look up a parameter, treating an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Whether a non-empty value exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get_non_empty(key).is_some()
    }

    /// Number of stored parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_last_duplicate_wins() {
        let params = ParamStore::parse("Key=V&KEY=W");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("key"), Some("W"));
        assert_eq!(params.get("KEY"), Some("W"));
    }

    #[test]
    fn test_leading_separators_ignored() {
        let params = ParamStore::parse("?&authentication=azure_default&label=prod");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("AUTHENTICATION"), Some("azure_default"));
        assert_eq!(params.get("label"), Some("prod"));
    }

    #[test]
    fn test_value_keeps_equals_signs() {
        let params = ParamStore::parse("azure_client_secret=abc==");
        assert_eq!(params.get("azure_client_secret"), Some("abc=="));
    }

    #[test]
    fn test_key_without_value() {
        let params = ParamStore::parse("flag&x=1");
        assert_eq!(params.get("flag"), Some(""));
        assert!(!params.contains("flag"));
        assert!(params.contains("x"));
    }

    #[test]
    fn test_set_lowercases_key() {
        let mut params = ParamStore::new();
        params.set("ObjServerName", "host");
        assert_eq!(params.get("objservername"), Some("host"));
    }

    #[test]
    fn test_empty_input() {
        assert!(ParamStore::parse("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_lookup_ignores_case(key in "[A-Za-z_]{1,16}", value in "[A-Za-z0-9]{0,16}") {
            let params = ParamStore::parse(&format!("{}={}", key, value));
            prop_assert_eq!(params.get(&key.to_uppercase()), Some(value.as_str()));
            prop_assert_eq!(params.get(&key.to_lowercase()), Some(value.as_str()));
        }
    }
}
