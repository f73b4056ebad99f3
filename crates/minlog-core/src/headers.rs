//! Read-only access to inbound request headers.
//!
//! Header sources are multi-valued; a lookup resolves to the most recently
//! added value, the way an integration host's header multi-map answers `get`.

use axum::http::HeaderMap;
use std::collections::{BTreeMap, HashMap};

/// Lookup of the most recently added value for a header name.
pub trait HeaderLookup {
    fn latest(&self, name: &str) -> Option<&str>;
}

impl HeaderLookup for HeaderMap {
    /// Values that are not visible ASCII are treated as absent.
    fn latest(&self, name: &str) -> Option<&str> {
        self.get_all(name).iter().last().and_then(|v| v.to_str().ok())
    }
}

impl HeaderLookup for HashMap<String, String> {
    fn latest(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl HeaderLookup for HashMap<String, Vec<String>> {
    fn latest(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|values| values.last()).map(String::as_str)
    }
}

impl HeaderLookup for BTreeMap<String, String> {
    fn latest(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: HeaderLookup + ?Sized> HeaderLookup for &T {
    fn latest(&self, name: &str) -> Option<&str> {
        (**self).latest(name)
    }
}

/// Case-insensitive, multi-valued header collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundHeaders {
    values: BTreeMap<String, Vec<String>>,
}

impl InboundHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs; repeated names accumulate values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = Self::new();
        for (name, value) in pairs {
            headers.append(name.as_ref(), value);
        }
        headers
    }

    /// Append a value, keeping any earlier values for the same name.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Builder-style append.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// All values recorded for a header name.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl HeaderLookup for InboundHeaders {
    fn latest(&self, name: &str) -> Option<&str> {
        self.get_all(name).last().map(String::as_str)
    }
}

impl From<&HeaderMap> for InboundHeaders {
    fn from(map: &HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map {
            if let Ok(value) = value.to_str() {
                headers.append(name.as_str(), value);
            }
        }
        headers
    }
}
