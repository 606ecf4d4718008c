use std::collections::BTreeMap;

/// Flat key/value request parameters.
///
/// Keys are unique; setting a key again replaces its value, which is what
/// gives the three-layer merge (defaults, per-call, overrides) its
/// last-writer-wins precedence. A `BTreeMap` keeps iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Merge `other` into `self`; values from `other` win.
    pub fn merge(&mut self, other: &Params) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrowed pairs in a shape `reqwest` can serialize as a query string or
    /// form body.
    pub fn as_pairs(&self) -> Vec<(&str, &str)> {
        self.iter().collect()
    }

    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.0
            .keys()
            .filter(move |k| k.starts_with(prefix))
            .map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Params(iter.into_iter().collect())
    }
}

/// Build a [`Params`] from literal pairs.
#[macro_export]
macro_rules! params {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut p = $crate::params::Params::new();
        $(p.set($key, $value);)*
        p
    }};
}
