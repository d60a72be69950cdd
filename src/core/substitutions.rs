//! Configured literal substitutions
//!
//! An ordered list of `token -> replacement` pairs applied to every rendered
//! name tag. Order is the order the pairs appear in the config document, and
//! each pair is applied to the output of the previous one, so a replacement
//! may itself be rewritten by a later entry.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiSubstitutions {
    entries: Vec<(String, String)>,
}

impl ApiSubstitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
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

    /// Replace every literal occurrence of each key, in insertion order.
    ///
    /// Empty keys are ignored.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (key, value) in &self.entries {
            if key.is_empty() || !out.contains(key.as_str()) {
                continue;
            }
            out = out.replace(key.as_str(), value);
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ApiSubstitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Self::new();
        for (k, v) in iter {
            subs.insert(k, v);
        }
        subs
    }
}

impl Serialize for ApiSubstitutions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct SubstitutionsVisitor;

impl<'de> Visitor<'de> for SubstitutionsVisitor {
    type Value = ApiSubstitutions;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of literal token to replacement string")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut subs = ApiSubstitutions::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            subs.insert(key, value);
        }
        Ok(subs)
    }
}

impl<'de> Deserialize<'de> for ApiSubstitutions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SubstitutionsVisitor)
    }
}
