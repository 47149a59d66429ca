//! String-keyed configuration of concrete functions.
//!
//! A [`Configuration`] maps keys to strings, and typed values are obtained through [`FromStr`]. Lists
//! are written as `[a b c]`, with commas or semicolons as alternative separators, so that
//! `[0.0 1.0]`, `0.0, 1.0` and `0.0;1.0` all describe the same list.
use crate::error::FunctionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.entries.insert(key.into(), value.to_string())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The raw string stored for `key`.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Parses the value of `key`.
    pub fn get<V: FromStr>(&self, key: &str) -> Result<V, FunctionError> {
        let raw = self
            .get_raw(key)
            .ok_or_else(|| FunctionError::invalid_configuration(key, "missing key"))?;
        parse_entry(key, raw.trim())
    }

    /// Parses the value of `key`, or returns `default` if the key is missing.
    ///
    /// A present but malformed value is still an error.
    pub fn get_or<V: FromStr>(&self, key: &str, default: V) -> Result<V, FunctionError> {
        if self.has_key(key) {
            self.get(key)
        } else {
            Ok(default)
        }
    }

    /// Parses the value of `key` as a list.
    pub fn get_list<V: FromStr>(&self, key: &str) -> Result<Vec<V>, FunctionError> {
        let raw = self
            .get_raw(key)
            .ok_or_else(|| FunctionError::invalid_configuration(key, "missing key"))?;
        let raw = raw.trim();
        let inner = raw
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(raw);
        inner
            .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
            .filter(|item| !item.is_empty())
            .map(|item| parse_entry(key, item))
            .collect()
    }

    /// Parses the value of `key` as a list with exactly `len` entries.
    pub fn get_list_of_len<V: FromStr>(&self, key: &str, len: usize) -> Result<Vec<V>, FunctionError> {
        let list = self.get_list(key)?;
        if list.len() == len {
            Ok(list)
        } else {
            Err(FunctionError::invalid_configuration(
                key,
                format!("expected {len} entries, got {}", list.len()),
            ))
        }
    }

    /// Entries of `other` take precedence.
    pub fn merged(&self, other: &Configuration) -> Configuration {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.clone());
        Self { entries }
    }
}

fn parse_entry<V: FromStr>(key: &str, raw: &str) -> Result<V, FunctionError> {
    raw.parse()
        .map_err(|_| FunctionError::invalid_configuration(key, format!("unable to parse '{raw}'")))
}

impl Display for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key} = {value}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.to_string()))
            .collect();
        Self { entries }
    }
}
