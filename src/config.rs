//! Order-preserving configuration sections.
//!
//! A [`ConfigSection`] is a YAML mapping plus the dotted path it was reached
//! through. Keys are enumerated in document order, which the catalog relies
//! on for deterministic substitution precedence.

use crate::ConfigError;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// A nested mapping from the configuration document.
#[derive(Debug, Clone, Default)]
pub struct ConfigSection {
    path: String,
    values: Mapping,
}

impl ConfigSection {
    /// Parse a YAML document into its root section.
    ///
    /// An empty document yields an empty root; any other non-mapping
    /// document is rejected.
    pub fn from_yaml_str(src: &str) -> Result<Self, ConfigError> {
        match serde_yaml::from_str::<Value>(src)? {
            Value::Null => Ok(Self::default()),
            Value::Mapping(values) => Ok(Self::from_mapping(values)),
            _ => Err(ConfigError::NotASection { path: String::new() }),
        }
    }

    /// Read and parse a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml_str(&src)
    }

    /// Wrap an already materialised mapping as a root section.
    pub fn from_mapping(values: Mapping) -> Self {
        Self { path: String::new(), values }
    }

    /// Dotted path of this section; empty for the root.
    pub fn current_path(&self) -> &str {
        &self.path
    }

    /// Final segment of [`current_path`](Self::current_path), if any.
    pub fn name(&self) -> Option<&str> {
        if self.path.is_empty() { None } else { self.path.rsplit('.').next() }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Immediate keys in document order. Non-scalar keys are skipped.
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().filter_map(scalar_to_string).collect()
    }

    /// Immediate entries in document order, each with its nested section when
    /// the value is a mapping.
    ///
    /// Keys that render to the same string (`1` and `'1'`) stay separate
    /// entries, each carrying its own value.
    pub fn entries(&self) -> Vec<(String, Option<ConfigSection>)> {
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let key = scalar_to_string(key)?;
                let section = match value {
                    Value::Mapping(values) => Some(self.child(&key, values.clone())),
                    _ => None,
                };
                Some((key, section))
            })
            .collect()
    }

    /// True when any immediate key, lowercased, matches `pattern`.
    pub fn has_key_matching(&self, pattern: &Regex) -> bool {
        self.keys().iter().any(|k| pattern.is_match(&k.to_lowercase()))
    }

    /// The nested section stored under `key`, if that value is a mapping.
    pub fn section(&self, key: &str) -> Option<ConfigSection> {
        match self.get(key)? {
            Value::Mapping(values) => Some(self.child(key, values.clone())),
            _ => None,
        }
    }

    fn child(&self, key: &str, values: Mapping) -> ConfigSection {
        let path = if self.path.is_empty() { key.to_string() } else { format!("{}.{}", self.path, key) };
        ConfigSection { path, values }
    }

    /// A scalar value rendered as a string.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }

    /// A scalar or a sequence of scalars, rendered as strings.
    ///
    /// Missing keys and non-scalar items produce nothing.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// First key (in document order) whose lowercased form matches `pattern`.
    pub fn find_key(&self, pattern: &Regex) -> Option<String> {
        self.keys().into_iter().find(|k| pattern.is_match(&k.to_lowercase()))
    }

    /// Deserialize the section under `key`, or `T::default()` when absent.
    pub fn deserialize<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(Value::Mapping(values)) => Ok(serde_yaml::from_value(Value::Mapping(values.clone()))?),
            Some(Value::Null) | None => Ok(T::default()),
            Some(_) => Err(ConfigError::NotASection { path: key.to_string() }),
        }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| scalar_to_string(k).as_deref() == Some(key)).map(|(_, v)| v)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Values read from the reserved `settings` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Formatting value restored after every inserted emoji.
    pub reset_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self { reset_marker: "§r".to_string() }
    }
}

impl Settings {
    /// Read the `settings` section of a root configuration.
    pub fn from_root(root: &ConfigSection) -> Result<Self, ConfigError> {
        let key = root.keys().into_iter().find(|k| k.eq_ignore_ascii_case("settings"));
        match key {
            Some(key) => root.deserialize(&key),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
settings:
  reset-marker: "&f"
zeta:
  a: 1
alpha:
  inner:
    emoticons: [":)", ":-)"]
    emoji: "🙂"
1: numeric
"#;

    #[test]
    fn keys_keep_document_order() {
        let root = ConfigSection::from_yaml_str(DOC).unwrap();
        assert_eq!(root.keys(), vec!["settings", "zeta", "alpha", "1"]);
        assert_eq!(root.current_path(), "");
        assert_eq!(root.name(), None);
    }

    #[test]
    fn nested_sections_track_their_path() {
        let root = ConfigSection::from_yaml_str(DOC).unwrap();
        let inner = root.section("alpha").and_then(|s| s.section("inner")).unwrap();
        assert_eq!(inner.current_path(), "alpha.inner");
        assert_eq!(inner.name(), Some("inner"));
        assert_eq!(inner.get_string_list("emoticons"), vec![":)", ":-)"]);
        assert_eq!(inner.get_string_list("emoji"), vec!["🙂"]);
        assert!(inner.get_string_list("missing").is_empty());
        assert!(root.section("1").is_none());
        assert_eq!(root.get_string("1").as_deref(), Some("numeric"));
    }

    #[test]
    fn entries_keep_keys_with_the_same_rendering_apart() {
        let root = ConfigSection::from_yaml_str("1: {a: x}\n'1': {b: y}\nnote: text\n").unwrap();
        let entries = root.entries();

        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["1", "1", "note"]);
        assert_eq!(entries[0].1.as_ref().and_then(|s| s.get_string("a")).as_deref(), Some("x"));
        assert_eq!(entries[1].1.as_ref().and_then(|s| s.get_string("b")).as_deref(), Some("y"));
        assert_eq!(entries[1].1.as_ref().map(|s| s.current_path()), Some("1"));
        assert!(entries[2].1.is_none());
    }

    #[test]
    fn key_matching_is_case_insensitive() {
        let root = ConfigSection::from_yaml_str("Emoticons: x\nEMOJI: y\n").unwrap();
        assert!(root.has_key_matching(crate::regex!("^emoticons?$")));
        assert!(root.has_key_matching(crate::regex!("^emojis?$")));
        assert_eq!(root.find_key(crate::regex!("^emojis?$")).as_deref(), Some("EMOJI"));
    }

    #[test]
    fn empty_and_scalar_documents() {
        assert!(ConfigSection::from_yaml_str("").unwrap().is_empty());
        assert!(matches!(ConfigSection::from_yaml_str("- a\n- b\n"), Err(ConfigError::NotASection { .. })));
        assert!(matches!(ConfigSection::from_yaml_str("a: [unclosed"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn settings_are_read_with_defaults() {
        let root = ConfigSection::from_yaml_str(DOC).unwrap();
        assert_eq!(Settings::from_root(&root).unwrap().reset_marker, "&f");

        let bare = ConfigSection::from_yaml_str("Settings: {}\n").unwrap();
        assert_eq!(Settings::from_root(&bare).unwrap().reset_marker, "§r");
    }
}
