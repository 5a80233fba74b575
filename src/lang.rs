//! Message templates for load diagnostics.
//!
//! Templates are addressed by dotted keys and carry `{placeholder}` tokens
//! that are filled from a [`Replacements`] list at translation time.

use crate::ConfigError;
use std::collections::HashMap;

/// Tag prefixed to every diagnostic line written by the loader.
pub const LOG_TAG: &str = "[ChatEmojis]";

const ENGLISH: &[(&str, &str)] = &[
    ("error.load.emoji", "Failed to load emoji '{emoji}': {message}"),
    ("error.load.group", "Failed to load emoji group '{emojigroup}': {message}"),
    ("error.emojigroup.name.empty", "the name '{key}' is empty once normalised"),
    ("error.emojigroup.name.invalid", "no valid name could be read from '{key}'"),
    ("group.permission.description", "Permission to use all emojis listed in '{name}'"),
    ("emoji.permission.description", "Permission to use the '{name}' emoji"),
];

/// Ordered placeholder values used to fill a template.
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder value. A later value for the same placeholder wins.
    pub fn add(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pairs.push((placeholder.into(), value.into()));
        self
    }

    /// Builder form of [`Replacements::add`].
    pub fn with(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(placeholder, value);
        self
    }

    fn get(&self, placeholder: &str) -> Option<&str> {
        self.pairs.iter().rev().find(|(k, _)| k == placeholder).map(|(_, v)| v.as_str())
    }
}

/// A table of message templates.
#[derive(Debug, Clone)]
pub struct Lang {
    messages: HashMap<String, String>,
}

impl Default for Lang {
    fn default() -> Self {
        Self::english()
    }
}

impl Lang {
    /// The built-in English templates.
    pub fn english() -> Self {
        let messages = ENGLISH.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Self { messages }
    }

    /// Override (or add) the template stored under `key`.
    pub fn set(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(key.into(), template.into());
    }

    /// Fill the template stored under `key`.
    ///
    /// An unknown key translates to the key itself, and placeholders without a
    /// replacement are left in place.
    pub fn translate(&self, key: &str, replacements: &Replacements) -> String {
        let Some(template) = self.messages.get(key) else {
            return key.to_string();
        };

        crate::regex!(r"\{([A-Za-z0-9_-]+)\}")
            .replace_all(template, |caps: &regex::Captures<'_>| match replacements.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// The message for a load error, translated where a template exists.
    pub fn describe(&self, err: &ConfigError) -> String {
        let (template, key) = match err {
            ConfigError::EmptyName { key } => ("error.emojigroup.name.empty", key),
            ConfigError::InvalidName { key } => ("error.emojigroup.name.invalid", key),
            _ => return err.to_string(),
        };
        self.translate(template, &Replacements::new().with("key", key.as_str()))
    }
}
