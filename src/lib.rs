//! Hierarchical emoticon → emoji substitution.
//!
//! A nested YAML configuration is turned into a tree of emoji groups. Every
//! group and every emoji carries a dotted permission (`chatemojis.use.…`)
//! inherited from its parent group, and chat text is rewritten by cascading
//! through the tree, applying only the emojis a requester may use.
//!
//! ```
//! use chatemojis::{Catalog, ConfigSection, Subject};
//!
//! let config = ConfigSection::from_yaml_str(
//!     "faces:\n  smile:\n    emoticons: [':)']\n    emojis: ['🙂']\n",
//! )
//! .unwrap();
//! let catalog = Catalog::load(&config);
//!
//! let alex = Subject::new("alex").grant("chatemojis.use.faces.*");
//! assert_eq!(catalog.parse(&alex, "", "hi :)", false), "hi 🙂");
//! ```

#[macro_use]
mod macros;
mod api;
mod catalog;
mod config;
mod emoji;
mod error;
pub mod lang;
pub mod permission;

pub use api::Catalog;
pub use catalog::{EmojiTree, Entry, EntryKind, Group, GroupId, GroupNode, LoadWarning, RESERVED_NAMES};
pub use config::{ConfigSection, Settings};
pub use emoji::{DisplayItem, Emoji};
pub use error::ConfigError;
pub use permission::{Permission, PermissionDefault, PermissionTable, Requester, Subject};

// --- Names -------------------------------------------------------------------

/// Turn a configuration key into a node name.
///
/// The final dotted segment of `key` is taken, runs of `_`/whitespace become a
/// single `-`, anything outside `[0-9A-Za-z-]` is dropped and leading or
/// trailing hyphens are trimmed.
pub(crate) fn normalize_name(key: &str) -> Result<String, ConfigError> {
    let segment = regex!(r"([^.]+)$")
        .captures(key)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| ConfigError::InvalidName { key: key.to_string() })?;

    let collapsed = regex!(r"[_\s]+").replace_all(segment.as_str(), "-");
    let cleaned = regex!(r"[^0-9a-zA-Z-]").replace_all(&collapsed, "");
    let name = cleaned.trim_matches('-');

    if name.is_empty() {
        return Err(ConfigError::EmptyName { key: key.to_string() });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized() {
        let cases = vec![
            ("smile", "smile"),
            ("Big_Smile", "Big-Smile"),
            ("big  __ smile", "big-smile"),
            ("héllo wörld!", "hllo-wrld"),
            ("faces.cats", "cats"),
            ("_edge_", "edge"),
            ("7", "7"),
        ];
        for (key, expected) in cases {
            assert_eq!(normalize_name(key).unwrap(), expected, "key {key:?}");
        }
    }

    #[test]
    fn bad_names_are_rejected() {
        for key in ["___", "!!!", " ", "-"] {
            assert!(matches!(normalize_name(key), Err(ConfigError::EmptyName { .. })), "key {key:?}");
        }
        for key in ["", "faces."] {
            assert!(matches!(normalize_name(key), Err(ConfigError::InvalidName { .. })), "key {key:?}");
        }
    }
}
