//! Recursive tree construction from configuration sections.
//!
//! Each section is walked key by key. A key whose section has both an
//! `emoticon(s)` and an `emoji(s)` key (case-insensitive) is an emoji
//! definition; any other nested section is a sub-group. Scalars are ignored
//! and reserved keys are skipped at every depth.
//!
//! A failing entry is logged once and skipped: one malformed emoji or group
//! never stops its siblings, or anything above it, from loading.

use super::group::{EmojiTree, GroupId, GroupNode};
use crate::lang::{LOG_TAG, Lang, Replacements};
use crate::permission::{Permission, PermissionDefault, PermissionTable};
use crate::{ConfigError, ConfigSection, Emoji, normalize_name};
use std::fmt;

/// Keys that never become a group or an emoji.
pub const RESERVED_NAMES: &[&str] = &["settings"];

/// What kind of entry a [`LoadWarning`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Emoji,
    Group,
}

/// A configuration entry that was skipped while building.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    pub kind: EntryKind,
    /// The offending key, as written in the configuration.
    pub key: String,
    /// Full dotted path of the offending section.
    pub path: String,
    pub message: String,
    /// The diagnostic line that was logged.
    pub line: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

pub(crate) struct TreeBuilder<'l> {
    groups: Vec<GroupNode>,
    permissions: PermissionTable,
    warnings: Vec<LoadWarning>,
    lang: &'l Lang,
}

impl<'l> TreeBuilder<'l> {
    pub(crate) fn new(lang: &'l Lang) -> Self {
        Self { groups: Vec::new(), permissions: PermissionTable::new(), warnings: Vec::new(), lang }
    }

    pub(crate) fn build_root(mut self, section: &ConfigSection) -> EmojiTree {
        let root = self.insert(GroupNode::root(), None);
        self.populate(root, section);

        log::debug!(
            "built emoji tree: {} groups, {} permissions, {} skipped entries",
            self.groups.len(),
            self.permissions.len(),
            self.warnings.len()
        );
        EmojiTree { groups: self.groups, permissions: self.permissions, warnings: self.warnings }
    }

    /// Build the group stored under `key` below `parent`.
    ///
    /// Fails before anything is inserted when the key yields no valid name.
    fn build(&mut self, parent: GroupId, key: &str, section: &ConfigSection) -> Result<GroupId, ConfigError> {
        let name = normalize_name(key)?;
        let parent_names = self.parent_names(parent, &name);

        let id = self.insert(GroupNode::child(name, parent, parent_names), Some(parent));
        self.populate(id, section);
        Ok(id)
    }

    /// Names from the outermost named ancestor down to `name`.
    fn parent_names(&self, parent: GroupId, name: &str) -> Vec<String> {
        let mut names = vec![name.to_string()];
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            let node = &self.groups[id];
            if let Some(ancestor) = &node.name {
                names.push(ancestor.clone());
            }
            cursor = node.parent;
        }
        names.reverse();
        names
    }

    fn insert(&mut self, node: GroupNode, parent: Option<GroupId>) -> GroupId {
        let label = node.name.as_deref().unwrap_or("default");
        let description =
            self.lang.translate("group.permission.description", &Replacements::new().with("name", label));

        let mut permission =
            Permission::new(&node.permission).with_default(PermissionDefault::Op).with_description(description);
        if let Some(parent) = parent {
            permission = permission.with_parent(&self.groups[parent].permission, true);
        }

        log::debug!("registered group '{}' as {}", label, node.permission);
        self.permissions.register(permission);
        self.groups.push(node);
        self.groups.len() - 1
    }

    fn populate(&mut self, id: GroupId, section: &ConfigSection) {
        for (key, sub) in section.entries() {
            if is_reserved(&key) {
                continue;
            }
            let Some(sub) = sub else {
                continue;
            };

            if is_emoji_definition(&sub) {
                match Emoji::init(&self.groups[id], &key, &sub, &mut self.permissions, self.lang) {
                    Ok(emoji) => self.groups[id].emojis.push(emoji),
                    Err(err) => self.warn(EntryKind::Emoji, &key, &sub, &err),
                }
            } else {
                match self.build(id, &key, &sub) {
                    Ok(child) => self.groups[id].children.push(child),
                    Err(err) => self.warn(EntryKind::Group, &key, &sub, &err),
                }
            }
        }
    }

    fn warn(&mut self, kind: EntryKind, key: &str, section: &ConfigSection, err: &ConfigError) {
        let (template, placeholder) = match kind {
            EntryKind::Emoji => ("error.load.emoji", "emoji"),
            EntryKind::Group => ("error.load.group", "emojigroup"),
        };
        let message = self.lang.describe(err);
        let replacements = Replacements::new().with(placeholder, key).with("message", &message);
        let line = format!("{} {}", LOG_TAG, self.lang.translate(template, &replacements));

        log::warn!("{line}");
        self.warnings.push(LoadWarning {
            kind,
            key: key.to_string(),
            path: section.current_path().to_string(),
            message,
            line,
        });
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_NAMES.iter().any(|reserved| reserved.eq_ignore_ascii_case(key))
}

fn is_emoji_definition(section: &ConfigSection) -> bool {
    section.has_key_matching(crate::regex!("^emoticons?$")) && section.has_key_matching(crate::regex!("^emojis?$"))
}
