//! Depth-first walks over the group tree.
//!
//! Both substitution and listing visit child groups first, in configuration
//! order, then the group's own emojis:
//!
//! ```text
//! root
//!  ├─ faces            (1) faces.cats → (2) faces' emojis
//!  │   └─ cats
//!  └─ hearts           (3) hearts' emojis
//!                      (4) root's emojis
//! ```
//!
//! Substitution is a left fold: the output of one emoji is the input of the
//! next, so when two emojis could match the same text the one visited first
//! takes it.

use super::group::{EmojiTree, Group};
use crate::permission::Requester;
use crate::{DisplayItem, Emoji};
use std::borrow::Cow;

/// An immediate member of a group.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Group(Group<'a>),
    Emoji(&'a Emoji),
}

impl<'a> Entry<'a> {
    /// `None` only for the root group, which never appears as an entry.
    pub fn name(&self) -> Option<&'a str> {
        match self {
            Entry::Group(group) => group.name(),
            Entry::Emoji(emoji) => Some(emoji.name()),
        }
    }

    pub fn permission(&self) -> &'a str {
        match self {
            Entry::Group(group) => group.permission(),
            Entry::Emoji(emoji) => emoji.permission(),
        }
    }
}

impl<'a> Group<'a> {
    /// Substitute every emoji in this group and below that `requester` may use.
    ///
    /// With `forced` set, permissions are not consulted. `reset` is inserted
    /// after every emoji untouched.
    pub fn parse(&self, requester: &dyn Requester, reset: &str, text: &str, forced: bool) -> String {
        self.parse_owned(requester, reset, text.to_string(), forced)
    }

    fn parse_owned(&self, requester: &dyn Requester, reset: &str, text: String, forced: bool) -> String {
        let text = self.groups().fold(text, |text, group| group.parse_owned(requester, reset, text, forced));

        let permissions = &self.tree.permissions;
        self.emojis().iter().fold(text, |text, emoji| {
            let replaced = match emoji.parse(permissions, requester, reset, &text, forced) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            replaced.unwrap_or(text)
        })
    }

    /// Listing entries for this group and below, sub-groups first.
    pub fn display_items(&self, requester: &dyn Requester) -> Vec<DisplayItem> {
        let mut items = Vec::new();
        self.collect_display_items(requester, &mut items);
        items
    }

    fn collect_display_items(&self, requester: &dyn Requester, items: &mut Vec<DisplayItem>) {
        for group in self.groups() {
            group.collect_display_items(requester, items);
        }
        for emoji in self.emojis() {
            items.extend(emoji.display_items(&self.tree.permissions, requester));
        }
    }

    /// Visit every immediate child group, then every immediate emoji.
    ///
    /// Not recursive; callers that need the whole subtree recurse through
    /// [`Entry::Group`] themselves.
    pub fn for_each(&self, mut action: impl FnMut(Entry<'a>)) {
        for group in self.groups() {
            action(Entry::Group(group));
        }
        for emoji in self.emojis() {
            action(Entry::Emoji(emoji));
        }
    }
}

impl EmojiTree {
    /// [`Group::parse`] from the root.
    pub fn parse(&self, requester: &dyn Requester, reset: &str, text: &str, forced: bool) -> String {
        self.root().parse(requester, reset, text, forced)
    }

    /// [`Group::display_items`] from the root.
    pub fn display_items(&self, requester: &dyn Requester) -> Vec<DisplayItem> {
        self.root().display_items(requester)
    }
}
