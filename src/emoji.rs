//! Leaf substitution rules.
//!
//! An [`Emoji`] is built from a configuration section that carries both an
//! `emoticon(s)` and an `emoji(s)` key:
//!
//! ```yaml
//! smile:
//!   emoticons: [":)", ":-)"]
//!   emoji: "🙂"
//! ```
//!
//! Every occurrence of any emoticon is replaced by the first emoji, followed
//! by the caller's reset marker.

use crate::catalog::GroupNode;
use crate::lang::{Lang, Replacements};
use crate::permission::{PERMISSION_BASE, Permission, PermissionDefault, PermissionTable, Requester};
use crate::{ConfigError, ConfigSection, normalize_name};
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::fmt;

/// A named emoticon → emoji substitution gated by its own permission.
#[derive(Debug, Clone)]
pub struct Emoji {
    name: String,
    permission: String,
    emoticons: Vec<String>,
    emojis: Vec<String>,
    pattern: Regex,
}

impl Emoji {
    /// Build the emoji defined under `key` and register its permission.
    ///
    /// The permission is `chatemojis.use.<owner chain>.<name>`, linked to the
    /// owner group's permission so that holding the group grants the emoji.
    pub(crate) fn init(
        owner: &GroupNode,
        key: &str,
        section: &ConfigSection,
        permissions: &mut PermissionTable,
        lang: &Lang,
    ) -> Result<Self, ConfigError> {
        let name = normalize_name(key)?;

        let emoticons = non_blank(section, crate::regex!("^emoticons?$"));
        if emoticons.is_empty() {
            return Err(ConfigError::MissingEmoticons { key: key.to_string() });
        }
        let emojis = non_blank(section, crate::regex!("^emojis?$"));
        if emojis.is_empty() {
            return Err(ConfigError::MissingEmojis { key: key.to_string() });
        }

        let pattern = compile_emoticons(&emoticons)
            .map_err(|source| ConfigError::InvalidPattern { key: key.to_string(), source })?;

        let mut chain = owner.parent_names().to_vec();
        chain.push(name.clone());
        let permission = format!("{}.{}", PERMISSION_BASE, chain.join(".").to_lowercase());

        let description = lang.translate("emoji.permission.description", &Replacements::new().with("name", &name));
        permissions.register(
            Permission::new(&permission)
                .with_default(PermissionDefault::Op)
                .with_description(description)
                .with_parent(owner.permission(), true),
        );
        log::debug!("registered emoji '{}' as {}", name, permission);

        Ok(Self { name, permission, emoticons, emojis, pattern })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn emoticons(&self) -> &[String] {
        &self.emoticons
    }

    pub fn emojis(&self) -> &[String] {
        &self.emojis
    }

    /// The glyph inserted for every match.
    pub fn glyph(&self) -> &str {
        // `init` rejects definitions without emojis.
        &self.emojis[0]
    }

    /// Replace every emoticon in `text` with this emoji and `reset`.
    ///
    /// Nothing is replaced unless `forced` is set or `requester` holds this
    /// emoji's permission. Unchanged text is handed back borrowed.
    pub fn parse<'t>(
        &self,
        permissions: &PermissionTable,
        requester: &dyn Requester,
        reset: &str,
        text: &'t str,
        forced: bool,
    ) -> Cow<'t, str> {
        if !forced && !permissions.holds(requester, &self.permission) {
            return Cow::Borrowed(text);
        }
        let replacement = format!("{}{}", self.glyph(), reset);
        self.pattern.replace_all(text, NoExpand(&replacement))
    }

    /// One listing entry per emoticon.
    pub fn display_items(&self, permissions: &PermissionTable, requester: &dyn Requester) -> Vec<DisplayItem> {
        let permitted = permissions.holds(requester, &self.permission);
        self.emoticons
            .iter()
            .map(|emoticon| DisplayItem {
                name: self.name.clone(),
                emoticon: emoticon.clone(),
                emoji: self.glyph().to_string(),
                permission: self.permission.clone(),
                permitted,
            })
            .collect()
    }
}

/// A displayable emoticon → emoji pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub name: String,
    pub emoticon: String,
    pub emoji: String,
    pub permission: String,
    /// Whether the requester the item was rendered for may use it.
    pub permitted: bool,
}

impl fmt::Display for DisplayItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.emoticon, self.emoji)
    }
}

fn non_blank(section: &ConfigSection, key: &Regex) -> Vec<String> {
    let Some(key) = section.find_key(key) else {
        return Vec::new();
    };
    let mut values: Vec<String> = Vec::new();
    for value in section.get_string_list(&key) {
        let value = value.trim();
        if !value.is_empty() && !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

// Longest first, so ":-)" is not shadowed by ":-".
fn compile_emoticons(emoticons: &[String]) -> Result<Regex, regex::Error> {
    let mut sorted: Vec<&str> = emoticons.iter().map(String::as_str).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = sorted.iter().map(|e| regex::escape(e)).collect::<Vec<_>>().join("|");
    Regex::new(&alternation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::Subject;

    fn build(yaml: &str) -> Result<(Emoji, PermissionTable), ConfigError> {
        let root = ConfigSection::from_yaml_str(yaml)?;
        let key = root.keys().into_iter().next().unwrap();
        let section = root.section(&key).unwrap();
        let owner = GroupNode::root();
        let mut permissions = PermissionTable::new();
        permissions.register(Permission::new(owner.permission()));
        let emoji = Emoji::init(&owner, &key, &section, &mut permissions, &Lang::english())?;
        Ok((emoji, permissions))
    }

    #[test]
    fn registers_permission_under_owner() {
        let (emoji, permissions) = build("Big_Smile:\n  emoticons: [':D']\n  emojis: ['😁']\n").unwrap();
        assert_eq!(emoji.name(), "Big-Smile");
        assert_eq!(emoji.permission(), "chatemojis.use.big-smile");

        let node = permissions.get("chatemojis.use.big-smile").unwrap();
        assert_eq!(node.default, PermissionDefault::Op);
        assert_eq!(node.parent.as_ref().map(|l| l.name.as_str()), Some("chatemojis.use.*"));
        assert_eq!(node.description, "Permission to use the 'Big-Smile' emoji");
    }

    #[test]
    fn longest_emoticon_wins() {
        let (emoji, permissions) = build("wink:\n  emoticon: [';', ';)']\n  emoji: '😉'\n").unwrap();
        let out = emoji.parse(&permissions, &Subject::new("x"), "", "a ;) b ;", true);
        assert_eq!(out, "a 😉 b 😉");
    }

    #[test]
    fn replacement_is_literal_and_followed_by_reset() {
        let (emoji, permissions) = build("cash:\n  emoticons: ['$$']\n  emojis: ['$1']\n").unwrap();
        let out = emoji.parse(&permissions, &Subject::new("x"), "&r", "pay $$ now", true);
        assert_eq!(out, "pay $1&r now");
    }

    #[test]
    fn unauthorized_requester_keeps_text() {
        let (emoji, permissions) = build("smile:\n  emoticons: ':)'\n  emojis: '🙂'\n").unwrap();
        let out = emoji.parse(&permissions, &Subject::new("guest"), "", "hi :)", false);
        assert!(matches!(out, Cow::Borrowed("hi :)")));

        let op = Subject::new("op").operator(true);
        assert_eq!(emoji.parse(&permissions, &op, "", "hi :)", false), "hi 🙂");
    }

    #[test]
    fn missing_parts_are_rejected() {
        assert!(matches!(
            build("smile:\n  emoticons: ['  ']\n  emojis: '🙂'\n"),
            Err(ConfigError::MissingEmoticons { .. })
        ));
        assert!(matches!(build("smile:\n  emoticons: ':)'\n  emojis: []\n"), Err(ConfigError::MissingEmojis { .. })));
        assert!(matches!(build("'!!':\n  emoticons: ':)'\n  emojis: '🙂'\n"), Err(ConfigError::EmptyName { .. })));
    }

    #[test]
    fn display_items_follow_emoticons() {
        let (emoji, permissions) = build("smile:\n  emoticons: [':)', ':-)']\n  emojis: ['🙂', '😊']\n").unwrap();
        let items = emoji.display_items(&permissions, &Subject::new("guest"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].to_string(), ":-) - 🙂");
        assert!(!items[0].permitted);
    }
}
