//! Arena storage for emoji groups.

use super::builder::{LoadWarning, TreeBuilder};
use crate::lang::Lang;
use crate::permission::{PERMISSION_BASE, PermissionTable};
use crate::{ConfigError, ConfigSection, Emoji};

/// Index of a group inside its [`EmojiTree`].
pub type GroupId = usize;

/// A group as stored in the arena.
#[derive(Debug, Clone)]
pub struct GroupNode {
    pub(crate) name: Option<String>,
    pub(crate) permission: String,
    pub(crate) parent: Option<GroupId>,
    pub(crate) parent_names: Vec<String>,
    pub(crate) children: Vec<GroupId>,
    pub(crate) emojis: Vec<Emoji>,
}

impl GroupNode {
    /// The single unnamed root group.
    pub(crate) fn root() -> Self {
        Self {
            name: None,
            permission: format!("{PERMISSION_BASE}.*"),
            parent: None,
            parent_names: Vec::new(),
            children: Vec::new(),
            emojis: Vec::new(),
        }
    }

    pub(crate) fn child(name: String, parent: GroupId, parent_names: Vec<String>) -> Self {
        let permission = format!("{}.{}.*", PERMISSION_BASE, parent_names.join(".").to_lowercase());
        Self {
            name: Some(name),
            permission,
            parent: Some(parent),
            parent_names,
            children: Vec::new(),
            emojis: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Names from the outermost named ancestor down to this group.
    pub fn parent_names(&self) -> &[String] {
        &self.parent_names
    }

    pub fn children(&self) -> &[GroupId] {
        &self.children
    }

    pub fn emojis(&self) -> &[Emoji] {
        &self.emojis
    }
}

/// A fully built, read-only group tree with its permission table.
#[derive(Debug, Clone)]
pub struct EmojiTree {
    pub(crate) groups: Vec<GroupNode>,
    pub(crate) permissions: PermissionTable,
    pub(crate) warnings: Vec<LoadWarning>,
}

impl EmojiTree {
    pub const ROOT: GroupId = 0;

    /// Build a tree from a root configuration section.
    ///
    /// The root has no name to validate, so building never fails as a whole;
    /// malformed entries are skipped and reported through [`warnings`](Self::warnings).
    pub fn build(root: &ConfigSection, lang: &Lang) -> Self {
        TreeBuilder::new(lang).build_root(root)
    }

    /// Parse a YAML document and build a tree from it.
    pub fn from_yaml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(Self::build(&ConfigSection::from_yaml_str(src)?, &Lang::default()))
    }

    /// A tree with nothing but the root group.
    pub fn empty() -> Self {
        Self::build(&ConfigSection::default(), &Lang::default())
    }

    pub fn root(&self) -> Group<'_> {
        Group { tree: self, id: Self::ROOT }
    }

    /// The group stored under `id`, if any.
    pub fn group(&self, id: GroupId) -> Option<Group<'_>> {
        (id < self.groups.len()).then_some(Group { tree: self, id })
    }

    /// Find a group by its name chain, e.g. `["faces", "cats"]`.
    pub fn find(&self, path: &[&str]) -> Option<Group<'_>> {
        let mut current = self.root();
        for segment in path {
            current = current.groups().find(|g| g.name() == Some(*segment))?;
        }
        Some(current)
    }

    /// Number of groups, root included.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of emojis across all groups.
    pub fn emoji_count(&self) -> usize {
        self.groups.iter().map(|g| g.emojis.len()).sum()
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    /// Per-key failures recorded while building, in encounter order.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }
}

/// A borrowed view of one group inside an [`EmojiTree`].
#[derive(Debug, Clone, Copy)]
pub struct Group<'a> {
    pub(crate) tree: &'a EmojiTree,
    pub(crate) id: GroupId,
}

impl<'a> Group<'a> {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn node(&self) -> &'a GroupNode {
        &self.tree.groups[self.id]
    }

    pub fn tree(&self) -> &'a EmojiTree {
        self.tree
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node().name()
    }

    pub fn permission(&self) -> &'a str {
        self.node().permission()
    }

    pub fn parent(&self) -> Option<Group<'a>> {
        self.node().parent.map(|id| Group { tree: self.tree, id })
    }

    pub fn parent_names(&self) -> &'a [String] {
        self.node().parent_names()
    }

    /// Child groups, in configuration order.
    pub fn groups(&self) -> impl Iterator<Item = Group<'a>> + use<'a> {
        let tree = self.tree;
        self.node().children.iter().map(move |&id| Group { tree, id })
    }

    /// Emojis owned directly by this group, in configuration order.
    pub fn emojis(&self) -> &'a [Emoji] {
        self.node().emojis()
    }
}
