//! Dotted permission identifiers and their inheritance table.
//!
//! Catalog nodes only carry permission *identifiers*. The relationships
//! between them live in a [`PermissionTable`], which answers "does this
//! requester hold X" by walking parent links:
//!
//! ```text
//! chatemojis.use.*                      (root group)
//!   └─ chatemojis.use.faces.*           (group "faces")
//!        ├─ chatemojis.use.faces.smile  (emoji "smile")
//!        └─ chatemojis.use.faces.cats.* (group "cats")
//! ```
//!
//! Holding a parent implies holding every child linked with `inherit = true`;
//! holding a child says nothing about its parent.

use std::collections::HashMap;

/// Prefix shared by every identifier the catalog registers.
pub const PERMISSION_BASE: &str = "chatemojis.use";

/// Who holds a permission when the requester has no explicit value for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionDefault {
    True,
    False,
    /// Operators only.
    #[default]
    Op,
    NotOp,
}

impl PermissionDefault {
    pub fn grants(self, operator: bool) -> bool {
        match self {
            PermissionDefault::True => true,
            PermissionDefault::False => false,
            PermissionDefault::Op => operator,
            PermissionDefault::NotOp => !operator,
        }
    }
}

/// Link from a child permission to the parent it is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionLink {
    pub name: String,
    /// `true`: holding the parent grants the child. `false`: it denies it.
    pub inherit: bool,
}

/// A registered permission node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub name: String,
    pub default: PermissionDefault,
    pub description: String,
    pub parent: Option<PermissionLink>,
}

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), default: PermissionDefault::default(), description: String::new(), parent: None }
    }

    pub fn with_default(mut self, default: PermissionDefault) -> Self {
        self.default = default;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>, inherit: bool) -> Self {
        self.parent = Some(PermissionLink { name: parent.into(), inherit });
        self
    }
}

/// The identity a substitution is performed for.
pub trait Requester {
    /// The requester's explicit value for `permission`, if it has one.
    fn permission_value(&self, permission: &str) -> Option<bool>;

    fn is_operator(&self) -> bool {
        false
    }
}

/// A plain requester with explicit grants and denials.
///
/// Identifiers are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Subject {
    name: String,
    operator: bool,
    values: HashMap<String, bool>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operator(mut self, operator: bool) -> Self {
        self.operator = operator;
        self
    }

    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        self.values.insert(permission.into().to_lowercase(), true);
        self
    }

    pub fn deny(mut self, permission: impl Into<String>) -> Self {
        self.values.insert(permission.into().to_lowercase(), false);
        self
    }
}

impl Requester for Subject {
    fn permission_value(&self, permission: &str) -> Option<bool> {
        self.values.get(&permission.to_lowercase()).copied()
    }

    fn is_operator(&self) -> bool {
        self.operator
    }
}

/// Identifier → permission node, in registration order.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    order: Vec<String>,
    entries: HashMap<String, Permission>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `permission`, replacing any earlier node with the same name.
    pub fn register(&mut self, permission: Permission) {
        if !self.entries.contains_key(&permission.name) {
            self.order.push(permission.name.clone());
        }
        self.entries.insert(permission.name.clone(), permission);
    }

    pub fn get(&self, name: &str) -> Option<&Permission> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    /// Whether `requester` holds `name`, directly or through a parent.
    ///
    /// The requester's own value for `name` wins. Otherwise the nearest
    /// ancestor the requester has a value for decides, each link on the way
    /// down passing the value through (`inherit`) or inverting it. With no
    /// value anywhere up the chain, the node's default applies; unknown
    /// identifiers default to operators only.
    pub fn holds(&self, requester: &dyn Requester, name: &str) -> bool {
        let mut links: Vec<bool> = Vec::new();
        let mut current = name;

        let decided = loop {
            if let Some(value) = requester.permission_value(current) {
                break Some(value);
            }
            // Parent chains come from a tree, but guard against a cycle
            // introduced through manual registration.
            if links.len() > self.entries.len() {
                break None;
            }
            match self.entries.get(current).and_then(|p| p.parent.as_ref()) {
                Some(link) => {
                    links.push(link.inherit);
                    current = link.name.as_str();
                }
                None => break None,
            }
        };

        match decided {
            Some(value) => links.iter().rev().fold(value, |value, inherit| value == *inherit),
            None => {
                let default = self.entries.get(name).map(|p| p.default).unwrap_or_default();
                default.grants(requester.is_operator())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PermissionTable {
        let mut table = PermissionTable::new();
        table.register(Permission::new("chatemojis.use.*"));
        table.register(Permission::new("chatemojis.use.a.*").with_parent("chatemojis.use.*", true));
        table.register(Permission::new("chatemojis.use.a.b.*").with_parent("chatemojis.use.a.*", true));
        table.register(Permission::new("chatemojis.use.a.b.smile").with_parent("chatemojis.use.a.b.*", true));
        table
    }

    #[test]
    fn parent_grant_flows_down_not_up() {
        let table = table();
        let who = Subject::new("alex").grant("chatemojis.use.a.*");

        assert!(table.holds(&who, "chatemojis.use.a.*"));
        assert!(table.holds(&who, "chatemojis.use.a.b.*"));
        assert!(table.holds(&who, "chatemojis.use.a.b.smile"));
        assert!(!table.holds(&who, "chatemojis.use.*"));

        let child_only = Subject::new("sam").grant("chatemojis.use.a.b.*");
        assert!(!table.holds(&child_only, "chatemojis.use.a.*"));
        assert!(table.holds(&child_only, "chatemojis.use.a.b.smile"));
    }

    #[test]
    fn subject_values_ignore_case() {
        let table = table();
        let who = Subject::new("alex").grant("ChatEmojis.use.A.*").deny("chatemojis.use.a.B.*");

        assert_eq!(who.permission_value("CHATEMOJIS.USE.A.*"), Some(true));
        assert!(table.holds(&who, "chatemojis.use.a.*"));
        assert!(!table.holds(&who, "chatemojis.use.a.b.smile"));
    }

    #[test]
    fn explicit_child_value_beats_parent() {
        let table = table();
        let who = Subject::new("alex").grant("chatemojis.use.*").deny("chatemojis.use.a.b.*");

        assert!(table.holds(&who, "chatemojis.use.a.*"));
        assert!(!table.holds(&who, "chatemojis.use.a.b.*"));
        assert!(!table.holds(&who, "chatemojis.use.a.b.smile"));
    }

    #[test]
    fn defaults_apply_without_values() {
        let table = table();
        assert!(table.holds(&Subject::new("op").operator(true), "chatemojis.use.a.b.smile"));
        assert!(!table.holds(&Subject::new("guest"), "chatemojis.use.a.b.smile"));
        assert!(!table.holds(&Subject::new("guest"), "not.registered"));
    }

    #[test]
    fn non_inheriting_link_inverts_parent() {
        let mut table = PermissionTable::new();
        table.register(Permission::new("p"));
        table.register(Permission::new("c").with_parent("p", false).with_default(PermissionDefault::True));

        assert!(!table.holds(&Subject::new("x").grant("p"), "c"));
        assert!(table.holds(&Subject::new("x").deny("p"), "c"));
        assert!(table.holds(&Subject::new("x"), "c"));
    }

    #[test]
    fn cycles_fall_back_to_default() {
        let mut table = PermissionTable::new();
        table.register(Permission::new("a").with_parent("b", true));
        table.register(Permission::new("b").with_parent("a", true));
        assert!(!table.holds(&Subject::new("x"), "a"));
    }

    #[test]
    fn register_replaces_in_place() {
        let mut table = table();
        table.register(Permission::new("chatemojis.use.a.*").with_description("again"));
        assert_eq!(table.len(), 4);
        assert_eq!(table.iter().nth(1).map(|p| p.description.as_str()), Some("again"));
    }
}
