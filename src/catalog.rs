//! The emoji group tree.
//!
//! ## How the parts work together
//!
//! ```text
//! ConfigSection (root)
//!      │  TreeBuilder::build                    (builder.rs)
//!      │    - derive + validate the group name
//!      │    - register the group permission
//!      │    - classify each key: emoji definition or nested group
//!      │    - per-key failures become LoadWarnings, never abort
//!      v
//! EmojiTree                                     (group.rs)
//!   groups: Vec<GroupNode>   (arena, root at index 0)
//!   permissions: PermissionTable
//!      │
//!      │  cascade: parse / display_items / for_each  (cascade.rs)
//!      v
//! substituted text, listing entries
//! ```
//!
//! ## Invariants
//!
//! - `GroupId` indexes `EmojiTree::groups`. A node's `children` only hold ids
//!   of nodes that finished building; a failed group is never pushed.
//! - `parent` is a non-owning back link. The root has none and no name.
//! - The tree is never mutated after `build` returns. Reloads build a new
//!   tree and swap it in (see `Catalog`).

#[path = "catalog/builder.rs"]
mod builder;
#[path = "catalog/cascade.rs"]
mod cascade;
#[path = "catalog/group.rs"]
mod group;


pub use builder::{EntryKind, LoadWarning, RESERVED_NAMES};
pub use cascade::Entry;
pub use group::{EmojiTree, Group, GroupId, GroupNode};
