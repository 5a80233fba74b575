use crate::lang::Lang;
use crate::{ConfigSection, DisplayItem, EmojiTree, Requester};
use std::sync::{Arc, PoisonError, RwLock};

/// The active emoji tree, swappable at runtime.
///
/// Readers take a cheap [`Arc`] snapshot and work on it without holding the
/// lock, so a parse that overlaps a reload sees either the old tree or the
/// new one in full. Reloads build the replacement tree before touching the
/// lock.
#[derive(Debug)]
pub struct Catalog {
    active: RwLock<Arc<EmojiTree>>,
    lang: Lang,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(EmojiTree::empty())
    }
}

impl Catalog {
    pub fn new(tree: EmojiTree) -> Self {
        Self { active: RwLock::new(Arc::new(tree)), lang: Lang::default() }
    }

    /// Build the initial tree from `root` with the default templates.
    pub fn load(root: &ConfigSection) -> Self {
        Self::load_with(root, Lang::default())
    }

    /// Build the initial tree from `root`, logging with `lang`.
    pub fn load_with(root: &ConfigSection, lang: Lang) -> Self {
        let tree = EmojiTree::build(root, &lang);
        Self { active: RwLock::new(Arc::new(tree)), lang }
    }

    /// The tree currently in use.
    pub fn snapshot(&self) -> Arc<EmojiTree> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Build a new tree from `root` and make it the active one.
    ///
    /// Returns the tree that was replaced.
    pub fn reload(&self, root: &ConfigSection) -> Arc<EmojiTree> {
        let fresh = Arc::new(EmojiTree::build(root, &self.lang));
        self.swap(fresh)
    }

    /// Replace the active tree, returning the previous one.
    pub fn swap(&self, tree: Arc<EmojiTree>) -> Arc<EmojiTree> {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        log::debug!("swapping emoji tree ({} groups -> {} groups)", active.group_count(), tree.group_count());
        std::mem::replace(&mut *active, tree)
    }

    /// Substitute emojis in `text` against the active tree.
    pub fn parse(&self, requester: &dyn Requester, reset: &str, text: &str, forced: bool) -> String {
        self.snapshot().parse(requester, reset, text, forced)
    }

    /// Listing entries from the active tree.
    pub fn display_items(&self, requester: &dyn Requester) -> Vec<DisplayItem> {
        self.snapshot().display_items(requester)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subject;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn config(emoticon: &str, emoji: &str) -> ConfigSection {
        let src = format!("faces:\n  face:\n    emoticons: ['{emoticon}']\n    emojis: ['{emoji}']\n");
        ConfigSection::from_yaml_str(&src).unwrap()
    }

    #[test]
    fn reload_swaps_the_whole_tree() {
        let catalog = Catalog::load(&config(":)", "🙂"));
        let op = Subject::new("op").operator(true);
        assert_eq!(catalog.parse(&op, "", ":) :(", false), "🙂 :(");

        let before = catalog.snapshot();
        let old = catalog.reload(&config(":(", "🙁"));
        assert!(Arc::ptr_eq(&before, &old));
        assert_eq!(catalog.parse(&op, "", ":) :(", false), ":) 🙁");

        // A snapshot taken before the reload keeps answering with the old tree.
        assert_eq!(before.parse(&op, "", ":) :(", false), "🙂 :(");
    }

    #[test]
    fn parses_during_reloads_never_mix_trees() {
        let catalog = Arc::new(Catalog::load(&config(":)", "A")));
        let stop = Arc::new(AtomicBool::new(false));

        let reader = {
            let catalog = Arc::clone(&catalog);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let op = Subject::new("op").operator(true);
                let mut seen = 0usize;
                while !stop.load(Ordering::Relaxed) || seen == 0 {
                    let out = catalog.parse(&op, "", ":) :(", false);
                    assert!(out == "A :(" || out == ":) B", "mixed output {out:?}");
                    seen += 1;
                }
            })
        };

        for i in 0..50 {
            if i % 2 == 0 {
                catalog.reload(&config(":(", "B"));
            } else {
                catalog.reload(&config(":)", "A"));
            }
        }
        stop.store(true, Ordering::Relaxed);
        reader.join().unwrap();
    }

    #[test]
    fn default_catalog_is_empty() {
        let catalog = Catalog::default();
        assert_eq!(catalog.snapshot().group_count(), 1);
        assert_eq!(catalog.parse(&Subject::new("x"), "", "hi :)", true), "hi :)");
        assert!(catalog.display_items(&Subject::new("x")).is_empty());
    }
}
