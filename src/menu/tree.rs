use std::collections::BTreeMap;
use std::path::Path;

use super::entry::MenuEntry;
use super::loader::{self, LoadError};

/// Grouped, sorted menu hierarchy: main menu label → submenu label →
/// leaves ordered by display label. The BTreeMap levels give byte-wise
/// lexicographic ordering; the leaf sort finishes the (main, sub, label)
/// tuple ordering.
pub type MenuTree = BTreeMap<String, BTreeMap<String, Vec<MenuEntry>>>;

/// Pure grouping over the collected entries. Equal entry sets always
/// produce an identical tree, independent of input order.
pub fn build_tree(entries: Vec<MenuEntry>) -> MenuTree {
    let mut tree: MenuTree = BTreeMap::new();

    for entry in entries {
        tree.entry(entry.main_menu.clone())
            .or_default()
            .entry(entry.sub_menu.clone())
            .or_default()
            .push(entry);
    }

    for subs in tree.values_mut() {
        for leaves in subs.values_mut() {
            // Content breaks label ties so permuted input cannot reorder.
            leaves.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.content.cmp(&b.content)));
        }
    }

    tree
}

/// The full reload operation: discover CSV files under `root`, load them
/// all, and build the tree. Reinvoked in full on every reload; there is no
/// incremental diffing.
pub fn load_menu(root: &Path) -> Result<MenuTree, LoadError> {
    Ok(build_tree(loader::load_dir(root)?))
}
