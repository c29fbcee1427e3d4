//! Parent→children adjacency over one entity snapshot.
//!
//! Built in a single linear pass whenever the entity list changes, and
//! immutable afterwards. Rebuilding wholesale instead of patching keeps
//! the index trivially consistent with its snapshot; there is no state
//! to invalidate.
//!
//! # Invariants
//!
//! 1. **Sibling order:** each child list follows the snapshot's input
//!    order; no implicit sorting.
//! 2. **Roots:** an entity with no parent id, or with a parent id the
//!    snapshot does not contain, is a root.
//! 3. **Termination:** traversal tolerates cyclic parentage (a data
//!    anomaly from the source) via a visited set; the result is partial
//!    but the walk always ends.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::entity::EntityTable;

/// Parent id → ordered child ids for one snapshot.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    children: FxHashMap<String, Vec<String>>,
    roots: Vec<String>,
}

impl HierarchyIndex {
    /// Build the adjacency map in one pass over the snapshot.
    pub fn build(table: &EntityTable) -> Self {
        let mut children: FxHashMap<String, Vec<String>> = FxHashMap::default();
        let mut roots = Vec::new();
        for entity in table.iter() {
            match entity.parent_id.as_deref().filter(|p| table.contains(p)) {
                Some(parent) => children
                    .entry(parent.to_string())
                    .or_default()
                    .push(entity.id.clone()),
                None => roots.push(entity.id.clone()),
            }
        }
        Self { children, roots }
    }

    /// Root entity ids in snapshot order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Direct children of an entity, in snapshot order. Empty for
    /// leaves and unknown ids.
    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All descendants of `root`, breadth-first, excluding `root`
    /// itself. Sibling order follows the snapshot.
    ///
    /// A parentId cycle would make this walk revisit an id; the visited
    /// set skips the revisit and the traversal returns what it reached.
    pub fn descendants_of(&self, root: &str) -> Vec<String> {
        let mut result = Vec::new();
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        visited.insert(root);

        let mut queue: VecDeque<&str> = self.children_of(root).iter().map(String::as_str).collect();
        let mut cycle_hit = false;
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                cycle_hit = true;
                continue;
            }
            result.push(id.to_string());
            queue.extend(self.children_of(id).iter().map(String::as_str));
        }
        if cycle_hit {
            log::warn!("cyclic parentage under entity {root:?}; descendant walk truncated");
        }
        result
    }
}
