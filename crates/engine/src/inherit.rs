//! Attribute inheritance resolution.
//!
//! When an ancestor's own attribute changes, every descendant that
//! currently inherits that attribute shows a stale value until it is
//! refreshed. [`affected_descendants`] computes exactly that set so the
//! persistence collaborator can invalidate it — the engine itself never
//! rewrites descendant values.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityKind, EntityTable};
use crate::hierarchy::HierarchyIndex;

/// One pending ancestor change: which attributes are being set on
/// which entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttribChange {
    pub entity_id: String,
    pub attribs: Vec<String>,
}

/// A descendant whose inherited values are affected by a pending
/// ancestor change. Computed, never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritedDependent {
    pub entity_id: String,
    pub entity_type: EntityKind,
    pub inherited_attribs: Vec<String>,
}

/// For each change, walk the descendants of the changed entity and
/// keep those that inherit at least one of the changed attributes
/// (attribute not in the descendant's `own_attrib`).
///
/// A descendant reached through two changed ancestors gets a single
/// entry with the union of the affected attributes. Result order is
/// deterministic: first encounter, changes in input order, descendants
/// in breadth-first order. Pure; reads only the snapshot and the index.
pub fn affected_descendants(
    table: &EntityTable,
    index: &HierarchyIndex,
    changes: &[AttribChange],
) -> Vec<InheritedDependent> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: FxHashMap<String, InheritedDependent> = FxHashMap::default();

    for change in changes {
        for descendant_id in index.descendants_of(&change.entity_id) {
            let Some(entity) = table.get(&descendant_id) else {
                continue;
            };
            let inherited: Vec<&String> = change
                .attribs
                .iter()
                .filter(|attrib| !entity.owns(attrib))
                .collect();
            if inherited.is_empty() {
                continue;
            }

            let dependent = merged
                .entry(descendant_id.clone())
                .or_insert_with(|| {
                    order.push(descendant_id.clone());
                    InheritedDependent {
                        entity_id: descendant_id.clone(),
                        entity_type: entity.kind,
                        inherited_attribs: Vec::new(),
                    }
                });
            for attrib in inherited {
                if !dependent.inherited_attribs.contains(attrib) {
                    dependent.inherited_attribs.push(attrib.clone());
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| merged.remove(&id))
        .collect()
}
