//! Merging sparse cell edits into entity-level operations.
//!
//! The grid emits one edit per touched cell; the persistence
//! collaborator wants one patch per entity. [`MutationBatcher`] does
//! the merge and, for attribute changes on containers, asks the
//! inheritance resolver which descendants go stale.
//!
//! Merge rules, per `(entity, kind)`:
//! - later edits to the same field overwrite earlier ones;
//! - edits to different fields accumulate into one operation;
//! - attribute maps merge key-wise, never wholesale;
//! - an attribute edit on a not-yet-owned name extends the outgoing
//!   patch's ownership list, not the live entity.
//!
//! Malformed edits (unsupported kind, unknown entity) are skipped, not
//! erred; an empty batch is a no-op.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::entity::{EntityKind, EntityTable};
use crate::hierarchy::HierarchyIndex;
use crate::inherit::{affected_descendants, AttribChange, InheritedDependent};
use crate::ops::{AttribRevert, BatchOutcome, EditTarget, EntityEdit, PendingOperation};

/// Batches edits against one entity snapshot.
///
/// Synchronous and pure apart from reading the snapshot: nothing is
/// persisted here. A batch sees one consistent snapshot for its whole
/// call; ordering across dependent batches is enforced by call order at
/// the call site, not in here.
pub struct MutationBatcher<'a> {
    table: &'a EntityTable,
    index: &'a HierarchyIndex,
}

impl<'a> MutationBatcher<'a> {
    pub fn new(table: &'a EntityTable, index: &'a HierarchyIndex) -> Self {
        Self { table, index }
    }

    /// Merge sparse edits into deduplicated operations plus the
    /// inheritance-affected descendants of any container attribute
    /// change.
    pub fn update_entities(&self, edits: &[EntityEdit]) -> BatchOutcome {
        let mut order: Vec<String> = Vec::new();
        let mut ops: FxHashMap<String, PendingOperation> = FxHashMap::default();

        for edit in edits {
            if EntityKind::parse(&edit.entity_kind).is_none() {
                log::debug!(
                    "skipping edit for unsupported entity kind {:?}",
                    edit.entity_kind
                );
                continue;
            }
            // The snapshot is authoritative for the entity's kind and
            // ownership; an edit naming an entity outside the snapshot
            // cannot be resolved and is dropped like a malformed one.
            let Some(entity) = self.table.get(&edit.entity_id) else {
                log::debug!("skipping edit for unknown entity {:?}", edit.entity_id);
                continue;
            };

            let op = ops.entry(edit.entity_id.clone()).or_insert_with(|| {
                order.push(edit.entity_id.clone());
                PendingOperation::new(&entity.id, entity.kind)
            });

            match &edit.target {
                EditTarget::Field(name) => {
                    op.fields.insert(name.clone(), edit.value.clone());
                }
                EditTarget::Attrib(name) => {
                    // First attribute edit for this op: start from the
                    // entity's current ownership list.
                    if op.attrib.is_empty() {
                        op.own_attrib = entity.own_attrib.clone();
                    }
                    op.attrib.insert(name.clone(), edit.value.clone());
                    if !op.own_attrib.iter().any(|a| a == name) {
                        op.own_attrib.push(name.clone());
                    }
                }
            }
        }

        let operations: Vec<PendingOperation> =
            order.into_iter().filter_map(|id| ops.remove(&id)).collect();
        let inherited_dependents =
            affected_descendants(self.table, self.index, &container_changes(&operations));

        BatchOutcome {
            operations,
            inherited_dependents,
        }
    }

    /// Build operations that revert the named attributes to inherited
    /// values (`Value::Null` downstream means "unset").
    ///
    /// The reverted entities themselves lead the dependents list:
    /// dropping ownership makes them newly inheriting, which is itself
    /// an inheritance-affecting change. Their affected descendants
    /// follow, unioned per entity.
    pub fn inherit_from_parent(&self, reverts: &[AttribRevert]) -> BatchOutcome {
        let mut order: Vec<String> = Vec::new();
        let mut ops: FxHashMap<String, PendingOperation> = FxHashMap::default();
        let mut dep_order: Vec<String> = Vec::new();
        let mut deps: FxHashMap<String, InheritedDependent> = FxHashMap::default();

        for revert in reverts {
            if EntityKind::parse(&revert.entity_kind).is_none() {
                log::debug!(
                    "skipping revert for unsupported entity kind {:?}",
                    revert.entity_kind
                );
                continue;
            }
            let Some(entity) = self.table.get(&revert.entity_id) else {
                log::debug!("skipping revert for unknown entity {:?}", revert.entity_id);
                continue;
            };
            if revert.attribs.is_empty() {
                continue;
            }

            let op = ops.entry(revert.entity_id.clone()).or_insert_with(|| {
                order.push(revert.entity_id.clone());
                let mut op = PendingOperation::new(&entity.id, entity.kind);
                op.own_attrib = entity.own_attrib.clone();
                op
            });
            for attrib in &revert.attribs {
                op.attrib.insert(attrib.clone(), Value::Null);
                op.own_attrib.retain(|a| a != attrib);
            }

            merge_dependent(
                &mut dep_order,
                &mut deps,
                InheritedDependent {
                    entity_id: entity.id.clone(),
                    entity_type: entity.kind,
                    inherited_attribs: revert.attribs.clone(),
                },
            );
        }

        let operations: Vec<PendingOperation> =
            order.into_iter().filter_map(|id| ops.remove(&id)).collect();
        for dependent in
            affected_descendants(self.table, self.index, &container_changes(&operations))
        {
            merge_dependent(&mut dep_order, &mut deps, dependent);
        }
        let inherited_dependents = dep_order
            .into_iter()
            .filter_map(|id| deps.remove(&id))
            .collect();

        BatchOutcome {
            operations,
            inherited_dependents,
        }
    }
}

/// Attribute changes on container operations, in operation order —
/// only containers have descendants to invalidate.
fn container_changes(operations: &[PendingOperation]) -> Vec<AttribChange> {
    operations
        .iter()
        .filter(|op| op.entity_type.is_container() && !op.attrib.is_empty())
        .map(|op| AttribChange {
            entity_id: op.entity_id.clone(),
            attribs: op.attrib.keys().cloned().collect(),
        })
        .collect()
}

/// Union a dependent into the accumulator, keeping first-encounter
/// order for entities and attributes alike.
fn merge_dependent(
    order: &mut Vec<String>,
    merged: &mut FxHashMap<String, InheritedDependent>,
    incoming: InheritedDependent,
) {
    match merged.get_mut(&incoming.entity_id) {
        Some(existing) => {
            for attrib in incoming.inherited_attribs {
                if !existing.inherited_attribs.contains(&attrib) {
                    existing.inherited_attribs.push(attrib);
                }
            }
        }
        None => {
            order.push(incoming.entity_id.clone());
            let mut entry = InheritedDependent {
                entity_id: incoming.entity_id,
                entity_type: incoming.entity_type,
                inherited_attribs: Vec::new(),
            };
            for attrib in incoming.inherited_attribs {
                if !entry.inherited_attribs.contains(&attrib) {
                    entry.inherited_attribs.push(attrib);
                }
            }
            merged.insert(entry.entity_id.clone(), entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use serde_json::json;

    // f1 (folder, owns priority=high) ── t1 (task, inherits it)
    fn sample() -> (EntityTable, HierarchyIndex) {
        let mut f1 = Entity::new("f1", EntityKind::Folder, None);
        f1.own_attrib.push("priority".into());
        f1.attrib.insert("priority".into(), json!("high"));
        let mut t1 = Entity::new("t1", EntityKind::Task, Some("f1"));
        t1.attrib.insert("priority".into(), json!("high"));

        let table = EntityTable::from_entities(vec![f1, t1]);
        let index = HierarchyIndex::build(&table);
        (table, index)
    }

    #[test]
    fn test_folder_attrib_edit_emits_op_and_dependent() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.update_entities(&[EntityEdit::attrib(
            "f1",
            "folder",
            "priority",
            json!("low"),
        )]);

        assert_eq!(outcome.operations.len(), 1);
        let op = &outcome.operations[0];
        assert_eq!(op.entity_id, "f1");
        assert_eq!(op.entity_type, EntityKind::Folder);
        assert!(op.fields.is_empty());
        assert_eq!(op.attrib.get("priority"), Some(&json!("low")));
        assert_eq!(op.own_attrib, &["priority"]);

        assert_eq!(outcome.inherited_dependents.len(), 1);
        let dep = &outcome.inherited_dependents[0];
        assert_eq!(dep.entity_id, "t1");
        assert_eq!(dep.entity_type, EntityKind::Task);
        assert_eq!(dep.inherited_attribs, &["priority"]);
    }

    #[test]
    fn test_inherit_from_parent_includes_entity_itself() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.inherit_from_parent(&[AttribRevert {
            entity_id: "t1".into(),
            entity_kind: "task".into(),
            attribs: vec!["priority".into()],
        }]);

        assert_eq!(outcome.operations.len(), 1);
        let op = &outcome.operations[0];
        assert_eq!(op.entity_id, "t1");
        assert_eq!(op.attrib.get("priority"), Some(&Value::Null));
        assert!(op.own_attrib.is_empty());

        // The reverted entity is itself newly inheriting.
        assert_eq!(outcome.inherited_dependents.len(), 1);
        assert_eq!(outcome.inherited_dependents[0].entity_id, "t1");
        assert_eq!(outcome.inherited_dependents[0].inherited_attribs, &["priority"]);
    }

    #[test]
    fn test_inherit_on_folder_reaches_descendants() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.inherit_from_parent(&[AttribRevert {
            entity_id: "f1".into(),
            entity_kind: "folder".into(),
            attribs: vec!["priority".into()],
        }]);

        let op = &outcome.operations[0];
        assert_eq!(op.attrib.get("priority"), Some(&Value::Null));
        // Ownership list drops the reverted name.
        assert!(op.own_attrib.is_empty());

        // Self first, then the descendant that inherits through it.
        let ids: Vec<&str> = outcome
            .inherited_dependents
            .iter()
            .map(|d| d.entity_id.as_str())
            .collect();
        assert_eq!(ids, &["f1", "t1"]);
    }

    #[test]
    fn test_same_edit_twice_merges_to_one_op() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);
        let edit = EntityEdit::attrib("f1", "folder", "priority", json!("low"));

        let once = batcher.update_entities(std::slice::from_ref(&edit));
        let twice = batcher.update_entities(&[edit.clone(), edit]);

        assert_eq!(once, twice);
        assert_eq!(twice.operations.len(), 1);
    }

    #[test]
    fn test_later_edit_wins_for_same_field() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.update_entities(&[
            EntityEdit::field("t1", "task", "status", json!("blocked")),
            EntityEdit::field("t1", "task", "status", json!("done")),
        ]);

        assert_eq!(outcome.operations.len(), 1);
        assert_eq!(outcome.operations[0].fields.get("status"), Some(&json!("done")));
    }

    #[test]
    fn test_different_fields_accumulate() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.update_entities(&[
            EntityEdit::field("t1", "task", "status", json!("done")),
            EntityEdit::field("t1", "task", "label", json!("Comp")),
            EntityEdit::attrib("t1", "task", "fps", json!(24)),
        ]);

        assert_eq!(outcome.operations.len(), 1);
        let op = &outcome.operations[0];
        assert_eq!(op.fields.len(), 2);
        assert_eq!(op.attrib.len(), 1);
        // Ownership extends with the newly owned attribute only.
        assert_eq!(op.own_attrib, &["fps"]);
        // Task attribute edits have no descendants to invalidate.
        assert!(outcome.inherited_dependents.is_empty());
    }

    #[test]
    fn test_attrib_maps_merge_keywise() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.update_entities(&[
            EntityEdit::attrib("f1", "folder", "priority", json!("low")),
            EntityEdit::attrib("f1", "folder", "fps", json!(24)),
        ]);

        let op = &outcome.operations[0];
        assert_eq!(op.attrib.len(), 2);
        // Existing ownership first, newly owned appended.
        assert_eq!(op.own_attrib, &["priority", "fps"]);
    }

    #[test]
    fn test_already_owned_attrib_not_duplicated() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.update_entities(&[EntityEdit::attrib(
            "f1",
            "folder",
            "priority",
            json!("low"),
        )]);

        assert_eq!(outcome.operations[0].own_attrib, &["priority"]);
    }

    #[test]
    fn test_field_only_op_leaves_ownership_empty() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome =
            batcher.update_entities(&[EntityEdit::field("f1", "folder", "name", json!("Shots"))]);

        assert!(outcome.operations[0].own_attrib.is_empty());
        assert!(outcome.inherited_dependents.is_empty());
    }

    #[test]
    fn test_unsupported_kind_is_skipped() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.update_entities(&[
            EntityEdit::field("f1", "product", "name", json!("x")),
            EntityEdit::field("f1", "", "name", json!("y")),
        ]);

        assert!(outcome.is_empty());
    }

    #[test]
    fn test_unknown_entity_is_skipped() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        let outcome = batcher.update_entities(&[
            EntityEdit::field("ghost", "task", "status", json!("done")),
            EntityEdit::field("t1", "task", "status", json!("done")),
        ]);

        assert_eq!(outcome.operations.len(), 1);
        assert_eq!(outcome.operations[0].entity_id, "t1");
    }

    #[test]
    fn test_empty_batches_are_noops() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);

        assert!(batcher.update_entities(&[]).is_empty());
        assert!(batcher.inherit_from_parent(&[]).is_empty());
        assert!(batcher
            .inherit_from_parent(&[AttribRevert {
                entity_id: "t1".into(),
                entity_kind: "task".into(),
                attribs: Vec::new(),
            }])
            .is_empty());
    }

    #[test]
    fn test_duplicate_reverts_merge() {
        let (table, index) = sample();
        let batcher = MutationBatcher::new(&table, &index);
        let revert = AttribRevert {
            entity_id: "t1".into(),
            entity_kind: "task".into(),
            attribs: vec!["priority".into()],
        };

        let outcome = batcher.inherit_from_parent(&[revert.clone(), revert]);

        assert_eq!(outcome.operations.len(), 1);
        assert_eq!(outcome.inherited_dependents.len(), 1);
        assert_eq!(outcome.inherited_dependents[0].inherited_attribs, &["priority"]);
    }
}
