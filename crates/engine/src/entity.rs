//! Entity snapshot - the flat list handed in by the entity source.
//!
//! Entities arrive as one flat list per fetch; [`EntityTable`] wraps it
//! with O(1) id lookup while preserving input order. The table is a
//! snapshot: built fresh per fetch, never patched in place. Mutations
//! go through the batch module and come back as a new snapshot from the
//! source.
//!
//! # Attribute ownership
//!
//! `own_attrib` lists the attribute names explicitly set on an entity;
//! for those, `attrib` holds the authoritative value. For any other
//! attribute name the effective value is the nearest ancestor's own
//! value, falling back to the schema default when no ancestor owns it.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an entity is. Folders contain children; tasks are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Folder,
    Task,
}

impl EntityKind {
    /// Parse a kind string from an edit event. `None` for anything the
    /// engine does not handle (unsupported kinds are filtered upstream,
    /// not erred).
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "folder" => Some(Self::Folder),
            "task" => Some(Self::Task),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Task => "task",
        }
    }

    /// Containers can have children and therefore propagate attribute
    /// values downward.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Folder)
    }
}

/// A node in the production hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub kind: EntityKind,
    /// `None` for roots. A parent id the snapshot does not contain is
    /// treated as a root as well.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Attribute names explicitly set on this entity.
    #[serde(default)]
    pub own_attrib: Vec<String>,
    /// Attribute name → value, own and currently-resolved inherited
    /// values alike.
    #[serde(default)]
    pub attrib: FxHashMap<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<String>, kind: EntityKind, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            kind,
            parent_id: parent_id.map(str::to_string),
            own_attrib: Vec::new(),
            attrib: FxHashMap::default(),
        }
    }

    /// True if `attrib` is explicitly set on this entity rather than
    /// inherited.
    pub fn owns(&self, attrib: &str) -> bool {
        self.own_attrib.iter().any(|a| a == attrib)
    }
}

/// One entity snapshot: input order plus O(1) lookup by id.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    order: Vec<String>,
    by_id: FxHashMap<String, Entity>,
}

impl EntityTable {
    /// Build a table from the source's flat list. A duplicated id keeps
    /// its first position; the later entity replaces the earlier one.
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let mut order = Vec::with_capacity(entities.len());
        let mut by_id = FxHashMap::default();
        for entity in entities {
            if !by_id.contains_key(&entity.id) {
                order.push(entity.id.clone());
            }
            by_id.insert(entity.id.clone(), entity);
        }
        Self { order, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entity ids in input order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Entities in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Resolve the effective value of `attrib` for an entity: its own
    /// value when owned, otherwise the nearest owning ancestor's value.
    ///
    /// `None` means no ancestor owns the attribute; the caller falls
    /// back to the schema default. The parent walk is guarded against
    /// cyclic parentage and gives up (partial answer) on revisit.
    pub fn effective_attrib(&self, id: &str, attrib: &str) -> Option<&Value> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut current = self.get(id)?;
        loop {
            if !visited.insert(current.id.as_str()) {
                log::warn!(
                    "cyclic parentage while resolving attrib {:?} from entity {:?}",
                    attrib,
                    id
                );
                return None;
            }
            if current.owns(attrib) {
                return current.attrib.get(attrib);
            }
            current = self.get(current.parent_id.as_deref()?)?;
        }
    }
}
