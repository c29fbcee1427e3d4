//! `trellis-engine` — the data side of the hierarchy table.
//!
//! Pure engine crate: receives entity snapshots from the fetch
//! collaborator, answers hierarchy and inheritance queries, and turns
//! sparse cell edits into deduplicated entity operations for the
//! persistence collaborator. No UI or IO dependencies.

pub mod batch;
pub mod entity;
pub mod hierarchy;
pub mod inherit;
pub mod ops;

pub use batch::MutationBatcher;
pub use entity::{Entity, EntityKind, EntityTable};
pub use hierarchy::HierarchyIndex;
pub use inherit::{affected_descendants, AttribChange, InheritedDependent};
pub use ops::{AttribRevert, BatchOutcome, EditTarget, EntityEdit, PendingOperation};
