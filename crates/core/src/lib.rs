//! `trellis-core` — cell addressing, grid axes, selection, and keyboard
//! navigation for the hierarchy table.
//!
//! Pure state crate: every operation takes the current state plus a
//! [`GridLayout`] snapshot and returns a new state. No I/O, no UI
//! dependencies. The embedding application owns rendering and event
//! plumbing; this crate owns what a click or keystroke *means*.

pub mod cell;
pub mod grid;
pub mod nav;
pub mod selection;

pub use cell::{AddressError, CellRef, ROW_SELECTION_COLUMN};
pub use grid::GridLayout;
pub use nav::{navigate, NavContext, NavKey, NavModifiers, NavOutcome};
pub use selection::{SelectionShape, SelectionState};
