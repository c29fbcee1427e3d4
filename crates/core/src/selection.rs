//! Cell selection state for the hierarchy table.
//!
//! Selection is a set of cell addresses plus a focused cell and a
//! range anchor, mutated only through [`SelectionState`]'s methods.
//!
//! Invariants:
//! - `focused`, when set, is a member of `cells`.
//! - A marker-row cell, when selected, is the only selected cell.
//! - `anchor` tracks the origin of the last non-range select; range
//!   selects leave it in place.
//! - Membership checks are O(1) (the renderer asks per visible cell).

use rustc_hash::FxHashSet;

use crate::cell::{is_value_marker_row, CellRef};
use crate::grid::GridLayout;

/// Classification of the current selection by the axes it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionShape {
    Empty,
    /// Exactly one cell.
    Single,
    /// Multiple cells confined to one row.
    Row,
    /// Multiple cells confined to one column.
    Column,
    /// Spans more than one row and more than one column.
    Grid,
}

/// The selection model: a cell set with focus and range anchor.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    cells: FxHashSet<CellRef>,
    focused: Option<CellRef>,
    anchor: Option<CellRef>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused cell, if any.
    pub fn focused(&self) -> Option<&CellRef> {
        self.focused.as_ref()
    }

    /// The range-select origin, if any.
    pub fn anchor(&self) -> Option<&CellRef> {
        self.anchor.as_ref()
    }

    /// Check if a cell is selected - O(1).
    pub fn contains(&self, cell: &CellRef) -> bool {
        self.cells.contains(cell)
    }

    /// Number of selected cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over selected cells in arbitrary order.
    pub fn cells(&self) -> impl Iterator<Item = &CellRef> {
        self.cells.iter()
    }

    /// Reset to no selection (navigation away from the table).
    pub fn clear(&mut self) {
        self.cells.clear();
        self.focused = None;
        self.anchor = None;
    }

    /// Apply a pointer select to `cell`.
    ///
    /// - no modifiers: replace the selection with `cell`, which becomes
    ///   both focus and anchor;
    /// - `extend` (ctrl/cmd): toggle membership of `cell`; anchor moves
    ///   to `cell`;
    /// - `range` (shift): union the anchor→`cell` rectangle (or line)
    ///   into the selection, using layout indexes; anchor stays, focus
    ///   moves to `cell`. Takes precedence over `extend` when both are
    ///   set. Without a usable anchor this degrades to a plain select.
    ///
    /// Cells on a value-marker row force a plain single select whatever
    /// the modifiers: marker rows are mutually exclusive with normal
    /// multi-select. The exclusivity cuts both ways — range sweeps skip
    /// marker rows, and extend/range gestures drop a previously selected
    /// marker cell before growing the selection.
    pub fn select_cell(&mut self, layout: &GridLayout, cell: CellRef, extend: bool, range: bool) {
        if cell.is_marker_row() {
            self.replace_with(cell);
            return;
        }
        if range {
            self.drop_marker_cells();
            if self.select_range_to(layout, &cell) {
                return;
            }
            // Anchor missing or no longer in the layout.
            self.replace_with(cell);
            return;
        }
        if extend {
            self.drop_marker_cells();
            self.toggle(cell);
            return;
        }
        self.replace_with(cell);
    }

    /// True iff the selection spans more than one distinct row *and*
    /// more than one distinct column.
    pub fn is_grid_selection(&self) -> bool {
        let (rows, cols) = self.span();
        rows > 1 && cols > 1
    }

    /// Classify the selection by the axes it spans.
    pub fn shape(&self) -> SelectionShape {
        match (self.cells.len(), self.span()) {
            (0, _) => SelectionShape::Empty,
            (1, _) => SelectionShape::Single,
            (_, (_, 1)) => SelectionShape::Column,
            (_, (1, _)) => SelectionShape::Row,
            _ => SelectionShape::Grid,
        }
    }

    /// Distinct selected row ids in layout order.
    ///
    /// Rows that have dropped out of the layout since they were
    /// selected are skipped; entity-level actions only see visible
    /// rows.
    pub fn selected_rows(&self, layout: &GridLayout) -> Vec<String> {
        let mut indexed: Vec<(usize, &str)> = Vec::new();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for cell in &self.cells {
            if !seen.insert(&cell.row) {
                continue;
            }
            if let Some(i) = layout.row_index(&cell.row) {
                indexed.push((i, &cell.row));
            }
        }
        indexed.sort_unstable_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, id)| id.to_string()).collect()
    }

    fn replace_with(&mut self, cell: CellRef) {
        self.cells.clear();
        self.cells.insert(cell.clone());
        self.focused = Some(cell.clone());
        self.anchor = Some(cell);
    }

    fn toggle(&mut self, cell: CellRef) {
        if self.cells.remove(&cell) {
            if self.focused.as_ref() == Some(&cell) {
                self.focused = None;
            }
        } else {
            self.cells.insert(cell.clone());
            self.focused = Some(cell.clone());
        }
        self.anchor = Some(cell);
    }

    /// A marker cell is only ever selected alone; gestures that grow the
    /// selection drop it (and its focus) first. The anchor is left in
    /// place so a marker row can still serve as a range origin.
    fn drop_marker_cells(&mut self) {
        if matches!(&self.focused, Some(f) if f.is_marker_row()) {
            self.focused = None;
        }
        self.cells.retain(|c| !c.is_marker_row());
    }

    /// Union the anchor→target rectangle into the selection, skipping
    /// marker rows inside it. Returns false when the anchor or target
    /// cannot be located in the layout.
    fn select_range_to(&mut self, layout: &GridLayout, target: &CellRef) -> bool {
        let anchor = match &self.anchor {
            Some(a) => a.clone(),
            None => return false,
        };
        let (ar, ac) = match layout.position_of(&anchor) {
            Some(pos) => pos,
            None => return false,
        };
        let (tr, tc) = match layout.position_of(target) {
            Some(pos) => pos,
            None => return false,
        };
        let (r0, r1) = (ar.min(tr), ar.max(tr));
        let (c0, c1) = (ac.min(tc), ac.max(tc));
        for r in r0..=r1 {
            if matches!(layout.row_at(r), Some(id) if is_value_marker_row(id)) {
                continue;
            }
            for c in c0..=c1 {
                if let Some(cell) = layout.cell_at(r, c) {
                    self.cells.insert(cell);
                }
            }
        }
        self.focused = Some(target.clone());
        true
    }

    /// Distinct (row, column) counts across the selected cells.
    fn span(&self) -> (usize, usize) {
        let mut rows: FxHashSet<&str> = FxHashSet::default();
        let mut cols: FxHashSet<&str> = FxHashSet::default();
        for cell in &self.cells {
            rows.insert(&cell.row);
            cols.insert(&cell.col);
        }
        (rows.len(), cols.len())
    }
}
