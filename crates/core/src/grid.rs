//! Grid axes — the ordered row/column identity of the rendered table.
//!
//! Selection ranges and keyboard navigation are defined over row/column
//! *positions* (what sits next to what on screen), while cells are
//! addressed by opaque ids. `GridLayout` maps between the two:
//!
//! - id → index for range arithmetic (anchor → target rectangles)
//! - index → id for producing the next focused cell
//!
//! The layout is a snapshot of the rendered axes: rows in flattened
//! hierarchy order, columns in configured order. It is rebuilt whenever
//! the visible rows or column set change, never patched in place.
//! All lookups are O(1).

use rustc_hash::FxHashMap;

use crate::cell::CellRef;

/// Ordered row/column axes with O(1) id↔index lookup in both directions.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    rows: Vec<String>,
    cols: Vec<String>,
    row_index: FxHashMap<String, usize>,
    col_index: FxHashMap<String, usize>,
}

impl GridLayout {
    /// Build a layout from ordered row and column ids.
    ///
    /// Duplicate ids keep their first position; later occurrences are
    /// ignored for index lookup.
    pub fn new(rows: Vec<String>, cols: Vec<String>) -> Self {
        let mut row_index = FxHashMap::default();
        for (i, id) in rows.iter().enumerate() {
            row_index.entry(id.clone()).or_insert(i);
        }
        let mut col_index = FxHashMap::default();
        for (i, id) in cols.iter().enumerate() {
            col_index.entry(id.clone()).or_insert(i);
        }
        Self {
            rows,
            cols,
            row_index,
            col_index,
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn col_count(&self) -> usize {
        self.cols.len()
    }

    /// True if the grid has no addressable cells.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    /// Ordered row ids.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Ordered column ids.
    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    /// Position of a row id - O(1).
    pub fn row_index(&self, row_id: &str) -> Option<usize> {
        self.row_index.get(row_id).copied()
    }

    /// Position of a column id - O(1).
    pub fn col_index(&self, col_id: &str) -> Option<usize> {
        self.col_index.get(col_id).copied()
    }

    /// Row id at a position.
    pub fn row_at(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(String::as_str)
    }

    /// Column id at a position.
    pub fn col_at(&self, index: usize) -> Option<&str> {
        self.cols.get(index).map(String::as_str)
    }

    /// Cell address at a (row, col) position.
    ///
    /// `None` when out of bounds or when an axis id cannot form a valid
    /// address (contains the separator) — such a row renders but is not
    /// addressable, and must not break its neighbors.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<CellRef> {
        let row_id = self.rows.get(row)?;
        let col_id = self.cols.get(col)?;
        CellRef::new(row_id.clone(), col_id.clone()).ok()
    }

    /// (row index, col index) of a cell address, if both axes contain it.
    pub fn position_of(&self, cell: &CellRef) -> Option<(usize, usize)> {
        Some((self.row_index(&cell.row)?, self.col_index(&cell.col)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(
            vec!["f1".into(), "t1".into(), "t2".into()],
            vec!["name".into(), "status".into(), "attrib.priority".into()],
        )
    }

    #[test]
    fn test_index_lookup_both_directions() {
        let g = layout();
        assert_eq!(g.row_index("t1"), Some(1));
        assert_eq!(g.col_index("attrib.priority"), Some(2));
        assert_eq!(g.row_at(2), Some("t2"));
        assert_eq!(g.col_at(0), Some("name"));
        assert_eq!(g.row_index("missing"), None);
    }

    #[test]
    fn test_cell_at_and_position_roundtrip() {
        let g = layout();
        let cell = g.cell_at(1, 2).unwrap();
        assert_eq!(cell.row, "t1");
        assert_eq!(cell.col, "attrib.priority");
        assert_eq!(g.position_of(&cell), Some((1, 2)));
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let g = layout();
        assert!(g.cell_at(3, 0).is_none());
        assert!(g.cell_at(0, 3).is_none());
    }

    #[test]
    fn test_duplicate_ids_keep_first_position() {
        let g = GridLayout::new(
            vec!["a".into(), "a".into(), "b".into()],
            vec!["c".into()],
        );
        assert_eq!(g.row_index("a"), Some(0));
        assert_eq!(g.row_count(), 3);
    }

    #[test]
    fn test_empty() {
        assert!(GridLayout::default().is_empty());
        assert!(GridLayout::new(vec!["r".into()], vec![]).is_empty());
        assert!(!layout().is_empty());
    }
}
