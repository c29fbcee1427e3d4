//! Cell identity for the hierarchy table.
//!
//! A cell is addressed by a `(row id, column id)` pair: rows are entity ids,
//! columns are field ids (`"status"`), attribute ids (`"attrib.priority"`),
//! or the reserved row-selection pseudo-column. The pair also travels as a
//! single opaque string wherever a flat key is needed (selection sets,
//! element ids), so the encoding must be injective and reversible.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the row and column parts of an encoded cell id.
///
/// Chosen outside the identifier charset: upstream ids are restricted to
/// `[A-Za-z0-9_-]`, and attribute columns add only `.`. Neither part of a
/// valid address can contain it.
pub const CELL_SEPARATOR: char = ':';

/// Reserved column id addressing a whole row rather than a specific field.
pub const ROW_SELECTION_COLUMN: &str = "__row__";

/// Reserved row id for the "no value" group marker row.
pub const NO_VALUE_ROW: &str = "__no-value__";

/// Reserved row id for the "has value" group marker row.
pub const HAS_VALUE_ROW: &str = "__has-value__";

/// Prefix distinguishing attribute columns from plain field columns.
pub const ATTRIB_COLUMN_PREFIX: &str = "attrib.";

/// True if `row_id` is one of the group marker rows.
///
/// Marker rows are mutually exclusive with normal row multi-select:
/// selecting one always collapses the selection to that row alone
/// (see `SelectionState::select_cell`).
pub fn is_value_marker_row(row_id: &str) -> bool {
    row_id == NO_VALUE_ROW || row_id == HAS_VALUE_ROW
}

/// The attribute name of an attribute column id, or `None` for plain fields.
///
/// `attrib.priority` → `Some("priority")`, `status` → `None`.
pub fn attrib_column_name(col_id: &str) -> Option<&str> {
    col_id.strip_prefix(ATTRIB_COLUMN_PREFIX)
}

/// Error for identifiers that cannot form a cell address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The identifier contains the reserved separator character.
    InvalidIdentifier(String),
    /// The identifier is empty.
    EmptyIdentifier,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier(id) => {
                write!(f, "identifier '{id}' contains reserved separator '{CELL_SEPARATOR}'")
            }
            Self::EmptyIdentifier => write!(f, "empty identifier"),
        }
    }
}

impl std::error::Error for AddressError {}

/// Address of a single cell: a row (entity) id plus a column (field) id.
///
/// # Invariants
///
/// - Neither part is empty or contains [`CELL_SEPARATOR`] — enforced at
///   construction, so `CellRef::parse(r.encode())` returns the original
///   address for every `r` that exists.
/// - Encoding cannot collide across differently-shaped inputs: a valid
///   encoded id contains exactly one separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: String,
    pub col: String,
}

impl CellRef {
    /// Create a cell address, rejecting ids that cannot round-trip.
    pub fn new(row: impl Into<String>, col: impl Into<String>) -> Result<Self, AddressError> {
        let row = row.into();
        let col = col.into();
        if row.is_empty() || col.is_empty() {
            return Err(AddressError::EmptyIdentifier);
        }
        if row.contains(CELL_SEPARATOR) {
            return Err(AddressError::InvalidIdentifier(row));
        }
        if col.contains(CELL_SEPARATOR) {
            return Err(AddressError::InvalidIdentifier(col));
        }
        Ok(Self { row, col })
    }

    /// Address of the row-selection pseudo-cell for `row`.
    pub fn row_selection(row: impl Into<String>) -> Result<Self, AddressError> {
        Self::new(row, ROW_SELECTION_COLUMN)
    }

    /// Encode into the opaque `row:col` form.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.row, CELL_SEPARATOR, self.col)
    }

    /// Decode an encoded cell id, splitting on the first separator.
    ///
    /// Returns `None` for anything that `encode` could not have produced
    /// (no separator, empty part, second separator), so callers treat bad
    /// ids as "no selection" instead of failing the whole grid.
    pub fn parse(cell_id: &str) -> Option<Self> {
        let (row, col) = cell_id.split_once(CELL_SEPARATOR)?;
        if row.is_empty() || col.is_empty() || col.contains(CELL_SEPARATOR) {
            return None;
        }
        Some(Self {
            row: row.to_string(),
            col: col.to_string(),
        })
    }

    /// True if this address is in the row-selection pseudo-column.
    pub fn is_row_selection(&self) -> bool {
        self.col == ROW_SELECTION_COLUMN
    }

    /// True if this address sits on a group marker row.
    pub fn is_marker_row(&self) -> bool {
        is_value_marker_row(&self.row)
    }

    /// True if this address is in an attribute column.
    pub fn is_attrib_column(&self) -> bool {
        attrib_column_name(&self.col).is_some()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.row, CELL_SEPARATOR, self.col)
    }
}
