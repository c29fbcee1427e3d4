//! Keyboard navigation over the grid as a pure state transition.
//!
//! `navigate` maps (selection, layout, key, modifiers, context) to a
//! [`NavOutcome`] without touching any shared state; the embedder
//! applies the returned selection or opens the editor. Key events are
//! pre-filtered by the caller into [`NavContext`]: while a cell editor
//! or any text-input-like element owns the keystream, every key is
//! ignored here so normal text editing is never hijacked.

use crate::cell::CellRef;
use crate::grid::GridLayout;
use crate::selection::SelectionState;

/// Keys the navigator understands. Everything else stays with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NavModifiers {
    pub shift: bool,
}

/// Caller-supplied classification of the key event's origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavContext {
    /// A cell is currently in edit mode.
    pub editing: bool,
    /// The event originates from a text input or content-editable element.
    pub from_text_input: bool,
}

/// Result of a navigation transition.
#[derive(Debug, Clone)]
pub enum NavOutcome {
    /// The key is not for us, or the move would not change anything.
    Ignored,
    /// Focus moved; the new selection to commit.
    Moved(SelectionState),
    /// Enter on a focused cell: open its editor.
    EnterEdit(CellRef),
}

/// Apply one key to the current selection.
///
/// Arrows move focus by one cell, clamped at the grid boundary; with
/// Shift they range-select from the anchor instead of replacing.
/// Tab/Shift+Tab step through columns and wrap to the next/previous
/// row, a no-op at the absolute last/first cell. Enter opens the
/// focused cell for editing.
pub fn navigate(
    selection: &SelectionState,
    layout: &GridLayout,
    key: NavKey,
    modifiers: NavModifiers,
    context: &NavContext,
) -> NavOutcome {
    if context.editing || context.from_text_input {
        return NavOutcome::Ignored;
    }

    match key {
        NavKey::Up => arrow(selection, layout, -1, 0, modifiers.shift),
        NavKey::Down => arrow(selection, layout, 1, 0, modifiers.shift),
        NavKey::Left => arrow(selection, layout, 0, -1, modifiers.shift),
        NavKey::Right => arrow(selection, layout, 0, 1, modifiers.shift),
        NavKey::Tab => tab(selection, layout, modifiers.shift),
        NavKey::Enter => match selection.focused() {
            Some(cell) => NavOutcome::EnterEdit(cell.clone()),
            None => NavOutcome::Ignored,
        },
    }
}

fn arrow(
    selection: &SelectionState,
    layout: &GridLayout,
    d_row: isize,
    d_col: isize,
    extend_range: bool,
) -> NavOutcome {
    let (row, col) = match focused_position(selection, layout) {
        Some(pos) => pos,
        None => return NavOutcome::Ignored,
    };

    let new_row = clamp_step(row, d_row, layout.row_count());
    let new_col = clamp_step(col, d_col, layout.col_count());
    if (new_row, new_col) == (row, col) {
        // Clamped against the boundary: focus unchanged.
        return NavOutcome::Ignored;
    }

    move_to(selection, layout, new_row, new_col, extend_range)
}

fn tab(selection: &SelectionState, layout: &GridLayout, backwards: bool) -> NavOutcome {
    let (row, col) = match focused_position(selection, layout) {
        Some(pos) => pos,
        None => return NavOutcome::Ignored,
    };

    let target = if backwards {
        if col > 0 {
            Some((row, col - 1))
        } else if row > 0 {
            Some((row - 1, layout.col_count() - 1))
        } else {
            None
        }
    } else if col + 1 < layout.col_count() {
        Some((row, col + 1))
    } else if row + 1 < layout.row_count() {
        Some((row + 1, 0))
    } else {
        None
    };

    match target {
        Some((r, c)) => move_to(selection, layout, r, c, false),
        None => NavOutcome::Ignored,
    }
}

fn move_to(
    selection: &SelectionState,
    layout: &GridLayout,
    row: usize,
    col: usize,
    extend_range: bool,
) -> NavOutcome {
    let target = match layout.cell_at(row, col) {
        Some(cell) => cell,
        None => return NavOutcome::Ignored,
    };
    let mut next = selection.clone();
    next.select_cell(layout, target, false, extend_range);
    NavOutcome::Moved(next)
}

fn focused_position(selection: &SelectionState, layout: &GridLayout) -> Option<(usize, usize)> {
    layout.position_of(selection.focused()?)
}

fn clamp_step(index: usize, delta: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    (index as isize + delta).clamp(0, len as isize - 1) as usize
}
