//! Seams toward the host toolkit: the 81-cell edit surface and the status
//! line. Business logic only ever goes through these traits.

use shared::domain::GRID_SIZE;

use crate::render::{filter_cell_input, CellPaint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconHint {
    Info,
    Working,
    Check,
    Trophy,
    Warning,
    Eraser,
}

pub trait StatusSink {
    fn status(&mut self, message: &str, severity: Severity, icon: IconHint);
}

/// The grid widget collaborator: 81 single-character text cells addressed by
/// `(row, col)`, each carrying a persistent `given` marker and a transient
/// `just-solved` marker.
pub trait GridSurface {
    fn cell_text(&self, row: usize, col: usize) -> &str;

    /// Apply one reconciliation directive to the addressed cell.
    fn apply(&mut self, paint: &CellPaint);

    /// Drop every transient `just-solved` marker, leaving text and `given`
    /// markers alone.
    fn clear_transient_markers(&mut self);
}

#[derive(Debug, Clone, Default)]
struct CellWidget {
    text: String,
    given: bool,
    just_solved: bool,
}

/// In-memory grid surface used by tests and the console frontend.
#[derive(Debug, Clone, Default)]
pub struct TextGrid {
    cells: Vec<CellWidget>,
}

impl TextGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![CellWidget::default(); GRID_SIZE * GRID_SIZE],
        }
    }

    /// Manual-edit path: each keystroke goes through the single-digit input
    /// filter, independent of the board store.
    pub fn type_into_cell(&mut self, row: usize, col: usize, raw: &str) {
        self.cells[row * GRID_SIZE + col].text = filter_cell_input(raw);
    }

    pub fn is_given(&self, row: usize, col: usize) -> bool {
        self.cells[row * GRID_SIZE + col].given
    }

    pub fn is_just_solved(&self, row: usize, col: usize) -> bool {
        self.cells[row * GRID_SIZE + col].just_solved
    }
}

impl GridSurface for TextGrid {
    fn cell_text(&self, row: usize, col: usize) -> &str {
        &self.cells[row * GRID_SIZE + col].text
    }

    fn apply(&mut self, paint: &CellPaint) {
        let cell = &mut self.cells[paint.row * GRID_SIZE + paint.col];
        cell.text = paint.text.map(String::from).unwrap_or_default();
        cell.given = paint.given;
        cell.just_solved = paint.just_solved;
    }

    fn clear_transient_markers(&mut self) {
        for cell in &mut self.cells {
            cell.just_solved = false;
        }
    }
}
