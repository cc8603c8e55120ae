use serde::{Deserialize, Serialize};

pub const GRID_SIZE: usize = 9;
pub const BOX_SIZE: usize = 3;

/// 9x9 cell matrix, row-major. 0 is an empty cell, 1-9 a placed digit.
///
/// `Copy` semantics: every assignment produces an independent value, so the
/// board, the source mask, and any snapshot derived from either never share
/// backing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid([[u8; GRID_SIZE]; GRID_SIZE]);

impl Grid {
    pub fn empty() -> Self {
        Self([[0; GRID_SIZE]; GRID_SIZE])
    }

    pub fn from_rows(rows: [[u8; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self(rows)
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.0[row][col] = value;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8; GRID_SIZE]> {
        self.0.iter()
    }

    /// Row-major traversal of every cell as `(row, col, value)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &v)| (r, c, v)))
    }

    pub fn has_entries(&self) -> bool {
        self.0.iter().any(|row| row.iter().any(|&v| v != 0))
    }

    /// Every cell within 0-9. Serde admits any u8; inbound boards are
    /// checked before use.
    pub fn values_in_range(&self) -> bool {
        self.0.iter().all(|row| row.iter().all(|&v| v <= 9))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}
