//! Pure reconciliation from a board snapshot to per-cell paint directives.

use std::time::Duration;

use shared::domain::{Grid, GRID_SIZE};

use crate::surface::GridSurface;

/// How long a freshly solved cell keeps its transient marker.
pub const SOLVED_MARKER_DURATION: Duration = Duration::from_millis(500);
/// How long a success status stays up before reverting to the idle prompt.
pub const STATUS_REVERT_DELAY: Duration = Duration::from_secs(3);

/// Presentation directive for one cell. `text == None` clears the cell.
/// `given` marks a recognition-supplied digit; `just_solved` requests the
/// transient marker that the surface drops again after
/// [`SOLVED_MARKER_DURATION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPaint {
    pub row: usize,
    pub col: usize,
    pub text: Option<char>,
    pub given: bool,
    pub just_solved: bool,
}

/// Compute the 81 directives that map `board` onto the surface, row-major.
///
/// A nonzero cell is `given` when the source mask holds a digit there;
/// otherwise it is user- or solver-supplied and, when `animate` is set and
/// its displayed value actually changed, it gets the transient marker.
pub fn reconcile<G: GridSurface + ?Sized>(
    surface: &G,
    board: &Grid,
    source: &Grid,
    animate: bool,
) -> Vec<CellPaint> {
    let mut paints = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    for (row, col, value) in board.cells() {
        let text = char::from_digit(u32::from(value), 10).filter(|_| value != 0);
        let given = value != 0 && source.get(row, col) != 0;
        let changed = match text {
            Some(next) => surface.cell_text(row, col) != next.to_string(),
            None => false,
        };
        let just_solved = animate && value != 0 && !given && changed;
        paints.push(CellPaint {
            row,
            col,
            text,
            given,
            just_solved,
        });
    }
    paints
}

/// Read the edit surface back into an owned board value. Empty or non-digit
/// text is an empty cell.
pub fn read_board<G: GridSurface + ?Sized>(surface: &G) -> Grid {
    let mut board = Grid::empty();
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let value = surface
                .cell_text(row, col)
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|v| (1..=9).contains(v))
                .unwrap_or(0);
            board.set(row, col, value);
        }
    }
    board
}

/// Continuous per-keystroke filter for the live edit surface: keep the first
/// character in `1..=9`, drop everything else.
pub fn filter_cell_input(raw: &str) -> String {
    raw.chars()
        .find(|c| ('1'..='9').contains(c))
        .map(String::from)
        .unwrap_or_default()
}
