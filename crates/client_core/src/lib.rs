//! Board-state and session-coordination core for the puzzle controller.
//!
//! Owns the authoritative grid pair (edit board + recognition source mask),
//! validates incoming image files, talks to the recognition and solving
//! endpoints, and drives the idle/busy/success/failed status machine. The
//! widget toolkit sits behind [`surface::GridSurface`]; rendering decisions
//! are computed as plain [`render::CellPaint`] directives so the whole
//! controller is testable without a UI.

pub mod client;
pub mod intake;
pub mod render;
pub mod session;
pub mod surface;

pub use client::{PuzzleServiceClient, RecognizeError, SolveError};
pub use intake::{CandidateFile, ImagePayload, IntakeError, MAX_IMAGE_BYTES};
pub use render::{
    filter_cell_input, reconcile, CellPaint, SOLVED_MARKER_DURATION, STATUS_REVERT_DELAY,
};
pub use session::{Outcome, Phase, PuzzleSession, SessionHandle, READY_PROMPT};
pub use surface::{GridSurface, IconHint, Severity, StatusSink, TextGrid};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
