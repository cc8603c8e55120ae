//! Puzzle session: authoritative grids, the status machine, and the
//! orchestration of recognition and solve operations.

use std::sync::Arc;

use shared::domain::Grid;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    client::PuzzleServiceClient,
    intake::{CandidateFile, ImagePayload},
    render::{self, SOLVED_MARKER_DURATION, STATUS_REVERT_DELAY},
    surface::{GridSurface, IconHint, Severity, StatusSink},
};

/// Idle prompt shown at startup and after a reset.
pub const READY_PROMPT: &str = "Upload an image of a Sudoku puzzle to begin.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Busy { label: String },
    Success { message: String },
    Failed { message: String },
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Busy { .. })
    }
}

/// What became of a requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Another operation was in flight; nothing was started.
    RejectedBusy,
    /// Solve was requested with nothing on the board.
    RejectedEmptyBoard,
    /// The operation ran and failed; the message went to the status surface.
    Failed,
}

/// One puzzle session: lives from load/clear to the next load/clear.
///
/// All state is owned here and passed explicitly; the generation counter
/// invalidates scheduled callbacks from superseded operations.
pub struct PuzzleSession<G: GridSurface, S: StatusSink> {
    pub(crate) client: PuzzleServiceClient,
    pub(crate) surface: G,
    pub(crate) status: S,
    pub(crate) board: Grid,
    pub(crate) source: Grid,
    pub(crate) phase: Phase,
    pub(crate) generation: u64,
}

impl<G: GridSurface, S: StatusSink> PuzzleSession<G, S> {
    pub fn new(client: PuzzleServiceClient, surface: G, mut status: S) -> Self {
        status.status(READY_PROMPT, Severity::Info, IconHint::Info);
        Self {
            client,
            surface,
            status,
            board: Grid::empty(),
            source: Grid::empty(),
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn board(&self) -> &Grid {
        &self.board
    }

    pub fn source(&self) -> &Grid {
        &self.source
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn surface(&self) -> &G {
        &self.surface
    }

    /// Manual edits go straight at the surface; the board store picks them
    /// up on the next read.
    pub fn surface_mut(&mut self) -> &mut G {
        &mut self.surface
    }

    /// Fresh value snapshot of the edit surface.
    pub fn read_board(&self) -> Grid {
        render::read_board(&self.surface)
    }

    pub fn set_board(&mut self, board: Grid) {
        self.board = board;
    }

    pub fn set_source(&mut self, source: Grid) {
        self.source = source;
    }

    pub fn clear_grids(&mut self) {
        self.board = Grid::empty();
        self.source = Grid::empty();
    }

    /// The solve action is available when nothing is in flight and the grid
    /// holds at least one digit.
    pub fn solve_enabled(&self) -> bool {
        !self.phase.is_busy() && self.read_board().has_entries()
    }

    /// Validate and encode the file, then run it through recognition. On
    /// success both the source mask and the board become the detected grid.
    pub async fn submit_image(&mut self, file: CandidateFile) -> Outcome {
        if self.reject_if_busy("image submission") {
            return Outcome::RejectedBusy;
        }
        self.generation = self.generation.wrapping_add(1);

        let payload = match ImagePayload::encode(&file) {
            Ok(payload) => payload,
            Err(err) => return self.fail(err.to_string()),
        };

        self.begin("Analyzing image...", "Processing image...");
        match self.client.recognize(&payload).await {
            Ok(grid) => {
                self.source = grid;
                self.board = grid;
                self.repaint(false);
                self.succeed(
                    "Puzzle detected successfully! Ready to solve.",
                    IconHint::Check,
                )
            }
            Err(err) => self.fail(err.to_string()),
        }
    }

    /// Read the edit surface, submit it for solving, and adopt the returned
    /// solution as the new board. The source mask is untouched so given
    /// cells stay distinguishable from solved ones.
    pub async fn solve(&mut self) -> Outcome {
        if self.reject_if_busy("solve") {
            return Outcome::RejectedBusy;
        }
        self.generation = self.generation.wrapping_add(1);

        let board = self.read_board();
        if !board.has_entries() {
            warn!("solve requested with an empty board");
            return Outcome::RejectedEmptyBoard;
        }
        self.board = board;

        self.begin("Solving puzzle...", "Solving puzzle...");
        match self.client.solve(&board).await {
            Ok(solution) => {
                self.board = solution;
                self.repaint(true);
                self.succeed("Puzzle solved successfully!", IconHint::Trophy)
            }
            Err(err) => self.fail(err.to_string()),
        }
    }

    pub fn clear(&mut self) -> Outcome {
        if self.reject_if_busy("clear") {
            return Outcome::RejectedBusy;
        }
        self.generation = self.generation.wrapping_add(1);
        self.clear_grids();
        self.repaint(false);
        self.phase = Phase::Idle;
        self.status
            .status("Board cleared.", Severity::Info, IconHint::Eraser);
        Outcome::Completed
    }

    pub fn reset(&mut self) -> Outcome {
        if self.reject_if_busy("reset") {
            return Outcome::RejectedBusy;
        }
        self.generation = self.generation.wrapping_add(1);
        self.clear_grids();
        self.repaint(false);
        self.phase = Phase::Idle;
        self.status.status(READY_PROMPT, Severity::Info, IconHint::Info);
        Outcome::Completed
    }

    /// Scheduled callback: drop a success status back to the idle prompt.
    /// No-ops when the session has moved on or the status is no longer the
    /// success it was armed for.
    pub fn revert_status(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        if matches!(self.phase, Phase::Success { .. }) {
            self.phase = Phase::Idle;
            self.status
                .status("Ready for next puzzle", Severity::Info, IconHint::Info);
        }
    }

    /// Scheduled callback: remove transient solved markers from the surface.
    pub fn clear_solved_markers(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        self.surface.clear_transient_markers();
    }

    fn reject_if_busy(&self, action: &str) -> bool {
        if self.phase.is_busy() {
            warn!(action, "rejected: another operation is in flight");
            return true;
        }
        false
    }

    fn begin(&mut self, label: &str, message: &str) {
        info!(operation = label, "operation started");
        self.phase = Phase::Busy {
            label: label.to_string(),
        };
        self.status.status(message, Severity::Info, IconHint::Working);
    }

    fn succeed(&mut self, message: &str, icon: IconHint) -> Outcome {
        info!(status = message, "operation succeeded");
        self.phase = Phase::Success {
            message: message.to_string(),
        };
        self.status.status(message, Severity::Success, icon);
        Outcome::Completed
    }

    fn fail(&mut self, message: String) -> Outcome {
        warn!(error = %message, "operation failed");
        self.status.status(&message, Severity::Error, IconHint::Warning);
        self.phase = Phase::Failed { message };
        Outcome::Failed
    }

    fn repaint(&mut self, animate: bool) {
        let paints = render::reconcile(&self.surface, &self.board, &self.source, animate);
        for paint in &paints {
            self.surface.apply(paint);
        }
    }
}

/// Shared handle for hosts: serializes operations (a second caller during an
/// in-flight operation is rejected, never queued) and arms the success
/// auto-revert and solved-marker timers.
pub struct SessionHandle<G: GridSurface, S: StatusSink> {
    pub(crate) inner: Arc<Mutex<PuzzleSession<G, S>>>,
}

impl<G: GridSurface, S: StatusSink> Clone for SessionHandle<G, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G, S> SessionHandle<G, S>
where
    G: GridSurface + Send + 'static,
    S: StatusSink + Send + 'static,
{
    pub fn new(session: PuzzleSession<G, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn submit_image(&self, file: CandidateFile) -> Outcome {
        let Ok(mut session) = self.inner.try_lock() else {
            warn!("image submission rejected: an operation is already in flight");
            return Outcome::RejectedBusy;
        };
        let outcome = session.submit_image(file).await;
        self.arm_timers(&session, false);
        outcome
    }

    pub async fn solve(&self) -> Outcome {
        let Ok(mut session) = self.inner.try_lock() else {
            warn!("solve rejected: an operation is already in flight");
            return Outcome::RejectedBusy;
        };
        let outcome = session.solve().await;
        self.arm_timers(&session, true);
        outcome
    }

    pub async fn clear(&self) -> Outcome {
        let Ok(mut session) = self.inner.try_lock() else {
            return Outcome::RejectedBusy;
        };
        session.clear()
    }

    pub async fn reset(&self) -> Outcome {
        let Ok(mut session) = self.inner.try_lock() else {
            return Outcome::RejectedBusy;
        };
        session.reset()
    }

    /// Run a closure against the session, e.g. for manual edits or for
    /// reading the grids back out.
    pub async fn with_session<R>(&self, f: impl FnOnce(&mut PuzzleSession<G, S>) -> R) -> R {
        let mut session = self.inner.lock().await;
        f(&mut session)
    }

    /// After a successful operation, schedule the 3 s status revert and,
    /// for animated repaints, the 500 ms marker clear. Both callbacks carry
    /// the generation they were armed under and no-op once it moves on.
    fn arm_timers(&self, session: &PuzzleSession<G, S>, animated: bool) {
        if !matches!(session.phase(), Phase::Success { .. }) {
            return;
        }
        let generation = session.generation();

        let revert = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(STATUS_REVERT_DELAY).await;
            revert.lock().await.revert_status(generation);
        });

        if animated {
            let markers = Arc::clone(&self.inner);
            tokio::spawn(async move {
                tokio::time::sleep(SOLVED_MARKER_DURATION).await;
                markers.lock().await.clear_solved_markers(generation);
            });
        }
    }
}
