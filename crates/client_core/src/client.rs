//! HTTP clients for the recognition and solving endpoints.

use reqwest::Client;
use shared::{
    domain::Grid,
    protocol::{RecognizeRequest, RecognizeResponse, SolveRequest, SolveResponse},
};
use thiserror::Error;

use crate::intake::ImagePayload;

/// The `Display` strings double as the user-facing status messages, so the
/// session layer surfaces failures without re-wording them.
#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("Server error ({status}): {body}")]
    Service { status: u16, body: String },
    #[error("No puzzle detected in image. Please try a clearer image.")]
    NoPuzzleDetected,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("Server error ({status}): {body}")]
    Service { status: u16, body: String },
    #[error("No solution found for this puzzle.")]
    NoSolutionFound,
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct PuzzleServiceClient {
    http: Client,
    base_url: String,
}

impl PuzzleServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Submit an image payload; a 2xx response either carries the detected
    /// grid or reports that no puzzle was found.
    pub async fn recognize(&self, payload: &ImagePayload) -> Result<Grid, RecognizeError> {
        let res = self
            .http
            .post(format!("{}/process-image", self.base_url))
            .json(&RecognizeRequest {
                image: payload.as_str().to_string(),
            })
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(RecognizeError::Service { status, body });
        }
        let body: RecognizeResponse = res.json().await?;
        body.grid.ok_or(RecognizeError::NoPuzzleDetected)
    }

    /// Submit the current board; a 2xx response carries a solution, a
    /// semantic rejection from the solver, or neither.
    pub async fn solve(&self, board: &Grid) -> Result<Grid, SolveError> {
        let res = self
            .http
            .post(format!("{}/solve-puzzle", self.base_url))
            .json(&SolveRequest { board: *board })
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(SolveError::Service { status, body });
        }
        let body: SolveResponse = res.json().await?;
        if let Some(solution) = body.solution {
            return Ok(solution);
        }
        match body.error {
            Some(message) => Err(SolveError::Rejected(message)),
            None => Err(SolveError::NoSolutionFound),
        }
    }
}
