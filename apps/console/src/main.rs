use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{
    CandidateFile, IconHint, Outcome, Phase, PuzzleServiceClient, PuzzleSession, SessionHandle,
    Severity, StatusSink, TextGrid,
};
use shared::domain::GRID_SIZE;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    server_url: String,
    /// Image file to run through recognition.
    #[arg(long)]
    image: Option<PathBuf>,
    /// 81 characters, row-major; digits 1-9, with '0' or '.' for empty.
    #[arg(long)]
    board: Option<String>,
    /// Request a solution once the board is loaded.
    #[arg(long)]
    solve: bool,
}

struct ConsoleStatus;

impl StatusSink for ConsoleStatus {
    fn status(&mut self, message: &str, severity: Severity, _icon: IconHint) {
        let tag = match severity {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        println!("[{tag}] {message}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let client = PuzzleServiceClient::new(&args.server_url);
    let session = PuzzleSession::new(client, TextGrid::new(), ConsoleStatus);
    let handle = SessionHandle::new(session);

    if let Some(path) = &args.image {
        let file = CandidateFile::load(path)
            .await
            .map_err(|err| anyhow!("{err}"))?;
        bail_on_failure(handle.submit_image(file).await, &handle).await?;
    }

    if let Some(board) = &args.board {
        let cells = parse_board_string(board)?;
        handle
            .with_session(|session| {
                for (index, value) in cells.iter().enumerate() {
                    let (row, col) = (index / GRID_SIZE, index % GRID_SIZE);
                    session
                        .surface_mut()
                        .type_into_cell(row, col, &value.to_string());
                }
            })
            .await;
    }

    if args.solve {
        bail_on_failure(handle.solve().await, &handle).await?;
    }

    let rendering = handle.with_session(|session| render_board(session.surface())).await;
    println!("{rendering}");
    Ok(())
}

async fn bail_on_failure(
    outcome: Outcome,
    handle: &SessionHandle<TextGrid, ConsoleStatus>,
) -> Result<()> {
    match outcome {
        Outcome::Completed => Ok(()),
        Outcome::RejectedBusy => Err(anyhow!("another operation is already in flight")),
        Outcome::RejectedEmptyBoard => Err(anyhow!("the board is empty; nothing to solve")),
        Outcome::Failed => {
            let message = handle
                .with_session(|session| match session.phase() {
                    Phase::Failed { message } => message.clone(),
                    _ => "operation failed".to_string(),
                })
                .await;
            Err(anyhow!(message))
        }
    }
}

fn parse_board_string(raw: &str) -> Result<Vec<u8>> {
    let cells: Vec<u8> = raw
        .chars()
        .filter_map(|c| match c {
            '1'..='9' => Some(c.to_digit(10).unwrap_or(0) as u8),
            '0' | '.' | '_' => Some(0),
            _ => None,
        })
        .collect();
    if cells.len() != GRID_SIZE * GRID_SIZE {
        return Err(anyhow!(
            "expected 81 cells in the board string, got {}",
            cells.len()
        ));
    }
    Ok(cells)
}

fn render_board(surface: &TextGrid) -> String {
    use client_core::GridSurface;

    let mut out = String::new();
    for row in 0..GRID_SIZE {
        if row > 0 && row % 3 == 0 {
            out.push_str("------+-------+------\n");
        }
        for col in 0..GRID_SIZE {
            if col > 0 && col % 3 == 0 {
                out.push_str("| ");
            }
            let text = surface.cell_text(row, col);
            out.push_str(if text.is_empty() { "." } else { text });
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dots_and_zeros_as_empty_cells() {
        let raw = "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
        let cells = parse_board_string(raw).expect("parse");
        assert_eq!(cells.len(), 81);
        assert_eq!(cells[0], 5);
        assert_eq!(cells[2], 0);
    }

    #[test]
    fn rejects_short_board_strings() {
        assert!(parse_board_string("123").is_err());
    }
}
