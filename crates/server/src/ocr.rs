//! Call-out to the OCR vendor and projection of its word overlay onto the
//! 9x9 lattice.

use serde::Deserialize;
use shared::domain::{Grid, GRID_SIZE};

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: String,
    pub api_key: String,
}

/// Vendor response, PascalCase wire names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OcrResponse {
    #[serde(default)]
    pub is_errored_on_processing: bool,
    #[serde(default)]
    pub error_message: Vec<String>,
    #[serde(default)]
    pub parsed_results: Vec<ParsedResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParsedResult {
    #[serde(default)]
    pub text_overlay: TextOverlay,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextOverlay {
    #[serde(default)]
    pub lines: Vec<Line>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Line {
    #[serde(default)]
    pub words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Word {
    pub word_text: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

pub async fn recognize_image(
    http: &reqwest::Client,
    config: &OcrConfig,
    image: &str,
) -> Result<OcrResponse, reqwest::Error> {
    let form = [
        ("base64Image", image),
        ("OCREngine", "2"),
        ("isOverlayRequired", "true"),
        ("detectOrientation", "true"),
    ];
    http.post(&config.endpoint)
        .header("apikey", &config.api_key)
        .form(&form)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

/// Map recognized words onto grid cells. The overlay's overall bounding box
/// is divided into a 9x9 lattice; each word lands in the cell containing its
/// center, first write wins, and only leading digit characters 1-9 count.
pub fn project_overlay(result: &ParsedResult) -> Grid {
    let mut grid = Grid::empty();
    let words: Vec<&Word> = result
        .text_overlay
        .lines
        .iter()
        .flat_map(|line| line.words.iter())
        .collect();
    if words.is_empty() {
        return grid;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for word in &words {
        min_x = min_x.min(word.left);
        min_y = min_y.min(word.top);
        max_x = max_x.max(word.left + word.width);
        max_y = max_y.max(word.top + word.height);
    }
    let cell_width = (max_x - min_x) / GRID_SIZE as f64;
    let cell_height = (max_y - min_y) / GRID_SIZE as f64;
    if cell_width <= 0.0 || cell_height <= 0.0 {
        return grid;
    }

    for word in words {
        let Some(digit) = word
            .word_text
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .filter(|d| (1..=9).contains(d))
        else {
            continue;
        };
        let center_x = word.left + word.width / 2.0;
        let center_y = word.top + word.height / 2.0;
        let col = ((center_x - min_x) / cell_width) as usize;
        let row = ((center_y - min_y) / cell_height) as usize;
        if row < GRID_SIZE && col < GRID_SIZE && grid.get(row, col) == 0 {
            grid.set(row, col, digit as u8);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, left: f64, top: f64) -> Word {
        Word {
            word_text: text.to_string(),
            left,
            top,
            width: 10.0,
            height: 10.0,
        }
    }

    fn overlay(words: Vec<Word>) -> ParsedResult {
        ParsedResult {
            text_overlay: TextOverlay {
                lines: vec![Line { words }],
            },
        }
    }

    #[test]
    fn empty_overlay_projects_an_empty_grid() {
        let grid = project_overlay(&overlay(Vec::new()));
        assert!(!grid.has_entries());
    }

    #[test]
    fn words_land_in_the_cell_containing_their_center() {
        // Two corner digits span a 90x90 puzzle: one cell is 10x10.
        let result = overlay(vec![
            word("5", 0.0, 0.0),
            word("8", 80.0, 80.0),
            word("3", 40.0, 0.0),
        ]);
        let grid = project_overlay(&result);
        assert_eq!(grid.get(0, 0), 5);
        assert_eq!(grid.get(8, 8), 8);
        assert_eq!(grid.get(0, 4), 3);
    }

    #[test]
    fn non_digit_words_and_zeros_are_skipped() {
        let result = overlay(vec![
            word("x", 0.0, 0.0),
            word("0", 80.0, 0.0),
            word("7", 0.0, 80.0),
        ]);
        let grid = project_overlay(&result);
        assert_eq!(grid.get(8, 0), 7);
        let filled = grid.cells().filter(|&(_, _, v)| v != 0).count();
        assert_eq!(filled, 1);
    }

    #[test]
    fn first_write_wins_per_cell() {
        let result = overlay(vec![word("5", 0.0, 0.0), word("9", 1.0, 1.0), word("2", 80.0, 80.0)]);
        let grid = project_overlay(&result);
        assert_eq!(grid.get(0, 0), 5);
    }

    #[test]
    fn vendor_response_parses_pascal_case_fields() {
        let raw = r#"{
            "IsErroredOnProcessing": false,
            "ParsedResults": [{
                "TextOverlay": {
                    "Lines": [{
                        "Words": [{"WordText": "5", "Left": 12.5, "Top": 3.0, "Width": 8.0, "Height": 9.0}]
                    }]
                }
            }]
        }"#;
        let parsed: OcrResponse = serde_json::from_str(raw).expect("parse");
        assert!(!parsed.is_errored_on_processing);
        let words = &parsed.parsed_results[0].text_overlay.lines[0].words;
        assert_eq!(words[0].word_text, "5");
        assert_eq!(words[0].left, 12.5);
    }
}
