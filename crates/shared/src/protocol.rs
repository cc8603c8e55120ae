use serde::{Deserialize, Serialize};

use crate::domain::Grid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeRequest {
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub board: Grid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
