use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{RecognizeResponse, SolveRequest, SolveResponse},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};

mod config;
mod ocr;
mod solver;

use config::{load_settings, require_ocr_api_key};
use ocr::OcrConfig;

// 10 MiB image ceiling plus base64 and JSON framing overhead.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    http: reqwest::Client,
    ocr: OcrConfig,
}

#[derive(Debug, Deserialize)]
struct ProcessImageRequest {
    #[serde(default)]
    image: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    require_ocr_api_key(&settings)?;

    let state = Arc::new(AppState {
        http: reqwest::Client::new(),
        ocr: OcrConfig {
            endpoint: settings.ocr_endpoint.clone(),
            api_key: settings.ocr_api_key.clone(),
        },
    });
    let app = build_router(state);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "puzzle service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/process-image", post(process_image))
        .route("/solve-puzzle", post(solve_puzzle))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn process_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProcessImageRequest>,
) -> Response {
    let Some(image) = request.image.filter(|image| !image.is_empty()) else {
        return api_error(
            StatusCode::BAD_REQUEST,
            ErrorCode::Validation,
            "No image provided",
        );
    };
    let image = if image.starts_with("data:image") {
        image
    } else {
        format!("data:image/png;base64,{image}")
    };

    match ocr::recognize_image(&state.http, &state.ocr, &image).await {
        Err(err) => {
            error!(error = %err, "recognition upstream call failed");
            api_error(
                StatusCode::BAD_GATEWAY,
                ErrorCode::Upstream,
                format!("recognition service unavailable: {err}"),
            )
        }
        Ok(response) if response.is_errored_on_processing => {
            let message = response
                .error_message
                .first()
                .cloned()
                .unwrap_or_else(|| "Unknown error".to_string());
            api_error(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Upstream, message)
        }
        Ok(response) => {
            let grid = response
                .parsed_results
                .first()
                .map(ocr::project_overlay)
                .unwrap_or_default();
            // An overlay with no digits means no puzzle; the client treats
            // an absent grid as "nothing detected".
            let grid = grid.has_entries().then_some(grid);
            Json(RecognizeResponse { grid }).into_response()
        }
    }
}

async fn solve_puzzle(Json(request): Json<SolveRequest>) -> Response {
    if let Err(message) = solver::validate_values(&request.board) {
        return api_error(StatusCode::BAD_REQUEST, ErrorCode::Validation, message);
    }

    let mut solution = request.board;
    if solver::solve_in_place(&mut solution) {
        Json(SolveResponse {
            solution: Some(solution),
            error: None,
        })
        .into_response()
    } else {
        Json(SolveResponse {
            solution: None,
            error: Some("No solution exists for this Sudoku puzzle.".to_string()),
        })
        .into_response()
    }
}

fn api_error(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Response {
    (status, Json(ApiError::new(code, message))).into_response()
}
