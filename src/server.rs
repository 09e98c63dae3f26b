use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::warn;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::Segment;
use crate::config::Config;
use crate::subtitles::{self, FetchOutcome};

#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(client: reqwest::Client, config: Config) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubtitleParams {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubtitleResponse {
    success: bool,
    subtitles: Vec<Segment>,
    language: String,
    #[serde(rename = "isExample")]
    is_example: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

/// Build the API router. Both subtitle routes share one handler and
/// therefore one response policy.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/subtitles", get(get_subtitles))
        .route("/get-subtitles", get(get_subtitles))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}

/// GET /subtitles?videoId=<id> (and its /get-subtitles alias).
///
/// Policy: 400 only when videoId is missing; every provider failure is
/// answered 200 with the example transcript and an honest isExample flag,
/// so the client always has something renderable.
async fn get_subtitles(State(state): State<AppState>, Query(params): Query<SubtitleParams>) -> Response {
    let video_id = match params.video_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let body = ErrorResponse {
                success: false,
                error: "missing videoId parameter".to_string(),
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let outcome = subtitles::fetch_subtitles(&state.client, &state.config.subtitle_api_url, &video_id).await;
    if let FetchOutcome::Fallback { reason, .. } = &outcome {
        warn!("Answering {video_id} with example subtitles: {reason}");
    }

    let set = outcome.into_set();
    Json(SubtitleResponse {
        success: true,
        subtitles: set.segments,
        language: set.language,
        is_example: set.is_example,
    })
    .into_response()
}
