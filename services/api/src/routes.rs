//! API service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use catalog::StoreError;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{
    error::{ApiError, ApiResult},
    middleware::session_middleware,
    models::{SearchQuery, SendCodeRequest},
    state::AppState,
    validation::validate_email,
};

pub mod auth;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/user", get(auth::current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/videos", get(get_videos))
        .route("/api/videos/:id", get(get_video))
        .route("/api/videos/game/:slug", get(get_game_videos))
        .route("/api/videos/recommended/:id", get(get_recommended_videos))
        .route("/api/games", get(get_games))
        .route("/api/games/:slug", get(get_game))
        .route("/api/channels", get(get_channels))
        .route("/api/channels/:id/videos", get(get_channel_videos))
        .route("/api/search", get(search_videos))
        .route("/api/send-code", post(send_code))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/auth/github", get(auth::github_login))
        .route("/auth/github/callback", get(auth::github_callback))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Numeric path id, or 400 with `message`
fn parse_id(raw: &str, message: &str) -> ApiResult<i32> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(message.to_string()))
}

/// Log an integrity failure and turn it into a 500 with `message`
fn integrity_failure(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
    move |e| {
        error!("{}: {}", message, e);
        ApiError::Internal(message.to_string())
    }
}

/// Get all videos with their game and channel
pub async fn get_videos(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let videos = state
        .catalog
        .get_all_videos_with_details()
        .await
        .map_err(integrity_failure("Failed to fetch videos"))?;

    Ok(Json(videos))
}

/// Get a video by ID
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "Invalid video ID")?;

    let video = state
        .catalog
        .get_video_with_details(id)
        .await
        .map_err(integrity_failure("Failed to fetch video"))?
        .ok_or(ApiError::NotFound("Video not found".to_string()))?;

    Ok(Json(video))
}

/// Get the videos of a game by slug; unknown slugs give an empty list
pub async fn get_game_videos(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let videos = state
        .catalog
        .get_videos_by_game_slug(&slug)
        .await
        .map_err(integrity_failure("Failed to fetch game videos"))?;

    Ok(Json(videos))
}

/// Get recommendations for a video
pub async fn get_recommended_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "Invalid video ID")?;

    let videos = state
        .catalog
        .get_recommended_videos(id)
        .await
        .map_err(integrity_failure("Failed to fetch recommended videos"))?;

    Ok(Json(videos))
}

/// Get all games
pub async fn get_games(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.get_all_games().await)
}

/// Get a game by slug
pub async fn get_game(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let game = state
        .catalog
        .get_game_by_slug(&slug)
        .await
        .ok_or(ApiError::NotFound("Game not found".to_string()))?;

    Ok(Json(game))
}

/// Get all channels
pub async fn get_channels(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.get_all_channels().await)
}

/// Get the videos published by a channel
pub async fn get_channel_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "Invalid channel ID")?;

    if state.catalog.get_channel(id).await.is_none() {
        return Err(ApiError::NotFound("Channel not found".to_string()));
    }

    let videos = state
        .catalog
        .get_videos_by_channel_id(id)
        .await
        .map_err(integrity_failure("Failed to fetch channel videos"))?;

    Ok(Json(videos))
}

/// Search videos by title and description
pub async fn search_videos(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let query = query
        .q
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::BadRequest("Search query is required".to_string()))?;

    let videos = state
        .catalog
        .search_videos(&query)
        .await
        .map_err(integrity_failure("Failed to search videos"))?;

    Ok(Json(videos))
}

/// Mail a block of code updates
pub async fn send_code(
    State(state): State<AppState>,
    Json(payload): Json<SendCodeRequest>,
) -> impl IntoResponse {
    if payload.email.is_empty() || payload.code.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Email and code are required"
            })),
        );
    }

    if let Err(message) = validate_email(&payload.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": message
            })),
        );
    }

    match state
        .email_client
        .send_code_updates(&payload.email, &payload.code)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Code sent successfully"
            })),
        ),
        Err(e) => {
            error!("Error sending code via email: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to send code via email"
                })),
            )
        }
    }
}
