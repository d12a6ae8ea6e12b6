use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{playlist::parse_event_date, Festival, FestivalDetail, FestivalStatus, NewFestival},
};

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFestivalRequest {
    pub playlist_id: Uuid,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// GET /api/festivals
pub async fn list_festivals(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> AppResult<Json<Vec<FestivalDetail>>> {
    let today = Local::now().date_naive();
    Ok(Json(state.store.list_festivals(today).await?))
}

/// GET /api/festivals/:id
pub async fn get_festival(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FestivalDetail>> {
    state
        .store
        .get_festival(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Festival not found".to_string()))
}

/// POST /api/festivals
///
/// Only the cycle's owner can schedule it; the creator joins automatically.
pub async fn create_festival(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateFestivalRequest>,
) -> AppResult<(StatusCode, Json<Festival>)> {
    let date = parse_event_date(&request.date)
        .ok_or_else(|| AppError::InvalidInput("A valid date is required".to_string()))?;

    match state.store.playlist_owner(request.playlist_id).await? {
        None => return Err(AppError::NotFound("Playlist not found".to_string())),
        Some(owner) if owner != user.id => {
            return Err(AppError::Forbidden("Not authorized".to_string()))
        }
        Some(_) => {}
    }

    let festival = state
        .store
        .create_festival(&NewFestival {
            playlist_id: request.playlist_id,
            date,
            created_by: user.id,
        })
        .await?;
    tracing::info!(festival_id = %festival.id, playlist_id = %festival.playlist_id, "Festival scheduled");

    Ok((StatusCode::CREATED, Json(festival)))
}

/// POST /api/festivals/:id/join
pub async fn join_festival(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    if !state.store.join_festival(id, user.id).await? {
        return Err(AppError::NotFound("Festival not found".to_string()));
    }
    Ok(Json(json!({ "message": "Joined festival successfully" })))
}

/// PATCH /api/festivals/:id/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<Festival>> {
    let status: FestivalStatus = request
        .status
        .parse()
        .map_err(|_| AppError::InvalidInput("Invalid status".to_string()))?;

    state
        .store
        .update_festival_status(id, status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Festival not found".to_string()))
}
