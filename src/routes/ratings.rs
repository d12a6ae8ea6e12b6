use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{rating::normalize_rating, Rating, UserRatingEntry},
};

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateMovieRequest {
    #[serde(default)]
    pub movie_id: Option<Uuid>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    #[serde(default)]
    pub rating: Option<f64>,
}

fn parse_score(value: Option<f64>) -> AppResult<i32> {
    value.and_then(normalize_rating).ok_or_else(|| {
        AppError::InvalidInput("Invalid rating. Must be between 1 and 10".to_string())
    })
}

/// GET /api/ratings
pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<UserRatingEntry>>> {
    Ok(Json(state.store.list_user_ratings(user.id).await?))
}

/// POST /api/ratings
///
/// Creates or replaces the caller's score for a movie. Decimal input is
/// rounded to the stored integer.
pub async fn rate_movie(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<RateMovieRequest>,
) -> AppResult<Json<Rating>> {
    let movie_id = request
        .movie_id
        .ok_or_else(|| AppError::InvalidInput("movieId is required".to_string()))?;
    let score = parse_score(request.rating)?;

    if state.store.get_movie(movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    let rating = state.store.upsert_rating(user.id, movie_id, score).await?;
    tracing::info!(
        rating_id = %rating.id,
        movie_id = %movie_id,
        score,
        "Rating saved"
    );
    Ok(Json(rating))
}

/// GET /api/ratings/movie/:movie_id
pub async fn get_movie_rating(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(movie_id): Path<Uuid>,
) -> AppResult<Json<Rating>> {
    state
        .store
        .find_user_rating(user.id, movie_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Rating not found".to_string()))
}

/// PUT /api/ratings/:id
pub async fn update_rating(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRatingRequest>,
) -> AppResult<Json<Rating>> {
    let score = parse_score(request.rating)?;

    state
        .store
        .update_rating(id, user.id, score)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Rating not found".to_string()))
}

/// DELETE /api/ratings/:id
pub async fn delete_rating(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    if !state.store.delete_rating(id, user.id).await? {
        return Err(AppError::NotFound("Rating not found".to_string()));
    }
    Ok(Json(json!({ "message": "Rating deleted" })))
}
