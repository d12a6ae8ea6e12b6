use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{error::AppResult, models::RecommendationsResponse};

use super::AppState;

/// GET /api/recommendations/directors
///
/// Serves today's cached batch, regenerating it first when the daily window
/// has rolled over.
pub async fn daily_directors(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<RecommendationsResponse>> {
    let engine = state.engine()?;
    let response = engine.todays_batch(&state.daily_cache).await?;
    Ok(Json(response))
}
