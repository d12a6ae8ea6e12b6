use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{EnrichedMovie, Movie, MovieRatingEntry, NewMovie, RegionProviders, TopRatedMovie},
    services::movie_search::{self, MIN_QUERY_CHARS},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /api/movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Movie>>> {
    Ok(Json(state.store.list_movies().await?))
}

/// GET /api/movies/top-rated
pub async fn top_rated(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> AppResult<Json<TopRatedMovie>> {
    state
        .store
        .top_rated_movie()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No rated movies found".to_string()))
}

/// GET /api/movies/:id
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Movie>> {
    state
        .store
        .get_movie(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
}

/// GET /api/movies/:id/ratings
pub async fn movie_ratings(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<MovieRatingEntry>>> {
    Ok(Json(state.store.movie_ratings(id).await?))
}

/// POST /api/movies
///
/// Returns 201 when the movie was inserted, 200 when `tmdbId` already existed.
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(movie): Json<NewMovie>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    if movie.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()));
    }

    let (movie, created) = state.store.upsert_movie(&movie).await?;
    let status = if created {
        tracing::info!(movie_id = %movie.id, tmdb_id = movie.tmdb_id, "Movie stored");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(movie)))
}

/// GET /api/movies/search/tmdb?query=
pub async fn search_catalog(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<EnrichedMovie>>> {
    let query = params.query.unwrap_or_default();
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        return Err(AppError::InvalidInput(
            "Query must be at least 2 characters".to_string(),
        ));
    }

    let catalog = state.catalog()?;
    let results = movie_search::search_movies(catalog, &query).await?;
    Ok(Json(results))
}

/// GET /api/movies/tmdb/:id
pub async fn catalog_details(
    State(state): State<Arc<AppState>>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let catalog = state.catalog()?;
    let details = catalog
        .movie_details(tmdb_id)
        .await
        .map_err(AppError::catalog_passthrough)?;
    Ok(Json(details))
}

/// GET /api/movies/tmdb/:id/watch-providers
pub async fn watch_providers(
    State(state): State<Arc<AppState>>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<RegionProviders>> {
    let catalog = state.catalog()?;
    let providers =
        movie_search::watch_providers(catalog.as_ref(), tmdb_id, &state.watch_region).await?;
    Ok(Json(providers))
}
