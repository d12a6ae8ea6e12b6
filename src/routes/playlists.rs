use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{
        playlist::parse_event_date, DirectorRef, EnrichedMovie, NewPlaylist, PlaylistDetail,
        PlaylistSummary, ScheduledPlaylist, WithDirector,
    },
    services::directors,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    pub movie_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DirectorSearchQuery {
    #[serde(default)]
    pub query: Option<String>,
}

/// Pairs a cycle payload with the director its name resolves to
async fn with_director<T>(state: &AppState, inner: T, name: &str) -> WithDirector<T> {
    let director = match &state.catalog {
        Some(catalog) => directors::lookup_director_by_name(catalog.as_ref(), &state.cache, name).await,
        None => None,
    };
    WithDirector { inner, director }
}

/// 404 when the cycle is missing, 403 when someone else owns it
async fn require_owner(state: &AppState, playlist_id: Uuid, user_id: Uuid) -> AppResult<()> {
    match state.store.playlist_owner(playlist_id).await? {
        None => Err(AppError::NotFound("Playlist not found".to_string())),
        Some(owner) if owner != user_id => Err(AppError::Forbidden("Not authorized".to_string())),
        Some(_) => Ok(()),
    }
}

/// GET /api/playlists
pub async fn list_playlists(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<WithDirector<PlaylistSummary>>>> {
    let playlists = state.store.list_playlists(user.id).await?;

    let mut results = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        let name = playlist.playlist.name.clone();
        results.push(with_director(&state, playlist, &name).await);
    }
    Ok(Json(results))
}

/// GET /api/playlists/scheduled
pub async fn scheduled_playlists(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<WithDirector<ScheduledPlaylist>>>> {
    let playlists = state.store.scheduled_playlists().await?;

    let mut results = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        let name = playlist.summary.playlist.name.clone();
        results.push(with_director(&state, playlist, &name).await);
    }
    Ok(Json(results))
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WithDirector<PlaylistDetail>>> {
    let detail = state
        .store
        .get_playlist_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    let name = detail.playlist.name.clone();
    Ok(Json(with_director(&state, detail, &name).await))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreatePlaylistRequest>,
) -> AppResult<(StatusCode, Json<PlaylistSummary>)> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }

    let scheduled_date = match request.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            parse_event_date(raw)
                .ok_or_else(|| AppError::InvalidInput("Invalid date".to_string()))?,
        ),
    };

    let playlist = state
        .store
        .create_playlist(&NewPlaylist {
            user_id: user.id,
            name: name.to_string(),
            scheduled_date,
        })
        .await?;
    tracing::info!(playlist_id = %playlist.id, user_id = %user.id, "Playlist created");

    Ok((
        StatusCode::CREATED,
        Json(PlaylistSummary {
            playlist,
            movies: Vec::new(),
        }),
    ))
}

/// POST /api/playlists/:id/movies
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddMovieRequest>,
) -> AppResult<Json<PlaylistSummary>> {
    require_owner(&state, id, user.id).await?;

    if state.store.get_movie(request.movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    state.store.add_movie_to_playlist(id, request.movie_id).await?;

    state
        .store
        .get_playlist_summary(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))
}

/// DELETE /api/playlists/:id/movies/:movie_id
pub async fn remove_movie(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, movie_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Value>> {
    require_owner(&state, id, user.id).await?;
    state.store.remove_movie_from_playlist(id, movie_id).await?;
    Ok(Json(json!({ "message": "Movie removed from playlist" })))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    require_owner(&state, id, user.id).await?;

    if !state.store.delete_playlist(id).await? {
        return Err(AppError::NotFound("Playlist not found".to_string()));
    }
    tracing::info!(playlist_id = %id, user_id = %user.id, "Playlist deleted");

    Ok(Json(json!({ "message": "Playlist deleted successfully" })))
}

/// GET /api/playlists/search/directors?query=
pub async fn search_directors(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DirectorSearchQuery>,
) -> AppResult<Json<Vec<DirectorRef>>> {
    let query = params.query.unwrap_or_default();
    if query.trim().chars().count() < directors::MIN_QUERY_CHARS {
        return Ok(Json(Vec::new()));
    }

    let catalog = state.catalog()?;
    let results = directors::search_directors(catalog, &state.cache, &query).await?;
    Ok(Json(results))
}

/// GET /api/playlists/director/:id/movies
pub async fn director_movies(
    State(state): State<Arc<AppState>>,
    Path(director_id): Path<i64>,
) -> AppResult<Json<Vec<EnrichedMovie>>> {
    let catalog = state.catalog()?;
    let movies = directors::director_filmography(catalog, director_id).await?;
    Ok(Json(movies))
}
