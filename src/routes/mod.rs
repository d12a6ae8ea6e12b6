use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod auth;
pub mod festivals;
pub mod movies;
pub mod playlists;
pub mod ratings;
pub mod recommendations;
pub mod state;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/movies", movie_routes())
        .nest("/playlists", playlist_routes())
        .nest("/festivals", festival_routes())
        .nest("/ratings", rating_routes())
        .route(
            "/recommendations/directors",
            get(recommendations::daily_directors),
        )
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/update", put(auth::update_profile))
}

fn movie_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(movies::list_movies).post(movies::create_movie))
        .route("/top-rated", get(movies::top_rated))
        .route("/search/tmdb", get(movies::search_catalog))
        .route("/tmdb/:tmdb_id", get(movies::catalog_details))
        .route("/tmdb/:tmdb_id/watch-providers", get(movies::watch_providers))
        .route("/:id", get(movies::get_movie))
        .route("/:id/ratings", get(movies::movie_ratings))
}

fn playlist_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route("/scheduled", get(playlists::scheduled_playlists))
        .route("/search/directors", get(playlists::search_directors))
        .route("/director/:director_id/movies", get(playlists::director_movies))
        .route(
            "/:id",
            get(playlists::get_playlist).delete(playlists::delete_playlist),
        )
        .route("/:id/movies", post(playlists::add_movie))
        .route("/:id/movies/:movie_id", delete(playlists::remove_movie))
}

fn festival_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(festivals::list_festivals).post(festivals::create_festival),
        )
        .route("/:id", get(festivals::get_festival))
        .route("/:id/join", post(festivals::join_festival))
        .route("/:id/status", patch(festivals::update_status))
}

fn rating_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(ratings::list_ratings).post(ratings::rate_movie))
        .route("/movie/:movie_id", get(ratings::get_movie_rating))
        .route(
            "/:id",
            put(ratings::update_rating).delete(ratings::delete_rating),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
