/// Movie catalog abstraction
///
/// Everything the service knows about movies and people outside its own store
/// comes through this trait. The production implementation talks to TMDB; tests
/// substitute mocks or hand-written stubs.
use async_trait::async_trait;

use crate::models::{
    CatalogMovie, CatalogPerson, MovieCredits, PersonDetails, PersonImages, PersonMovieCredits,
    WatchProvidersResponse,
};

pub mod tmdb;

pub use tmdb::{CatalogAuth, TmdbClient};

/// Errors raised by catalog calls
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Catalog returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),

    #[error("Movie catalog is not configured; set TMDB_ACCESS_TOKEN or TMDB_API_KEY")]
    NotConfigured,
}

/// Time window for trending endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingWindow {
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// Read-only view of the movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogMovie>, CatalogError>;

    async fn search_people(&self, query: &str) -> Result<Vec<CatalogPerson>, CatalogError>;

    /// Raw movie detail payload, passed through to clients untouched
    async fn movie_details(&self, movie_id: i64) -> Result<serde_json::Value, CatalogError>;

    async fn movie_credits(&self, movie_id: i64) -> Result<MovieCredits, CatalogError>;

    async fn watch_providers(&self, movie_id: i64)
        -> Result<WatchProvidersResponse, CatalogError>;

    async fn person_details(&self, person_id: i64) -> Result<PersonDetails, CatalogError>;

    async fn person_images(&self, person_id: i64) -> Result<PersonImages, CatalogError>;

    async fn person_movie_credits(
        &self,
        person_id: i64,
    ) -> Result<PersonMovieCredits, CatalogError>;

    async fn popular_people(&self, page: u32) -> Result<Vec<CatalogPerson>, CatalogError>;

    async fn trending_people(
        &self,
        window: TrendingWindow,
    ) -> Result<Vec<CatalogPerson>, CatalogError>;

    async fn popular_movies(&self) -> Result<Vec<CatalogMovie>, CatalogError>;

    async fn top_rated_movies(&self) -> Result<Vec<CatalogMovie>, CatalogError>;
}

/// Runtime in minutes from a movie detail payload
pub async fn movie_runtime(catalog: &dyn CatalogApi, movie_id: i64) -> Option<i64> {
    match catalog.movie_details(movie_id).await {
        Ok(details) => details.get("runtime").and_then(|r| r.as_i64()),
        Err(e) => {
            tracing::debug!(movie_id, error = %e, "Runtime lookup failed");
            None
        }
    }
}
