use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Movie stored locally once a user adds it to a cycle or rates it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: Uuid,
    pub tmdb_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub synopsis: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<i32>,
    pub genre: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted by the movie upsert
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub tmdb_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub backdrop: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Compact movie entry listed inside a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieSummary {
    pub id: Uuid,
    pub tmdb_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub year: Option<i32>,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            tmdb_id: movie.tmdb_id,
            title: movie.title.clone(),
            poster: movie.poster.clone(),
            year: movie.year,
        }
    }
}

/// A user's rating of a movie, shown next to the movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieRatingEntry {
    pub id: Uuid,
    pub rating: i32,
    pub username: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full movie entry inside a cycle detail view, with everyone's ratings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub ratings: Vec<MovieRatingEntry>,
}

/// Highest average rated movie across all users
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TopRatedMovie {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movie: Movie,
    pub average_rating: f64,
    pub rating_count: i64,
}
