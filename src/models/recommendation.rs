use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::CatalogMovie;

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const PROFILE_BASE_URL: &str = "https://image.tmdb.org/t/p/w185";

const UNTITLED: &str = "Untitled";
const MISSING_OVERVIEW: &str = "Synopsis not available.";

/// Builds a full poster URL; absolute URLs pass through unchanged
pub fn build_poster_url(path: Option<&str>) -> Option<String> {
    build_image_url(POSTER_BASE_URL, path)
}

/// Builds a full profile photo URL; absolute URLs pass through unchanged
pub fn build_profile_url(path: Option<&str>) -> Option<String> {
    build_image_url(PROFILE_BASE_URL, path)
}

fn build_image_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        Some(path.to_string())
    } else {
        Some(format!("{}{}", base, path))
    }
}

/// Country is the last comma-separated segment of a free-text birthplace
pub fn extract_country(place_of_birth: Option<&str>) -> Option<String> {
    place_of_birth?
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

/// Director picked for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorCandidate {
    pub id: i64,
    pub name: String,
    pub country: Option<String>,
    pub place_of_birth: Option<String>,
}

impl DirectorCandidate {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            country: None,
            place_of_birth: None,
        }
    }

    pub fn with_origin(mut self, place_of_birth: Option<String>) -> Self {
        self.country = extract_country(place_of_birth.as_deref());
        self.place_of_birth = place_of_birth;
        self
    }
}

/// Movie normalized from heterogeneous catalog payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub release_date: Option<String>,
    pub overview: String,
    pub popularity: f64,
}

impl From<&CatalogMovie> for MovieRecord {
    fn from(movie: &CatalogMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.display_title().unwrap_or(UNTITLED).to_string(),
            poster: build_poster_url(movie.poster_path.as_deref()),
            release_date: movie.any_release_date().map(str::to_string),
            overview: movie
                .overview
                .as_deref()
                .filter(|o| !o.trim().is_empty())
                .unwrap_or(MISSING_OVERVIEW)
                .to_string(),
            popularity: movie.popularity,
        }
    }
}

/// One director cycle in the daily batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub director: String,
    pub director_id: i64,
    pub director_country: Option<String>,
    pub place_of_birth: Option<String>,
    pub cycle_name: String,
    pub description: String,
    pub rating: f64,
    pub movies: Vec<MovieRecord>,
}

/// Response body for the daily recommendation endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    pub message: Option<String>,
    pub generated_at: DateTime<Utc>,
}
