use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::DirectorProfile;
use super::movie::{MovieSummary, PlaylistMovie};
use super::user::UserSummary;

/// A cycle: an ordered, user-owned list of movies, optionally scheduled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Playlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub scheduled_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a cycle
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub user_id: Uuid,
    pub name: String,
    pub scheduled_date: Option<NaiveDate>,
}

/// Cycle with its movies in append order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistSummary {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub movies: Vec<MovieSummary>,
}

/// Publicly listed scheduled cycle with its creator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledPlaylist {
    #[serde(flatten)]
    pub summary: PlaylistSummary,
    pub created_by_user: UserSummary,
}

/// Cycle detail: full movies with ratings plus festival participants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub movies: Vec<PlaylistMovie>,
    pub participants: Vec<UserSummary>,
}

/// Any cycle payload paired with the director profile its name resolves to
#[derive(Debug, Clone, Serialize)]
pub struct WithDirector<T> {
    #[serde(flatten)]
    pub inner: T,
    pub director: Option<DirectorProfile>,
}

/// Parses a client-supplied date; accepts "YYYY-MM-DD" or an RFC 3339 timestamp
pub fn parse_event_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}
