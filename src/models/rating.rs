use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 10.0;

/// A user's 1–10 score for a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's rating joined with the rated movie
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserRatingEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub rating: Rating,
    pub title: String,
    pub poster: Option<String>,
    pub year: Option<i32>,
}

/// Validates a slider value and rounds it to the stored integer score.
///
/// Decimal input is accepted (7.6 is stored as 8); anything outside 1–10
/// before or after rounding is rejected.
pub fn normalize_rating(value: f64) -> Option<i32> {
    if !value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&value) {
        return None;
    }
    let rounded = value.round();
    (MIN_RATING..=MAX_RATING)
        .contains(&rounded)
        .then_some(rounded as i32)
}
