use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::movie::MovieSummary;
use super::user::UserSummary;

/// Lifecycle of a group screening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FestivalStatus {
    Scheduled,
    Active,
    Completed,
}

impl FestivalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FestivalStatus::Scheduled => "scheduled",
            FestivalStatus::Active => "active",
            FestivalStatus::Completed => "completed",
        }
    }
}

impl Display for FestivalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FestivalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(FestivalStatus::Scheduled),
            "active" => Ok(FestivalStatus::Active),
            "completed" => Ok(FestivalStatus::Completed),
            other => Err(format!("Invalid festival status: {}", other)),
        }
    }
}

/// A scheduled screening of one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Festival {
    pub id: Uuid,
    pub playlist_id: Uuid,
    pub date: NaiveDate,
    pub created_by: Uuid,
    pub status: FestivalStatus,
    pub created_at: DateTime<Utc>,
}

impl Festival {
    /// Listed while upcoming or not yet completed
    pub fn is_listed_on(&self, today: NaiveDate) -> bool {
        self.date >= today || self.status != FestivalStatus::Completed
    }
}

/// Fields accepted when scheduling a festival
#[derive(Debug, Clone)]
pub struct NewFestival {
    pub playlist_id: Uuid,
    pub date: NaiveDate,
    pub created_by: Uuid,
}

/// Cycle as embedded in a festival
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FestivalPlaylist {
    pub id: Uuid,
    pub name: String,
    pub scheduled_date: Option<NaiveDate>,
    pub movies: Vec<MovieSummary>,
}

/// Festival with its cycle, creator and participants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FestivalDetail {
    #[serde(flatten)]
    pub festival: Festival,
    pub playlist: FestivalPlaylist,
    pub created_by_user: UserSummary,
    pub participants: Vec<UserSummary>,
}
