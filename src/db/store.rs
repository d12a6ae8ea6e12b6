use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Festival, FestivalDetail, FestivalStatus, Movie, MovieRatingEntry, NewFestival, NewMovie,
        NewPlaylist, NewUser, Playlist, PlaylistDetail, PlaylistSummary, Rating,
        ScheduledPlaylist, TopRatedMovie, User, UserCredentials, UserRatingEntry, UserUpdate,
    },
};

/// Account persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> AppResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Looks an account up by normalized email or exact username
    async fn find_user_credentials(&self, identifier: &str) -> AppResult<Option<UserCredentials>>;

    async fn user_exists(&self, email: &str, username: &str) -> AppResult<bool>;

    async fn username_taken_by_other(&self, username: &str, user_id: Uuid) -> AppResult<bool>;

    async fn update_user(&self, id: Uuid, update: &UserUpdate) -> AppResult<Option<User>>;
}

/// Locally stored movies
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Newest first
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>>;

    /// Inserts by `tmdb_id` or returns the existing row; the flag is true on insert
    async fn upsert_movie(&self, movie: &NewMovie) -> AppResult<(Movie, bool)>;

    async fn top_rated_movie(&self) -> AppResult<Option<TopRatedMovie>>;

    /// Every user's rating of a movie, newest first
    async fn movie_ratings(&self, movie_id: Uuid) -> AppResult<Vec<MovieRatingEntry>>;
}

/// Cycles and their membership
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// A user's cycles, newest first
    async fn list_playlists(&self, user_id: Uuid) -> AppResult<Vec<PlaylistSummary>>;

    /// Every dated cycle, earliest date first
    async fn scheduled_playlists(&self) -> AppResult<Vec<ScheduledPlaylist>>;

    async fn get_playlist_summary(&self, id: Uuid) -> AppResult<Option<PlaylistSummary>>;

    async fn get_playlist_detail(&self, id: Uuid) -> AppResult<Option<PlaylistDetail>>;

    async fn create_playlist(&self, playlist: &NewPlaylist) -> AppResult<Playlist>;

    async fn playlist_owner(&self, id: Uuid) -> AppResult<Option<Uuid>>;

    /// Appends after the current last entry; adding a present movie is a no-op
    async fn add_movie_to_playlist(&self, playlist_id: Uuid, movie_id: Uuid) -> AppResult<()>;

    async fn remove_movie_from_playlist(&self, playlist_id: Uuid, movie_id: Uuid)
        -> AppResult<()>;

    /// Removes the cycle with its memberships and festivals
    async fn delete_playlist(&self, id: Uuid) -> AppResult<bool>;
}

/// Group screenings
#[async_trait]
pub trait FestivalRepository: Send + Sync {
    /// Festivals on or after `today`, plus earlier ones not yet completed, by date
    async fn list_festivals(&self, today: NaiveDate) -> AppResult<Vec<FestivalDetail>>;

    async fn get_festival(&self, id: Uuid) -> AppResult<Option<FestivalDetail>>;

    /// Creates the festival with its creator as first participant
    async fn create_festival(&self, festival: &NewFestival) -> AppResult<Festival>;

    /// Returns false when the festival does not exist; joining twice is a no-op
    async fn join_festival(&self, festival_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    async fn update_festival_status(
        &self,
        id: Uuid,
        status: FestivalStatus,
    ) -> AppResult<Option<Festival>>;
}

/// Scores, always scoped to the rating user
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn list_user_ratings(&self, user_id: Uuid) -> AppResult<Vec<UserRatingEntry>>;

    async fn upsert_rating(&self, user_id: Uuid, movie_id: Uuid, rating: i32) -> AppResult<Rating>;

    async fn find_user_rating(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Rating>>;

    async fn update_rating(&self, id: Uuid, user_id: Uuid, rating: i32)
        -> AppResult<Option<Rating>>;

    async fn delete_rating(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;
}

/// Everything the HTTP layer persists
pub trait Store:
    UserRepository + MovieRepository + PlaylistRepository + FestivalRepository + RatingRepository
{
}

impl<T> Store for T where
    T: UserRepository
        + MovieRepository
        + PlaylistRepository
        + FestivalRepository
        + RatingRepository
{
}
