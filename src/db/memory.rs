use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{
    FestivalRepository, MovieRepository, PlaylistRepository, RatingRepository, UserRepository,
};
use crate::{
    error::AppResult,
    models::{
        user::normalize_email, Festival, FestivalDetail, FestivalPlaylist, FestivalStatus, Movie,
        MovieRatingEntry, MovieSummary, NewFestival, NewMovie, NewPlaylist, NewUser, Playlist,
        PlaylistDetail, PlaylistMovie, PlaylistSummary, Rating, ScheduledPlaylist, TopRatedMovie,
        User, UserCredentials, UserRatingEntry, UserSummary, UserUpdate,
    },
};

struct Membership {
    playlist_id: Uuid,
    movie_id: Uuid,
    order_index: i32,
}

struct Participant {
    festival_id: Uuid,
    user_id: Uuid,
}

/// Rows in insertion order
#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    movies: Vec<Movie>,
    playlists: Vec<Playlist>,
    memberships: Vec<Membership>,
    festivals: Vec<Festival>,
    participants: Vec<Participant>,
    ratings: Vec<Rating>,
}

impl Tables {
    fn user_summary(&self, id: Uuid) -> Option<UserSummary> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| UserSummary {
                id: u.id,
                username: u.username.clone(),
                avatar: u.avatar.clone(),
            })
    }

    fn member_movies(&self, playlist_id: Uuid) -> Vec<&Movie> {
        let mut members: Vec<&Membership> = self
            .memberships
            .iter()
            .filter(|m| m.playlist_id == playlist_id)
            .collect();
        members.sort_by_key(|m| m.order_index);

        members
            .into_iter()
            .filter_map(|m| self.movies.iter().find(|movie| movie.id == m.movie_id))
            .collect()
    }

    fn summary(&self, playlist: &Playlist) -> PlaylistSummary {
        PlaylistSummary {
            playlist: playlist.clone(),
            movies: self
                .member_movies(playlist.id)
                .into_iter()
                .map(MovieSummary::from)
                .collect(),
        }
    }

    fn movie_ratings(&self, movie_id: Uuid) -> Vec<MovieRatingEntry> {
        self.ratings
            .iter()
            .rev()
            .filter(|r| r.movie_id == movie_id)
            .filter_map(|r| {
                let user = self.user_summary(r.user_id)?;
                Some(MovieRatingEntry {
                    id: r.id,
                    rating: r.rating,
                    username: user.username,
                    avatar: user.avatar,
                    created_at: r.created_at,
                })
            })
            .collect()
    }

    fn festival_detail(&self, festival: &Festival) -> Option<FestivalDetail> {
        let playlist = self.playlists.iter().find(|p| p.id == festival.playlist_id)?;
        let created_by_user = self.user_summary(festival.created_by)?;

        Some(FestivalDetail {
            festival: festival.clone(),
            playlist: FestivalPlaylist {
                id: playlist.id,
                name: playlist.name.clone(),
                scheduled_date: playlist.scheduled_date,
                movies: self.summary(playlist).movies,
            },
            created_by_user,
            participants: self
                .participants
                .iter()
                .filter(|p| p.festival_id == festival.id)
                .filter_map(|p| self.user_summary(p.user_id))
                .collect(),
        })
    }
}

/// Store kept entirely in process memory
///
/// Mirrors the Postgres schema's uniqueness and cascade rules so handlers
/// behave the same against either backend.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let timestamp = now();
        let row = UserCredentials {
            id: Uuid::new_v4(),
            email: normalize_email(&user.email),
            username: user.username.trim().to_string(),
            avatar: None,
            password_hash: user.password_hash.clone(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.users.push(row.clone());
        Ok(row.into())
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .map(User::from))
    }

    async fn find_user_credentials(&self, identifier: &str) -> AppResult<Option<UserCredentials>> {
        let tables = self.tables.read().await;
        let email = normalize_email(identifier);
        let username = identifier.trim();
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn user_exists(&self, email: &str, username: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        let email = normalize_email(email);
        let username = username.trim();
        Ok(tables
            .users
            .iter()
            .any(|u| u.email == email || u.username == username))
    }

    async fn username_taken_by_other(&self, username: &str, user_id: Uuid) -> AppResult<bool> {
        let tables = self.tables.read().await;
        let username = username.trim();
        Ok(tables
            .users
            .iter()
            .any(|u| u.username == username && u.id != user_id))
    }

    async fn update_user(&self, id: Uuid, update: &UserUpdate) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(username) = &update.username {
            user.username = username.trim().to_string();
        }
        if let Some(hash) = &update.password_hash {
            user.password_hash = hash.clone();
        }
        user.updated_at = now();

        Ok(Some(user.clone().into()))
    }
}

#[async_trait]
impl MovieRepository for InMemoryStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let tables = self.tables.read().await;
        Ok(tables.movies.iter().rev().cloned().collect())
    }

    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let tables = self.tables.read().await;
        Ok(tables.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn upsert_movie(&self, movie: &NewMovie) -> AppResult<(Movie, bool)> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.movies.iter().find(|m| m.tmdb_id == movie.tmdb_id) {
            return Ok((existing.clone(), false));
        }

        let created = Movie {
            id: Uuid::new_v4(),
            tmdb_id: movie.tmdb_id,
            title: movie.title.clone(),
            poster: movie.poster.clone(),
            backdrop: movie.backdrop.clone(),
            synopsis: movie.synopsis.clone(),
            year: movie.year,
            duration: movie.duration,
            genre: movie.genre.clone(),
            created_at: now(),
        };
        tables.movies.push(created.clone());
        Ok((created, true))
    }

    async fn top_rated_movie(&self) -> AppResult<Option<TopRatedMovie>> {
        let tables = self.tables.read().await;

        let mut best: Option<TopRatedMovie> = None;
        for movie in &tables.movies {
            let scores: Vec<i32> = tables
                .ratings
                .iter()
                .filter(|r| r.movie_id == movie.id)
                .map(|r| r.rating)
                .collect();
            if scores.is_empty() {
                continue;
            }

            let count = scores.len() as i64;
            let average = scores.iter().map(|&s| s as f64).sum::<f64>() / count as f64;
            let better = best.as_ref().map_or(true, |b| {
                average > b.average_rating
                    || (average == b.average_rating && count > b.rating_count)
            });
            if better {
                best = Some(TopRatedMovie {
                    movie: movie.clone(),
                    average_rating: average,
                    rating_count: count,
                });
            }
        }

        Ok(best)
    }

    async fn movie_ratings(&self, movie_id: Uuid) -> AppResult<Vec<MovieRatingEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.movie_ratings(movie_id))
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryStore {
    async fn list_playlists(&self, user_id: Uuid) -> AppResult<Vec<PlaylistSummary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .playlists
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .map(|p| tables.summary(p))
            .collect())
    }

    async fn scheduled_playlists(&self) -> AppResult<Vec<ScheduledPlaylist>> {
        let tables = self.tables.read().await;
        let mut scheduled: Vec<ScheduledPlaylist> = tables
            .playlists
            .iter()
            .filter(|p| p.scheduled_date.is_some())
            .filter_map(|p| {
                Some(ScheduledPlaylist {
                    created_by_user: tables.user_summary(p.user_id)?,
                    summary: tables.summary(p),
                })
            })
            .collect();
        scheduled.sort_by_key(|s| s.summary.playlist.scheduled_date);
        Ok(scheduled)
    }

    async fn get_playlist_summary(&self, id: Uuid) -> AppResult<Option<PlaylistSummary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .playlists
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.summary(p)))
    }

    async fn get_playlist_detail(&self, id: Uuid) -> AppResult<Option<PlaylistDetail>> {
        let tables = self.tables.read().await;
        let Some(playlist) = tables.playlists.iter().find(|p| p.id == id) else {
            return Ok(None);
        };

        let festival_ids: HashSet<Uuid> = tables
            .festivals
            .iter()
            .filter(|f| f.playlist_id == id)
            .map(|f| f.id)
            .collect();
        let mut seen = HashSet::new();
        let participants = tables
            .participants
            .iter()
            .filter(|p| festival_ids.contains(&p.festival_id) && seen.insert(p.user_id))
            .filter_map(|p| tables.user_summary(p.user_id))
            .collect();

        Ok(Some(PlaylistDetail {
            playlist: playlist.clone(),
            movies: tables
                .member_movies(id)
                .into_iter()
                .map(|movie| PlaylistMovie {
                    movie: movie.clone(),
                    ratings: tables.movie_ratings(movie.id),
                })
                .collect(),
            participants,
        }))
    }

    async fn create_playlist(&self, playlist: &NewPlaylist) -> AppResult<Playlist> {
        let mut tables = self.tables.write().await;
        let timestamp = now();
        let created = Playlist {
            id: Uuid::new_v4(),
            user_id: playlist.user_id,
            name: playlist.name.trim().to_string(),
            scheduled_date: playlist.scheduled_date,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.playlists.push(created.clone());
        Ok(created)
    }

    async fn playlist_owner(&self, id: Uuid) -> AppResult<Option<Uuid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .playlists
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.user_id))
    }

    async fn add_movie_to_playlist(&self, playlist_id: Uuid, movie_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let current: Vec<&Membership> = tables
            .memberships
            .iter()
            .filter(|m| m.playlist_id == playlist_id)
            .collect();

        if current.iter().any(|m| m.movie_id == movie_id) {
            return Ok(());
        }

        let order_index = current.iter().map(|m| m.order_index).max().unwrap_or(-1) + 1;
        tables.memberships.push(Membership {
            playlist_id,
            movie_id,
            order_index,
        });
        Ok(())
    }

    async fn remove_movie_from_playlist(
        &self,
        playlist_id: Uuid,
        movie_id: Uuid,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .memberships
            .retain(|m| !(m.playlist_id == playlist_id && m.movie_id == movie_id));
        Ok(())
    }

    async fn delete_playlist(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.playlists.len();
        tables.playlists.retain(|p| p.id != id);
        if tables.playlists.len() == before {
            return Ok(false);
        }

        let festival_ids: HashSet<Uuid> = tables
            .festivals
            .iter()
            .filter(|f| f.playlist_id == id)
            .map(|f| f.id)
            .collect();
        tables.memberships.retain(|m| m.playlist_id != id);
        tables.festivals.retain(|f| f.playlist_id != id);
        tables
            .participants
            .retain(|p| !festival_ids.contains(&p.festival_id));
        Ok(true)
    }
}

#[async_trait]
impl FestivalRepository for InMemoryStore {
    async fn list_festivals(&self, today: NaiveDate) -> AppResult<Vec<FestivalDetail>> {
        let tables = self.tables.read().await;
        let mut festivals: Vec<FestivalDetail> = tables
            .festivals
            .iter()
            .filter(|f| f.is_listed_on(today))
            .filter_map(|f| tables.festival_detail(f))
            .collect();
        festivals.sort_by_key(|f| f.festival.date);
        Ok(festivals)
    }

    async fn get_festival(&self, id: Uuid) -> AppResult<Option<FestivalDetail>> {
        let tables = self.tables.read().await;
        Ok(tables
            .festivals
            .iter()
            .find(|f| f.id == id)
            .and_then(|f| tables.festival_detail(f)))
    }

    async fn create_festival(&self, festival: &NewFestival) -> AppResult<Festival> {
        let mut tables = self.tables.write().await;
        let created = Festival {
            id: Uuid::new_v4(),
            playlist_id: festival.playlist_id,
            date: festival.date,
            created_by: festival.created_by,
            status: FestivalStatus::Scheduled,
            created_at: now(),
        };
        tables.festivals.push(created.clone());
        tables.participants.push(Participant {
            festival_id: created.id,
            user_id: festival.created_by,
        });
        Ok(created)
    }

    async fn join_festival(&self, festival_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.festivals.iter().any(|f| f.id == festival_id) {
            return Ok(false);
        }

        let joined = tables
            .participants
            .iter()
            .any(|p| p.festival_id == festival_id && p.user_id == user_id);
        if !joined {
            tables.participants.push(Participant {
                festival_id,
                user_id,
            });
        }
        Ok(true)
    }

    async fn update_festival_status(
        &self,
        id: Uuid,
        status: FestivalStatus,
    ) -> AppResult<Option<Festival>> {
        let mut tables = self.tables.write().await;
        Ok(tables.festivals.iter_mut().find(|f| f.id == id).map(|f| {
            f.status = status;
            f.clone()
        }))
    }
}

#[async_trait]
impl RatingRepository for InMemoryStore {
    async fn list_user_ratings(&self, user_id: Uuid) -> AppResult<Vec<UserRatingEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let movie = tables.movies.iter().find(|m| m.id == r.movie_id)?;
                Some(UserRatingEntry {
                    rating: r.clone(),
                    title: movie.title.clone(),
                    poster: movie.poster.clone(),
                    year: movie.year,
                })
            })
            .collect())
    }

    async fn upsert_rating(&self, user_id: Uuid, movie_id: Uuid, rating: i32) -> AppResult<Rating> {
        let mut tables = self.tables.write().await;
        let timestamp = now();

        if let Some(existing) = tables
            .ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
        {
            existing.rating = rating;
            existing.updated_at = timestamp;
            return Ok(existing.clone());
        }

        let created = Rating {
            id: Uuid::new_v4(),
            user_id,
            movie_id,
            rating,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.ratings.push(created.clone());
        Ok(created)
    }

    async fn find_user_rating(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Rating>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .iter()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
            .cloned())
    }

    async fn update_rating(
        &self,
        id: Uuid,
        user_id: Uuid,
        rating: i32,
    ) -> AppResult<Option<Rating>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .ratings
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)
            .map(|r| {
                r.rating = rating;
                r.updated_at = now();
                r.clone()
            }))
    }

    async fn delete_rating(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.ratings.len();
        tables
            .ratings
            .retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(tables.ratings.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(store: &InMemoryStore, username: &str) -> User {
        store
            .create_user(&NewUser {
                email: format!("{}@example.com", username),
                username: username.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    async fn seed_movie(store: &InMemoryStore, tmdb_id: i64) -> Movie {
        let (movie, _) = store
            .upsert_movie(&NewMovie {
                tmdb_id,
                title: format!("Movie {}", tmdb_id),
                poster: None,
                backdrop: None,
                synopsis: None,
                year: Some(2001),
                duration: None,
                genre: vec![],
            })
            .await
            .unwrap();
        movie
    }

    async fn seed_playlist(store: &InMemoryStore, user: &User, name: &str) -> Playlist {
        store
            .create_playlist(&NewPlaylist {
                user_id: user.id,
                name: name.to_string(),
                scheduled_date: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_credentials_lookup_by_email_or_username() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "ana").await;

        let by_email = store.find_user_credentials(" ANA@example.com ").await.unwrap();
        let by_username = store.find_user_credentials("ana").await.unwrap();

        assert_eq!(by_email.map(|u| u.id), Some(user.id));
        assert_eq!(by_username.map(|u| u.id), Some(user.id));
        assert!(store.find_user_credentials("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_movie_reports_creation_once() {
        let store = InMemoryStore::new();
        let first = seed_movie(&store, 603).await;

        let (again, created) = store
            .upsert_movie(&NewMovie {
                tmdb_id: 603,
                title: "Renamed".to_string(),
                poster: None,
                backdrop: None,
                synopsis: None,
                year: None,
                duration: None,
                genre: vec![],
            })
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(again, first);
    }

    #[tokio::test]
    async fn test_membership_appends_and_ignores_duplicates() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "ana").await;
        let playlist = seed_playlist(&store, &user, "Varda").await;
        let a = seed_movie(&store, 1).await;
        let b = seed_movie(&store, 2).await;

        store.add_movie_to_playlist(playlist.id, b.id).await.unwrap();
        store.add_movie_to_playlist(playlist.id, a.id).await.unwrap();
        store.add_movie_to_playlist(playlist.id, b.id).await.unwrap();

        let summary = store.get_playlist_summary(playlist.id).await.unwrap().unwrap();
        let ids: Vec<Uuid> = summary.movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_delete_playlist_cascades() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "ana").await;
        let playlist = seed_playlist(&store, &user, "Martel").await;
        let movie = seed_movie(&store, 7).await;
        store.add_movie_to_playlist(playlist.id, movie.id).await.unwrap();

        let festival = store
            .create_festival(&NewFestival {
                playlist_id: playlist.id,
                date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                created_by: user.id,
            })
            .await
            .unwrap();

        assert!(store.delete_playlist(playlist.id).await.unwrap());
        assert!(store.get_festival(festival.id).await.unwrap().is_none());
        assert!(!store.join_festival(festival.id, user.id).await.unwrap());
        assert!(store.get_movie(movie.id).await.unwrap().is_some());
        assert!(!store.delete_playlist(playlist.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_festival_creator_joins_and_join_is_idempotent() {
        let store = InMemoryStore::new();
        let owner = seed_user(&store, "ana").await;
        let guest = seed_user(&store, "luis").await;
        let playlist = seed_playlist(&store, &owner, "Reygadas").await;

        let festival = store
            .create_festival(&NewFestival {
                playlist_id: playlist.id,
                date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
                created_by: owner.id,
            })
            .await
            .unwrap();

        assert!(store.join_festival(festival.id, guest.id).await.unwrap());
        assert!(store.join_festival(festival.id, guest.id).await.unwrap());

        let detail = store.get_festival(festival.id).await.unwrap().unwrap();
        let names: Vec<&str> = detail.participants.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["ana", "luis"]);
        assert_eq!(detail.festival.status, FestivalStatus::Scheduled);

        let playlist_detail = store.get_playlist_detail(playlist.id).await.unwrap().unwrap();
        assert_eq!(playlist_detail.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_list_festivals_hides_past_completed() {
        let store = InMemoryStore::new();
        let owner = seed_user(&store, "ana").await;
        let playlist = seed_playlist(&store, &owner, "Salles").await;
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let past = store
            .create_festival(&NewFestival {
                playlist_id: playlist.id,
                date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                created_by: owner.id,
            })
            .await
            .unwrap();
        store
            .create_festival(&NewFestival {
                playlist_id: playlist.id,
                date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                created_by: owner.id,
            })
            .await
            .unwrap();

        assert_eq!(store.list_festivals(today).await.unwrap().len(), 2);

        store
            .update_festival_status(past.id, FestivalStatus::Completed)
            .await
            .unwrap();
        let listed = store.list_festivals(today).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_ne!(listed[0].festival.id, past.id);
    }

    #[tokio::test]
    async fn test_top_rated_prefers_average_then_count() {
        let store = InMemoryStore::new();
        let ana = seed_user(&store, "ana").await;
        let luis = seed_user(&store, "luis").await;
        let a = seed_movie(&store, 1).await;
        let b = seed_movie(&store, 2).await;

        assert!(store.top_rated_movie().await.unwrap().is_none());

        store.upsert_rating(ana.id, a.id, 9).await.unwrap();
        store.upsert_rating(ana.id, b.id, 9).await.unwrap();
        store.upsert_rating(luis.id, b.id, 9).await.unwrap();

        let top = store.top_rated_movie().await.unwrap().unwrap();
        assert_eq!(top.movie.id, b.id);
        assert_eq!(top.rating_count, 2);
        assert_eq!(top.average_rating, 9.0);
    }

    #[tokio::test]
    async fn test_ratings_are_scoped_to_owner() {
        let store = InMemoryStore::new();
        let ana = seed_user(&store, "ana").await;
        let luis = seed_user(&store, "luis").await;
        let movie = seed_movie(&store, 1).await;

        let rating = store.upsert_rating(ana.id, movie.id, 6).await.unwrap();
        let updated = store.upsert_rating(ana.id, movie.id, 8).await.unwrap();
        assert_eq!(updated.id, rating.id);
        assert_eq!(updated.rating, 8);

        assert!(store.update_rating(rating.id, luis.id, 1).await.unwrap().is_none());
        assert!(!store.delete_rating(rating.id, luis.id).await.unwrap());
        assert!(store.delete_rating(rating.id, ana.id).await.unwrap());
        assert!(store.find_user_rating(ana.id, movie.id).await.unwrap().is_none());
    }
}
