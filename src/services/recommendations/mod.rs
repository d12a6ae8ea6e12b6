/// Daily director recommendations
///
/// Flow: the daily cache decides staleness, discovery yields candidates,
/// selection builds a verified filmography per candidate, the describer
/// annotates each cycle, and the finished batch replaces the cache entry.
use std::sync::Arc;

use chrono::{DateTime, Local, Timelike, Utc};

use crate::{
    config::Config,
    models::{Recommendation, RecommendationsResponse},
    services::{catalog::CatalogApi, generative::TextGenerator},
};

pub mod daily_cache;
pub mod describer;
pub mod discovery;
pub mod selection;

pub use daily_cache::{CacheEntry, DailyCache};
pub use describer::CycleDescriber;
pub use discovery::{DirectorDiscovery, DiscoveryStrategy};

const CHECK_BACK_LATER: &str = "Check back later for more recommendations";

#[derive(thiserror::Error, Debug)]
pub enum RecommendationError {
    #[error("No director candidates could be discovered")]
    NoCandidates,

    #[error("No director had enough verified movies")]
    NothingAssembled,
}

/// Knobs for a generation run
#[derive(Debug, Clone)]
pub struct RecommendationSettings {
    /// Directors per daily batch
    pub target_count: usize,
    /// Minimum movies a director needs to be kept
    pub min_movies: usize,
    /// Verified movies gathered per director before trimming
    pub pool_limit: usize,
    /// Movies shown per cycle
    pub max_movies: usize,
    pub strategy: DiscoveryStrategy,
    pub require_latin_american: bool,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            target_count: 4,
            min_movies: 4,
            pool_limit: 12,
            max_movies: 6,
            strategy: DiscoveryStrategy::default(),
            require_latin_american: false,
        }
    }
}

impl RecommendationSettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let strategy = config
            .recommendation_strategy
            .parse::<DiscoveryStrategy>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let defaults = Self::default();
        Ok(Self {
            min_movies: config
                .recommendation_min_movies
                .clamp(1, defaults.max_movies),
            strategy,
            require_latin_american: config.recommendation_require_latin_american,
            ..defaults
        })
    }
}

pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogApi>,
    discovery: DirectorDiscovery,
    describer: CycleDescriber,
    settings: RecommendationSettings,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        generator: Option<Arc<dyn TextGenerator>>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            discovery: DirectorDiscovery::new(Arc::clone(&catalog), generator.clone()),
            describer: CycleDescriber::new(generator),
            catalog,
            settings,
        }
    }

    pub fn settings(&self) -> &RecommendationSettings {
        &self.settings
    }

    /// Builds a fresh batch without touching any cache
    pub async fn generate(&self) -> Result<Vec<Recommendation>, RecommendationError> {
        let settings = &self.settings;
        let candidates = self
            .discovery
            .discover(
                settings.strategy,
                settings.target_count,
                settings.require_latin_american,
            )
            .await;

        if candidates.is_empty() {
            return Err(RecommendationError::NoCandidates);
        }

        let mut recommendations = Vec::new();

        for discovered in candidates {
            if recommendations.len() >= settings.target_count {
                break;
            }

            let mut candidate = discovered.candidate;
            if candidate.place_of_birth.is_none() {
                match self.catalog.person_details(candidate.id).await {
                    Ok(details) => candidate = candidate.with_origin(details.place_of_birth),
                    Err(e) => {
                        tracing::warn!(director = %candidate.name, error = %e, "Director details unavailable, skipping");
                        continue;
                    }
                }
            }

            let mut pool = selection::build_filmography(
                &self.catalog,
                candidate.id,
                &discovered.known_for,
                settings.pool_limit,
            )
            .await;
            selection::rank_records(&mut pool);

            let movies = self
                .describer
                .curate(&candidate.name, pool, settings.min_movies, settings.max_movies)
                .await;

            if movies.len() < settings.min_movies {
                tracing::info!(
                    director = %candidate.name,
                    movies = movies.len(),
                    required = settings.min_movies,
                    "Dropping director with too few verified movies"
                );
                continue;
            }

            let cycle_name = self.describer.cycle_name(&candidate.name, &movies).await;
            let description = self.describer.description(&candidate.name, &movies).await;
            let rating = self.describer.rating(&candidate.name, &movies).await;

            recommendations.push(Recommendation {
                director: candidate.name,
                director_id: candidate.id,
                director_country: candidate.country,
                place_of_birth: candidate.place_of_birth,
                cycle_name,
                description,
                rating,
                movies,
            });
        }

        if recommendations.is_empty() {
            return Err(RecommendationError::NothingAssembled);
        }

        if recommendations.len() < settings.target_count {
            tracing::warn!(
                generated = recommendations.len(),
                expected = settings.target_count,
                "Generated a partial recommendation batch"
            );
        }

        Ok(recommendations)
    }

    /// Today's batch, regenerating first when the cache is due
    pub async fn todays_batch(
        &self,
        cache: &DailyCache,
    ) -> Result<RecommendationsResponse, RecommendationError> {
        self.todays_batch_at(cache, Utc::now(), Local::now().hour())
            .await
    }

    pub async fn todays_batch_at(
        &self,
        cache: &DailyCache,
        now: DateTime<Utc>,
        local_hour: u32,
    ) -> Result<RecommendationsResponse, RecommendationError> {
        if cache.should_regenerate(now, local_hour).await {
            tracing::info!("Generating daily recommendations");
            match self.generate().await {
                Ok(recommendations) => {
                    let entry = cache.replace(recommendations, now).await;
                    tracing::info!(
                        count = entry.recommendations.len(),
                        version = entry.version,
                        "Daily recommendations replaced"
                    );
                }
                Err(e) => {
                    if cache.snapshot().await.is_none() {
                        tracing::error!(error = %e, "Recommendation generation failed with nothing cached");
                        return Err(e);
                    }
                    tracing::warn!(error = %e, "Recommendation generation failed, serving previous batch");
                }
            }
        }

        let entry = cache
            .snapshot()
            .await
            .ok_or(RecommendationError::NothingAssembled)?;
        Ok(self.build_response(&entry))
    }

    fn build_response(&self, entry: &CacheEntry) -> RecommendationsResponse {
        let message = (entry.recommendations.len() < self.settings.target_count)
            .then(|| CHECK_BACK_LATER.to_string());

        RecommendationsResponse {
            recommendations: entry.recommendations.clone(),
            message,
            generated_at: entry.generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CatalogMovie, CatalogPerson, MovieCredits, PersonDetails, PersonImages,
        PersonMovieCredits, WatchProvidersResponse,
    };
    use crate::services::catalog::{CatalogError, TrendingWindow};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::HashMap;

    /// Catalog stub that yields at every call so concurrent callers interleave
    struct StubCatalog {
        directors: Vec<(CatalogPerson, &'static str)>,
        filmographies: HashMap<i64, Vec<CatalogMovie>>,
    }

    impl StubCatalog {
        fn new() -> Self {
            Self {
                directors: Vec::new(),
                filmographies: HashMap::new(),
            }
        }

        fn with_director(mut self, id: i64, name: &str, place: &'static str, movies: usize) -> Self {
            self.directors.push((
                CatalogPerson {
                    id,
                    name: name.to_string(),
                    known_for_department: Some("Directing".to_string()),
                    ..Default::default()
                },
                place,
            ));
            let films = (0..movies as i64)
                .map(|n| CatalogMovie {
                    id: id * 100 + n,
                    title: Some(format!("{} film {}", name, n)),
                    poster_path: Some(format!("/{}-{}.jpg", id, n)),
                    release_date: Some(format!("20{:02}-01-01", n)),
                    popularity: 100.0 - n as f64,
                    job: Some("Director".to_string()),
                    department: Some("Directing".to_string()),
                    ..Default::default()
                })
                .collect();
            self.filmographies.insert(id, films);
            self
        }
    }

    #[async_trait]
    impl CatalogApi for StubCatalog {
        async fn search_movies(&self, _query: &str) -> Result<Vec<CatalogMovie>, CatalogError> {
            Ok(vec![])
        }

        async fn search_people(&self, _query: &str) -> Result<Vec<CatalogPerson>, CatalogError> {
            Ok(vec![])
        }

        async fn movie_details(&self, movie_id: i64) -> Result<serde_json::Value, CatalogError> {
            Ok(json!({ "id": movie_id }))
        }

        async fn movie_credits(&self, movie_id: i64) -> Result<MovieCredits, CatalogError> {
            tokio::task::yield_now().await;
            let director_id = movie_id / 100;
            Ok(serde_json::from_value(json!({
                "crew": [{ "id": director_id, "name": "Director", "job": "Director" }]
            }))
            .unwrap())
        }

        async fn watch_providers(
            &self,
            _movie_id: i64,
        ) -> Result<WatchProvidersResponse, CatalogError> {
            Ok(WatchProvidersResponse::default())
        }

        async fn person_details(&self, person_id: i64) -> Result<PersonDetails, CatalogError> {
            tokio::task::yield_now().await;
            let (person, place) = self
                .directors
                .iter()
                .find(|(p, _)| p.id == person_id)
                .ok_or(CatalogError::Status {
                    status: 404,
                    message: "not found".to_string(),
                })?;
            Ok(PersonDetails {
                id: person.id,
                name: person.name.clone(),
                place_of_birth: Some(place.to_string()),
                profile_path: None,
            })
        }

        async fn person_images(&self, _person_id: i64) -> Result<PersonImages, CatalogError> {
            Ok(PersonImages::default())
        }

        async fn person_movie_credits(
            &self,
            person_id: i64,
        ) -> Result<PersonMovieCredits, CatalogError> {
            tokio::task::yield_now().await;
            Ok(PersonMovieCredits {
                crew: self
                    .filmographies
                    .get(&person_id)
                    .cloned()
                    .unwrap_or_default(),
            })
        }

        async fn popular_people(&self, _page: u32) -> Result<Vec<CatalogPerson>, CatalogError> {
            Ok(vec![])
        }

        async fn trending_people(
            &self,
            _window: TrendingWindow,
        ) -> Result<Vec<CatalogPerson>, CatalogError> {
            tokio::task::yield_now().await;
            Ok(self.directors.iter().map(|(p, _)| p.clone()).collect())
        }

        async fn popular_movies(&self) -> Result<Vec<CatalogMovie>, CatalogError> {
            Ok(vec![])
        }

        async fn top_rated_movies(&self) -> Result<Vec<CatalogMovie>, CatalogError> {
            Ok(vec![])
        }
    }

    fn engine(catalog: StubCatalog, min_movies: usize) -> RecommendationEngine {
        RecommendationEngine::new(
            Arc::new(catalog),
            None,
            RecommendationSettings {
                min_movies,
                strategy: DiscoveryStrategy::Trending,
                ..Default::default()
            },
        )
    }

    fn four_directors() -> StubCatalog {
        StubCatalog::new()
            .with_director(1, "Lucrecia Martel", "Salta, Argentina", 5)
            .with_director(2, "Wes Anderson", "Houston, Texas, USA", 8)
            .with_director(3, "Céline Sciamma", "Pontoise, France", 4)
            .with_director(4, "Hirokazu Kore-eda", "Tokyo, Japan", 12)
    }

    fn morning(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_generated_batch_invariants() {
        let recommendations = engine(four_directors(), 4).generate().await.unwrap();

        assert_eq!(recommendations.len(), 4);
        for rec in &recommendations {
            assert!((1.0..=10.0).contains(&rec.rating));
            assert_eq!(rec.rating, (rec.rating * 10.0).round() / 10.0);
            assert!(rec.movies.len() >= 4 && rec.movies.len() <= 6);
            assert_eq!(rec.description.matches('\n').count(), 1);
            assert!(rec.description.split('\n').all(|line| !line.trim().is_empty()));
        }

        let martel = recommendations.iter().find(|r| r.director_id == 1).unwrap();
        assert_eq!(martel.director_country.as_deref(), Some("Argentina"));
        assert_eq!(martel.place_of_birth.as_deref(), Some("Salta, Argentina"));
    }

    #[tokio::test]
    async fn test_min_movie_boundary_at_four() {
        let catalog = StubCatalog::new()
            .with_director(1, "Exactly Four", "Lima, Peru", 4)
            .with_director(2, "Only Three", "Lima, Peru", 3);

        let recommendations = engine(catalog, 4).generate().await.unwrap();
        let ids: Vec<i64> = recommendations.iter().map(|r| r.director_id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn test_min_movie_boundary_at_one() {
        let catalog = StubCatalog::new()
            .with_director(1, "Single Film", "Lima, Peru", 1)
            .with_director(2, "No Films", "Lima, Peru", 0);

        let recommendations = engine(catalog, 1).generate().await.unwrap();
        let ids: Vec<i64> = recommendations.iter().map(|r| r.director_id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(recommendations[0].movies.len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_assembled_is_an_error() {
        let catalog = StubCatalog::new().with_director(1, "No Films", "Lima, Peru", 0);
        let result = engine(catalog, 4).generate().await;
        assert!(matches!(result, Err(RecommendationError::NothingAssembled)));
    }

    #[tokio::test]
    async fn test_no_candidates_is_an_error() {
        let result = engine(StubCatalog::new(), 4).generate().await;
        assert!(matches!(result, Err(RecommendationError::NoCandidates)));
    }

    #[tokio::test]
    async fn test_reads_in_same_window_are_identical() {
        let engine = engine(four_directors(), 4);
        let cache = DailyCache::new();

        let first = engine.todays_batch_at(&cache, morning(1), 12).await.unwrap();
        let second = engine.todays_batch_at(&cache, morning(1), 13).await.unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(cache.version(), 1);
        assert!(first.message.is_none());
    }

    #[tokio::test]
    async fn test_partial_batch_carries_message() {
        let catalog = StubCatalog::new().with_director(1, "Lucrecia Martel", "Salta, Argentina", 5);
        let cache = DailyCache::new();

        let response = engine(catalog, 4)
            .todays_batch_at(&cache, morning(1), 12)
            .await
            .unwrap();

        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(
            response.message.as_deref(),
            Some("Check back later for more recommendations")
        );
    }

    #[tokio::test]
    async fn test_failure_serves_previous_entry() {
        let cache = DailyCache::new();
        engine(four_directors(), 4)
            .todays_batch_at(&cache, morning(1), 12)
            .await
            .unwrap();

        // Next day the catalog has nothing to offer
        let response = engine(StubCatalog::new(), 4)
            .todays_batch_at(&cache, morning(2), 12)
            .await
            .unwrap();

        assert_eq!(response.recommendations.len(), 4);
        assert_eq!(cache.version(), 1);
        assert_eq!(cache.snapshot().await.unwrap().generated_day_key, "2025-03-01");
    }

    #[tokio::test]
    async fn test_cold_start_failure_is_an_error() {
        let cache = DailyCache::new();
        let result = engine(StubCatalog::new(), 4)
            .todays_batch_at(&cache, morning(1), 12)
            .await;

        assert!(result.is_err());
        assert!(cache.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_regeneration_last_writer_wins() {
        let engine = engine(four_directors(), 4);
        let cache = DailyCache::new();

        let (a, b) = tokio::join!(
            engine.todays_batch_at(&cache, morning(1), 12),
            engine.todays_batch_at(&cache, morning(1), 12)
        );

        assert!(a.is_ok() && b.is_ok());
        // Both racers saw an empty cache and wrote a batch
        assert_eq!(cache.version(), 2);

        let entry = cache.snapshot().await.unwrap();
        assert_eq!(entry.version, 2);
        assert_eq!(entry.recommendations.len(), 4);
        assert!(entry.recommendations.iter().all(|r| r.movies.len() >= 4));
    }

    #[test]
    fn test_settings_clamp_min_movies() {
        let mut config: Config = serde_json::from_value(json!({
            "jwt_secret": "secret",
            "recommendation_min_movies": 0,
            "recommendation_strategy": "crew-mining"
        }))
        .unwrap();
        let settings = RecommendationSettings::from_config(&config).unwrap();
        assert_eq!(settings.min_movies, 1);
        assert_eq!(settings.strategy, DiscoveryStrategy::CrewMining);

        config.recommendation_strategy = "astrology".to_string();
        assert!(RecommendationSettings::from_config(&config).is_err());
    }
}
