use std::sync::Arc;

use crate::{
    models::{EnrichedMovie, RegionProviders},
    services::{
        catalog::{movie_runtime, CatalogApi, CatalogError},
        directors::movie_director,
    },
};

pub const MIN_QUERY_CHARS: usize = 2;
const ENRICHED_RESULTS: usize = 10;

/// Catalog movie search, first hits enriched with runtime and director
///
/// Enrichment lookups run concurrently per movie; a failed lookup leaves its
/// field empty instead of failing the search.
pub async fn search_movies(
    catalog: &Arc<dyn CatalogApi>,
    query: &str,
) -> Result<Vec<EnrichedMovie>, CatalogError> {
    let movies = catalog.search_movies(query.trim()).await?;

    let mut tasks = Vec::new();
    for movie in movies.into_iter().take(ENRICHED_RESULTS) {
        let catalog = Arc::clone(catalog);
        tasks.push(tokio::spawn(async move {
            let (runtime, director) = tokio::join!(
                movie_runtime(catalog.as_ref(), movie.id),
                movie_director(catalog.as_ref(), movie.id)
            );
            EnrichedMovie {
                movie,
                runtime,
                director,
            }
        }));
    }

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(enriched) => results.push(enriched),
            Err(e) => tracing::error!(error = %e, "Movie enrichment task join error"),
        }
    }

    tracing::debug!(query = %query, results = results.len(), "Movie search complete");
    Ok(results)
}

/// Streaming availability for one region; empty when the region has no offers
pub async fn watch_providers(
    catalog: &dyn CatalogApi,
    movie_id: i64,
    region: &str,
) -> Result<RegionProviders, CatalogError> {
    let mut response = catalog.watch_providers(movie_id).await?;
    Ok(response.results.remove(region).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogMovie, MovieCredits, PersonImages, WatchProvidersResponse};
    use crate::services::catalog::MockCatalogApi;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_enriches_first_ten_in_order() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_search_movies().returning(|_| {
            Ok((1..=12)
                .map(|id| CatalogMovie {
                    id,
                    title: Some(format!("Film {}", id)),
                    ..Default::default()
                })
                .collect())
        });
        catalog
            .expect_movie_details()
            .returning(|id| Ok(json!({ "id": id, "runtime": 90 })));
        catalog.expect_movie_credits().returning(|id| {
            if id == 1 {
                Ok(serde_json::from_value::<MovieCredits>(json!({
                    "crew": [{ "id": 5, "name": "Lucrecia Martel", "job": "Director" }]
                }))
                .unwrap())
            } else {
                Ok(MovieCredits::default())
            }
        });
        catalog
            .expect_person_images()
            .returning(|_| Ok(PersonImages::default()));

        let catalog: Arc<dyn CatalogApi> = Arc::new(catalog);
        let results = search_movies(&catalog, "la cienaga").await.unwrap();

        assert_eq!(results.len(), 10);
        assert_eq!(results[0].movie.id, 1);
        assert_eq!(results[9].movie.id, 10);
        assert!(results.iter().all(|r| r.runtime == Some(90)));
        assert_eq!(
            results[0].director.as_ref().and_then(|d| d.name.as_deref()),
            Some("Lucrecia Martel")
        );
        assert!(results[1].director.is_none());
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_search_movies().returning(|_| {
            Err(CatalogError::Status {
                status: 401,
                message: "Invalid API key".to_string(),
            })
        });

        let catalog: Arc<dyn CatalogApi> = Arc::new(catalog);
        let result = search_movies(&catalog, "zama").await;
        assert!(matches!(result, Err(CatalogError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_watch_providers_picks_region() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_watch_providers().returning(|_| {
            Ok(serde_json::from_value::<WatchProvidersResponse>(json!({
                "results": {
                    "MX": {
                        "link": "https://www.themoviedb.org/movie/603/watch?locale=MX",
                        "flatrate": [{ "provider_id": 8, "provider_name": "Netflix" }]
                    }
                }
            }))
            .unwrap())
        });

        let mx = watch_providers(&catalog, 603, "MX").await.unwrap();
        assert_eq!(mx.flatrate.len(), 1);
        assert!(mx.link.is_some());

        let ar = watch_providers(&catalog, 603, "AR").await.unwrap();
        assert_eq!(ar, RegionProviders::default());
    }
}
