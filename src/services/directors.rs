use std::{collections::HashSet, sync::Arc};

use crate::{
    cached,
    db::{Cache, CacheKey},
    models::{
        recommendation::{build_profile_url, extract_country},
        CatalogMovie, DirectorProfile, DirectorRef, EnrichedMovie,
    },
    services::{
        catalog::{movie_runtime, CatalogApi, CatalogError},
        recommendations::selection::compare_rank,
    },
};

const LOOKUP_CACHE_TTL: u64 = 86_400; // 1 day
const SEARCH_CACHE_TTL: u64 = 3_600; // 1 hour

pub const MIN_QUERY_CHARS: usize = 2;
const MAX_SUGGESTIONS: usize = 10;
const TOP_UP_BELOW: usize = 5;
const MOVIE_HITS_FOR_TOP_UP: usize = 3;

const FILMOGRAPHY_LIMIT: usize = 20;
const FILMOGRAPHY_WITH_RUNTIME: usize = 5;

/// First profile photo of a person as a full URL
pub async fn profile_url(catalog: &dyn CatalogApi, person_id: i64) -> Option<String> {
    match catalog.person_images(person_id).await {
        Ok(images) => images
            .profiles
            .first()
            .and_then(|p| build_profile_url(Some(&p.file_path))),
        Err(e) => {
            tracing::debug!(person_id, error = %e, "Profile images fetch failed");
            None
        }
    }
}

/// Strips punctuation from a free-text name, keeping letters, digits and spaces
pub fn clean_director_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

async fn resolve_director_profile(
    catalog: &dyn CatalogApi,
    name: &str,
) -> Result<Option<DirectorProfile>, CatalogError> {
    let cleaned = clean_director_name(name);
    let mut people = if cleaned.is_empty() {
        Vec::new()
    } else {
        catalog.search_people(&cleaned).await?
    };

    if people.is_empty() && cleaned != name.trim() {
        people = catalog.search_people(name.trim()).await?;
    }

    let Some(person) = people
        .iter()
        .find(|p| p.is_director())
        .or_else(|| people.first())
    else {
        tracing::warn!(name = %name, "No director found for name");
        return Ok(None);
    };

    let place_of_birth = match catalog.person_details(person.id).await {
        Ok(details) => details.place_of_birth,
        Err(e) => {
            tracing::debug!(person_id = person.id, error = %e, "Person details fetch failed");
            None
        }
    };

    Ok(Some(DirectorProfile {
        id: person.id,
        name: if person.name.is_empty() {
            name.trim().to_string()
        } else {
            person.name.clone()
        },
        country: extract_country(place_of_birth.as_deref()),
        place_of_birth,
        profile_url: profile_url(catalog, person.id).await,
    }))
}

/// Resolves a cycle name to a director profile; failures yield `None`
pub async fn lookup_director_by_name(
    catalog: &dyn CatalogApi,
    cache: &Cache,
    name: &str,
) -> Option<DirectorProfile> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let result: Result<Option<DirectorProfile>, CatalogError> = cached!(
        cache,
        CacheKey::DirectorLookup(name.to_string()),
        LOOKUP_CACHE_TTL,
        resolve_director_profile(catalog, name)
    );

    match result {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(name = %name, error = %e, "Director lookup failed");
            None
        }
    }
}

/// Director credited on a movie, with profile photo
pub async fn movie_director(catalog: &dyn CatalogApi, movie_id: i64) -> Option<DirectorRef> {
    let credits = match catalog.movie_credits(movie_id).await {
        Ok(credits) => credits,
        Err(e) => {
            tracing::debug!(movie_id, error = %e, "Movie credits fetch failed");
            return None;
        }
    };

    let director = credits.director()?;
    Some(DirectorRef {
        id: director.id,
        name: Some(director.name.clone()),
        profile_url: profile_url(catalog, director.id).await,
    })
}

async fn fetch_director_suggestions(
    catalog: &Arc<dyn CatalogApi>,
    query: &str,
) -> Result<Vec<DirectorRef>, CatalogError> {
    let people = match catalog.search_people(query).await {
        Ok(people) => people,
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "Person search for directors failed");
            Vec::new()
        }
    };

    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();

    for person in people.iter().filter(|p| p.is_director()) {
        if suggestions.len() >= MAX_SUGGESTIONS {
            break;
        }
        if seen.insert(person.id) {
            suggestions.push(DirectorRef {
                id: person.id,
                name: Some(person.name.clone()),
                profile_url: profile_url(catalog.as_ref(), person.id).await,
            });
        }
    }

    if suggestions.len() < TOP_UP_BELOW {
        let movies = match catalog.search_movies(query).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Movie search for director top-up failed");
                Vec::new()
            }
        };

        let mut tasks = Vec::new();
        for movie in movies.into_iter().take(MOVIE_HITS_FOR_TOP_UP) {
            let catalog = Arc::clone(catalog);
            tasks.push(tokio::spawn(async move {
                movie_director(catalog.as_ref(), movie.id).await
            }));
        }

        for task in tasks {
            match task.await {
                Ok(Some(director)) => {
                    if suggestions.len() < MAX_SUGGESTIONS && seen.insert(director.id) {
                        suggestions.push(director);
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "Director top-up task join error"),
            }
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    Ok(suggestions)
}

/// Director autocomplete
///
/// Queries shorter than two characters return nothing. The query is
/// lowercased before it reaches the catalog or the cache, so results do not
/// depend on its casing.
pub async fn search_directors(
    catalog: &Arc<dyn CatalogApi>,
    cache: &Cache,
    query: &str,
) -> Result<Vec<DirectorRef>, CatalogError> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Ok(Vec::new());
    }

    cached!(
        cache,
        CacheKey::DirectorSearch(query.clone()),
        SEARCH_CACHE_TTL,
        fetch_director_suggestions(catalog, &query)
    )
}

/// Movies a person directed, ranked, with runtime filled in for the top entries
pub async fn director_filmography(
    catalog: &Arc<dyn CatalogApi>,
    director_id: i64,
) -> Result<Vec<EnrichedMovie>, CatalogError> {
    let credits = catalog.person_movie_credits(director_id).await?;

    let director_name = match catalog.person_details(director_id).await {
        Ok(details) if !details.name.is_empty() => Some(details.name),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(director_id, error = %e, "Person details fetch failed");
            None
        }
    };

    let mut seen = HashSet::new();
    let mut directed: Vec<CatalogMovie> = credits
        .crew
        .into_iter()
        .filter(|m| m.is_directing_credit() && m.has_poster() && seen.insert(m.id))
        .collect();
    directed.sort_by(|a, b| {
        compare_rank(
            a.popularity,
            a.any_release_date(),
            b.popularity,
            b.any_release_date(),
        )
    });
    directed.truncate(FILMOGRAPHY_LIMIT);

    let mut runtime_tasks = Vec::new();
    for movie in directed.iter().take(FILMOGRAPHY_WITH_RUNTIME) {
        let catalog = Arc::clone(catalog);
        let movie_id = movie.id;
        runtime_tasks.push(tokio::spawn(async move {
            movie_runtime(catalog.as_ref(), movie_id).await
        }));
    }

    let mut runtimes = Vec::with_capacity(runtime_tasks.len());
    for task in runtime_tasks {
        runtimes.push(task.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Runtime task join error");
            None
        }));
    }

    let director = DirectorRef {
        id: director_id,
        name: director_name,
        profile_url: None,
    };

    Ok(directed
        .into_iter()
        .enumerate()
        .map(|(i, movie)| EnrichedMovie {
            movie: CatalogMovie {
                job: None,
                department: None,
                ..movie
            },
            runtime: runtimes.get(i).copied().flatten(),
            director: Some(director.clone()),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CatalogPerson, MovieCredits, PersonDetails, PersonImages, PersonMovieCredits,
    };
    use crate::services::catalog::MockCatalogApi;
    use serde_json::json;

    fn director(id: i64, name: &str) -> CatalogPerson {
        CatalogPerson {
            id,
            name: name.to_string(),
            known_for_department: Some("Directing".to_string()),
            ..Default::default()
        }
    }

    fn no_images(catalog: &mut MockCatalogApi) {
        catalog
            .expect_person_images()
            .returning(|_| Ok(PersonImages::default()));
    }

    #[test]
    fn test_clean_director_name() {
        assert_eq!(clean_director_name("  Agnès Varda!! "), "Agnès Varda");
        assert_eq!(clean_director_name("Bong Joon-ho"), "Bong Joonho");
        assert_eq!(clean_director_name("???"), "");
    }

    #[tokio::test]
    async fn test_search_short_query_returns_empty() {
        let catalog: Arc<dyn CatalogApi> = Arc::new(MockCatalogApi::new());
        let results = search_directors(&catalog, &Cache::disabled(), "n")
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let mut catalog = MockCatalogApi::new();
        catalog
            .expect_search_people()
            .withf(|query| query == "nolan")
            .times(2)
            .returning(|_| {
                Ok(vec![
                    director(525, "Christopher Nolan"),
                    CatalogPerson {
                        id: 1,
                        name: "Someone Nolan".to_string(),
                        known_for_department: Some("Acting".to_string()),
                        ..Default::default()
                    },
                ])
            });
        catalog.expect_search_movies().returning(|_| Ok(vec![]));
        no_images(&mut catalog);

        let catalog: Arc<dyn CatalogApi> = Arc::new(catalog);
        let cache = Cache::disabled();
        let lower = search_directors(&catalog, &cache, "nolan").await.unwrap();
        let upper = search_directors(&catalog, &cache, "NOLAN").await.unwrap();

        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 1);
        assert_eq!(lower[0].id, 525);
    }

    #[tokio::test]
    async fn test_search_tops_up_from_movie_hits() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_search_people().returning(|_| Ok(vec![]));
        catalog.expect_search_movies().returning(|_| {
            Ok((1..=5)
                .map(|id| CatalogMovie {
                    id,
                    ..Default::default()
                })
                .collect())
        });
        catalog.expect_movie_credits().returning(|movie_id| {
            let director_id = if movie_id == 2 { 10 } else { 20 };
            let credits: MovieCredits = serde_json::from_value(json!({
                "crew": [{ "id": director_id, "name": format!("Director {}", director_id), "job": "Director" }]
            }))
            .unwrap();
            Ok(credits)
        });
        no_images(&mut catalog);

        let catalog: Arc<dyn CatalogApi> = Arc::new(catalog);
        let results = search_directors(&catalog, &Cache::disabled(), "inception")
            .await
            .unwrap();

        let ids: Vec<i64> = results.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![20, 10]);
    }

    #[tokio::test]
    async fn test_search_survives_rejected_person_search() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_search_people().returning(|_| {
            Err(CatalogError::Status {
                status: 401,
                message: "Invalid API key: You must be granted a valid key.".to_string(),
            })
        });
        catalog.expect_search_movies().times(1).returning(|_| {
            Ok(vec![CatalogMovie {
                id: 27205,
                ..Default::default()
            }])
        });
        catalog.expect_movie_credits().returning(|_| {
            Ok(serde_json::from_value(json!({
                "crew": [{ "id": 525, "name": "Christopher Nolan", "job": "Director" }]
            }))
            .unwrap())
        });
        no_images(&mut catalog);

        let catalog: Arc<dyn CatalogApi> = Arc::new(catalog);
        let results = search_directors(&catalog, &Cache::disabled(), "nolan")
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 525);
        assert_eq!(results[0].name.as_deref(), Some("Christopher Nolan"));
    }

    #[tokio::test]
    async fn test_lookup_retries_with_raw_name() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_search_people().returning(|query| {
            Ok(if query == "Bong Joon-ho" {
                vec![director(21684, "Bong Joon-ho")]
            } else {
                vec![]
            })
        });
        catalog.expect_person_details().returning(|id| {
            Ok(PersonDetails {
                id,
                name: "Bong Joon-ho".to_string(),
                place_of_birth: Some("Daegu, South Korea".to_string()),
                profile_path: None,
            })
        });
        catalog.expect_person_images().returning(|_| {
            Ok(serde_json::from_value(json!({ "profiles": [{ "file_path": "/bong.jpg" }] })).unwrap())
        });

        let profile = lookup_director_by_name(&catalog, &Cache::disabled(), "Bong Joon-ho")
            .await
            .unwrap();

        assert_eq!(profile.id, 21684);
        assert_eq!(profile.country.as_deref(), Some("South Korea"));
        assert_eq!(
            profile.profile_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w185/bong.jpg")
        );
    }

    #[tokio::test]
    async fn test_filmography_ranks_and_enriches() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_person_movie_credits().returning(|_| {
            let crew = (1..=7)
                .map(|id| CatalogMovie {
                    id,
                    title: Some(format!("Film {}", id)),
                    poster_path: Some(format!("/{}.jpg", id)),
                    popularity: id as f64,
                    job: Some("Director".to_string()),
                    department: Some("Directing".to_string()),
                    ..Default::default()
                })
                .collect();
            Ok(PersonMovieCredits { crew })
        });
        catalog.expect_person_details().returning(|id| {
            Ok(PersonDetails {
                id,
                name: "Kelly Reichardt".to_string(),
                ..Default::default()
            })
        });
        catalog
            .expect_movie_details()
            .returning(|id| Ok(json!({ "id": id, "runtime": 100 + id })));

        let catalog: Arc<dyn CatalogApi> = Arc::new(catalog);
        let movies = director_filmography(&catalog, 66).await.unwrap();

        let ids: Vec<i64> = movies.iter().map(|m| m.movie.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(movies[0].runtime, Some(107));
        assert_eq!(movies[4].runtime, Some(103));
        assert_eq!(movies[5].runtime, None);
        assert!(movies.iter().all(|m| m.movie.job.is_none()));
        assert_eq!(
            movies[0].director.as_ref().and_then(|d| d.name.as_deref()),
            Some("Kelly Reichardt")
        );
    }
}
