use std::{cmp::Ordering, collections::HashSet, sync::Arc};

use crate::{
    models::{CatalogMovie, MovieRecord},
    services::catalog::CatalogApi,
};

/// Concurrent credit checks per batch
pub const VERIFY_CONCURRENCY: usize = 4;

/// Filmography entries considered after ranking
pub const CANDIDATE_CAP: usize = 20;

/// Popularity first, newest release breaks ties; missing dates sort last
pub fn compare_rank(
    a_popularity: f64,
    a_date: Option<&str>,
    b_popularity: f64,
    b_date: Option<&str>,
) -> Ordering {
    b_popularity
        .partial_cmp(&a_popularity)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b_date.unwrap_or_default().cmp(a_date.unwrap_or_default()))
}

pub fn rank_records(movies: &mut [MovieRecord]) {
    movies.sort_by(|a, b| {
        compare_rank(
            a.popularity,
            a.release_date.as_deref(),
            b.popularity,
            b.release_date.as_deref(),
        )
    });
}

fn rank_catalog_movies(movies: &mut [CatalogMovie]) {
    movies.sort_by(|a, b| {
        compare_rank(
            a.popularity,
            a.any_release_date(),
            b.popularity,
            b.any_release_date(),
        )
    });
}

/// Checks each movie's credits for a director credit by `director_id`
///
/// Runs one spawned task per movie; a failed lookup counts as not directed by.
async fn verify_batch(
    catalog: &Arc<dyn CatalogApi>,
    director_id: i64,
    movies: &[CatalogMovie],
) -> Vec<bool> {
    let mut tasks = Vec::with_capacity(movies.len());

    for movie in movies {
        let catalog = Arc::clone(catalog);
        let movie_id = movie.id;
        tasks.push(tokio::spawn(async move {
            catalog.movie_credits(movie_id).await
        }));
    }

    let mut results = Vec::with_capacity(tasks.len());
    for (task, movie) in tasks.into_iter().zip(movies) {
        let verified = match task.await {
            Ok(Ok(credits)) => credits.directed_by(director_id),
            Ok(Err(e)) => {
                tracing::debug!(movie_id = movie.id, error = %e, "Credit check failed");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Credit check task join error");
                false
            }
        };
        if !verified {
            tracing::debug!(movie_id = movie.id, director_id, "Skipping movie not directed by candidate");
        }
        results.push(verified);
    }

    results
}

/// Verifies candidates in bounded batches, appending to `accepted` until `limit`
async fn accept_verified(
    catalog: &Arc<dyn CatalogApi>,
    director_id: i64,
    candidates: Vec<CatalogMovie>,
    accepted: &mut Vec<CatalogMovie>,
    seen: &mut HashSet<i64>,
    limit: usize,
) {
    let candidates: Vec<CatalogMovie> = candidates
        .into_iter()
        .filter(|m| m.has_poster() && !seen.contains(&m.id))
        .collect();

    for batch in candidates.chunks(VERIFY_CONCURRENCY) {
        if accepted.len() >= limit {
            break;
        }

        let verdicts = verify_batch(catalog, director_id, batch).await;
        for (movie, verified) in batch.iter().zip(verdicts) {
            if accepted.len() >= limit {
                break;
            }
            if verified && seen.insert(movie.id) {
                accepted.push(movie.clone());
            }
        }
    }
}

/// Builds a verified, deduplicated filmography of at most `limit` movies
///
/// Preferred movies (e.g. "known for" titles) are checked first, then the
/// director's own credits ranked by popularity. Returns an empty list when
/// nothing verifies.
pub async fn build_filmography(
    catalog: &Arc<dyn CatalogApi>,
    director_id: i64,
    preferred: &[CatalogMovie],
    limit: usize,
) -> Vec<MovieRecord> {
    let mut accepted = Vec::new();
    let mut seen = HashSet::new();

    accept_verified(
        catalog,
        director_id,
        preferred.to_vec(),
        &mut accepted,
        &mut seen,
        limit,
    )
    .await;

    if accepted.len() < limit {
        match catalog.person_movie_credits(director_id).await {
            Ok(credits) => {
                let mut listed = HashSet::new();
                let mut directed: Vec<CatalogMovie> = credits
                    .crew
                    .into_iter()
                    .filter(|m| m.is_directing_credit() && m.has_poster())
                    .filter(|m| !seen.contains(&m.id) && listed.insert(m.id))
                    .collect();
                rank_catalog_movies(&mut directed);
                directed.truncate(CANDIDATE_CAP);

                accept_verified(
                    catalog,
                    director_id,
                    directed,
                    &mut accepted,
                    &mut seen,
                    limit,
                )
                .await;
            }
            Err(e) => {
                tracing::warn!(director_id, error = %e, "Director filmography fetch failed");
            }
        }
    }

    if accepted.is_empty() {
        tracing::warn!(director_id, "No verified movies with posters for director");
    }

    accepted.iter().map(MovieRecord::from).collect()
}
