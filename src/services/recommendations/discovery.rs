use std::{collections::HashSet, str::FromStr, sync::Arc};

use rand::seq::SliceRandom;

use crate::{
    models::{CatalogMovie, CatalogPerson, DirectorCandidate},
    services::{
        catalog::{CatalogApi, TrendingWindow},
        generative::{GenerationError, TextGenerator},
    },
};

/// Birth countries that satisfy the Latin-American quota
pub const LATIN_AMERICAN_COUNTRIES: &[&str] = &[
    "Argentina",
    "Bolivia",
    "Brazil",
    "Brasil",
    "Chile",
    "Colombia",
    "Costa Rica",
    "Cuba",
    "Dominican Republic",
    "Ecuador",
    "El Salvador",
    "Guatemala",
    "Honduras",
    "Mexico",
    "México",
    "Nicaragua",
    "Panama",
    "Panamá",
    "Paraguay",
    "Peru",
    "Perú",
    "Puerto Rico",
    "Uruguay",
    "Venezuela",
];

const POPULAR_PEOPLE_PAGES: u32 = 3;
const MAX_SUGGESTED_NAMES: usize = 6;
const LATIN_AMERICAN_LOOKUPS: usize = 8;

const DIRECTOR_PROMPT: &str = "Pick 4 film directors, contemporary or classic, who stand out for quality, influence or prestige.
IMPORTANT:
- At least 1 of the 4 must be an innovative pick (emerging, avant-garde, or with an experimental style).
- At least 1 of the 4 must be a Latin-American director (from Mexico, Argentina, Chile, Colombia, Brazil, etc.).
Include auteur cinema, world cinema or innovative voices.
Reply only with a comma-separated list of names.";

pub fn is_latin_american(country: Option<&str>) -> bool {
    country.is_some_and(|c| {
        LATIN_AMERICAN_COUNTRIES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(c.trim()))
    })
}

/// How the daily candidates are picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryStrategy {
    /// Trending and popular people known for directing
    Trending,
    /// Directors credited on popular and top-rated movies
    CrewMining,
    /// Names suggested by the generative API, resolved against the catalog
    #[default]
    Generative,
}

impl FromStr for DiscoveryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => Ok(DiscoveryStrategy::Trending),
            "crew-mining" | "crew_mining" => Ok(DiscoveryStrategy::CrewMining),
            "generative" => Ok(DiscoveryStrategy::Generative),
            other => Err(format!("Unknown recommendation strategy: {}", other)),
        }
    }
}

/// Candidate plus the titles the catalog lists it as known for
#[derive(Debug, Clone)]
pub struct DiscoveredDirector {
    pub candidate: DirectorCandidate,
    pub known_for: Vec<CatalogMovie>,
}

impl DiscoveredDirector {
    fn from_person(person: &CatalogPerson) -> Self {
        let known_for = person
            .known_for
            .iter()
            .filter(|m| matches!(m.media_type.as_deref(), Some("movie") | Some("tv") | None))
            .filter(|m| m.has_poster())
            .cloned()
            .collect();

        Self {
            candidate: DirectorCandidate::new(person.id, person.name.clone()),
            known_for,
        }
    }
}

/// Splits a comma or newline separated list, dropping bullets, quotes and repeats
pub fn parse_name_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split([',', '\n', '\r'])
        .map(|item| {
            item.trim()
                .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | ')' | '-' | '*' | '•'))
                .trim()
                .trim_matches(|c| matches!(c, '"' | '\'' | '.'))
                .trim()
        })
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn shuffled<T>(mut items: Vec<T>) -> Vec<T> {
    items.shuffle(&mut rand::thread_rng());
    items
}

pub struct DirectorDiscovery {
    catalog: Arc<dyn CatalogApi>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl DirectorDiscovery {
    pub fn new(catalog: Arc<dyn CatalogApi>, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { catalog, generator }
    }

    /// Yields up to `target` distinct directors using the given strategy
    pub async fn discover(
        &self,
        strategy: DiscoveryStrategy,
        target: usize,
        require_latin_american: bool,
    ) -> Vec<DiscoveredDirector> {
        let mut selected = match strategy {
            DiscoveryStrategy::Trending => self.from_trending(target, &HashSet::new()).await,
            DiscoveryStrategy::CrewMining => self.from_crew(target).await,
            DiscoveryStrategy::Generative => match self.from_generator(target).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(error = %e, "Generative discovery failed, using trending directors");
                    Vec::new()
                }
            },
        };

        if selected.len() < target && strategy != DiscoveryStrategy::Trending {
            let seen: HashSet<i64> = selected.iter().map(|d| d.candidate.id).collect();
            let missing = target - selected.len();
            selected.extend(self.from_trending(missing, &seen).await);
        }

        if require_latin_american && !selected.is_empty() {
            self.apply_latin_american_quota(&mut selected).await;
        }

        tracing::info!(
            strategy = ?strategy,
            count = selected.len(),
            directors = ?selected.iter().map(|d| d.candidate.name.as_str()).collect::<Vec<_>>(),
            "Directors discovered"
        );

        selected
    }

    /// Directing-department people from trending and popular lists, deduplicated
    async fn trending_pool(&self) -> Vec<DiscoveredDirector> {
        let mut people: Vec<CatalogPerson> = Vec::new();

        for window in [TrendingWindow::Week, TrendingWindow::Day] {
            match self.catalog.trending_people(window).await {
                Ok(found) => people.extend(found),
                Err(e) => {
                    tracing::warn!(window = window.as_str(), error = %e, "Trending people fetch failed")
                }
            }
        }

        for page in 1..=POPULAR_PEOPLE_PAGES {
            match self.catalog.popular_people(page).await {
                Ok(found) => people.extend(found),
                Err(e) => tracing::warn!(page, error = %e, "Popular people fetch failed"),
            }
        }

        let mut seen = HashSet::new();
        people
            .iter()
            .filter(|p| p.is_director() && !p.name.is_empty())
            .filter(|p| seen.insert(p.id))
            .map(DiscoveredDirector::from_person)
            .collect()
    }

    async fn from_trending(&self, count: usize, exclude: &HashSet<i64>) -> Vec<DiscoveredDirector> {
        if count == 0 {
            return Vec::new();
        }

        let pool: Vec<DiscoveredDirector> = self
            .trending_pool()
            .await
            .into_iter()
            .filter(|d| !exclude.contains(&d.candidate.id))
            .collect();

        tracing::debug!(pool = pool.len(), "Trending director pool");
        shuffled(pool).into_iter().take(count).collect()
    }

    async fn from_crew(&self, target: usize) -> Vec<DiscoveredDirector> {
        let mut movies = Vec::new();
        match self.catalog.popular_movies().await {
            Ok(found) => movies.extend(found),
            Err(e) => tracing::warn!(error = %e, "Popular movies fetch failed"),
        }
        match self.catalog.top_rated_movies().await {
            Ok(found) => movies.extend(found),
            Err(e) => tracing::warn!(error = %e, "Top rated movies fetch failed"),
        }

        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for movie in movies {
            if found.len() >= target {
                break;
            }

            let credits = match self.catalog.movie_credits(movie.id).await {
                Ok(credits) => credits,
                Err(e) => {
                    tracing::debug!(movie_id = movie.id, error = %e, "Credits fetch failed");
                    continue;
                }
            };

            if let Some(director) = credits.director() {
                if seen.insert(director.id) {
                    found.push(DiscoveredDirector {
                        candidate: DirectorCandidate::new(director.id, director.name.clone()),
                        known_for: vec![movie.clone()],
                    });
                }
            }
        }

        found
    }

    async fn from_generator(
        &self,
        target: usize,
    ) -> Result<Vec<DiscoveredDirector>, GenerationError> {
        let Some(generator) = &self.generator else {
            tracing::info!("No text generator configured, using trending directors");
            return Ok(Vec::new());
        };

        let response = generator.generate(DIRECTOR_PROMPT).await?;
        let names = parse_name_list(&response);
        if names.is_empty() {
            return Err(GenerationError::Unusable(response));
        }

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for name in names.iter().take(MAX_SUGGESTED_NAMES) {
            if found.len() >= target {
                break;
            }
            if let Some(director) = self.resolve_name(name).await {
                if seen.insert(director.candidate.id) {
                    found.push(director);
                }
            }
        }

        Ok(found)
    }

    /// Person search for a suggested name, preferring a directing match
    pub async fn resolve_name(&self, name: &str) -> Option<DiscoveredDirector> {
        let people = match self.catalog.search_people(name).await {
            Ok(people) => people,
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Director name lookup failed");
                return None;
            }
        };

        let person = people
            .iter()
            .find(|p| p.is_director())
            .or_else(|| people.first());

        match person {
            Some(person) => Some(DiscoveredDirector::from_person(person)),
            None => {
                tracing::warn!(name = %name, "No catalog match for suggested director");
                None
            }
        }
    }

    async fn fill_origin(&self, director: &mut DiscoveredDirector) {
        if director.candidate.place_of_birth.is_some() {
            return;
        }
        match self.catalog.person_details(director.candidate.id).await {
            Ok(details) => {
                director.candidate = director.candidate.clone().with_origin(details.place_of_birth)
            }
            Err(e) => {
                tracing::debug!(person_id = director.candidate.id, error = %e, "Person details fetch failed")
            }
        }
    }

    /// Swaps a Latin-American director in for the last pick when none was selected
    async fn apply_latin_american_quota(&self, selected: &mut Vec<DiscoveredDirector>) {
        for director in selected.iter_mut() {
            self.fill_origin(director).await;
        }

        if selected
            .iter()
            .any(|d| is_latin_american(d.candidate.country.as_deref()))
        {
            return;
        }

        let seen: HashSet<i64> = selected.iter().map(|d| d.candidate.id).collect();
        let pool: Vec<DiscoveredDirector> = self
            .trending_pool()
            .await
            .into_iter()
            .filter(|d| !seen.contains(&d.candidate.id))
            .collect();

        for mut director in pool.into_iter().take(LATIN_AMERICAN_LOOKUPS) {
            self.fill_origin(&mut director).await;
            if is_latin_american(director.candidate.country.as_deref()) {
                tracing::info!(director = %director.candidate.name, "Swapping in Latin-American director");
                if let Some(last) = selected.last_mut() {
                    *last = director;
                }
                return;
            }
        }

        tracing::warn!("No Latin-American director found in the candidate pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonDetails;
    use crate::services::catalog::MockCatalogApi;
    use crate::services::generative::MockTextGenerator;

    fn person(id: i64, name: &str, department: &str) -> CatalogPerson {
        CatalogPerson {
            id,
            name: name.to_string(),
            known_for_department: Some(department.to_string()),
            ..Default::default()
        }
    }

    fn empty_lists(catalog: &mut MockCatalogApi) {
        catalog.expect_trending_people().returning(|_| Ok(vec![]));
        catalog.expect_popular_people().returning(|_| Ok(vec![]));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("trending".parse(), Ok(DiscoveryStrategy::Trending));
        assert_eq!("Crew-Mining".parse(), Ok(DiscoveryStrategy::CrewMining));
        assert_eq!("generative".parse(), Ok(DiscoveryStrategy::Generative));
        assert!("random".parse::<DiscoveryStrategy>().is_err());
    }

    #[test]
    fn test_parse_name_list() {
        let names = parse_name_list(
            "1. Lucrecia Martel, Bong Joon-ho\n- Apichatpong Weerasethakul,\"Lucrecia Martel\", ",
        );
        assert_eq!(
            names,
            vec!["Lucrecia Martel", "Bong Joon-ho", "Apichatpong Weerasethakul"]
        );
    }

    #[test]
    fn test_is_latin_american() {
        assert!(is_latin_american(Some("Mexico")));
        assert!(is_latin_american(Some(" argentina ")));
        assert!(!is_latin_american(Some("USA")));
        assert!(!is_latin_american(None));
    }

    #[tokio::test]
    async fn test_trending_filters_directing_department() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_trending_people().returning(|window| {
            Ok(match window {
                TrendingWindow::Week => vec![
                    person(1, "Greta Gerwig", "Directing"),
                    person(2, "Zendaya", "Acting"),
                ],
                TrendingWindow::Day => vec![person(1, "Greta Gerwig", "directing")],
            })
        });
        catalog
            .expect_popular_people()
            .returning(|_| Ok(vec![person(3, "Jordan Peele", "DIRECTING")]));

        let discovery = DirectorDiscovery::new(Arc::new(catalog), None);
        let found = discovery
            .discover(DiscoveryStrategy::Trending, 4, false)
            .await;

        let mut ids: Vec<i64> = found.iter().map(|d| d.candidate.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_short_trending_pool_is_fetched_once() {
        let mut catalog = MockCatalogApi::new();
        catalog
            .expect_trending_people()
            .times(2)
            .returning(|_| Ok(vec![person(525, "Christopher Nolan", "Directing")]));
        catalog
            .expect_popular_people()
            .times(POPULAR_PEOPLE_PAGES as usize)
            .returning(|_| Ok(vec![]));

        let discovery = DirectorDiscovery::new(Arc::new(catalog), None);
        let found = discovery
            .discover(DiscoveryStrategy::Trending, 4, false)
            .await;

        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_generative_resolves_names_and_prefers_directors() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("Alfonso Cuarón, Céline Sciamma".to_string()));

        let mut catalog = MockCatalogApi::new();
        catalog.expect_search_people().returning(|query| {
            Ok(match query {
                "Alfonso Cuarón" => vec![
                    person(90, "Alfonso Cuarón Jr.", "Acting"),
                    person(11218, "Alfonso Cuarón", "Directing"),
                ],
                _ => vec![person(146, "Céline Sciamma", "Writing")],
            })
        });
        empty_lists(&mut catalog);

        let discovery = DirectorDiscovery::new(Arc::new(catalog), Some(Arc::new(generator)));
        let found = discovery
            .discover(DiscoveryStrategy::Generative, 2, false)
            .await;

        let ids: Vec<i64> = found.iter().map(|d| d.candidate.id).collect();
        assert_eq!(ids, vec![11218, 146]);
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back_to_trending() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(GenerationError::EmptyResponse));

        let mut catalog = MockCatalogApi::new();
        catalog
            .expect_trending_people()
            .returning(|_| Ok(vec![person(525, "Christopher Nolan", "Directing")]));
        catalog.expect_popular_people().returning(|_| Ok(vec![]));

        let discovery = DirectorDiscovery::new(Arc::new(catalog), Some(Arc::new(generator)));
        let found = discovery
            .discover(DiscoveryStrategy::Generative, 4, false)
            .await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].candidate.name, "Christopher Nolan");
    }

    #[tokio::test]
    async fn test_crew_mining_takes_unique_directors() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_popular_movies().returning(|| {
            Ok(vec![
                CatalogMovie { id: 10, ..Default::default() },
                CatalogMovie { id: 11, ..Default::default() },
            ])
        });
        catalog.expect_top_rated_movies().returning(|| {
            Ok(vec![CatalogMovie { id: 12, ..Default::default() }])
        });
        catalog.expect_movie_credits().returning(|movie_id| {
            let (id, name) = match movie_id {
                10 | 11 => (7467, "David Fincher"),
                _ => (4762, "Hayao Miyazaki"),
            };
            Ok(serde_json::from_value(serde_json::json!({
                "crew": [{ "id": id, "name": name, "job": "Director", "department": "Directing" }]
            }))
            .unwrap())
        });

        let discovery = DirectorDiscovery::new(Arc::new(catalog), None);
        let found = discovery
            .discover(DiscoveryStrategy::CrewMining, 2, false)
            .await;

        let ids: Vec<i64> = found.iter().map(|d| d.candidate.id).collect();
        assert_eq!(ids, vec![7467, 4762]);
    }

    #[tokio::test]
    async fn test_latin_american_quota_swaps_last_candidate() {
        let mut catalog = MockCatalogApi::new();
        catalog.expect_search_people().returning(|query| {
            Ok(vec![match query {
                "Wes Anderson" => person(5655, "Wes Anderson", "Directing"),
                _ => person(138, "Quentin Tarantino", "Directing"),
            }])
        });
        catalog
            .expect_trending_people()
            .returning(|_| Ok(vec![person(11218, "Alfonso Cuarón", "Directing")]));
        catalog.expect_popular_people().returning(|_| Ok(vec![]));
        catalog.expect_person_details().returning(|id| {
            let place = match id {
                11218 => "Mexico City, Distrito Federal, Mexico",
                5655 => "Houston, Texas, USA",
                _ => "Knoxville, Tennessee, USA",
            };
            Ok(PersonDetails {
                id,
                place_of_birth: Some(place.to_string()),
                ..Default::default()
            })
        });

        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("Wes Anderson, Quentin Tarantino".to_string()));

        let discovery = DirectorDiscovery::new(Arc::new(catalog), Some(Arc::new(generator)));
        let found = discovery
            .discover(DiscoveryStrategy::Generative, 2, true)
            .await;

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].candidate.id, 5655);
        assert_eq!(found[1].candidate.id, 11218);
        assert_eq!(found[1].candidate.country.as_deref(), Some("Mexico"));
    }
}
