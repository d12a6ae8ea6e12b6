use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Catalog API Types
// ============================================================================

/// Paged list envelope used by search, trending and popular endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Movie (or tv) entry as returned by search, popular and credit endpoints
///
/// Movie payloads carry `title`/`release_date`, tv payloads carry
/// `name`/`first_air_date`. Filmography entries additionally carry the
/// person's `job` and `department` on that title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogMovie {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl CatalogMovie {
    /// Display title across movie and tv shapes
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }

    /// Release date across movie and tv shapes
    pub fn any_release_date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }

    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// True when this filmography entry is a directing credit
    pub fn is_directing_credit(&self) -> bool {
        let job = self.job.as_deref().unwrap_or_default();
        let department = self.department.as_deref().unwrap_or_default();
        job.eq_ignore_ascii_case("director") && department.eq_ignore_ascii_case("directing")
    }
}

/// Person entry as returned by search, trending and popular endpoints
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CatalogPerson {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub known_for: Vec<CatalogMovie>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl CatalogPerson {
    /// Department match is case-insensitive; the catalog reports "Directing"
    pub fn is_director(&self) -> bool {
        self.known_for_department
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case("directing"))
    }
}

/// Crew member on a movie's credit list
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CrewMember {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl CrewMember {
    pub fn is_director(&self) -> bool {
        self.job
            .as_deref()
            .is_some_and(|j| j.eq_ignore_ascii_case("director"))
    }
}

/// Response from /movie/{id}/credits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieCredits {
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl MovieCredits {
    /// First crew member credited as director
    pub fn director(&self) -> Option<&CrewMember> {
        self.crew.iter().find(|member| member.is_director())
    }

    /// True when the given person holds a director credit
    pub fn directed_by(&self, person_id: i64) -> bool {
        self.crew
            .iter()
            .any(|member| member.id == person_id && member.is_director())
    }
}

/// Response from /person/{id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonDetails {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Response from /person/{id}/images
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonImages {
    #[serde(default)]
    pub profiles: Vec<ProfileImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImage {
    pub file_path: String,
}

/// Response from /person/{id}/movie_credits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonMovieCredits {
    #[serde(default)]
    pub crew: Vec<CatalogMovie>,
}

/// Response from /movie/{id}/watch/providers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProvidersResponse {
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

/// Streaming availability for one region
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<WatchProvider>,
    #[serde(default)]
    pub rent: Vec<WatchProvider>,
    #[serde(default)]
    pub buy: Vec<WatchProvider>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProvider {
    pub provider_id: i64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: Option<i64>,
}

// ============================================================================
// Client-facing catalog payloads
// ============================================================================

/// Minimal director reference attached to search results and filmographies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectorRef {
    pub id: i64,
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

/// Director profile resolved from a free-text name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectorProfile {
    pub id: i64,
    pub name: String,
    pub country: Option<String>,
    pub place_of_birth: Option<String>,
    pub profile_url: Option<String>,
}

/// Catalog search hit enriched with runtime and director
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedMovie {
    #[serde(flatten)]
    pub movie: CatalogMovie,
    pub runtime: Option<i64>,
    pub director: Option<DirectorRef>,
}
