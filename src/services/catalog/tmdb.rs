/// TMDB catalog client
///
/// Auth is resolved once at startup: a v4 access token is sent as a bearer
/// header, otherwise the v3 API key rides along as the `api_key` query parameter.
/// Every call asks for JSON and, where TMDB supports it, English metadata.
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    config::Config,
    models::{
        CatalogMovie, CatalogPerson, MovieCredits, PagedResults, PersonDetails, PersonImages,
        PersonMovieCredits, WatchProvidersResponse,
    },
    services::catalog::{CatalogApi, CatalogError, TrendingWindow},
};

const LANGUAGE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAuth {
    BearerToken(String),
    ApiKey(String),
}

impl CatalogAuth {
    /// Picks the bearer token when present, else the API key; blank values are ignored
    pub fn from_credentials(access_token: Option<&str>, api_key: Option<&str>) -> Option<Self> {
        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        non_blank(access_token)
            .map(CatalogAuth::BearerToken)
            .or_else(|| non_blank(api_key).map(CatalogAuth::ApiKey))
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_url: String,
    auth: CatalogAuth,
}

#[derive(Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

impl TmdbClient {
    pub fn new(api_url: impl Into<String>, auth: CatalogAuth) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Builds a client from configuration, failing when no credentials are set
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let auth = CatalogAuth::from_credentials(
            config.tmdb_access_token.as_deref(),
            config.tmdb_api_key.as_deref(),
        )
        .ok_or(CatalogError::NotConfigured)?;

        Ok(Self::new(config.tmdb_api_url.clone(), auth))
    }

    fn build_request(&self, path: &str, params: &[(&str, String)]) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        let mut request = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params);

        // Image listings filter by language, which would drop untagged profile photos
        if !path.ends_with("/images") {
            request = request.query(&[("language", LANGUAGE)]);
        }

        match &self.auth {
            CatalogAuth::BearerToken(token) => request.bearer_auth(token),
            CatalogAuth::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
        }
    }

    /// Performs a GET against the catalog and decodes the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        tracing::debug!(path = %path, "Catalog request");

        let response = self.build_request(path, params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<TmdbErrorBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Catalog API error")
                        .to_string()
                });
            tracing::warn!(path = %path, status = status.as_u16(), message = %message, "Catalog request rejected");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn get_results<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, CatalogError> {
        let page: PagedResults<T> = self.get_json(path, params).await?;
        Ok(page.results)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogMovie>, CatalogError> {
        self.get_results(
            "/search/movie",
            &[
                ("query", query.to_string()),
                ("include_adult", "false".to_string()),
            ],
        )
        .await
    }

    async fn search_people(&self, query: &str) -> Result<Vec<CatalogPerson>, CatalogError> {
        self.get_results(
            "/search/person",
            &[
                ("query", query.to_string()),
                ("include_adult", "false".to_string()),
            ],
        )
        .await
    }

    async fn movie_details(&self, movie_id: i64) -> Result<serde_json::Value, CatalogError> {
        self.get_json(&format!("/movie/{}", movie_id), &[]).await
    }

    async fn movie_credits(&self, movie_id: i64) -> Result<MovieCredits, CatalogError> {
        self.get_json(&format!("/movie/{}/credits", movie_id), &[])
            .await
    }

    async fn watch_providers(
        &self,
        movie_id: i64,
    ) -> Result<WatchProvidersResponse, CatalogError> {
        self.get_json(&format!("/movie/{}/watch/providers", movie_id), &[])
            .await
    }

    async fn person_details(&self, person_id: i64) -> Result<PersonDetails, CatalogError> {
        self.get_json(&format!("/person/{}", person_id), &[]).await
    }

    async fn person_images(&self, person_id: i64) -> Result<PersonImages, CatalogError> {
        self.get_json(&format!("/person/{}/images", person_id), &[])
            .await
    }

    async fn person_movie_credits(
        &self,
        person_id: i64,
    ) -> Result<PersonMovieCredits, CatalogError> {
        self.get_json(&format!("/person/{}/movie_credits", person_id), &[])
            .await
    }

    async fn popular_people(&self, page: u32) -> Result<Vec<CatalogPerson>, CatalogError> {
        self.get_results("/person/popular", &[("page", page.to_string())])
            .await
    }

    async fn trending_people(
        &self,
        window: TrendingWindow,
    ) -> Result<Vec<CatalogPerson>, CatalogError> {
        self.get_results(&format!("/trending/person/{}", window.as_str()), &[])
            .await
    }

    async fn popular_movies(&self) -> Result<Vec<CatalogMovie>, CatalogError> {
        self.get_results("/movie/popular", &[("page", "1".to_string())])
            .await
    }

    async fn top_rated_movies(&self) -> Result<Vec<CatalogMovie>, CatalogError> {
        self.get_results("/movie/top_rated", &[("page", "1".to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_pairs(request: &reqwest::Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_auth_prefers_bearer_token() {
        assert_eq!(
            CatalogAuth::from_credentials(Some("token"), Some("key")),
            Some(CatalogAuth::BearerToken("token".to_string()))
        );
        assert_eq!(
            CatalogAuth::from_credentials(Some("  "), Some("key")),
            Some(CatalogAuth::ApiKey("key".to_string()))
        );
        assert_eq!(CatalogAuth::from_credentials(None, Some("")), None);
    }

    #[test]
    fn test_bearer_request_shape() {
        let client = TmdbClient::new(
            "https://api.themoviedb.org/3/",
            CatalogAuth::BearerToken("abc".to_string()),
        );
        let request = client
            .build_request("/search/movie", &[("query", "Amores perros".to_string())])
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/3/search/movie");
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer abc"
        );
        assert_eq!(request.headers().get("accept").unwrap(), "application/json");

        let pairs = query_pairs(&request);
        assert!(pairs.contains(&("query".to_string(), "Amores perros".to_string())));
        assert!(pairs.contains(&("language".to_string(), "en-US".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "api_key"));
    }

    #[test]
    fn test_api_key_request_shape() {
        let client = TmdbClient::new(
            "https://api.themoviedb.org/3",
            CatalogAuth::ApiKey("secret".to_string()),
        );
        let request = client.build_request("/movie/603", &[]).build().unwrap();

        assert!(request.headers().get("authorization").is_none());
        let pairs = query_pairs(&request);
        assert!(pairs.contains(&("api_key".to_string(), "secret".to_string())));
    }

    #[test]
    fn test_image_requests_skip_language() {
        let client = TmdbClient::new(
            "https://api.themoviedb.org/3",
            CatalogAuth::BearerToken("abc".to_string()),
        );
        let request = client
            .build_request("/person/525/images", &[])
            .build()
            .unwrap();

        assert!(!query_pairs(&request).iter().any(|(k, _)| k == "language"));
    }
}
