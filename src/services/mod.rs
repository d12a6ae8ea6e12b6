pub mod auth;
pub mod catalog;
pub mod directors;
pub mod generative;
pub mod movie_search;
pub mod recommendations;

pub use auth::AuthService;
pub use catalog::{CatalogApi, CatalogError, TmdbClient};
pub use generative::{GeminiClient, TextGenerator};
pub use recommendations::{DailyCache, RecommendationEngine, RecommendationSettings};
