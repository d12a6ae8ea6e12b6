pub mod catalog;
pub mod festival;
pub mod movie;
pub mod playlist;
pub mod rating;
pub mod recommendation;
pub mod user;

pub use catalog::{
    CatalogMovie, CatalogPerson, CrewMember, DirectorProfile, DirectorRef, EnrichedMovie,
    MovieCredits, PagedResults, PersonDetails, PersonImages, PersonMovieCredits, RegionProviders,
    WatchProvidersResponse,
};
pub use festival::{Festival, FestivalDetail, FestivalPlaylist, FestivalStatus, NewFestival};
pub use movie::{
    Movie, MovieRatingEntry, MovieSummary, NewMovie, PlaylistMovie, TopRatedMovie,
};
pub use playlist::{
    NewPlaylist, Playlist, PlaylistDetail, PlaylistSummary, ScheduledPlaylist, WithDirector,
};
pub use rating::{Rating, UserRatingEntry};
pub use recommendation::{
    DirectorCandidate, MovieRecord, Recommendation, RecommendationsResponse,
};
pub use user::{NewUser, User, UserCredentials, UserSummary, UserUpdate};
