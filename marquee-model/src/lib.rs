//! Catalog data model definitions shared across Marquee crates.

pub mod error;
pub mod ids;
pub mod movie;
pub mod people;
pub mod relations;

pub use error::{ModelError, Result as ModelResult};
pub use ids::{GenreId, PersonId, ProviderMovieId, SourceId};
pub use movie::{
    CatalogMovie, UNKNOWN_LANGUAGE, UNKNOWN_TITLE, vote_average_from_f64,
};
pub use people::{CastCredit, Person, UNKNOWN_PERSON};
pub use relations::{
    ExternalIdMapping, Genre, ListMembership, ListType, MISSING_VIDEO_KEY,
    MovieGenreLink, UNKNOWN_VIDEO_NAME, UNKNOWN_VIDEO_SITE, UNKNOWN_VIDEO_TYPE,
    Video,
};
