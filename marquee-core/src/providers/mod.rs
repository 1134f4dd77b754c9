pub mod gateway;
pub mod records;
pub mod source;
pub mod tmdb;

pub use gateway::{FetchGateway, ProviderSettings};
pub use records::{
    CastRecord, Credits, GenreList, GenreRecord, MovieDetail, MoviePage,
    MovieSummary, PersonDetails, VideoList, VideoRecord,
};
pub use source::MetadataSource;
pub use tmdb::TmdbClient;
