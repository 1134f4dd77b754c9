use async_trait::async_trait;
use marquee_model::{ListType, PersonId, ProviderMovieId};

use crate::error::Result;
use crate::providers::records::{
    GenreRecord, MovieDetail, MoviePage, PersonDetails,
};

/// The provider calls the sync engine depends on.
///
/// Lookups of a single record return `Ok(None)` when the provider has no
/// such record.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn movie_list_page(
        &self,
        list_type: ListType,
        page: u32,
    ) -> Result<MoviePage>;

    async fn movie_details(
        &self,
        id: ProviderMovieId,
    ) -> Result<Option<MovieDetail>>;

    async fn person_details(
        &self,
        id: PersonId,
    ) -> Result<Option<PersonDetails>>;

    async fn movie_genres(&self) -> Result<Vec<GenreRecord>>;

    async fn account_movie_list(
        &self,
        account_id: i64,
        list_name: &str,
        session_id: &str,
        page: u32,
    ) -> Result<MoviePage>;
}
