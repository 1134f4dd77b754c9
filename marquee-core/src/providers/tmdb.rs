use async_trait::async_trait;
use marquee_model::{ListType, PersonId, ProviderMovieId};

use crate::error::Result;
use crate::providers::gateway::{FetchGateway, ProviderSettings};
use crate::providers::records::{
    GenreList, GenreRecord, MovieDetail, MoviePage, PersonDetails,
};
use crate::providers::source::MetadataSource;

/// [`MetadataSource`] backed by the TMDB v3 REST API.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    gateway: FetchGateway,
}

impl TmdbClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        Ok(Self {
            gateway: FetchGateway::new(settings)?,
        })
    }

    pub fn from_gateway(gateway: FetchGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &FetchGateway {
        &self.gateway
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    async fn movie_list_page(
        &self,
        list_type: ListType,
        page: u32,
    ) -> Result<MoviePage> {
        self.gateway
            .fetch(&format!("/movie/{}?page={page}", list_type.as_str()))
            .await
    }

    async fn movie_details(
        &self,
        id: ProviderMovieId,
    ) -> Result<Option<MovieDetail>> {
        let path = format!("/movie/{id}?append_to_response=videos,credits");
        self.gateway.try_fetch(&path).await
    }

    async fn person_details(
        &self,
        id: PersonId,
    ) -> Result<Option<PersonDetails>> {
        self.gateway.try_fetch(&format!("/person/{id}")).await
    }

    async fn movie_genres(&self) -> Result<Vec<GenreRecord>> {
        let list: GenreList = self.gateway.fetch("/genre/movie/list").await?;
        Ok(list.genres)
    }

    async fn account_movie_list(
        &self,
        account_id: i64,
        list_name: &str,
        session_id: &str,
        page: u32,
    ) -> Result<MoviePage> {
        let path = format!(
            "/account/{account_id}/{list_name}\
             ?session_id={session_id}&page={page}"
        );
        self.gateway.fetch(&path).await
    }
}
