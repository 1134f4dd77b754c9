use async_trait::async_trait;
use marquee_model::{
    CastCredit, CatalogMovie, ExternalIdMapping, Genre, GenreId, ListMembership,
    ListType, MovieGenreLink, Person, PersonId, ProviderMovieId, SourceId,
    Video,
};

use crate::error::Result;

/// Dependent rows of one movie as currently stored.
///
/// Genre ids are ordered by id, cast by rank, videos by insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieRelations {
    pub genre_ids: Vec<GenreId>,
    pub cast: Vec<CastCredit>,
    pub videos: Vec<Video>,
    pub list_memberships: Vec<ListMembership>,
}

/// Repository port for the local catalog.
///
/// Reads outside a transaction serve cursor scans and verification; every
/// write goes through a [`CatalogTransaction`].
#[async_trait]
pub trait CatalogStore: Send + Sync {
    type Tx: CatalogTransaction;

    async fn begin(&self) -> Result<Self::Tx>;

    // Point reads
    async fn movie(&self, id: SourceId) -> Result<Option<CatalogMovie>>;
    async fn person(&self, id: PersonId) -> Result<Option<Person>>;
    async fn genre(&self, id: GenreId) -> Result<Option<Genre>>;
    async fn relations(&self, movie: SourceId) -> Result<MovieRelations>;

    // Cursor scans, ordered ascending by id
    /// Movies with a known provider id, either stamped on the row or
    /// through a mapping row, `source_id > start_after`.
    async fn movies_with_provider_id(
        &self,
        start_after: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<SourceId>>;
    /// Mapping rows with a provider id, `source_id > start_after`.
    async fn mappings_with_provider_id(
        &self,
        start_after: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<ExternalIdMapping>>;
    /// Mapping rows with a provider id whose source id has no movie row.
    async fn unimported_mappings(
        &self,
        limit: usize,
    ) -> Result<Vec<ExternalIdMapping>>;
    async fn people_needing_enrichment(
        &self,
        limit: usize,
    ) -> Result<Vec<PersonId>>;
    /// Members of a ranked list ordered by page, then position.
    async fn list_members(
        &self,
        list_type: ListType,
    ) -> Result<Vec<ListMembership>>;

    async fn count_movies(&self) -> Result<u64>;
}

/// A unit of work against the catalog. Dropping it without calling
/// [`commit`](CatalogTransaction::commit) discards every write.
#[async_trait]
pub trait CatalogTransaction: Send {
    async fn movie(&mut self, id: SourceId) -> Result<Option<CatalogMovie>>;
    /// Lowest source id among movies stamped with `id`.
    async fn movie_by_provider_id(
        &mut self,
        id: ProviderMovieId,
    ) -> Result<Option<CatalogMovie>>;
    async fn save_movie(&mut self, movie: &CatalogMovie) -> Result<()>;

    async fn mapping(
        &mut self,
        id: SourceId,
    ) -> Result<Option<ExternalIdMapping>>;
    /// Lowest source id among mapping rows pointing at `id`.
    async fn mapping_by_provider_id(
        &mut self,
        id: ProviderMovieId,
    ) -> Result<Option<ExternalIdMapping>>;
    async fn save_mapping(&mut self, mapping: &ExternalIdMapping) -> Result<()>;

    async fn person(&mut self, id: PersonId) -> Result<Option<Person>>;
    async fn save_person(&mut self, person: &Person) -> Result<()>;

    async fn save_genre(&mut self, genre: &Genre) -> Result<()>;

    async fn delete_genre_links(&mut self, movie: SourceId) -> Result<u64>;
    async fn insert_genre_links(
        &mut self,
        links: &[MovieGenreLink],
    ) -> Result<()>;

    async fn delete_cast(&mut self, movie: SourceId) -> Result<u64>;
    async fn insert_cast(&mut self, credits: &[CastCredit]) -> Result<()>;

    async fn delete_videos(&mut self, movie: SourceId) -> Result<u64>;
    async fn insert_videos(&mut self, videos: &[Video]) -> Result<()>;

    /// Inserts or overwrites the row for (movie, list type).
    async fn save_list_membership(
        &mut self,
        membership: &ListMembership,
    ) -> Result<()>;

    async fn commit(self) -> Result<()>;
}
