use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use marquee_model::{
    CastCredit, CatalogMovie, ExternalIdMapping, Genre, GenreId, ListMembership,
    ListType, MovieGenreLink, Person, PersonId, ProviderMovieId, SourceId,
    Video,
};

use crate::database::ports::{CatalogStore, CatalogTransaction, MovieRelations};
use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Default)]
struct CatalogState {
    movies: BTreeMap<SourceId, CatalogMovie>,
    mappings: BTreeMap<SourceId, ExternalIdMapping>,
    people: BTreeMap<PersonId, Person>,
    genres: BTreeMap<GenreId, Genre>,
    genre_links: BTreeSet<MovieGenreLink>,
    cast: Vec<CastCredit>,
    videos: Vec<Video>,
    memberships: BTreeMap<(SourceId, ListType), ListMembership>,
}

/// Process-local catalog store.
///
/// A transaction works on a snapshot taken at `begin` and publishes it
/// wholesale on commit, so uncommitted writes are never visible and
/// concurrent transactions resolve last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<Mutex<CatalogState>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next commit fail with a store error. Used to exercise
    /// propagation paths.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn mapping_count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.mappings.len())
    }

    pub fn people_count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.people.len())
    }
}

fn lock(state: &Mutex<CatalogState>) -> Result<MutexGuard<'_, CatalogState>> {
    state
        .lock()
        .map_err(|_| {
            SyncError::Store("in-memory catalog lock poisoned".to_string())
        })
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> Result<Self::Tx> {
        let working = lock(&self.state)?.clone();
        Ok(InMemoryTransaction {
            shared: Arc::clone(&self.state),
            fail_commit: Arc::clone(&self.fail_next_commit),
            working,
        })
    }

    async fn movie(&self, id: SourceId) -> Result<Option<CatalogMovie>> {
        Ok(lock(&self.state)?.movies.get(&id).cloned())
    }

    async fn person(&self, id: PersonId) -> Result<Option<Person>> {
        Ok(lock(&self.state)?.people.get(&id).cloned())
    }

    async fn genre(&self, id: GenreId) -> Result<Option<Genre>> {
        Ok(lock(&self.state)?.genres.get(&id).cloned())
    }

    async fn relations(&self, movie: SourceId) -> Result<MovieRelations> {
        let state = lock(&self.state)?;

        let genre_ids = state
            .genre_links
            .iter()
            .filter(|link| link.movie_id == movie)
            .map(|link| link.genre_id)
            .collect();

        let mut cast: Vec<CastCredit> = state
            .cast
            .iter()
            .filter(|credit| credit.movie_id == movie)
            .cloned()
            .collect();
        cast.sort_by_key(|credit| (credit.rank, credit.person_id));

        let videos = state
            .videos
            .iter()
            .filter(|video| video.movie_id == movie)
            .cloned()
            .collect();

        let list_memberships = state
            .memberships
            .values()
            .filter(|membership| membership.movie_id == movie)
            .cloned()
            .collect();

        Ok(MovieRelations {
            genre_ids,
            cast,
            videos,
            list_memberships,
        })
    }

    async fn movies_with_provider_id(
        &self,
        start_after: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<SourceId>> {
        let state = lock(&self.state)?;
        let mapped = |id: &SourceId| {
            state
                .mappings
                .get(id)
                .is_some_and(|mapping| mapping.provider_id.is_some())
        };
        Ok(state
            .movies
            .values()
            .filter(|movie| {
                movie.provider_id.is_some() || mapped(&movie.source_id)
            })
            .filter(|movie| {
                start_after.is_none_or(|cursor| movie.source_id > cursor)
            })
            .take(limit)
            .map(|movie| movie.source_id)
            .collect())
    }

    async fn mappings_with_provider_id(
        &self,
        start_after: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<ExternalIdMapping>> {
        let state = lock(&self.state)?;
        Ok(state
            .mappings
            .values()
            .filter(|mapping| mapping.provider_id.is_some())
            .filter(|mapping| {
                start_after.is_none_or(|cursor| mapping.source_id > cursor)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn unimported_mappings(
        &self,
        limit: usize,
    ) -> Result<Vec<ExternalIdMapping>> {
        let state = lock(&self.state)?;
        Ok(state
            .mappings
            .values()
            .filter(|mapping| mapping.provider_id.is_some())
            .filter(|mapping| !state.movies.contains_key(&mapping.source_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn people_needing_enrichment(
        &self,
        limit: usize,
    ) -> Result<Vec<PersonId>> {
        let state = lock(&self.state)?;
        Ok(state
            .people
            .values()
            .filter(|person| person.needs_enrichment())
            .take(limit)
            .map(|person| person.id)
            .collect())
    }

    async fn list_members(
        &self,
        list_type: ListType,
    ) -> Result<Vec<ListMembership>> {
        let state = lock(&self.state)?;
        let mut members: Vec<ListMembership> = state
            .memberships
            .values()
            .filter(|membership| membership.list_type == list_type)
            .cloned()
            .collect();
        members.sort_by_key(|member| (member.page, member.position));
        Ok(members)
    }

    async fn count_movies(&self) -> Result<u64> {
        Ok(lock(&self.state)?.movies.len() as u64)
    }
}

#[derive(Debug)]
pub struct InMemoryTransaction {
    shared: Arc<Mutex<CatalogState>>,
    fail_commit: Arc<AtomicBool>,
    working: CatalogState,
}

#[async_trait]
impl CatalogTransaction for InMemoryTransaction {
    async fn movie(&mut self, id: SourceId) -> Result<Option<CatalogMovie>> {
        Ok(self.working.movies.get(&id).cloned())
    }

    async fn movie_by_provider_id(
        &mut self,
        id: ProviderMovieId,
    ) -> Result<Option<CatalogMovie>> {
        Ok(self
            .working
            .movies
            .values()
            .find(|movie| movie.provider_id == Some(id))
            .cloned())
    }

    async fn save_movie(&mut self, movie: &CatalogMovie) -> Result<()> {
        self.working.movies.insert(movie.source_id, movie.clone());
        Ok(())
    }

    async fn mapping(
        &mut self,
        id: SourceId,
    ) -> Result<Option<ExternalIdMapping>> {
        Ok(self.working.mappings.get(&id).cloned())
    }

    async fn mapping_by_provider_id(
        &mut self,
        id: ProviderMovieId,
    ) -> Result<Option<ExternalIdMapping>> {
        Ok(self
            .working
            .mappings
            .values()
            .find(|mapping| mapping.provider_id == Some(id))
            .cloned())
    }

    async fn save_mapping(
        &mut self,
        mapping: &ExternalIdMapping,
    ) -> Result<()> {
        self.working
            .mappings
            .insert(mapping.source_id, mapping.clone());
        Ok(())
    }

    async fn person(&mut self, id: PersonId) -> Result<Option<Person>> {
        Ok(self.working.people.get(&id).cloned())
    }

    async fn save_person(&mut self, person: &Person) -> Result<()> {
        self.working.people.insert(person.id, person.clone());
        Ok(())
    }

    async fn save_genre(&mut self, genre: &Genre) -> Result<()> {
        self.working.genres.insert(genre.id, genre.clone());
        Ok(())
    }

    async fn delete_genre_links(&mut self, movie: SourceId) -> Result<u64> {
        let before = self.working.genre_links.len();
        self.working.genre_links.retain(|link| link.movie_id != movie);
        Ok((before - self.working.genre_links.len()) as u64)
    }

    async fn insert_genre_links(
        &mut self,
        links: &[MovieGenreLink],
    ) -> Result<()> {
        self.working.genre_links.extend(links.iter().copied());
        Ok(())
    }

    async fn delete_cast(&mut self, movie: SourceId) -> Result<u64> {
        let before = self.working.cast.len();
        self.working.cast.retain(|credit| credit.movie_id != movie);
        Ok((before - self.working.cast.len()) as u64)
    }

    async fn insert_cast(&mut self, credits: &[CastCredit]) -> Result<()> {
        for credit in credits {
            let exists = self.working.cast.iter().any(|existing| {
                existing.movie_id == credit.movie_id
                    && existing.person_id == credit.person_id
                    && existing.rank == credit.rank
            });
            if !exists {
                self.working.cast.push(credit.clone());
            }
        }
        Ok(())
    }

    async fn delete_videos(&mut self, movie: SourceId) -> Result<u64> {
        let before = self.working.videos.len();
        self.working.videos.retain(|video| video.movie_id != movie);
        Ok((before - self.working.videos.len()) as u64)
    }

    async fn insert_videos(&mut self, videos: &[Video]) -> Result<()> {
        self.working.videos.extend(videos.iter().cloned());
        Ok(())
    }

    async fn save_list_membership(
        &mut self,
        membership: &ListMembership,
    ) -> Result<()> {
        self.working.memberships.insert(
            (membership.movie_id, membership.list_type),
            membership.clone(),
        );
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            return Err(SyncError::Store("commit rejected".to_string()));
        }
        *lock(&self.shared)? = self.working;
        Ok(())
    }
}
