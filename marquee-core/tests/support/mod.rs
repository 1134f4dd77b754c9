//! Shared fixtures for core integration tests: a scripted provider and
//! seeding helpers for the in-memory store.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use marquee_core::providers::records::{
    CastRecord, Credits, GenreRecord, MovieDetail, MoviePage, MovieSummary,
    PersonDetails, VideoList, VideoRecord,
};
use marquee_core::{
    CatalogStore, CatalogSync, CatalogTransaction, InMemoryCatalogStore,
    MetadataSource, Result, SyncError, SyncSettings,
};
use marquee_model::{
    CatalogMovie, ExternalIdMapping, ListType, Person, PersonId,
    ProviderMovieId, SourceId,
};
use rust_decimal::Decimal;

/// Provider stand-in with canned responses. Unknown ids behave like a 404.
#[derive(Debug, Default)]
pub struct FakeSource {
    pages: Mutex<HashMap<(ListType, u32), MoviePage>>,
    details: Mutex<HashMap<i64, MovieDetail>>,
    failing_details: Mutex<HashSet<i64>>,
    people: Mutex<HashMap<i64, PersonDetails>>,
    genres: Mutex<Vec<GenreRecord>>,
    account_pages: Mutex<Vec<MoviePage>>,
    calls: Mutex<Vec<String>>,
}

fn provider_failure(path: String) -> SyncError {
    SyncError::Provider {
        url: path,
        status: 500,
        body: "upstream exploded".to_string(),
    }
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(
        &self,
        list_type: ListType,
        page: u32,
        total_pages: u32,
        ids: &[i64],
    ) {
        let results = ids.iter().map(|id| summary(*id)).collect();
        self.pages.lock().unwrap().insert(
            (list_type, page),
            MoviePage {
                page,
                total_results: ids.len() as u64,
                total_pages,
                results,
            },
        );
    }

    pub fn with_page_records(
        &self,
        list_type: ListType,
        page: u32,
        results: Vec<MovieSummary>,
    ) {
        self.pages.lock().unwrap().insert(
            (list_type, page),
            MoviePage {
                page,
                total_results: results.len() as u64,
                total_pages: page,
                results,
            },
        );
    }

    pub fn with_detail(&self, detail: MovieDetail) {
        self.details
            .lock()
            .unwrap()
            .insert(detail.summary.id, detail);
    }

    pub fn fail_detail(&self, provider_id: i64) {
        self.failing_details.lock().unwrap().insert(provider_id);
    }

    pub fn with_person(&self, person: PersonDetails) {
        self.people.lock().unwrap().insert(person.id, person);
    }

    pub fn with_genres(&self, genres: Vec<GenreRecord>) {
        *self.genres.lock().unwrap() = genres;
    }

    pub fn with_account_page(&self, page: MoviePage) {
        self.account_pages.lock().unwrap().push(page);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn movie_list_page(
        &self,
        list_type: ListType,
        page: u32,
    ) -> Result<MoviePage> {
        let path = format!("/movie/{list_type}?page={page}");
        self.log(path.clone());
        self.pages
            .lock()
            .unwrap()
            .get(&(list_type, page))
            .cloned()
            .ok_or(SyncError::ProviderNotFound { url: path })
    }

    async fn movie_details(
        &self,
        id: ProviderMovieId,
    ) -> Result<Option<MovieDetail>> {
        let path = format!("/movie/{id}");
        self.log(path.clone());
        if self.failing_details.lock().unwrap().contains(&id.0) {
            return Err(provider_failure(path));
        }
        Ok(self.details.lock().unwrap().get(&id.0).cloned())
    }

    async fn person_details(
        &self,
        id: PersonId,
    ) -> Result<Option<PersonDetails>> {
        self.log(format!("/person/{id}"));
        Ok(self.people.lock().unwrap().get(&id.0).cloned())
    }

    async fn movie_genres(&self) -> Result<Vec<GenreRecord>> {
        self.log("/genre/movie/list".to_string());
        Ok(self.genres.lock().unwrap().clone())
    }

    async fn account_movie_list(
        &self,
        account_id: i64,
        list_name: &str,
        session_id: &str,
        page: u32,
    ) -> Result<MoviePage> {
        self.log(format!(
            "/account/{account_id}/{list_name}\
             ?session_id={session_id}&page={page}"
        ));
        Ok(self
            .account_pages
            .lock()
            .unwrap()
            .iter()
            .find(|candidate| candidate.page == page)
            .cloned()
            .unwrap_or_default())
    }
}

pub type TestSync = CatalogSync<InMemoryCatalogStore, FakeSource>;

pub fn harness() -> (TestSync, Arc<InMemoryCatalogStore>, Arc<FakeSource>) {
    let store = Arc::new(InMemoryCatalogStore::new());
    let source = Arc::new(FakeSource::new());
    let sync = CatalogSync::new(
        Arc::clone(&store),
        Arc::clone(&source),
        SyncSettings::default(),
    );
    (sync, store, source)
}

pub fn summary(id: i64) -> MovieSummary {
    MovieSummary {
        id,
        title: Some(format!("Movie {id}")),
        original_language: Some("en".to_string()),
        popularity: Some(10.0),
        vote_average: Some(7.5),
        vote_count: Some(100),
        release_date: Some("2020-02-02".to_string()),
        genre_ids: Some(vec![28, 12]),
        ..MovieSummary::default()
    }
}

pub fn cast_member(person_id: i64, order: i32) -> CastRecord {
    CastRecord {
        id: person_id,
        name: Some(format!("Actor {person_id}")),
        character: Some(format!("Role {order}")),
        order,
        profile_path: Some(format!("/actor{person_id}.jpg")),
    }
}

pub fn video(key: &str, site: &str) -> VideoRecord {
    VideoRecord {
        key: Some(key.to_string()),
        site: Some(site.to_string()),
        video_type: Some("Trailer".to_string()),
        name: Some(format!("{key} trailer")),
    }
}

/// A detail payload with two genres, three cast members and one accepted
/// plus one rejected video.
pub fn detail(provider_id: i64) -> MovieDetail {
    MovieDetail {
        summary: MovieSummary {
            runtime: Some(120),
            genre_ids: None,
            ..summary(provider_id)
        },
        genres: Some(vec![
            GenreRecord {
                id: 18,
                name: Some("Drama".to_string()),
            },
            GenreRecord {
                id: 53,
                name: Some("Thriller".to_string()),
            },
        ]),
        videos: Some(VideoList {
            results: vec![video("yt1", "YouTube"), video("vm1", "Vimeo")],
        }),
        credits: Some(Credits {
            cast: vec![
                cast_member(900, 2),
                cast_member(901, 0),
                cast_member(902, 1),
            ],
        }),
    }
}

pub fn stored_movie(source_id: i64, provider_id: Option<i64>) -> CatalogMovie {
    let now = Utc::now();
    CatalogMovie {
        source_id: SourceId(source_id),
        provider_id: provider_id.map(ProviderMovieId),
        title: format!("Seeded {source_id}"),
        overview: None,
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        popularity: 0.0,
        vote_average: Decimal::ZERO,
        vote_count: 0,
        original_language: "en".to_string(),
        runtime: None,
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed_movies(
    store: &InMemoryCatalogStore,
    movies: &[CatalogMovie],
) {
    let mut tx = store.begin().await.expect("begin");
    for movie in movies {
        tx.save_movie(movie).await.expect("seed movie");
    }
    tx.commit().await.expect("commit seed");
}

pub async fn seed_mappings(
    store: &InMemoryCatalogStore,
    mappings: &[(i64, Option<i64>)],
) {
    let mut tx = store.begin().await.expect("begin");
    for (source_id, provider_id) in mappings {
        tx.save_mapping(&ExternalIdMapping {
            source_id: SourceId(*source_id),
            provider_id: provider_id.map(ProviderMovieId),
            secondary_id: None,
        })
        .await
        .expect("seed mapping");
    }
    tx.commit().await.expect("commit seed");
}

pub async fn seed_people(store: &InMemoryCatalogStore, people: &[Person]) {
    let mut tx = store.begin().await.expect("begin");
    for person in people {
        tx.save_person(person).await.expect("seed person");
    }
    tx.commit().await.expect("commit seed");
}
