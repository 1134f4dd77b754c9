mod support;

use chrono::NaiveDate;
use marquee_core::providers::records::{GenreRecord, MoviePage, PersonDetails};
use marquee_core::{CancellationToken, CatalogStore, SyncError};
use marquee_model::{GenreId, Person, PersonId};

use support::{harness, seed_people, summary};

fn complete_person(id: i64) -> Person {
    Person {
        id: PersonId(id),
        name: format!("Person {id}"),
        biography: Some("Already known.".into()),
        birthday: NaiveDate::from_ymd_opt(1960, 6, 1),
        place_of_birth: Some("Lisbon".into()),
        profile_path: None,
    }
}

fn details(id: i64) -> PersonDetails {
    PersonDetails {
        id,
        name: Some(format!("Person {id}")),
        biography: Some(format!("Biography of {id}")),
        profile_path: Some(format!("/p{id}.jpg")),
        birthday: Some("1975-03-04".into()),
        place_of_birth: Some("Oslo".into()),
    }
}

#[tokio::test]
async fn enriched_person_is_returned_without_fetching() {
    let (sync, store, source) = harness();
    let person = complete_person(1);
    seed_people(&store, &[person.clone()]).await;
    source.with_person(details(1));

    let result = sync.enrich_person(PersonId(1)).await.unwrap();
    assert_eq!(result, Some(person));
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn partial_person_is_completed_and_saved() {
    let (sync, store, source) = harness();
    seed_people(&store, &[Person::new(PersonId(2), "Stored Name")]).await;
    source.with_person(details(2));

    let result = sync.enrich_person(PersonId(2)).await.unwrap().unwrap();
    assert!(!result.needs_enrichment());
    assert_eq!(result.name, "Person 2");
    assert_eq!(result.birthday, NaiveDate::from_ymd_opt(1975, 3, 4));
    assert_eq!(store.person(PersonId(2)).await.unwrap(), Some(result));
}

#[tokio::test]
async fn unknown_person_without_upstream_record_stays_absent() {
    let (sync, store, _source) = harness();
    assert_eq!(sync.enrich_person(PersonId(3)).await.unwrap(), None);
    assert_eq!(store.people_count().unwrap(), 0);
}

#[tokio::test]
async fn enrichment_batch_only_visits_incomplete_people() {
    let (sync, store, source) = harness();
    seed_people(
        &store,
        &[
            complete_person(1),
            Person::new(PersonId(2), "Two"),
            Person::new(PersonId(3), "Three"),
            Person::new(PersonId(4), "Four"),
        ],
    )
    .await;
    source.with_person(details(2));
    source.with_person(details(4));

    let report = sync
        .enrich_people(2, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.attempted(), 2);
    assert_eq!((report.synced, report.skipped), (1, 1));
    assert_eq!(
        source.calls(),
        vec!["/person/2".to_string(), "/person/3".to_string()]
    );
    let untouched = store.person(PersonId(4)).await.unwrap().unwrap();
    assert!(untouched.needs_enrichment());
}

#[tokio::test]
async fn genre_sync_upserts_named_genres() {
    let (sync, store, source) = harness();
    source.with_genres(vec![
        GenreRecord {
            id: 28,
            name: Some("Action".into()),
        },
        GenreRecord {
            id: 99,
            name: Some("  ".into()),
        },
        GenreRecord {
            id: 35,
            name: Some("Comedy".into()),
        },
    ]);

    assert_eq!(sync.sync_genres().await.unwrap(), 2);
    assert_eq!(store.genre(GenreId(28)).await.unwrap().unwrap().name, "Action");
    assert_eq!(store.genre(GenreId(99)).await.unwrap(), None);

    source.with_genres(vec![GenreRecord {
        id: 28,
        name: Some("Action & Adventure".into()),
    }]);
    sync.sync_genres().await.unwrap();
    assert_eq!(
        store.genre(GenreId(28)).await.unwrap().unwrap().name,
        "Action & Adventure"
    );
}

#[tokio::test]
async fn account_list_clamps_page_and_passes_session() {
    let (sync, store, source) = harness();
    source.with_account_page(MoviePage {
        page: 1,
        total_results: 1,
        total_pages: 1,
        results: vec![summary(603)],
    });

    let page = sync
        .account_list(42, "favorite/movies", "abc123", 0)
        .await
        .unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(
        source.calls(),
        vec!["/account/42/favorite/movies?session_id=abc123&page=1".to_string()]
    );
    assert_eq!(store.count_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn account_list_rejects_blank_arguments() {
    let (sync, _store, source) = harness();

    let err = sync.account_list(42, "  ", "abc", 1).await.unwrap_err();
    assert!(matches!(err, SyncError::InvalidArgument(_)));

    let err = sync
        .account_list(42, "watchlist/movies", "", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::InvalidArgument(_)));

    let err = sync
        .account_list(42, "watchlist?x=1", "abc", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::InvalidArgument(_)));

    assert!(source.calls().is_empty());
}
