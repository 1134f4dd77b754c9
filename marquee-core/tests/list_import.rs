mod support;

use marquee_core::providers::records::MovieSummary;
use marquee_core::{CancellationToken, CatalogStore};
use marquee_model::{
    GenreId, ListMembership, ListType, ProviderMovieId, SourceId,
};

use support::{harness, seed_mappings, seed_movies, stored_movie};

fn membership(
    movie: i64,
    list_type: ListType,
    page: i32,
    position: i32,
) -> ListMembership {
    ListMembership {
        movie_id: SourceId(movie),
        list_type,
        page,
        position,
    }
}

#[tokio::test]
async fn popular_page_records_rank_and_position() {
    let (sync, store, source) = harness();
    source.with_page(ListType::Popular, 1, 1, &[10, 11]);

    let report = sync
        .import_list(ListType::Popular, 1, &CancellationToken::new())
        .await
        .expect("list import");
    assert_eq!(report.pages, 1);
    assert_eq!(report.records, 2);

    let members = store.list_members(ListType::Popular).await.unwrap();
    assert_eq!(
        members,
        vec![
            membership(10, ListType::Popular, 1, 0),
            membership(11, ListType::Popular, 1, 1),
        ]
    );

    let movie = store.movie(SourceId(10)).await.unwrap().expect("movie 10");
    assert_eq!(movie.provider_id, Some(ProviderMovieId(10)));
    let relations = store.relations(SourceId(10)).await.unwrap();
    assert_eq!(relations.genre_ids, vec![GenreId(12), GenreId(28)]);
}

#[tokio::test]
async fn resync_overwrites_membership_instead_of_duplicating() {
    let (sync, store, source) = harness();
    let cancel = CancellationToken::new();

    source.with_page(ListType::TopRated, 1, 1, &[10, 11]);
    sync.import_list(ListType::TopRated, 1, &cancel)
        .await
        .expect("first import");

    source.with_page(ListType::TopRated, 1, 1, &[11, 10]);
    sync.import_list(ListType::TopRated, 1, &cancel)
        .await
        .expect("second import");

    let members = store.list_members(ListType::TopRated).await.unwrap();
    assert_eq!(
        members,
        vec![
            membership(11, ListType::TopRated, 1, 0),
            membership(10, ListType::TopRated, 1, 1),
        ]
    );
}

#[tokio::test]
async fn one_movie_can_sit_on_several_lists() {
    let (sync, store, source) = harness();
    let cancel = CancellationToken::new();
    source.with_page(ListType::Popular, 1, 1, &[10]);
    source.with_page(ListType::Upcoming, 1, 1, &[10]);

    sync.import_list(ListType::Popular, 1, &cancel).await.unwrap();
    sync.import_list(ListType::Upcoming, 1, &cancel).await.unwrap();

    let relations = store.relations(SourceId(10)).await.unwrap();
    assert_eq!(relations.list_memberships.len(), 2);
}

#[tokio::test]
async fn list_entries_resolve_to_existing_source_ids() {
    let (sync, store, source) = harness();
    seed_movies(&store, &[stored_movie(1, Some(500))]).await;
    seed_mappings(&store, &[(2, Some(600))]).await;
    source.with_page(ListType::NowPlaying, 1, 1, &[500, 600, 700]);

    sync.import_list(ListType::NowPlaying, 1, &CancellationToken::new())
        .await
        .expect("list import");

    let members: Vec<SourceId> = store
        .list_members(ListType::NowPlaying)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.movie_id)
        .collect();
    assert_eq!(members, vec![SourceId(1), SourceId(2), SourceId(700)]);
    assert_eq!(store.movie(SourceId(500)).await.unwrap(), None);

    let mapped = store.movie(SourceId(2)).await.unwrap().expect("mapped movie");
    assert_eq!(mapped.provider_id, Some(ProviderMovieId(600)));
    assert_eq!(store.count_movies().await.unwrap(), 3);
}

#[tokio::test]
async fn list_merge_keeps_stored_fields_the_summary_lacks() {
    let (sync, store, source) = harness();
    let mut seeded = stored_movie(1, Some(500));
    seeded.runtime = Some(99);
    seeded.overview = Some("Kept".into());
    seed_movies(&store, &[seeded]).await;

    source.with_page_records(
        ListType::Popular,
        1,
        vec![MovieSummary {
            id: 500,
            title: Some(String::new()),
            ..MovieSummary::default()
        }],
    );
    sync.import_list(ListType::Popular, 1, &CancellationToken::new())
        .await
        .unwrap();

    let movie = store.movie(SourceId(1)).await.unwrap().unwrap();
    assert_eq!(movie.title, "Seeded 1");
    assert_eq!(movie.runtime, Some(99));
    assert_eq!(movie.overview.as_deref(), Some("Kept"));
}

#[tokio::test]
async fn zero_pages_is_a_no_op() {
    let (sync, store, source) = harness();
    let report = sync
        .import_list(ListType::Popular, 0, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages, 0);
    assert!(source.calls().is_empty());
    assert_eq!(store.count_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn stops_at_the_last_reported_page() {
    let (sync, _store, source) = harness();
    source.with_page(ListType::Popular, 1, 2, &[1]);
    source.with_page(ListType::Popular, 2, 2, &[2]);

    let report = sync
        .import_list(ListType::Popular, 5, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.pages, 2);
    assert_eq!(report.total_pages, Some(2));
    assert_eq!(source.calls_starting_with("/movie/popular"), 2);
}

#[tokio::test]
async fn page_fetch_failure_keeps_committed_pages() {
    let (sync, store, source) = harness();
    source.with_page(ListType::Popular, 1, 3, &[1, 2]);

    let err = sync
        .import_list(ListType::Popular, 3, &CancellationToken::new())
        .await
        .expect_err("page 2 is missing");
    assert!(err.is_not_found());
    assert_eq!(store.count_movies().await.unwrap(), 2);
}

#[tokio::test]
async fn cancelled_import_touches_nothing() {
    let (sync, store, source) = harness();
    source.with_page(ListType::Popular, 1, 1, &[10]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = sync.import_list(ListType::Popular, 1, &cancel).await.unwrap();
    assert!(report.cancelled);
    assert!(source.calls().is_empty());
    assert_eq!(store.count_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn provider_id_colliding_with_curated_source_id_is_left_out() {
    let (sync, store, source) = harness();
    seed_movies(&store, &[stored_movie(550, Some(12345))]).await;
    seed_mappings(&store, &[(550, Some(12345))]).await;
    source.with_page(ListType::Popular, 1, 1, &[550, 551]);

    let report = sync
        .import_list(ListType::Popular, 1, &CancellationToken::new())
        .await
        .expect("list import");
    assert_eq!(report.records, 1);
    assert_eq!(report.conflicts, 1);

    let curated = store.movie(SourceId(550)).await.unwrap().expect("curated");
    assert_eq!(curated.title, "Seeded 550");
    assert_eq!(curated.provider_id, Some(ProviderMovieId(12345)));

    let members = store.list_members(ListType::Popular).await.unwrap();
    assert_eq!(members, vec![membership(551, ListType::Popular, 1, 1)]);
}

#[tokio::test]
async fn mapping_to_another_provider_id_blocks_the_fallback() {
    let (sync, store, source) = harness();
    seed_mappings(&store, &[(42, Some(9000))]).await;
    source.with_page(ListType::Upcoming, 1, 1, &[42]);

    let report = sync
        .import_list(ListType::Upcoming, 1, &CancellationToken::new())
        .await
        .expect("list import");
    assert_eq!(report.conflicts, 1);
    assert_eq!(store.movie(SourceId(42)).await.unwrap(), None);
}

#[tokio::test]
async fn unstamped_row_with_same_id_is_adopted() {
    let (sync, store, source) = harness();
    seed_movies(&store, &[stored_movie(77, None)]).await;
    source.with_page(ListType::Popular, 1, 1, &[77]);

    let report = sync
        .import_list(ListType::Popular, 1, &CancellationToken::new())
        .await
        .expect("list import");
    assert_eq!(report.conflicts, 0);

    let movie = store.movie(SourceId(77)).await.unwrap().expect("movie");
    assert_eq!(movie.provider_id, Some(ProviderMovieId(77)));
}
