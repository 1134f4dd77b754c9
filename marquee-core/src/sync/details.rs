use chrono::{DateTime, Utc};
use marquee_model::{CatalogMovie, Genre, ProviderMovieId, SourceId};
use tracing::{debug, info};

use crate::database::{CatalogStore, CatalogTransaction};
use crate::error::Result;
use crate::providers::MetadataSource;
use crate::providers::records::MovieDetail;
use crate::sync::CatalogSync;
use crate::sync::merge::merge_movie;
use crate::sync::reconcile::{RelationCounts, reconcile_relations};

/// What a single detail import did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    Updated(RelationCounts),
    /// No local movie row with that source id.
    Untracked,
    /// The provider has no record for the resolved provider id.
    MissingUpstream,
}

/// Provider id to query for a stored movie: the mapping row, then the
/// movie's own stamp, then the source id itself.
pub(crate) async fn resolve_provider_id<T: CatalogTransaction>(
    tx: &mut T,
    movie: &CatalogMovie,
) -> Result<ProviderMovieId> {
    let mapped = tx
        .mapping(movie.source_id)
        .await?
        .and_then(|mapping| mapping.provider_id);
    Ok(mapped.or(movie.provider_id).unwrap_or_else(|| {
        ProviderMovieId::assume_from_source(movie.source_id)
    }))
}

/// Folds a detail payload into the movie row keyed by `source_id` and
/// replaces its relations. Genre reference rows named by the payload are
/// upserted. The caller commits.
pub(crate) async fn apply_detail<T: CatalogTransaction>(
    tx: &mut T,
    existing: Option<&CatalogMovie>,
    source_id: SourceId,
    provider_id: ProviderMovieId,
    detail: &MovieDetail,
    accepted_site: &str,
    now: DateTime<Utc>,
) -> Result<RelationCounts> {
    let summary = detail.to_summary_keyed(source_id.0);
    let mut movie = merge_movie(existing, source_id, &summary, now);
    movie.provider_id = Some(provider_id);
    tx.save_movie(&movie).await?;

    for (id, name) in detail.named_genres() {
        tx.save_genre(&Genre {
            id,
            name: name.to_string(),
        })
        .await?;
    }

    reconcile_relations(
        tx,
        source_id,
        &detail.genre_ids(),
        detail.cast(),
        detail.videos(),
        accepted_site,
    )
    .await
}

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    /// Refreshes one tracked movie and all of its relations from the
    /// provider in a single transaction.
    pub async fn import_details(
        &self,
        source_id: SourceId,
    ) -> Result<DetailOutcome> {
        let mut tx = self.store.begin().await?;

        let Some(movie) = tx.movie(source_id).await? else {
            debug!(source_id = %source_id, "movie is not tracked locally");
            return Ok(DetailOutcome::Untracked);
        };

        let provider_id = resolve_provider_id(&mut tx, &movie).await?;
        let Some(detail) = self.source.movie_details(provider_id).await? else {
            debug!(
                source_id = %source_id,
                provider_id = %provider_id,
                "provider has no detail record"
            );
            return Ok(DetailOutcome::MissingUpstream);
        };

        let counts = apply_detail(
            &mut tx,
            Some(&movie),
            source_id,
            provider_id,
            &detail,
            &self.settings.accepted_video_site,
            Utc::now(),
        )
        .await?;
        tx.commit().await?;

        info!(
            source_id = %source_id,
            provider_id = %provider_id,
            genres = counts.genres,
            cast = counts.cast,
            videos = counts.videos,
            "movie details imported"
        );
        Ok(DetailOutcome::Updated(counts))
    }
}
