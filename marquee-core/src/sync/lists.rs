use chrono::Utc;
use marquee_model::{ListMembership, ListType, ProviderMovieId, SourceId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::database::{CatalogStore, CatalogTransaction};
use crate::error::Result;
use crate::providers::MetadataSource;
use crate::sync::CatalogSync;
use crate::sync::merge::merge_movie;
use crate::sync::reconcile::replace_genre_links;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListImportReport {
    pub pages: u32,
    /// Entries upserted.
    pub records: usize,
    /// Entries left out because their provider id could not be given a
    /// source id without taking over another movie's row.
    pub conflicts: usize,
    /// Page count reported by the provider on the last fetched page.
    pub total_pages: Option<u32>,
    pub cancelled: bool,
}

/// Local key for a movie known by its provider id: a movie already stamped
/// with it, then a mapping row, then the provider id itself.
///
/// The last fallback is refused (`None`) when that source id already
/// belongs to a movie or mapping tied to a different provider id.
pub(crate) async fn resolve_source_id<T: CatalogTransaction>(
    tx: &mut T,
    provider_id: ProviderMovieId,
) -> Result<Option<SourceId>> {
    if let Some(movie) = tx.movie_by_provider_id(provider_id).await? {
        return Ok(Some(movie.source_id));
    }
    if let Some(mapping) = tx.mapping_by_provider_id(provider_id).await? {
        return Ok(Some(mapping.source_id));
    }

    let candidate = SourceId::from_provider(provider_id);
    let claimed_by = |stamp: Option<ProviderMovieId>| {
        stamp.filter(|other| *other != provider_id)
    };
    let movie_stamp = tx
        .movie(candidate)
        .await?
        .and_then(|movie| claimed_by(movie.provider_id));
    let mapped = tx
        .mapping(candidate)
        .await?
        .and_then(|mapping| claimed_by(mapping.provider_id));

    if let Some(other) = movie_stamp.or(mapped) {
        warn!(
            source_id = %candidate,
            provider_id = %provider_id,
            owner_provider_id = %other,
            "source id already belongs to another provider movie"
        );
        return Ok(None);
    }
    Ok(Some(candidate))
}

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    /// Walks pages `1..=page_count` of a ranked list, upserting every
    /// summary and recording its page and 0-based position. Each page is
    /// one transaction.
    pub async fn import_list(
        &self,
        list_type: ListType,
        page_count: u32,
        cancel: &CancellationToken,
    ) -> Result<ListImportReport> {
        let mut report = ListImportReport::default();

        for page in 1..=page_count {
            if cancel.is_cancelled() {
                info!(list = %list_type, page, "list import cancelled");
                report.cancelled = true;
                break;
            }

            let listing = self.source.movie_list_page(list_type, page).await?;
            let now = Utc::now();
            let mut tx = self.store.begin().await?;

            let mut upserted = 0;
            for (position, summary) in listing.results.iter().enumerate() {
                let provider_id = ProviderMovieId(summary.id);
                let Some(source_id) =
                    resolve_source_id(&mut tx, provider_id).await?
                else {
                    report.conflicts += 1;
                    continue;
                };
                let existing = tx.movie(source_id).await?;

                let mut movie =
                    merge_movie(existing.as_ref(), source_id, summary, now);
                movie.provider_id = Some(provider_id);
                tx.save_movie(&movie).await?;

                replace_genre_links(&mut tx, source_id, &summary.genre_ids())
                    .await?;
                tx.save_list_membership(&ListMembership {
                    movie_id: source_id,
                    list_type,
                    page: page as i32,
                    position: position as i32,
                })
                .await?;

                debug!(
                    list = %list_type,
                    page,
                    position,
                    source_id = %source_id,
                    provider_id = %provider_id,
                    "list entry upserted"
                );
                upserted += 1;
            }

            tx.commit().await?;
            report.pages += 1;
            report.records += upserted;
            report.total_pages = Some(listing.total_pages);

            info!(
                list = %list_type,
                page,
                records = upserted,
                total_pages = listing.total_pages,
                "list page imported"
            );

            if listing.total_pages > 0 && page >= listing.total_pages {
                break;
            }
        }

        Ok(report)
    }
}
