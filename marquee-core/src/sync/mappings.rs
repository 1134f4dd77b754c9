use chrono::Utc;
use marquee_model::SourceId;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::database::{CatalogStore, CatalogTransaction};
use crate::error::Result;
use crate::providers::MetadataSource;
use crate::sync::CatalogSync;
use crate::sync::merge::merge_movie;
use crate::sync::outcome::{BatchReport, ItemOutcome};

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    /// Scalar-only import driven by the mapping table: every mapped movie
    /// after `start_after` (up to `max_items`) gets its fields merged from
    /// the provider's detail record, creating the row when missing.
    /// Relations are left alone. Commits every `batch_size` rows and once
    /// at the end.
    pub async fn import_from_mappings(
        &self,
        start_after: Option<SourceId>,
        max_items: usize,
        batch_size: usize,
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        if max_items == 0 {
            return Ok(report);
        }

        let batch_size =
            Self::batch_size_or(batch_size, self.settings.bulk_batch_size);
        let mappings = self
            .store
            .mappings_with_provider_id(start_after, max_items)
            .await?;
        info!(rows = mappings.len(), batch_size, "mapping import started");

        let mut tx = self.store.begin().await?;
        let mut pending = 0;

        for mapping in mappings {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let Some(provider_id) = mapping.provider_id else {
                continue;
            };

            let outcome = match self.source.movie_details(provider_id).await {
                Ok(Some(detail)) => {
                    let existing = tx.movie(mapping.source_id).await?;
                    let summary = detail.to_summary_keyed(mapping.source_id.0);
                    let mut movie = merge_movie(
                        existing.as_ref(),
                        mapping.source_id,
                        &summary,
                        Utc::now(),
                    );
                    movie.provider_id = Some(provider_id);
                    tx.save_movie(&movie).await?;
                    ItemOutcome::Synced
                }
                Ok(None) => {
                    debug!(
                        source_id = %mapping.source_id,
                        "no provider record, skipping"
                    );
                    ItemOutcome::Skipped
                }
                Err(err) => {
                    warn!(
                        source_id = %mapping.source_id,
                        error = %err,
                        "mapping import fetch failed"
                    );
                    ItemOutcome::Failed(err.to_string())
                }
            };
            report.record(mapping.source_id.0, outcome);

            pending += 1;
            if pending == batch_size {
                tx.commit().await?;
                tx = self.store.begin().await?;
                pending = 0;
                info!(
                    synced = report.synced,
                    last_id = report.last_id,
                    "mapping import checkpoint"
                );
            }
        }

        tx.commit().await?;
        info!(
            synced = report.synced,
            skipped = report.skipped,
            failed = report.failed,
            cancelled = report.cancelled,
            "mapping import finished"
        );
        Ok(report)
    }
}
