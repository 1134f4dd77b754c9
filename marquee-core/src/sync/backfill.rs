use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::database::{CatalogStore, CatalogTransaction};
use crate::error::Result;
use crate::providers::MetadataSource;
use crate::sync::CatalogSync;
use crate::sync::details::apply_detail;
use crate::sync::outcome::{BatchReport, ItemOutcome};

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    /// Imports mapped movies that have no local row yet, up to `max_items`,
    /// in chunks of `batch_size` (0 uses the configured default). Each
    /// chunk is one transaction.
    ///
    /// Provider failures are counted per item and the chunk carries on; a
    /// store failure aborts the run and discards the open chunk.
    pub async fn backfill_missing(
        &self,
        max_items: usize,
        batch_size: usize,
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        if max_items == 0 {
            return Ok(report);
        }

        let batch_size =
            Self::batch_size_or(batch_size, self.settings.backfill_batch_size);
        let gaps = self.store.unimported_mappings(max_items).await?;
        info!(gaps = gaps.len(), batch_size, "gap backfill started");

        'chunks: for chunk in gaps.chunks(batch_size) {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let mut tx = self.store.begin().await?;
            let now = Utc::now();

            for mapping in chunk {
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    tx.commit().await?;
                    break 'chunks;
                }

                let Some(provider_id) = mapping.provider_id else {
                    report.record(mapping.source_id.0, ItemOutcome::Skipped);
                    continue;
                };

                let fetched = self.source.movie_details(provider_id).await;
                let outcome = match fetched {
                    Ok(Some(detail)) => {
                        let existing = tx.movie(mapping.source_id).await?;
                        apply_detail(
                            &mut tx,
                            existing.as_ref(),
                            mapping.source_id,
                            provider_id,
                            &detail,
                            &self.settings.accepted_video_site,
                            now,
                        )
                        .await?;
                        ItemOutcome::Synced
                    }
                    Ok(None) => {
                        debug!(
                            source_id = %mapping.source_id,
                            provider_id = %provider_id,
                            "provider has no record for mapped movie"
                        );
                        ItemOutcome::Skipped
                    }
                    Err(err) => {
                        warn!(
                            source_id = %mapping.source_id,
                            provider_id = %provider_id,
                            error = %err,
                            "backfill fetch failed"
                        );
                        ItemOutcome::Failed(err.to_string())
                    }
                };
                report.record(mapping.source_id.0, outcome);
            }

            tx.commit().await?;
            info!(
                imported = report.imported(),
                failed = report.failed,
                last_id = report.last_id,
                "backfill chunk committed"
            );
        }

        info!(
            imported = report.imported(),
            skipped = report.skipped,
            failed = report.failed,
            cancelled = report.cancelled,
            "gap backfill finished"
        );
        Ok(report)
    }
}
