use marquee_model::SourceId;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::database::CatalogStore;
use crate::error::Result;
use crate::providers::MetadataSource;
use crate::sync::CatalogSync;
use crate::sync::details::DetailOutcome;
use crate::sync::outcome::{BatchReport, ItemOutcome};

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    /// Runs the detail import over up to `max_items` movies with a known
    /// provider id (stamped or mapped), in source id order after
    /// `start_after`.
    ///
    /// Each movie commits on its own. Failures are counted and logged, never
    /// fatal. Every `batch_size` items a checkpoint with the resume cursor is
    /// logged; 0 uses the configured default.
    pub async fn run_bulk_details(
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
        let ids = self
            .store
            .movies_with_provider_id(start_after, max_items)
            .await?;
        info!(
            candidates = ids.len(),
            start_after = start_after.map(|id| id.0),
            batch_size,
            "bulk detail sync started"
        );

        for (index, source_id) in ids.into_iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                info!(last_id = report.last_id, "bulk detail sync cancelled");
                break;
            }

            let outcome = match self.import_details(source_id).await {
                Ok(DetailOutcome::Updated(_)) => ItemOutcome::Synced,
                Ok(
                    DetailOutcome::Untracked | DetailOutcome::MissingUpstream,
                ) => ItemOutcome::Skipped,
                Err(err) => {
                    warn!(
                        source_id = %source_id,
                        error = %err,
                        "detail import failed"
                    );
                    ItemOutcome::Failed(err.to_string())
                }
            };
            report.record(source_id.0, outcome);

            if (index + 1) % batch_size == 0 {
                info!(
                    processed = report.processed(),
                    failed = report.failed,
                    last_id = report.last_id,
                    "bulk detail checkpoint"
                );
            }
        }

        info!(
            synced = report.synced,
            skipped = report.skipped,
            failed = report.failed,
            last_id = report.last_id,
            cancelled = report.cancelled,
            "bulk detail sync finished"
        );
        Ok(report)
    }
}
