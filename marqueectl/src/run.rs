use anyhow::Context;
use marquee_config::SyncConfig;
use marquee_core::{
    CancellationToken, CatalogStore, CatalogSync, DetailOutcome, MetadataSource,
};
use tracing::{info, warn};

use crate::cli::{BatchArgs, Command};

/// Runs one sync command against an already wired service.
pub async fn execute<S, P>(
    sync: &CatalogSync<S, P>,
    command: Command,
    defaults: &SyncConfig,
    cancel: &CancellationToken,
) -> anyhow::Result<()>
where
    S: CatalogStore,
    P: MetadataSource,
{
    match command {
        Command::Movie { source_id } => {
            let outcome = sync
                .import_details(source_id)
                .await
                .with_context(|| {
                    format!("detail import failed for movie {source_id}")
                })?;
            match outcome {
                DetailOutcome::Updated(counts) => info!(
                    source_id = %source_id,
                    genres = counts.genres,
                    cast = counts.cast,
                    videos = counts.videos,
                    "movie refreshed"
                ),
                DetailOutcome::Untracked => {
                    warn!(
                        source_id = %source_id,
                        "movie is not in the local catalog"
                    )
                }
                DetailOutcome::MissingUpstream => {
                    warn!(
                        source_id = %source_id,
                        "provider has no record for this movie"
                    )
                }
            }
        }
        Command::DetailsBulk(BatchArgs {
            start_after,
            max,
            batch_size,
        }) => {
            let report = sync
                .run_bulk_details(start_after, max, batch_size, cancel)
                .await
                .context("bulk detail sync failed")?;
            info!(%report, "bulk detail sync finished");
        }
        Command::People { max } => {
            let max = max.unwrap_or(defaults.people_batch_max);
            let report = sync
                .enrich_people(max, cancel)
                .await
                .context("people enrichment failed")?;
            info!(%report, "people enrichment finished");
        }
        Command::Person { person_id } => {
            match sync
                .enrich_person(person_id)
                .await
                .with_context(|| {
                    format!("enrichment failed for person {person_id}")
                })?
            {
                Some(person) => info!(
                    person_id = %person_id,
                    name = %person.name,
                    "person ready"
                ),
                None => {
                    warn!(person_id = %person_id, "person is not known locally")
                }
            }
        }
        Command::List { list_type, pages } => {
            let pages = pages.unwrap_or(defaults.list_pages);
            let report = sync
                .import_list(list_type, pages, cancel)
                .await
                .with_context(|| format!("{list_type} list import failed"))?;
            info!(
                list = %list_type,
                pages = report.pages,
                records = report.records,
                conflicts = report.conflicts,
                cancelled = report.cancelled,
                "list import finished"
            );
        }
        Command::Backfill { max, batch_size } => {
            let report = sync
                .backfill_missing(max, batch_size, cancel)
                .await
                .context("gap backfill failed")?;
            info!(%report, "gap backfill finished");
        }
        Command::Genres => {
            let written =
                sync.sync_genres().await.context("genre sync failed")?;
            info!(genres = written, "genre reference refreshed");
        }
        Command::FromMappings(BatchArgs {
            start_after,
            max,
            batch_size,
        }) => {
            let report = sync
                .import_from_mappings(start_after, max, batch_size, cancel)
                .await
                .context("mapping import failed")?;
            info!(%report, "mapping import finished");
        }
        Command::Account {
            account_id,
            list,
            session_id,
            page,
        } => {
            let movies = sync
                .account_list(account_id, &list, &session_id, page)
                .await
                .with_context(|| {
                    format!("failed to fetch account list '{list}'")
                })?;
            let rendered = serde_json::to_string_pretty(&movies)
                .context("failed to render account list")?;
            println!("{rendered}");
        }
        Command::Migrate => {
            anyhow::bail!("migrate is handled before a sync service is built")
        }
    }

    Ok(())
}
