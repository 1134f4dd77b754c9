use marquee_model::{Genre, GenreId};
use tracing::{debug, info};

use crate::database::{CatalogStore, CatalogTransaction};
use crate::error::Result;
use crate::providers::MetadataSource;
use crate::sync::CatalogSync;

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    /// Upserts the provider's movie genre list. Entries without a name are
    /// ignored. Returns the number of genres written.
    pub async fn sync_genres(&self) -> Result<usize> {
        let records = self.source.movie_genres().await?;
        let mut tx = self.store.begin().await?;
        let mut written = 0;

        for record in &records {
            let Some(name) = record
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
            else {
                debug!(genre_id = record.id, "skipping unnamed genre");
                continue;
            };

            tx.save_genre(&Genre {
                id: GenreId(record.id),
                name: name.to_string(),
            })
            .await?;
            written += 1;
        }

        tx.commit().await?;
        info!(genres = written, "genre reference data synced");
        Ok(written)
    }
}
