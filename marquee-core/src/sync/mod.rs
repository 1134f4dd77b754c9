//! The catalog synchronization engine.
//!
//! [`CatalogSync`] ties a [`CatalogStore`] to a [`MetadataSource`]. Each
//! operation lives in its own module as an `impl` block on the service.

pub mod account;
pub mod backfill;
pub mod bulk;
pub mod details;
pub mod genres;
pub mod lists;
pub mod mappings;
pub mod merge;
pub mod outcome;
pub mod people;
pub mod reconcile;

use std::sync::Arc;

use crate::database::CatalogStore;
use crate::providers::MetadataSource;

pub use details::DetailOutcome;
pub use lists::ListImportReport;
pub use outcome::{BatchReport, ItemOutcome};
pub use reconcile::{MAX_CAST_CREDITS, RelationCounts};

pub const DEFAULT_ACCEPTED_VIDEO_SITE: &str = "YouTube";
pub const DEFAULT_BULK_BATCH_SIZE: usize = 50;
pub const DEFAULT_BACKFILL_BATCH_SIZE: usize = 200;

/// Tunables shared by every sync operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Only videos hosted here are kept.
    pub accepted_video_site: String,
    /// Checkpoint interval of bulk runs and commit cadence of mapping
    /// imports when the caller passes 0.
    pub bulk_batch_size: usize,
    /// Chunk size of gap backfills when the caller passes 0.
    pub backfill_batch_size: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            accepted_video_site: DEFAULT_ACCEPTED_VIDEO_SITE.to_string(),
            bulk_batch_size: DEFAULT_BULK_BATCH_SIZE,
            backfill_batch_size: DEFAULT_BACKFILL_BATCH_SIZE,
        }
    }
}

#[derive(Debug)]
pub struct CatalogSync<S, P> {
    store: Arc<S>,
    source: Arc<P>,
    settings: SyncSettings,
}

impl<S, P> Clone for CatalogSync<S, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            source: Arc::clone(&self.source),
            settings: self.settings.clone(),
        }
    }
}

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    pub fn new(store: Arc<S>, source: Arc<P>, settings: SyncSettings) -> Self {
        Self {
            store,
            source,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// `requested`, or the configured fallback when it is 0.
    fn batch_size_or(requested: usize, fallback: usize) -> usize {
        if requested == 0 {
            fallback.max(1)
        } else {
            requested
        }
    }
}
