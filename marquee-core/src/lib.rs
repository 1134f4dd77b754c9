//! Marquee catalog synchronization engine.
//!
//! Mirrors a TMDB-style metadata provider into a local relational catalog:
//! ranked list imports, per-movie detail refreshes with cast, genres and
//! videos, lazy person enrichment, and resumable bulk drivers.

pub mod database;
pub mod error;
pub mod providers;
pub mod sync;

pub use database::{
    CatalogStore, CatalogTransaction, InMemoryCatalogStore, MovieRelations,
};
#[cfg(feature = "postgres")]
pub use database::PostgresCatalogStore;
pub use error::{Result, SyncError};
pub use providers::{FetchGateway, MetadataSource, ProviderSettings, TmdbClient};
pub use sync::{
    BatchReport, CatalogSync, DetailOutcome, ItemOutcome, ListImportReport,
    RelationCounts, SyncSettings,
};

pub use tokio_util::sync::CancellationToken;
