//! Store port for the local catalog and its adapters.

pub mod memory;
pub mod ports;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::{InMemoryCatalogStore, InMemoryTransaction};
pub use ports::{CatalogStore, CatalogTransaction, MovieRelations};
#[cfg(feature = "postgres")]
pub use postgres::{MIGRATOR, PostgresCatalogStore, PostgresTransaction};
