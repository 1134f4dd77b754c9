//! Configuration loading for Marquee.
//!
//! Values are resolved per key as environment, then config file, then
//! built-in default. The config file is found through an explicit path,
//! `MARQUEE_CONFIG`, or the first of `marquee.toml` / `config/marquee.toml`
//! that exists.

pub mod loader;
pub mod models;
pub mod sources;
pub mod warnings;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
};
pub use models::{
    Config, ConfigMetadata, DatabaseConfig, ProviderConfig, SyncConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use warnings::{ConfigWarning, ConfigWarnings};
