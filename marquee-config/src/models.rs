use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use marquee_core::{ProviderSettings, SyncSettings};
use url::Url;

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            base_url: self
                .provider
                .base_url
                .as_str()
                .trim_end_matches('/')
                .to_string(),
            api_key: self.provider.api_key.clone(),
            timeout: self.provider.timeout,
            user_agent: self.provider.user_agent.clone(),
        }
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            accepted_video_site: self.sync.accepted_video_site.clone(),
            bulk_batch_size: self.sync.bulk_batch_size,
            backfill_batch_size: self.sync.backfill_batch_size,
        }
    }
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    /// Absent when only in-memory runs are possible.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self.url.as_deref().map(redact_database_url);
        f.debug_struct("DatabaseConfig")
            .field("url", &url)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

fn redact_database_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        Ok(url) => url.to_string(),
        Err(_) => "<unparseable>".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub accepted_video_site: String,
    pub bulk_batch_size: usize,
    pub backfill_batch_size: usize,
    /// Default cap for the people enrichment batch.
    pub people_batch_max: usize,
    /// Default page count for list imports.
    pub list_pages: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_password_is_redacted() {
        let redacted =
            redact_database_url("postgres://app:hunter2@db:5432/marquee");
        assert_eq!(redacted, "postgres://app:***@db:5432/marquee");
    }
}
