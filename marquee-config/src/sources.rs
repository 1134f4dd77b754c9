use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub provider: FileProviderConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub sync: FileSyncConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileSyncConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_video_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_batch_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfill_batch_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people_batch_max: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_pages: Option<u32>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub provider_base_url: Option<String>,
    pub provider_api_key: Option<String>,
    pub provider_timeout_secs: Option<u64>,
    pub provider_user_agent: Option<String>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub accepted_video_site: Option<String>,
    pub bulk_batch_size: Option<usize>,
    pub backfill_batch_size: Option<usize>,
    pub people_batch_max: Option<usize>,
    pub list_pages: Option<u32>,
    /// Variables that were set but could not be parsed, as (name, value).
    pub rejected: Vec<(String, String)>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the environment view from an arbitrary lookup, so callers can
    /// supply a fixed map instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_config = Self::default();
        let var = |name: &str| {
            lookup(name).filter(|value| !value.trim().is_empty())
        };

        env_config.config_path = var("MARQUEE_CONFIG").map(PathBuf::from);
        env_config.provider_base_url = var("TMDB_BASE_URL");
        env_config.provider_api_key = var("TMDB_API_KEY");
        env_config.provider_user_agent = var("MARQUEE_USER_AGENT");
        env_config.database_url = var("DATABASE_URL");
        env_config.accepted_video_site = var("MARQUEE_VIDEO_SITE");

        let mut rejected = Vec::new();
        env_config.provider_timeout_secs =
            parse_number_var(&var, "TMDB_TIMEOUT_SECS", &mut rejected);
        env_config.database_max_connections =
            parse_number_var(&var, "DB_MAX_CONNECTIONS", &mut rejected);
        env_config.bulk_batch_size =
            parse_number_var(&var, "MARQUEE_BULK_BATCH_SIZE", &mut rejected);
        env_config.backfill_batch_size =
            parse_number_var(
                &var,
                "MARQUEE_BACKFILL_BATCH_SIZE",
                &mut rejected,
            );
        env_config.people_batch_max =
            parse_number_var(&var, "MARQUEE_PEOPLE_BATCH_MAX", &mut rejected);
        env_config.list_pages =
            parse_number_var(&var, "MARQUEE_LIST_PAGES", &mut rejected);
        env_config.rejected = rejected;

        env_config
    }
}

fn parse_number_var<T, F>(
    var: &F,
    name: &str,
    rejected: &mut Vec<(String, String)>,
) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = var(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            rejected.push((name.to_string(), raw));
            None
        }
    }
}
