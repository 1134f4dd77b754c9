use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use marquee_core::providers::gateway::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
use marquee_core::sync::{
    DEFAULT_ACCEPTED_VIDEO_SITE, DEFAULT_BACKFILL_BATCH_SIZE,
    DEFAULT_BULK_BATCH_SIZE,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::{
    Config, ConfigMetadata, DatabaseConfig, ProviderConfig, SyncConfig,
};
use crate::sources::{EnvConfig, FileConfig};
use crate::warnings::ConfigWarnings;

pub const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["marquee.toml", "config/marquee.toml"];
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PEOPLE_BATCH_MAX: usize = 200;
pub const DEFAULT_LIST_PAGES: u32 = 1;

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Loads `.env` into the process environment, then composes the
    /// configuration from the config file and the environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        self.load_with_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Composes the configuration from an already gathered environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            compose_config(file_config, env, config_path, env_file_loaded)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        match loaded {
            Ok(loaded) => Ok(loaded),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) =
            match (&self.options.config_path, &env.config_path) {
                (Some(path), _) | (None, Some(path)) => (path.clone(), true),
                (None, None) => match DEFAULT_CONFIG_LOCATIONS
                    .iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists())
                {
                    Some(path) => (path, false),
                    None => return Ok((None, None)),
                },
            };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents = fs::read_to_string(&path).map_err(|source| {
            ConfigLoadError::Io {
                path: path.clone(),
                source,
            }
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;

        debug!(
            path = %path.display(),
            explicit,
            "loaded configuration file"
        );
        Ok((Some(file_config), Some(path)))
    }
}

fn positive_or_default<T>(
    value: Option<T>,
    default: T,
    key: &str,
    warnings: &mut ConfigWarnings,
) -> T
where
    T: PartialEq + Default + Copy,
{
    match value {
        Some(v) if v == T::default() => {
            warnings.push(format!(
                "{key} must be greater than zero; using the default"
            ));
            default
        }
        Some(v) => v,
        None => default,
    }
}

fn compose_config(
    file: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file.is_none() {
        warnings.push_with_hint(
            "No marquee.toml detected; using environment variables only",
            "Create marquee.toml or point MARQUEE_CONFIG at a config file",
        );
    }
    for (name, value) in &env.rejected {
        warnings.push(format!("Ignoring {name}={value}: not a valid number"));
    }

    let FileConfig {
        provider: file_provider,
        database: file_database,
        sync: file_sync,
    } = file.unwrap_or_default();

    let api_key = env
        .provider_api_key
        .or(file_provider.api_key)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(ConfigLoadError::MissingApiKey)?;

    let raw_base_url = env
        .provider_base_url
        .or(file_provider.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = Url::parse(&raw_base_url).map_err(|source| {
        ConfigLoadError::InvalidBaseUrl {
            value: raw_base_url.clone(),
            source,
        }
    })?;

    let timeout = env
        .provider_timeout_secs
        .or(file_provider.timeout_secs)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    let provider = ProviderConfig {
        base_url,
        api_key,
        timeout,
        user_agent: env
            .provider_user_agent
            .or(file_provider.user_agent)
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
    };

    let database = DatabaseConfig {
        url: env.database_url.or(file_database.url),
        max_connections: positive_or_default(
            env.database_max_connections.or(file_database.max_connections),
            DEFAULT_MAX_CONNECTIONS,
            "database.max_connections",
            &mut warnings,
        ),
    };
    if database.url.is_none() {
        warnings.push_with_hint(
            "No database URL configured",
            "Set DATABASE_URL or [database].url, or run with --in-memory",
        );
    }

    let sync = SyncConfig {
        accepted_video_site: env
            .accepted_video_site
            .or(file_sync.accepted_video_site)
            .map(|site| site.trim().to_string())
            .filter(|site| !site.is_empty())
            .unwrap_or_else(|| DEFAULT_ACCEPTED_VIDEO_SITE.to_string()),
        bulk_batch_size: positive_or_default(
            env.bulk_batch_size.or(file_sync.bulk_batch_size),
            DEFAULT_BULK_BATCH_SIZE,
            "sync.bulk_batch_size",
            &mut warnings,
        ),
        backfill_batch_size: positive_or_default(
            env.backfill_batch_size.or(file_sync.backfill_batch_size),
            DEFAULT_BACKFILL_BATCH_SIZE,
            "sync.backfill_batch_size",
            &mut warnings,
        ),
        people_batch_max: env
            .people_batch_max
            .or(file_sync.people_batch_max)
            .unwrap_or(DEFAULT_PEOPLE_BATCH_MAX),
        list_pages: env
            .list_pages
            .or(file_sync.list_pages)
            .unwrap_or(DEFAULT_LIST_PAGES),
    };

    let config = Config {
        provider,
        database,
        sync,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    Ok((config, warnings))
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("provider API key missing; set TMDB_API_KEY or [provider].api_key")]
    MissingApiKey,
    #[error("invalid provider base URL '{value}'")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
