use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// The provider answered 404. Single-item operations treat this as
    /// "nothing to sync" rather than a failure.
    #[error("provider has no record at {url}")]
    ProviderNotFound { url: String },

    #[error("provider call failed\nURL: {url}\nStatus: {status}\nBody: {body}")]
    Provider {
        url: String,
        status: u16,
        body: String,
    },

    #[error("provider transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to deserialize provider response for {path}: {source}")]
    Deserialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("local store error: {0}")]
    Store(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SyncError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::ProviderNotFound { .. })
    }

    /// Errors raised by the provider call rather than the local store.
    pub fn is_provider_side(&self) -> bool {
        matches!(
            self,
            SyncError::ProviderNotFound { .. }
                | SyncError::Provider { .. }
                | SyncError::Transport { .. }
                | SyncError::Deserialization { .. }
        )
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for SyncError {
    fn from(err: sqlx::Error) -> Self {
        SyncError::Store(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::migrate::MigrateError> for SyncError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        SyncError::Store(format!("migration failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
