use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, SyncError};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_USER_AGENT: &str =
    concat!("marquee/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const REDACTED: &str = "***";

/// Connection settings for the metadata provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Typed GET wrapper over the provider's REST API.
///
/// Every request carries the `api_key` query credential. A 404 is reported
/// as [`SyncError::ProviderNotFound`] so callers can tell "the provider has
/// no such record" apart from a failed call.
#[derive(Debug, Clone)]
pub struct FetchGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FetchGateway {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| {
                SyncError::InvalidArgument(format!(
                    "failed to build HTTP client: {err}"
                ))
            })?;

        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: Client, settings: &ProviderSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute request URL for `path_with_query` with the credential
    /// appended.
    pub fn request_url(&self, path_with_query: &str) -> String {
        with_credential(&self.base_url, path_with_query, &self.api_key)
    }

    fn redacted_url(&self, path_with_query: &str) -> String {
        with_credential(&self.base_url, path_with_query, REDACTED)
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path_with_query: &str,
    ) -> Result<T> {
        let url = self.request_url(path_with_query);
        let redacted = self.redacted_url(path_with_query);

        let response = self.client.get(&url).send().await.map_err(|source| {
            SyncError::Transport {
                url: redacted.clone(),
                source: source.without_url(),
            }
        })?;

        let status = response.status();
        debug!(url = %redacted, status = status.as_u16(), "provider request");

        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::ProviderNotFound { url: redacted });
        }

        let body = response.text().await.map_err(|source| SyncError::Transport {
            url: redacted.clone(),
            source: source.without_url(),
        })?;

        if !status.is_success() {
            return Err(SyncError::Provider {
                url: redacted,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            SyncError::Deserialization {
                path: path_with_query.to_string(),
                source,
            }
        })
    }

    /// Like [`fetch`](Self::fetch) but maps a 404 to `Ok(None)`.
    pub async fn try_fetch<T: DeserializeOwned>(
        &self,
        path_with_query: &str,
    ) -> Result<Option<T>> {
        match self.fetch(path_with_query).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn with_credential(
    base_url: &str,
    path_with_query: &str,
    api_key: &str,
) -> String {
    let separator = if path_with_query.contains('?') { '&' } else { '?' };
    let path = path_with_query.trim_start_matches('/');
    format!("{base_url}/{path}{separator}api_key={api_key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> FetchGateway {
        let settings = ProviderSettings::new("secret")
            .with_base_url("http://provider.test/3/");
        FetchGateway::new(&settings).unwrap()
    }

    #[test]
    fn credential_uses_question_mark_without_query() {
        assert_eq!(
            gateway().request_url("/genre/movie/list"),
            "http://provider.test/3/genre/movie/list?api_key=secret"
        );
    }

    #[test]
    fn credential_uses_ampersand_after_existing_query() {
        assert_eq!(
            gateway().request_url("/movie/popular?page=2"),
            "http://provider.test/3/movie/popular?page=2&api_key=secret"
        );
    }

    #[test]
    fn redacted_url_hides_the_key() {
        let url = gateway().redacted_url("/person/5");
        assert!(url.ends_with("api_key=***"));
        assert!(!url.contains("secret"));
    }
}
