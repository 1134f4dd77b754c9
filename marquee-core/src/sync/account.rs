use tracing::debug;

use crate::database::CatalogStore;
use crate::error::{Result, SyncError};
use crate::providers::MetadataSource;
use crate::providers::records::MoviePage;
use crate::sync::CatalogSync;

fn path_safe(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    /// One page of an account-scoped list such as `favorite/movies` or
    /// `watchlist/movies`. Nothing is persisted. Pages below 1 are clamped.
    pub async fn account_list(
        &self,
        account_id: i64,
        list_name: &str,
        session_id: &str,
        page: u32,
    ) -> Result<MoviePage> {
        let list_name = list_name.trim().trim_matches('/');
        if list_name.is_empty() {
            return Err(SyncError::InvalidArgument(
                "account list name is required".to_string(),
            ));
        }
        let valid = list_name
            .split('/')
            .all(|segment| !segment.is_empty() && path_safe(segment));
        if !valid {
            return Err(SyncError::InvalidArgument(format!(
                "invalid account list name '{list_name}'"
            )));
        }

        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(SyncError::InvalidArgument(
                "session id is required".to_string(),
            ));
        }
        if !path_safe(session_id) {
            return Err(SyncError::InvalidArgument(
                "session id contains unsupported characters".to_string(),
            ));
        }

        let page = page.max(1);
        debug!(account_id, list = list_name, page, "fetching account list");
        self.source
            .account_movie_list(account_id, list_name, session_id, page)
            .await
    }
}
