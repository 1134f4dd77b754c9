use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::ids::{ProviderMovieId, SourceId};

/// Stored in place of a title when neither the provider nor the local row has
/// one.
pub const UNKNOWN_TITLE: &str = "(unknown title)";

/// Stored in place of an original language code that was never supplied.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Number of fractional digits kept for vote averages.
pub const VOTE_AVERAGE_SCALE: u32 = 2;

/// A movie row in the local catalog.
///
/// `source_id` is the canonical key for every sync path; `provider_id` is the
/// id used when talking to the metadata provider and may be absent for rows
/// that were seeded administratively and never matched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogMovie {
    pub source_id: SourceId,
    pub provider_id: Option<ProviderMovieId>,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub popularity: f64,
    pub vote_average: Decimal,
    pub vote_count: i32,
    pub original_language: String,
    pub runtime: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogMovie {
    /// Same row with both timestamps pinned, for comparing content across
    /// syncs.
    pub fn without_timestamps(&self) -> CatalogMovie {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        CatalogMovie {
            created_at: epoch,
            updated_at: epoch,
            ..self.clone()
        }
    }
}

/// Converts a provider vote average into the fixed-precision value the store
/// keeps. Non-finite input collapses to zero.
pub fn vote_average_from_f64(value: f64) -> Decimal {
    Decimal::try_from(value)
        .map(|d| d.round_dp(VOTE_AVERAGE_SCALE))
        .unwrap_or(Decimal::ZERO)
}
