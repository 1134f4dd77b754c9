use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::ids::{GenreId, ProviderMovieId, SourceId};

pub const MISSING_VIDEO_KEY: &str = "missing-key";
pub const UNKNOWN_VIDEO_SITE: &str = "unknown-site";
pub const UNKNOWN_VIDEO_TYPE: &str = "unknown-type";
pub const UNKNOWN_VIDEO_NAME: &str = "unknown-name";

/// Genre reference row, shared across movies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieGenreLink {
    pub movie_id: SourceId,
    pub genre_id: GenreId,
}

/// A trailer, teaser or clip attached to a movie. Every text field is
/// non-null; missing values are replaced with the sentinels above.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Video {
    pub movie_id: SourceId,
    pub key: String,
    pub site: String,
    pub video_type: String,
    pub name: String,
}

/// Ranked provider lists a movie can be imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ListType {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl ListType {
    pub const ALL: [ListType; 4] = [
        ListType::Popular,
        ListType::TopRated,
        ListType::Upcoming,
        ListType::NowPlaying,
    ];

    /// Path segment used by the provider and value stored in the membership
    /// table.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Popular => "popular",
            ListType::TopRated => "top_rated",
            ListType::Upcoming => "upcoming",
            ListType::NowPlaying => "now_playing",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        ListType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::InvalidListType(raw.to_string()))
    }
}

/// Position of a movie within a ranked list as of its last sync. There is at
/// most one row per (movie, list type).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListMembership {
    pub movie_id: SourceId,
    pub list_type: ListType,
    pub page: i32,
    pub position: i32,
}

/// Links a curated source id to the provider's id space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalIdMapping {
    pub source_id: SourceId,
    pub provider_id: Option<ProviderMovieId>,
    /// Secondary external id (an IMDb-style numeric id), kept for reference.
    pub secondary_id: Option<i64>,
}
