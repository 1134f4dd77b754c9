//! Wire records for the subset of the provider API the sync engine consumes.

use marquee_model::GenreId;
use serde::{Deserialize, Serialize};

/// Basic movie info as returned by ranked list endpoints. Detail payloads
/// flatten the same fields and additionally carry `runtime`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<i64>>,
    /// Only detail payloads carry a runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
}

impl MovieSummary {
    pub fn genre_ids(&self) -> Vec<GenreId> {
        self.genre_ids
            .as_deref()
            .unwrap_or_default()
            .iter()
            .copied()
            .map(GenreId)
            .collect()
    }
}

/// Response wrapper for `/movie/{list}` and account list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<GenreRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default, rename = "type")]
    pub video_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<VideoRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastRecord>,
}

/// `/movie/{id}?append_to_response=videos,credits`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub genres: Option<Vec<GenreRecord>>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

impl MovieDetail {
    /// Genre ids from the nested genre objects followed by any flat
    /// `genre_ids`; duplicates are left for the reconciler to collapse.
    pub fn genre_ids(&self) -> Vec<GenreId> {
        self.genres
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|genre| GenreId(genre.id))
            .chain(self.summary.genre_ids())
            .collect()
    }

    pub fn named_genres(&self) -> impl Iterator<Item = (GenreId, &str)> {
        self.genres
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|genre| {
                genre
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(|name| (GenreId(genre.id), name))
            })
    }

    pub fn cast(&self) -> &[CastRecord] {
        self.credits
            .as_ref()
            .map(|credits| credits.cast.as_slice())
            .unwrap_or_default()
    }

    pub fn videos(&self) -> &[VideoRecord] {
        self.videos
            .as_ref()
            .map(|videos| videos.results.as_slice())
            .unwrap_or_default()
    }

    /// Summary view of the detail re-keyed to `id`, used when the local key is
    /// a source id rather than the provider id.
    pub fn to_summary_keyed(&self, id: i64) -> MovieSummary {
        MovieSummary {
            id,
            genre_ids: Some(
                self.genre_ids().into_iter().map(|genre| genre.0).collect(),
            ),
            ..self.summary.clone()
        }
    }
}

/// `/person/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_payload_flattens_summary_fields() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "original_title": "The Matrix",
            "release_date": "1999-03-30",
            "popularity": 81.5,
            "vote_average": 8.2,
            "vote_count": 25000,
            "original_language": "en",
            "runtime": 136,
            "genres": [
                {"id": 28, "name": "Action"},
                {"id": 878, "name": "Science Fiction"}
            ],
            "videos": {"results": [{
                "key": "abc",
                "site": "YouTube",
                "type": "Trailer",
                "name": "Official"
            }]},
            "credits": {"cast": [{
                "id": 6384,
                "name": "Keanu Reeves",
                "character": "Neo",
                "order": 0
            }]}
        }"#;

        let detail: MovieDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.summary.id, 603);
        assert_eq!(detail.summary.runtime, Some(136));
        assert_eq!(detail.genre_ids(), vec![GenreId(28), GenreId(878)]);
        assert_eq!(detail.cast()[0].character.as_deref(), Some("Neo"));
        assert_eq!(detail.videos()[0].video_type.as_deref(), Some("Trailer"));
    }

    #[test]
    fn list_summary_tolerates_nulls() {
        let json = r#"{
            "id": 1, "title": null, "genre_ids": null, "vote_average": 6.1
        }"#;
        let summary: MovieSummary = serde_json::from_str(json).unwrap();
        assert!(summary.genre_ids().is_empty());
        assert_eq!(summary.runtime, None);
        assert_eq!(summary.vote_average, Some(6.1));
    }

    #[test]
    fn keyed_summary_keeps_runtime_and_genres() {
        let detail = MovieDetail {
            summary: MovieSummary {
                id: 862,
                runtime: Some(81),
                ..MovieSummary::default()
            },
            genres: Some(vec![GenreRecord {
                id: 16,
                name: Some("Animation".into()),
            }]),
            ..MovieDetail::default()
        };

        let summary = detail.to_summary_keyed(1);
        assert_eq!(summary.id, 1);
        assert_eq!(summary.runtime, Some(81));
        assert_eq!(summary.genre_ids(), vec![GenreId(16)]);
    }
}
