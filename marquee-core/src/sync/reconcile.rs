//! Clear-and-reinsert of a movie's dependent rows inside the caller's
//! transaction.

use std::collections::HashSet;

use marquee_model::{
    CastCredit, GenreId, MISSING_VIDEO_KEY, MovieGenreLink, PersonId, SourceId,
    UNKNOWN_VIDEO_NAME, UNKNOWN_VIDEO_SITE, UNKNOWN_VIDEO_TYPE, Video,
};
use tracing::debug;

use crate::database::CatalogTransaction;
use crate::error::Result;
use crate::providers::records::{CastRecord, VideoRecord};
use crate::sync::merge::merge_person_from_credit;

pub const MAX_CAST_CREDITS: usize = 20;

/// Rows written by one reconcile call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationCounts {
    pub genres: usize,
    pub cast: usize,
    pub videos: usize,
}

/// Distinct ids in first-seen order.
pub fn dedupe_genres(ids: &[GenreId]) -> Vec<GenreId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// The first [`MAX_CAST_CREDITS`] entries by provider billing order. Ties
/// keep payload order.
pub fn top_billed(cast: &[CastRecord]) -> Vec<&CastRecord> {
    let mut ordered: Vec<&CastRecord> = cast.iter().collect();
    ordered.sort_by_key(|entry| entry.order);
    ordered.truncate(MAX_CAST_CREDITS);
    ordered
}

fn or_sentinel(value: Option<&str>, sentinel: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(sentinel)
        .to_string()
}

/// Videos hosted on `accepted_site` (compared case-insensitively), with
/// blank fields replaced by sentinels.
pub fn accepted_videos(
    movie: SourceId,
    videos: &[VideoRecord],
    accepted_site: &str,
) -> Vec<Video> {
    let accepted_site = accepted_site.trim();
    videos
        .iter()
        .filter(|video| {
            video.site.as_deref().is_some_and(|site| {
                site.trim().eq_ignore_ascii_case(accepted_site)
            })
        })
        .map(|video| Video {
            movie_id: movie,
            key: or_sentinel(video.key.as_deref(), MISSING_VIDEO_KEY),
            site: or_sentinel(video.site.as_deref(), UNKNOWN_VIDEO_SITE),
            video_type: or_sentinel(
                video.video_type.as_deref(),
                UNKNOWN_VIDEO_TYPE,
            ),
            name: or_sentinel(video.name.as_deref(), UNKNOWN_VIDEO_NAME),
        })
        .collect()
}

pub async fn replace_genre_links<T: CatalogTransaction>(
    tx: &mut T,
    movie: SourceId,
    genre_ids: &[GenreId],
) -> Result<usize> {
    tx.delete_genre_links(movie).await?;
    let links: Vec<MovieGenreLink> = dedupe_genres(genre_ids)
        .into_iter()
        .map(|genre_id| MovieGenreLink {
            movie_id: movie,
            genre_id,
        })
        .collect();
    tx.insert_genre_links(&links).await?;
    Ok(links.len())
}

async fn replace_cast<T: CatalogTransaction>(
    tx: &mut T,
    movie: SourceId,
    cast: &[CastRecord],
) -> Result<usize> {
    tx.delete_cast(movie).await?;

    let mut seen: HashSet<(PersonId, i32)> = HashSet::new();
    let mut credits = Vec::new();
    for entry in top_billed(cast) {
        let existing = tx.person(PersonId(entry.id)).await?;
        let person = merge_person_from_credit(existing.as_ref(), entry);
        tx.save_person(&person).await?;

        if seen.insert((person.id, entry.order)) {
            credits.push(CastCredit {
                movie_id: movie,
                person_id: person.id,
                rank: entry.order,
                character: entry
                    .character
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
            });
        }
    }

    tx.insert_cast(&credits).await?;
    Ok(credits.len())
}

async fn replace_videos<T: CatalogTransaction>(
    tx: &mut T,
    movie: SourceId,
    videos: &[VideoRecord],
    accepted_site: &str,
) -> Result<usize> {
    tx.delete_videos(movie).await?;
    let accepted = accepted_videos(movie, videos, accepted_site);
    tx.insert_videos(&accepted).await?;
    Ok(accepted.len())
}

/// Replaces genre links, cast (and the people it names) and videos of
/// `movie`. Nothing is committed here.
pub async fn reconcile_relations<T: CatalogTransaction>(
    tx: &mut T,
    movie: SourceId,
    genre_ids: &[GenreId],
    cast: &[CastRecord],
    videos: &[VideoRecord],
    accepted_site: &str,
) -> Result<RelationCounts> {
    let counts = RelationCounts {
        genres: replace_genre_links(tx, movie, genre_ids).await?,
        cast: replace_cast(tx, movie, cast).await?,
        videos: replace_videos(tx, movie, videos, accepted_site).await?,
    };
    debug!(
        movie = %movie,
        genres = counts.genres,
        cast = counts.cast,
        videos = counts.videos,
        "relations reconciled"
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast_entry(id: i64, order: i32) -> CastRecord {
        CastRecord {
            id,
            name: Some(format!("Person {id}")),
            order,
            ..CastRecord::default()
        }
    }

    #[test]
    fn genres_dedupe_in_first_seen_order() {
        let ids = [GenreId(18), GenreId(28), GenreId(18), GenreId(12)];
        assert_eq!(
            dedupe_genres(&ids),
            vec![GenreId(18), GenreId(28), GenreId(12)]
        );
    }

    #[test]
    fn top_billed_sorts_and_caps() {
        let cast: Vec<CastRecord> = (0..30)
            .rev()
            .map(|n| cast_entry(n + 100, n as i32))
            .collect();
        let billed = top_billed(&cast);
        assert_eq!(billed.len(), MAX_CAST_CREDITS);
        assert_eq!(billed[0].order, 0);
        assert_eq!(billed[19].order, 19);
    }

    #[test]
    fn videos_filter_by_site_case_insensitively() {
        let videos = vec![
            VideoRecord {
                key: Some("a".into()),
                site: Some("youtube".into()),
                video_type: Some("Trailer".into()),
                name: None,
            },
            VideoRecord {
                key: Some("b".into()),
                site: Some("Vimeo".into()),
                ..VideoRecord::default()
            },
            VideoRecord {
                key: Some(" ".into()),
                site: Some("YouTube".into()),
                ..VideoRecord::default()
            },
        ];

        let accepted = accepted_videos(SourceId(1), &videos, "YouTube");
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].name, UNKNOWN_VIDEO_NAME);
        assert_eq!(accepted[1].key, MISSING_VIDEO_KEY);
        assert_eq!(accepted[1].video_type, UNKNOWN_VIDEO_TYPE);
    }
}
