//! Field-level merge of incoming provider records into local rows.
//!
//! Every field follows the same rule: a present, non-blank incoming value
//! wins, then the stored value, then a fixed default.

use chrono::{DateTime, NaiveDate, Utc};
use marquee_model::{
    CatalogMovie, Person, PersonId, SourceId, UNKNOWN_LANGUAGE, UNKNOWN_PERSON,
    UNKNOWN_TITLE, vote_average_from_f64,
};
use rust_decimal::Decimal;

use crate::providers::records::{CastRecord, MovieSummary, PersonDetails};

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn prefer(incoming: Option<&str>, existing: Option<&str>) -> Option<String> {
    non_blank(incoming).or(existing).map(str::to_string)
}

/// Accepts `YYYY-MM-DD`; full RFC 3339 timestamps are reduced to their date.
pub fn parse_provider_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = non_blank(raw)?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.date_naive())
        })
}

/// Builds the row to store for `source_id` from an incoming summary and the
/// current row, if any. The provider id is carried over from `existing`;
/// callers stamp it.
pub fn merge_movie(
    existing: Option<&CatalogMovie>,
    source_id: SourceId,
    incoming: &MovieSummary,
    now: DateTime<Utc>,
) -> CatalogMovie {
    let title = non_blank(incoming.title.as_deref())
        .or_else(|| non_blank(incoming.original_title.as_deref()))
        .or_else(|| existing.and_then(|m| non_blank(Some(m.title.as_str()))))
        .unwrap_or(UNKNOWN_TITLE)
        .to_string();

    let original_language = non_blank(incoming.original_language.as_deref())
        .or_else(|| {
            existing.and_then(|m| non_blank(Some(m.original_language.as_str())))
        })
        .unwrap_or(UNKNOWN_LANGUAGE)
        .to_string();

    let popularity = incoming
        .popularity
        .or(existing.map(|m| m.popularity))
        .unwrap_or(0.0);

    let vote_average = incoming
        .vote_average
        .map(vote_average_from_f64)
        .or(existing.map(|m| m.vote_average))
        .unwrap_or(Decimal::ZERO);

    let vote_count = incoming
        .vote_count
        .map(|count| count.clamp(0, i64::from(i32::MAX)) as i32)
        .or(existing.map(|m| m.vote_count))
        .unwrap_or(0);

    let release_date = parse_provider_date(incoming.release_date.as_deref())
        .or(existing.and_then(|m| m.release_date));

    CatalogMovie {
        source_id,
        provider_id: existing.and_then(|m| m.provider_id),
        title,
        overview: prefer(
            incoming.overview.as_deref(),
            existing.and_then(|m| m.overview.as_deref()),
        ),
        poster_path: prefer(
            incoming.poster_path.as_deref(),
            existing.and_then(|m| m.poster_path.as_deref()),
        ),
        backdrop_path: prefer(
            incoming.backdrop_path.as_deref(),
            existing.and_then(|m| m.backdrop_path.as_deref()),
        ),
        release_date,
        popularity,
        vote_average,
        vote_count,
        original_language,
        runtime: incoming.runtime.or(existing.and_then(|m| m.runtime)),
        created_at: existing.map(|m| m.created_at).unwrap_or(now),
        updated_at: now,
    }
}

fn merged_name(incoming: Option<&str>, existing: Option<&Person>) -> String {
    non_blank(incoming)
        .or_else(|| existing.and_then(|p| non_blank(Some(p.name.as_str()))))
        .unwrap_or(UNKNOWN_PERSON)
        .to_string()
}

/// Person row as seen from a cast entry: only name and profile path are
/// known.
pub fn merge_person_from_credit(
    existing: Option<&Person>,
    credit: &CastRecord,
) -> Person {
    Person {
        id: PersonId(credit.id),
        name: merged_name(credit.name.as_deref(), existing),
        profile_path: prefer(
            credit.profile_path.as_deref(),
            existing.and_then(|p| p.profile_path.as_deref()),
        ),
        biography: existing.and_then(|p| p.biography.clone()),
        birthday: existing.and_then(|p| p.birthday),
        place_of_birth: existing.and_then(|p| p.place_of_birth.clone()),
    }
}

pub fn merge_person_details(
    existing: Option<&Person>,
    details: &PersonDetails,
) -> Person {
    Person {
        id: PersonId(details.id),
        name: merged_name(details.name.as_deref(), existing),
        profile_path: prefer(
            details.profile_path.as_deref(),
            existing.and_then(|p| p.profile_path.as_deref()),
        ),
        biography: prefer(
            details.biography.as_deref(),
            existing.and_then(|p| p.biography.as_deref()),
        ),
        place_of_birth: prefer(
            details.place_of_birth.as_deref(),
            existing.and_then(|p| p.place_of_birth.as_deref()),
        ),
        birthday: parse_provider_date(details.birthday.as_deref())
            .or(existing.and_then(|p| p.birthday)),
    }
}
