use chrono::NaiveDate;

use crate::ids::{PersonId, SourceId};

/// Stored in place of a person's name when the provider omits it.
pub const UNKNOWN_PERSON: &str = "(unknown person)";

/// Cast and profile data for one person, keyed by the provider person id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub biography: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub place_of_birth: Option<String>,
    pub profile_path: Option<String>,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            biography: None,
            birthday: None,
            place_of_birth: None,
            profile_path: None,
        }
    }

    /// Presence of every optional profile field is what marks a person as
    /// already enriched; there is no time-based expiry.
    pub fn needs_enrichment(&self) -> bool {
        self.biography.is_none()
            || self.birthday.is_none()
            || self.place_of_birth.is_none()
    }
}

/// One billed cast entry of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastCredit {
    pub movie_id: SourceId,
    pub person_id: PersonId,
    /// Position in the provider's billing order, lowest first.
    pub rank: i32,
    pub character: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrichment_needed_until_all_fields_present() {
        let mut person = Person::new(PersonId(1), "Ada");
        assert!(person.needs_enrichment());

        person.biography = Some("bio".into());
        person.place_of_birth = Some("London".into());
        assert!(person.needs_enrichment());

        person.birthday = NaiveDate::from_ymd_opt(1815, 12, 10);
        assert!(!person.needs_enrichment());
    }
}
