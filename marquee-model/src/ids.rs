use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize)
        )]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                $name(id)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                raw.trim().parse::<i64>().map($name).map_err(|_| {
                    ModelError::InvalidId(format!("{} '{}'", $label, raw))
                })
            }
        }
    };
}

integer_id!(
    /// Primary identity of a catalog movie, taken from the curated reference
    /// dataset rather than from the live provider.
    SourceId,
    "source id"
);

integer_id!(
    /// The metadata provider's own identifier for a movie.
    ProviderMovieId,
    "provider movie id"
);

integer_id!(
    /// The metadata provider's identifier for a person.
    PersonId,
    "person id"
);

integer_id!(
    /// The metadata provider's identifier for a genre.
    GenreId,
    "genre id"
);

impl SourceId {
    /// List-derived movies have no curated id; the provider id stands in for
    /// it when nothing else maps it.
    pub fn from_provider(id: ProviderMovieId) -> Self {
        SourceId(id.0)
    }
}

impl ProviderMovieId {
    pub fn assume_from_source(id: SourceId) -> Self {
        ProviderMovieId(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_ids() {
        assert_eq!(" 42 ".parse::<SourceId>().unwrap(), SourceId(42));
        assert_eq!("-7".parse::<PersonId>().unwrap(), PersonId(-7));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "abc".parse::<ProviderMovieId>().unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidId("provider movie id 'abc'".to_string())
        );
    }
}
