use crate::portrait::{Gender, PortraitRecord};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The two stacked slots of a categorical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Label 0, drawn above the axis.
    Upper,
    /// Label 1, drawn below the axis.
    Lower,
}

/// A categorical regrouping the chart can switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Size,
    Artist,
    Sitter,
    Gender,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [Self::Size, Self::Artist, Self::Sitter, Self::Gender];

    /// Selector value (`size`, `artist`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Artist => "artist",
            Self::Sitter => "sitter",
            Self::Gender => "gender",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Size => "Size",
            Self::Artist => "Artist",
            Self::Sitter => "Sitter",
            Self::Gender => "Gender",
        }
    }

    /// `[upper, lower]` category labels. Order is significant.
    pub fn labels(self) -> [&'static str; 2] {
        match self {
            Self::Size => ["Miniature", "Regular"],
            Self::Artist => ["Known", "Unknown"],
            Self::Sitter => ["Named", "Unnamed"],
            Self::Gender => ["Male", "Female"],
        }
    }

    pub fn label(self, bucket: Bucket) -> &'static str {
        let [upper, lower] = self.labels();
        match bucket {
            Bucket::Upper => upper,
            Bucket::Lower => lower,
        }
    }

    /// Total assignment of a record to one of the two buckets.
    pub fn assign(self, record: &PortraitRecord) -> Bucket {
        let upper = match self {
            Self::Size => record.is_miniature(),
            Self::Artist => record.has_artist(),
            Self::Sitter => record.has_sitter(),
            // Unrecognized genders land in "Male". Kept as shipped; pending product review.
            Self::Gender => !matches!(record.gender, Gender::Female),
        };
        if upper { Bucket::Upper } else { Bucket::Lower }
    }
}

impl std::fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterDimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.key() == key)
            .ok_or_else(|| Error::UnknownDimension {
                name: s.to_string(),
            })
    }
}

/// A selector value: either the timeline sentinel or a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSelection {
    #[default]
    None,
    Dimension(FilterDimension),
}

impl FilterSelection {
    /// Every selectable entry, `none` first, in selector order.
    pub fn options() -> impl Iterator<Item = FilterSelection> {
        std::iter::once(Self::None).chain(FilterDimension::ALL.into_iter().map(Self::Dimension))
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dimension(d) => d.key(),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Dimension(d) => d.display_name(),
        }
    }
}

impl FromStr for FilterSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        s.parse::<FilterDimension>().map(Self::Dimension)
    }
}
