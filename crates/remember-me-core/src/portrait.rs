use serde::{Deserialize, Serialize};

/// Stable identity of a record inside the visualized set.
///
/// Points, scene elements and transitions are matched on this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub usize);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Interprets a free-text `sitter gender` cell.
    pub fn from_cell(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "female" | "f" => Self::Female,
            "male" | "m" => Self::Male,
            _ => Self::Unknown,
        }
    }
}

/// One portrait after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortraitRecord {
    pub year: Option<i32>,
    pub title: String,
    pub artist: String,
    pub sitter: String,
    pub size: String,
    pub gender: Gender,
    pub thumbnail_url: String,
    pub thumbnail_low_res_url: String,
}

impl PortraitRecord {
    pub fn has_artist(&self) -> bool {
        !self.artist.trim().is_empty()
    }

    pub fn has_sitter(&self) -> bool {
        !self.sitter.trim().is_empty()
    }

    pub fn is_miniature(&self) -> bool {
        self.size.to_lowercase().contains("mini")
    }
}

/// A raw CSV row. Column names follow the published dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPortraitRow {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub sitter: String,
    #[serde(default)]
    pub size: String,
    #[serde(default, rename = "sitter gender")]
    pub sitter_gender: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, rename = "thumbnail-low-res")]
    pub thumbnail_low_res: String,
}
