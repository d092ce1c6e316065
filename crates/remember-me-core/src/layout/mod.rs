//! Point placement for the two chart modes.
//!
//! Both modes start from the same year grouping (first-appearance order of years, input order
//! inside a year) so that a record keeps its identity across mode changes. Layouts are always
//! rebuilt from the immutable record set; nothing here mutates a previous layout.

mod categorical;
mod timeline;

pub use categorical::{BucketExtent, axis_offset, layout_categorical};
pub use timeline::layout_timeline;

use crate::dimension::{Bucket, FilterDimension, FilterSelection};
use crate::portrait::{PortraitRecord, RecordId};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "dimension", rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Timeline,
    Categorical(FilterDimension),
}

impl LayoutMode {
    pub fn dimension(self) -> Option<FilterDimension> {
        match self {
            Self::Timeline => None,
            Self::Categorical(d) => Some(d),
        }
    }
}

impl From<FilterSelection> for LayoutMode {
    fn from(value: FilterSelection) -> Self {
        match value {
            FilterSelection::None => Self::Timeline,
            FilterSelection::Dimension(d) => Self::Categorical(d),
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeline => f.write_str("timeline"),
            Self::Categorical(d) => write!(f, "categorical({d})"),
        }
    }
}

/// A record placed on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlottedPoint {
    pub record_id: RecordId,
    pub year: i32,
    pub x: f64,
    pub y: f64,
    /// Position within the record's year stack (timeline) or year bucket (categorical).
    pub stack_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub mode: LayoutMode,
    /// Vertical position of the x axis, in plot-area coordinates.
    pub axis_y: f64,
    pub points: Vec<PlottedPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_extent: Option<BucketExtent>,
}

impl ChartLayout {
    pub fn point(&self, id: RecordId) -> Option<&PlottedPoint> {
        self.points.iter().find(|p| p.record_id == id)
    }

    /// Points indexed by record id.
    pub fn by_record(&self) -> IndexMap<RecordId, &PlottedPoint, FxBuildHasher> {
        self.points.iter().map(|p| (p.record_id, p)).collect()
    }
}

/// Records grouped by year, keyed in first-appearance order.
pub(crate) type YearGroups<'a> =
    IndexMap<i32, Vec<(RecordId, &'a PortraitRecord)>, FxBuildHasher>;

pub(crate) fn group_by_year(records: &[PortraitRecord]) -> YearGroups<'_> {
    let mut groups: YearGroups<'_> = IndexMap::default();
    for (idx, record) in records.iter().enumerate() {
        // Records without a year never reach the visualized set; skip rather than guess.
        let Some(year) = record.year else {
            continue;
        };
        groups
            .entry(year)
            .or_default()
            .push((RecordId(idx), record));
    }
    groups
}
