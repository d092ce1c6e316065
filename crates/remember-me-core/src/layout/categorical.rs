use super::{ChartLayout, LayoutMode, PlottedPoint, group_by_year};
use crate::config::{CategoricalConfig, ChartConfig};
use crate::dimension::{Bucket, FilterDimension};
use crate::portrait::{PortraitRecord, RecordId};
use crate::scale::LinearScale;
use serde::{Deserialize, Serialize};

/// Tallest upper and lower bucket over every year of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketExtent {
    pub max_upper: usize,
    pub max_lower: usize,
}

/// Vertical position of the axis that splits the two buckets.
///
/// The preferred position leaves room for the tallest upper bucket below `top_padding`; it is
/// pulled up when the tallest lower bucket would otherwise run past the bottom of the plot area.
pub fn axis_offset(
    extent: BucketExtent,
    chart_height: f64,
    dot_spacing: f64,
    cat: &CategoricalConfig,
) -> f64 {
    let upper_height = extent.max_upper as f64 * dot_spacing + cat.start_offset;
    let lower_height = extent.max_lower as f64 * dot_spacing + cat.start_offset;
    let preferred = cat.top_padding + upper_height;
    let bottom_space = cat.min_bottom_space.max(lower_height + cat.bottom_margin);
    preferred.min(chart_height - bottom_space)
}

/// Re-stacks every year into two buckets above and below a shared axis.
pub fn layout_categorical(
    records: &[PortraitRecord],
    dimension: FilterDimension,
    x_scale: &LinearScale,
    config: &ChartConfig,
) -> ChartLayout {
    let cat = &config.categorical;
    let spacing = config.dot_spacing;

    let buckets: Vec<(i32, Vec<RecordId>, Vec<RecordId>)> = group_by_year(records)
        .into_iter()
        .map(|(year, members)| {
            let (upper, lower): (Vec<_>, Vec<_>) = members
                .into_iter()
                .partition(|(_, record)| dimension.assign(record) == Bucket::Upper);
            let ids = |v: Vec<(RecordId, &PortraitRecord)>| -> Vec<RecordId> {
                v.into_iter().map(|(id, _)| id).collect()
            };
            (year, ids(upper), ids(lower))
        })
        .collect();

    let extent = buckets
        .iter()
        .fold(BucketExtent::default(), |acc, (_, upper, lower)| BucketExtent {
            max_upper: acc.max_upper.max(upper.len()),
            max_lower: acc.max_lower.max(lower.len()),
        });

    let axis_y = axis_offset(extent, config.chart_height(), spacing, cat);
    tracing::debug!(
        dimension = dimension.key(),
        max_upper = extent.max_upper,
        max_lower = extent.max_lower,
        axis_y,
        "categorical axis placed"
    );

    let mut points = Vec::with_capacity(records.len());
    for (year, upper, lower) in buckets {
        let x = x_scale.apply(year as f64);
        for (i, record_id) in upper.into_iter().enumerate() {
            points.push(PlottedPoint {
                record_id,
                year,
                x,
                y: axis_y - cat.start_offset - (i as f64 * spacing),
                stack_index: i,
                bucket: Some(Bucket::Upper),
            });
        }
        for (i, record_id) in lower.into_iter().enumerate() {
            points.push(PlottedPoint {
                record_id,
                year,
                x,
                y: axis_y + cat.start_offset + (i as f64 * spacing),
                stack_index: i,
                bucket: Some(Bucket::Lower),
            });
        }
    }

    ChartLayout {
        mode: LayoutMode::Categorical(dimension),
        axis_y,
        points,
        bucket_extent: Some(extent),
    }
}
