use super::{ChartLayout, LayoutMode, PlottedPoint, group_by_year};
use crate::config::ChartConfig;
use crate::portrait::PortraitRecord;
use crate::scale::LinearScale;

/// Stacks each year's records upward from the bottom of the plot area.
///
/// The `i`-th record of a year sits at `chart_height - i * dot_spacing - baseline_inset`.
pub fn layout_timeline(
    records: &[PortraitRecord],
    x_scale: &LinearScale,
    config: &ChartConfig,
) -> ChartLayout {
    let chart_height = config.chart_height();
    let mut points = Vec::with_capacity(records.len());

    for (year, members) in group_by_year(records) {
        let x = x_scale.apply(year as f64);
        for (i, (record_id, _)) in members.into_iter().enumerate() {
            points.push(PlottedPoint {
                record_id,
                year,
                x,
                y: chart_height - (i as f64 * config.dot_spacing) - config.baseline_inset,
                stack_index: i,
                bucket: None,
            });
        }
    }

    ChartLayout {
        mode: LayoutMode::Timeline,
        axis_y: chart_height,
        points,
        bucket_extent: None,
    }
}
