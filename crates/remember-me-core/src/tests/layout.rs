use super::{config, portrait};
use crate::layout::{axis_offset, layout_categorical, layout_timeline};
use crate::*;

fn scale(cfg: &ChartConfig) -> LinearScale {
    LinearScale::new(
        (cfg.min_year as f64, cfg.max_year as f64),
        (0.0, cfg.chart_width()),
    )
}

#[test]
fn timeline_stacks_each_year_from_the_baseline() {
    let cfg = config();
    let records = vec![
        portrait(1795, "Regular"),
        portrait(1780, "Regular"),
        portrait(1795, "Regular"),
        portrait(1795, "Regular"),
    ];
    let layout = layout_timeline(&records, &scale(&cfg), &cfg);

    assert_eq!(layout.mode, LayoutMode::Timeline);
    assert_eq!(layout.axis_y, 570.0);
    let ids: Vec<_> = layout.points.iter().map(|p| p.record_id.0).collect();
    assert_eq!(ids, [0, 2, 3, 1]);

    let ys: Vec<_> = layout.points.iter().map(|p| p.y).collect();
    assert_eq!(ys, [550.0, 538.0, 526.0, 550.0]);
    let stacks: Vec<_> = layout.points.iter().map(|p| p.stack_index).collect();
    assert_eq!(stacks, [0, 1, 2, 0]);

    let p = layout.point(RecordId(1)).unwrap();
    assert_eq!(p.x, scale(&cfg).apply(1780.0));
    assert!(p.bucket.is_none());
}

#[test]
fn size_example_places_two_miniatures_above_and_one_regular_below() {
    let cfg = config();
    let records = vec![
        portrait(1795, "Miniature"),
        portrait(1795, "Regular"),
        portrait(1795, "Miniature"),
    ];
    let layout = layout_categorical(&records, FilterDimension::Size, &scale(&cfg), &cfg);
    let axis = layout.axis_y;
    let start = cfg.categorical.start_offset;
    let spacing = cfg.dot_spacing;

    // 180 + 2 * 12 + 20, well above the 570 - 120 clamp.
    assert_eq!(axis, 224.0);
    assert_eq!(
        layout.bucket_extent,
        Some(BucketExtent {
            max_upper: 2,
            max_lower: 1
        })
    );

    let p0 = layout.point(RecordId(0)).unwrap();
    let p2 = layout.point(RecordId(2)).unwrap();
    let p1 = layout.point(RecordId(1)).unwrap();
    assert_eq!((p0.y, p0.bucket), (axis - start, Some(Bucket::Upper)));
    assert_eq!((p2.y, p2.bucket), (axis - start - spacing, Some(Bucket::Upper)));
    assert_eq!((p1.y, p1.bucket), (axis + start, Some(Bucket::Lower)));
    assert_eq!(p2.stack_index, 1);
}

#[test]
fn categorical_points_are_emitted_upper_then_lower_per_year() {
    let cfg = config();
    let records = vec![
        portrait(1790, "Regular"),
        portrait(1800, "Miniature"),
        portrait(1790, "Miniature"),
    ];
    let layout = layout_categorical(&records, FilterDimension::Size, &scale(&cfg), &cfg);
    let ids: Vec<_> = layout.points.iter().map(|p| p.record_id.0).collect();
    assert_eq!(ids, [2, 0, 1]);
}

#[test]
fn every_record_lands_in_exactly_one_bucket() {
    let cfg = config();
    let mut records = Vec::new();
    for (i, year) in (1770..=1815).step_by(3).enumerate() {
        let size = if i % 3 == 0 { "miniature" } else { "oil on canvas" };
        records.push(portrait(year, size));
        records.push(portrait(year, "Regular"));
    }

    for dimension in FilterDimension::ALL {
        let layout = layout_categorical(&records, dimension, &scale(&cfg), &cfg);
        assert_eq!(layout.points.len(), records.len(), "{dimension}");
        let mut seen = vec![0usize; records.len()];
        for p in &layout.points {
            seen[p.record_id.0] += 1;
            let expected = dimension.assign(&records[p.record_id.0]);
            assert_eq!(p.bucket, Some(expected));
        }
        assert!(seen.iter().all(|&n| n == 1), "{dimension}: {seen:?}");
    }
}

#[test]
fn bucket_maxima_span_all_years() {
    let cfg = config();
    // 1780 has the tallest upper bucket, 1800 the tallest lower one.
    let mut records = vec![portrait(1780, "Miniature"); 4];
    records.extend(vec![portrait(1800, "Regular"); 3]);
    records.push(portrait(1800, "Miniature"));

    let layout = layout_categorical(&records, FilterDimension::Size, &scale(&cfg), &cfg);
    assert_eq!(
        layout.bucket_extent,
        Some(BucketExtent {
            max_upper: 4,
            max_lower: 3
        })
    );
    assert_eq!(layout.axis_y, 180.0 + 4.0 * 12.0 + 20.0);
}

#[test]
fn axis_is_clamped_by_a_dominant_lower_bucket() {
    let cfg = config();
    let records = vec![portrait(1790, "Regular"); 30];
    let layout = layout_categorical(&records, FilterDimension::Size, &scale(&cfg), &cfg);
    // Lower bucket needs 30 * 12 + 20 + 40 = 420 below the axis.
    assert_eq!(layout.axis_y, 570.0 - 420.0);
    let lowest = layout
        .points
        .iter()
        .map(|p| p.y)
        .fold(f64::MIN, f64::max);
    assert!(lowest <= cfg.chart_height() - cfg.categorical.bottom_margin);
}

#[test]
fn more_upper_records_never_lower_the_axis() {
    let cfg = config();
    let cat = &cfg.categorical;
    for max_lower in [0usize, 5, 20, 40] {
        let mut last = f64::MIN;
        for max_upper in 0..60 {
            let axis = axis_offset(
                BucketExtent {
                    max_upper,
                    max_lower,
                },
                cfg.chart_height(),
                cfg.dot_spacing,
                cat,
            );
            assert!(axis >= last, "upper={max_upper} lower={max_lower}");
            last = axis;
        }
    }
}

#[test]
fn single_sided_dimension_keeps_the_axis_formula() {
    let cfg = config();
    let records = vec![portrait(1790, "Regular"), portrait(1791, "Regular")];
    // Nobody is a miniature: the upper bucket is empty everywhere.
    let layout = layout_categorical(&records, FilterDimension::Size, &scale(&cfg), &cfg);
    assert_eq!(layout.axis_y, 200.0);
    assert!(layout.points.iter().all(|p| p.y == 220.0));
}

#[test]
fn empty_record_set() {
    let cfg = config();
    let layout = layout_categorical(&[], FilterDimension::Artist, &scale(&cfg), &cfg);
    assert!(layout.points.is_empty());
    assert_eq!(layout.axis_y, 200.0);
    assert!(layout_timeline(&[], &scale(&cfg), &cfg).points.is_empty());
}

#[test]
fn layout_serializes_with_camel_case_keys() {
    let cfg = config();
    let records = vec![portrait(1795, "Miniature")];
    let layout = layout_categorical(&records, FilterDimension::Size, &scale(&cfg), &cfg);
    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["mode"]["kind"], "categorical");
    assert_eq!(json["mode"]["dimension"], "size");
    assert_eq!(json["points"][0]["recordId"], 0);
    assert_eq!(json["points"][0]["bucket"], "upper");
    assert_eq!(json["bucketExtent"]["maxUpper"], 1);
}
