//! Identity-keyed scene state.
//!
//! Every plotted record owns exactly one [`Dot`]. A transition moves matched dots from their
//! last target to their new one, drops dots whose record left the layout, and places new dots
//! directly at their target. The scene is a retained model; [`crate::svg`] turns it into markup.

use crate::svg::{SvgRenderOptions, render_scene_svg};
use crate::tooltip::TooltipContent;
use crate::{Error, Result};
use indexmap::IndexMap;
use remember_me_core::{
    Bucket, ChartConfig, ChartLayout, ChartRenderer, LayoutMode, LayoutUpdate, LinearScale,
    RecordId, TransitionId,
};
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::time::Duration;

/// Number of year ticks requested from the scale.
const AXIS_TICK_COUNT: usize = 10;
/// Distance between the axis line and its year labels.
const TICK_LABEL_OFFSET: f64 = 9.0;
const DIVIDER_OPACITY: f64 = 0.5;
const DIMMED_OPACITY: f64 = 0.15;

/// Cubic in-out easing on `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DotStyle {
    pub radius: f64,
    pub fill: String,
    pub opacity: f64,
}

impl DotStyle {
    fn resolve(year: i32, highlight_year: Option<i32>, config: &ChartConfig) -> Self {
        let theme = &config.theme;
        match highlight_year {
            None => Self {
                radius: config.dot_radius,
                fill: theme.dot_fill.clone(),
                opacity: 1.0,
            },
            Some(h) if h == year => Self {
                radius: config.highlight_radius,
                fill: theme.accent_fill.clone(),
                opacity: 1.0,
            },
            Some(_) => Self {
                radius: config.dot_radius,
                fill: theme.dot_fill.clone(),
                opacity: DIMMED_OPACITY,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dot {
    pub record_id: RecordId,
    pub year: i32,
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub from_style: DotStyle,
    pub style: DotStyle,
    pub tooltip: TooltipContent,
}

impl Dot {
    pub fn moves(&self) -> bool {
        self.from != self.to
    }

    pub fn restyles(&self) -> bool {
        self.from_style != self.style
    }

    /// Position at `progress` (`0.0` start, `1.0` end) of the running transition.
    pub fn position_at(&self, progress: f64) -> (f64, f64) {
        let t = ease_cubic_in_out(progress);
        (
            lerp(self.from.0, self.to.0, t),
            lerp(self.from.1, self.to.1, t),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisState {
    pub from_y: f64,
    pub y: f64,
    /// Year label `y`, relative to the axis line.
    pub from_label_y: f64,
    pub label_y: f64,
    pub labels_were_visible: bool,
    pub labels_visible: bool,
}

impl AxisState {
    pub fn moves(&self) -> bool {
        self.from_y != self.y || self.from_label_y != self.label_y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividerLine {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub stroke: String,
    pub opacity: f64,
}

/// A rotated bucket label at the left edge of the plot area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLabel {
    pub bucket: Bucket,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Retained-mode renderer for [`remember_me_core::ChartSession`].
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    config: ChartConfig,
    scale: LinearScale,
    ticks: Vec<(i32, f64)>,
    dots: IndexMap<RecordId, Dot, FxBuildHasher>,
    axis: Option<AxisState>,
    mode: LayoutMode,
    divider: Option<DividerLine>,
    labels: Vec<CategoryLabel>,
    duration: Duration,
    highlight_year: Option<i32>,
    current: Option<TransitionId>,
    pending: Option<TransitionId>,
    interactions_armed: bool,
}

impl SceneRenderer {
    pub fn new(config: ChartConfig) -> Self {
        let scale = LinearScale::new(
            (config.min_year as f64, config.max_year as f64),
            (0.0, config.chart_width()),
        );
        let ticks = scale
            .ticks(AXIS_TICK_COUNT)
            .into_iter()
            .map(|year| (year.round() as i32, scale.apply(year)))
            .collect();
        Self {
            config,
            scale,
            ticks,
            dots: IndexMap::default(),
            axis: None,
            mode: LayoutMode::Timeline,
            divider: None,
            labels: Vec::new(),
            duration: Duration::ZERO,
            highlight_year: None,
            current: None,
            pending: None,
            interactions_armed: false,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    /// `(year, x)` pairs of the axis ticks.
    pub fn ticks(&self) -> &[(i32, f64)] {
        &self.ticks
    }

    /// Dots in layout emission order.
    pub fn dots(&self) -> impl ExactSizeIterator<Item = &Dot> {
        self.dots.values()
    }

    pub fn dot(&self, id: RecordId) -> Option<&Dot> {
        self.dots.get(&id)
    }

    /// `None` until the first layout arrives.
    pub fn axis(&self) -> Option<&AxisState> {
        self.axis.as_ref()
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn divider(&self) -> Option<&DividerLine> {
        self.divider.as_ref()
    }

    pub fn category_labels(&self) -> &[CategoryLabel] {
        &self.labels
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn highlight_year(&self) -> Option<i32> {
        self.highlight_year
    }

    pub fn current_transition(&self) -> Option<TransitionId> {
        self.current
    }

    /// Whether hover/click handling is live. False while a transition is running.
    pub fn interactions_armed(&self) -> bool {
        self.interactions_armed
    }

    /// Dot positions `progress` of the way through the current transition.
    pub fn frame_at(&self, progress: f64) -> Vec<(RecordId, f64, f64)> {
        self.dots
            .values()
            .map(|dot| {
                let (x, y) = dot.position_at(progress);
                (dot.record_id, x, y)
            })
            .collect()
    }

    /// Tooltip for a dot, if hovering is currently allowed.
    pub fn hover(&self, id: RecordId) -> Option<&TooltipContent> {
        if !self.interactions_armed {
            return None;
        }
        self.dots.get(&id).map(|dot| &dot.tooltip)
    }

    pub fn render_svg(&self, options: &SvgRenderOptions) -> Result<String> {
        render_scene_svg(self, options)
    }

    /// The retained scene as JSON (debugging aid for hosts).
    pub fn to_json(&self) -> Result<serde_json::Value> {
        if self.axis.is_none() {
            return Err(Error::EmptyScene);
        }
        Ok(serde_json::json!({
            "mode": self.mode,
            "transition": self.current,
            "durationMs": self.duration.as_millis() as u64,
            "highlightYear": self.highlight_year,
            "interactionsArmed": self.interactions_armed,
            "axis": self.axis,
            "divider": self.divider,
            "categoryLabels": self.labels,
            "dots": self.dots.values().collect::<Vec<_>>(),
        }))
    }

    fn decorations(&mut self, layout: &ChartLayout) {
        self.labels.clear();
        self.divider = None;
        let LayoutMode::Categorical(dimension) = layout.mode else {
            return;
        };
        let categorical = &self.config.categorical;
        self.divider = Some(DividerLine {
            x1: 0.0,
            x2: self.scale.apply(self.config.max_year as f64),
            y: layout.axis_y,
            stroke: self.config.theme.divider_stroke.clone(),
            opacity: DIVIDER_OPACITY,
        });
        for (bucket, y) in [
            (Bucket::Upper, layout.axis_y - categorical.label_distance),
            (Bucket::Lower, layout.axis_y + categorical.label_distance),
        ] {
            self.labels.push(CategoryLabel {
                bucket,
                text: dimension.label(bucket).to_string(),
                x: categorical.label_x,
                y,
            });
        }
    }
}

impl ChartRenderer for SceneRenderer {
    fn begin_transition(&mut self, update: &LayoutUpdate<'_>) {
        let animate = !update.duration.is_zero();
        let previous = update.previous.map(ChartLayout::by_record);

        let mut dots: IndexMap<RecordId, Dot, FxBuildHasher> =
            IndexMap::with_capacity_and_hasher(update.layout.points.len(), FxBuildHasher);
        for point in &update.layout.points {
            let to = (point.x, point.y);
            let style = DotStyle::resolve(point.year, update.highlight_year, &self.config);
            let (from, from_style) = if !animate {
                (to, style.clone())
            } else if let Some(old) = self.dots.get(&point.record_id) {
                (old.to, old.style.clone())
            } else if let Some(p) = previous.as_ref().and_then(|m| m.get(&point.record_id)) {
                ((p.x, p.y), style.clone())
            } else {
                (to, style.clone())
            };
            let tooltip = update
                .record(point.record_id)
                .map(TooltipContent::for_record)
                .unwrap_or_default();
            dots.insert(
                point.record_id,
                Dot {
                    record_id: point.record_id,
                    year: point.year,
                    from,
                    to,
                    from_style,
                    style,
                    tooltip,
                },
            );
        }
        let removed = self
            .dots
            .keys()
            .filter(|id| !dots.contains_key(*id))
            .count();
        self.dots = dots;

        let chart_height = self.config.chart_height();
        let labels_visible = matches!(update.layout.mode, LayoutMode::Timeline);
        let label_y = if labels_visible {
            TICK_LABEL_OFFSET
        } else {
            chart_height - update.axis_y() + TICK_LABEL_OFFSET
        };
        let next_axis = match self.axis {
            Some(prev) if animate => AxisState {
                from_y: prev.y,
                y: update.axis_y(),
                from_label_y: prev.label_y,
                label_y,
                labels_were_visible: prev.labels_visible,
                labels_visible,
            },
            _ => AxisState {
                from_y: update.axis_y(),
                y: update.axis_y(),
                from_label_y: label_y,
                label_y,
                labels_were_visible: labels_visible,
                labels_visible,
            },
        };
        self.axis = Some(next_axis);
        self.mode = update.layout.mode;
        self.decorations(update.layout);

        self.duration = update.duration;
        self.highlight_year = update.highlight_year;
        self.current = Some(update.id);
        self.pending = Some(update.id);
        self.interactions_armed = false;

        tracing::debug!(
            id = update.id.0,
            mode = %update.layout.mode,
            dots = self.dots.len(),
            removed,
            axis_y = update.axis_y(),
            "scene transition started"
        );
    }

    fn rebind_interactions(&mut self, id: TransitionId) {
        if self.pending != Some(id) {
            tracing::debug!(id = id.0, "ignoring rebind for a superseded transition");
            return;
        }
        self.pending = None;
        self.interactions_armed = true;
    }
}
