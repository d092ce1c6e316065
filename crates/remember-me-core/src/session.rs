use crate::config::ChartConfig;
use crate::dimension::FilterSelection;
use crate::layout::{ChartLayout, LayoutMode, layout_categorical, layout_timeline};
use crate::portrait::{PortraitRecord, RecordId};
use crate::render::{ChartRenderer, LayoutUpdate, TransitionId};
use crate::scale::LinearScale;
use crate::Result;
use std::time::Duration;

/// Owned state of one chart: the record set, its current layout and transition bookkeeping.
///
/// Every mode change is a single synchronous recomputation from the immutable records, followed
/// by one request to the renderer. There are no intermediate states.
#[derive(Debug, Clone)]
pub struct ChartSession {
    records: Vec<PortraitRecord>,
    config: ChartConfig,
    x_scale: LinearScale,
    layout: ChartLayout,
    highlight_year: Option<i32>,
    next_transition: u64,
    latest_transition: Option<TransitionId>,
    interactions_armed: bool,
}

impl ChartSession {
    /// Starts in timeline mode.
    pub fn new(records: Vec<PortraitRecord>, config: ChartConfig) -> Self {
        let x_scale = LinearScale::new(
            (config.min_year as f64, config.max_year as f64),
            (0.0, config.chart_width()),
        );
        let layout = layout_timeline(&records, &x_scale, &config);
        Self {
            records,
            config,
            x_scale,
            layout,
            highlight_year: None,
            next_transition: 0,
            latest_transition: None,
            interactions_armed: true,
        }
    }

    /// Loads the dataset at `path` and starts a session over it.
    ///
    /// Load failures are fatal; no session is produced.
    pub async fn load(path: impl AsRef<std::path::Path>, config: ChartConfig) -> Result<Self> {
        let records = crate::normalize::load_portraits(path, &config).await?;
        Ok(Self::new(records, config))
    }

    pub fn records(&self) -> &[PortraitRecord] {
        &self.records
    }

    pub fn record(&self, id: RecordId) -> Option<&PortraitRecord> {
        self.records.get(id.0)
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn scale(&self) -> &LinearScale {
        &self.x_scale
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn mode(&self) -> LayoutMode {
        self.layout.mode
    }

    pub fn highlighted_year(&self) -> Option<i32> {
        self.highlight_year
    }

    pub fn latest_transition(&self) -> Option<TransitionId> {
        self.latest_transition
    }

    /// `false` while a transition is in flight.
    pub fn interactions_armed(&self) -> bool {
        self.interactions_armed
    }

    /// Pure layout pass for `mode` over this session's records.
    pub fn compute_layout(&self, mode: LayoutMode) -> ChartLayout {
        match mode {
            LayoutMode::Timeline => layout_timeline(&self.records, &self.x_scale, &self.config),
            LayoutMode::Categorical(dimension) => {
                layout_categorical(&self.records, dimension, &self.x_scale, &self.config)
            }
        }
    }

    /// Hands the current layout to `renderer` without animation.
    pub fn present<R: ChartRenderer + ?Sized>(&mut self, renderer: &mut R) -> TransitionId {
        self.emit(None, Duration::ZERO, renderer)
    }

    /// Switches to `selection` and asks `renderer` to animate there.
    ///
    /// Any year highlight is cleared. A new selection supersedes a transition that has not
    /// completed yet.
    pub fn select<R: ChartRenderer + ?Sized>(
        &mut self,
        selection: FilterSelection,
        renderer: &mut R,
    ) -> TransitionId {
        let mode = LayoutMode::from(selection);
        let next = self.compute_layout(mode);
        let previous = std::mem::replace(&mut self.layout, next);
        self.highlight_year = None;
        tracing::info!(
            from = %previous.mode,
            to = %mode,
            points = self.layout.points.len(),
            "chart mode change"
        );
        self.emit(Some(previous), self.config.transition_duration(), renderer)
    }

    /// Like [`ChartSession::select`], for a raw selector value.
    ///
    /// Unknown values leave the current layout untouched and return `None`.
    pub fn select_named<R: ChartRenderer + ?Sized>(
        &mut self,
        name: &str,
        renderer: &mut R,
    ) -> Option<TransitionId> {
        match name.parse::<FilterSelection>() {
            Ok(selection) => Some(self.select(selection, renderer)),
            Err(err) => {
                tracing::warn!(%err, "ignoring filter selection");
                None
            }
        }
    }

    /// Emphasizes one year's stack (the "spike" view) in place.
    pub fn highlight_year<R: ChartRenderer + ?Sized>(
        &mut self,
        year: i32,
        renderer: &mut R,
    ) -> TransitionId {
        self.highlight_year = Some(year);
        let same = self.layout.clone();
        self.emit(Some(same), self.config.transition_duration(), renderer)
    }

    pub fn clear_highlight<R: ChartRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
    ) -> TransitionId {
        self.highlight_year = None;
        let same = self.layout.clone();
        self.emit(Some(same), self.config.transition_duration(), renderer)
    }

    /// Completion notification from the renderer.
    ///
    /// Only the most recent transition re-arms interactions; completions of superseded
    /// transitions are ignored and return `false`.
    pub fn transition_complete<R: ChartRenderer + ?Sized>(
        &mut self,
        id: TransitionId,
        renderer: &mut R,
    ) -> bool {
        if self.latest_transition != Some(id) {
            tracing::debug!(
                id = id.0,
                latest = ?self.latest_transition.map(|t| t.0),
                "stale transition completion"
            );
            return false;
        }
        self.interactions_armed = true;
        renderer.rebind_interactions(id);
        true
    }

    fn emit<R: ChartRenderer + ?Sized>(
        &mut self,
        previous: Option<ChartLayout>,
        duration: Duration,
        renderer: &mut R,
    ) -> TransitionId {
        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        self.latest_transition = Some(id);
        self.interactions_armed = false;

        let update = LayoutUpdate {
            id,
            previous: previous.as_ref(),
            layout: &self.layout,
            duration,
            highlight_year: self.highlight_year,
            records: &self.records,
        };
        renderer.begin_transition(&update);
        id
    }
}
