//! The seam between layout and whatever draws the chart.
//!
//! The engine never animates anything itself. After each recomputation it hands a
//! [`LayoutUpdate`] to a [`ChartRenderer`]; the renderer animates from the previous positions to
//! the new ones, matching elements by [`RecordId`](crate::RecordId), and later reports completion
//! through [`ChartSession::transition_complete`](crate::ChartSession::transition_complete).

use crate::layout::ChartLayout;
use crate::portrait::PortraitRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Monotonic id of a requested transition. Newer ids supersede older ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionId(pub u64);

/// Everything a renderer needs to move from the current picture to the next one.
#[derive(Debug, Clone, Copy)]
pub struct LayoutUpdate<'a> {
    pub id: TransitionId,
    /// `None` for the first draw.
    pub previous: Option<&'a ChartLayout>,
    pub layout: &'a ChartLayout,
    pub duration: Duration,
    pub highlight_year: Option<i32>,
    /// The record set the layout's ids point into.
    pub records: &'a [PortraitRecord],
}

impl LayoutUpdate<'_> {
    pub fn axis_y(&self) -> f64 {
        self.layout.axis_y
    }

    pub fn record(&self, id: crate::RecordId) -> Option<&PortraitRecord> {
        self.records.get(id.0)
    }
}

/// Render/transition collaborator.
///
/// Implementations must key visual elements by record id, drop elements whose id is absent
/// from the new layout, and keep hover/click handling bound across transitions once
/// [`ChartRenderer::rebind_interactions`] is called.
pub trait ChartRenderer {
    fn begin_transition(&mut self, update: &LayoutUpdate<'_>);

    /// Called once the latest transition has finished.
    fn rebind_interactions(&mut self, id: TransitionId);
}
