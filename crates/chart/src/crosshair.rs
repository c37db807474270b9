use core_types::HoverState;
use events::{ChartEvent, HoverMoved};

use crate::layout::Layout;
use crate::plot::Plot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrosshairState {
    #[default]
    Idle,
    Hovering { bucket: usize },
}

/// Tracks the pointer over one chart and the legend values it implies.
///
/// Every move that lands on a bucket replaces the published values wholesale,
/// so the legend always shows the most recent pointer position.
#[derive(Debug, Clone)]
pub struct Crosshair {
    state: CrosshairState,
    hover: HoverState,
    baseline: HoverState,
}

impl Crosshair {
    pub fn new(baseline: HoverState) -> Self {
        Self {
            state: CrosshairState::Idle,
            hover: baseline,
            baseline,
        }
    }

    pub fn state(&self) -> CrosshairState {
        self.state
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover
    }

    pub fn bucket(&self) -> Option<usize> {
        match self.state {
            CrosshairState::Idle => None,
            CrosshairState::Hovering { bucket } => Some(bucket),
        }
    }

    pub fn pointer_move(&mut self, plot: &dyn Plot, layout: &Layout, x: f64, y: f64) -> Option<ChartEvent> {
        let count = plot.buckets();
        let resolved = layout
            .nearest_bucket(x, y, count)
            .and_then(|bucket| plot.hover(bucket).map(|state| (bucket, state)));

        let Some((bucket, state)) = resolved else {
            return self.pointer_leave();
        };
        self.state = CrosshairState::Hovering { bucket };
        self.hover = state;
        tracing::trace!(bucket, "Crosshair moved.");
        Some(ChartEvent::HoverMoved(HoverMoved {
            bucket,
            x: layout.x_for(bucket, count),
            trade_date: state.trade_date,
            state,
        }))
    }

    /// Returns to the baseline. Emits nothing if already idle.
    pub fn pointer_leave(&mut self) -> Option<ChartEvent> {
        if self.state == CrosshairState::Idle {
            return None;
        }
        self.state = CrosshairState::Idle;
        self.hover = self.baseline;
        Some(ChartEvent::HoverCleared(self.baseline))
    }
}
