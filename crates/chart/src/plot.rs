use configuration::ChartSettings;
use core_types::HoverState;
use events::ChartKind;

use crate::fan_view::FanChartView;
use crate::layout::Layout;
use crate::price_chart::PriceChart;
use crate::surface::Surface;

pub(crate) const BACKGROUND: &str = "#ffffff";
pub(crate) const GUIDE_COLOR: &str = "#bbbbbb";

/// Something a chart instance can draw and hover over.
pub trait Plot {
    fn kind(&self) -> ChartKind;

    /// Number of horizontal positions the crosshair can snap to.
    fn buckets(&self) -> usize;

    /// Nothing to draw; the placeholder is shown instead.
    fn is_empty(&self) -> bool;

    /// Legend values shown while nothing is hovered.
    fn baseline(&self) -> HoverState;

    /// Legend values for a bucket, or `None` if the bucket carries none.
    fn hover(&self, bucket: usize) -> Option<HoverState>;

    /// Draws one complete frame, with a crosshair at `crosshair` if given.
    fn render(
        &self,
        surface: &mut dyn Surface,
        layout: &Layout,
        settings: &ChartSettings,
        crosshair: Option<usize>,
    );
}

/// The two chart variants a container can host.
#[derive(Debug, Clone)]
pub enum ChartModel {
    Price(PriceChart),
    Fan(FanChartView),
}

impl From<PriceChart> for ChartModel {
    fn from(chart: PriceChart) -> Self {
        ChartModel::Price(chart)
    }
}

impl From<FanChartView> for ChartModel {
    fn from(view: FanChartView) -> Self {
        ChartModel::Fan(view)
    }
}

impl ChartModel {
    fn as_plot(&self) -> &dyn Plot {
        match self {
            ChartModel::Price(chart) => chart,
            ChartModel::Fan(view) => view,
        }
    }
}

impl Plot for ChartModel {
    fn kind(&self) -> ChartKind {
        self.as_plot().kind()
    }

    fn buckets(&self) -> usize {
        self.as_plot().buckets()
    }

    fn is_empty(&self) -> bool {
        self.as_plot().is_empty()
    }

    fn baseline(&self) -> HoverState {
        self.as_plot().baseline()
    }

    fn hover(&self, bucket: usize) -> Option<HoverState> {
        self.as_plot().hover(bucket)
    }

    fn render(
        &self,
        surface: &mut dyn Surface,
        layout: &Layout,
        settings: &ChartSettings,
        crosshair: Option<usize>,
    ) {
        self.as_plot().render(surface, layout, settings, crosshair)
    }
}

/// Vertical crosshair line through a bucket.
pub(crate) fn draw_crosshair(surface: &mut dyn Surface, layout: &Layout, bucket: usize, count: usize) {
    let x = layout.x_for(bucket, count);
    surface.draw_polyline(
        &[(x, layout.top()), (x, layout.bottom())],
        crate::surface::Stroke {
            color: GUIDE_COLOR,
            width: 1.0,
            dashed: true,
        },
    );
}
