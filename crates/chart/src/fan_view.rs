use configuration::ChartSettings;
use core_types::HoverState;
use events::ChartKind;
use fan_chart::FanChart;

use crate::layout::{Layout, ValueScale};
use crate::plot::{BACKGROUND, Plot, draw_crosshair};
use crate::surface::{Stroke, Surface, TextAnchor};

const OUTER_BAND_OPACITY: f64 = 0.6;
const INNER_BAND_OPACITY: f64 = 0.8;
const MEDIAN_WIDTH: f64 = 2.5;
const PRINCIPAL_WIDTH: f64 = 1.5;
const SAMPLE_WIDTH: f64 = 1.0;

/// Draws a normalized simulation result.
///
/// Paint order is fixed: the 5–95 band, the 25–75 band, the thin sample
/// lines, the dashed principal line and finally the bold median.
#[derive(Debug, Clone)]
pub struct FanChartView {
    chart: Option<FanChart>,
}

impl FanChartView {
    pub fn new(chart: FanChart) -> Self {
        Self { chart: Some(chart) }
    }

    /// A view with nothing to show, used when the payload was rejected.
    pub fn empty() -> Self {
        Self { chart: None }
    }

    pub fn chart(&self) -> Option<&FanChart> {
        self.chart.as_ref()
    }
}

fn to_points(values: &[f64], layout: &Layout, scale: &ValueScale) -> Vec<(f64, f64)> {
    let count = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (layout.x_for(i, count), layout.y_for(*v, scale)))
        .collect()
}

impl Plot for FanChartView {
    fn kind(&self) -> ChartKind {
        ChartKind::Fan
    }

    fn buckets(&self) -> usize {
        self.chart.as_ref().map_or(0, FanChart::len)
    }

    fn is_empty(&self) -> bool {
        self.buckets() == 0
    }

    fn baseline(&self) -> HoverState {
        HoverState::default()
    }

    /// Simulated months carry no NAV, market or index values.
    fn hover(&self, _bucket: usize) -> Option<HoverState> {
        None
    }

    fn render(
        &self,
        surface: &mut dyn Surface,
        layout: &Layout,
        settings: &ChartSettings,
        crosshair: Option<usize>,
    ) {
        surface.begin_frame(layout.width, layout.height, BACKGROUND);
        let Some(chart) = self.chart.as_ref().filter(|c| !c.is_empty()) else {
            surface.draw_placeholder(&settings.empty_message);
            return;
        };
        let Some(scale) = ValueScale::from_values(chart.all_values()) else {
            surface.draw_placeholder(&settings.empty_message);
            return;
        };
        let points = |values: &[f64]| to_points(values, layout, &scale);

        if let Some(bands) = &chart.bands {
            surface.fill_band(&points(&bands.p95), &points(&bands.p05), &settings.outer_band_color, OUTER_BAND_OPACITY);
            surface.fill_band(&points(&bands.p75), &points(&bands.p25), &settings.inner_band_color, INNER_BAND_OPACITY);
        }

        let thin = Stroke {
            color: &settings.sample_color,
            width: SAMPLE_WIDTH,
            dashed: false,
        };
        for line in &chart.lines {
            surface.draw_polyline(&points(&line.values), thin);
        }

        if let Some(principal) = &chart.principal_line {
            surface.draw_polyline(
                &points(principal),
                Stroke {
                    color: &settings.principal_color,
                    width: PRINCIPAL_WIDTH,
                    dashed: true,
                },
            );
        }

        if let Some(bands) = &chart.bands {
            surface.draw_polyline(
                &points(&bands.p50),
                Stroke {
                    color: &settings.median_color,
                    width: MEDIAN_WIDTH,
                    dashed: false,
                },
            );
        }

        let label_y = layout.bottom() + 16.0;
        for tick in &chart.ticks {
            surface.draw_text(layout.x_for(tick.index, chart.len()), label_y, &tick.label, TextAnchor::Middle);
        }

        if let Some(bucket) = crosshair {
            draw_crosshair(surface, layout, bucket, chart.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use fan_chart::FanChartOptions;
    use serde_json::json;

    fn layout() -> Layout {
        Layout::from_settings(&ChartSettings::default())
    }

    #[test]
    fn legacy_chart_draws_only_sample_lines() {
        let raw = json!([[1.0, 2.0, 3.0], [1.0, 1.5, 2.0], [1.0, 0.5, 0.2]]);
        let chart = fan_chart::normalize(&raw, &FanChartOptions::default()).unwrap();
        let view = FanChartView::new(chart);
        let mut surface = RecordingSurface::new();
        view.render(&mut surface, &layout(), &ChartSettings::default(), None);

        assert!(!surface.ops.iter().any(|op| matches!(op, DrawOp::Band { .. })));
        assert_eq!(surface.polylines().count(), 3);
        assert!(surface.placeholder().is_none());
    }

    #[test]
    fn rejected_payload_shows_placeholder() {
        let view = FanChartView::empty();
        assert!(view.is_empty());
        let mut surface = RecordingSurface::new();
        view.render(&mut surface, &layout(), &ChartSettings::default(), None);
        assert_eq!(surface.placeholder(), Some("No data available."));
    }
}
