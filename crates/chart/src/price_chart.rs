use analytics::percent_change;
use chrono::NaiveDate;
use configuration::ChartSettings;
use core_types::{HoverState, PriceField, PricePoint};
use events::ChartKind;
use interpolation::{PipelineOptions, percent_returns, repair_masked_with, sentinel_mask};
use price_store::PriceSeries;

use crate::layout::{Layout, ValueScale};
use crate::plot::{BACKGROUND, GUIDE_COLOR, Plot, draw_crosshair};
use crate::surface::{Stroke, Surface, TextAnchor};

const LINE_WIDTH: f64 = 1.5;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// NAV, market price and index plotted as cumulative returns over one window.
///
/// The plotted lines go through sentinel repair and smoothing. Hover values
/// never do: they are read from the stored observation for the hovered date.
#[derive(Debug, Clone)]
pub struct PriceChart {
    series: PriceSeries,
    /// One plotted line per entry of `PriceField::ALL`.
    lines: [Vec<Option<f64>>; 3],
}

fn slot(field: PriceField) -> usize {
    match field {
        PriceField::Nav => 0,
        PriceField::Market => 1,
        PriceField::Index => 2,
    }
}

/// First usable price of a field, oldest first.
fn first_valid(series: &PriceSeries, field: PriceField) -> Option<f64> {
    series
        .ascending()
        .iter()
        .filter_map(|p| p.price(field))
        .find(|v| v.is_finite() && *v != 0.0)
}

impl PriceChart {
    pub fn new(series: PriceSeries, options: PipelineOptions) -> Self {
        let lines = PriceField::ALL.map(|field| {
            let levels = series.values(field);
            // Gaps are decided on prices; a 0% return is a real observation.
            let missing = sentinel_mask(&levels);
            let base = first_valid(&series, field);
            repair_masked_with(&percent_returns(&levels, base), &missing, options)
        });
        tracing::debug!(points = series.len(), smoothing = options.smoothing, "Built price chart.");
        Self { series, lines }
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    /// The plotted (repaired and smoothed) cumulative returns of one field.
    pub fn line(&self, field: PriceField) -> &[Option<f64>] {
        &self.lines[slot(field)]
    }

    /// Legend values for the observation traded on `date`.
    pub fn hover_at(&self, date: NaiveDate) -> Option<HoverState> {
        self.series.position(date).and_then(|bucket| self.hover(bucket))
    }

    fn state_for(&self, point: &PricePoint) -> HoverState {
        let latest = self.series.latest();
        let mut state = HoverState {
            trade_date: Some(point.trade_date),
            ..HoverState::default()
        };
        for field in PriceField::ALL {
            let price = point.price(field);
            let current = latest.and_then(|l| l.price(field));
            let change = match (current, price) {
                (Some(current), Some(basis)) => percent_change(current, basis),
                _ => None,
            };
            state.set(field, price, change);
        }
        state
    }

    fn points(&self, layout: &Layout, scale: &ValueScale, field: PriceField) -> Vec<Vec<(f64, f64)>> {
        let line = self.line(field);
        let count = line.len();
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (i, value) in line.iter().enumerate() {
            match value {
                Some(v) => current.push((layout.x_for(i, count), layout.y_for(*v, scale))),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    fn color<'a>(settings: &'a ChartSettings, field: PriceField) -> &'a str {
        match field {
            PriceField::Nav => &settings.nav_color,
            PriceField::Market => &settings.market_color,
            PriceField::Index => &settings.index_color,
        }
    }
}

impl Plot for PriceChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Price
    }

    fn buckets(&self) -> usize {
        self.series.len()
    }

    fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.iter().all(Option::is_none))
    }

    /// Latest prices, with returns measured over the whole window.
    fn baseline(&self) -> HoverState {
        let Some(latest) = self.series.latest() else {
            return HoverState::default();
        };
        let mut state = HoverState {
            trade_date: Some(latest.trade_date),
            ..HoverState::default()
        };
        for field in PriceField::ALL {
            let price = latest.price(field);
            let change = match (price, first_valid(&self.series, field)) {
                (Some(current), Some(basis)) => percent_change(current, basis),
                _ => None,
            };
            state.set(field, price, change);
        }
        state
    }

    fn hover(&self, bucket: usize) -> Option<HoverState> {
        self.series
            .ascending()
            .get(bucket)
            .map(|point| self.state_for(point))
    }

    fn render(
        &self,
        surface: &mut dyn Surface,
        layout: &Layout,
        settings: &ChartSettings,
        crosshair: Option<usize>,
    ) {
        surface.begin_frame(layout.width, layout.height, BACKGROUND);
        let plotted = self.lines.iter().flatten().flatten().copied();
        let scale = match ValueScale::from_values(plotted.chain(std::iter::once(0.0))) {
            Some(scale) if !self.is_empty() => scale,
            _ => {
                surface.draw_placeholder(&settings.empty_message);
                return;
            }
        };

        let zero = layout.y_for(0.0, &scale);
        surface.draw_polyline(
            &[(layout.left(), zero), (layout.right(), zero)],
            Stroke {
                color: GUIDE_COLOR,
                width: 0.5,
                dashed: false,
            },
        );
        surface.draw_text(layout.left() - 4.0, layout.top(), &format!("{:+.1}%", scale.max), TextAnchor::End);
        surface.draw_text(layout.left() - 4.0, layout.bottom(), &format!("{:+.1}%", scale.min), TextAnchor::End);

        for field in PriceField::ALL {
            let stroke = Stroke {
                color: Self::color(settings, field),
                width: LINE_WIDTH,
                dashed: false,
            };
            for segment in self.points(layout, &scale, field) {
                surface.draw_polyline(&segment, stroke);
            }
        }

        if let (Some(first), Some(last)) = (self.series.earliest(), self.series.latest()) {
            let label_y = layout.bottom() + 16.0;
            surface.draw_text(layout.left(), label_y, &first.trade_date.format(DATE_FORMAT).to_string(), TextAnchor::Start);
            surface.draw_text(layout.right(), label_y, &last.trade_date.format(DATE_FORMAT).to_string(), TextAnchor::End);
        }

        if let Some(bucket) = crosshair {
            draw_crosshair(surface, layout, bucket, self.buckets());
        }
    }
}
