use crate::error::AnalyticsError;
use crate::report::{ReturnReport, ReturnRow};
use chrono::NaiveDate;
use core_types::{Period, PriceField, PricePoint, ReturnFigure};
use price_store::PriceSeries;

/// A stateless calculator for period-over-period returns.
///
/// "Today" is injected at construction instead of read from a clock, so the
/// same series and date always produce the same figures.
#[derive(Debug, Clone, Copy)]
pub struct ReturnCalculator {
    today: NaiveDate,
}

impl ReturnCalculator {
    pub fn as_of(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Percentage return of `field` over `period`, or `None` when undefined.
    pub fn compute_return(
        &self,
        series: &PriceSeries,
        period: Period,
        field: PriceField,
    ) -> Option<f64> {
        self.compute_figure(series, period, field).percent_change
    }

    /// Same as [`compute_return`](Self::compute_return) for a selector label
    /// such as `"3개월"`.
    pub fn compute_by_label(
        &self,
        series: &PriceSeries,
        label: &str,
        field: PriceField,
    ) -> Result<Option<f64>, AnalyticsError> {
        let period: Period = label.parse()?;
        Ok(self.compute_return(series, period, field))
    }

    /// The full figure, including the two prices the percentage was derived from.
    pub fn compute_figure(
        &self,
        series: &PriceSeries,
        period: Period,
        field: PriceField,
    ) -> ReturnFigure {
        let current = series.latest();
        let basis = period
            .target_date(self.today)
            .and_then(|target| closest_at_or_before(series, target));

        let comparison_price = current.and_then(|p| p.price(field));
        let basis_price = basis.and_then(|p| p.price(field));
        let percent_change = match (comparison_price, basis_price) {
            (Some(current), Some(basis)) => percent_change(current, basis),
            _ => None,
        };

        tracing::trace!(
            period = %period,
            ?field,
            basis_date = ?basis.map(|p| p.trade_date),
            ?percent_change,
            "Computed period return."
        );

        ReturnFigure {
            period_label: period.label().to_string(),
            percent_change,
            basis_price,
            comparison_price,
        }
    }

    /// Every period for every field: the ETF detail returns table.
    #[tracing::instrument(name = "return_report", skip(self, series), fields(points = series.len()))]
    pub fn report(&self, series: &PriceSeries) -> ReturnReport {
        let rows = Period::ALL
            .iter()
            .map(|&period| ReturnRow {
                period,
                nav: self.compute_figure(series, period, PriceField::Nav),
                market: self.compute_figure(series, period, PriceField::Market),
                index: self.compute_figure(series, period, PriceField::Index),
            })
            .collect();

        ReturnReport {
            as_of: self.today,
            latest_date: series.latest().map(|p| p.trade_date),
            rows,
        }
    }
}

/// Free-function form of [`ReturnCalculator::compute_return`].
pub fn compute_return(
    series: &PriceSeries,
    period: Period,
    field: PriceField,
    today: NaiveDate,
) -> Option<f64> {
    ReturnCalculator::as_of(today).compute_return(series, period, field)
}

/// The most recent observation dated on or before `target`.
///
/// The target itself is often a weekend or holiday, so the scan walks the
/// series most-recent-first and stops at the first trading day that qualifies.
pub fn closest_at_or_before(series: &PriceSeries, target: NaiveDate) -> Option<&PricePoint> {
    series.descending().find(|p| p.trade_date <= target)
}

/// `(current - basis) / basis × 100`, undefined for a zero basis.
pub fn percent_change(current: f64, basis: f64) -> Option<f64> {
    if basis == 0.0 {
        return None;
    }
    let change = (current - basis) / basis * 100.0;
    change.is_finite().then_some(change)
}

/// Formats a percentage for display with two decimals and an explicit sign.
///
/// `None` renders as `empty_marker`; values that round to zero render as `0.00`.
pub fn format_percent(value: Option<f64>, empty_marker: &str) -> String {
    match value {
        Some(v) if v.is_finite() => {
            if (v * 100.0).round() == 0.0 {
                "0.00".to_string()
            } else {
                format!("{v:+.2}")
            }
        }
        _ => empty_marker.to_string(),
    }
}
