use crate::error::FanChartError;
use crate::payload::{FanBands, FanChartPayload, StructuredPayload};
use serde::Serialize;

/// Months folded into one point when a legacy path is shown per year.
pub const MONTHS_PER_YEAR: usize = 12;

/// Terminal percentiles used to pick representative legacy paths, most
/// important first. The median path is kept even when only one line fits.
const REPRESENTATIVE_PRIORITY: [f64; 5] = [0.50, 0.05, 0.95, 0.25, 0.75];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanChartOptions {
    /// Ticks (and, for legacy payloads, points) on the horizontal axis.
    /// `None` derives it from the simulated length.
    pub target_years: Option<u32>,
    /// Thin sample lines drawn over the bands.
    pub max_sample_paths: usize,
}

impl Default for FanChartOptions {
    fn default() -> Self {
        Self {
            target_years: None,
            max_sample_paths: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FanChartShape {
    Legacy,
    Structured,
}

/// A labelled thin line drawn over the bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleLine {
    pub label: String,
    pub values: Vec<f64>,
}

/// A horizontal-axis tick at a point index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub index: usize,
    pub label: String,
}

/// Terminal outcome of the simulation, for the goal planner's summary line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FanSummary {
    pub years: u32,
    pub terminal_p05: f64,
    pub terminal_p50: f64,
    pub terminal_p95: f64,
    /// Total contributions at the horizon, when the payload carries them.
    pub principal: Option<f64>,
}

/// Render-ready simulation result. Every array has `len` entries and index `i`
/// is the same point in time across all of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanChart {
    pub shape: FanChartShape,
    pub len: usize,
    pub bands: Option<FanBands>,
    pub principal_line: Option<Vec<f64>>,
    pub lines: Vec<SampleLine>,
    pub ticks: Vec<AxisTick>,
    pub summary: FanSummary,
}

impl FanChart {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn summary(&self) -> FanSummary {
        self.summary
    }

    /// Every plotted array, for computing the value extent.
    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        let bands = self
            .bands
            .iter()
            .flat_map(|b| b.named().into_iter().flat_map(|(_, values)| values.iter().copied()));
        let principal = self.principal_line.iter().flatten().copied();
        let lines = self.lines.iter().flat_map(|l| l.values.iter().copied());
        bands.chain(principal).chain(lines)
    }
}

/// Builds the render-ready chart from a decoded payload.
pub fn from_payload(
    payload: FanChartPayload,
    options: &FanChartOptions,
) -> Result<FanChart, FanChartError> {
    match payload {
        FanChartPayload::Legacy(paths) => from_legacy(paths, options),
        FanChartPayload::Structured(structured) => from_structured(*structured, options),
    }
}

fn from_structured(
    payload: StructuredPayload,
    options: &FanChartOptions,
) -> Result<FanChart, FanChartError> {
    let len = payload.fan_bands.p50.len();
    if len == 0 {
        return Err(FanChartError::Empty);
    }

    for (field, values) in payload.fan_bands.named() {
        check_len(field, len, values.len())?;
    }
    let principal_line = if payload.principal_line.is_empty() {
        None
    } else {
        check_len("principal_line", len, payload.principal_line.len())?;
        Some(payload.principal_line)
    };
    if let Some(declared) = payload.x_axis.as_ref().and_then(|axis| axis.length) {
        check_len("x_axis.length", len, declared)?;
    }

    let mut candidates = Vec::new();
    if let Some(rep) = payload.representative {
        for (label, values) in [("p95", rep.p95), ("p50", rep.p50), ("p05", rep.p05)] {
            if !values.is_empty() {
                check_len(&format!("representative.{label}"), len, values.len())?;
                candidates.push(SampleLine {
                    label: format!("representative {label}"),
                    values,
                });
            }
        }
    }
    for (i, values) in payload.random_samples.into_iter().enumerate() {
        check_len(&format!("random_samples[{i}]"), len, values.len())?;
        candidates.push(SampleLine {
            label: format!("sample {}", i + 1),
            values,
        });
    }
    candidates.truncate(options.max_sample_paths);

    let years = target_years(options, len);
    let bands = payload.fan_bands;
    let summary = FanSummary {
        years,
        terminal_p05: bands.p05[len - 1],
        terminal_p50: bands.p50[len - 1],
        terminal_p95: bands.p95[len - 1],
        principal: principal_line.as_ref().and_then(|p| p.last().copied()),
    };

    Ok(FanChart {
        shape: FanChartShape::Structured,
        len,
        bands: Some(bands),
        principal_line,
        lines: candidates,
        ticks: monthly_ticks(len, years),
        summary,
    })
}

fn from_legacy(
    paths: Vec<Vec<f64>>,
    options: &FanChartOptions,
) -> Result<FanChart, FanChartError> {
    let Some(months) = paths.first().map(Vec::len).filter(|len| *len > 0) else {
        return Err(FanChartError::Empty);
    };
    for (i, path) in paths.iter().enumerate() {
        check_len(&format!("paths[{i}]"), months, path.len())?;
    }

    let years = target_years(options, months);
    let mut terminals: Vec<f64> = paths.iter().map(|p| p[months - 1]).collect();
    terminals.sort_by(f64::total_cmp);

    let selected = select_representative(&paths, options.max_sample_paths);
    let downsample = years > 1;
    let lines: Vec<SampleLine> = selected
        .into_iter()
        .map(|(rank, idx)| SampleLine {
            label: format!("path p{:02}", (rank * 100.0).round() as u32),
            values: if downsample {
                yearly_means(&paths[idx], years as usize)
            } else {
                paths[idx].clone()
            },
        })
        .collect();

    let (len, ticks) = if downsample {
        let ticks = (0..years as usize)
            .map(|y| AxisTick {
                index: y,
                label: year_label(y as u32 + 1),
            })
            .collect();
        (years as usize, ticks)
    } else {
        (months, monthly_ticks(months, years))
    };

    tracing::debug!(
        paths = paths.len(),
        lines = lines.len(),
        years,
        "Normalized legacy simulation paths."
    );

    Ok(FanChart {
        shape: FanChartShape::Legacy,
        len,
        bands: None,
        principal_line: None,
        lines,
        ticks,
        summary: FanSummary {
            years,
            terminal_p05: percentile(&terminals, 0.05),
            terminal_p50: percentile(&terminals, 0.50),
            terminal_p95: percentile(&terminals, 0.95),
            principal: None,
        },
    })
}

fn check_len(field: &str, expected: usize, found: usize) -> Result<(), FanChartError> {
    if expected == found {
        Ok(())
    } else {
        Err(FanChartError::LengthMismatch {
            field: field.to_string(),
            expected,
            found,
        })
    }
}

fn target_years(options: &FanChartOptions, months: usize) -> u32 {
    options
        .target_years
        .unwrap_or_else(|| months.div_ceil(MONTHS_PER_YEAR) as u32)
        .max(1)
}

fn year_label(year: u32) -> String {
    format!("{year}년")
}

/// One tick per simulated year, placed on the last month of that year and
/// clamped to the final point. Years beyond the data get no tick.
pub fn monthly_ticks(len: usize, years: u32) -> Vec<AxisTick> {
    if len == 0 {
        return Vec::new();
    }
    let years = years.min(len.div_ceil(MONTHS_PER_YEAR) as u32);
    (1..=years)
        .map(|year| AxisTick {
            index: (year as usize * MONTHS_PER_YEAR - 1).min(len - 1),
            label: year_label(year),
        })
        .collect()
}

/// Picks up to `max` paths by the rank of their terminal value.
///
/// Returns `(percentile, path index)` pairs ordered from lowest to highest
/// percentile. With `max` or fewer paths every path is kept.
pub fn select_representative(paths: &[Vec<f64>], max: usize) -> Vec<(f64, usize)> {
    let mut order: Vec<usize> = (0..paths.len()).collect();
    order.sort_by(|&a, &b| terminal(&paths[a]).total_cmp(&terminal(&paths[b])));

    let n = order.len();
    if n == 0 || max == 0 {
        return Vec::new();
    }
    if n <= max {
        return order
            .iter()
            .enumerate()
            .map(|(rank, &idx)| (rank_fraction(rank, n), idx))
            .collect();
    }

    let mut picked: Vec<(f64, usize)> = Vec::with_capacity(max);
    for q in REPRESENTATIVE_PRIORITY.iter().take(max) {
        let rank = (q * (n - 1) as f64).round() as usize;
        if picked.iter().all(|(_, idx)| *idx != order[rank]) {
            picked.push((*q, order[rank]));
        }
    }
    picked.sort_by(|a, b| a.0.total_cmp(&b.0));
    picked
}

fn terminal(path: &[f64]) -> f64 {
    path.last().copied().unwrap_or(f64::NAN)
}

fn rank_fraction(rank: usize, n: usize) -> f64 {
    if n <= 1 {
        0.5
    } else {
        rank as f64 / (n - 1) as f64
    }
}

/// Averages consecutive runs of a monthly path into `years` points.
///
/// Runs are `len / years` months long (about twelve); a path shorter than
/// `years` repeats its nearest month instead of producing empty runs.
pub fn yearly_means(path: &[f64], years: usize) -> Vec<f64> {
    let len = path.len();
    if len == 0 || years == 0 {
        return Vec::new();
    }
    (0..years)
        .map(|y| {
            let start = y * len / years;
            let end = (y + 1) * len / years;
            if end <= start {
                path[start.min(len - 1)]
            } else {
                let run = &path[start..end];
                run.iter().sum::<f64>() / run.len() as f64
            }
        })
        .collect()
}

/// Linear-interpolation percentile on a sorted slice.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn yearly_means_average_twelve_month_runs() {
        let path: Vec<f64> = (1..=24).map(f64::from).collect();
        let years = yearly_means(&path, 2);
        assert_eq!(years.len(), 2);
        assert_relative_eq!(years[0], 6.5);
        assert_relative_eq!(years[1], 18.5);
    }

    #[test]
    fn yearly_means_handles_short_paths() {
        assert_eq!(yearly_means(&[1.0, 2.0], 3), vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn ticks_land_on_year_ends() {
        let ticks = monthly_ticks(30, 3);
        let indices: Vec<usize> = ticks.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![11, 23, 29]);
        assert_eq!(ticks[0].label, "1년");
    }

    #[test]
    fn ticks_stop_at_the_data_horizon() {
        let ticks = monthly_ticks(24, 10);
        let indices: Vec<usize> = ticks.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![11, 23]);
        assert_eq!(ticks.last().unwrap().label, "2년");
    }

    #[test]
    fn representative_selection_follows_terminal_rank() {
        let paths: Vec<Vec<f64>> = (0..21).map(|i| vec![0.0, f64::from(20 - i)]).collect();
        let picked = select_representative(&paths, 5);
        let terminals: Vec<f64> = picked.iter().map(|(_, idx)| paths[*idx][1]).collect();
        assert_eq!(terminals, vec![1.0, 5.0, 10.0, 15.0, 19.0]);
    }

    #[test]
    fn small_path_sets_are_kept_whole() {
        let paths = vec![vec![3.0], vec![1.0], vec![2.0]];
        let picked = select_representative(&paths, 5);
        assert_eq!(picked.len(), 3);
        assert_eq!(picked[0].1, 1);
        assert!(select_representative(&paths, 0).is_empty());
    }

    #[test]
    fn limited_selection_keeps_the_median_first() {
        let paths: Vec<Vec<f64>> = (0..11).map(|i| vec![f64::from(i)]).collect();
        let picked = select_representative(&paths, 1);
        assert_eq!(picked, vec![(0.5, 5)]);
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile(&sorted, 0.5), 3.0);
        assert_relative_eq!(percentile(&sorted, 0.25), 2.0);
        assert_relative_eq!(percentile(&sorted, 0.1), 1.4);
        assert!(percentile(&[], 0.5).is_nan());
    }

    proptest! {
        #[test]
        fn prop_selection_is_bounded_and_unique(n in 0usize..60, max in 0usize..6) {
            let paths: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64 * 1.5]).collect();
            let picked = select_representative(&paths, max);
            prop_assert!(picked.len() <= max.min(n));
            let mut idx: Vec<usize> = picked.iter().map(|p| p.1).collect();
            idx.dedup();
            prop_assert_eq!(idx.len(), picked.len());
        }

        #[test]
        fn prop_yearly_means_has_one_point_per_year(len in 1usize..240, years in 1usize..30) {
            let path: Vec<f64> = (0..len).map(|i| i as f64).collect();
            prop_assert_eq!(yearly_means(&path, years).len(), years);
        }
    }
}
