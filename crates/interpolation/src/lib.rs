//! # Fundscope Interpolation
//!
//! Repairs and smooths a single plotted series before it reaches the chart.
//!
//! The pipeline runs on one logical series at a time (NAV return, market return,
//! index return) and never mixes values across series. It is applied to
//! percentage returns, after [`percent_returns`] has converted raw price levels,
//! never to the levels themselves. Legends and return tables read the raw
//! observations, so the lossy smoothing step only ever affects line shape.

use serde::{Deserialize, Serialize};

/// Values the upstream feed uses to mean "no observation".
const SENTINELS: [f64; 2] = [0.0, -100.0];

/// Pipeline switches, mirrored from the `[pipeline]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub smoothing: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { smoothing: true }
    }
}

/// True for missing, NaN, `0` and `-100` values.
pub fn is_sentinel(value: Option<f64>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_nan() || SENTINELS.contains(&v),
    }
}

/// Full pipeline with default options: sentinel repair, then smoothing.
pub fn repair(values: &[Option<f64>]) -> Vec<Option<f64>> {
    repair_with(values, PipelineOptions::default())
}

pub fn repair_with(values: &[Option<f64>], options: PipelineOptions) -> Vec<Option<f64>> {
    repair_masked_with(values, &sentinel_mask(values), options)
}

/// Full pipeline where `missing` says which points have no observation.
///
/// Used when the values are derived (e.g. returns) and a legitimate `0` must
/// not be mistaken for a gap; the mask comes from the underlying levels.
pub fn repair_masked_with(
    values: &[Option<f64>],
    missing: &[bool],
    options: PipelineOptions,
) -> Vec<Option<f64>> {
    if values.len() <= 2 {
        return values.to_vec();
    }
    let repaired = sentinel_repair_masked(values, missing);
    if options.smoothing {
        smooth(&repaired)
    } else {
        repaired
    }
}

/// `is_sentinel` applied to every value.
pub fn sentinel_mask(values: &[Option<f64>]) -> Vec<bool> {
    values.iter().map(|v| is_sentinel(*v)).collect()
}

/// Replaces interior sentinels using the original neighbouring values.
///
/// Both neighbours valid: their mean. One valid: a copy of it. Neither: the
/// point is left unresolved as `None`. Edges are never touched.
pub fn sentinel_repair(values: &[Option<f64>]) -> Vec<Option<f64>> {
    sentinel_repair_masked(values, &sentinel_mask(values))
}

/// Same as [`sentinel_repair`], but only points flagged in `missing` (or
/// without a finite value) count as gaps.
pub fn sentinel_repair_masked(values: &[Option<f64>], missing: &[bool]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    if values.len() <= 2 {
        return out;
    }

    let is_gap = |i: usize| {
        missing.get(i).copied().unwrap_or(false) || !values[i].is_some_and(f64::is_finite)
    };
    let valid = |i: usize| if is_gap(i) { None } else { values[i] };
    let mut repaired = 0usize;
    for i in 1..values.len() - 1 {
        if !is_gap(i) {
            continue;
        }
        out[i] = match (valid(i - 1), valid(i + 1)) {
            (Some(left), Some(right)) => Some((left + right) / 2.0),
            (Some(left), None) => Some(left),
            (None, Some(right)) => Some(right),
            (None, None) => None,
        };
        repaired += 1;
    }
    if repaired > 0 {
        tracing::trace!(repaired, len = values.len(), "Repaired sentinel values.");
    }
    out
}

/// Three-point weighted smoothing: `0.25·prev + 0.5·cur + 0.25·next`.
///
/// Edges keep their values. A point whose window contains a gap or a
/// non-finite value is left as it is.
pub fn smooth(values: &[Option<f64>]) -> Vec<Option<f64>> {
    if values.len() <= 2 {
        return values.to_vec();
    }
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());

    let mut out = values.to_vec();
    for i in 1..values.len() - 1 {
        if let (Some(prev), Some(cur), Some(next)) = (
            finite(values[i - 1]),
            finite(values[i]),
            finite(values[i + 1]),
        ) {
            out[i] = Some(0.25 * prev + 0.5 * cur + 0.25 * next);
        }
    }
    out
}

/// Converts price levels into percentage change against `base`.
///
/// A missing or zero base, or a missing level, yields `None` for that point.
pub fn percent_returns(levels: &[Option<f64>], base: Option<f64>) -> Vec<Option<f64>> {
    let Some(base) = base.filter(|b| *b != 0.0 && b.is_finite()) else {
        return vec![None; levels.len()];
    };
    levels
        .iter()
        .map(|level| level.map(|v| (v - base) / base * 100.0).filter(|r| r.is_finite()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn zero_between_valid_neighbours_becomes_their_mean() {
        let out = sentinel_repair(&[Some(5.0), Some(0.0), Some(7.0)]);
        assert_eq!(out, vec![Some(5.0), Some(6.0), Some(7.0)]);
    }

    #[test]
    fn single_valid_neighbour_is_copied() {
        let out = sentinel_repair(&[Some(5.0), Some(-100.0), None]);
        assert_eq!(out[1], Some(5.0));
        let out = sentinel_repair(&[Some(f64::NAN), None, Some(8.0)]);
        assert_eq!(out[1], Some(8.0));
    }

    #[test]
    fn isolated_gap_stays_unresolved() {
        let out = sentinel_repair(&[None, Some(0.0), Some(-100.0), Some(4.0)]);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(4.0));
    }

    #[test]
    fn edges_are_never_repaired() {
        let out = sentinel_repair(&[Some(0.0), Some(3.0), None]);
        assert_eq!(out[0], Some(0.0));
        assert_eq!(out[2], None);
    }

    #[test]
    fn masked_repair_keeps_genuine_zeros() {
        let values = [Some(0.0), Some(0.0), None, Some(0.0), Some(10.0)];
        let missing = [false, false, true, false, false];
        let out = sentinel_repair_masked(&values, &missing);
        assert_eq!(out, vec![Some(0.0), Some(0.0), Some(0.0), Some(0.0), Some(10.0)]);
    }

    #[test]
    fn masked_repair_fills_flagged_points_from_unflagged_neighbours() {
        // A -100 return from a zero price is flagged; the 0% start is not.
        let values = [Some(0.0), Some(-100.0), Some(4.0)];
        let out = sentinel_repair_masked(&values, &[false, true, false]);
        assert_eq!(out[1], Some(2.0));
    }

    #[test]
    fn flat_series_survives_masked_pipeline() {
        let values = vec![Some(0.0); 6];
        let out = repair_masked_with(&values, &[false; 6], PipelineOptions::default());
        assert_eq!(out, values);
    }

    #[test]
    fn linear_series_is_unchanged_by_smoothing() {
        let out = smooth(&[Some(10.0), Some(20.0), Some(30.0)]);
        assert_relative_eq!(out[1].unwrap(), 20.0);
    }

    #[test]
    fn spike_is_damped_by_smoothing() {
        let out = smooth(&[Some(10.0), Some(40.0), Some(10.0)]);
        assert_relative_eq!(out[1].unwrap(), 25.0);
        assert_eq!(out[0], Some(10.0));
        assert_eq!(out[2], Some(10.0));
    }

    #[test]
    fn smoothing_uses_repaired_values() {
        // 0 repaired to 6, then 0.25*5 + 0.5*6 + 0.25*7 = 6
        let out = repair(&[Some(5.0), Some(0.0), Some(7.0)]);
        assert_relative_eq!(out[1].unwrap(), 6.0);
    }

    #[test]
    fn short_series_pass_through() {
        assert_eq!(repair(&[Some(0.0), None]), vec![Some(0.0), None]);
        assert_eq!(repair(&[]), Vec::<Option<f64>>::new());
    }

    #[test]
    fn smoothing_can_be_disabled() {
        let options = PipelineOptions { smoothing: false };
        let out = repair_with(&[Some(10.0), Some(40.0), Some(10.0)], options);
        assert_eq!(out, vec![Some(10.0), Some(40.0), Some(10.0)]);
    }

    #[test]
    fn percent_returns_against_base() {
        let out = percent_returns(&[Some(100.0), Some(110.0), None, Some(0.0)], Some(100.0));
        assert_relative_eq!(out[0].unwrap(), 0.0);
        assert_relative_eq!(out[1].unwrap(), 10.0);
        assert_eq!(out[2], None);
        assert_relative_eq!(out[3].unwrap(), -100.0);
        assert_eq!(percent_returns(&[Some(1.0)], Some(0.0)), vec![None]);
    }

    proptest! {
        #[test]
        fn prop_pipeline_preserves_length(values in prop::collection::vec(prop::option::of(-50.0..50.0f64), 0..64)) {
            prop_assert_eq!(repair(&values).len(), values.len());
        }

        #[test]
        fn prop_constant_series_is_a_fixed_point(value in 1.0..1000.0f64, len in 3usize..40) {
            let values = vec![Some(value); len];
            let out = repair(&values);
            for v in out {
                prop_assert!((v.unwrap() - value).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_smoothing_stays_within_neighbour_range(values in prop::collection::vec(1.0..500.0f64, 3..40)) {
            let input: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
            let out = smooth(&input);
            for i in 1..values.len() - 1 {
                let lo = values[i - 1].min(values[i]).min(values[i + 1]);
                let hi = values[i - 1].max(values[i]).max(values[i + 1]);
                let v = out[i].unwrap();
                prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
            }
        }
    }
}
