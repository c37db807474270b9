//! # Fundscope Fan Chart
//!
//! Turns a pre-computed Monte Carlo result into a render-ready [`FanChart`].
//!
//! Two payload layouts are in circulation. The legacy one is a bare list of
//! simulated monthly paths; the model keeps at most five representative paths
//! and, for multi-year horizons, averages each into one point per year. The
//! structured one already carries percentile bands, a principal line and
//! sample paths; those pass through untouched and only gain year ticks.
//!
//! The simulation itself is never run here.

pub mod error;
pub mod model;
pub mod payload;

pub use error::FanChartError;
pub use model::{
    from_payload, AxisTick, FanChart, FanChartOptions, FanChartShape, FanSummary, SampleLine,
};
pub use payload::{FanBands, FanChartPayload, Representative, StructuredPayload, XAxis};

use serde::Deserialize;
use serde_json::Value;

/// Keys whose presence marks the structured layout.
const STRUCTURED_MARKERS: [&str; 2] = ["fan_bands", "fanBands"];

/// Decodes `raw` into one of the two payload layouts.
pub fn decode(raw: &Value) -> Result<FanChartPayload, FanChartError> {
    match raw {
        Value::Object(object) if STRUCTURED_MARKERS.iter().any(|k| object.contains_key(*k)) => {
            let structured = StructuredPayload::deserialize(raw)?;
            Ok(FanChartPayload::Structured(Box::new(structured)))
        }
        Value::Array(_) => Ok(FanChartPayload::Legacy(serde_json::from_value(raw.clone())?)),
        _ => Err(FanChartError::UnrecognizedShape),
    }
}

/// Decodes and normalizes a simulation payload in one step.
#[tracing::instrument(name = "fan_chart_normalize", skip(raw))]
pub fn normalize(raw: &Value, options: &FanChartOptions) -> Result<FanChart, FanChartError> {
    let payload = decode(raw)?;
    let chart = from_payload(payload, options);
    if let Err(e) = &chart {
        tracing::warn!(error = %e, "Rejected simulation payload.");
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured(len: usize) -> Value {
        let line = |scale: f64| -> Vec<f64> { (0..len).map(|i| scale * i as f64).collect() };
        json!({
            "fan_bands": { "p05": line(0.5), "p25": line(0.8), "p50": line(1.0), "p75": line(1.2), "p95": line(1.5) },
            "principal_line": line(0.9),
            "representative": { "p95": line(1.4), "p50": line(1.0), "p05": line(0.6) },
            "random_samples": [line(1.1), line(0.7), line(1.3)],
            "x_axis": { "type": "monthIndex", "length": len, "labels": [] },
        })
    }

    #[test]
    fn structured_shape_is_passed_through() {
        let raw = structured(36);
        let chart = normalize(&raw, &FanChartOptions::default()).unwrap();
        assert_eq!(chart.shape, FanChartShape::Structured);
        let bands = chart.bands.as_ref().unwrap();
        assert_eq!(bands.p05.len(), bands.p95.len());
        assert_eq!(bands.p95.len(), chart.principal_line.as_ref().unwrap().len());
        assert_eq!(bands.p50[10], 10.0);
        assert_eq!(chart.lines.len(), 5);
        assert_eq!(chart.lines[0].label, "representative p95");
        assert_eq!(chart.ticks.len(), 3);
        assert_eq!(chart.summary().principal, Some(0.9 * 35.0));
    }

    #[test]
    fn camel_case_fields_are_accepted() {
        let raw = json!({
            "fanBands": { "p05": [1.0, 2.0], "p25": [1.0, 2.0], "p50": [1.0, 2.0], "p75": [1.0, 2.0], "p95": [1.0, 2.0] },
            "principalLine": [1.0, 1.0],
        });
        let chart = normalize(&raw, &FanChartOptions::default()).unwrap();
        assert_eq!(chart.len(), 2);
        assert!(chart.lines.is_empty());
    }

    #[test]
    fn unequal_arrays_are_rejected() {
        let mut raw = structured(24);
        raw["principal_line"] = json!([1.0, 2.0]);
        let err = normalize(&raw, &FanChartOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            FanChartError::LengthMismatch { ref field, expected: 24, found: 2 } if field == "principal_line"
        ));
    }

    #[test]
    fn legacy_paths_are_reduced_and_downsampled() {
        let paths: Vec<Vec<f64>> = (0..50)
            .map(|p| (0..60).map(|m| f64::from(p) + f64::from(m)).collect())
            .collect();
        let raw = serde_json::to_value(&paths).unwrap();
        let chart = normalize(&raw, &FanChartOptions::default()).unwrap();
        assert_eq!(chart.shape, FanChartShape::Legacy);
        assert_eq!(chart.lines.len(), 5);
        assert_eq!(chart.len(), 5);
        assert!(chart.lines.iter().all(|l| l.values.len() == 5));
        assert_eq!(chart.ticks.last().unwrap().label, "5년");
        assert!(chart.bands.is_none());
    }

    #[test]
    fn explicit_target_years_controls_ticks() {
        let options = FanChartOptions {
            target_years: Some(2),
            max_sample_paths: 3,
        };
        let chart = normalize(&structured(60), &options).unwrap();
        assert_eq!(chart.ticks.len(), 2);
        assert_eq!(chart.lines.len(), 3);
    }

    #[test]
    fn long_target_horizon_does_not_stack_ticks() {
        let options = FanChartOptions {
            target_years: Some(10),
            max_sample_paths: 5,
        };
        let chart = normalize(&structured(24), &options).unwrap();
        let mut indices: Vec<usize> = chart.ticks.iter().map(|t| t.index).collect();
        indices.dedup();
        assert_eq!(indices.len(), chart.ticks.len());
        assert_eq!(chart.ticks.len(), 2);
    }

    #[test]
    fn empty_and_unknown_payloads_are_errors() {
        assert!(matches!(
            normalize(&json!([]), &FanChartOptions::default()),
            Err(FanChartError::Empty)
        ));
        assert!(matches!(
            normalize(&json!({ "paths": [] }), &FanChartOptions::default()),
            Err(FanChartError::UnrecognizedShape)
        ));
        assert!(matches!(
            normalize(&json!([["x"]]), &FanChartOptions::default()),
            Err(FanChartError::Malformed(_))
        ));
    }
}
