//! # Fundscope Price Store
//!
//! Normalizes the daily-price payloads of the ETF detail API into one
//! chronologically sorted [`PriceSeries`].
//!
//! Several API revisions are still in circulation, each nesting the daily
//! records differently. Callers never branch on the shape: [`ingest`] runs an
//! ordered list of shape detectors and takes the first match. The store performs
//! no I/O and never fails on a well-formed JSON document.

pub mod error;
pub mod record;
pub mod series;
pub mod shapes;

pub use error::IngestError;
pub use series::PriceSeries;
pub use shapes::PayloadShape;

use serde_json::Value;

/// Normalizes any accepted payload shape into a `PriceSeries`.
///
/// Unknown shapes and unusable records degrade to an empty (or shorter)
/// series. The result depends only on `raw`, so ingesting the same payload
/// twice yields identical series.
#[tracing::instrument(name = "price_store_ingest", skip(raw))]
pub fn ingest(raw: &Value) -> PriceSeries {
    let Some((detector, shape)) = shapes::resolve(raw) else {
        tracing::warn!("Price payload matched no known shape; treating it as empty.");
        return PriceSeries::default();
    };

    let records = shape.records();
    let series = PriceSeries::from_points(records.iter().filter_map(record::parse_record));
    tracing::debug!(
        detector,
        records = records.len(),
        points = series.len(),
        "Ingested daily prices."
    );
    if !series.is_empty() && series.is_all_blank() {
        tracing::warn!(points = series.len(), "Price payload has trading dates but no prices.");
    }
    series
}

/// Parses `text` as JSON and ingests it.
pub fn ingest_str(text: &str) -> Result<PriceSeries, IngestError> {
    let raw: Value = serde_json::from_str(text)?;
    Ok(ingest(&raw))
}
