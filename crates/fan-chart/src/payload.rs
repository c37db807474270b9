use serde::{Deserialize, Serialize};

/// The five percentile bands of a structured simulation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FanBands {
    pub p05: Vec<f64>,
    pub p25: Vec<f64>,
    pub p50: Vec<f64>,
    pub p75: Vec<f64>,
    pub p95: Vec<f64>,
}

impl FanBands {
    pub fn named(&self) -> [(&'static str, &[f64]); 5] {
        [
            ("fan_bands.p05", self.p05.as_slice()),
            ("fan_bands.p25", self.p25.as_slice()),
            ("fan_bands.p50", self.p50.as_slice()),
            ("fan_bands.p75", self.p75.as_slice()),
            ("fan_bands.p95", self.p95.as_slice()),
        ]
    }
}

/// Simulated paths whose outcome landed on a given percentile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Representative {
    #[serde(default)]
    pub p95: Vec<f64>,
    #[serde(default)]
    pub p50: Vec<f64>,
    #[serde(default)]
    pub p05: Vec<f64>,
}

/// Describes the implicit month index shared by every array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxis {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub length: Option<usize>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// The structured simulation layout. Entry `i` of every array is month `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPayload {
    #[serde(alias = "fanBands")]
    pub fan_bands: FanBands,
    #[serde(default, alias = "principalLine")]
    pub principal_line: Vec<f64>,
    #[serde(default)]
    pub representative: Option<Representative>,
    #[serde(default, alias = "randomSamples")]
    pub random_samples: Vec<Vec<f64>>,
    #[serde(default, alias = "xAxis")]
    pub x_axis: Option<XAxis>,
}

/// Both simulation layouts the planner service has produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FanChartPayload {
    /// A bare list of simulated monthly-value paths.
    Legacy(Vec<Vec<f64>>),
    Structured(Box<StructuredPayload>),
}
