use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The most sample/representative lines a fan chart will ever draw.
pub const MAX_FAN_LINES: usize = 5;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `fundscope.toml`; missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chart: ChartSettings,
    pub returns: ReturnSettings,
    pub pipeline: PipelineSettings,
    pub fan_chart: FanChartSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Rejects values the renderer or the fan-chart model cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chart = &self.chart;
        if chart.padding < 0.0 {
            return Err(ConfigError::ValidationError(
                "chart.padding must not be negative".to_string(),
            ));
        }
        if chart.width <= 2.0 * chart.padding || chart.height <= 2.0 * chart.padding {
            return Err(ConfigError::ValidationError(format!(
                "chart area {}x{} leaves no room inside padding {}",
                chart.width, chart.height, chart.padding
            )));
        }
        if self.fan_chart.max_sample_paths > MAX_FAN_LINES {
            return Err(ConfigError::ValidationError(format!(
                "fan_chart.max_sample_paths must be at most {MAX_FAN_LINES}"
            )));
        }
        if self.fan_chart.target_years == Some(0) {
            return Err(ConfigError::ValidationError(
                "fan_chart.target_years must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Geometry and palette of the chart surface.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    /// Space between the surface edge and the plot area, in pixels.
    pub padding: f64,
    pub nav_color: String,
    pub market_color: String,
    pub index_color: String,
    pub outer_band_color: String,
    pub inner_band_color: String,
    pub median_color: String,
    pub principal_color: String,
    pub sample_color: String,
    /// Text drawn instead of an empty canvas.
    pub empty_message: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 360.0,
            padding: 40.0,
            nav_color: "#348dc1".to_string(),
            market_color: "#ff9933".to_string(),
            index_color: "#8c8c8c".to_string(),
            outer_band_color: "#c6dbef".to_string(),
            inner_band_color: "#6baed6".to_string(),
            median_color: "#08519c".to_string(),
            principal_color: "#333333".to_string(),
            sample_color: "#9e9ac8".to_string(),
            empty_message: "No data available.".to_string(),
        }
    }
}

/// Display of return figures.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReturnSettings {
    /// Shown in place of an undefined return; never `0.00`.
    pub empty_marker: String,
}

impl Default for ReturnSettings {
    fn default() -> Self {
        Self {
            empty_marker: "-".to_string(),
        }
    }
}

/// Switches for the repair/smoothing pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Apply the three-point smoothing pass after sentinel repair.
    pub smoothing: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { smoothing: true }
    }
}

/// Fan-chart display parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FanChartSettings {
    /// Years on the horizontal axis. Derived from the payload length when unset.
    pub target_years: Option<u32>,
    /// Thin sample/representative lines drawn over the bands.
    pub max_sample_paths: usize,
}

impl Default for FanChartSettings {
    fn default() -> Self {
        Self {
            target_years: None,
            max_sample_paths: MAX_FAN_LINES,
        }
    }
}

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            directory: None,
            file_prefix: "fundscope.log".to_string(),
        }
    }
}
