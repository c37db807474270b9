use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    ChartSettings, FanChartSettings, LogFormat, LoggingSettings, PipelineSettings,
    ReturnSettings, Settings, MAX_FAN_LINES,
};

/// Prefix of environment variables that override file values,
/// e.g. `FUNDSCOPE__CHART__WIDTH=1024`.
const ENV_PREFIX: &str = "FUNDSCOPE";

/// Loads the application configuration from an optional `fundscope.toml` in the
/// working directory, layered with `FUNDSCOPE__*` environment variables.
pub fn load_config() -> Result<Settings, ConfigError> {
    build(config::File::with_name("fundscope").required(false), None)
}

/// Same as [`load_config`] but reads the given file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    build(config::File::from(path).required(true), None)
}

/// `env` replaces the process environment when given.
fn build<S>(file: S, env: Option<config::Map<String, String>>) -> Result<Settings, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .source(env),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[chart]\nwidth = 1024.0\n\n[returns]\nempty_marker = \"—\"\n\n[fan_chart]\ntarget_years = 10"
        )
        .unwrap();

        let settings = load_config_from(file.path()).unwrap();
        assert_eq!(settings.chart.width, 1024.0);
        assert_eq!(settings.chart.height, 360.0);
        assert_eq!(settings.returns.empty_marker, "—");
        assert_eq!(settings.fan_chart.target_years, Some(10));
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[fan_chart]\nmax_sample_paths = 12").unwrap();

        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[chart]\nwidth = 1024.0\npadding = 20.0").unwrap();
        let env = [
            ("FUNDSCOPE__CHART__WIDTH", "800"),
            ("FUNDSCOPE__PIPELINE__SMOOTHING", "false"),
            ("FUNDSCOPE__RETURNS__EMPTY_MARKER", "n/a"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = build(config::File::from(file.path()).required(true), Some(env)).unwrap();
        assert_eq!(settings.chart.width, 800.0);
        assert_eq!(settings.chart.padding, 20.0);
        assert!(!settings.pipeline.smoothing);
        assert_eq!(settings.returns.empty_marker, "n/a");
    }

    #[test]
    fn environment_values_are_validated() {
        let env = [("FUNDSCOPE__FAN_CHART__TARGET_YEARS".to_string(), "0".to_string())]
            .into_iter()
            .collect();
        let err = build(config::File::with_name("no-such-fundscope").required(false), Some(env))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn logging_writes_to_a_rolling_file_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            directory: Some(dir.path().to_path_buf()),
            ..LoggingSettings::default()
        };
        let guard = init_logging(&settings).unwrap();
        assert!(guard.is_some());
    }

    #[test]
    fn missing_required_file_is_a_load_error() {
        let err = load_config_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
