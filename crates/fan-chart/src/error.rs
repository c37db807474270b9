use thiserror::Error;

#[derive(Error, Debug)]
pub enum FanChartError {
    #[error("Simulation payload contains no data")]
    Empty,

    #[error("Simulation payload is neither a list of paths nor a fan-band object")]
    UnrecognizedShape,

    #[error("Array '{field}' has {found} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Malformed simulation payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
