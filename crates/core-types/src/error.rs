use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown lookback period label: {0}")]
    UnknownPeriod(String),
}
