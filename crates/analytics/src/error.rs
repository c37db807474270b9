use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid period selection: {0}")]
    Period(#[from] CoreError),
}
