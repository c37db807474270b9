use thiserror::Error;

/// Raised only when the payload text is not JSON at all. Every problem inside a
/// well-formed document degrades to missing values instead.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Price payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
