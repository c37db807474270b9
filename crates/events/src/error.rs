use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventsError {
    #[error("Failed to serialize chart event: {0}")]
    Serialization(#[from] serde_json::Error),
}
