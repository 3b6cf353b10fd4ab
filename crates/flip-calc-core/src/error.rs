use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlipCalcError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Deal not found: {0}")]
    DealNotFound(String),

    #[error("Import format error: {0}")]
    ImportFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FlipCalcError {
    fn from(e: serde_json::Error) -> Self {
        FlipCalcError::SerializationError(e.to_string())
    }
}
