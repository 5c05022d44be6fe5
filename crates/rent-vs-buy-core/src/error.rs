use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentVsBuyError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RentVsBuyError {
    fn from(e: serde_json::Error) -> Self {
        RentVsBuyError::SerializationError(e.to_string())
    }
}
