use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatingsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Resolver error: {0}")]
    Resolver(String),
}
