use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Slot taken: {0}")]
    SlotTaken(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

pub type BookingResult<T> = Result<T, BookingError>;
