use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// True for malformed caller input - recoverable, reported back with an
    /// explanatory message. Everything else is storage-class: the operation
    /// did not complete and only a generic message reaches the caller.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::MissingField(_) | AppError::InvalidAction(_) | AppError::InvalidAmount(_)
        )
    }
}
