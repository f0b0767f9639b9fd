use thiserror::Error;

use crate::ai::AiError;
use crate::domain::product::ProductError;
use crate::forms::products::ProductFormError;
use crate::repository::RepositoryError;

pub mod main;
pub mod products;

/// Result type returned by the application services.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the application services to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input or business rule violation.
    #[error("{0}")]
    Validation(String),
    /// A product with the same name already exists.
    #[error("Product '{0}' already exists")]
    Duplicate(String),
    #[error("Product with ID {0} not found")]
    NotFound(i32),
    /// The AI backend could not fulfil a request that depends on it.
    #[error(transparent)]
    Ai(#[from] AiError),
    /// Unclassified storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// The call could not be run to completion.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ProductError> for ServiceError {
    fn from(err: ProductError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(err: ProductFormError) -> Self {
        Self::Validation(err.to_string())
    }
}
