use std::error::Error as StdError;

use thiserror::Error;

/// Boxed cause attached to generation failures.
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Result type returned by the AI adapters.
pub type AiResult<T> = Result<T, AiError>;

/// Errors raised by the AI description adapters.
#[derive(Debug, Error)]
pub enum AiError {
    /// The backend cannot be built from the provided settings.
    #[error("AI configuration error: {0}")]
    Configuration(String),
    /// Input rejected before any backend call was made.
    #[error("invalid AI input: {0}")]
    Validation(String),
    /// The backend failed or answered with nothing usable.
    #[error("{service}: {message}")]
    Generation {
        service: String,
        message: String,
        #[source]
        cause: Option<BoxedCause>,
    },
}

impl AiError {
    /// Build a generation error without an underlying cause.
    pub fn generation(service: &str, message: impl Into<String>) -> Self {
        Self::Generation {
            service: service.to_string(),
            message: message.into(),
            cause: None,
        }
    }

    /// Build a generation error that keeps the backend failure as its source.
    pub fn generation_caused_by(
        service: &str,
        message: impl Into<String>,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        Self::Generation {
            service: service.to_string(),
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Prefix a generation failure with the task that was being performed.
    pub(crate) fn during(self, task: &str) -> Self {
        match self {
            Self::Generation {
                service,
                message,
                cause,
            } => Self::Generation {
                service,
                message: format!("failed to {task}: {message}"),
                cause,
            },
            other => other,
        }
    }
}
