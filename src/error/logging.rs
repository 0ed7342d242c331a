use std::any::Any;

use thiserror::Error;
use tierbus_error::{ErrorExt, StatusCode};

use super::ConfigError;

/// Ошибки инициализации подсистемы логирования.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },

    #[error("global tracing subscriber is already set: {0}")]
    AlreadyInitialized(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ErrorExt for LoggingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDirective { .. } => StatusCode::ConfigInvalid,
            Self::AlreadyInitialized(_) => StatusCode::LoggingInitFailed,
            Self::Config(err) => err.status_code(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
