use std::any::Any;

use thiserror::Error;
use tierbus_error::{ErrorExt, StatusCode};

use crate::pubsub::Priority;

/// Ошибки загрузки и применения настроек.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("default priority is already fixed at {current}")]
    DefaultPriorityAlreadySet { current: Priority },

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Load(_) => StatusCode::ConfigLoadFailed,
            Self::DefaultPriorityAlreadySet { .. } => StatusCode::AlreadyExists,
            Self::InvalidLogLevel(_) | Self::InvalidLogFormat(_) => StatusCode::ConfigInvalid,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
