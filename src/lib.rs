/// Settings: process-wide default priority, loading from env or file.
pub mod config;
/// Error types: publishing, configuration, logging.
pub mod error;
/// Logging setup on top of `tracing-subscriber`.
pub mod logging;
/// Pub/Sub: TopicRegistry, Subscription, Callback.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Settings and the process-wide default priority.
pub use crate::config::{default_priority, set_default_priority, Settings, DEFAULT_PRIORITY};
/// Operation errors.
pub use crate::error::{ConfigError, LoggingError, PublishError};
/// Logging.
pub use crate::logging::{init_logging, LogFormat, LoggingConfig};
/// Pub/Sub API.
pub use crate::pubsub::{
    callback, Callback, CallbackResult, Priority, Subscription, SubscriptionId, TopicRegistry,
};
pub use tierbus_error::{BoxedError, ErrorExt, StatusCode, TierbusResult};

/// Applies `settings` process-wide and installs the global logger.
///
/// Convenience for hosts that want both in one call; the two halves are
/// available separately as [`Settings::apply`] and [`init_logging`].
pub fn init(settings: &Settings) -> TierbusResult<()> {
    settings.apply().map_err(BoxedError::new)?;
    init_logging(settings.logging.clone()).map_err(BoxedError::new)?;
    Ok(())
}
