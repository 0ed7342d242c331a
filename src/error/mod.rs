pub mod logging;
pub mod pubsub;
pub mod settings;

pub use logging::LoggingError;
pub use pubsub::PublishError;
pub use settings::ConfigError;
