use std::path::Path;

use ::config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use super::{set_default_priority, DEFAULT_PRIORITY};
use crate::{error::ConfigError, logging::LoggingConfig, pubsub::Priority};

/// Настройки, которые хост может загрузить из окружения или файла.
///
/// Сама библиотека окружение не читает: источники подключаются явно через
/// [`Settings::load_with_env`] или [`Settings::load_from_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_priority_value")]
    pub default_priority: Priority,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_priority_value() -> Priority {
    DEFAULT_PRIORITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY,
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    /// Только значения по умолчанию.
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Self::builder()?.build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Значения по умолчанию, поверх них переменные окружения с префиксом.
    ///
    /// Вложенные ключи разделяются `__`: `TIERBUS_DEFAULT_PRIORITY=5`,
    /// `TIERBUS_LOGGING__LEVEL=debug`.
    pub fn load_with_env(prefix: &str) -> Result<Self, ConfigError> {
        let cfg = Self::builder()?
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Значения по умолчанию, поверх них файл (формат по расширению).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let cfg = Self::builder()?
            .add_source(File::from(path.as_ref()))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Устанавливает `default_priority` как приоритет по умолчанию для
    /// процесса.
    pub fn apply(&self) -> Result<(), ConfigError> {
        set_default_priority(self.default_priority)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        // Добавляем значения по умолчанию
        Ok(Config::builder().set_default("default_priority", i64::from(DEFAULT_PRIORITY))?)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, io::Write};

    use serial_test::serial;

    use super::*;
    use crate::logging::LogFormat;

    #[test]
    fn test_load_defaults() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_priority, 10);
    }

    /// Тест проверяет, что переменные окружения перекрывают значения по
    /// умолчанию, включая вложенную секцию логирования.
    #[test]
    #[serial]
    fn test_load_with_env_overrides() {
        env::set_var("TIERBUSTEST_DEFAULT_PRIORITY", "5");
        env::set_var("TIERBUSTEST_LOGGING__LEVEL", "debug");

        let settings = Settings::load_with_env("TIERBUSTEST");

        env::remove_var("TIERBUSTEST_DEFAULT_PRIORITY");
        env::remove_var("TIERBUSTEST_LOGGING__LEVEL");

        let settings = settings.unwrap();
        assert_eq!(settings.default_priority, 5);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    #[serial]
    fn test_load_with_env_rejects_garbage() {
        env::set_var("TIERBUSBAD_DEFAULT_PRIORITY", "high");
        let result = Settings::load_with_env("TIERBUSBAD");
        env::remove_var("TIERBUSBAD_DEFAULT_PRIORITY");

        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "default_priority = 20\n\n[logging]\nlevel = \"warn\"\nformat = \"json\""
        )
        .unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.default_priority, 20);
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    /// Тест проверяет, что уровень из файла в верхнем регистре проходит
    /// проверку.
    #[test]
    fn test_uppercase_level_from_file_is_valid() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"INFO\"").unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.logging.level, "INFO");
        assert!(settings.logging.validate().is_ok());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = Settings::load_from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
