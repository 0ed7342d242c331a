use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Допустимые уровни логирования.
const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Формат вывода консольного логгера.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Базовый уровень (`trace`..`error`, `off`)
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
    /// Дополнительные директивы `EnvFilter`, например `tierbus::pubsub=trace`
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
            directives: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Перекрывает уровень и формат из `TIERBUS_LOG_LEVEL` и
    /// `TIERBUS_LOG_FORMAT`. Некорректный формат игнорируется.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("TIERBUS_LOG_LEVEL") {
            self.level = level.to_ascii_lowercase();
        }
        if let Ok(format) = env::var("TIERBUS_LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                self.format = format;
            }
        }
    }

    /// Проверяет уровень без учёта регистра.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            Ok(())
        } else {
            Err(ConfigError::InvalidLogLevel(self.level.clone()))
        }
    }

    /// Директива для `EnvFilter`: уровень и дополнительные директивы через
    /// запятую.
    pub fn build_filter_directive(&self) -> String {
        std::iter::once(self.level.to_ascii_lowercase())
            .chain(self.directives.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = LoggingConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.build_filter_directive(), "info");
    }

    #[test]
    fn test_filter_directive_joins_extra_directives() {
        let cfg = LoggingConfig {
            level: "warn".into(),
            directives: vec!["tierbus::pubsub=trace".into(), "other=error".into()],
            ..Default::default()
        };
        assert_eq!(
            cfg.build_filter_directive(),
            "warn,tierbus::pubsub=trace,other=error"
        );
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let cfg = LoggingConfig {
            level: "loud".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(ConfigError::InvalidLogFormat(format)) if format == "xml"
        ));
    }

    /// Тест проверяет, что уровень из файла в верхнем регистре принимается
    /// так же, как из переменной окружения.
    #[test]
    fn test_validate_level_is_case_insensitive() {
        let cfg = LoggingConfig {
            level: "INFO".into(),
            directives: vec!["tierbus=trace".into()],
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.build_filter_directive(), "info,tierbus=trace");
    }

    /// Тест проверяет, что переменные окружения перекрывают уровень и
    /// формат, а некорректный формат игнорируется.
    #[test]
    #[serial]
    fn test_env_overrides() {
        env::set_var("TIERBUS_LOG_LEVEL", "DEBUG");
        env::set_var("TIERBUS_LOG_FORMAT", "json");
        let mut cfg = LoggingConfig::default();
        cfg.apply_env_overrides();
        assert_eq!(cfg.level, "debug");
        assert_eq!(cfg.format, LogFormat::Json);

        env::set_var("TIERBUS_LOG_FORMAT", "xml");
        let mut cfg = LoggingConfig::default();
        cfg.apply_env_overrides();
        assert_eq!(cfg.format, LogFormat::Compact);

        env::remove_var("TIERBUS_LOG_LEVEL");
        env::remove_var("TIERBUS_LOG_FORMAT");
    }
}
