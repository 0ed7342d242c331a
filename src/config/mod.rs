//! Настройки библиотеки.
//!
//! Приоритет подписки по умолчанию задаётся для процесса один раз, до
//! первого чтения. После первого чтения значение зафиксировано.

mod settings;

use once_cell::sync::OnceCell;

pub use settings::Settings;

use crate::{error::ConfigError, pubsub::Priority};

/// Приоритет подписки по умолчанию, если хост не задал свой.
pub const DEFAULT_PRIORITY: Priority = 10;

static PROCESS_DEFAULT_PRIORITY: OnceCell<Priority> = OnceCell::new();

/// Приоритет по умолчанию для процесса.
///
/// Первый вызов фиксирует значение: дальнейшие попытки изменить его через
/// [`set_default_priority`] вернут ошибку.
pub fn default_priority() -> Priority {
    *PROCESS_DEFAULT_PRIORITY.get_or_init(|| DEFAULT_PRIORITY)
}

/// Задаёт приоритет по умолчанию для процесса.
///
/// Повторная установка того же значения допустима. Установка другого
/// значения после первой установки или первого чтения возвращает
/// [`ConfigError::DefaultPriorityAlreadySet`].
pub fn set_default_priority(priority: Priority) -> Result<(), ConfigError> {
    match PROCESS_DEFAULT_PRIORITY.set(priority) {
        Ok(()) => {
            tracing::debug!(priority, "process default priority set");
            Ok(())
        }
        Err(_) => {
            let current = default_priority();
            if current == priority {
                Ok(())
            } else {
                Err(ConfigError::DefaultPriorityAlreadySet { current })
            }
        }
    }
}
