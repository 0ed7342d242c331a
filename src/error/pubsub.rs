use std::{any::Any, sync::Arc};

use thiserror::Error;
use tierbus_error::{ErrorExt, StatusCode};

use crate::pubsub::{Priority, SubscriptionId};

/// Ошибка публикации.
///
/// Возникает только тогда, когда один из обработчиков вернул ошибку.
/// Оставшиеся обработчики этой публикации уже не вызываются.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("callback {id} on topic '{topic}' (priority {priority}) failed: {source}")]
    Callback {
        topic: Arc<str>,
        priority: Priority,
        id: SubscriptionId,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl PublishError {
    pub(crate) fn callback(
        topic: Arc<str>,
        priority: Priority,
        id: SubscriptionId,
        source: anyhow::Error,
    ) -> Self {
        Self::Callback {
            topic,
            priority,
            id,
            source: source.into(),
        }
    }

    /// Топик, публикация в который была прервана.
    pub fn topic(&self) -> &str {
        match self {
            Self::Callback { topic, .. } => topic,
        }
    }

    /// Идентификатор подписки, обработчик которой вернул ошибку.
    pub fn subscription_id(&self) -> SubscriptionId {
        match self {
            Self::Callback { id, .. } => *id,
        }
    }
}

impl ErrorExt for PublishError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Callback { .. } => StatusCode::CallbackFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "pubsub_publish".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        match self {
            Self::Callback {
                topic, priority, ..
            } => {
                tags.push(("topic", topic.to_string()));
                tags.push(("priority", priority.to_string()));
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    fn sample() -> PublishError {
        PublishError::callback(
            Arc::from("orders"),
            5,
            SubscriptionId::next(),
            anyhow::anyhow!("disk on fire"),
        )
    }

    #[test]
    fn test_display_mentions_topic_and_cause() {
        let msg = sample().to_string();
        assert!(msg.contains("orders"), "got: {msg}");
        assert!(msg.contains("priority 5"), "got: {msg}");
        assert!(msg.contains("disk on fire"), "got: {msg}");
    }

    /// Тест проверяет, что исходная ошибка обработчика доступна через
    /// `source()`.
    #[test]
    fn test_source_is_callback_error() {
        let err = sample();
        let source = err.source().expect("source must be set");
        assert_eq!(source.to_string(), "disk on fire");
    }

    #[test]
    fn test_status_code_and_tags() {
        let err = sample();
        assert_eq!(err.status_code(), StatusCode::CallbackFailed);
        assert_eq!(err.topic(), "orders");
        let tags = err.metrics_tags();
        assert!(tags.contains(&("topic", "orders".to_string())));
        assert!(tags.contains(&("priority", "5".to_string())));
    }
}
