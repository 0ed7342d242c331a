//! Общий для процесса реестр.
//!
//! Для кода, которому нужен один реестр, доступный отовсюду. Аргументы
//! публикаций здесь динамические: [`serde_json::Value`]. Реестр создаётся
//! при первом обращении и берёт приоритет по умолчанию из
//! [`crate::config::default_priority`].

use once_cell::sync::Lazy;
use serde_json::Value;

use super::{Callback, Priority, Subscription, TopicRegistry};
use crate::error::PublishError;

static REGISTRY: Lazy<TopicRegistry<Value>> = Lazy::new(TopicRegistry::new);

/// Ссылка на общий реестр.
pub fn registry() -> &'static TopicRegistry<Value> {
    &REGISTRY
}

pub fn subscribe(
    topic: &str,
    callback: Callback<Value>,
) -> Subscription<Value> {
    REGISTRY.subscribe(topic, callback)
}

pub fn subscribe_at(
    topic: &str,
    priority: Priority,
    callback: Callback<Value>,
) -> Subscription<Value> {
    REGISTRY.subscribe_at(topic, priority, callback)
}

pub fn publish(
    topic: &str,
    args: &[Value],
) -> Result<usize, PublishError> {
    REGISTRY.publish(topic, args)
}

pub fn publish_at(
    topic: &str,
    priority: Priority,
    args: &[Value],
) -> Result<usize, PublishError> {
    REGISTRY.publish_at(topic, priority, args)
}

pub fn unsubscribe(handle: &Subscription<Value>) -> bool {
    REGISTRY.unsubscribe(handle)
}
