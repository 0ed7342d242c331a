//! Вспомогательные функции для бенчмарков tierbus.

use tierbus::{callback, Callback, Priority, TopicRegistry};

/// Обработчик, который ничего не делает.
pub fn noop() -> Callback<u64> {
    callback(|_args: &[u64]| Ok(()))
}

/// Реестр с `per_tier` подписками на каждом из `tiers` уровней топика.
pub fn populated(
    topic: &str,
    tiers: Priority,
    per_tier: usize,
) -> TopicRegistry<u64> {
    let registry = TopicRegistry::with_default_priority(10);
    for priority in 0..tiers {
        for _ in 0..per_tier {
            registry.subscribe_at(topic, priority, noop());
        }
    }
    registry
}
