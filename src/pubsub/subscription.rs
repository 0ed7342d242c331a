use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use super::{Callback, Priority};

/// Счётчик идентификаторов подписок, общий для всех реестров процесса.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Уникальный идентификатор одной регистрации обработчика.
///
/// Выдаётся монотонно возрастающим и никогда не переиспользуется, поэтому
/// две подписки одного и того же обработчика на один топик и приоритет
/// различимы между собой.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Числовое значение идентификатора.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Хэндл подписки, возвращаемый из `subscribe`.
///
/// Единственный способ позже снять именно эту регистрацию. Клонирование
/// хэндла не создаёт новой подписки: все клоны ссылаются на одну запись, и
/// после первой успешной отписки остальные становятся no-op.
pub struct Subscription<A> {
    pub(crate) id: SubscriptionId,
    pub(crate) topic: Arc<str>,
    pub(crate) priority: Priority,
    pub(crate) callback: Callback<A>,
}

impl<A> Subscription<A> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Имя топика, на который оформлена подписка.
    pub fn topic(&self) -> &Arc<str> {
        &self.topic
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn callback(&self) -> &Callback<A> {
        &self.callback
    }

    /// Разбирает хэндл в тройку `(topic, callback, priority)`.
    pub fn into_parts(self) -> (Arc<str>, Callback<A>, Priority) {
        (self.topic, self.callback, self.priority)
    }
}

impl<A> Clone for Subscription<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            topic: self.topic.clone(),
            priority: self.priority,
            callback: self.callback.clone(),
        }
    }
}

impl<A> fmt::Debug for Subscription<A> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Запись внутри уровня приоритета: идентификатор и сам обработчик.
pub(crate) struct Entry<A> {
    pub(crate) id: SubscriptionId,
    pub(crate) callback: Callback<A>,
}

impl<A> Clone for Entry<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: self.callback.clone(),
        }
    }
}
