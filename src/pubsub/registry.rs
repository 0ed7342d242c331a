use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    fmt,
    ops::Bound,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::ReentrantMutex;
use tracing::{debug, trace, warn};

use super::{subscription::Entry, Callback, Priority, Subscription, SubscriptionId};
use crate::{config::Settings, error::PublishError};

/// Уровни приоритета одного топика. `BTreeMap` даёт обход по возрастанию.
type PriorityTable<A> = BTreeMap<Priority, Vec<Entry<A>>>;

type TopicTable<A> = HashMap<Arc<str>, PriorityTable<A>>;

/// Снимок одного уровня: ключ топика, приоритет и копия записей.
type TierSnapshot<A> = (Arc<str>, Priority, Vec<Entry<A>>);

/// Реестр подписок: топик → уровни приоритета → обработчики.
///
/// Гарантии:
/// - Внутри уровня обработчики вызываются в порядке регистрации.
/// - При публикации без приоритета уровни обходятся по возрастанию.
/// - Каждый уровень вызывается по снимку, снятому в начале его обхода:
///   обработчик может подписываться, отписываться и публиковать в этот же
///   реестр, не влияя на текущий обход.
/// - Топики и уровни создаются лениво и не удаляются автоматически, даже
///   когда становятся пустыми.
///
/// Вся таблица защищена одним реентерабельным мьютексом, который
/// удерживается на всё время `subscribe`/`unsubscribe`/`publish`. Другие
/// потоки ждут конца публикации целиком, а обработчик в том же потоке может
/// снова войти в реестр. `RefCell` заимствуется только на время изменения
/// таблицы или снятия снимка, но не во время вызова обработчиков.
pub struct TopicRegistry<A> {
    topics: ReentrantMutex<RefCell<TopicTable<A>>>,
    default_priority: Priority,
    /// Общее количество вызовов `publish`/`publish_at`
    pub publish_count: AtomicUsize,
    /// Количество успешных вызовов обработчиков
    pub delivery_count: AtomicUsize,
    /// Количество обработчиков, вернувших ошибку
    pub failure_count: AtomicUsize,
}

impl<A> TopicRegistry<A> {
    /// Создаёт пустой реестр с приоритетом по умолчанию, заданным для
    /// процесса (см. [`crate::config::default_priority`]).
    pub fn new() -> Self {
        Self::with_default_priority(crate::config::default_priority())
    }

    /// Создаёт пустой реестр с явным приоритетом по умолчанию.
    pub fn with_default_priority(default_priority: Priority) -> Self {
        Self {
            topics: ReentrantMutex::new(RefCell::new(HashMap::new())),
            default_priority,
            publish_count: AtomicUsize::new(0),
            delivery_count: AtomicUsize::new(0),
            failure_count: AtomicUsize::new(0),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_default_priority(settings.default_priority)
    }

    /// Приоритет, который получает подписка без явного приоритета.
    pub fn default_priority(&self) -> Priority {
        self.default_priority
    }

    /// Подписывает обработчик на топик с приоритетом по умолчанию.
    pub fn subscribe(
        &self,
        topic: &str,
        callback: Callback<A>,
    ) -> Subscription<A> {
        self.subscribe_at(topic, self.default_priority, callback)
    }

    /// Подписывает обработчик на топик с заданным приоритетом.
    ///
    /// Обработчик добавляется в конец своего уровня. Возвращённый хэндл
    /// нужно сохранить, чтобы позже снять именно эту подписку.
    pub fn subscribe_at(
        &self,
        topic: &str,
        priority: Priority,
        callback: Callback<A>,
    ) -> Subscription<A> {
        let id = SubscriptionId::next();
        let guard = self.topics.lock();
        let mut topics = guard.borrow_mut();

        // Хэндлы разделяют ключ топика с реестром.
        let key = match topics.get_key_value(topic) {
            Some((key, _)) => key.clone(),
            None => Arc::from(topic),
        };
        let tier = topics
            .entry(key.clone())
            .or_default()
            .entry(priority)
            .or_default();
        tier.push(Entry {
            id,
            callback: callback.clone(),
        });
        let position = tier.len();
        drop(topics);
        drop(guard);

        debug!(topic = %key, priority, %id, position, "subscribed");

        Subscription {
            id,
            topic: key,
            priority,
            callback,
        }
    }

    /// Снимает подписку, соответствующую хэндлу.
    ///
    /// Возвращает `false`, если топика, уровня или самой подписки уже нет.
    /// Это не ошибка: повторная отписка тем же хэндлом безопасна.
    pub fn unsubscribe(
        &self,
        handle: &Subscription<A>,
    ) -> bool {
        let guard = self.topics.lock();
        let removed = {
            let mut topics = guard.borrow_mut();
            topics
                .get_mut(&*handle.topic)
                .and_then(|table| table.get_mut(&handle.priority))
                .and_then(|tier| {
                    let position = tier.iter().position(|entry| entry.id == handle.id)?;
                    Some(tier.remove(position))
                })
        };

        match removed {
            Some(_) => {
                debug!(topic = %handle.topic, priority = handle.priority, id = %handle.id, "unsubscribed");
                true
            }
            None => {
                trace!(topic = %handle.topic, priority = handle.priority, id = %handle.id, "unsubscribe: no matching subscription");
                false
            }
        }
    }

    /// Удаляет топик вместе со всеми уровнями и подписками.
    ///
    /// Возвращает количество снятых подписок.
    pub fn unsubscribe_all(
        &self,
        topic: &str,
    ) -> usize {
        let guard = self.topics.lock();
        let removed = guard.borrow_mut().remove(topic);
        drop(guard);
        let count = removed
            .as_ref()
            .map(|table| table.values().map(Vec::len).sum())
            .unwrap_or(0);
        if removed.is_some() {
            debug!(topic, count, "topic dropped");
        }
        count
    }

    /// Публикует аргументы во все уровни топика.
    ///
    /// Уровни обходятся по возрастанию приоритета, внутри уровня в порядке
    /// регистрации. Возвращает количество вызванных обработчиков. Первая же
    /// ошибка обработчика прерывает публикацию.
    pub fn publish(
        &self,
        topic: &str,
        args: &[A],
    ) -> Result<usize, PublishError> {
        self.publish_count.fetch_add(1, Ordering::Relaxed);

        let guard = self.topics.lock();
        let mut delivered = 0;
        let mut after = Bound::Unbounded;
        loop {
            // Заимствование отпускается до вызова обработчиков.
            let next = next_tier(&guard.borrow(), topic, after);
            let Some((key, priority, snapshot)) = next else {
                break;
            };
            delivered += self.dispatch(&key, priority, &snapshot, args)?;
            after = Bound::Excluded(priority);
        }

        if delivered == 0 {
            trace!(topic, "publish: no subscribers");
        }
        Ok(delivered)
    }

    /// Публикует аргументы только в один уровень топика.
    pub fn publish_at(
        &self,
        topic: &str,
        priority: Priority,
        args: &[A],
    ) -> Result<usize, PublishError> {
        self.publish_count.fetch_add(1, Ordering::Relaxed);

        let guard = self.topics.lock();
        let snapshot = snapshot_tier(&guard.borrow(), topic, priority);
        match snapshot {
            Some((key, snapshot)) => self.dispatch(&key, priority, &snapshot, args),
            None => {
                trace!(topic, priority, "publish: no such tier");
                Ok(0)
            }
        }
    }

    /// Есть ли в реестре такой топик (даже если все его уровни пусты).
    pub fn contains_topic(
        &self,
        topic: &str,
    ) -> bool {
        self.topics.lock().borrow().contains_key(topic)
    }

    /// Имена всех известных топиков в лексикографическом порядке.
    pub fn topics(&self) -> Vec<Arc<str>> {
        let mut names: Vec<_> = self.topics.lock().borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Уровни приоритета топика по возрастанию.
    pub fn priorities(
        &self,
        topic: &str,
    ) -> Vec<Priority> {
        self.topics
            .lock()
            .borrow()
            .get(topic)
            .map(|table| table.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Общее количество подписок на топик по всем уровням.
    pub fn subscriber_count(
        &self,
        topic: &str,
    ) -> usize {
        self.topics
            .lock()
            .borrow()
            .get(topic)
            .map(|table| table.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Количество подписок на одном уровне топика.
    pub fn tier_len(
        &self,
        topic: &str,
        priority: Priority,
    ) -> usize {
        self.topics
            .lock()
            .borrow()
            .get(topic)
            .and_then(|table| table.get(&priority))
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn dispatch(
        &self,
        topic: &Arc<str>,
        priority: Priority,
        snapshot: &[Entry<A>],
        args: &[A],
    ) -> Result<usize, PublishError> {
        for entry in snapshot {
            trace!(topic = %topic, priority, id = %entry.id, args = args.len(), "dispatch");
            if let Err(err) = (entry.callback)(args) {
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                warn!(
                    topic = %topic,
                    priority,
                    id = %entry.id,
                    error = %err,
                    "callback failed, aborting publish"
                );
                return Err(PublishError::callback(topic.clone(), priority, entry.id, err));
            }
            self.delivery_count.fetch_add(1, Ordering::Relaxed);
        }
        Ok(snapshot.len())
    }
}

fn snapshot_tier<A>(
    topics: &TopicTable<A>,
    topic: &str,
    priority: Priority,
) -> Option<(Arc<str>, Vec<Entry<A>>)> {
    let (key, table) = topics.get_key_value(topic)?;
    let tier = table.get(&priority)?;
    Some((key.clone(), tier.clone()))
}

/// Снимок первого уровня с приоритетом строго после `after`.
fn next_tier<A>(
    topics: &TopicTable<A>,
    topic: &str,
    after: Bound<Priority>,
) -> Option<TierSnapshot<A>> {
    let (key, table) = topics.get_key_value(topic)?;
    let (priority, tier) = table.range((after, Bound::Unbounded)).next()?;
    Some((key.clone(), *priority, tier.clone()))
}

impl<A> Default for TopicRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for TopicRegistry<A> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TopicRegistry")
            .field("topics", &self.topics.lock().borrow().len())
            .field("default_priority", &self.default_priority)
            .field("publish_count", &self.publish_count)
            .finish_non_exhaustive()
    }
}
