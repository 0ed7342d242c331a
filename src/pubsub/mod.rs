//! Подсистема Publish–Subscribe (pub/sub).
//!
//! Внутрипроцессный диспетчер: обработчики подписываются на именованные
//! топики с необязательным приоритетом, публикация синхронно вызывает их с
//! упорядоченным списком аргументов.
//!
//! - `callback`: тип обработчика и приоритета.
//! - `registry`: реестр подписок, публикация и отписка.
//! - `subscription`: хэндл подписки и её идентификатор.
//! - `global`: общий для процесса реестр поверх `serde_json::Value`.

mod callback;
pub mod global;
pub mod registry;
pub mod subscription;

pub use callback::*;
pub use registry::TopicRegistry;
pub use subscription::{Subscription, SubscriptionId};
