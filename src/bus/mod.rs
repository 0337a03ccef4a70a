//! Типизированная шина сообщений по топикам.
//!
//! Подсистема позволяет зарегистрировать обработчик с произвольной, известной
//! на этапе компиляции сигнатурой под строковым именем топика, хранить его за
//! единым стёртым представлением и безопасно вызывать позже:
//!
//! - `registry` (приватный): реестр топиков, арена подписок, рассылка.
//! - `signature`: тег сигнатуры, сверяемый на границе стирания типов.
//! - `subscription`: стёртая подписка и её идентификатор.
//! - `topic`: имена топиков и их пул.
//! - `cache` (приватный): кэш последних значений.
//! - `message` (приватный): конверт отложенной публикации.
//! - `sync_bus`: [`MessageBus`], немедленная доставка.
//! - `deferred`: [`DeferredBus`], доставка через очередь.
//! - `stats`: счётчики шины.

mod cache;
pub mod deferred;
mod message;
mod registry;
pub mod signature;
pub mod stats;
pub mod subscription;
pub mod sync_bus;
pub mod topic;

pub use deferred::{DeferredBus, DrainStats};
pub use signature::Signature;
pub use stats::BusStats;
pub(crate) use subscription::Subscription;
pub use subscription::SubscriptionId;
pub use sync_bus::MessageBus;
pub use topic::Topic;
