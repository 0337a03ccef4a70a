use std::{cell::RefCell, rc::Rc};

use super::{
    cache::LastValueCache,
    registry::{dispatch, TopicRegistry},
    stats::StatsCell,
    BusStats, Signature, SubscriptionId,
};
use crate::{
    config::BusConfig,
    error::{BusError, BusResult},
};

/// Шина с немедленной доставкой.
///
/// `publish` вызывает обработчики топика прямо на стеке публикующего, в
/// порядке подписки, каждому передаётся собственная копия значения.
/// Дополнительно хранит последнее значение каждого топика, сохранённое через
/// [`publish_and_store`](Self::publish_and_store).
///
/// Шина однопоточная (`!Send`, `!Sync`). Чтобы несколько модулей работали с
/// одной шиной, передайте им `Rc<MessageBus>`.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
///
/// use msgbus::MessageBus;
///
/// let bus = MessageBus::new();
/// let last = Rc::new(Cell::new(0.0));
/// let sink = last.clone();
/// bus.subscribe("temp", move |celsius: f32| sink.set(celsius));
///
/// assert_eq!(bus.publish("temp", 21.5f32).unwrap(), 1);
/// assert_eq!(last.get(), 21.5);
/// ```
pub struct MessageBus {
    registry: RefCell<TopicRegistry>,
    cache: RefCell<LastValueCache>,
    stats: StatsCell,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::with_config(&BusConfig::default())
    }

    pub fn with_config(config: &BusConfig) -> Self {
        Self {
            registry: RefCell::new(TopicRegistry::with_capacity(config.topic_capacity)),
            cache: RefCell::new(LastValueCache::with_capacity(config.topic_capacity)),
            stats: StatsCell::default(),
        }
    }

    /// Подписывает обработчик на топик. Повторные подписки не
    /// отбрасываются: каждая будет вызвана.
    ///
    /// Тип сообщения `M` выводится из аргумента замыкания; для нескольких
    /// аргументов используйте кортеж.
    pub fn subscribe<M, F>(
        &self,
        topic: &str,
        callback: F,
    ) -> SubscriptionId
    where
        M: Clone + 'static,
        F: Fn(M) + 'static,
    {
        let id = self.registry.borrow_mut().insert::<M, F>(topic, callback);
        tracing::trace!(topic, %id, signature = std::any::type_name::<M>(), "subscribed");
        id
    }

    pub fn unsubscribe(
        &self,
        id: SubscriptionId,
    ) -> BusResult<()> {
        let removed = self.registry.borrow_mut().remove(id)?;
        tracing::trace!(topic = &**removed.topic(), %id, "unsubscribed");
        Ok(())
    }

    /// Количество живых подписок на топик.
    pub fn subscriber_count(
        &self,
        topic: &str,
    ) -> usize {
        self.registry.borrow().live_count(topic)
    }

    /// Рассылает значение подписчикам топика и возвращает количество
    /// вызванных обработчиков.
    ///
    /// Топик без подписчиков ошибкой не является: возвращается `Ok(0)`.
    /// Если сигнатура хотя бы одной подписки не совпадает с `M`, не
    /// вызывается никто и возвращается [`BusError::SignatureMismatch`].
    pub fn publish<M: Clone + 'static>(
        &self,
        topic: &str,
        msg: M,
    ) -> BusResult<usize> {
        self.stats.published();
        self.fan_out(topic, &msg)
    }

    /// Сохраняет копию значения в кэше последних значений, затем рассылает
    /// его как [`publish`](Self::publish). Сохранение происходит даже при
    /// отсутствии подписчиков.
    ///
    /// Все проверки сигнатур (кэша и подписок) выполняются до каких-либо
    /// изменений: при ошибке значение не сохраняется и не рассылается.
    pub fn publish_and_store<M: Clone + 'static>(
        &self,
        topic: &str,
        msg: M,
    ) -> BusResult<usize> {
        self.stats.published();
        let signature = Signature::of::<M>();
        let topic_key = {
            let mut registry = self.registry.borrow_mut();
            let checked = self
                .cache
                .borrow()
                .check(topic, signature)
                .and_then(|_| registry.verify(topic, signature, usize::MAX));
            if let Err(err) = checked {
                return Err(self.rejected(err));
            }
            registry.intern(topic)
        };

        self.cache.borrow_mut().store(topic_key, msg.clone())?;
        self.stats.stored();
        self.fan_out(topic, &msg)
    }

    /// Последнее значение, сохранённое через
    /// [`publish_and_store`](Self::publish_and_store), или `None`.
    ///
    /// Значение не извлекается: повторные чтения возвращают то же самое до
    /// следующего сохранения.
    pub fn get_latest_message<M: 'static>(
        &self,
        topic: &str,
    ) -> BusResult<Option<Rc<M>>> {
        self.cache.borrow().latest::<M>(topic)
    }

    pub fn stats(&self) -> BusStats {
        self.stats.snapshot()
    }

    fn fan_out<M: 'static>(
        &self,
        topic: &str,
        msg: &M,
    ) -> BusResult<usize> {
        match dispatch(&self.registry, topic, Signature::of::<M>(), msg) {
            Ok(delivered) => {
                self.stats.delivered(delivered);
                Ok(delivered)
            }
            Err(err) => Err(self.rejected(err)),
        }
    }

    fn rejected(
        &self,
        err: BusError,
    ) -> BusError {
        self.stats.mismatch();
        tracing::warn!(error = %err, "publish rejected");
        err
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
