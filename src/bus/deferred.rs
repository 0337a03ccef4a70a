use std::{cell::RefCell, collections::VecDeque};

use super::{
    message::Envelope,
    registry::{dispatch, TopicRegistry},
    stats::StatsCell,
    BusStats, SubscriptionId,
};
use crate::{config::BusConfig, error::BusResult};

/// Итог одного вызова [`DeferredBus::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Выполнено записей очереди.
    pub entries: usize,
    /// Вызвано обработчиков.
    pub deliveries: usize,
    /// Записей, отклонённых из-за несовпадения сигнатуры.
    pub mismatches: usize,
}

/// Шина с отложенной доставкой.
///
/// `publish` только кладёт конверт с копией значения в очередь.
/// Обработчики вызываются из [`drain`](Self::drain), который хост вызывает
/// на каждой итерации своего цикла. Подписчики топика определяются в
/// момент выполнения записи: подписка, оформленная между `publish` и
/// `drain`, сообщение получит.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
///
/// use msgbus::DeferredBus;
///
/// let bus = DeferredBus::new();
/// bus.publish("button", 3u8);
///
/// let pressed = Rc::new(Cell::new(0));
/// let sink = pressed.clone();
/// bus.subscribe("button", move |id: u8| sink.set(id));
///
/// assert_eq!(bus.queue_size(), 1);
/// bus.drain();
/// assert_eq!(pressed.get(), 3);
/// assert_eq!(bus.queue_size(), 0);
/// ```
pub struct DeferredBus {
    registry: RefCell<TopicRegistry>,
    queue: RefCell<VecDeque<Envelope>>,
    stats: StatsCell,
}

impl DeferredBus {
    pub fn new() -> Self {
        Self::with_config(&BusConfig::default())
    }

    pub fn with_config(config: &BusConfig) -> Self {
        Self {
            registry: RefCell::new(TopicRegistry::with_capacity(config.topic_capacity)),
            queue: RefCell::new(VecDeque::with_capacity(config.queue_capacity)),
            stats: StatsCell::default(),
        }
    }

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

    /// Снимает подписку. Записи, уже стоящие в очереди, снятому обработчику
    /// не доставляются.
    pub fn unsubscribe(
        &self,
        id: SubscriptionId,
    ) -> BusResult<()> {
        let removed = self.registry.borrow_mut().remove(id)?;
        tracing::trace!(topic = &**removed.topic(), %id, "unsubscribed");
        Ok(())
    }

    pub fn subscriber_count(
        &self,
        topic: &str,
    ) -> usize {
        self.registry.borrow().live_count(topic)
    }

    /// Ставит значение в очередь. На стеке вызывающего ничего не вызывается.
    pub fn publish<M: Clone + 'static>(
        &self,
        topic: &str,
        msg: M,
    ) {
        let topic = self.registry.borrow_mut().intern(topic);
        self.queue.borrow_mut().push_back(Envelope::new(topic, msg));
        self.stats.published();
    }

    /// Выполняет очередь до опустошения, включая записи, добавленные
    /// подписчиками во время выполнения.
    ///
    /// Количество работы не ограничено: подписчик, который на каждое
    /// сообщение публикует новое, зациклит вызов. Для ограниченного шага
    /// используйте [`drain_at_most`](Self::drain_at_most).
    pub fn drain(&self) -> DrainStats {
        self.drain_at_most(usize::MAX)
    }

    /// Выполняет не более `limit` записей в порядке FIFO. Оставшиеся
    /// записи сохраняют свой порядок до следующего вызова.
    pub fn drain_at_most(
        &self,
        limit: usize,
    ) -> DrainStats {
        let mut stats = DrainStats::default();

        while stats.entries < limit {
            let Some(envelope) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            stats.entries += 1;
            self.stats.drained();

            match dispatch(
                &self.registry,
                envelope.topic(),
                envelope.signature(),
                envelope.payload(),
            ) {
                Ok(delivered) => {
                    stats.deliveries += delivered;
                    self.stats.delivered(delivered);
                }
                Err(err) => {
                    stats.mismatches += 1;
                    self.stats.mismatch();
                    tracing::warn!(error = %err, "dropping queued message");
                }
            }
        }

        if stats.entries > 0 {
            tracing::debug!(
                entries = stats.entries,
                deliveries = stats.deliveries,
                mismatches = stats.mismatches,
                pending = self.queue_size(),
                "queue drained"
            );
        }
        stats
    }

    /// Количество записей, ожидающих выполнения.
    pub fn queue_size(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn stats(&self) -> BusStats {
        self.stats.snapshot()
    }
}

impl Default for DeferredBus {
    fn default() -> Self {
        Self::new()
    }
}
