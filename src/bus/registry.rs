use std::{any::Any, cell::RefCell};

use rustc_hash::FxHashMap;

use super::{topic::TopicPool, Signature, Subscription, SubscriptionId, Topic};
use crate::error::{BusError, BusResult};

/// Реестр топиков: имя топика → упорядоченный список подписок.
///
/// Подписки живут в арене слотов, индекс слота и есть [`SubscriptionId`].
/// Отписка оставляет в слоте надгробие (`None`), списки топиков не
/// перестраиваются, диспетчер просто пропускает пустые слоты.
///
/// Слоты не переиспользуются: каждая подписка получает новый индекс, а
/// надгробия остаются в `slots` и в списке топика до конца жизни шины.
/// Снятый идентификатор поэтому никогда не начинает указывать на чужую
/// подписку, но память и время рассылки растут с числом циклов
/// подписка/отписка на топике.
#[derive(Debug, Default)]
pub(crate) struct TopicRegistry {
    topics: TopicPool,
    slots: Vec<Option<Subscription>>,
    by_topic: FxHashMap<Topic, Vec<SubscriptionId>>,
}

impl TopicRegistry {
    pub(crate) fn with_capacity(topic_capacity: usize) -> Self {
        Self {
            topics: TopicPool::with_capacity(topic_capacity),
            slots: Vec::new(),
            by_topic: FxHashMap::with_capacity_and_hasher(topic_capacity, Default::default()),
        }
    }

    pub(crate) fn intern(
        &mut self,
        topic: &str,
    ) -> Topic {
        self.topics.intern(topic)
    }

    /// Добавляет подписку в конец списка топика. Дубликаты разрешены.
    pub(crate) fn insert<M, F>(
        &mut self,
        topic: &str,
        callback: F,
    ) -> SubscriptionId
    where
        M: Clone + 'static,
        F: Fn(M) + 'static,
    {
        let topic = self.topics.intern(topic);
        let id = SubscriptionId::new(self.slots.len());
        self.slots
            .push(Some(Subscription::new::<M, F>(topic.clone(), callback)));
        self.by_topic.entry(topic).or_default().push(id);
        id
    }

    /// Помечает слот удалённым и возвращает снятую подписку.
    pub(crate) fn remove(
        &mut self,
        id: SubscriptionId,
    ) -> BusResult<Subscription> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(BusError::UnknownSubscription { id: id.index() })
    }

    /// Длина списка топика вместе с надгробиями.
    pub(crate) fn slot_count(
        &self,
        topic: &str,
    ) -> usize {
        self.by_topic.get(topic).map_or(0, Vec::len)
    }

    /// Количество живых подписок на топик.
    pub(crate) fn live_count(
        &self,
        topic: &str,
    ) -> usize {
        self.live(topic, usize::MAX).count()
    }

    /// Живая подписка на позиции `position` списка топика.
    pub(crate) fn get(
        &self,
        topic: &str,
        position: usize,
    ) -> Option<Subscription> {
        let id = self.by_topic.get(topic)?.get(position)?;
        self.slots[id.index()].clone()
    }

    /// Сверяет сигнатуры первых `upto` позиций топика с ожидаемой.
    /// Возвращает число живых подписок среди них.
    pub(crate) fn verify(
        &self,
        topic: &str,
        expected: Signature,
        upto: usize,
    ) -> BusResult<usize> {
        let mut live = 0;
        for sub in self.live(topic, upto) {
            sub.signature().verify(expected, topic)?;
            live += 1;
        }
        Ok(live)
    }

    fn live<'a>(
        &'a self,
        topic: &str,
        upto: usize,
    ) -> impl Iterator<Item = &'a Subscription> + 'a {
        self.by_topic
            .get(topic)
            .into_iter()
            .flat_map(move |ids| ids.iter().take(upto))
            .filter_map(|id| self.slots[id.index()].as_ref())
    }
}

/// Рассылает стёртое значение всем подпискам топика в порядке регистрации.
///
/// Сначала сверяются сигнатуры всех подписок, существующих на момент
/// вызова: при несовпадении не вызывается никто. Затем подписки
/// вызываются по одной, заимствование реестра на время вызова
/// отпускается, поэтому обработчик может подписываться, отписываться и
/// публиковать. Подписки, добавленные во время рассылки, текущее
/// значение не получают; снятые во время рассылки пропускаются.
pub(crate) fn dispatch(
    registry: &RefCell<TopicRegistry>,
    topic: &str,
    signature: Signature,
    payload: &dyn Any,
) -> BusResult<usize> {
    let snapshot_len = {
        let registry = registry.borrow();
        let len = registry.slot_count(topic);
        if registry.verify(topic, signature, len)? == 0 {
            return Ok(0);
        }
        len
    };

    let mut delivered = 0;
    for position in 0..snapshot_len {
        let Some(sub) = registry.borrow().get(topic, position) else {
            continue;
        };
        if sub.deliver(payload) {
            delivered += 1;
        }
    }

    tracing::trace!(topic, delivered, "dispatched message");
    Ok(delivered)
}
