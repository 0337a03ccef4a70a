use std::{any::Any, rc::Rc};

use rustc_hash::FxHashMap;

use super::{Signature, Topic};
use crate::error::BusResult;

/// Последнее сохранённое значение топика вместе с тегом сигнатуры.
struct CachedValue {
    signature: Signature,
    value: Rc<dyn Any>,
}

/// Кэш последних значений: одно значение на топик, перезаписывается при
/// каждом сохранении, не очищается.
#[derive(Default)]
pub(crate) struct LastValueCache {
    values: FxHashMap<Topic, CachedValue>,
}

impl LastValueCache {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Проверяет, можно ли сохранить значение типа `expected` в топик.
    pub(crate) fn check(
        &self,
        topic: &str,
        expected: Signature,
    ) -> BusResult<()> {
        match self.values.get(topic) {
            Some(cached) => cached.signature.verify(expected, topic),
            None => Ok(()),
        }
    }

    pub(crate) fn store<M: 'static>(
        &mut self,
        topic: Topic,
        msg: M,
    ) -> BusResult<()> {
        let signature = Signature::of::<M>();
        self.check(&topic, signature)?;
        self.values.insert(
            topic,
            CachedValue {
                signature,
                value: Rc::new(msg),
            },
        );
        Ok(())
    }

    /// Возвращает последнее значение, не извлекая его из кэша.
    pub(crate) fn latest<M: 'static>(
        &self,
        topic: &str,
    ) -> BusResult<Option<Rc<M>>> {
        let Some(cached) = self.values.get(topic) else {
            return Ok(None);
        };
        cached.signature.verify(Signature::of::<M>(), topic)?;
        Ok(cached.value.clone().downcast::<M>().ok())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BusError;

    #[test]
    fn test_missing_topic_is_none() {
        let cache = LastValueCache::default();
        assert_eq!(cache.latest::<u32>("nothing").unwrap(), None);
    }

    /// Тест проверяет, что сохраняется только последнее значение.
    #[test]
    fn test_overwrite_keeps_latest() {
        let mut cache = LastValueCache::with_capacity(2);
        cache.store(Rc::from("t"), 1u32).unwrap();
        cache.store(Rc::from("t"), 2u32).unwrap();

        assert_eq!(cache.latest::<u32>("t").unwrap().as_deref(), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    /// Тест проверяет, что чтение не извлекает значение.
    #[test]
    fn test_latest_is_repeatable() {
        let mut cache = LastValueCache::default();
        cache.store(Rc::from("t"), String::from("hello")).unwrap();

        let first = cache.latest::<String>("t").unwrap().unwrap();
        let second = cache.latest::<String>("t").unwrap().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_mismatched_read_and_store() {
        let mut cache = LastValueCache::default();
        cache.store(Rc::from("t"), 1u32).unwrap();

        assert!(matches!(
            cache.latest::<i64>("t"),
            Err(BusError::SignatureMismatch { .. })
        ));
        assert!(cache.store(Rc::from("t"), 1i64).is_err());
        // Старое значение осталось на месте.
        assert_eq!(cache.latest::<u32>("t").unwrap().as_deref(), Some(&1));
    }
}
