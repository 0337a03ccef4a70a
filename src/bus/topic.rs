use std::rc::Rc;

use rustc_hash::FxHashSet;

/// Имя топика. Один и тот же `Rc<str>` разделяют все записи реестра,
/// кэша и очереди одной шины.
pub type Topic = Rc<str>;

/// Пул имён топиков одной шины.
///
/// Повторная публикация в известный топик не выделяет память под имя:
/// возвращается уже существующий `Rc<str>`. Пул принадлежит экземпляру
/// шины, разные шины имён не разделяют.
#[derive(Debug, Default)]
pub(crate) struct TopicPool {
    names: FxHashSet<Topic>,
}

impl TopicPool {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            names: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Возвращает interned `Rc<str>` для имени, создавая его при первом
    /// обращении.
    pub(crate) fn intern(
        &mut self,
        name: &str,
    ) -> Topic {
        if let Some(existing) = self.names.get(name) {
            return existing.clone();
        }
        let topic: Topic = Rc::from(name);
        self.names.insert(topic.clone());
        topic
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}
