use std::cell::Cell;

/// Снимок счётчиков шины.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    /// Количество вызовов `publish`/`publish_and_store`.
    pub published: u64,
    /// Количество сохранений в кэш последних значений.
    pub stored: u64,
    /// Количество вызовов обработчиков.
    pub delivered: u64,
    /// Количество отклонённых рассылок из-за несовпадения сигнатуры.
    pub mismatches: u64,
    /// Количество выполненных записей очереди (только отложенная шина).
    pub drained: u64,
}

/// Счётчики без атомиков: шина однопоточная.
#[derive(Debug, Default)]
pub(crate) struct StatsCell {
    published: Cell<u64>,
    stored: Cell<u64>,
    delivered: Cell<u64>,
    mismatches: Cell<u64>,
    drained: Cell<u64>,
}

fn bump(
    cell: &Cell<u64>,
    n: u64,
) {
    cell.set(cell.get().wrapping_add(n));
}

impl StatsCell {
    pub(crate) fn published(&self) {
        bump(&self.published, 1);
    }

    pub(crate) fn stored(&self) {
        bump(&self.stored, 1);
    }

    pub(crate) fn delivered(
        &self,
        n: usize,
    ) {
        bump(&self.delivered, n as u64);
    }

    pub(crate) fn mismatch(&self) {
        bump(&self.mismatches, 1);
    }

    pub(crate) fn drained(&self) {
        bump(&self.drained, 1);
    }

    pub(crate) fn snapshot(&self) -> BusStats {
        BusStats {
            published: self.published.get(),
            stored: self.stored.get(),
            delivered: self.delivered.get(),
            mismatches: self.mismatches.get(),
            drained: self.drained.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = StatsCell::default();
        stats.published();
        stats.published();
        stats.delivered(3);
        stats.mismatch();

        assert_eq!(
            stats.snapshot(),
            BusStats {
                published: 2,
                stored: 0,
                delivered: 3,
                mismatches: 1,
                drained: 0,
            }
        );
    }
}
