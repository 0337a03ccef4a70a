use std::{
    any::{type_name, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

use crate::error::{BusError, BusResult};

/// Тег сигнатуры сообщения.
///
/// Хранится рядом с каждым стёртым значением (подпиской, сообщением в
/// очереди, закэшированным значением) и сверяется до того, как значение
/// будет восстановлено к конкретному типу. Несовпадение превращается в
/// [`BusError::SignatureMismatch`].
#[derive(Clone, Copy)]
pub struct Signature {
    id: TypeId,
    name: &'static str,
}

impl Signature {
    /// Сигнатура для типа сообщения `M`.
    pub fn of<M: 'static>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: type_name::<M>(),
        }
    }

    /// Имя типа для сообщений об ошибках и логов.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<M: 'static>(&self) -> bool {
        self.id == TypeId::of::<M>()
    }

    /// Сверяет сигнатуру значения (`self`) с ожидаемой на месте вызова.
    pub(crate) fn verify(
        &self,
        expected: Signature,
        topic: &str,
    ) -> BusResult<()> {
        if *self == expected {
            return Ok(());
        }
        Err(BusError::SignatureMismatch {
            topic: topic.to_string(),
            expected: expected.name,
            found: self.name,
        })
    }
}

impl PartialEq for Signature {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.id == other.id
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Signature {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Signature({})", self.name)
    }
}

impl fmt::Display for Signature {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name)
    }
}
