use std::{any::Any, fmt};

use super::{Signature, Topic};

/// Конверт отложенной публикации: топик, тег сигнатуры и собственная копия
/// значения.
///
/// Создаётся в `DeferredBus::publish`, потребляется ровно один раз при
/// выполнении очереди. Подписчики топика определяются в момент выполнения,
/// а не в момент публикации.
pub(crate) struct Envelope {
    topic: Topic,
    signature: Signature,
    payload: Box<dyn Any>,
}

impl Envelope {
    pub(crate) fn new<M: 'static>(
        topic: Topic,
        msg: M,
    ) -> Self {
        Self {
            topic,
            signature: Signature::of::<M>(),
            payload: Box::new(msg),
        }
    }

    pub(crate) fn topic(&self) -> &str {
        &self.topic
    }

    pub(crate) fn signature(&self) -> Signature {
        self.signature
    }

    pub(crate) fn payload(&self) -> &dyn Any {
        self.payload.as_ref()
    }
}

impl fmt::Debug for Envelope {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("topic", &self.topic)
            .field("signature", &self.signature)
            .finish()
    }
}
