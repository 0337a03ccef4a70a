use std::{any::Any, fmt, rc::Rc};

use super::{Signature, Topic};

/// Идентификатор подписки.
///
/// Это индекс слота в арене реестра: после `unsubscribe` слот помечается
/// удалённым, остальные идентификаторы остаются действительными.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(usize);

impl SubscriptionId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Доставка стёртого значения подписчику.
///
/// Реализуется только [`Callback`]; наружу видна через `Rc<dyn Deliver>`.
trait Deliver {
    /// Восстанавливает `payload` к типу подписки и вызывает обработчик с
    /// собственной копией значения. Возвращает `false`, если тип не совпал.
    fn deliver(
        &self,
        payload: &dyn Any,
    ) -> bool;
}

/// Подписка с конкретной сигнатурой `M`.
struct Callback<M> {
    func: Box<dyn Fn(M)>,
}

impl<M: Clone + 'static> Deliver for Callback<M> {
    fn deliver(
        &self,
        payload: &dyn Any,
    ) -> bool {
        match payload.downcast_ref::<M>() {
            Some(msg) => {
                (self.func)(msg.clone());
                true
            }
            None => false,
        }
    }
}

/// Подписка за границей стирания типов: тег сигнатуры + непрозрачный
/// обработчик.
///
/// Клонирование дешёвое (`Rc`), поэтому диспетчер может взять подписку из
/// реестра и отпустить заимствование до вызова обработчика.
#[derive(Clone)]
pub(crate) struct Subscription {
    topic: Topic,
    signature: Signature,
    handler: Rc<dyn Deliver>,
}

impl Subscription {
    pub(crate) fn new<M, F>(
        topic: Topic,
        callback: F,
    ) -> Self
    where
        M: Clone + 'static,
        F: Fn(M) + 'static,
    {
        Self {
            topic,
            signature: Signature::of::<M>(),
            handler: Rc::new(Callback {
                func: Box::new(callback),
            }),
        }
    }

    pub(crate) fn topic(&self) -> &Topic {
        &self.topic
    }

    pub(crate) fn signature(&self) -> Signature {
        self.signature
    }

    pub(crate) fn deliver(
        &self,
        payload: &dyn Any,
    ) -> bool {
        self.handler.deliver(payload)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("signature", &self.signature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_deliver_matching_payload() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = Subscription::new(Rc::from("imu"), move |(x, y): (i16, i16)| {
            sink.borrow_mut().push(x + y)
        });

        assert_eq!(sub.signature(), Signature::of::<(i16, i16)>());
        assert!(sub.deliver(&(2i16, 3i16)));
        assert_eq!(*seen.borrow(), vec![5]);
    }

    /// Тест проверяет, что значение чужого типа не доходит до обработчика.
    #[test]
    fn test_deliver_rejects_foreign_payload() {
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let sub = Subscription::new(Rc::from("imu"), move |_: u8| *counter.borrow_mut() += 1);

        assert!(!sub.deliver(&"not a byte"));
        assert_eq!(*calls.borrow(), 0);
    }

    /// Тест проверяет, что каждый вызов получает свою копию значения.
    #[test]
    fn test_each_delivery_gets_own_copy() {
        let payload = vec![1u8, 2, 3];
        let sub = Subscription::new(Rc::from("raw"), |mut v: Vec<u8>| v.clear());

        assert!(sub.deliver(&payload));
        assert!(sub.deliver(&payload));
        assert_eq!(payload, vec![1, 2, 3]);
    }

    #[test]
    fn test_subscription_id_display() {
        assert_eq!(SubscriptionId::new(7).to_string(), "sub#7");
        assert_eq!(SubscriptionId::new(7).index(), 7);
    }
}
