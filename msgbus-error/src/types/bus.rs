use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки операций шины.
///
/// Отсутствие топика или сохранённого значения ошибкой не является;
/// сюда попадают только нарушения контракта вызывающей стороной.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// Тип сообщения на месте вызова не совпал с тем, под которым значение
    /// или подписка были зарегистрированы на этом топике.
    #[error("Signature mismatch on topic '{topic}': expected {expected}, found {found}")]
    SignatureMismatch {
        topic: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Подписка с таким идентификатором не существует или уже удалена.
    #[error("Unknown subscription id {id}")]
    UnknownSubscription { id: usize },

    #[error("Invalid bus configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type BusResult<T> = Result<T, BusError>;

impl ErrorExt for BusError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SignatureMismatch { .. } => StatusCode::TypeError,
            Self::UnknownSubscription { .. } => StatusCode::UnknownSubscription,
            Self::InvalidConfig { .. } => StatusCode::InvalidConfig,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "bus".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::SignatureMismatch {
                topic,
                expected,
                found,
            } => {
                tags.push(("topic", topic.clone()));
                tags.push(("expected", (*expected).to_string()));
                tags.push(("found", (*found).to_string()));
            }
            Self::UnknownSubscription { id } => {
                tags.push(("subscription_id", id.to_string()));
            }
            Self::InvalidConfig { .. } => {}
        }

        tags
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
