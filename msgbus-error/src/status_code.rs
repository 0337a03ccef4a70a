use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок шины.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки данных и типов (граница стирания типов)
/// - 3xxx: Подписки
/// - 5xxx: Окружение (конфигурация, логирование)
///
/// # Реализация:
/// - `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`.
/// - опционально: `strum` для `AsRefStr`/`EnumIter` (feature = "strum").
/// - опционально: `serde_repr` для сериализации в виде числового значения
///   (feature = "serde_repr").
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Internal = 1002,

    // === 2xxx: Данные/типы ===
    TypeError = 2001,

    // === 3xxx: Подписки ===
    UnknownSubscription = 3000,

    // === 5xxx: Окружение ===
    ConfigError = 5000,
    InvalidConfig = 5001,
    LoggingInitFailed = 5002,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    ///
    /// Возвращает `None`, если значение не соответствует ни одному варианту.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Вернёт `true`, если переданный `code` означает успешный результат.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Ошибка вызывающей стороны: несогласованные сигнатуры, неизвестные
    /// подписки.
    pub fn is_caller_error(&self) -> bool {
        (2000..=3999).contains(&self.code())
    }

    /// Ошибка окружения (диапазон 5xxx).
    pub fn is_environment_error(&self) -> bool {
        (5000..=5999).contains(&self.code())
    }

    /// Требуется ли логировать как критическую ошибку.
    ///
    /// Несовпадение сигнатуры считается критическим: это нарушение
    /// контракта топика, а не штатная ситуация.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Internal | Self::TypeError)
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::UnknownSubscription => LogLevel::Info,
            Self::InvalidConfig | Self::ConfigError | Self::LoggingInitFailed => LogLevel::Warn,
            Self::Internal | Self::TypeError => LogLevel::Error,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет разделение ошибок вызывающей стороны и окружения.
    #[test]
    fn test_caller_vs_environment() {
        assert!(StatusCode::TypeError.is_caller_error());
        assert!(StatusCode::UnknownSubscription.is_caller_error());
        assert!(!StatusCode::InvalidConfig.is_caller_error());
        assert!(StatusCode::InvalidConfig.is_environment_error());
        assert!(StatusCode::LoggingInitFailed.is_environment_error());
        assert!(!StatusCode::TypeError.is_environment_error());
        assert!(!StatusCode::Internal.is_caller_error());
    }

    /// Тест проверяет конвертацию через `TryFrom<u32>` и вспомогательную
    /// `from_u32`.
    #[test]
    fn test_from_try_from_u32() {
        let n = StatusCode::TypeError.code();
        assert_eq!(StatusCode::try_from(n).unwrap(), StatusCode::TypeError);
        assert_eq!(StatusCode::from_u32(3000), Some(StatusCode::UnknownSubscription));
        assert!(StatusCode::from_u32(99999).is_none());
        assert!(StatusCode::from_u32(1000).is_none());
    }

    /// Тест проверяет получение числового представления и конвертацию
    /// `From<StatusCode> for u32`.
    #[test]
    fn test_code_and_into() {
        let c = StatusCode::UnknownSubscription;
        assert_eq!(c.code(), 3000);
        let n: u32 = c.into();
        assert_eq!(n, 3000);
        assert!(StatusCode::is_success(StatusCode::Success.code()));
        assert!(!StatusCode::is_success(StatusCode::TypeError.code()));
    }

    /// Тест проверяет, что несовпадение сигнатуры помечается как критическое.
    #[test]
    fn test_is_critical() {
        assert!(StatusCode::TypeError.is_critical());
        assert!(StatusCode::Internal.is_critical());
        assert!(!StatusCode::UnknownSubscription.is_critical());
    }

    #[test]
    fn test_log_level_mappings() {
        assert_eq!(StatusCode::Success.log_level(), LogLevel::Trace);
        assert_eq!(StatusCode::UnknownSubscription.log_level(), LogLevel::Info);
        assert_eq!(StatusCode::InvalidConfig.log_level(), LogLevel::Warn);
        assert_eq!(StatusCode::TypeError.log_level(), LogLevel::Error);
    }

    /// Тест проверяет формат `Display`: строка должна содержать имя варианта и
    /// числовой код.
    #[test]
    fn test_display_contains_name_and_code() {
        let s = format!("{}", StatusCode::TypeError);
        assert!(s.contains("2001"), "Display must contain code 2001, got: {s}");
        assert!(
            s.contains("TypeError"),
            "Display must contain variant name 'TypeError', got: {s}"
        );
    }
}
