/// Немедленно возвращает ошибку из текущей функции.
///
/// Формы:
/// - `bail!(err)`: готовая ошибка или `StackError`-совместимый тип;
/// - `bail!(code, "msg")`: `GenericError` с кодом и сообщением;
/// - `bail!(code, "fmt {}", arg)`: то же с форматированием.
///
/// ```ignore
/// use msgbus_error::{bail, StatusCode};
///
/// fn check_capacity(n: usize) -> msgbus_error::MsgbusResult<()> {
///     if n == 0 {
///         bail!(StatusCode::InvalidConfig, "queue capacity must be positive");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::StackError::from($err))
    };
    ($code:expr, $msg:expr) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, $msg)
        ))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, format!($fmt, $($arg)*))
        ))
    };
}

/// Проверяет условие и вызывает `bail!`, если условие ложно.
///
/// Формы аналогичны `bail!`.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            $crate::bail!($err);
        }
    };
    ($cond:expr, $code:expr, $msg:expr) => {
        if !($cond) {
            $crate::bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($code, $fmt, $($arg)*);
        }
    };
}

/// Трейт-расширение для `Result`: `.context(...)` и `.with_context(...)`
/// превращают ошибку в [`StackError`](crate::StackError) и добавляют контекст.
pub trait ResultExt<T> {
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>;

    /// Ленивый контекст: замыкание вызывается только в случае ошибки.
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<crate::StackError>,
{
    #[track_caller]
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
    {
        self.map_err(|e| e.into().context(ctx))
    }

    #[track_caller]
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f()))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{BusError, GenericError, MsgbusResult, StatusCode};

    #[test]
    fn test_bail_typed_error() {
        fn example() -> MsgbusResult<()> {
            bail!(BusError::UnknownSubscription { id: 3 });
        }

        let err = example().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UnknownSubscription);
    }

    #[test]
    fn test_bail_with_format() {
        fn example(capacity: usize) -> MsgbusResult<()> {
            bail!(StatusCode::InvalidConfig, "bad capacity: {}", capacity);
        }

        let err = example(0).unwrap_err();
        assert!(err.to_string().contains("bad capacity: 0"));
        assert_eq!(err.status_code(), StatusCode::InvalidConfig);
    }

    #[test]
    fn test_ensure() {
        fn validate(capacity: usize) -> MsgbusResult<()> {
            ensure!(capacity > 0, StatusCode::InvalidConfig, "capacity must be positive");
            ensure!(
                capacity <= 4096,
                StatusCode::InvalidConfig,
                "capacity too large: {}",
                capacity
            );
            Ok(())
        }

        assert!(validate(32).is_ok());
        assert!(validate(0).is_err());
        assert!(validate(10_000).is_err());
    }

    #[test]
    fn test_result_ext_context() {
        fn inner() -> Result<(), GenericError> {
            Err(GenericError::new(StatusCode::Internal, "inner error"))
        }

        fn outer() -> MsgbusResult<()> {
            inner().context("outer context")?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.contexts().len(), 1);
        assert_eq!(err.contexts()[0].message, "outer context");
    }

    /// Тест проверяет, что ленивый контекст не вычисляется при успехе.
    #[test]
    fn test_with_context_lazy() {
        let calls = Cell::new(0);

        let ok: Result<(), GenericError> = Ok(());
        assert!(ok
            .with_context(|| {
                calls.set(calls.get() + 1);
                "never"
            })
            .is_ok());
        assert_eq!(calls.get(), 0);

        let failed: Result<(), GenericError> =
            Err(GenericError::new(StatusCode::Internal, "error"));
        assert!(failed
            .with_context(|| {
                calls.set(calls.get() + 1);
                "evaluated"
            })
            .is_err());
        assert_eq!(calls.get(), 1);
    }
}
