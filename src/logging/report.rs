use crate::error::{LogLevel, StackError};

/// Пишет ошибку в лог одним событием: уровень берётся из кода статуса,
/// поле `report` содержит JSON-отчёт с кодом, сообщением и цепочкой
/// контекстов.
pub fn log_error_report(err: &StackError) {
    let report = match serde_json::to_string(&err.to_report()) {
        Ok(json) => json,
        Err(e) => format!("{{\"unserializable\":\"{e}\"}}"),
    };
    let code = err.status_code().code();

    match err.log_level() {
        LogLevel::Trace => tracing::trace!(code, %report, "{err}"),
        LogLevel::Debug => tracing::debug!(code, %report, "{err}"),
        LogLevel::Info => tracing::info!(code, %report, "{err}"),
        LogLevel::Warn => tracing::warn!(code, %report, "{err}"),
        LogLevel::Error => tracing::error!(code, %report, "{err}"),
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::*;
    use crate::{
        error::{BusError, ResultExt},
        logging::{build_layer, capture::VecMakeWriter, LogFormat, LoggingConfig},
    };

    fn capture(err: &StackError) -> serde_json::Value {
        let buffer = VecMakeWriter::default();
        let cfg = LoggingConfig {
            format: LogFormat::Json,
            ..LoggingConfig::default()
        };
        let subscriber = Registry::default().with(build_layer(&cfg, buffer.clone()));
        tracing::subscriber::with_default(subscriber, || log_error_report(err));

        let out = buffer.contents();
        let line = out.lines().next().expect("nothing was logged");
        serde_json::from_str(line).unwrap()
    }

    /// Тест проверяет, что отчёт содержит код, сообщение и контекст, а
    /// уровень события следует коду статуса.
    #[test]
    fn test_report_fields_and_level() {
        let res: Result<(), BusError> = Err(BusError::SignatureMismatch {
            topic: "imu".to_string(),
            expected: "u8",
            found: "f32",
        });
        let err = res.context("publishing sample").unwrap_err();

        let event = capture(&err);
        assert_eq!(event["level"], "ERROR");
        assert_eq!(event["fields"]["code"], 2001);

        let report: serde_json::Value =
            serde_json::from_str(event["fields"]["report"].as_str().unwrap()).unwrap();
        assert_eq!(report["code"], 2001);
        assert!(report["message"].as_str().unwrap().contains("topic 'imu'"));
        assert!(report["contexts"][0]
            .as_str()
            .unwrap()
            .starts_with("publishing sample"));
    }

    #[test]
    fn test_config_error_logged_as_warn() {
        let err = StackError::from(BusError::InvalidConfig {
            reason: "queue_capacity must be positive".to_string(),
        });
        let event = capture(&err);
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["fields"]["code"], 5001);
    }
}
