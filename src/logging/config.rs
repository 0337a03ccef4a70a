use serde::{Deserialize, Serialize};

use config::{Config, ConfigError, Environment};

use super::formats::LogFormat;
use crate::error::{GenericError, MsgbusResult, ResultExt, StatusCode};

/// Префикс переменных окружения логирования, например `MSGBUS_LOG_LEVEL`.
pub const LOG_ENV_PREFIX: &str = "MSGBUS_LOG";

/// Конфигурация логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень или полная директива `EnvFilter` ("info", "msgbus=trace,warn").
    pub level: String,
    pub format: LogFormat,
    /// Цветной вывод (не действует для JSON).
    pub ansi: bool,
    /// Печатать target события (`msgbus::bus::deferred`).
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            ansi: true,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Значения по умолчанию, переопределённые переменными `MSGBUS_LOG_*`.
    pub fn load() -> MsgbusResult<Self> {
        Self::build()
            .map_err(|e| GenericError::new(StatusCode::ConfigError, e.to_string()))
            .context("loading logging config from MSGBUS_LOG_* environment")
    }

    fn build() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("level", defaults.level)?
            .set_default("format", "compact")?
            .set_default("ansi", defaults.ansi)?
            .set_default("with_target", defaults.with_target)?
            .add_source(Environment::with_prefix(LOG_ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Директива для `EnvFilter`.
    pub fn build_filter_directive(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            "info".to_string()
        } else {
            level.to_string()
        }
    }
}
