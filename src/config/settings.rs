use serde::{Deserialize, Serialize};

use config::{Config, ConfigError, Environment};

use crate::error::{BusError, BusResult, GenericError, MsgbusResult, ResultExt, StatusCode};

/// Префикс переменных окружения, например `MSGBUS_QUEUE_CAPACITY`.
pub const ENV_PREFIX: &str = "MSGBUS";

const DEFAULT_TOPIC_CAPACITY: usize = 16;
const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Параметры предварительного выделения памяти шины.
///
/// Ни один из параметров не ограничивает шину: очередь и таблица топиков
/// растут при необходимости. Ёмкости задают размер, выделяемый заранее,
/// чтобы в рабочем цикле не было перераспределений.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Ожидаемое количество топиков.
    pub topic_capacity: usize,
    /// Ожидаемое количество записей в очереди отложенной шины.
    pub queue_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            topic_capacity: DEFAULT_TOPIC_CAPACITY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl BusConfig {
    /// Загружает конфигурацию: значения по умолчанию, затем переменные
    /// окружения с префиксом `MSGBUS_`.
    pub fn load() -> MsgbusResult<Self> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    pub fn load_with_prefix(prefix: &str) -> MsgbusResult<Self> {
        let cfg = Self::build(prefix)
            .map_err(|e| GenericError::new(StatusCode::ConfigError, e.to_string()))
            .with_context(|| format!("loading bus config from {prefix}_* environment"))?;
        cfg.validate().context("validating bus config")?;
        Ok(cfg)
    }

    fn build(prefix: &str) -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            // Значения по умолчанию
            .set_default("topic_capacity", DEFAULT_TOPIC_CAPACITY as i64)?
            .set_default("queue_capacity", DEFAULT_QUEUE_CAPACITY as i64)?
            // Переменные окружения с префиксом
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?;

        cfg.try_deserialize()
    }

    /// Нулевая ёмкость очереди почти наверняка ошибка в окружении.
    pub fn validate(&self) -> BusResult<()> {
        if self.queue_capacity == 0 {
            return Err(BusError::InvalidConfig {
                reason: "queue_capacity must be positive".to_string(),
            });
        }
        Ok(())
    }
}
