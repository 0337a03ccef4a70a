use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, fmt::MakeWriter, layer::Layer, registry::LookupSpan};

use super::config::LoggingConfig;

/// Формат вывода логов.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Одна строка на событие, для последовательной консоли.
    #[default]
    Compact,
    /// Многострочный вывод для отладки на хосте.
    Pretty,
    /// JSON, по объекту на строку.
    Json,
}

/// Собирает fmt-layer для заданного формата и writer'а.
pub fn build_layer<S, W>(
    config: &LoggingConfig,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target)
        .with_thread_ids(false)
        .with_thread_names(false);

    match config.format {
        LogFormat::Compact => Box::new(base.compact().with_ansi(config.ansi)),
        LogFormat::Pretty => Box::new(base.pretty().with_ansi(config.ansi)),
        LogFormat::Json => Box::new(base.json().with_ansi(false)),
    }
}
