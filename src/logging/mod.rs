pub mod config;
mod filters;
pub mod formats;
mod report;

pub use config::LoggingConfig;
pub use formats::{build_layer, LogFormat};
pub use report::log_error_report;
use tracing_subscriber::{
    layer::SubscriberExt, registry::Registry, util::SubscriberInitExt, Layer,
};

use crate::error::{GenericError, MsgbusResult, ResultExt, StatusCode};

/// Устанавливает глобальный subscriber: один fmt-layer в stdout с фильтром
/// из `RUST_LOG` или `config.level`.
///
/// Повторный вызов возвращает ошибку `LoggingInitFailed`, установленный
/// ранее subscriber остаётся на месте.
pub fn init_logging(config: &LoggingConfig) -> MsgbusResult<()> {
    let filter = filters::build_filter_from_config(config);
    let layer = build_layer::<Registry, _>(config, std::io::stdout).with_filter(filter);

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| GenericError::new(StatusCode::LoggingInitFailed, e.to_string()))
        .context("installing global tracing subscriber")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.build_filter_directive(),
        format = ?config.format,
        "Logging system initialized"
    );
    Ok(())
}
