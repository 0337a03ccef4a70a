use tracing_subscriber::EnvFilter;

use super::config::LoggingConfig;

/// `RUST_LOG` имеет приоритет над конфигурацией. Некорректная директива из
/// конфигурации заменяется на "info".
pub(crate) fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    if let Ok(env_filter) = EnvFilter::try_from_default_env() {
        return env_filter;
    }

    let directive = config.build_filter_directive();
    match EnvFilter::try_new(&directive) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Invalid log filter directive '{directive}': {e}; falling back to 'info'");
            EnvFilter::new("info")
        }
    }
}
