/// Typed topic dispatch: registry, synchronous and deferred buses.
pub mod bus;
/// Bus configuration loading.
pub mod config;
/// Error types, re-exported from `msgbus-error`.
pub mod error;
/// Logging setup (filters, output formats).
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Buses, subscription handles and counters.
pub use bus::{
    BusStats, DeferredBus, DrainStats, MessageBus, Signature, SubscriptionId, Topic,
};
/// Bus configuration.
pub use config::BusConfig;
/// Operation errors and result types.
pub use error::{BusError, BusResult, MsgbusResult, StackError, StatusCode};
/// Logging.
pub use logging::{init_logging, log_error_report, LogFormat, LoggingConfig};
