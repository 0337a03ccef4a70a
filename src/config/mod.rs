pub mod settings;

pub use settings::{BusConfig, ENV_PREFIX};
