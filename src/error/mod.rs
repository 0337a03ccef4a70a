//! Error types used by the bus, re-exported from `msgbus-error` so that
//! callers only depend on this crate.

pub use msgbus_error::{
    bail, ensure, BusError, BusResult, ErrorContext, ErrorExt, GenericError, LogLevel,
    MsgbusResult, ResultExt, StackError, StatusCode,
};
