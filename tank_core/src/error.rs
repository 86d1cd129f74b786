use thiserror::Error;

use crate::sample::SensorKind;

/// Faults observed while running a tick. None of them stop the loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MonitorError {
    #[error("ranging timeout: no echo")]
    RangingTimeout,
    #[error("ranging fault: {0}")]
    RangingFault(String),
    #[error("adc fault on {channel}: {message}")]
    AdcFault { channel: SensorKind, message: String },
    #[error("display write fault on {surface}: {message}")]
    DisplayWrite { surface: String, message: String },
    #[error("actuator write fault: {0}")]
    ActuatorWrite(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing sensors")]
    MissingSensors,
    #[error("missing indicator")]
    MissingIndicator,
    #[error("missing displays")]
    MissingDisplays,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
