#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core monitoring logic (hardware-agnostic).
//!
//! All hardware interactions go through the `tank_traits` device traits; the
//! crate never touches pins directly.
//!
//! ## Architecture
//!
//! - **Classification**: level → `FillState`, (pH, TDS) → `QualityState` (`classify`)
//! - **Indicator**: one resolver and one writer for the shared LED + buzzer (`indicator`)
//! - **Panels**: status frames for the two displays (`display`)
//! - **Loop**: the per-tick phase machine and its builder (`monitor`)
//! - **Configuration**: named constants and runtime structs (`config`)

pub mod classify;
pub mod config;
pub mod conversions;
pub mod display;
pub mod error;
pub mod hw_error;
pub mod indicator;
pub mod monitor;
pub mod sample;

pub use classify::{FillState, QualityState, classify_fill, classify_quality};
pub use config::{AdcScaling, BuzzerCfg, Thresholds, TimingCfg};
pub use display::{DisplayFrame, SurfaceId, TextLine};
pub use error::{BuildError, MonitorError};
pub use indicator::{Actuator, BuzzerCommand, IndicatorCommand, Rgb, resolve};
pub use monitor::{Actuation, Evaluation, Monitor, MonitorBuilder, Phase, TickReport, evaluate};
pub use sample::{SensorKind, SensorSample};
