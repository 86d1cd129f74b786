//! Shared indicator arbitration.
//!
//! The RGB LED and the buzzer are one physical resource serving two alert
//! domains. `resolve` turns both states into a single `IndicatorCommand`
//! (fill level dominates water quality) and `Actuator` is the only writer of
//! the hardware.

use std::sync::Arc;
use std::time::Duration;

use tank_traits::clock::Clock;
use tank_traits::{Buzzer, ColorLed};

use crate::classify::{FillState, QualityState};
use crate::config::BuzzerCfg;
use crate::error::MonitorError;
use crate::hw_error::map_actuator_error;

/// On/off state of the three color lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(false, false, false);
    pub const RED: Rgb = Rgb::new(true, false, false);
    /// Red and green together.
    pub const AMBER: Rgb = Rgb::new(true, true, false);
    pub const BLUE: Rgb = Rgb::new(false, false, true);

    pub const fn new(red: bool, green: bool, blue: bool) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerCommand {
    Off,
    /// Sound at `duty` for `hold`, silence, then stay silent for `pause`.
    /// Both delays block the tick.
    OnWithDuty {
        duty: u16,
        hold: Duration,
        pause: Duration,
    },
}

impl BuzzerCommand {
    /// Time this command keeps the loop busy.
    pub fn blocking_time(&self) -> Duration {
        match self {
            BuzzerCommand::Off => Duration::ZERO,
            BuzzerCommand::OnWithDuty { hold, pause, .. } => *hold + *pause,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorCommand {
    pub color: Rgb,
    pub buzzer: BuzzerCommand,
}

/// Pick the one command for this tick.
///
/// Order: Critical, then Warning, then (fill Safe) water quality.
pub fn resolve(fill: FillState, quality: QualityState, cfg: &BuzzerCfg) -> IndicatorCommand {
    let pulse = |hold_ms: u64, pause_ms: u64| BuzzerCommand::OnWithDuty {
        duty: cfg.duty,
        hold: Duration::from_millis(hold_ms),
        pause: Duration::from_millis(pause_ms),
    };
    match (fill, quality) {
        (FillState::Critical, _) => IndicatorCommand {
            color: Rgb::RED,
            buzzer: pulse(cfg.critical_hold_ms, 0),
        },
        (FillState::Warning, _) => IndicatorCommand {
            color: Rgb::AMBER,
            buzzer: pulse(cfg.warning_hold_ms, cfg.warning_pause_ms),
        },
        (FillState::Safe, QualityState::Unsafe) => IndicatorCommand {
            color: Rgb::BLUE,
            buzzer: pulse(cfg.quality_hold_ms, 0),
        },
        (FillState::Safe, QualityState::Safe) => IndicatorCommand {
            color: Rgb::OFF,
            buzzer: BuzzerCommand::Off,
        },
    }
}

/// Single owner of the LED and buzzer.
pub struct Actuator<L: ColorLed, B: Buzzer> {
    led: L,
    buzzer: B,
    freq_hz: u32,
    clock: Arc<dyn Clock + Send + Sync>,
    last: Option<IndicatorCommand>,
}

impl<L: ColorLed, B: Buzzer> core::fmt::Debug for Actuator<L, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Actuator")
            .field("freq_hz", &self.freq_hz)
            .field("last", &self.last)
            .finish()
    }
}

impl<L: ColorLed, B: Buzzer> Actuator<L, B> {
    pub fn new(led: L, buzzer: B, freq_hz: u32, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            led,
            buzzer,
            freq_hz,
            clock,
            last: None,
        }
    }

    /// Last command applied without error, if any.
    pub fn last(&self) -> Option<IndicatorCommand> {
        self.last
    }

    /// Write all three color lines, then run the buzzer part of `cmd`.
    ///
    /// The first failed write ends the command; nothing is retried.
    pub fn apply(&mut self, cmd: IndicatorCommand) -> Result<(), MonitorError> {
        let Rgb { red, green, blue } = cmd.color;
        self.led
            .set_rgb(red, green, blue)
            .map_err(|e| map_actuator_error("rgb", &*e))?;

        match cmd.buzzer {
            BuzzerCommand::Off => {
                self.buzzer
                    .silence()
                    .map_err(|e| map_actuator_error("buzzer off", &*e))?;
            }
            BuzzerCommand::OnWithDuty { duty, hold, pause } => {
                self.buzzer
                    .start(self.freq_hz, duty)
                    .map_err(|e| map_actuator_error("buzzer on", &*e))?;
                self.clock.sleep(hold);
                self.buzzer
                    .silence()
                    .map_err(|e| map_actuator_error("buzzer off", &*e))?;
                self.clock.sleep(pause);
            }
        }

        tracing::debug!(
            red,
            green,
            blue,
            buzzer_ms = cmd.buzzer.blocking_time().as_millis() as u64,
            "indicator applied"
        );
        self.last = Some(cmd);
        Ok(())
    }
}
