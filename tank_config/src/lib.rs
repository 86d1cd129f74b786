#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the tank monitor.
//!
//! Every section is optional; a missing key falls back to the device's
//! factory constants so an empty file is a valid configuration.
//! `Config::validate` rejects values the monitor cannot act on.
use serde::Deserialize;

/// BCM pin numbers (Raspberry Pi backend only; ignored by the simulator).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Pins {
    pub trig: u8,
    pub echo: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub buzzer: u8,
    /// SPI chip select of the MCP3208 carrying both analog probes
    pub adc_cs: u8,
    pub ph_channel: u8,
    pub tds_channel: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            trig: 23,
            echo: 24,
            red: 17,
            green: 27,
            blue: 22,
            buzzer: 18,
            adc_cs: 0,
            ph_channel: 0,
            tds_channel: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThresholdsCfg {
    /// Level readings strictly above this (and below critical) warn
    pub level_warning_cm: f32,
    /// Level readings at or above this are critical
    pub level_critical_cm: f32,
    pub ph_min: f32,
    pub ph_max: f32,
    pub tds_max_ppm: f32,
}

impl Default for ThresholdsCfg {
    fn default() -> Self {
        Self {
            level_warning_cm: 300.0,
            level_critical_cm: 400.0,
            ph_min: 6.5,
            ph_max: 8.5,
            tds_max_ppm: 500.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AdcCfg {
    /// Highest code the converter produces
    pub full_scale: u16,
    /// pH reported at full scale
    pub ph_span: f32,
    /// TDS (ppm) reported at full scale
    pub tds_span_ppm: f32,
}

impl Default for AdcCfg {
    fn default() -> Self {
        Self {
            full_scale: 4095,
            ph_span: 14.0,
            tds_span_ppm: 1000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BuzzerCfg {
    pub freq_hz: u32,
    /// Raw duty against a 1023 full scale
    pub duty: u16,
    pub critical_hold_ms: u64,
    pub warning_hold_ms: u64,
    pub warning_pause_ms: u64,
    pub quality_hold_ms: u64,
}

impl Default for BuzzerCfg {
    fn default() -> Self {
        Self {
            freq_hz: 1000,
            duty: 70,
            critical_hold_ms: 100,
            warning_hold_ms: 100,
            warning_pause_ms: 250,
            quality_hold_ms: 250,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimingCfg {
    /// Idle delay closing every tick
    pub idle_ms: u64,
    /// Give up on an echo after this long
    pub echo_timeout_us: u64,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            idle_ms: 500,
            echo_timeout_us: 30_000,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub thresholds: ThresholdsCfg,
    pub adc: AdcCfg,
    pub buzzer: BuzzerCfg,
    pub timing: TimingCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file (no validation).
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration in {:?}: {}", path, e))
}

fn finite_non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Thresholds
        let t = &self.thresholds;
        if !finite_non_negative(t.level_warning_cm) || !finite_non_negative(t.level_critical_cm) {
            eyre::bail!("thresholds.level_*_cm must be finite and >= 0");
        }
        if t.level_warning_cm >= t.level_critical_cm {
            eyre::bail!("thresholds.level_warning_cm must be below level_critical_cm");
        }
        if !(t.ph_min.is_finite() && t.ph_max.is_finite()) {
            eyre::bail!("thresholds.ph_min/ph_max must be finite");
        }
        if t.ph_min > t.ph_max {
            eyre::bail!("thresholds.ph_min must be <= ph_max");
        }
        if !finite_non_negative(t.tds_max_ppm) {
            eyre::bail!("thresholds.tds_max_ppm must be finite and >= 0");
        }

        // ADC
        if self.adc.full_scale == 0 {
            eyre::bail!("adc.full_scale must be > 0");
        }
        if !(self.adc.ph_span.is_finite() && self.adc.ph_span > 0.0) {
            eyre::bail!("adc.ph_span must be > 0");
        }
        if !(self.adc.tds_span_ppm.is_finite() && self.adc.tds_span_ppm > 0.0) {
            eyre::bail!("adc.tds_span_ppm must be > 0");
        }

        // Buzzer
        if self.buzzer.freq_hz == 0 {
            eyre::bail!("buzzer.freq_hz must be > 0");
        }
        if self.buzzer.duty > 1023 {
            eyre::bail!("buzzer.duty must be in [0, 1023]");
        }
        let holds = [
            self.buzzer.critical_hold_ms,
            self.buzzer.warning_hold_ms,
            self.buzzer.warning_pause_ms,
            self.buzzer.quality_hold_ms,
        ];
        if holds.iter().any(|&ms| ms > 10_000) {
            eyre::bail!("buzzer hold/pause durations are unreasonably large (>10s)");
        }

        // Timing
        if self.timing.idle_ms == 0 {
            eyre::bail!("timing.idle_ms must be >= 1");
        }
        if self.timing.idle_ms > 60 * 60 * 1000 {
            eyre::bail!("timing.idle_ms is unreasonably large (>1h)");
        }
        if self.timing.echo_timeout_us == 0 {
            eyre::bail!("timing.echo_timeout_us must be >= 1");
        }

        // Pins
        if self.pins.ph_channel > 7 || self.pins.tds_channel > 7 {
            eyre::bail!("pins.ph_channel/tds_channel must be in [0, 7]");
        }
        if self.pins.ph_channel == self.pins.tds_channel {
            eyre::bail!("pins.ph_channel and pins.tds_channel must differ");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot}");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_factory_constants() {
        let cfg = load_toml("").expect("parse");
        assert_eq!(cfg.thresholds.level_warning_cm, 300.0);
        assert_eq!(cfg.thresholds.level_critical_cm, 400.0);
        assert_eq!(cfg.adc.full_scale, 4095);
        assert_eq!(cfg.buzzer.duty, 70);
        assert_eq!(cfg.timing.idle_ms, 500);
        assert_eq!(cfg.timing.echo_timeout_us, 30_000);
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = load_toml("[thresholds]\ntds_max_ppm = 450.0\n").expect("parse");
        assert_eq!(cfg.thresholds.tds_max_ppm, 450.0);
        assert_eq!(cfg.thresholds.ph_max, 8.5);
    }
}
