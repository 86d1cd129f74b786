//! Runtime configuration for the monitor.
//!
//! Defaults are the device's factory constants; `conversions` bridges the
//! TOML-deserialized `tank_config` types onto these.

/// Level readings at or above this distance are critical.
pub const LEVEL_CRITICAL_CM: f32 = 400.0;
/// Level readings strictly between this and `LEVEL_CRITICAL_CM` warn.
pub const LEVEL_WARNING_CM: f32 = 300.0;
pub const PH_MIN: f32 = 6.5;
pub const PH_MAX: f32 = 8.5;
pub const TDS_MAX_PPM: f32 = 500.0;

/// 12-bit converter full scale.
pub const ADC_FULL_SCALE: u16 = 4095;
pub const PH_SPAN: f32 = 14.0;
pub const TDS_SPAN_PPM: f32 = 1000.0;

pub const BUZZER_FREQ_HZ: u32 = 1000;
/// Raw duty against `DUTY_FULL_SCALE`.
pub const BUZZER_DUTY: u16 = 70;
pub const DUTY_FULL_SCALE: u16 = 1023;
pub const CRITICAL_HOLD_MS: u64 = 100;
pub const WARNING_HOLD_MS: u64 = 100;
pub const WARNING_PAUSE_MS: u64 = 250;
pub const QUALITY_HOLD_MS: u64 = 250;

pub const IDLE_MS: u64 = 500;
pub const ECHO_TIMEOUT_US: u64 = 30_000;

/// Classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub level_warning_cm: f32,
    pub level_critical_cm: f32,
    pub ph_min: f32,
    pub ph_max: f32,
    pub tds_max_ppm: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            level_warning_cm: LEVEL_WARNING_CM,
            level_critical_cm: LEVEL_CRITICAL_CM,
            ph_min: PH_MIN,
            ph_max: PH_MAX,
            tds_max_ppm: TDS_MAX_PPM,
        }
    }
}

/// Linear code → engineering-unit scaling. No offset term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcScaling {
    pub full_scale: u16,
    pub ph_span: f32,
    pub tds_span_ppm: f32,
}

impl Default for AdcScaling {
    fn default() -> Self {
        Self {
            full_scale: ADC_FULL_SCALE,
            ph_span: PH_SPAN,
            tds_span_ppm: TDS_SPAN_PPM,
        }
    }
}

impl AdcScaling {
    /// `code / full_scale * ph_span`
    #[inline]
    pub fn ph(&self, code: u16) -> f32 {
        f32::from(code) / f32::from(self.full_scale) * self.ph_span
    }

    /// `code / full_scale * tds_span_ppm`
    #[inline]
    pub fn tds_ppm(&self, code: u16) -> f32 {
        f32::from(code) / f32::from(self.full_scale) * self.tds_span_ppm
    }
}

/// Buzzer carrier and per-state timing.
#[derive(Debug, Clone, PartialEq)]
pub struct BuzzerCfg {
    pub freq_hz: u32,
    pub duty: u16,
    pub critical_hold_ms: u64,
    pub warning_hold_ms: u64,
    /// Silent pause after the warning pulse, still inside the tick.
    pub warning_pause_ms: u64,
    pub quality_hold_ms: u64,
}

impl Default for BuzzerCfg {
    fn default() -> Self {
        Self {
            freq_hz: BUZZER_FREQ_HZ,
            duty: BUZZER_DUTY,
            critical_hold_ms: CRITICAL_HOLD_MS,
            warning_hold_ms: WARNING_HOLD_MS,
            warning_pause_ms: WARNING_PAUSE_MS,
            quality_hold_ms: QUALITY_HOLD_MS,
        }
    }
}

/// Loop pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingCfg {
    pub idle_ms: u64,
    pub echo_timeout_us: u64,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            idle_ms: IDLE_MS,
            echo_timeout_us: ECHO_TIMEOUT_US,
        }
    }
}
