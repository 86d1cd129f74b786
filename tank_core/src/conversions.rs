//! `From` implementations bridging `tank_config` types to `tank_core` types.

use crate::config::{AdcScaling, BuzzerCfg, Thresholds, TimingCfg};

// ── Thresholds ───────────────────────────────────────────────────────────────

impl From<&tank_config::ThresholdsCfg> for Thresholds {
    fn from(c: &tank_config::ThresholdsCfg) -> Self {
        Self {
            level_warning_cm: c.level_warning_cm,
            level_critical_cm: c.level_critical_cm,
            ph_min: c.ph_min,
            ph_max: c.ph_max,
            tds_max_ppm: c.tds_max_ppm,
        }
    }
}

// ── AdcScaling ───────────────────────────────────────────────────────────────

impl From<&tank_config::AdcCfg> for AdcScaling {
    fn from(c: &tank_config::AdcCfg) -> Self {
        Self {
            full_scale: c.full_scale,
            ph_span: c.ph_span,
            tds_span_ppm: c.tds_span_ppm,
        }
    }
}

// ── BuzzerCfg ────────────────────────────────────────────────────────────────

impl From<&tank_config::BuzzerCfg> for BuzzerCfg {
    fn from(c: &tank_config::BuzzerCfg) -> Self {
        Self {
            freq_hz: c.freq_hz,
            duty: c.duty,
            critical_hold_ms: c.critical_hold_ms,
            warning_hold_ms: c.warning_hold_ms,
            warning_pause_ms: c.warning_pause_ms,
            quality_hold_ms: c.quality_hold_ms,
        }
    }
}

// ── TimingCfg ────────────────────────────────────────────────────────────────

impl From<&tank_config::TimingCfg> for TimingCfg {
    fn from(c: &tank_config::TimingCfg) -> Self {
        Self {
            idle_ms: c.idle_ms,
            echo_timeout_us: c.echo_timeout_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_maps_to_core_defaults() {
        let cfg = tank_config::Config::default();
        assert_eq!(Thresholds::from(&cfg.thresholds), Thresholds::default());
        assert_eq!(AdcScaling::from(&cfg.adc), AdcScaling::default());
        assert_eq!(BuzzerCfg::from(&cfg.buzzer), BuzzerCfg::default());
        assert_eq!(TimingCfg::from(&cfg.timing), TimingCfg::default());
    }
}
