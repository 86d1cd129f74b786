//! Threshold classification of level and water-quality readings.
//!
//! Pure functions: the same inputs always give the same state, and nothing is
//! remembered between calls (no hysteresis band).

use crate::config::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillState {
    Safe,
    Warning,
    Critical,
}

impl FillState {
    /// Status line shown on the level display.
    pub fn label(&self) -> &'static str {
        match self {
            FillState::Safe => "SAFE LEVEL",
            FillState::Warning => "WARNING LEVEL!",
            FillState::Critical => "CRITICAL LEVEL !",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityState {
    Safe,
    Unsafe,
}

impl QualityState {
    /// Status line shown on the quality display.
    pub fn label(&self) -> &'static str {
        match self {
            QualityState::Safe => "WATER SAFE",
            QualityState::Unsafe => "WATER UNSAFE !",
        }
    }
}

impl Thresholds {
    /// `>= critical` is Critical, the open interval `(warning, critical)` is
    /// Warning, everything else (including exactly `warning`) is Safe.
    pub fn fill(&self, distance_cm: f32) -> FillState {
        if distance_cm >= self.level_critical_cm {
            FillState::Critical
        } else if distance_cm > self.level_warning_cm && distance_cm < self.level_critical_cm {
            FillState::Warning
        } else {
            FillState::Safe
        }
    }

    /// Unsafe when pH leaves `[ph_min, ph_max]` or TDS exceeds `tds_max_ppm`.
    pub fn quality(&self, ph: f32, tds_ppm: f32) -> QualityState {
        if ph < self.ph_min || ph > self.ph_max || tds_ppm > self.tds_max_ppm {
            QualityState::Unsafe
        } else {
            QualityState::Safe
        }
    }
}

/// Classify a level reading against the factory thresholds.
pub fn classify_fill(distance_cm: f32) -> FillState {
    Thresholds::default().fill(distance_cm)
}

/// Classify a (pH, TDS) pair against the factory thresholds.
pub fn classify_quality(ph: f32, tds_ppm: f32) -> QualityState {
    Thresholds::default().quality(ph, tds_ppm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, FillState::Safe)]
    #[case(299.99, FillState::Safe)]
    #[case(300.0, FillState::Safe)]
    #[case(300.01, FillState::Warning)]
    #[case(350.0, FillState::Warning)]
    #[case(399.99, FillState::Warning)]
    #[case(400.0, FillState::Critical)]
    #[case(450.0, FillState::Critical)]
    fn fill_boundaries(#[case] cm: f32, #[case] expected: FillState) {
        assert_eq!(classify_fill(cm), expected);
    }

    #[rstest]
    #[case(7.0, 200.0, QualityState::Safe)]
    #[case(6.5, 500.0, QualityState::Safe)]
    #[case(8.5, 0.0, QualityState::Safe)]
    #[case(6.49, 200.0, QualityState::Unsafe)]
    #[case(9.0, 200.0, QualityState::Unsafe)]
    #[case(7.0, 500.5, QualityState::Unsafe)]
    fn quality_boundaries(#[case] ph: f32, #[case] tds: f32, #[case] expected: QualityState) {
        assert_eq!(classify_quality(ph, tds), expected);
    }

    #[test]
    fn overridden_thresholds_shift_bands() {
        let t = Thresholds {
            level_warning_cm: 100.0,
            level_critical_cm: 150.0,
            ..Thresholds::default()
        };
        assert_eq!(t.fill(100.0), FillState::Safe);
        assert_eq!(t.fill(120.0), FillState::Warning);
        assert_eq!(t.fill(150.0), FillState::Critical);
    }

    #[test]
    fn labels_match_panel_text() {
        assert_eq!(FillState::Critical.label(), "CRITICAL LEVEL !");
        assert_eq!(FillState::Warning.label(), "WARNING LEVEL!");
        assert_eq!(FillState::Safe.label(), "SAFE LEVEL");
        assert_eq!(QualityState::Unsafe.label(), "WATER UNSAFE !");
        assert_eq!(QualityState::Safe.label(), "WATER SAFE");
    }
}
