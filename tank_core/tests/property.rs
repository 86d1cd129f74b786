use proptest::prelude::*;
use tank_core::{
    BuzzerCfg, FillState, QualityState, Rgb, Thresholds, classify_fill, classify_quality, resolve,
};

fn any_fill() -> impl Strategy<Value = FillState> {
    prop_oneof![
        Just(FillState::Safe),
        Just(FillState::Warning),
        Just(FillState::Critical)
    ]
}

fn any_quality() -> impl Strategy<Value = QualityState> {
    prop_oneof![Just(QualityState::Safe), Just(QualityState::Unsafe)]
}

proptest! {
    #[test]
    fn below_warning_is_safe(d in 0.0f32..300.0) {
        prop_assert_eq!(classify_fill(d), FillState::Safe);
    }

    #[test]
    fn warning_band_is_open_interval(d in 300.0f32..400.0) {
        prop_assume!(d > 300.0);
        prop_assert_eq!(classify_fill(d), FillState::Warning);
    }

    #[test]
    fn at_or_above_critical(d in 400.0f32..10_000.0) {
        prop_assert_eq!(classify_fill(d), FillState::Critical);
    }

    #[test]
    fn quality_safe_inside_bounds(ph in 6.5f32..=8.5, tds in 0.0f32..=500.0) {
        prop_assert_eq!(classify_quality(ph, tds), QualityState::Safe);
    }

    #[test]
    fn quality_unsafe_outside_bounds(
        ph in prop_oneof![0.0f32..6.5, 8.5f32..14.0],
        tds in 0.0f32..1000.0,
    ) {
        prop_assume!(ph != 8.5);
        prop_assert_eq!(classify_quality(ph, tds), QualityState::Unsafe);
    }

    #[test]
    fn high_tds_is_unsafe(ph in 6.5f32..=8.5, tds in 500.0f32..1000.0) {
        prop_assume!(tds > 500.0);
        prop_assert_eq!(classify_quality(ph, tds), QualityState::Unsafe);
    }

    #[test]
    fn classification_is_idempotent(d in -10.0f32..1000.0, ph in 0.0f32..14.0, tds in 0.0f32..1000.0) {
        let t = Thresholds::default();
        prop_assert_eq!(t.fill(d), t.fill(d));
        prop_assert_eq!(t.quality(ph, tds), t.quality(ph, tds));
    }

    #[test]
    fn level_alerts_dominate(fill in any_fill(), quality in any_quality()) {
        let cmd = resolve(fill, quality, &BuzzerCfg::default());
        match fill {
            FillState::Critical => prop_assert_eq!(cmd.color, Rgb::RED),
            FillState::Warning => prop_assert_eq!(cmd.color, Rgb::AMBER),
            FillState::Safe => prop_assert_eq!(
                cmd.color,
                if quality == QualityState::Unsafe { Rgb::BLUE } else { Rgb::OFF }
            ),
        }
    }
}

#[test]
fn exactly_three_hundred_is_safe() {
    assert_eq!(classify_fill(300.0), FillState::Safe);
    assert_eq!(classify_fill(400.0), FillState::Critical);
}
