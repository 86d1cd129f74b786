#![no_main]
use libfuzzer_sys::fuzz_target;
use tank_core::{BuzzerCfg, FillState, Rgb, Thresholds, evaluate};

fuzz_target!(|input: (f32, u16, u16)| {
    let (distance, ph_code, tds_code) = input;
    if !distance.is_finite() || distance < 0.0 {
        return;
    }
    let scaling = tank_core::AdcScaling::default();
    let ev = evaluate(
        distance,
        scaling.ph(ph_code),
        scaling.tds_ppm(tds_code),
        &Thresholds::default(),
        &BuzzerCfg::default(),
    );
    if ev.fill == FillState::Critical {
        assert_eq!(ev.command.color, Rgb::RED);
    }
    assert_eq!(ev.frames[0].lines.len(), 3);
    assert_eq!(ev.frames[1].lines.len(), 3);
});
