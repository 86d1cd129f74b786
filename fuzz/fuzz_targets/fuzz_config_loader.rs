#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary TOML must either fail to parse or validate without panicking,
// and a config that validates must also be accepted by the monitor's own checks.
fuzz_target!(|data: &str| {
    let Ok(cfg) = tank_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let t: tank_core::Thresholds = (&cfg.thresholds).into();
    assert!(t.level_warning_cm < t.level_critical_cm);
    assert!(t.ph_min <= t.ph_max);
    let b: tank_core::BuzzerCfg = (&cfg.buzzer).into();
    assert!(b.duty <= tank_core::config::DUTY_FULL_SCALE);
});
