use tank_core::error::BuildError;
use tank_core::{Monitor, Thresholds};
use tank_hardware::{SimulatedAdc, SimulatedBuzzer, SimulatedLed, SimulatedRanger, TerminalDisplay};

#[test]
fn try_build_without_indicator_reports_it() {
    let err = Monitor::builder()
        .with_sensors(SimulatedRanger::new(1.0), SimulatedAdc::new(0), SimulatedAdc::new(0))
        .try_build()
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<BuildError>(), Some(BuildError::MissingIndicator)));
}

#[test]
fn inverted_level_thresholds_are_rejected() {
    let err = Monitor::builder()
        .with_sensors(SimulatedRanger::new(1.0), SimulatedAdc::new(0), SimulatedAdc::new(0))
        .with_indicator(SimulatedLed::new(), SimulatedBuzzer::new())
        .with_displays(TerminalDisplay::new("a"), TerminalDisplay::new("b"))
        .with_thresholds(Thresholds {
            level_warning_cm: 500.0,
            ..Thresholds::default()
        })
        .build()
        .unwrap_err();
    assert!(format!("{err}").contains("below critical"));
}
