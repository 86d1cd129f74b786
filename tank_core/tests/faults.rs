use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tank_core::{Actuation, FillState, Monitor, MonitorError, SensorKind, SurfaceId};
use tank_hardware::{SimulatedAdc, SimulatedBuzzer, SimulatedLed, SimulatedRanger, TerminalDisplay};
use tank_traits::clock::test_clock::TestClock;
use tank_traits::{AnalogInput, BoxError, Buzzer, ColorLed, Display, Ranger};

/// LED whose writes fail while the shared flag is set.
#[derive(Clone, Default)]
struct FlakyLed {
    broken: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}
impl ColorLed for FlakyLed {
    fn set_rgb(&mut self, _r: bool, _g: bool, _b: bool) -> Result<(), BoxError> {
        if self.broken.get() {
            return Err("gpio write failed".into());
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Buzzer that refuses to start.
struct JammedBuzzer;
impl Buzzer for JammedBuzzer {
    fn start(&mut self, _freq_hz: u32, _duty: u16) -> Result<(), BoxError> {
        Err("pwm channel busy".into())
    }
    fn silence(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Panel that never acknowledges.
struct DeadPanel;
impl Display for DeadPanel {
    fn clear(&mut self) -> Result<(), BoxError> {
        Err("i2c nack".into())
    }
    fn text(&mut self, _text: &str, _x: i32, _y: i32) -> Result<(), BoxError> {
        Ok(())
    }
    fn show(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

struct BrokenAdc;
impl AnalogInput for BrokenAdc {
    fn read_code(&mut self) -> Result<u16, BoxError> {
        Err("spi transfer failed".into())
    }
}

/// Ranger returning a value no sensor could produce.
struct NanRanger;
impl Ranger for NanRanger {
    fn distance_cm(&mut self, _timeout: Duration) -> Result<f32, BoxError> {
        Ok(f32::NAN)
    }
}

fn panels() -> (TerminalDisplay, TerminalDisplay) {
    (TerminalDisplay::new("display-1"), TerminalDisplay::new("display-2"))
}

#[test]
fn led_write_failure_is_logged_and_next_tick_retries() {
    let led = FlakyLed::default();
    let (d1, d2) = panels();
    let mut monitor = Monitor::builder()
        .with_sensors(SimulatedRanger::new(100.0), SimulatedAdc::new(2048), SimulatedAdc::new(820))
        .with_indicator(led.clone(), SimulatedBuzzer::new())
        .with_displays(d1, d2)
        .with_clock(Box::new(TestClock::new()))
        .build()
        .expect("monitor build");

    led.broken.set(true);
    let report = monitor.tick();
    assert!(matches!(report.actuation, Actuation::Failed(_)));
    assert!(matches!(report.faults.as_slice(), [MonitorError::ActuatorWrite(m)] if m.contains("rgb")));
    // rendering still happens
    assert_eq!(report.rendered(), vec![SurfaceId::Level, SurfaceId::Quality]);
    assert!(monitor.indicator().is_none());

    led.broken.set(false);
    let report = monitor.tick();
    assert!(matches!(report.actuation, Actuation::Applied(_)));
    assert_eq!(led.writes.get(), 1);
    assert!(monitor.indicator().is_some());
}

#[test]
fn buzzer_failure_skips_the_hold() {
    let clock = TestClock::new();
    let (d1, d2) = panels();
    let mut monitor = Monitor::builder()
        .with_sensors(SimulatedRanger::new(350.0), SimulatedAdc::new(2048), SimulatedAdc::new(820))
        .with_indicator(SimulatedLed::new(), JammedBuzzer)
        .with_displays(d1, d2)
        .with_clock(Box::new(clock.clone()))
        .build()
        .expect("monitor build");

    let report = monitor.tick();
    assert_eq!(report.fill, Some(FillState::Warning));
    assert!(matches!(report.actuation, Actuation::Failed(_)));
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(500)]);
}

#[test]
fn dead_display_does_not_stop_the_loop() {
    let (_, d2) = panels();
    let mut monitor = Monitor::builder()
        .with_sensors(SimulatedRanger::new(100.0), SimulatedAdc::new(2048), SimulatedAdc::new(820))
        .with_indicator(SimulatedLed::new(), SimulatedBuzzer::new())
        .with_displays(DeadPanel, d2)
        .with_clock(Box::new(TestClock::new()))
        .build()
        .expect("monitor build");

    for _ in 0..3 {
        let report = monitor.tick();
        assert!(matches!(report.actuation, Actuation::Applied(_)));
        assert!(matches!(
            report.faults.as_slice(),
            [MonitorError::DisplayWrite { surface, .. }] if surface == "level-display"
        ));
    }
    assert_eq!(monitor.ticks(), 3);
}

#[test]
fn adc_fault_skips_actuation_and_quality_panel() {
    let led = SimulatedLed::new();
    let (d1, d2) = panels();
    let mut monitor = Monitor::builder()
        .with_sensors(SimulatedRanger::new(450.0), SimulatedAdc::new(2048), BrokenAdc)
        .with_indicator(led.clone(), SimulatedBuzzer::new())
        .with_displays(d1, d2)
        .with_clock(Box::new(TestClock::new()))
        .build()
        .expect("monitor build");

    let report = monitor.tick();
    assert_eq!(report.fill, Some(FillState::Critical));
    assert_eq!(report.quality, None);
    assert_eq!(report.actuation, Actuation::Skipped);
    assert_eq!(report.rendered(), vec![SurfaceId::Level]);
    assert!(matches!(
        report.faults.as_slice(),
        [MonitorError::AdcFault { channel: SensorKind::Tds, .. }]
    ));
    assert_eq!(led.writes(), 0);
}

#[test]
fn non_finite_distance_is_a_ranging_fault() {
    let (d1, d2) = panels();
    let mut monitor = Monitor::builder()
        .with_sensors(NanRanger, SimulatedAdc::new(2048), SimulatedAdc::new(820))
        .with_indicator(SimulatedLed::new(), SimulatedBuzzer::new())
        .with_displays(d1, d2)
        .with_clock(Box::new(TestClock::new()))
        .build()
        .expect("monitor build");

    let report = monitor.tick();
    assert_eq!(report.fill, None);
    assert!(matches!(report.faults.as_slice(), [MonitorError::RangingFault(_)]));
}
