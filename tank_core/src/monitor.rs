//! The loop driver.
//!
//! Each tick walks `Sampling → Classifying → Actuating → Rendering → Idle`.
//! All sleeps go through the injected `Clock`, so a tick's duration is the
//! idle delay plus whatever the indicator command blocks for.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tank_traits::clock::Clock;
use tank_traits::{AnalogInput, Buzzer, ColorLed, Display, Ranger};

use crate::classify::{FillState, QualityState};
use crate::config::{AdcScaling, BuzzerCfg, Thresholds, TimingCfg};
use crate::display::{DisplayFrame, SurfaceId, level_frame, quality_frame, render};
use crate::error::{MonitorError, Result};
use crate::hw_error::{map_adc_error, map_ranging_error};
use crate::indicator::{Actuator, IndicatorCommand, resolve};
use crate::sample::{SensorKind, SensorSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Sampling,
    Classifying,
    Actuating,
    Rendering,
    Idle,
}

/// What happened to the indicator during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Actuation {
    Applied(IndicatorCommand),
    /// A sensor faulted; the previous output is left untouched.
    Skipped,
    /// The command was attempted but a write failed part-way.
    Failed(IndicatorCommand),
}

/// Outcome of one tick, returned for observability and tests.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub index: u64,
    pub level: SensorSample,
    pub ph: SensorSample,
    pub tds: SensorSample,
    pub fill: Option<FillState>,
    pub quality: Option<QualityState>,
    pub actuation: Actuation,
    pub frames: Vec<DisplayFrame>,
    pub faults: Vec<MonitorError>,
    pub elapsed: Duration,
}

impl TickReport {
    /// Surfaces redrawn this tick.
    pub fn rendered(&self) -> Vec<SurfaceId> {
        self.frames.iter().map(|f| f.surface).collect()
    }
}

/// Tick-scoped working state; dropped when the tick ends.
struct TickState {
    started: Instant,
    level: SensorSample,
    ph: SensorSample,
    tds: SensorSample,
    fill: Option<FillState>,
    quality: Option<QualityState>,
    actuation: Actuation,
    frames: Vec<DisplayFrame>,
    faults: Vec<MonitorError>,
}

impl TickState {
    fn new(started: Instant) -> Self {
        Self {
            started,
            level: SensorSample::fault(SensorKind::Level),
            ph: SensorSample::fault(SensorKind::Ph),
            tds: SensorSample::fault(SensorKind::Tds),
            fill: None,
            quality: None,
            actuation: Actuation::Skipped,
            frames: Vec::with_capacity(2),
            faults: Vec::new(),
        }
    }
}

/// Classification and presentation of one set of readings, without hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub fill: FillState,
    pub quality: QualityState,
    pub command: IndicatorCommand,
    pub frames: [DisplayFrame; 2],
}

/// Run the pure part of a tick on already-normalized readings.
pub fn evaluate(
    distance_cm: f32,
    ph: f32,
    tds_ppm: f32,
    thresholds: &Thresholds,
    buzzer: &BuzzerCfg,
) -> Evaluation {
    let fill = thresholds.fill(distance_cm);
    let quality = thresholds.quality(ph, tds_ppm);
    Evaluation {
        fill,
        quality,
        command: resolve(fill, quality, buzzer),
        frames: [
            level_frame(distance_cm, fill),
            quality_frame(ph, tds_ppm, quality),
        ],
    }
}

/// The device: owns every hardware handle and runs ticks.
pub struct Monitor {
    pub(crate) ranger: Box<dyn Ranger>,
    pub(crate) ph_input: Box<dyn AnalogInput>,
    pub(crate) tds_input: Box<dyn AnalogInput>,
    pub(crate) actuator: Actuator<Box<dyn ColorLed>, Box<dyn Buzzer>>,
    pub(crate) level_display: Box<dyn Display>,
    pub(crate) quality_display: Box<dyn Display>,
    pub(crate) thresholds: Thresholds,
    pub(crate) scaling: AdcScaling,
    pub(crate) buzzer: BuzzerCfg,
    pub(crate) timing: TimingCfg,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) phase: Phase,
    pub(crate) ticks: u64,
}

impl core::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Monitor")
            .field("thresholds", &self.thresholds)
            .field("timing", &self.timing)
            .field("phase", &self.phase)
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl Monitor {
    /// Start building a Monitor.
    pub fn builder() -> MonitorBuilder<Missing, Missing, Missing> {
        MonitorBuilder::default()
    }

    /// Phase the next call to `tick` starts in. Always `Sampling` between ticks.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Last indicator command that was fully applied.
    pub fn indicator(&self) -> Option<IndicatorCommand> {
        self.actuator.last()
    }

    /// Run ticks until `max_ticks` is reached, or forever when `None`.
    /// Returns the number of ticks run by this call.
    pub fn run(&mut self, max_ticks: Option<u64>) -> u64 {
        let mut n = 0u64;
        while max_ticks.is_none_or(|max| n < max) {
            self.tick();
            n += 1;
        }
        n
    }

    /// One full iteration of the loop.
    pub fn tick(&mut self) -> TickReport {
        let mut st = TickState::new(self.clock.now());
        self.phase = Phase::Sampling;
        loop {
            self.phase = match self.phase {
                Phase::Sampling => {
                    self.sample(&mut st);
                    Phase::Classifying
                }
                Phase::Classifying => {
                    self.classify(&mut st);
                    Phase::Actuating
                }
                Phase::Actuating => {
                    self.actuate(&mut st);
                    Phase::Rendering
                }
                Phase::Rendering => {
                    self.render(&mut st);
                    Phase::Idle
                }
                Phase::Idle => {
                    self.clock.sleep(Duration::from_millis(self.timing.idle_ms));
                    self.phase = Phase::Sampling;
                    break;
                }
            };
        }

        let index = self.ticks;
        self.ticks = self.ticks.saturating_add(1);
        let elapsed = self.clock.since(st.started);
        tracing::debug!(
            tick = index,
            elapsed_ms = elapsed.as_millis() as u64,
            faults = st.faults.len(),
            "tick done"
        );
        TickReport {
            index,
            level: st.level,
            ph: st.ph,
            tds: st.tds,
            fill: st.fill,
            quality: st.quality,
            actuation: st.actuation,
            frames: st.frames,
            faults: st.faults,
            elapsed,
        }
    }

    fn sample(&mut self, st: &mut TickState) {
        let timeout = Duration::from_micros(self.timing.echo_timeout_us);
        match self.ranger.distance_cm(timeout) {
            Ok(cm) if cm.is_finite() && cm >= 0.0 => {
                st.level = SensorSample::ok(SensorKind::Level, cm);
            }
            Ok(cm) => {
                st.faults
                    .push(MonitorError::RangingFault(format!("implausible distance {cm}")));
            }
            Err(e) => st.faults.push(map_ranging_error(&*e)),
        }

        match self.ph_input.read_code() {
            Ok(code) => {
                let ph = self.scaling.ph(code);
                tracing::debug!(code, ph, "ph sample");
                st.ph = SensorSample::ok(SensorKind::Ph, ph);
            }
            Err(e) => st.faults.push(map_adc_error(SensorKind::Ph, &*e)),
        }

        match self.tds_input.read_code() {
            Ok(code) => {
                let tds = self.scaling.tds_ppm(code);
                tracing::debug!(code, tds, "tds sample");
                st.tds = SensorSample::ok(SensorKind::Tds, tds);
            }
            Err(e) => st.faults.push(map_adc_error(SensorKind::Tds, &*e)),
        }

        for fault in &st.faults {
            tracing::warn!(tick = self.ticks, error = %fault, "sensor fault");
        }

        match (st.level.get(), st.ph.get(), st.tds.get()) {
            (Some(cm), Some(ph), Some(tds)) => {
                tracing::info!("Water level: {cm} cm | pH: {ph:.1} | TDS: {} ppm", tds as i64);
            }
            (level, ph, tds) => {
                tracing::info!(?level, ?ph, ?tds, "partial readings");
            }
        }
    }

    fn classify(&mut self, st: &mut TickState) {
        st.fill = st.level.get().map(|cm| self.thresholds.fill(cm));
        st.quality = match (st.ph.get(), st.tds.get()) {
            (Some(ph), Some(tds)) => Some(self.thresholds.quality(ph, tds)),
            _ => None,
        };
    }

    fn actuate(&mut self, st: &mut TickState) {
        let (Some(fill), Some(quality)) = (st.fill, st.quality) else {
            tracing::warn!(tick = self.ticks, "actuation skipped; keeping previous indicator");
            st.actuation = Actuation::Skipped;
            return;
        };
        let cmd = resolve(fill, quality, &self.buzzer);
        st.actuation = match self.actuator.apply(cmd) {
            Ok(()) => Actuation::Applied(cmd),
            Err(e) => {
                tracing::warn!(tick = self.ticks, error = %e, "indicator write failed");
                st.faults.push(e);
                Actuation::Failed(cmd)
            }
        };
    }

    fn render(&mut self, st: &mut TickState) {
        if let (Some(cm), Some(fill)) = (st.level.get(), st.fill) {
            let frame = level_frame(cm, fill);
            self.draw(&frame, st);
            st.frames.push(frame);
        }
        if let (Some(ph), Some(tds), Some(quality)) = (st.ph.get(), st.tds.get(), st.quality) {
            let frame = quality_frame(ph, tds, quality);
            self.draw(&frame, st);
            st.frames.push(frame);
        }
    }

    fn draw(&mut self, frame: &DisplayFrame, st: &mut TickState) {
        let display = match frame.surface {
            SurfaceId::Level => &mut self.level_display,
            SurfaceId::Quality => &mut self.quality_display,
        };
        if let Err(e) = render(frame, display.as_mut()) {
            tracing::warn!(tick = self.ticks, error = %e, "display write failed");
            st.faults.push(e);
        }
    }
}

// Type-state markers for the builder
pub struct Missing;
pub struct Set;

use std::marker::PhantomData;

/// Builder for `Monitor`. Sensors, indicator and displays are mandatory.
pub struct MonitorBuilder<S, I, D> {
    ranger: Option<Box<dyn Ranger>>,
    ph_input: Option<Box<dyn AnalogInput>>,
    tds_input: Option<Box<dyn AnalogInput>>,
    led: Option<Box<dyn ColorLed>>,
    buzzer_out: Option<Box<dyn Buzzer>>,
    level_display: Option<Box<dyn Display>>,
    quality_display: Option<Box<dyn Display>>,
    thresholds: Option<Thresholds>,
    scaling: Option<AdcScaling>,
    buzzer: Option<BuzzerCfg>,
    timing: Option<TimingCfg>,
    // Optional clock for tests (accept Box here)
    clock: Option<Box<dyn Clock + Send + Sync>>,
    // Type-state markers
    _s: PhantomData<S>,
    _i: PhantomData<I>,
    _d: PhantomData<D>,
}

impl Default for MonitorBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            ranger: None,
            ph_input: None,
            tds_input: None,
            led: None,
            buzzer_out: None,
            level_display: None,
            quality_display: None,
            thresholds: None,
            scaling: None,
            buzzer: None,
            timing: None,
            clock: None,
            _s: PhantomData,
            _i: PhantomData,
            _d: PhantomData,
        }
    }
}

impl<S, I, D> MonitorBuilder<S, I, D> {
    /// Move every field into a builder with different markers.
    fn retype<S2, I2, D2>(self) -> MonitorBuilder<S2, I2, D2> {
        MonitorBuilder {
            ranger: self.ranger,
            ph_input: self.ph_input,
            tds_input: self.tds_input,
            led: self.led,
            buzzer_out: self.buzzer_out,
            level_display: self.level_display,
            quality_display: self.quality_display,
            thresholds: self.thresholds,
            scaling: self.scaling,
            buzzer: self.buzzer,
            timing: self.timing,
            clock: self.clock,
            _s: PhantomData,
            _i: PhantomData,
            _d: PhantomData,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn with_scaling(mut self, scaling: AdcScaling) -> Self {
        self.scaling = Some(scaling);
        self
    }

    pub fn with_buzzer_cfg(mut self, buzzer: BuzzerCfg) -> Self {
        self.buzzer = Some(buzzer);
        self
    }

    pub fn with_timing(mut self, timing: TimingCfg) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Fallible build available in any type-state; returns detailed BuildError for missing pieces.
    pub fn try_build(self) -> Result<Monitor> {
        use crate::error::BuildError;

        let (Some(ranger), Some(ph_input), Some(tds_input)) =
            (self.ranger, self.ph_input, self.tds_input)
        else {
            return Err(eyre::Report::new(BuildError::MissingSensors));
        };
        let (Some(led), Some(buzzer_out)) = (self.led, self.buzzer_out) else {
            return Err(eyre::Report::new(BuildError::MissingIndicator));
        };
        let (Some(level_display), Some(quality_display)) =
            (self.level_display, self.quality_display)
        else {
            return Err(eyre::Report::new(BuildError::MissingDisplays));
        };

        let thresholds = self.thresholds.unwrap_or_default();
        let scaling = self.scaling.unwrap_or_default();
        let buzzer = self.buzzer.unwrap_or_default();
        let timing = self.timing.unwrap_or_default();
        let clock: Arc<dyn Clock + Send + Sync> = match self.clock {
            Some(b) => Arc::from(b),
            None => Arc::new(tank_traits::clock::MonotonicClock::new()),
        };

        // Validate configs (non-panicking; return typed errors)
        if thresholds.level_warning_cm >= thresholds.level_critical_cm {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "level warning threshold must be below critical",
            )));
        }
        if thresholds.ph_min > thresholds.ph_max {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "ph_min must be <= ph_max",
            )));
        }
        if scaling.full_scale == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "adc full scale must be > 0",
            )));
        }
        if buzzer.freq_hz == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "buzzer frequency must be > 0",
            )));
        }
        if buzzer.duty > crate::config::DUTY_FULL_SCALE {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "buzzer duty above full scale",
            )));
        }
        if timing.idle_ms == 0 || timing.echo_timeout_us == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "idle and echo timeout must be >= 1",
            )));
        }

        Ok(Monitor {
            ranger,
            ph_input,
            tds_input,
            actuator: Actuator::new(led, buzzer_out, buzzer.freq_hz, clock.clone()),
            level_display,
            quality_display,
            thresholds,
            scaling,
            buzzer,
            timing,
            clock,
            phase: Phase::Sampling,
            ticks: 0,
        })
    }
}

// Setters that advance type-state when providing mandatory components
impl<I, D> MonitorBuilder<Missing, I, D> {
    pub fn with_sensors(
        mut self,
        ranger: impl Ranger + 'static,
        ph: impl AnalogInput + 'static,
        tds: impl AnalogInput + 'static,
    ) -> MonitorBuilder<Set, I, D> {
        self.ranger = Some(Box::new(ranger));
        self.ph_input = Some(Box::new(ph));
        self.tds_input = Some(Box::new(tds));
        self.retype()
    }
}

impl<S, D> MonitorBuilder<S, Missing, D> {
    pub fn with_indicator(
        mut self,
        led: impl ColorLed + 'static,
        buzzer: impl Buzzer + 'static,
    ) -> MonitorBuilder<S, Set, D> {
        self.led = Some(Box::new(led));
        self.buzzer_out = Some(Box::new(buzzer));
        self.retype()
    }
}

impl<S, I> MonitorBuilder<S, I, Missing> {
    pub fn with_displays(
        mut self,
        level: impl Display + 'static,
        quality: impl Display + 'static,
    ) -> MonitorBuilder<S, I, Set> {
        self.level_display = Some(Box::new(level));
        self.quality_display = Some(Box::new(quality));
        self.retype()
    }
}

impl MonitorBuilder<Set, Set, Set> {
    /// Validate and build the Monitor. Only available once all hardware is provided.
    pub fn build(self) -> Result<Monitor> {
        self.try_build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_matches_scenario_c() {
        let ev = evaluate(100.0, 7.0, 200.0, &Thresholds::default(), &BuzzerCfg::default());
        assert_eq!(ev.fill, FillState::Safe);
        assert_eq!(ev.quality, QualityState::Safe);
        assert_eq!(ev.command.color, crate::indicator::Rgb::OFF);
        assert_eq!(ev.frames[0].texts()[2], "SAFE LEVEL");
        assert_eq!(ev.frames[1].texts()[2], "WATER SAFE");
    }

    #[test]
    fn try_build_reports_first_missing_piece() {
        let err = Monitor::builder().try_build().unwrap_err();
        assert!(format!("{err}").contains("missing sensors"));
    }
}
