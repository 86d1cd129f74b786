//! Subcommand implementations.

use std::time::Duration;

use eyre::Result;
use tank_config::Config;
use tank_core::hw_error::{map_adc_error, map_ranging_error};
use tank_core::{
    AdcScaling, BuzzerCfg, BuzzerCommand, DisplayFrame, IndicatorCommand, Monitor, SensorKind,
    Thresholds, TimingCfg, evaluate,
};

use crate::backend;

/// Build the monitor on the configured backend and run it.
pub fn run(cfg: &Config, ticks: Option<u64>) -> Result<()> {
    let dev = backend::open(cfg)?;
    let mut monitor = Monitor::builder()
        .with_sensors(dev.ranger, dev.ph, dev.tds)
        .with_indicator(dev.led, dev.buzzer)
        .with_displays(dev.level_display, dev.quality_display)
        .with_thresholds((&cfg.thresholds).into())
        .with_scaling((&cfg.adc).into())
        .with_buzzer_cfg((&cfg.buzzer).into())
        .with_timing((&cfg.timing).into())
        .build()?;

    tracing::info!(?ticks, "monitor loop starting");
    let n = monitor.run(ticks);
    tracing::info!(ticks = n, "monitor loop stopped");
    Ok(())
}

fn frame_line(frame: &DisplayFrame) -> String {
    format!("[{}] {}", frame.surface, frame.texts().join(" | "))
}

fn describe(cmd: &IndicatorCommand, freq_hz: u32) -> String {
    let c = cmd.color;
    let rgb = format!("rgb=({},{},{})", u8::from(c.red), u8::from(c.green), u8::from(c.blue));
    match cmd.buzzer {
        BuzzerCommand::Off => format!("{rgb} buzzer=off"),
        BuzzerCommand::OnWithDuty { duty, hold, pause } => format!(
            "{rgb} buzzer=on {freq_hz} Hz duty {duty} hold {} ms pause {} ms",
            hold.as_millis(),
            pause.as_millis()
        ),
    }
}

/// Classify one set of readings offline and print what the device would do.
pub fn check(
    cfg: &Config,
    distance_cm: f32,
    ph: Option<f32>,
    ph_code: Option<u16>,
    tds: Option<f32>,
    tds_code: Option<u16>,
    json: bool,
) -> Result<()> {
    let scaling: AdcScaling = (&cfg.adc).into();
    let thresholds: Thresholds = (&cfg.thresholds).into();
    let buzzer: BuzzerCfg = (&cfg.buzzer).into();

    if !distance_cm.is_finite() || distance_cm < 0.0 {
        eyre::bail!("distance must be a finite, non-negative number of cm");
    }
    let ph = ph
        .or(ph_code.map(|c| scaling.ph(c)))
        .ok_or_else(|| eyre::eyre!("one of --ph or --ph-code is required"))?;
    let tds = tds
        .or(tds_code.map(|c| scaling.tds_ppm(c)))
        .ok_or_else(|| eyre::eyre!("one of --tds or --tds-code is required"))?;

    let ev = evaluate(distance_cm, ph, tds, &thresholds, &buzzer);
    tracing::debug!(?ev.fill, ?ev.quality, "check evaluated");

    if json {
        let frames: Vec<_> = ev
            .frames
            .iter()
            .map(|f| serde_json::json!({ "surface": f.surface.to_string(), "lines": f.texts() }))
            .collect();
        let buzzer_json = match ev.command.buzzer {
            BuzzerCommand::Off => serde_json::Value::Null,
            BuzzerCommand::OnWithDuty { duty, hold, pause } => serde_json::json!({
                "freq_hz": buzzer.freq_hz,
                "duty": duty,
                "hold_ms": hold.as_millis() as u64,
                "pause_ms": pause.as_millis() as u64,
            }),
        };
        let c = ev.command.color;
        let out = serde_json::json!({
            "distance_cm": distance_cm,
            "ph": ph,
            "tds_ppm": tds,
            "fill": format!("{:?}", ev.fill),
            "quality": format!("{:?}", ev.quality),
            "color": { "red": c.red, "green": c.green, "blue": c.blue },
            "buzzer": buzzer_json,
            "frames": frames,
        });
        println!("{out}");
    } else {
        println!("fill: {:?} ({})", ev.fill, ev.fill.label());
        println!("quality: {:?} ({})", ev.quality, ev.quality.label());
        println!("indicator: {}", describe(&ev.command, buzzer.freq_hz));
        for frame in &ev.frames {
            println!("{}", frame_line(frame));
        }
    }
    Ok(())
}

/// One read of every sensor; fails if any read faults.
pub fn self_check(cfg: &Config) -> Result<()> {
    let mut dev = backend::open(cfg)?;
    let scaling: AdcScaling = (&cfg.adc).into();
    let timing: TimingCfg = (&cfg.timing).into();
    let mut faults = 0usize;

    match dev.ranger.distance_cm(Duration::from_micros(timing.echo_timeout_us)) {
        Ok(cm) => println!("level: {cm:.1} cm"),
        Err(e) => {
            faults += 1;
            println!("level: FAULT ({})", map_ranging_error(&*e));
        }
    }
    for (kind, input) in [(SensorKind::Ph, &mut dev.ph), (SensorKind::Tds, &mut dev.tds)] {
        match input.read_code() {
            Ok(code) => {
                let value = match kind {
                    SensorKind::Tds => scaling.tds_ppm(code),
                    _ => scaling.ph(code),
                };
                println!("{kind}: code {code} -> {value:.1}");
            }
            Err(e) => {
                faults += 1;
                println!("{kind}: FAULT ({})", map_adc_error(kind, &*e));
            }
        }
    }

    if faults > 0 {
        eyre::bail!("self-check failed: {faults} sensor(s) faulted");
    }
    println!("self-check ok");
    Ok(())
}
