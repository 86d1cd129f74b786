//! Device assembly: simulated devices by default, Raspberry Pi drivers with
//! the `hardware` feature.

use tank_hardware::TerminalDisplay;
use tank_traits::{AnalogInput, Buzzer, ColorLed, Display, Ranger};

#[cfg(not(feature = "hardware"))]
pub use sim::open;

#[cfg(feature = "hardware")]
pub use pi::open;

/// Every handle the monitor owns.
pub struct Devices {
    pub ranger: Box<dyn Ranger>,
    pub ph: Box<dyn AnalogInput>,
    pub tds: Box<dyn AnalogInput>,
    pub led: Box<dyn ColorLed>,
    pub buzzer: Box<dyn Buzzer>,
    pub level_display: Box<dyn Display>,
    pub quality_display: Box<dyn Display>,
}

fn panels() -> (Box<dyn Display>, Box<dyn Display>) {
    (
        Box::new(TerminalDisplay::new("level-display")),
        Box::new(TerminalDisplay::new("quality-display")),
    )
}

#[cfg(not(feature = "hardware"))]
mod sim {
    use super::{Devices, panels};
    use eyre::Result;
    use tank_config::Config;
    use tank_hardware::{SimulatedAdc, SimulatedBuzzer, SimulatedLed, SimulatedRanger};

    const ENV_DISTANCE_CM: &str = "TANK_SIM_DISTANCE_CM";
    const ENV_PH_CODE: &str = "TANK_SIM_PH_CODE";
    const ENV_TDS_CODE: &str = "TANK_SIM_TDS_CODE";
    const ENV_RANGING_FAULT: &str = "TANK_SIM_RANGING_FAULT";

    /// Read an env override, falling back to `default` when unset.
    fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        match std::env::var(key) {
            Ok(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| eyre::eyre!("invalid {key}={raw:?}: {e}")),
            Err(_) => Ok(default),
        }
    }

    fn env_flag(key: &str) -> bool {
        matches!(
            std::env::var(key).as_deref().map(str::trim),
            Ok("1" | "true" | "yes" | "on")
        )
    }

    /// Simulated devices: 100 cm, pH 7.0, 200 ppm unless `TANK_SIM_*` says otherwise.
    pub fn open(_cfg: &Config) -> Result<Devices> {
        let distance: f32 = env_or(ENV_DISTANCE_CM, 100.0)?;
        let ph_code: u16 = env_or(ENV_PH_CODE, 2048)?;
        let tds_code: u16 = env_or(ENV_TDS_CODE, 820)?;

        let ranger = if env_flag(ENV_RANGING_FAULT) {
            SimulatedRanger::silent()
        } else {
            SimulatedRanger::new(distance)
        };
        tracing::info!(distance, ph_code, tds_code, "using simulated devices");

        let (level_display, quality_display) = panels();
        Ok(Devices {
            ranger: Box::new(ranger),
            ph: Box::new(SimulatedAdc::new(ph_code)),
            tds: Box::new(SimulatedAdc::new(tds_code)),
            led: Box::new(SimulatedLed::new()),
            buzzer: Box::new(SimulatedBuzzer::new()),
            level_display,
            quality_display,
        })
    }

}

#[cfg(feature = "hardware")]
mod pi {
    use super::{Devices, panels};
    use eyre::{Result, WrapErr};
    use tank_config::Config;
    use tank_hardware::{HardwareAdc, HardwareBuzzer, HardwareLed, HardwareRanger};

    use crate::error_fmt::Stage;

    pub fn open(cfg: &Config) -> Result<Devices> {
        let p = &cfg.pins;
        let ranger = HardwareRanger::new(p.trig, p.echo).wrap_err(Stage::HardwareInit)?;
        let (ph, tds) = HardwareAdc::pair(p.adc_cs, p.ph_channel, p.tds_channel)
            .wrap_err(Stage::HardwareInit)?;
        let led = HardwareLed::new(p.red, p.green, p.blue).wrap_err(Stage::HardwareInit)?;
        let buzzer = HardwareBuzzer::new(p.buzzer).wrap_err(Stage::HardwareInit)?;
        tracing::info!(
            trig = p.trig,
            echo = p.echo,
            adc_cs = p.adc_cs,
            buzzer = p.buzzer,
            "hardware devices ready"
        );

        // No OLED driver yet; panels render to the terminal.
        let (level_display, quality_display) = panels();
        Ok(Devices {
            ranger: Box::new(ranger),
            ph: Box::new(ph),
            tds: Box::new(tds),
            led: Box::new(led),
            buzzer: Box::new(buzzer),
            level_display,
            quality_display,
        })
    }
}
