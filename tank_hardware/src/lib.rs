//! Device backends for the tank monitor.
//!
//! The default build only carries simulated devices. Enabling the `hardware`
//! feature adds Raspberry Pi drivers (HC-SR04 ranger, MCP3208 ADC, RGB LED and
//! PWM buzzer) on top of `rppal`.
pub mod error;
pub mod util;

#[cfg(feature = "hardware")]
pub mod hcsr04;
#[cfg(feature = "hardware")]
pub mod mcp3208;
#[cfg(feature = "hardware")]
pub mod outputs;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tank_traits::{AnalogInput, BoxError, Buzzer, ColorLed, Display, Ranger};

use crate::error::HwError;

/// Simulated ranger. Clones share the reading, so a test or the CLI can keep
/// one handle and steer the value the monitor sees.
#[derive(Clone)]
pub struct SimulatedRanger {
    distance_cm: Rc<Cell<Option<f32>>>,
}

impl SimulatedRanger {
    pub fn new(distance_cm: f32) -> Self {
        Self {
            distance_cm: Rc::new(Cell::new(Some(distance_cm))),
        }
    }

    /// A ranger whose echo never returns.
    pub fn silent() -> Self {
        Self {
            distance_cm: Rc::new(Cell::new(None)),
        }
    }

    pub fn set_distance(&self, cm: f32) {
        self.distance_cm.set(Some(cm));
    }

    pub fn drop_echo(&self) {
        self.distance_cm.set(None);
    }
}

impl Ranger for SimulatedRanger {
    fn distance_cm(&mut self, _timeout: Duration) -> Result<f32, BoxError> {
        match self.distance_cm.get() {
            Some(cm) => {
                tracing::trace!(cm, "ranging (simulated)");
                Ok(cm)
            }
            None => Err(Box::new(HwError::EchoTimeout)),
        }
    }
}

/// Simulated analog channel returning a fixed, adjustable code.
#[derive(Clone)]
pub struct SimulatedAdc {
    code: Rc<Cell<u16>>,
}

impl SimulatedAdc {
    pub fn new(code: u16) -> Self {
        Self {
            code: Rc::new(Cell::new(code)),
        }
    }

    pub fn set_code(&self, code: u16) {
        self.code.set(code);
    }
}

impl AnalogInput for SimulatedAdc {
    fn read_code(&mut self) -> Result<u16, BoxError> {
        Ok(self.code.get())
    }
}

/// Simulated RGB LED remembering the last written triple.
#[derive(Clone, Default)]
pub struct SimulatedLed {
    rgb: Rc<Cell<(bool, bool, bool)>>,
    writes: Rc<Cell<u64>>,
}

impl SimulatedLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rgb(&self) -> (bool, bool, bool) {
        self.rgb.get()
    }

    pub fn writes(&self) -> u64 {
        self.writes.get()
    }
}

impl ColorLed for SimulatedLed {
    fn set_rgb(&mut self, red: bool, green: bool, blue: bool) -> Result<(), BoxError> {
        self.rgb.set((red, green, blue));
        self.writes.set(self.writes.get() + 1);
        tracing::trace!(red, green, blue, "rgb write (simulated)");
        Ok(())
    }
}

/// Simulated buzzer; `Some((freq, duty))` while sounding.
#[derive(Clone, Default)]
pub struct SimulatedBuzzer {
    state: Rc<Cell<Option<(u32, u16)>>>,
    pulses: Rc<Cell<u64>>,
}

impl SimulatedBuzzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<(u32, u16)> {
        self.state.get()
    }

    /// Number of times the buzzer was started.
    pub fn pulses(&self) -> u64 {
        self.pulses.get()
    }
}

impl Buzzer for SimulatedBuzzer {
    fn start(&mut self, freq_hz: u32, duty: u16) -> Result<(), BoxError> {
        self.state.set(Some((freq_hz, duty)));
        self.pulses.set(self.pulses.get() + 1);
        tracing::trace!(freq_hz, duty, "buzzer on (simulated)");
        Ok(())
    }

    fn silence(&mut self) -> Result<(), BoxError> {
        self.state.set(None);
        Ok(())
    }
}

/// Text-only stand-in for an OLED panel: buffers drawn lines and prints the
/// frame to stdout on `show()`.
pub struct TerminalDisplay {
    name: String,
    pending: Vec<(i32, i32, String)>,
    shown: Rc<RefCell<Vec<String>>>,
}

impl TerminalDisplay {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending: Vec::new(),
            shown: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Lines of the most recently shown frame, top to bottom.
    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }

    /// Shared view of the shown frame that stays valid after the display is
    /// moved into the monitor.
    pub fn shown_handle(&self) -> Rc<RefCell<Vec<String>>> {
        self.shown.clone()
    }
}

impl Display for TerminalDisplay {
    fn clear(&mut self) -> Result<(), BoxError> {
        self.pending.clear();
        Ok(())
    }

    fn text(&mut self, text: &str, x: i32, y: i32) -> Result<(), BoxError> {
        self.pending.push((y, x, text.to_string()));
        Ok(())
    }

    fn show(&mut self) -> Result<(), BoxError> {
        let mut lines = self.pending.clone();
        lines.sort_by_key(|(y, x, _)| (*y, *x));
        let lines: Vec<String> = lines.into_iter().map(|(_, _, t)| t).collect();
        println!("[{}] {}", self.name, lines.join(" | "));
        *self.shown.borrow_mut() = lines;
        Ok(())
    }
}

#[cfg(feature = "hardware")]
pub use hardware::*;

#[cfg(feature = "hardware")]
mod hardware {
    use super::*;
    use crate::hcsr04::Hcsr04;
    use crate::mcp3208::{Mcp3208, Mcp3208Channel};
    use crate::outputs::{GpioRgbLed, PwmBuzzer};

    pub struct HardwareRanger {
        dev: Hcsr04,
    }

    impl HardwareRanger {
        pub fn new(trig_pin: u8, echo_pin: u8) -> Result<Self, HwError> {
            Ok(Self {
                dev: Hcsr04::new(trig_pin, echo_pin)?,
            })
        }
    }

    impl Ranger for HardwareRanger {
        fn distance_cm(&mut self, timeout: Duration) -> Result<f32, BoxError> {
            match self.dev.measure_cm(timeout) {
                Ok(cm) => {
                    tracing::debug!(cm, "hcsr04 sample");
                    Ok(cm)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ranging failed");
                    Err(Box::new(e))
                }
            }
        }
    }

    pub struct HardwareAdc {
        channel: Mcp3208Channel,
    }

    impl HardwareAdc {
        /// Open the pH and TDS inputs on one converter.
        pub fn pair(
            chip_select: u8,
            ph_channel: u8,
            tds_channel: u8,
        ) -> Result<(Self, Self), HwError> {
            let adc = Mcp3208::new(chip_select)?.into_shared();
            let ph = Mcp3208Channel::new(adc.clone(), ph_channel)?;
            let tds = Mcp3208Channel::new(adc, tds_channel)?;
            Ok((Self { channel: ph }, Self { channel: tds }))
        }
    }

    impl AnalogInput for HardwareAdc {
        fn read_code(&mut self) -> Result<u16, BoxError> {
            self.channel.read().map_err(|e| -> BoxError { Box::new(e) })
        }
    }

    pub struct HardwareLed {
        led: GpioRgbLed,
    }

    impl HardwareLed {
        pub fn new(red_pin: u8, green_pin: u8, blue_pin: u8) -> Result<Self, HwError> {
            Ok(Self {
                led: GpioRgbLed::new(red_pin, green_pin, blue_pin)?,
            })
        }
    }

    impl ColorLed for HardwareLed {
        fn set_rgb(&mut self, red: bool, green: bool, blue: bool) -> Result<(), BoxError> {
            self.led.set(red, green, blue);
            Ok(())
        }
    }

    pub struct HardwareBuzzer {
        buzzer: PwmBuzzer,
    }

    impl HardwareBuzzer {
        pub fn new(pin: u8) -> Result<Self, HwError> {
            Ok(Self {
                buzzer: PwmBuzzer::new(pin)?,
            })
        }
    }

    impl Buzzer for HardwareBuzzer {
        fn start(&mut self, freq_hz: u32, duty: u16) -> Result<(), BoxError> {
            self.buzzer
                .start(freq_hz, duty)
                .map_err(|e| -> BoxError { Box::new(e) })
        }

        fn silence(&mut self) -> Result<(), BoxError> {
            self.buzzer.silence().map_err(|e| -> BoxError { Box::new(e) })
        }
    }
}
