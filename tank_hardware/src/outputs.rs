use rppal::gpio::{Gpio, OutputPin};
use tracing::trace;

use crate::error::{HwError, Result};

/// Full-scale duty value; duty arguments are expressed against this.
pub const DUTY_FULL_SCALE: u16 = 1023;

fn output_pin(gpio: &Gpio, pin: u8, what: &str) -> Result<OutputPin> {
    Ok(gpio
        .get(pin)
        .map_err(|e| HwError::Gpio(format!("open {what} pin {pin}: {e}")))?
        .into_output_low())
}

/// Common-cathode RGB LED on three GPIO lines.
pub struct GpioRgbLed {
    red: OutputPin,
    green: OutputPin,
    blue: OutputPin,
}

impl GpioRgbLed {
    pub fn new(red_pin: u8, green_pin: u8, blue_pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        Ok(Self {
            red: output_pin(&gpio, red_pin, "red")?,
            green: output_pin(&gpio, green_pin, "green")?,
            blue: output_pin(&gpio, blue_pin, "blue")?,
        })
    }

    pub fn set(&mut self, red: bool, green: bool, blue: bool) {
        self.red.write(red.into());
        self.green.write(green.into());
        self.blue.write(blue.into());
        trace!(red, green, blue, "rgb write");
    }
}

/// Piezo buzzer driven by software PWM.
pub struct PwmBuzzer {
    pin: OutputPin,
}

impl PwmBuzzer {
    pub fn new(pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        Ok(Self {
            pin: output_pin(&gpio, pin, "buzzer")?,
        })
    }

    pub fn start(&mut self, freq_hz: u32, duty: u16) -> Result<()> {
        let ratio = f64::from(duty.min(DUTY_FULL_SCALE)) / f64::from(DUTY_FULL_SCALE);
        self.pin
            .set_pwm_frequency(f64::from(freq_hz), ratio)
            .map_err(|e| HwError::Gpio(e.to_string()))?;
        trace!(freq_hz, duty, "buzzer on");
        Ok(())
    }

    pub fn silence(&mut self) -> Result<()> {
        self.pin
            .clear_pwm()
            .map_err(|e| HwError::Gpio(e.to_string()))?;
        self.pin.set_low();
        trace!("buzzer off");
        Ok(())
    }
}
