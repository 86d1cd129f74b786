use std::time::{Duration, Instant};
use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::{echo_us_to_cm, wait_while_with_deadline};

/// HC-SR04 ultrasonic ranger on two GPIO lines.
pub struct Hcsr04 {
    trigger: rppal::gpio::OutputPin,
    echo: rppal::gpio::InputPin,
}

impl Hcsr04 {
    pub fn new(trig_pin: u8, echo_pin: u8) -> Result<Self> {
        let gpio = rppal::gpio::Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut trigger = gpio
            .get(trig_pin)
            .map_err(|e| HwError::Gpio(format!("open trigger pin {trig_pin}: {e}")))?
            .into_output();
        let echo = gpio
            .get(echo_pin)
            .map_err(|e| HwError::Gpio(format!("open echo pin {echo_pin}: {e}")))?
            .into_input();
        trigger.set_low();
        Ok(Self { trigger, echo })
    }

    /// Fire one ping and time the echo. `timeout` bounds the whole exchange.
    pub fn measure_cm(&mut self, timeout: Duration) -> Result<f32> {
        // settle low, then a 10us trigger pulse
        self.trigger.set_low();
        std::thread::sleep(Duration::from_micros(5));
        self.trigger.set_high();
        std::thread::sleep(Duration::from_micros(10));
        self.trigger.set_low();

        let deadline = Instant::now() + timeout;
        let rise = wait_while_with_deadline(|| self.echo.is_low(), deadline, Duration::ZERO)?;
        let fall = wait_while_with_deadline(|| self.echo.is_high(), deadline, Duration::ZERO)?;

        let pulse_us = fall.saturating_duration_since(rise).as_micros() as u64;
        if pulse_us == 0 {
            return Err(HwError::OutOfRange);
        }
        let cm = echo_us_to_cm(pulse_us);
        trace!(pulse_us, cm, "hcsr04 echo");
        Ok(cm)
    }
}
