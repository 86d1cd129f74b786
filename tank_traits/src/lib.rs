//! Hardware-facing traits shared by the monitor core and device backends.
//!
//! Every fallible operation returns `Box<dyn Error + Send + Sync>` so backends
//! can surface their own error types; `tank_core` maps them to typed faults.
pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::time::Duration;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ultrasonic ranging device (trigger/echo pair).
pub trait Ranger {
    /// Measure distance to the surface in centimeters. Must give up and return
    /// an error once `timeout` elapses without an echo.
    fn distance_cm(&mut self, timeout: Duration) -> Result<f32, BoxError>;
}

/// One analog input channel.
pub trait AnalogInput {
    /// Sample the channel now, returning the raw digital code.
    fn read_code(&mut self) -> Result<u16, BoxError>;
}

/// Three binary color lines of the shared indicator.
pub trait ColorLed {
    fn set_rgb(&mut self, red: bool, green: bool, blue: bool) -> Result<(), BoxError>;
}

/// PWM buzzer line.
pub trait Buzzer {
    /// Start (or retune) oscillation at `freq_hz` with the raw `duty` value.
    fn start(&mut self, freq_hz: u32, duty: u16) -> Result<(), BoxError>;
    /// Drive duty to zero; the carrier may keep running.
    fn silence(&mut self) -> Result<(), BoxError>;
}

/// Small monochrome text surface.
pub trait Display {
    /// Fill the frame buffer with background.
    fn clear(&mut self) -> Result<(), BoxError>;
    /// Draw `text` with its top-left corner at pixel `(x, y)`.
    fn text(&mut self, text: &str, x: i32, y: i32) -> Result<(), BoxError>;
    /// Push the frame buffer to the panel.
    fn show(&mut self) -> Result<(), BoxError>;
}

impl<T: Ranger + ?Sized> Ranger for Box<T> {
    fn distance_cm(&mut self, timeout: Duration) -> Result<f32, BoxError> {
        (**self).distance_cm(timeout)
    }
}

impl<T: AnalogInput + ?Sized> AnalogInput for Box<T> {
    fn read_code(&mut self) -> Result<u16, BoxError> {
        (**self).read_code()
    }
}

impl<T: ColorLed + ?Sized> ColorLed for Box<T> {
    fn set_rgb(&mut self, red: bool, green: bool, blue: bool) -> Result<(), BoxError> {
        (**self).set_rgb(red, green, blue)
    }
}

impl<T: Buzzer + ?Sized> Buzzer for Box<T> {
    fn start(&mut self, freq_hz: u32, duty: u16) -> Result<(), BoxError> {
        (**self).start(freq_hz, duty)
    }
    fn silence(&mut self) -> Result<(), BoxError> {
        (**self).silence()
    }
}

impl<T: Display + ?Sized> Display for Box<T> {
    fn clear(&mut self) -> Result<(), BoxError> {
        (**self).clear()
    }
    fn text(&mut self, text: &str, x: i32, y: i32) -> Result<(), BoxError> {
        (**self).text(text, x, y)
    }
    fn show(&mut self) -> Result<(), BoxError> {
        (**self).show()
    }
}
