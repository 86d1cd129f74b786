//! Maps `Box<dyn Error>` from trait boundaries to typed `MonitorError`.
//!
//! The traits in `tank_traits` use `Box<dyn Error + Send + Sync>` so backends
//! can report their own errors; this module converts those to our fault
//! taxonomy, with an optional feature-gated path for `tank_hardware::HwError`.

use crate::error::MonitorError;
use crate::sample::SensorKind;

/// Map a ranger error to `RangingTimeout` or `RangingFault`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_ranging_error(e: &(dyn std::error::Error + 'static)) -> MonitorError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<tank_hardware::error::HwError>() {
            return match hw {
                tank_hardware::error::HwError::EchoTimeout => MonitorError::RangingTimeout,
                other => MonitorError::RangingFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        MonitorError::RangingTimeout
    } else {
        MonitorError::RangingFault(s)
    }
}

pub fn map_adc_error(channel: SensorKind, e: &(dyn std::error::Error + 'static)) -> MonitorError {
    MonitorError::AdcFault {
        channel,
        message: e.to_string(),
    }
}

pub fn map_actuator_error(what: &str, e: &(dyn std::error::Error + 'static)) -> MonitorError {
    MonitorError::ActuatorWrite(format!("{what}: {e}"))
}

pub fn map_display_error(surface: &str, e: &(dyn std::error::Error + 'static)) -> MonitorError {
    MonitorError::DisplayWrite {
        surface: surface.to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_text_maps_to_ranging_timeout() {
        let e = std::io::Error::other("echo timeout");
        assert_eq!(map_ranging_error(&e), MonitorError::RangingTimeout);
    }

    #[test]
    fn other_text_maps_to_ranging_fault() {
        let e = std::io::Error::other("trigger stuck");
        assert_eq!(
            map_ranging_error(&e),
            MonitorError::RangingFault("trigger stuck".into())
        );
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn typed_hw_errors_are_downcast() {
        use tank_hardware::error::HwError;
        assert_eq!(
            map_ranging_error(&HwError::EchoTimeout),
            MonitorError::RangingTimeout
        );
        assert_eq!(
            map_ranging_error(&HwError::OutOfRange),
            MonitorError::RangingFault("ranging out of range".into())
        );
    }
}
