//! Per-tick sensor samples.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Level,
    Ph,
    Tds,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SensorKind::Level => "level",
            SensorKind::Ph => "ph",
            SensorKind::Tds => "tds",
        })
    }
}

/// One reading in engineering units (cm, pH, ppm). `valid == false` means the
/// adapter faulted and `value` must not be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub kind: SensorKind,
    pub value: f32,
    pub valid: bool,
}

impl SensorSample {
    pub fn ok(kind: SensorKind, value: f32) -> Self {
        Self {
            kind,
            value,
            valid: true,
        }
    }

    pub fn fault(kind: SensorKind) -> Self {
        Self {
            kind,
            value: f32::NAN,
            valid: false,
        }
    }

    /// The value, if the sample is usable.
    pub fn get(&self) -> Option<f32> {
        self.valid.then_some(self.value)
    }
}
