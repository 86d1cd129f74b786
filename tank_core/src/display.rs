//! Status frames for the two panels.
//!
//! Frames are rebuilt from scratch each tick and always drawn as
//! clear → text… → show, never diffed against the previous frame.

use std::fmt;

use tank_traits::Display;

use crate::classify::{FillState, QualityState};
use crate::error::MonitorError;
use crate::hw_error::map_display_error;

const MARGIN_X: i32 = 5;
const HEADER_Y: i32 = 10;
const LEVEL_VALUE_Y: i32 = 30;
const TDS_Y: i32 = 20;
const STATUS_Y: i32 = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    /// Panel 1: fill level.
    Level,
    /// Panel 2: pH / TDS.
    Quality,
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SurfaceId::Level => "level-display",
            SurfaceId::Quality => "quality-display",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    pub surface: SurfaceId,
    pub lines: Vec<TextLine>,
}

impl DisplayFrame {
    fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            lines: Vec::with_capacity(3),
        }
    }

    fn push(mut self, text: impl Into<String>, x: i32, y: i32) -> Self {
        self.lines.push(TextLine {
            text: text.into(),
            x,
            y,
        });
        self
    }

    /// Line texts in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

pub fn level_frame(distance_cm: f32, fill: FillState) -> DisplayFrame {
    DisplayFrame::new(SurfaceId::Level)
        .push("Water level:", MARGIN_X, HEADER_Y)
        .push(format!("{distance_cm:.1} cm"), MARGIN_X, LEVEL_VALUE_Y)
        .push(fill.label(), MARGIN_X, STATUS_Y)
}

/// pH to one decimal, TDS truncated to whole ppm.
pub fn quality_frame(ph: f32, tds_ppm: f32, quality: QualityState) -> DisplayFrame {
    DisplayFrame::new(SurfaceId::Quality)
        .push(format!("pH: {ph:.1}"), MARGIN_X, HEADER_Y)
        .push(format!("TDS: {} ppm", tds_ppm as i64), MARGIN_X, TDS_Y)
        .push(quality.label(), MARGIN_X, STATUS_Y)
}

/// Clear the panel, draw every line, flush.
pub fn render<D: Display + ?Sized>(frame: &DisplayFrame, display: &mut D) -> Result<(), MonitorError> {
    let surface = frame.surface.to_string();
    display
        .clear()
        .map_err(|e| map_display_error(&surface, &*e))?;
    for line in &frame.lines {
        display
            .text(&line.text, line.x, line.y)
            .map_err(|e| map_display_error(&surface, &*e))?;
    }
    display.show().map_err(|e| map_display_error(&surface, &*e))
}
