//! Freehand strokes over the video
//!
//! Touch points are accumulated into an SVG path (`M x,y L x,y ...`).
//! A finished stroke becomes a [`Drawing`] pinned to the playback time
//! it was drawn at, and is shown only while playback is within its
//! visible window of that time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::IdSource;

/// Ink colors offered by the toolbar
pub const PALETTE: [&str; 7] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#FF6B35",
];

/// Screen coordinate of a touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse `"x,y"`
    pub fn parse(s: &str) -> Option<Self> {
        let (x, y) = s.trim().split_once(',')?;
        Some(Self::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

/// A committed stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: u64,
    /// SVG path data
    pub path: String,
    pub color: String,
    /// Playback time the stroke was drawn at, in seconds
    pub timestamp: f64,
    /// Half-width of the visible window, in seconds
    pub duration: f64,
}

impl Drawing {
    /// Visible iff `|timestamp - t| < duration`
    pub fn is_visible_at(&self, current_time: f64) -> bool {
        (self.timestamp - current_time).abs() < self.duration
    }
}

/// Drawings visible at `current_time`
pub fn visible_at(drawings: &[Drawing], current_time: f64) -> Vec<&Drawing> {
    drawings
        .iter()
        .filter(|d| d.is_visible_at(current_time))
        .collect()
}

/// Gesture state for the drawing layer
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    drawing_mode: bool,
    current_path: String,
    color: String,
    window_secs: f64,
}

impl StrokeRecorder {
    pub fn new(window_secs: f64) -> Self {
        Self {
            drawing_mode: false,
            current_path: String::new(),
            color: PALETTE[0].to_string(),
            window_secs,
        }
    }

    pub fn is_drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn set_drawing_mode(&mut self, on: bool) {
        self.drawing_mode = on;
    }

    pub fn toggle_drawing_mode(&mut self) -> bool {
        self.drawing_mode = !self.drawing_mode;
        self.drawing_mode
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn select_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    /// In-progress path, empty when idle
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Start a path at `point`. Ignored outside drawing mode.
    pub fn begin(&mut self, point: Point) -> bool {
        if !self.drawing_mode {
            return false;
        }
        self.current_path = format!("M{},{}", point.x, point.y);
        true
    }

    /// Append a segment. Ignored outside drawing mode.
    pub fn extend(&mut self, point: Point) {
        if !self.drawing_mode {
            return;
        }
        if self.current_path.is_empty() {
            self.current_path = format!("M{},{}", point.x, point.y);
        } else {
            self.current_path
                .push_str(&format!(" L{},{}", point.x, point.y));
        }
    }

    /// Finish the stroke on gesture release
    pub fn commit(&mut self, current_time: f64, ids: &IdSource) -> Option<Drawing> {
        if !self.drawing_mode || self.current_path.is_empty() {
            return None;
        }
        Some(self.take(current_time, ids))
    }

    /// Gesture taken away by the system; keep whatever was drawn
    pub fn terminate(&mut self, current_time: f64, ids: &IdSource) -> Option<Drawing> {
        if self.current_path.is_empty() {
            return None;
        }
        Some(self.take(current_time, ids))
    }

    /// Drop the in-progress path
    pub fn cancel(&mut self) {
        self.current_path.clear();
    }

    fn take(&mut self, current_time: f64, ids: &IdSource) -> Drawing {
        let drawing = Drawing {
            id: ids.next(),
            path: std::mem::take(&mut self.current_path),
            color: self.color.clone(),
            timestamp: current_time,
            duration: self.window_secs,
        };
        debug!(id = drawing.id, at = current_time, "Stroke committed");
        drawing
    }
}
