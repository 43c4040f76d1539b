//! Solo reveal animation
//!
//! After a solo pick the whole screen fills with the chosen player's color
//! except for a circular hole around their finger. The hole starts large
//! enough to uncover the entire canvas and eases down to a fixed radius.

use serde::{Deserialize, Serialize};
use web_time::{Duration, SystemTime};

use crate::{
    constants::timing::REVEAL_DURATION_MS,
    registry::Point,
};

/// Size of the drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport from its dimensions
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest distance from `point` to any of the four canvas edges
    pub fn farthest_edge(&self, point: Point) -> f64 {
        [
            point.x,
            self.width - point.x,
            point.y,
            self.height - point.y,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

/// Ease-out quintic curve on `[0, 1]`
pub fn ease_out_quint(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(5)
}

/// Parameters of one reveal animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    start_radius: f64,
    end_radius: f64,
    started_at: SystemTime,
    duration: Duration,
}

impl Reveal {
    /// Creates a reveal centred on `center` that starts at `started_at`
    pub fn new(viewport: Viewport, center: Point, end_radius: f64, started_at: SystemTime) -> Self {
        Self {
            start_radius: viewport.farthest_edge(center),
            end_radius,
            started_at,
            duration: Duration::from_millis(REVEAL_DURATION_MS),
        }
    }

    /// Radius of the hole when the animation starts
    pub fn start_radius(&self) -> f64 {
        self.start_radius
    }

    /// Radius of the hole once the animation is over
    pub fn end_radius(&self) -> f64 {
        self.end_radius
    }

    /// When the decision fired
    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// Time since the decision fired, zero if `now` is earlier
    pub fn elapsed(&self, now: SystemTime) -> Duration {
        now.duration_since(self.started_at).unwrap_or_default()
    }

    /// Animation progress in `[0, 1]`
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Hole radius after `elapsed`
    pub fn radius_at(&self, elapsed: Duration) -> f64 {
        let t = self.progress(elapsed);
        if t < 1.0 {
            self.start_radius - (self.start_radius - self.end_radius) * ease_out_quint(t)
        } else {
            self.end_radius
        }
    }

    /// Whether the animation still needs frames after `elapsed`
    pub fn is_running(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) < 1.0
    }
}
