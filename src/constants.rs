//! Configuration constants for the chooser
//!
//! This module contains the timing, sizing and team limits used throughout
//! the session. They double as the defaults of [`crate::config::Config`].

/// Session timing constants
pub mod timing {
    /// Dwell time in milliseconds after the last registry change before a decision
    pub const CHOOSE_DELAY_MS: u64 = 2000;
    /// Cooldown in milliseconds between dismissing a decision and the reset
    pub const RESET_DELAY_MS: u64 = 1000;
    /// Duration in milliseconds of the solo reveal animation
    pub const REVEAL_DURATION_MS: u64 = RESET_DELAY_MS;
    /// Shortest configurable dwell or cooldown in milliseconds
    pub const MIN_DELAY_MS: u64 = 100;
    /// Longest configurable dwell or cooldown in milliseconds
    pub const MAX_DELAY_MS: u64 = 60_000;
}

/// Player count constants
pub mod players {
    /// Minimum number of simultaneous players before a decision is attempted
    pub const MIN_PLAYERS: usize = 2;
    /// Upper bound accepted for a configured minimum player count
    pub const MAX_MIN_PLAYERS: usize = 16;
}

/// Team mode constants
pub mod teams {
    /// Smallest number of teams the stepper allows
    pub const MIN_TEAM_COUNT: usize = 2;
    /// Largest number of teams the stepper allows
    pub const MAX_TEAM_COUNT: usize = 8;
    /// Team count selected when the program starts
    pub const DEFAULT_TEAM_COUNT: usize = 2;
}

/// Geometry of the drawn player markers, in CSS pixels
pub mod geometry {
    /// Radius of the outer ring around a touch point
    pub const RING_RADIUS: f64 = 50.0;
    /// Stroke width of the outer ring
    pub const RING_WIDTH: f64 = 10.0;
    /// Radius of the filled dot at a touch point
    pub const DOT_RADIUS: f64 = 35.0;
    /// Radius of the hole left around the chosen player once the reveal ends
    pub const REVEAL_END_RADIUS: f64 = 90.0;
    /// Largest configurable end radius of the reveal hole
    pub const MAX_REVEAL_END_RADIUS: f64 = 1000.0;
}

/// Color constants
pub mod color {
    /// Hue step between consecutive solo colors
    pub const SOLO_HUE_STEP: f64 = 222.5;
    /// Hue of solo color index 0
    pub const SOLO_HUE_OFFSET: f64 = 348.0;
    /// Saturation shared by every player color, in percent
    pub const SATURATION: f64 = 100.0;
    /// Lightness shared by every player color, in percent
    pub const LIGHTNESS: f64 = 51.4;
    /// Hues of the fixed team palette
    pub const TEAM_HUES: [f64; 8] = [348.0, 210.0, 120.0, 60.0, 300.0, 30.0, 180.0, 270.0];
}
