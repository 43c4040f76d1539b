//! Render snapshots
//!
//! A [`Frame`] is everything a renderer needs to paint one animation frame.
//! It is an owned copy, so painting never observes a half-applied event.

use serde::Serialize;

use crate::{
    color::Hsla,
    registry::{ContactId, Point},
};

/// One player's marker: a ring and a dot at the contact position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// The player drawn
    pub id: ContactId,
    /// Center of the marker
    pub position: Point,
    /// Fill and stroke color
    pub color: Hsla,
}

/// What the canvas should show
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Frame {
    /// Nobody is touching the screen: show the help text
    Help {
        /// Instructions for the current mode
        description: String,
    },
    /// Players are touching and no solo pick has been made
    Players {
        /// One marker per player, in join order
        markers: Vec<Marker>,
    },
    /// A solo pick was made: the screen fills around the chosen player
    Reveal {
        /// The chosen player's marker
        marker: Marker,
        /// Radius of the unfilled hole around the marker
        hole_radius: f64,
        /// Whether the hole is still shrinking
        animating: bool,
    },
}

impl Frame {
    /// Whether the host should request another animation frame
    pub fn is_animating(&self) -> bool {
        matches!(
            self,
            Self::Reveal {
                animating: true,
                ..
            }
        )
    }

    /// Whether the help text should be visible
    pub fn shows_help(&self) -> bool {
        matches!(self, Self::Help { .. })
    }
}
