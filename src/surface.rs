//! Output side of a session
//!
//! This module defines the trait through which the session talks to the page
//! it lives on: asking for a repaint and feeding the accessibility live
//! region. A WASM host implements it on top of the DOM; tests record calls.

use std::fmt::Display;

use serde::Serialize;

use crate::registry::ContactId;

/// A human-readable line for the accessibility live region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Announcement {
    /// A contact started and became a player
    PlayerAdded {
        /// The new player
        id: ContactId,
        /// Zero-based team previewed by the player, if any
        team: Option<usize>,
    },
    /// A contact ended before any decision involved it
    PlayerRemoved {
        /// The departed player
        id: ContactId,
    },
    /// The solo decision picked a player
    PlayerChosen {
        /// The chosen player
        id: ContactId,
    },
    /// One line of the team-mode summary
    TeamSummary {
        /// Zero-based team index
        team: usize,
        /// Number of players dealt into the team
        count: usize,
    },
    /// The session returned to idle
    Reset,
}

impl Display for Announcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayerAdded { id, team: None } => write!(f, "Player {id} added"),
            Self::PlayerAdded {
                id,
                team: Some(team),
            } => write!(f, "Player {id} added to team {}", team + 1),
            Self::PlayerRemoved { id } => write!(f, "Player {id} removed"),
            Self::PlayerChosen { id } => write!(f, "Player {id} chosen"),
            Self::TeamSummary { team, count } => write!(f, "Team {}: {count} players", team + 1),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

/// Trait for the page a session renders into
///
/// Implementations must not call back into the session; the session is
/// mutably borrowed while these methods run.
pub trait Surface {
    /// Asks the host to paint a fresh [`crate::frame::Frame`]
    ///
    /// Hosts usually coalesce these into a single animation frame.
    fn request_redraw(&self);

    /// Appends a line to the accessibility log
    ///
    /// # Arguments
    ///
    /// * `announcement` - The event to announce; its `Display` form is the text
    fn announce(&self, announcement: &Announcement);

    /// Empties the accessibility log
    fn clear_announcements(&self);
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_text() {
        let id = ContactId::from(7);
        assert_eq!(
            Announcement::PlayerAdded { id, team: None }.to_string(),
            "Player 7 added"
        );
        assert_eq!(
            Announcement::PlayerAdded { id, team: Some(1) }.to_string(),
            "Player 7 added to team 2"
        );
        assert_eq!(
            Announcement::PlayerRemoved { id }.to_string(),
            "Player 7 removed"
        );
        assert_eq!(
            Announcement::PlayerChosen { id }.to_string(),
            "Player 7 chosen"
        );
        assert_eq!(
            Announcement::TeamSummary { team: 0, count: 3 }.to_string(),
            "Team 1: 3 players"
        );
        assert_eq!(Announcement::Reset.to_string(), "Reset");
    }
}
