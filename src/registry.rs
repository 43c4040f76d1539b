//! Active contact tracking
//!
//! This module tracks every contact currently touching the surface together
//! with the player state derived from it. Enumeration follows insertion
//! order, which is the order the solo pick indexes into.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// A unique identifier for one contact on the input surface
///
/// This is the pointer id reported by the input source. It stays stable for
/// the lifetime of the contact and may be reused by a later contact.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct ContactId(i32);

impl ContactId {
    /// Returns the raw pointer id
    pub fn get(self) -> i32 {
        self.0
    }
}

/// A position on the canvas in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge
    pub x: f64,
    /// Vertical offset from the top edge
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// State of one player, i.e. one active contact
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// The contact this player belongs to
    pub id: ContactId,
    /// Last reported position of the contact
    pub position: Point,
    /// Solo color index, or team index once teams are assigned
    pub color_index: usize,
    /// Team the player was assigned to, if teams have been formed
    pub team: Option<usize>,
}

/// Mapping from contact id to player state
///
/// The registry performs no side effects of its own; the session layers
/// redraws, announcements and scheduling on top of it.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    players: IndexMap<ContactId, Player>,
}

impl Registry {
    /// Inserts a new player, returning `false` if the id is already present
    pub fn add(&mut self, id: ContactId, position: Point, color_index: usize) -> bool {
        if self.players.contains_key(&id) {
            return false;
        }

        self.players.insert(
            id,
            Player {
                id,
                position,
                color_index,
                team: None,
            },
        );

        true
    }

    /// Moves an existing player, returning `false` if the id is unknown
    ///
    /// Stale move events for contacts that already ended land here and are
    /// ignored.
    pub fn update(&mut self, id: ContactId, position: Point) -> bool {
        match self.players.get_mut(&id) {
            Some(player) => {
                player.position = position;
                true
            }
            None => false,
        }
    }

    /// Removes a player, returning its last state if it was present
    pub fn remove(&mut self, id: ContactId) -> Option<Player> {
        self.players.shift_remove(&id)
    }

    /// Gets a player by id
    pub fn get(&self, id: ContactId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ContactId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Checks whether a contact is registered
    pub fn contains(&self, id: ContactId) -> bool {
        self.players.contains_key(&id)
    }

    /// Number of active players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no contact is active
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterates over players in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Gets the player at a position of the insertion order
    pub fn get_index(&self, index: usize) -> Option<&Player> {
        self.players.get_index(index).map(|(_, player)| player)
    }

    /// Lists the registered ids in insertion order
    pub fn ids(&self) -> Vec<ContactId> {
        self.players.keys().copied().collect()
    }

    /// Collects the color indices currently in use
    pub fn colors_in_use(&self) -> BTreeSet<usize> {
        self.players.values().map(|p| p.color_index).collect()
    }

    /// Removes every player
    pub fn clear(&mut self) {
        self.players.clear();
    }
}
