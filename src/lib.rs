//! # Chooser Game Library
//!
//! This library provides the core logic of a finger chooser party game.
//! Everyone puts a finger on a shared screen; after a short dwell the session
//! either picks one player at random or splits everyone into balanced teams.
//! It tracks contacts, debounces the decision and reset timers, and produces
//! render snapshots and accessibility announcements for the host page.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
use serde::{Deserialize, Serialize};

pub mod color;
pub mod config;
pub mod constants;
pub mod frame;
pub mod game;
pub mod registry;
pub mod reveal;
pub mod surface;
pub mod teams;
pub mod timer;

/// Alarm messages for the session's timed events
///
/// The host schedules these through the callback it passes to the session
/// and hands them back to [`game::Session::receive_alarm`] once the delay
/// has elapsed. Each carries the generation of the timer that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The dwell period ended; pick a player or form teams
    Decide {
        /// Generation of the decision timer
        generation: u64,
    },
    /// The cooldown after a dismissed decision ended
    Reset {
        /// Generation of the reset timer
        generation: u64,
    },
}
