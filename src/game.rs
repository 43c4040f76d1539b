//! Core session logic and state management
//!
//! This module contains the session struct that owns the player registry,
//! the mode controls and both debounced timers. Input events and alarms are
//! fed into it by the host; it answers with redraw requests, accessibility
//! announcements, scheduled alarms and render snapshots.

use serde::Serialize;
use tracing::{debug, info};
use web_time::{Duration, SystemTime};

use super::{
    AlarmMessage,
    color::{pick_unused_color, provisional_team, solo_color, team_color, unassigned_color},
    config::{Config, PlaceholderPolicy},
    constants::players::MIN_PLAYERS,
    frame::{Frame, Marker},
    registry::{ContactId, Player, Point, Registry},
    reveal::{Reveal, Viewport},
    surface::{Announcement, Surface},
    teams::{TeamAssignment, TeamCount},
    timer::Debouncer,
};

/// Represents the current phase of the session
///
/// The phase is derived from the registry and the decision, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Nobody is touching the screen
    Idle,
    /// Players are touching; a decision may be pending
    Armed,
    /// A solo player was chosen and is being revealed
    SoloRevealing,
    /// Team mode formed its teams
    TeamsAssigned,
}

/// The player picked by a solo decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChosenPlayer {
    /// The chosen contact
    pub id: ContactId,
    /// Animation parameters recorded when the decision fired
    pub reveal: Reveal,
}

/// The outcome of the current round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decision {
    /// Solo mode picked one player
    Chosen(ChosenPlayer),
    /// Team mode partitioned every player
    Teams(TeamAssignment),
}

/// A finger chooser session
///
/// One session serves one screen. All methods run to completion
/// synchronously; the host delivers scheduled alarms back through
/// [`Session::receive_alarm`].
#[derive(Debug)]
pub struct Session {
    /// Options fixed at construction
    config: Config,
    /// Every active contact
    registry: Registry,
    /// Whether the session partitions players instead of picking one
    team_mode: bool,
    /// Number of teams formed in team mode
    team_count: TeamCount,
    /// Result of the current round, if it fired
    decision: Option<Decision>,
    /// Debounced dwell timer
    decision_timer: Debouncer,
    /// Debounced cooldown timer
    reset_timer: Debouncer,
    /// Canvas dimensions, used for the reveal's starting radius
    viewport: Viewport,
    /// Source of the solo pick and team shuffle
    rng: fastrand::Rng,
    /// Whether the live region holds lines written since the last reset
    announced: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    /// Creates an idle session
    ///
    /// # Arguments
    ///
    /// * `config` - Session options; `min_players` below two is raised to two
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, fastrand::Rng::new())
    }

    /// Creates an idle session drawing randomness from `rng`
    ///
    /// Seeded generators make picks and shuffles reproducible.
    pub fn with_rng(mut config: Config, rng: fastrand::Rng) -> Self {
        config.min_players = config.min_players.max(MIN_PLAYERS);

        Self {
            config,
            registry: Registry::default(),
            team_mode: config.team_mode,
            team_count: TeamCount::new(config.team_count),
            decision: None,
            decision_timer: Debouncer::default(),
            reset_timer: Debouncer::default(),
            viewport: Viewport::default(),
            rng,
            announced: false,
        }
    }

    /// Gets the current phase
    pub fn phase(&self) -> Phase {
        match &self.decision {
            Some(Decision::Chosen(_)) => Phase::SoloRevealing,
            Some(Decision::Teams(_)) => Phase::TeamsAssigned,
            None if self.registry.is_empty() => Phase::Idle,
            None => Phase::Armed,
        }
    }

    /// Gets the options this session was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets the active players
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Gets the decision of the current round, if any
    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    /// Gets the solo pick, if one was made
    pub fn chosen_player(&self) -> Option<&ChosenPlayer> {
        match &self.decision {
            Some(Decision::Chosen(chosen)) => Some(chosen),
            _ => None,
        }
    }

    /// Gets the team partition, if one was made
    pub fn teams(&self) -> Option<&TeamAssignment> {
        match &self.decision {
            Some(Decision::Teams(assignment)) => Some(assignment),
            _ => None,
        }
    }

    /// Whether team mode is active
    pub fn team_mode(&self) -> bool {
        self.team_mode
    }

    /// Gets the configured number of teams
    pub fn team_count(&self) -> TeamCount {
        self.team_count
    }

    /// Gets the canvas dimensions
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether a decision alarm is outstanding
    pub fn is_decision_pending(&self) -> bool {
        self.decision_timer.is_pending()
    }

    /// Whether a reset alarm is outstanding
    pub fn is_reset_pending(&self) -> bool {
        self.reset_timer.is_pending()
    }

    /// Help text for the current mode
    pub fn description(&self) -> String {
        if self.team_mode {
            format!(
                "Team Mode: Players will be auto-assigned to {} teams with different colors.",
                self.team_count.get()
            )
        } else {
            format!(
                "Make all players put one finger on the screen. After {} seconds one player is chosen at random.",
                self.config.decision_delay.as_secs_f64()
            )
        }
    }

    /// Records new canvas dimensions
    pub fn resize<S: Surface>(&mut self, width: f64, height: f64, surface: &S) {
        self.viewport = Viewport::new(width, height);
        surface.request_redraw();
    }

    // Input

    /// Handles a contact starting on the canvas
    ///
    /// The host must not forward contacts that start on the UI controls.
    ///
    /// # Arguments
    ///
    /// * `id` - The new contact
    /// * `x`, `y` - Contact position in CSS pixels
    /// * `schedule_message` - Function to schedule delayed alarms
    /// * `surface` - The page to redraw and announce on
    pub fn pointer_down<S: Surface, F: FnMut(AlarmMessage, Duration)>(
        &mut self,
        id: ContactId,
        x: f64,
        y: f64,
        mut schedule_message: F,
        surface: &S,
    ) {
        let (color_index, previewed_team) = self.placeholder_color();

        if !self.registry.add(id, Point::new(x, y), color_index) {
            debug!(%id, "ignoring duplicate contact");
            return;
        }

        surface.request_redraw();
        self.announce(
            &Announcement::PlayerAdded {
                id,
                team: previewed_team,
            },
            surface,
        );
        debug!(%id, players = self.registry.len(), "player added");

        self.arm_decision(&mut schedule_message);
    }

    /// Handles a contact moving
    ///
    /// Moves for contacts that are not registered are ignored.
    pub fn pointer_move<S: Surface>(&mut self, id: ContactId, x: f64, y: f64, surface: &S) {
        if self.registry.update(id, Point::new(x, y)) {
            surface.request_redraw();
        }
    }

    /// Handles a contact ending
    ///
    /// Lifting the chosen player, or anyone once teams are formed, dismisses
    /// the decision and schedules a reset. Any other contact simply leaves.
    pub fn pointer_up<S: Surface, F: FnMut(AlarmMessage, Duration)>(
        &mut self,
        id: ContactId,
        mut schedule_message: F,
        surface: &S,
    ) {
        let dismisses = match &self.decision {
            Some(Decision::Chosen(chosen)) => chosen.id == id,
            Some(Decision::Teams(_)) => true,
            None => false,
        };

        if dismisses {
            debug!(%id, "decision dismissed");
            self.request_reset(schedule_message);
            return;
        }

        let Some(player) = self.registry.remove(id) else {
            return;
        };

        surface.request_redraw();
        self.announce(&Announcement::PlayerRemoved { id: player.id }, surface);
        debug!(%id, players = self.registry.len(), "player removed");

        self.arm_decision(&mut schedule_message);
    }

    /// Handles a contact being cancelled by the platform
    ///
    /// Identical to [`Session::pointer_up`].
    pub fn pointer_cancel<S: Surface, F: FnMut(AlarmMessage, Duration)>(
        &mut self,
        id: ContactId,
        schedule_message: F,
        surface: &S,
    ) {
        self.pointer_up(id, schedule_message, surface);
    }

    // Controls

    /// Flips between solo and team mode, resetting the session
    pub fn toggle_team_mode<S: Surface>(&mut self, surface: &S) {
        self.team_mode = !self.team_mode;
        info!(team_mode = self.team_mode, "mode changed");
        self.reset(surface);
    }

    /// Adds one team, resetting the session if the count changed
    ///
    /// # Returns
    ///
    /// `false` if the count was already at its maximum
    pub fn increment_team_count<S: Surface>(&mut self, surface: &S) -> bool {
        let changed = self.team_count.increment();
        if changed {
            info!(team_count = self.team_count.get(), "team count changed");
            self.reset(surface);
        }
        changed
    }

    /// Removes one team, resetting the session if the count changed
    ///
    /// # Returns
    ///
    /// `false` if the count was already at its minimum
    pub fn decrement_team_count<S: Surface>(&mut self, surface: &S) -> bool {
        let changed = self.team_count.decrement();
        if changed {
            info!(team_count = self.team_count.get(), "team count changed");
            self.reset(surface);
        }
        changed
    }

    // Timers

    /// Schedules a reset after the cooldown, superseding any earlier request
    ///
    /// A pending decision is dropped so nothing fires during the cooldown.
    pub fn request_reset<F: FnMut(AlarmMessage, Duration)>(&mut self, mut schedule_message: F) {
        self.decision_timer.cancel();
        let generation = self.reset_timer.arm();
        schedule_message(AlarmMessage::Reset { generation }, self.config.reset_delay);
        debug!(generation, "reset scheduled");
    }

    /// Handles a scheduled alarm coming due
    ///
    /// Alarms superseded by a later arm or cancelled by a reset are ignored.
    pub fn receive_alarm<S: Surface>(&mut self, message: AlarmMessage, surface: &S) {
        match message {
            AlarmMessage::Decide { generation } => {
                if self.decision_timer.fire(generation) {
                    self.decide(surface);
                } else {
                    debug!(generation, "ignoring stale decision alarm");
                }
            }
            AlarmMessage::Reset { generation } => {
                if self.reset_timer.fire(generation) {
                    self.reset(surface);
                } else {
                    debug!(generation, "ignoring stale reset alarm");
                }
            }
        }
    }

    /// Returns the session to idle immediately
    ///
    /// Clears players, the decision, both timers and the accessibility log.
    /// An idle session only drops leftover log lines and writes no `Reset`,
    /// so the log gets exactly one `Reset` line per real transition.
    pub fn reset<S: Surface>(&mut self, surface: &S) {
        self.reset_timer.cancel();
        self.decision_timer.cancel();

        if self.registry.is_empty() && self.decision.is_none() {
            if self.announced {
                surface.clear_announcements();
                self.announced = false;
            }
            debug!("already idle; nothing to reset");
            return;
        }

        self.registry.clear();
        self.decision = None;

        surface.clear_announcements();
        surface.announce(&Announcement::Reset);
        self.announced = false;
        surface.request_redraw();
        info!("session reset");
    }

    // Rendering

    /// Takes a snapshot of what should be on screen at `now`
    pub fn frame(&self, now: SystemTime) -> Frame {
        if let Some(chosen) = self.chosen_player() {
            if let Some(player) = self.registry.get(chosen.id) {
                let elapsed = chosen.reveal.elapsed(now);
                return Frame::Reveal {
                    marker: self.marker(player),
                    hole_radius: chosen.reveal.radius_at(elapsed),
                    animating: chosen.reveal.is_running(elapsed),
                };
            }
        }

        if self.registry.is_empty() {
            Frame::Help {
                description: self.description(),
            }
        } else {
            Frame::Players {
                markers: self.registry.iter().map(|p| self.marker(p)).collect(),
            }
        }
    }

    // Internals

    fn announce<S: Surface>(&mut self, announcement: &Announcement, surface: &S) {
        surface.announce(announcement);
        self.announced = true;
    }

    /// Picks the color index, and the previewed team if any, for a newcomer
    ///
    /// Players joining after teams are formed preview no team.
    fn placeholder_color(&self) -> (usize, Option<usize>) {
        if !self.team_mode {
            return (pick_unused_color(&self.registry), None);
        }
        if self.teams().is_some() {
            return (0, None);
        }

        match self.config.placeholder {
            PlaceholderPolicy::Uniform => (0, None),
            PlaceholderPolicy::Provisional => {
                let team = provisional_team(&self.registry, self.team_count);
                (team, Some(team))
            }
        }
    }

    fn marker(&self, player: &Player) -> Marker {
        Marker {
            id: player.id,
            position: player.position,
            color: match (self.team_mode, player.team) {
                (false, _) => solo_color(player.color_index),
                (true, Some(team)) => team_color(team),
                (true, None) if self.teams().is_some() => unassigned_color(),
                (true, None) => team_color(player.color_index),
            },
        }
    }

    /// Re-evaluates the dwell timer after a registry change
    fn arm_decision<F: FnMut(AlarmMessage, Duration)>(&mut self, schedule_message: &mut F) {
        self.decision_timer.cancel();

        if self.decision.is_some()
            || self.registry.is_empty()
            || self.registry.len() < self.config.min_players
        {
            return;
        }

        let generation = self.decision_timer.arm();
        schedule_message(
            AlarmMessage::Decide { generation },
            self.config.decision_delay,
        );
        debug!(
            generation,
            players = self.registry.len(),
            "decision scheduled"
        );
    }

    fn decide<S: Surface>(&mut self, surface: &S) {
        if self.decision.is_some()
            || self.registry.is_empty()
            || self.registry.len() < self.config.min_players
        {
            return;
        }

        if self.team_mode {
            let assignment = TeamAssignment::assign(
                &mut self.registry,
                self.team_count,
                self.config.shuffle,
                &mut self.rng,
            );

            surface.request_redraw();
            for (team, count) in assignment.non_empty() {
                self.announce(&Announcement::TeamSummary { team, count }, surface);
            }
            info!(
                teams = self.team_count.get(),
                players = self.registry.len(),
                "teams assigned"
            );

            self.decision = Some(Decision::Teams(assignment));
        } else {
            let index = self.rng.usize(..self.registry.len());
            let Some(player) = self.registry.get_index(index) else {
                return;
            };

            let id = player.id;
            let reveal = Reveal::new(
                self.viewport,
                player.position,
                self.config.reveal_end_radius,
                SystemTime::now(),
            );
            self.decision = Some(Decision::Chosen(ChosenPlayer { id, reveal }));

            surface.request_redraw();
            self.announce(&Announcement::PlayerChosen { id }, surface);
            info!(%id, players = self.registry.len(), "player chosen");
        }
    }
}
