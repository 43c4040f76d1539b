//! Session configuration
//!
//! Every knob of the session with its validation rules. Defaults reproduce
//! the browser game; hosts may override them from a JSON document.

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::Duration;

use crate::{
    constants::{
        geometry::{MAX_REVEAL_END_RADIUS, REVEAL_END_RADIUS},
        players::{MAX_MIN_PLAYERS, MIN_PLAYERS},
        teams::{DEFAULT_TEAM_COUNT, MAX_TEAM_COUNT, MIN_TEAM_COUNT},
        timing::{CHOOSE_DELAY_MS, MAX_DELAY_MS, MIN_DELAY_MS, RESET_DELAY_MS},
    },
    teams::ShuffleStrategy,
};

/// Validation result type for duration validation
type ValidationResult = garde::Result;

/// Validates that a delay falls within `[MIN_DELAY_MS, MAX_DELAY_MS]`
fn validate_delay(val: &Duration, _ctx: &()) -> ValidationResult {
    if (MIN_DELAY_MS..=MAX_DELAY_MS).contains(&(val.as_millis() as u64)) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_DELAY_MS}ms,{MAX_DELAY_MS}ms]",
        )))
    }
}

/// Color shown by players who joined in team mode before teams are formed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaceholderPolicy {
    /// Everyone shows the first team color until the decision
    #[default]
    Uniform,
    /// Each newcomer previews the currently least-loaded team color
    Provisional,
}

/// Errors that can occur when loading a configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The document is not valid JSON or has unknown fields
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range
    #[error("invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}

/// Options of a chooser session
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Dwell time after the last registry change before deciding
    #[garde(custom(validate_delay))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(rename = "decision_delay_ms")]
    pub decision_delay: Duration,
    /// Cooldown before a dismissed decision resets the session
    #[garde(custom(validate_delay))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(rename = "reset_delay_ms")]
    pub reset_delay: Duration,
    /// Players needed before a decision is scheduled
    #[garde(range(min = MIN_PLAYERS, max = MAX_MIN_PLAYERS))]
    pub min_players: usize,
    /// Radius of the hole around the chosen player after the reveal
    #[garde(range(min = 0.0, max = MAX_REVEAL_END_RADIUS))]
    pub reveal_end_radius: f64,
    /// Pre-assignment color policy in team mode
    #[garde(skip)]
    pub placeholder: PlaceholderPolicy,
    /// How players are shuffled before being dealt into teams
    #[garde(skip)]
    pub shuffle: ShuffleStrategy,
    /// Whether the session starts in team mode
    #[garde(skip)]
    pub team_mode: bool,
    /// Number of teams the session starts with
    #[garde(range(min = MIN_TEAM_COUNT, max = MAX_TEAM_COUNT))]
    pub team_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decision_delay: Duration::from_millis(CHOOSE_DELAY_MS),
            reset_delay: Duration::from_millis(RESET_DELAY_MS),
            min_players: MIN_PLAYERS,
            reveal_end_radius: REVEAL_END_RADIUS,
            placeholder: PlaceholderPolicy::default(),
            shuffle: ShuffleStrategy::default(),
            team_mode: false,
            team_count: DEFAULT_TEAM_COUNT,
        }
    }
}

impl Config {
    /// Parses and validates a JSON configuration
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed JSON or unknown fields and
    /// [`Error::Invalid`] when a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.decision_delay, Duration::from_millis(2000));
        assert_eq!(config.reset_delay, Duration::from_millis(1000));
        assert_eq!(config.min_players, 2);
        assert_eq!(config.team_count, 2);
        assert!(!config.team_mode);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_json(
            r#"{"decision_delay_ms": 3000, "team_mode": true, "team_count": 4, "shuffle": "RandomComparator"}"#,
        )
        .unwrap();
        assert_eq!(config.decision_delay, Duration::from_secs(3));
        assert!(config.team_mode);
        assert_eq!(config.team_count, 4);
        assert_eq!(config.shuffle, ShuffleStrategy::RandomComparator);
        assert_eq!(config.reset_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_team_count_out_of_range() {
        assert!(matches!(
            Config::from_json(r#"{"team_count": 9}"#),
            Err(Error::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"team_count": 1}"#),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_delay_out_of_range() {
        assert!(matches!(
            Config::from_json(r#"{"reset_delay_ms": 10}"#),
            Err(Error::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"decision_delay_ms": 600000}"#),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_single_player_minimum_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"min_players": 1}"#),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"colour": "red"}"#),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json("{").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse configuration"));
    }

    #[test]
    fn test_round_trip_keeps_millisecond_names() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"decision_delay_ms\":2000"));
        assert!(json.contains("\"reset_delay_ms\":1000"));
    }
}
