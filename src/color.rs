//! Player color allocation
//!
//! Solo players get the lowest color index nobody else holds, which is mapped
//! onto a hue wheel with a large step so neighbours look different. Teams use
//! a fixed palette of eight hues.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    constants::color::{LIGHTNESS, SATURATION, SOLO_HUE_OFFSET, SOLO_HUE_STEP, TEAM_HUES},
    registry::Registry,
    teams::TeamCount,
};

/// A color in the HSLA model, as understood by CSS
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    /// Hue in degrees, normalized to `[0, 360)`
    pub hue: f64,
    /// Saturation in percent
    pub saturation: f64,
    /// Lightness in percent
    pub lightness: f64,
    /// Opacity in `[0, 1]`
    pub alpha: f64,
}

impl Hsla {
    fn player(hue: f64) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation: SATURATION,
            lightness: LIGHTNESS,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different opacity
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl Display for Hsla {
    /// Formats the color as a CSS `hsla()` value
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}

/// Returns the smallest color index not held by any registered player
pub fn pick_unused_color(registry: &Registry) -> usize {
    let used = registry.colors_in_use();
    (0..).find(|candidate| !used.contains(candidate)).unwrap_or_default()
}

/// Maps a solo color index onto the hue wheel
pub fn solo_color(index: usize) -> Hsla {
    Hsla::player(index as f64 * SOLO_HUE_STEP + SOLO_HUE_OFFSET)
}

/// Looks up the palette color of a team, wrapping after eight teams
pub fn team_color(team: usize) -> Hsla {
    Hsla::player(TEAM_HUES[team % TEAM_HUES.len()])
}

/// Neutral gray for a player who joined after teams were formed
pub fn unassigned_color() -> Hsla {
    Hsla {
        hue: 0.0,
        saturation: 0.0,
        lightness: LIGHTNESS,
        alpha: 1.0,
    }
}

/// Returns the team with the fewest players already previewing it
///
/// Only meaningful in team mode before teams are formed, where each
/// player's color index holds a provisional team. Ties go to the lowest
/// team index.
pub fn provisional_team(registry: &Registry, team_count: TeamCount) -> usize {
    let mut loads = vec![0_usize; team_count.get()];
    for player in registry.iter() {
        if let Some(load) = loads.get_mut(player.color_index) {
            *load += 1;
        }
    }

    loads
        .iter()
        .enumerate()
        .min_by_key(|(team, load)| (**load, *team))
        .map_or(0, |(team, _)| team)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::registry::{ContactId, Point};

    #[test]
    fn test_pick_unused_color_empty() {
        assert_eq!(pick_unused_color(&Registry::default()), 0);
    }

    #[test]
    fn test_pick_unused_color_fills_gaps() {
        let mut registry = Registry::default();
        registry.add(ContactId::from(1), Point::default(), 0);
        registry.add(ContactId::from(2), Point::default(), 2);
        assert_eq!(pick_unused_color(&registry), 1);

        registry.add(ContactId::from(3), Point::default(), 1);
        assert_eq!(pick_unused_color(&registry), 3);
    }

    #[test]
    fn test_colors_stay_distinct_under_churn() {
        let mut registry = Registry::default();
        let mut rng = fastrand::Rng::with_seed(3);

        for _ in 0..300 {
            let id = ContactId::from(rng.i32(0..10));
            if rng.bool() {
                let color = pick_unused_color(&registry);
                registry.add(id, Point::default(), color);
            } else {
                registry.remove(id);
            }

            let colors: HashSet<usize> = registry.iter().map(|p| p.color_index).collect();
            assert_eq!(colors.len(), registry.len());
        }
    }

    #[test]
    fn test_solo_color_hues() {
        assert_eq!(solo_color(0).hue, 348.0);
        assert_eq!(solo_color(1).hue, 210.5);
        assert_eq!(solo_color(2).hue, 73.0);
        assert_eq!(solo_color(0).saturation, 100.0);
        assert_eq!(solo_color(0).lightness, 51.4);
    }

    #[test]
    fn test_team_color_wraps() {
        assert_eq!(team_color(0), team_color(8));
        assert_eq!(team_color(1).hue, 210.0);
        assert_eq!(team_color(7).hue, 270.0);
    }

    #[test]
    fn test_unassigned_color_is_outside_palette() {
        let gray = unassigned_color();
        assert_eq!(gray.saturation, 0.0);
        assert!((0..TEAM_HUES.len()).all(|team| team_color(team) != gray));
        assert_eq!(gray.to_string(), "hsla(0, 0%, 51.4%, 1)");
    }

    #[test]
    fn test_css_format() {
        assert_eq!(team_color(1).to_string(), "hsla(210, 100%, 51.4%, 1)");
        assert_eq!(
            team_color(2).with_alpha(0.5).to_string(),
            "hsla(120, 100%, 51.4%, 0.5)"
        );
    }

    #[test]
    fn test_provisional_team_least_loaded() {
        let mut registry = Registry::default();
        let count = TeamCount::new(3);
        assert_eq!(provisional_team(&registry, count), 0);

        registry.add(ContactId::from(1), Point::default(), 0);
        assert_eq!(provisional_team(&registry, count), 1);

        registry.add(ContactId::from(2), Point::default(), 1);
        registry.add(ContactId::from(3), Point::default(), 2);
        assert_eq!(provisional_team(&registry, count), 0);

        registry.remove(ContactId::from(2));
        assert_eq!(provisional_team(&registry, count), 1);
    }
}
