//! Team formation
//!
//! This module partitions the active players into a fixed number of teams
//! whose sizes differ by at most one. Players are shuffled first and then
//! dealt round-robin, so the first `n mod k` teams receive the extra member.

use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    constants::teams::{DEFAULT_TEAM_COUNT, MAX_TEAM_COUNT, MIN_TEAM_COUNT},
    registry::{ContactId, Registry},
};

/// Number of teams to form, always within `[2, 8]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct TeamCount(usize);

impl TeamCount {
    /// Creates a team count, clamping it into the supported range
    pub fn new(count: usize) -> Self {
        Self(count.clamp(MIN_TEAM_COUNT, MAX_TEAM_COUNT))
    }

    /// Returns the number of teams
    pub fn get(self) -> usize {
        self.0
    }

    /// Whether the stepper may go up
    pub fn can_increment(self) -> bool {
        self.0 < MAX_TEAM_COUNT
    }

    /// Whether the stepper may go down
    pub fn can_decrement(self) -> bool {
        self.0 > MIN_TEAM_COUNT
    }

    /// Adds one team, returning `false` if already at the maximum
    pub fn increment(&mut self) -> bool {
        if self.can_increment() {
            self.0 += 1;
            true
        } else {
            false
        }
    }

    /// Removes one team, returning `false` if already at the minimum
    pub fn decrement(&mut self) -> bool {
        if self.can_decrement() {
            self.0 -= 1;
            true
        } else {
            false
        }
    }
}

impl Default for TeamCount {
    fn default() -> Self {
        Self(DEFAULT_TEAM_COUNT)
    }
}

impl From<usize> for TeamCount {
    fn from(count: usize) -> Self {
        Self::new(count)
    }
}

impl From<TeamCount> for usize {
    fn from(count: TeamCount) -> Self {
        count.0
    }
}

/// How the player order is randomized before dealing players into teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShuffleStrategy {
    /// Uniform random permutation (Fisher-Yates)
    #[default]
    Uniform,
    /// Insertion sort driven by a coin-flip comparator
    ///
    /// Not uniform: players tend to stay near their join position. Kept for
    /// parity with the browser build that sorted with a random comparator.
    RandomComparator,
}

impl ShuffleStrategy {
    fn shuffle<T>(self, items: &mut [T], rng: &mut fastrand::Rng) {
        match self {
            Self::Uniform => rng.shuffle(items),
            Self::RandomComparator => {
                for i in 1..items.len() {
                    let mut j = i;
                    while j > 0 && coin_flip(rng) == Ordering::Less {
                        items.swap(j - 1, j);
                        j -= 1;
                    }
                }
            }
        }
    }
}

fn coin_flip(rng: &mut fastrand::Rng) -> Ordering {
    if rng.bool() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// The outcome of a team-mode decision
///
/// Holds, for each team index, the ids of its members in dealing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    teams: Vec<Vec<ContactId>>,
}

impl TeamAssignment {
    /// Partitions every registered player into `team_count` teams
    ///
    /// Each player's `team` is set and its `color_index` becomes the team
    /// index. Every team ends up with `floor(n/k)` or `ceil(n/k)` members.
    pub fn assign(
        registry: &mut Registry,
        team_count: TeamCount,
        strategy: ShuffleStrategy,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let mut order = registry.ids();
        strategy.shuffle(&mut order, rng);

        let mut teams = vec![Vec::new(); team_count.get()];
        for (position, id) in order.into_iter().enumerate() {
            let team = position % team_count.get();
            if let Some(player) = registry.get_mut(id) {
                player.team = Some(team);
                player.color_index = team;
            }
            teams[team].push(id);
        }

        Self { teams }
    }

    /// Gets the members of every team, indexed by team
    pub fn teams(&self) -> &[Vec<ContactId>] {
        &self.teams
    }

    /// Number of teams, including empty ones
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Finds the team a player was dealt into
    pub fn team_of(&self, id: ContactId) -> Option<usize> {
        self.teams.iter().position(|members| members.contains(&id))
    }

    /// Sizes of every team, indexed by team
    pub fn sizes(&self) -> Vec<usize> {
        self.teams.iter().map(Vec::len).collect_vec()
    }

    /// Lists `(team index, member count)` for every team that has members
    pub fn non_empty(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.teams
            .iter()
            .enumerate()
            .filter(|(_, members)| !members.is_empty())
            .map(|(team, members)| (team, members.len()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::registry::Point;

    fn registry_with(count: i32) -> Registry {
        let mut registry = Registry::default();
        for raw in 0..count {
            registry.add(ContactId::from(raw), Point::default(), 0);
        }
        registry
    }

    /// Checks balance and coverage of one assignment
    fn check_assignment(players: i32, teams: usize, strategy: ShuffleStrategy, seed: u64) {
        let mut registry = registry_with(players);
        let mut rng = fastrand::Rng::with_seed(seed);
        let assignment =
            TeamAssignment::assign(&mut registry, TeamCount::new(teams), strategy, &mut rng);

        let n = players as usize;
        let floor = n / teams;
        let ceil = n.div_ceil(teams);

        assert_eq!(assignment.team_count(), teams);
        for size in assignment.sizes() {
            assert!(
                size == floor || size == ceil,
                "{n} players over {teams} teams produced a team of {size}"
            );
        }

        let members: Vec<ContactId> = assignment.teams().iter().flatten().copied().collect();
        let unique: HashSet<ContactId> = members.iter().copied().collect();
        assert_eq!(members.len(), n);
        assert_eq!(unique, registry.ids().into_iter().collect());

        for player in registry.iter() {
            let team = assignment.team_of(player.id).unwrap();
            assert_eq!(player.team, Some(team));
            assert_eq!(player.color_index, team);
        }
    }

    #[test]
    fn test_teams_balanced_uniform() {
        for teams in 2..=8 {
            for players in 0..=20 {
                check_assignment(players, teams, ShuffleStrategy::Uniform, players as u64);
            }
        }
    }

    #[test]
    fn test_teams_balanced_random_comparator() {
        for teams in 2..=8 {
            for players in 0..=20 {
                check_assignment(
                    players,
                    teams,
                    ShuffleStrategy::RandomComparator,
                    teams as u64,
                );
            }
        }
    }

    #[test]
    fn test_seven_players_three_teams() {
        let mut registry = registry_with(7);
        let mut rng = fastrand::Rng::with_seed(99);
        let assignment = TeamAssignment::assign(
            &mut registry,
            TeamCount::new(3),
            ShuffleStrategy::Uniform,
            &mut rng,
        );

        let mut sizes = assignment.sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 2, 3]);
    }

    #[test]
    fn test_non_empty_skips_empty_teams() {
        let mut registry = registry_with(2);
        let mut rng = fastrand::Rng::with_seed(1);
        let assignment = TeamAssignment::assign(
            &mut registry,
            TeamCount::new(4),
            ShuffleStrategy::Uniform,
            &mut rng,
        );

        assert_eq!(
            assignment.non_empty().collect_vec(),
            vec![(0, 1), (1, 1)]
        );
    }

    #[test]
    fn test_uniform_shuffle_reaches_every_first_position() {
        let mut seen = HashSet::new();
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..200 {
            let mut registry = registry_with(4);
            let assignment = TeamAssignment::assign(
                &mut registry,
                TeamCount::new(4),
                ShuffleStrategy::Uniform,
                &mut rng,
            );
            seen.insert(assignment.teams()[0][0]);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_team_count_clamps() {
        assert_eq!(TeamCount::new(0).get(), 2);
        assert_eq!(TeamCount::new(5).get(), 5);
        assert_eq!(TeamCount::new(42).get(), 8);
        assert_eq!(TeamCount::default().get(), 2);
    }

    #[test]
    fn test_team_count_stepper() {
        let mut count = TeamCount::new(7);
        assert!(count.increment());
        assert!(!count.increment());
        assert_eq!(count.get(), 8);
        assert!(!count.can_increment());

        let mut count = TeamCount::new(3);
        assert!(count.decrement());
        assert!(!count.decrement());
        assert_eq!(count.get(), 2);
        assert!(!count.can_decrement());
    }

    #[test]
    fn test_team_count_deserialize_clamps() {
        let count: TeamCount = serde_json::from_str("12").unwrap();
        assert_eq!(count.get(), 8);
        assert_eq!(serde_json::to_string(&TeamCount::new(4)).unwrap(), "4");
    }
}
