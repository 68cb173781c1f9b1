//! Map spawn points
//!
//! The host reports the spawn entities of each team when a map starts.
//! Points are numbered from 1 in the order the host lists them.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use cs2prac_sdk::{QAngle, Team, Vector};

/// Height added when teleporting onto a spawn point
pub const SPAWN_LIFT: f32 = 5.0;

/// One spawn entity of a team
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPoint {
    pub position: Vector,
    pub angles: QAngle,
    pub team: Team,
    /// 1-based number within the team
    pub index: usize,
}

impl SpawnPoint {
    /// Where a player is placed, slightly above the floor
    pub fn teleport_position(&self) -> Vector {
        self.position.offset(0.0, 0.0, SPAWN_LIFT)
    }
}

/// Spawn ranking by distance to the enemy team's spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnType {
    /// Farthest from every enemy spawn
    Best,
    /// Closest to an enemy spawn
    Worst,
}

impl fmt::Display for SpawnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Best => "best",
            Self::Worst => "worst",
        })
    }
}

impl FromStr for SpawnType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "worst" => Ok(Self::Worst),
            _ => Err(()),
        }
    }
}

/// Spawn points of both playable teams
#[derive(Debug, Default)]
pub struct SpawnTable {
    counter_terrorist: Vec<SpawnPoint>,
    terrorist: Vec<SpawnPoint>,
}

impl SpawnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the points of one team
    ///
    /// Non-playable teams have no spawn points and are ignored.
    pub fn load<I>(&mut self, team: Team, points: I)
    where
        I: IntoIterator<Item = (Vector, QAngle)>,
    {
        let Some(list) = self.list_mut(team) else {
            return;
        };
        *list = points
            .into_iter()
            .enumerate()
            .map(|(i, (position, angles))| SpawnPoint {
                position,
                angles,
                team,
                index: i + 1,
            })
            .collect();
        tracing::debug!(%team, count = list.len(), "Loaded spawn points");
    }

    pub fn clear(&mut self) {
        self.counter_terrorist.clear();
        self.terrorist.clear();
    }

    pub fn points(&self, team: Team) -> &[SpawnPoint] {
        match team {
            Team::CounterTerrorist => &self.counter_terrorist,
            Team::Terrorist => &self.terrorist,
            _ => &[],
        }
    }

    fn list_mut(&mut self, team: Team) -> Option<&mut Vec<SpawnPoint>> {
        match team {
            Team::CounterTerrorist => Some(&mut self.counter_terrorist),
            Team::Terrorist => Some(&mut self.terrorist),
            _ => None,
        }
    }

    pub fn by_index(&self, team: Team, index: usize) -> Option<&SpawnPoint> {
        self.points(team).iter().find(|point| point.index == index)
    }

    pub fn random<R: Rng + ?Sized>(&self, team: Team, rng: &mut R) -> Option<&SpawnPoint> {
        self.points(team).choose(rng)
    }

    /// Best or worst point by the shortest distance to any enemy spawn
    ///
    /// Falls back to the first point when the enemy team has none. Ties
    /// keep the earlier point.
    pub fn by_type(&self, team: Team, spawn_type: SpawnType) -> Option<&SpawnPoint> {
        let points = self.points(team);
        let enemy = match team {
            Team::CounterTerrorist => self.points(Team::Terrorist),
            Team::Terrorist => self.points(Team::CounterTerrorist),
            _ => return None,
        };
        if enemy.is_empty() {
            return points.first();
        }

        let nearest_enemy = |point: &SpawnPoint| {
            enemy
                .iter()
                .map(|e| point.position.distance_squared(&e.position))
                .fold(f32::INFINITY, f32::min)
        };

        let mut chosen: Option<(&SpawnPoint, f32)> = None;
        for point in points {
            let distance = nearest_enemy(point);
            let better = match (chosen, spawn_type) {
                (None, _) => true,
                (Some((_, d)), SpawnType::Best) => distance > d,
                (Some((_, d)), SpawnType::Worst) => distance < d,
            };
            if better {
                chosen = Some((point, distance));
            }
        }
        chosen.map(|(point, _)| point)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn table() -> SpawnTable {
        let mut table = SpawnTable::new();
        table.load(
            Team::CounterTerrorist,
            [
                (Vector::new(0.0, 100.0, 0.0), QAngle::default()),
                (Vector::new(0.0, 900.0, 0.0), QAngle::new(0.0, 90.0, 0.0)),
                (Vector::new(0.0, 500.0, 0.0), QAngle::default()),
            ],
        );
        table.load(Team::Terrorist, [(Vector::new(0.0, 0.0, 0.0), QAngle::default())]);
        table
    }

    #[test]
    fn test_indices_start_at_one() {
        let table = table();
        let second = table.by_index(Team::CounterTerrorist, 2).unwrap();
        assert_eq!(second.position, Vector::new(0.0, 900.0, 0.0));
        assert_eq!(second.angles.yaw, 90.0);
        assert!(table.by_index(Team::CounterTerrorist, 0).is_none());
        assert!(table.by_index(Team::Terrorist, 2).is_none());
        assert!(table.points(Team::Spectator).is_empty());
    }

    #[test]
    fn test_best_and_worst_by_enemy_distance() {
        let table = table();
        assert_eq!(
            table.by_type(Team::CounterTerrorist, SpawnType::Best).map(|p| p.index),
            Some(2)
        );
        assert_eq!(
            table.by_type(Team::CounterTerrorist, SpawnType::Worst).map(|p| p.index),
            Some(1)
        );
        assert!(table.by_type(Team::Spectator, SpawnType::Best).is_none());
    }

    #[test]
    fn test_by_type_without_enemy_spawns() {
        let mut table = table();
        table.load(Team::Terrorist, Vec::new());
        assert_eq!(
            table.by_type(Team::CounterTerrorist, SpawnType::Worst).map(|p| p.index),
            Some(1)
        );
    }

    #[test]
    fn test_random_stays_in_team() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let point = table.random(Team::CounterTerrorist, &mut rng).unwrap();
            assert_eq!(point.team, Team::CounterTerrorist);
        }
        assert!(table.random(Team::None, &mut rng).is_none());
    }

    #[test]
    fn test_teleport_position_lifted() {
        let table = table();
        let point = table.by_index(Team::Terrorist, 1).unwrap();
        assert_eq!(point.teleport_position(), Vector::new(0.0, 0.0, SPAWN_LIFT));
    }

    #[test]
    fn test_spawn_type_parse() {
        assert_eq!("BEST".parse::<SpawnType>(), Ok(SpawnType::Best));
        assert_eq!("worst".parse::<SpawnType>(), Ok(SpawnType::Worst));
        assert!("middle".parse::<SpawnType>().is_err());
    }
}
