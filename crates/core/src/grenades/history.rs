//! Per-player grenade throw history

use std::collections::HashMap;
use std::time::SystemTime;

use cs2prac_sdk::{QAngle, SteamId, Vector};

use super::GrenadeKind;

/// Default number of throws kept per player
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Pose and projectile state captured when a grenade leaves the hand
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThrowSnapshot {
    pub throw_position: Vector,
    pub throw_angles: QAngle,
    pub throw_velocity: Vector,
    pub player_position: Vector,
    pub player_angles: QAngle,
}

/// One recorded throw
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowRecord {
    pub throw_position: Vector,
    pub throw_angles: QAngle,
    pub throw_velocity: Vector,
    pub player_position: Vector,
    pub player_angles: QAngle,
    pub kind: GrenadeKind,
    /// Name as reported by the host
    pub raw_name: String,
    pub thrown_at: SystemTime,
    /// 1 is the newest throw
    pub index: usize,
}

/// Bounded, newest-first throw log for every player
pub struct GrenadeHistory {
    players: HashMap<SteamId, Vec<ThrowRecord>>,
    capacity: usize,
}

impl Default for GrenadeHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl GrenadeHistory {
    /// Create a history keeping at most `capacity` throws per player
    pub fn new(capacity: usize) -> Self {
        Self {
            players: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a throw
    ///
    /// Unknown grenade names are skipped and return `None`. The new record
    /// becomes index 1, older records are renumbered and the oldest are
    /// evicted past capacity.
    pub fn record(
        &mut self,
        player: SteamId,
        snapshot: ThrowSnapshot,
        raw_name: &str,
        thrown_at: SystemTime,
    ) -> Option<&ThrowRecord> {
        let Some(kind) = GrenadeKind::from_name(raw_name) else {
            tracing::debug!(%player, name = raw_name, "Ignoring unknown grenade");
            return None;
        };

        let record = ThrowRecord {
            throw_position: snapshot.throw_position,
            throw_angles: snapshot.throw_angles,
            throw_velocity: snapshot.throw_velocity,
            player_position: snapshot.player_position,
            player_angles: snapshot.player_angles,
            kind,
            raw_name: raw_name.to_string(),
            thrown_at,
            index: 1,
        };

        let history = self.players.entry(player).or_default();
        history.insert(0, record);
        for (i, entry) in history.iter_mut().enumerate() {
            entry.index = i + 1;
        }
        history.truncate(self.capacity);

        tracing::debug!(%player, %kind, count = history.len(), "Recorded grenade throw");
        history.first()
    }

    /// Newest throw
    pub fn latest(&self, player: SteamId) -> Option<&ThrowRecord> {
        self.players.get(&player)?.first()
    }

    /// Throw at a 1-based index
    pub fn by_index(&self, player: SteamId, index: usize) -> Option<&ThrowRecord> {
        self.players
            .get(&player)?
            .iter()
            .find(|record| record.index == index)
    }

    /// Newest throw of a kind
    pub fn by_kind(&self, player: SteamId, kind: GrenadeKind) -> Option<&ThrowRecord> {
        self.players
            .get(&player)?
            .iter()
            .find(|record| record.kind == kind)
    }

    /// Forget every throw of a player, keeping the player known
    pub fn clear(&mut self, player: SteamId) {
        if let Some(history) = self.players.get_mut(&player) {
            history.clear();
        }
    }

    /// All throws of a player, newest first
    pub fn history(&self, player: SteamId) -> &[ThrowRecord] {
        self.players.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of throws recorded for a player
    pub fn len(&self, player: SteamId) -> usize {
        self.history(player).len()
    }

    /// Drop a player's history on disconnect
    pub fn remove_player(&mut self, player: SteamId) {
        self.players.remove(&player);
    }

    /// Per-player capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: SteamId = SteamId::new(76561198000000001);

    fn snapshot(n: f32) -> ThrowSnapshot {
        ThrowSnapshot {
            throw_position: Vector::new(n, 0.0, 0.0),
            ..Default::default()
        }
    }

    fn assert_contiguous(history: &GrenadeHistory) {
        let indices: Vec<usize> = history.history(PLAYER).iter().map(|r| r.index).collect();
        let expected: Vec<usize> = (1..=indices.len()).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_latest_is_newest() {
        let mut history = GrenadeHistory::default();
        let names = ["smoke", "flash", "molotov", "he", "decoy"];

        for (i, name) in names.iter().enumerate() {
            history.record(PLAYER, snapshot(i as f32), name, SystemTime::now());

            let latest = history.latest(PLAYER).unwrap();
            assert_eq!(latest.throw_position.x, i as f32);
            assert_eq!(latest.raw_name, *name);
            assert_eq!(history.by_index(PLAYER, 1), Some(latest));
            assert_contiguous(&history);
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = GrenadeHistory::default();
        for i in 0..60 {
            history.record(PLAYER, snapshot(i as f32), "smoke", SystemTime::now());
        }

        assert_eq!(history.len(PLAYER), 50);
        assert_contiguous(&history);

        // Throws 0..10 were evicted, 10 is now the oldest
        assert!(history
            .history(PLAYER)
            .iter()
            .all(|r| r.throw_position.x >= 10.0));
        assert_eq!(history.by_index(PLAYER, 50).unwrap().throw_position.x, 10.0);
        assert!(history.by_index(PLAYER, 51).is_none());
    }

    #[test]
    fn test_unknown_name_skipped() {
        let mut history = GrenadeHistory::default();
        assert!(history
            .record(PLAYER, snapshot(0.0), "weapon_c4", SystemTime::now())
            .is_none());
        assert_eq!(history.len(PLAYER), 0);
        assert!(history.latest(PLAYER).is_none());
    }

    #[test]
    fn test_by_kind_returns_newest_of_kind() {
        let mut history = GrenadeHistory::default();
        history.record(PLAYER, snapshot(1.0), "smoke", SystemTime::now());
        history.record(PLAYER, snapshot(2.0), "flash", SystemTime::now());
        history.record(PLAYER, snapshot(3.0), "weapon_smokegrenade", SystemTime::now());

        let smoke = history.by_kind(PLAYER, GrenadeKind::Smoke).unwrap();
        assert_eq!(smoke.throw_position.x, 3.0);
        assert_eq!(smoke.index, 1);

        let flash = history.by_kind(PLAYER, GrenadeKind::Flashbang).unwrap();
        assert_eq!(flash.index, 2);

        assert!(history.by_kind(PLAYER, GrenadeKind::Decoy).is_none());
    }

    #[test]
    fn test_clear_and_remove() {
        let mut history = GrenadeHistory::new(5);
        history.record(PLAYER, snapshot(1.0), "he", SystemTime::now());
        history.clear(PLAYER);
        assert_eq!(history.len(PLAYER), 0);

        history.record(PLAYER, snapshot(1.0), "he", SystemTime::now());
        history.remove_player(PLAYER);
        assert!(history.latest(PLAYER).is_none());
    }
}
