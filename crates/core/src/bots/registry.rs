//! Dual-keyed bot registry
//!
//! Bots are tracked by name and by entity handle. The name map is the
//! source of truth and survives respawns and reconnects. The handle map is
//! a cache that is dropped whenever the host reports a handle invalid and
//! rebuilt when a bot with a known name shows up again.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use cs2prac_sdk::{EntityHandle, Team};

use super::BotSpawnInfo;

/// How long a `bot_add` may take before the pending spawn is abandoned
pub const PENDING_SPAWN_WINDOW: Duration = Duration::from_secs(1);

/// A bot the registry is waiting for after a `bot_add`
#[derive(Debug, Clone, PartialEq)]
struct ExpectedBot {
    info: BotSpawnInfo,
    /// Name of the lost bot this one replaces
    replaces: Option<String>,
    requested_at: Instant,
}

impl ExpectedBot {
    fn is_stale(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.requested_at) > PENDING_SPAWN_WINDOW
    }
}

/// What to do when a bot dies
#[derive(Debug, Clone, PartialEq)]
pub enum RespawnPlan {
    /// Not ours (or kicked in the meantime)
    Untracked,
    /// The cached handle is still valid
    RespawnByHandle {
        handle: EntityHandle,
        info: BotSpawnInfo,
    },
    /// A live bot with the tracked name was found
    RespawnByName {
        handle: EntityHandle,
        info: BotSpawnInfo,
    },
    /// The bot is gone; add a new one with the same parameters
    Regenerate { name: String, info: BotSpawnInfo },
}

/// Registry of managed bots
#[derive(Debug, Default)]
pub struct BotRegistry {
    by_name: HashMap<String, BotSpawnInfo>,
    by_handle: HashMap<EntityHandle, String>,
    expected: VecDeque<ExpectedBot>,
}

impl BotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a bot
    pub fn track(&mut self, handle: EntityHandle, name: &str, info: BotSpawnInfo) {
        self.by_handle.retain(|_, tracked| tracked != name);
        self.by_handle.insert(handle, name.to_string());
        self.by_name.insert(name.to_string(), info);
        tracing::debug!(bot = name, %handle, "Tracking bot");
    }

    pub fn info_by_name(&self, name: &str) -> Option<&BotSpawnInfo> {
        self.by_name.get(name)
    }

    pub fn info_by_handle(&self, handle: EntityHandle) -> Option<&BotSpawnInfo> {
        self.by_name.get(self.by_handle.get(&handle)?)
    }

    pub fn name_by_handle(&self, handle: EntityHandle) -> Option<&str> {
        self.by_handle.get(&handle).map(String::as_str)
    }

    /// Re-attach a handle to a known name after reconnect or respawn
    pub fn resync(&mut self, handle: EntityHandle, name: &str) -> Option<&BotSpawnInfo> {
        if !self.by_name.contains_key(name) {
            return None;
        }
        self.by_handle.retain(|_, tracked| tracked != name);
        self.by_handle.insert(handle, name.to_string());
        tracing::debug!(bot = name, %handle, "Resynced bot handle");
        self.by_name.get(name)
    }

    /// Drop a cached handle, keeping the name entry
    pub fn invalidate_handle(&mut self, handle: EntityHandle) -> bool {
        self.by_handle.remove(&handle).is_some()
    }

    /// Drop every cached handle the host no longer recognises
    pub fn cleanup_invalid<F>(&mut self, is_valid: F) -> usize
    where
        F: Fn(EntityHandle) -> bool,
    {
        let before = self.by_handle.len();
        self.by_handle.retain(|handle, _| is_valid(*handle));
        let removed = before - self.by_handle.len();
        if removed > 0 {
            tracing::debug!(removed, "Dropped invalid bot handles");
        }
        removed
    }

    /// Stop tracking every bot whose name contains `fragment`
    ///
    /// Case-insensitive. Returns the removed names.
    pub fn kick(&mut self, fragment: &str) -> Vec<String> {
        let needle = fragment.to_lowercase();
        let names: Vec<String> = self
            .by_name
            .keys()
            .filter(|name| name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        for name in &names {
            self.remove(name);
        }
        names
    }

    /// Stop tracking a bot by exact name
    pub fn remove(&mut self, name: &str) -> Option<BotSpawnInfo> {
        self.by_handle.retain(|_, tracked| tracked != name);
        let info = self.by_name.remove(name);
        if info.is_some() {
            tracing::debug!(bot = name, "Stopped tracking bot");
        }
        info
    }

    /// Stop tracking every bot, including ones still being added
    pub fn kick_all(&mut self) -> usize {
        let count = self.by_name.len();
        self.by_name.clear();
        self.by_handle.clear();
        self.expected.clear();
        count
    }

    /// Stop tracking the bots of one team
    pub fn kick_team(&mut self, team: Team) -> Vec<String> {
        let names: Vec<String> = self
            .by_name
            .iter()
            .filter(|(_, info)| info.team == team)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &names {
            self.remove(name);
        }
        names
    }

    /// Move a name entry to a new name
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(info) = self.by_name.remove(old) else {
            return false;
        };
        for tracked in self.by_handle.values_mut() {
            if tracked == old {
                *tracked = new.to_string();
            }
        }
        self.by_name.insert(new.to_string(), info);
        true
    }

    /// Number of managed bots
    pub fn managed_count(&self) -> usize {
        self.by_name.len() + self.expected.len()
    }

    /// Whether another bot fits under `max_bots`
    pub fn can_spawn(&self, max_bots: usize) -> bool {
        self.managed_count() < max_bots
    }

    /// Names of every managed bot
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Number of `bot_add`s still waiting for their bot
    pub fn pending_count(&self) -> usize {
        self.expected.len()
    }

    /// Remember spawn parameters for the next unknown bot that connects
    pub fn expect(&mut self, info: BotSpawnInfo, now: Instant) {
        self.expected.push_back(ExpectedBot {
            info,
            replaces: None,
            requested_at: now,
        });
    }

    /// Abandon pending spawns older than [`PENDING_SPAWN_WINDOW`]
    ///
    /// A lost bot whose replacement never arrived is forgotten as well.
    pub fn expire_pending(&mut self, now: Instant) -> usize {
        let before = self.expected.len();
        let mut abandoned = Vec::new();
        self.expected.retain(|expected| {
            if !expected.is_stale(now) {
                return true;
            }
            if let Some(old) = &expected.replaces {
                abandoned.push(old.clone());
            }
            false
        });
        for name in &abandoned {
            self.remove(name);
        }

        let expired = before - self.expected.len();
        if expired > 0 {
            tracing::debug!(expired, "Abandoned pending bot spawns");
        }
        expired
    }

    /// Adopt a newly connected bot with an unknown name
    ///
    /// Pairs it with the oldest pending spawn that has not expired. A
    /// regenerated bot takes over the entry of the bot it replaces.
    pub fn adopt(&mut self, handle: EntityHandle, name: &str, now: Instant) -> Option<&BotSpawnInfo> {
        self.expire_pending(now);
        let expected = self.expected.pop_front()?;
        if let Some(old) = &expected.replaces {
            self.remove(old);
            tracing::debug!(old = %old, new = name, "Regenerated bot adopted");
        }
        self.track(handle, name, expected.info);
        self.by_name.get(name)
    }

    /// Decide how to bring a dead bot back
    ///
    /// Kicks remove the name entry first, so a bot kicked before its
    /// respawn runs comes back as `Untracked`. `Regenerate` also queues the
    /// parameters so the replacement bot is adopted on connect.
    pub fn plan_respawn<V, F>(
        &mut self,
        name: &str,
        handle: EntityHandle,
        now: Instant,
        is_valid: V,
        find_by_name: F,
    ) -> RespawnPlan
    where
        V: Fn(EntityHandle) -> bool,
        F: FnOnce(&str) -> Option<EntityHandle>,
    {
        let Some(info) = self.by_name.get(name).cloned() else {
            return RespawnPlan::Untracked;
        };

        if handle.is_valid() && is_valid(handle) {
            self.by_handle.insert(handle, name.to_string());
            return RespawnPlan::RespawnByHandle { handle, info };
        }

        self.invalidate_handle(handle);

        if let Some(found) = find_by_name(name) {
            self.resync(found, name);
            return RespawnPlan::RespawnByName {
                handle: found,
                info,
            };
        }

        self.expected.push_back(ExpectedBot {
            info: info.clone(),
            replaces: Some(name.to_string()),
            requested_at: now,
        });
        RespawnPlan::Regenerate {
            name: name.to_string(),
            info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs2prac_sdk::{QAngle, Vector};

    fn at(start: Instant, secs: f64) -> Instant {
        start + Duration::from_secs_f64(secs)
    }

    fn info(team: Team) -> BotSpawnInfo {
        BotSpawnInfo::new(Vector::new(100.0, 100.0, 64.0), QAngle::default(), team)
    }

    fn handle(index: u32) -> EntityHandle {
        EntityHandle::from_raw(index | (1 << 15))
    }

    #[test]
    fn test_lookup_by_name_and_handle() {
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Alpha", info(Team::CounterTerrorist));

        assert!(registry.info_by_name("Alpha").is_some());
        assert_eq!(
            registry.info_by_handle(handle(1)).map(|i| i.team),
            Some(Team::CounterTerrorist)
        );
        assert_eq!(registry.name_by_handle(handle(1)), Some("Alpha"));
        assert_eq!(registry.managed_count(), 1);
    }

    #[test]
    fn test_name_survives_handle_invalidation() {
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Alpha", info(Team::Terrorist));

        assert!(registry.invalidate_handle(handle(1)));
        assert!(registry.info_by_handle(handle(1)).is_none());
        assert!(registry.info_by_name("Alpha").is_some());

        assert!(registry.resync(handle(2), "Alpha").is_some());
        assert!(registry.info_by_handle(handle(2)).is_some());
        assert!(registry.resync(handle(3), "Unknown").is_none());
    }

    #[test]
    fn test_resync_replaces_old_handle() {
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Alpha", info(Team::Terrorist));
        registry.resync(handle(2), "Alpha");
        assert!(registry.info_by_handle(handle(1)).is_none());
    }

    #[test]
    fn test_cleanup_invalid() {
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Alpha", info(Team::Terrorist));
        registry.track(handle(2), "Bravo", info(Team::Terrorist));

        assert_eq!(registry.cleanup_invalid(|h| h == handle(2)), 1);
        assert!(registry.info_by_handle(handle(1)).is_none());
        assert_eq!(registry.managed_count(), 2);
    }

    #[test]
    fn test_kick_variants() {
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "PracBot Alpha", info(Team::Terrorist));
        registry.track(handle(2), "PracBot Bravo", info(Team::CounterTerrorist));
        registry.track(handle(3), "Charlie", info(Team::CounterTerrorist));

        assert_eq!(registry.kick("alpha"), vec!["PracBot Alpha".to_string()]);
        assert!(registry.info_by_handle(handle(1)).is_none());

        let mut kicked = registry.kick_team(Team::CounterTerrorist);
        kicked.sort();
        assert_eq!(kicked, vec!["Charlie".to_string(), "PracBot Bravo".to_string()]);
        assert_eq!(registry.managed_count(), 0);

        registry.track(handle(4), "Delta", info(Team::Terrorist));
        assert_eq!(registry.kick_all(), 1);
        assert!(registry.names().next().is_none());
    }

    #[test]
    fn test_rename() {
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Old", info(Team::Terrorist));
        assert!(registry.rename("Old", "New"));
        assert!(registry.info_by_name("Old").is_none());
        assert_eq!(registry.name_by_handle(handle(1)), Some("New"));
        assert!(!registry.rename("Missing", "Other"));
    }

    #[test]
    fn test_spawn_limit_counts_pending() {
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Alpha", info(Team::Terrorist));
        registry.expect(info(Team::Terrorist), Instant::now());

        assert!(registry.can_spawn(3));
        assert!(!registry.can_spawn(2));
    }

    #[test]
    fn test_adopt_pending_spawn() {
        let now = Instant::now();
        let mut registry = BotRegistry::new();
        registry.expect(info(Team::CounterTerrorist).crouched(true), now);

        let adopted = registry.adopt(handle(5), "Eve", now).unwrap();
        assert!(adopted.crouched);
        assert!(registry.adopt(handle(6), "Frank", now).is_none());
    }

    #[test]
    fn test_stale_spawn_neither_adopted_nor_counted() {
        let start = Instant::now();
        let mut registry = BotRegistry::new();
        registry.expect(info(Team::Terrorist), start);
        registry.expect(info(Team::Terrorist), at(start, 0.5));
        assert!(!registry.can_spawn(2));

        // The first bot_add was never fulfilled
        assert_eq!(registry.expire_pending(at(start, 1.2)), 1);
        assert_eq!(registry.managed_count(), 1);
        assert!(registry.can_spawn(2));

        // A bot connecting long after the second request is not paired with it
        assert!(registry.adopt(handle(9), "Stranger", at(start, 600.0)).is_none());
        assert!(registry.info_by_name("Stranger").is_none());
        assert_eq!(registry.managed_count(), 0);
    }

    #[test]
    fn test_abandoned_regeneration_forgets_lost_bot() {
        let start = Instant::now();
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Alpha", info(Team::Terrorist));

        let plan = registry.plan_respawn("Alpha", handle(1), start, |_| false, |_| None);
        assert!(matches!(plan, RespawnPlan::Regenerate { .. }));
        assert_eq!(registry.managed_count(), 2);

        assert_eq!(registry.expire_pending(at(start, 2.0)), 1);
        assert!(registry.info_by_name("Alpha").is_none());
        assert_eq!(registry.managed_count(), 0);
    }

    #[test]
    fn test_respawn_precedence() {
        let now = Instant::now();
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Alpha", info(Team::Terrorist));

        let plan = registry.plan_respawn("Alpha", handle(1), now, |_| true, |_| None);
        assert!(matches!(plan, RespawnPlan::RespawnByHandle { .. }));

        let plan = registry.plan_respawn("Alpha", handle(1), now, |_| false, |_| Some(handle(7)));
        assert!(matches!(plan, RespawnPlan::RespawnByName { handle: h, .. } if h == handle(7)));
        assert_eq!(registry.name_by_handle(handle(7)), Some("Alpha"));

        let plan = registry.plan_respawn("Alpha", handle(7), now, |_| false, |_| None);
        assert!(matches!(plan, RespawnPlan::Regenerate { ref name, .. } if name == "Alpha"));

        // The replacement bot takes over the lost bot's entry
        registry.adopt(handle(8), "Alpha (2)", now);
        assert!(registry.info_by_name("Alpha").is_none());
        assert!(registry.info_by_name("Alpha (2)").is_some());
    }

    #[test]
    fn test_kick_wins_over_respawn() {
        let mut registry = BotRegistry::new();
        registry.track(handle(1), "Alpha", info(Team::Terrorist));

        // Death observed, then a kick lands before the respawn runs
        registry.kick("Alpha");
        let plan = registry.plan_respawn("Alpha", handle(1), Instant::now(), |_| true, |_| Some(handle(1)));
        assert_eq!(plan, RespawnPlan::Untracked);
        assert_eq!(registry.managed_count(), 0);
    }
}
