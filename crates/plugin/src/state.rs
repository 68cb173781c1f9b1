//! Plugin state shared by event handlers, timers and store replies

use std::fmt;
use std::time::Instant;

use tracing::{debug, warn};

use cs2prac_core::admins::AdminStore;
use cs2prac_core::bots::{BotRegistry, BotSpawnInfo, RespawnPlan};
use cs2prac_core::commands::PlayerSelector;
use cs2prac_core::config::PracticeConfig;
use cs2prac_core::grenades::{GrenadeHistory, ThrowRecord};
use cs2prac_core::localization::{Language, Localizer};
use cs2prac_core::playtime::{format_duration, PlaytimeTracker};
use cs2prac_core::requests::{PendingRequest, RequestKind, RequestRegistry};
use cs2prac_core::settings::PlayerSettings;
use cs2prac_core::spawns::SpawnTable;
use cs2prac_core::store::StoreHandle;
use cs2prac_sdk::{EntityHandle, SteamId, Team};

use crate::host::GameHost;

/// Prefix of every chat line the plugin prints
pub const CHAT_PREFIX: &str = "[Prac]";

/// Weapon that is never handed to bots with `bot_give`
const KNIFE: &str = "weapon_knife";

/// Everything the main thread owns
pub struct PracticeState {
    pub config: PracticeConfig,
    pub host: Box<dyn GameHost>,
    pub admins: AdminStore,
    pub bots: BotRegistry,
    pub grenades: GrenadeHistory,
    pub playtime: PlaytimeTracker,
    /// `/tphere` and `/tpto` requests
    pub teleports: RequestRegistry,
    /// `.plswm` requests
    pub watches: RequestRegistry,
    pub localizer: Localizer,
    pub settings: PlayerSettings,
    /// Spawn points of the current map
    pub spawns: SpawnTable,
    pub store: Option<StoreHandle<PracticeState>>,
    /// Time of the frame being processed
    pub frame_time: Instant,
}

impl PracticeState {
    pub fn new(
        config: PracticeConfig,
        host: Box<dyn GameHost>,
        admins: AdminStore,
        store: Option<StoreHandle<PracticeState>>,
        now: Instant,
    ) -> Self {
        Self {
            grenades: GrenadeHistory::new(config.history_capacity),
            playtime: PlaytimeTracker::new(config.flush_guard()),
            teleports: RequestRegistry::new(config.request_ttl()),
            watches: RequestRegistry::new(config.request_ttl()),
            bots: BotRegistry::new(),
            localizer: Localizer::default(),
            settings: PlayerSettings::new(),
            spawns: SpawnTable::new(),
            config,
            host,
            admins,
            store,
            frame_time: now,
        }
    }

    /// Print a chat line to one player
    pub fn tell(&mut self, player: SteamId, message: &str) {
        self.host
            .print_to_chat(player, &format!("{} {}", CHAT_PREFIX, message));
    }

    /// Print a localized chat line to one player
    pub fn tell_key(&mut self, player: SteamId, key: &str, args: &[&dyn fmt::Display]) {
        let message = self.localizer.resolve(player, key, args);
        self.tell(player, &message);
    }

    pub fn display_name(&self, player: SteamId) -> String {
        self.host
            .player_name(player)
            .unwrap_or_else(|| player.to_string())
    }

    /// Resolve a comma-separated player list for `caller`
    ///
    /// Names match case-insensitively by substring. Duplicates are dropped.
    pub fn resolve_players(&self, caller: SteamId, list: &str) -> Vec<SteamId> {
        let mut found = Vec::new();

        for selector in PlayerSelector::parse_list(list) {
            let matches = match selector {
                PlayerSelector::AllHumans | PlayerSelector::Everyone => self.host.human_players(),
                PlayerSelector::InSight => self.host.player_in_sight(caller).into_iter().collect(),
                PlayerSelector::Caller => vec![caller],
                PlayerSelector::Random => self.host.random_player().into_iter().collect(),
                PlayerSelector::Name(fragment) => {
                    let fragment = fragment.to_lowercase();
                    self.host
                        .human_players()
                        .into_iter()
                        .filter(|&id| {
                            self.host
                                .player_name(id)
                                .is_some_and(|name| name.to_lowercase().contains(&fragment))
                        })
                        .collect()
                }
            };

            for id in matches {
                if !found.contains(&id) {
                    found.push(id);
                }
            }
        }

        found
    }

    /// Place a bot at its spawn point, freeze it and hand it its weapon
    pub fn configure_bot(&mut self, handle: EntityHandle, name: &str, info: &BotSpawnInfo) {
        if !self
            .host
            .place_bot(handle, info.stand_position(), info.rotation, info.crouched)
        {
            warn!(bot = name, %handle, "Failed to place bot");
            return;
        }

        self.host.execute_command("bot_stop 1");
        if !info.weapon.is_empty() && info.weapon != KNIFE {
            self.host
                .execute_command(&format!("bot_give {} {}", name, info.weapon));
        }
        debug!(bot = name, position = %info.position, crouched = info.crouched, "Bot configured");
    }

    /// Bring a dead managed bot back to its spawn point
    pub fn respawn_bot(&mut self, name: &str, handle: EntityHandle) {
        let host = &self.host;
        let plan = self.bots.plan_respawn(
            name,
            handle,
            self.frame_time,
            |h| host.is_bot_valid(h),
            |n| host.find_bot(n),
        );

        match plan {
            RespawnPlan::Untracked => {
                debug!(bot = name, "Bot no longer managed, not respawning");
            }
            RespawnPlan::RespawnByHandle { handle, info }
            | RespawnPlan::RespawnByName { handle, info } => {
                if self.host.respawn_bot(handle) {
                    self.configure_bot(handle, name, &info);
                } else {
                    warn!(bot = name, %handle, "Bot respawn failed");
                }
            }
            RespawnPlan::Regenerate { name, info } => {
                debug!(bot = %name, team = %info.team, "Regenerating lost bot");
                self.host.execute_command(info.team.bot_add_command());
            }
        }
    }

    /// Commit whole seconds accumulated by every session due for a flush
    pub fn flush_playtime(&mut self, now: Instant) {
        let deltas = self.playtime.periodic_flush(now);
        let Some(store) = &self.store else {
            return;
        };
        for delta in deltas {
            store.add_playtime(delta.player, delta.seconds);
        }
    }

    /// Drop expired teleport and watch requests
    pub fn sweep_requests(&mut self, now: Instant) {
        let removed = self.teleports.sweep_expired(now) + self.watches.sweep_expired(now);
        if removed > 0 {
            debug!(removed, "Swept expired requests");
        }
    }

    /// Read the spawn entities of both teams from the host
    pub fn reload_spawns(&mut self) {
        for team in [Team::CounterTerrorist, Team::Terrorist] {
            let points = self.host.spawn_points(team);
            self.spawns
                .load(team, points.into_iter().map(|pose| (pose.position, pose.angles)));
        }
    }

    /// Forget handles the host no longer knows and abandon unanswered `bot_add`s
    pub fn cleanup_bots(&mut self) {
        let host = &self.host;
        self.bots.cleanup_invalid(|h| host.is_bot_valid(h));
        self.bots.expire_pending(self.frame_time);
    }
}

impl PracticeState {
    /// Move `who` to `target`, optionally copying the target's view
    pub fn teleport_to_player(&mut self, who: SteamId, target: SteamId, facing: bool) -> bool {
        let Some(pose) = self.host.player_pose(target) else {
            return false;
        };
        self.host
            .teleport(who, pose.position, facing.then_some(pose.angles))
    }

    /// Throw a recorded grenade again and report the result
    pub fn throw_record(&mut self, player: SteamId, record: &ThrowRecord) {
        if !self.host.throw_grenade(player, record) {
            warn!(%player, index = record.index, "Rethrow failed");
            self.tell(player, "Rethrow failed");
            return;
        }

        let kind = match self.localizer.language(player) {
            Language::En => record.kind.display_name(),
            Language::Zh => record.kind.display_name_zh(),
        };
        self.tell_key(player, "rethrow.success", &[&record.index, &kind]);
    }

    /// Print a duration as hours and minutes, or minutes alone
    pub fn tell_duration(&mut self, player: SteamId, hours_key: &str, minutes_key: &str, seconds: u64) {
        let (hours, minutes) = format_duration(seconds);
        if hours > 0 {
            self.tell_key(player, hours_key, &[&hours, &minutes]);
        } else {
            self.tell_key(player, minutes_key, &[&minutes]);
        }
    }
}

/// Carry out an accepted request on the host
pub(crate) fn perform_request(host: &mut dyn GameHost, request: &PendingRequest) -> bool {
    let (mover, destination) = match request.kind {
        RequestKind::TeleportHere => (request.target, request.requester),
        RequestKind::TeleportTo => (request.requester, request.target),
        RequestKind::Watch => return host.spectate(request.target, request.requester),
    };

    match host.player_pose(destination) {
        Some(pose) => host.teleport(mover, pose.position, None),
        None => false,
    }
}
