//! Plugin lifecycle and game event handlers

use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, error, info, warn};

use cs2prac_core::admins::AdminStore;
use cs2prac_core::config::{resolve_data_path, PluginConfig, PracticeConfig};
use cs2prac_core::grenades::{projectile_weapon_name, ThrowSnapshot};
use cs2prac_core::localization::Language;
use cs2prac_core::settings::PracticeFlags;
use cs2prac_core::store::StoreWorker;
use cs2prac_core::tasks::TaskQueue;
use cs2prac_core::timers::{TimerFlags, Timers};
use cs2prac_sdk::{EntityHandle, SteamId, Team, Vector};

use crate::host::GameHost;
use crate::state::PracticeState;

/// Delay between a bot death and its respawn
pub const RESPAWN_DELAY: Duration = Duration::from_millis(100);

/// The practice plugin
///
/// Owns the state plus the timer registry, the main-thread task queue and
/// the store worker. Every entry point takes the current time so the host's
/// frame clock drives all bookkeeping.
pub struct PracticePlugin {
    pub(crate) state: PracticeState,
    pub(crate) timers: Timers<PracticeState>,
    tasks: TaskQueue<PracticeState>,
    store: Option<StoreWorker<PracticeState>>,
}

impl PracticePlugin {
    /// Load the plugin with files resolved under `base_dir`
    ///
    /// The admin file and database live in the plugin's config directory.
    /// A database that cannot be opened disables persistence; the plugin
    /// keeps running on in-memory state.
    pub fn load(
        config: PracticeConfig,
        host: Box<dyn GameHost>,
        base_dir: &Path,
        now: Instant,
    ) -> Self {
        let admin_path =
            resolve_data_path(base_dir, PracticeConfig::PLUGIN_NAME, &config.admin_file);
        let db_path =
            resolve_data_path(base_dir, PracticeConfig::PLUGIN_NAME, &config.database_file);

        let admins = AdminStore::open(admin_path);
        let tasks = TaskQueue::new();

        let store = match StoreWorker::spawn(db_path, tasks.sender()) {
            Ok(worker) => Some(worker),
            Err(e) => {
                error!("Failed to open player database, stats disabled: {}", e);
                None
            }
        };

        let state = PracticeState::new(
            config,
            host,
            admins,
            store.as_ref().map(StoreWorker::handle),
            now,
        );

        let mut plugin = Self {
            state,
            timers: Timers::new(),
            tasks,
            store,
        };
        plugin.install_timers(now);
        plugin.state.reload_spawns();

        info!(
            admins = plugin.state.admins.len(),
            persistence = plugin.store.is_some(),
            "cs2prac loaded"
        );
        plugin
    }

    fn install_timers(&mut self, now: Instant) {
        let config = &self.state.config;

        self.timers.add_repeating(
            "playtime_flush",
            config.flush_interval(),
            now,
            |state: &mut PracticeState| {
                let now = state.frame_time;
                state.flush_playtime(now);
            },
        );
        self.timers.add_repeating(
            "request_sweep",
            config.request_sweep_interval(),
            now,
            |state: &mut PracticeState| {
                let now = state.frame_time;
                state.sweep_requests(now);
            },
        );
        self.timers.add_repeating(
            "bot_cleanup",
            config.bot_cleanup_interval(),
            now,
            PracticeState::cleanup_bots,
        );
    }

    /// Read-only view of the state
    pub fn state(&self) -> &PracticeState {
        &self.state
    }

    /// Run queued store replies and due timers
    ///
    /// Called once per server frame.
    pub fn on_game_frame(&mut self, now: Instant) {
        self.state.frame_time = now;
        self.tasks.process(&mut self.state);
        self.timers.process(now, &mut self.state);
    }

    /// A human player finished connecting
    pub fn on_player_connect(&mut self, player: SteamId, name: &str, now: Instant) {
        self.state.frame_time = now;
        if self.state.playtime.is_connected(player) {
            debug!(%player, "Reconnect without disconnect, closing previous session");
            self.end_session(player, now);
        }
        self.state.playtime.record_connect(player, now);

        let Some(store) = self.state.store.clone() else {
            self.state.tell_key(player, "player.welcome", &[&name]);
            return;
        };

        store.upsert_player(player, name.to_string());
        let name = name.to_string();
        store.player_data(player, move |state: &mut PracticeState, result| {
            // The player may have left while the query ran
            if !state.playtime.is_connected(player) {
                debug!(%player, "Player left before data loaded");
                return;
            }
            if let Ok(Some(data)) = result {
                match data.language.parse::<Language>() {
                    Ok(language) => state.localizer.set_language(player, language),
                    Err(e) => warn!(%player, "Ignoring stored language: {}", e),
                }
            }
            state.tell_key(player, "player.welcome", &[&name]);
        });
        store.create_session(player);
    }

    /// A human player disconnected
    ///
    /// Commits the time no flush covered and closes the session, then drops
    /// every per-player entry.
    pub fn on_player_disconnect(&mut self, player: SteamId, now: Instant) {
        self.state.frame_time = now;
        self.end_session(player, now);

        let state = &mut self.state;
        let purged = state.teleports.purge_player(player) + state.watches.purge_player(player);
        if purged > 0 {
            debug!(%player, purged, "Dropped requests of disconnected player");
        }
        state.grenades.remove_player(player);
        state.localizer.remove_player(player);
        state.settings.remove_player(player);
    }

    /// Commit the unflushed remainder and close the open session row
    fn end_session(&mut self, player: SteamId, now: Instant) {
        let state = &mut self.state;
        let Some(end) = state.playtime.record_disconnect_with_remainder(player, now) else {
            return;
        };
        if let Some(store) = &state.store {
            if end.unflushed_seconds > 0 {
                store.add_playtime(player, end.unflushed_seconds);
            }
            store.close_session(player, end.session_seconds);
        }
    }

    /// A grenade projectile spawned for a human player
    ///
    /// `name` may be the projectile's designer name or the weapon name.
    pub fn on_grenade_thrown(&mut self, player: SteamId, name: &str, snapshot: ThrowSnapshot) {
        let weapon = projectile_weapon_name(name).unwrap_or(name);
        self.state
            .grenades
            .record(player, snapshot, weapon, SystemTime::now());
    }

    /// A bot joined the server
    ///
    /// Known names are resynced to their new handle. Unknown bots are
    /// matched with the oldest pending spawn still inside its window.
    pub fn on_bot_connect(&mut self, handle: EntityHandle, name: &str, now: Instant) {
        self.state.frame_time = now;
        let state = &mut self.state;

        if let Some(info) = state.bots.resync(handle, name).cloned() {
            debug!(bot = name, %handle, "Known bot reconnected");
            state.configure_bot(handle, name, &info);
            return;
        }

        let Some(info) = state.bots.adopt(handle, name, now).cloned() else {
            return;
        };

        let mut bot_name = name.to_string();
        if let Some(custom) = info.custom_name.as_deref() {
            if custom != name
                && state.host.rename_bot(handle, custom)
                && state.bots.rename(name, custom)
            {
                bot_name = custom.to_string();
            }
        }

        info!(bot = %bot_name, %handle, "Managed bot spawned");
        state.configure_bot(handle, &bot_name, &info);
    }

    /// A bot died
    ///
    /// Managed bots respawn after a short delay. The plan is made when the
    /// timer fires, so a kick in between wins.
    pub fn on_bot_death(&mut self, handle: EntityHandle, name: &str, now: Instant) {
        if self.state.bots.info_by_name(name).is_none() {
            return;
        }

        let name = name.to_string();
        self.timers.add_with_flags(
            "bot_respawn",
            RESPAWN_DELAY,
            TimerFlags::STOP_ON_MAPCHANGE,
            now,
            move |state: &mut PracticeState| state.respawn_bot(&name, handle),
        );
    }

    /// A player was flashed; returns true when the flash was cancelled
    pub fn on_player_blind(&mut self, player: SteamId) -> bool {
        if !self.state.settings.has(player, PracticeFlags::BLIND_IMMUNE) {
            return false;
        }
        self.state.host.clear_flash(player);
        debug!(%player, "Flash cancelled");
        true
    }

    /// A bullet hit something
    pub fn on_bullet_impact(&mut self, player: SteamId, position: Vector) {
        if self.state.settings.has(player, PracticeFlags::SHOW_IMPACT) {
            self.state
                .host
                .print_to_center(player, &format!("Impact: {}", position));
        }
    }

    /// The map is about to change
    ///
    /// Bots and pending delayed actions do not carry over.
    pub fn on_map_change(&mut self) {
        self.timers.remove_mapchange_timers();
        let bots = self.state.bots.kick_all();
        info!(bots, "Map change, cleared managed bots");
    }

    /// A new map finished loading
    pub fn on_map_start(&mut self) {
        self.state.reload_spawns();
        info!(
            ct = self.state.spawns.points(Team::CounterTerrorist).len(),
            t = self.state.spawns.points(Team::Terrorist).len(),
            "Map started, spawn points loaded"
        );
    }

    /// Close every open session and stop the store worker
    pub fn shutdown(&mut self, now: Instant) {
        let players: Vec<SteamId> = self.state.playtime.connected().collect();
        for player in players {
            self.on_player_disconnect(player, now);
        }

        if let Some(mut worker) = self.store.take() {
            worker.shutdown();
        }
        self.state.store = None;
        info!("cs2prac shut down");
    }
}
