//! Chat command dispatch
//!
//! ```text
//! .bot spawn|kick|kickall     bot management
//! .rt / .ct [args]            rethrow, .hd returns to the last throw
//! .clear / .c                 clear grenade history
//! .tp, /tphere, /tpto, .a     teleports and requests
//! .plswm / .pm                ask a player to watch you
//! .sp / .s                    spawn point teleports
//! .qy .qh .break              clear smokes and fires, break props
//! .god .impact .blind         practice toggles
//! .playtime .stats .lang      player statistics and language
//! .admin add|remove|reload    admin list
//! .gm /tpahere /specall       admin player control
//! /watchme
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, info};

use cs2prac_core::bots::{BotSpawnInfo, DEFAULT_BOT_WEAPON};
use cs2prac_core::commands::chat::{check_chat_trigger, parse_chat_command};
use cs2prac_core::commands::{
    parse_player_pair, parse_spawn_args, BotSpawnArgs, CommandContext, CommandInfo,
    CommandResult, GameMode, RethrowArgs, RethrowPlan, SpawnSelection, TeleportArgs,
    TeleportTarget,
};
use cs2prac_core::grenades::{GrenadeKind, ThrowRecord};
use cs2prac_core::localization::Language;
use cs2prac_core::requests::{RequestError, RequestKind};
use cs2prac_core::settings::PracticeFlags;
use cs2prac_core::timers::TimerFlags;
use cs2prac_core::world::{ClearTarget, BREAKABLE_CLASSES};
use cs2prac_sdk::{SteamId, Team};

use crate::plugin::PracticePlugin;
use crate::state::{perform_request, PracticeState};

const HELP_LINES: &[&str] = &[
    ".bot spawn [name] [side ct|t] [at x y z] [crouch] | .bot kick <name> | .bot kickall [ct|t]",
    ".rt [index=N] [type=1-5] [delay=ms] [back=N] [list] [clear] | .hd | .clear",
    ".tp player=<name> [facing=true] | .tp pos=x,y,z | /tphere <name> | /tpto <name> | .a",
    ".plswm <name> | .god | .impact | .blind",
    ".sp index=N [side=ct|t] | .sp type=best|worst | .sp random",
    ".qy | .qh | .break",
    ".playtime | .stats | .lang <en|zh>",
];

const ADMIN_HELP_LINES: &[&str] = &[
    ".admin add|remove <steamid64> | .admin reload | .admin list",
    ".gm <players> <normal|spectator> | /tpahere | /specall | /watchme <players>",
];

impl PracticePlugin {
    /// Handle a chat message from a human player
    ///
    /// Messages without a trigger pass through. Unknown silent commands are
    /// reported to the caller and swallowed; unknown public ones pass through.
    pub fn on_chat(&mut self, player: SteamId, message: &str, now: Instant) -> CommandResult {
        let Some((silent, text)) = check_chat_trigger(message) else {
            return CommandResult::Continue;
        };

        let (name, args) = parse_chat_command(text);
        if name.is_empty() {
            return CommandResult::Continue;
        }

        let context = if silent {
            CommandContext::ChatSilent
        } else {
            CommandContext::ChatPublic
        };
        let info = CommandInfo::new(args, player, context);

        self.state.frame_time = now;
        debug!(%player, command = %name, "Chat command");

        if self.dispatch(player, &name, &info, now) {
            return CommandResult::Handled;
        }

        if !context.is_silent() {
            return CommandResult::Continue;
        }

        self.state
            .tell(player, &format!("Unknown command: {}", name));
        self.state
            .tell(player, "Type .help to list available commands");
        CommandResult::Handled
    }

    fn dispatch(&mut self, player: SteamId, name: &str, info: &CommandInfo, now: Instant) -> bool {
        match name {
            "bot" => self.bot_command(player, info, now),
            "rethrow" | "rt" | "ct" | "chongtou" => {
                self.rethrow_command(player, RethrowArgs::parse(info.rest()), now)
            }
            "hd" | "huidian" => self.back_to_throw(player, 1),
            "qy" | "qingyan" => self.clear_effects(player, ClearTarget::Smokes),
            "qh" | "qinghuo" => self.clear_effects(player, ClearTarget::Fires),
            "break" | "bk" => self.break_props(player),
            "spawn" | "sp" | "s" | "csd" => self.spawn_command(player, info),
            "clear" | "c" => {
                self.state.grenades.clear(player);
                self.state.tell(player, "Grenade history cleared");
            }
            "tp" | "teleport" => self.teleport_command(player, info),
            "tphere" => self.send_requests(player, info, RequestKind::TeleportHere, now),
            "tpto" => self.send_requests(player, info, RequestKind::TeleportTo, now),
            "a" | "accept" | "tpaccept" => self.accept_request(player, now),
            "plswm" | "pm" | "pleasewatchme" => {
                self.send_requests(player, info, RequestKind::Watch, now)
            }
            "god" | "wudi" => self.toggle_god(player),
            "impact" | "dankong" | "dk" => {
                self.toggle(player, PracticeFlags::SHOW_IMPACT, "Impact display")
            }
            "blind" | "b" | "shanguang" | "sg" => {
                self.toggle(player, PracticeFlags::BLIND_IMMUNE, "Flash immunity")
            }
            "help" => self.help(player),
            "playtime" => self.playtime_command(player, now),
            "stats" => self.stats_command(player, now),
            "lang" | "language" => self.language_command(player, info),
            "admin" => self.admin_command(player, info),
            "gamemode" | "gm" | "g" => self.game_mode_command(player, info),
            "tpahere" => self.teleport_all_here(player),
            "specall" => self.spectate_all(player),
            "watchme" => self.watch_me(player, info),
            _ => return false,
        }
        true
    }

    // Bots

    fn bot_command(&mut self, player: SteamId, info: &CommandInfo, now: Instant) {
        match info.arg(1).to_lowercase().as_str() {
            "spawn" => self.spawn_bot(player, &BotSpawnArgs::parse(info.args_from(2)), now),
            "kick" => {
                let fragment = info.args_from(2).join(" ");
                if fragment.is_empty() {
                    self.state.tell(player, "Usage: .bot kick <name>");
                } else {
                    self.kick_bots(player, &fragment);
                }
            }
            "kickall" => self.kick_all_bots(player, info.arg(2)),
            _ => {
                self.state.tell(player, "Usage: .bot spawn|kick|kickall [args]");
                self.state.tell(player, HELP_LINES[0]);
            }
        }
    }

    fn spawn_bot(&mut self, player: SteamId, args: &BotSpawnArgs, now: Instant) {
        let state = &mut self.state;

        state.bots.expire_pending(now);
        if !state.bots.can_spawn(state.config.max_bots) {
            let max = state.config.max_bots;
            state.tell(player, &format!("Bot limit reached ({})", max));
            return;
        }

        let crouch = args.is_crouch();
        if crouch && !state.config.allow_crouch_bots {
            state.tell(player, "Crouching bots are disabled");
            return;
        }

        let Some(pose) = state.host.player_pose(player) else {
            state.tell(player, "Cannot read your position");
            return;
        };

        let position = args.position().unwrap_or(pose.position);
        let team = args.team().unwrap_or(Team::None);
        let weapon = state
            .host
            .active_weapon(player)
            .unwrap_or_else(|| DEFAULT_BOT_WEAPON.to_string());

        let spawn = BotSpawnInfo::new(position, pose.angles, team)
            .crouched(crouch)
            .weapon(weapon)
            .custom_name(args.name.clone());
        state.bots.expect(spawn, now);

        state.host.execute_command(team.bot_add_command());
        let difficulty = format!("bot_difficulty {}", state.config.bot_difficulty);
        state.host.execute_command(&difficulty);

        info!(%player, %position, %team, crouch, "Bot spawn requested");
        let stance = if crouch { " (crouching)" } else { "" };
        state.tell(player, &format!("Spawning bot at {}{}", position, stance));
    }

    fn kick_bots(&mut self, player: SteamId, fragment: &str) {
        let state = &mut self.state;
        let needle = fragment.to_lowercase();

        let mut kicked = state.bots.kick(fragment);
        for bot in state.host.live_bots() {
            if bot.name.to_lowercase().contains(&needle) && !kicked.contains(&bot.name) {
                kicked.push(bot.name);
            }
        }

        if kicked.is_empty() {
            state.tell(player, &format!("No bot matching '{}'", fragment));
            return;
        }

        for name in &kicked {
            state.host.execute_command(&format!("bot_kick {}", name));
        }
        state.tell(player, &format!("Kicked: {}", kicked.join(", ")));
    }

    fn kick_all_bots(&mut self, player: SteamId, side: &str) {
        let state = &mut self.state;

        if side.is_empty() {
            let live = state.host.live_bots().len();
            let tracked = state.bots.kick_all();
            state.host.execute_command("bot_kick");
            state.tell(player, &format!("Kicked {} bots", live.max(tracked)));
            return;
        }

        let Some(team) = Team::from_side(side) else {
            state.tell(player, "Usage: .bot kickall [ct|t]");
            return;
        };

        let mut kicked = state.bots.kick_team(team);
        for bot in state.host.live_bots() {
            if bot.team == team && !kicked.contains(&bot.name) {
                kicked.push(bot.name);
            }
        }
        for name in &kicked {
            state.host.execute_command(&format!("bot_kick {}", name));
        }
        state.tell(player, &format!("Kicked {} {} bots", kicked.len(), team));
    }

    // Grenades

    fn rethrow_command(&mut self, player: SteamId, args: RethrowArgs, now: Instant) {
        let plan = match args.plan() {
            Ok(plan) => plan,
            Err(conflict) => {
                self.state.tell(player, &conflict.to_string());
                return;
            }
        };

        match plan {
            RethrowPlan::Clear => {
                self.state.grenades.clear(player);
                self.state.tell(player, "Grenade history cleared");
            }
            RethrowPlan::List => self.list_throws(player),
            RethrowPlan::Back(index) => self.back_to_throw(player, index),
            RethrowPlan::ByKind { code, delay } => {
                let Some(kind) = GrenadeKind::from_code(code) else {
                    self.state
                        .tell(player, &format!("Unknown grenade type {}, use 1-5", code));
                    return;
                };
                match self.state.grenades.by_kind(player, kind).cloned() {
                    Some(record) => self.rethrow(player, record, delay, now),
                    None => self
                        .state
                        .tell(player, &format!("No {} in your history", kind)),
                }
            }
            RethrowPlan::ByIndex { index, delay } => {
                let record = usize::try_from(index)
                    .ok()
                    .and_then(|i| self.state.grenades.by_index(player, i))
                    .cloned();
                match record {
                    Some(record) => self.rethrow(player, record, delay, now),
                    None => self.state.tell_key(player, "rethrow.not_found", &[&index]),
                }
            }
            RethrowPlan::Latest { delay } => match self.state.grenades.latest(player).cloned() {
                Some(record) => self.rethrow(player, record, delay, now),
                None => self.state.tell(player, "No grenades thrown yet"),
            },
        }
    }

    fn rethrow(&mut self, player: SteamId, record: ThrowRecord, delay: Option<Duration>, now: Instant) {
        match delay {
            Some(delay) if !delay.is_zero() => {
                self.state.tell(
                    player,
                    &format!("Rethrowing #{} in {} ms", record.index, delay.as_millis()),
                );
                self.timers.add_with_flags(
                    "rethrow",
                    delay,
                    TimerFlags::STOP_ON_MAPCHANGE,
                    now,
                    move |state: &mut PracticeState| {
                        if state.host.is_connected(player) {
                            state.throw_record(player, &record);
                        }
                    },
                );
            }
            _ => self.state.throw_record(player, &record),
        }
    }

    fn back_to_throw(&mut self, player: SteamId, index: i32) {
        let record = usize::try_from(index)
            .ok()
            .and_then(|i| self.state.grenades.by_index(player, i))
            .map(|r| (r.player_position, r.player_angles));

        let Some((position, angles)) = record else {
            self.state.tell_key(player, "rethrow.not_found", &[&index]);
            return;
        };

        if self.state.host.teleport(player, position, Some(angles)) {
            self.state
                .tell(player, &format!("Returned to throw #{}", index));
        } else {
            self.state.tell(player, "Teleport failed");
        }
    }

    fn list_throws(&mut self, player: SteamId) {
        let lines: Vec<String> = self
            .state
            .grenades
            .history(player)
            .iter()
            .map(|r| format!("#{} {} from {}", r.index, r.kind, r.throw_position))
            .collect();

        if lines.is_empty() {
            self.state.tell(player, "No grenades thrown yet");
            return;
        }
        for line in &lines {
            self.state.tell(player, line);
        }
    }

    // Teleports and requests

    fn teleport_command(&mut self, player: SteamId, info: &CommandInfo) {
        if info.rest().is_empty() {
            self.state.tell(player, "Usage: .tp player=<name> [facing=true]");
            self.state.tell(player, "Usage: .tp pos=<x,y,z>");
            self.state.tell(player, "Usage: .tp player=<from>,<to> (admin)");
            self.state.tell(player, "Selectors: @a @e @p @s @r");
            return;
        }

        let args = match TeleportArgs::parse(info.rest()) {
            Ok(args) => args,
            Err(e) => {
                self.state.tell(player, &e.to_string());
                return;
            }
        };

        let state = &mut self.state;
        match args.target {
            TeleportTarget::Position(position) => {
                if state.host.teleport(player, position, None) {
                    state.tell(player, &format!("Teleported to {}", position));
                } else {
                    state.tell(player, "Teleport failed");
                }
            }
            TeleportTarget::Players(list) if list.contains(',') => {
                if !state.admins.is_admin_id(player) {
                    state.tell(player, "Teleporting other players requires admin");
                    return;
                }
                let Some((from, to)) = parse_player_pair(&list) else {
                    state.tell(player, "Format: player=<from>,<to>");
                    return;
                };

                let sources = state.resolve_players(player, &from);
                let targets = state.resolve_players(player, &to);
                if sources.is_empty() {
                    state.tell(player, &format!("Player not found: {}", from));
                    return;
                }
                let target = match targets.as_slice() {
                    [] => {
                        state.tell(player, &format!("Player not found: {}", to));
                        return;
                    }
                    [target] => *target,
                    _ => {
                        state.tell(player, "Destination must be a single player");
                        return;
                    }
                };

                let moved = sources
                    .into_iter()
                    .filter(|&source| state.teleport_to_player(source, target, args.facing))
                    .count();
                let target_name = state.display_name(target);
                state.tell(player, &format!("Teleported {} players to {}", moved, target_name));
            }
            TeleportTarget::Players(list) => {
                let target = match state.resolve_players(player, &list).as_slice() {
                    [] => {
                        state.tell(player, &format!("Player not found: {}", list));
                        return;
                    }
                    [target] => *target,
                    _ => {
                        state.tell(player, "Several players match, be more specific");
                        return;
                    }
                };
                if target == player {
                    state.tell(player, "Cannot teleport to yourself");
                    return;
                }

                if state.teleport_to_player(player, target, args.facing) {
                    let target_name = state.display_name(target);
                    state.tell(player, &format!("Teleported to {}", target_name));
                } else {
                    state.tell(player, "Teleport failed");
                }
            }
        }
    }

    fn send_requests(&mut self, player: SteamId, info: &CommandInfo, kind: RequestKind, now: Instant) {
        let state = &mut self.state;
        let list = info.arg(1);
        if list.is_empty() {
            let usage = match kind {
                RequestKind::TeleportHere => "Usage: /tphere <name>",
                RequestKind::TeleportTo => "Usage: /tpto <name>",
                RequestKind::Watch => "Usage: .plswm <name>",
            };
            state.tell(player, usage);
            return;
        }

        let targets = state.resolve_players(player, list);
        if targets.is_empty() {
            state.tell(player, &format!("Player not found: {}", list));
            return;
        }

        let requester_name = state.display_name(player);
        for target in targets {
            if target == player {
                state.tell(player, "Cannot send a request to yourself");
                continue;
            }

            let registry = match kind {
                RequestKind::Watch => &mut state.watches,
                _ => &mut state.teleports,
            };
            registry.send(player, target, kind, now);

            let ask = match kind {
                RequestKind::TeleportHere => format!("{} asks you to teleport to them", requester_name),
                RequestKind::TeleportTo => format!("{} wants to teleport to you", requester_name),
                RequestKind::Watch => format!("{} asks you to watch them", requester_name),
            };
            state.tell(target, &ask);
            state.tell(target, "Type .a to accept, the request expires in 5 minutes");

            let target_name = state.display_name(target);
            state.tell(player, &format!("Request sent to {}", target_name));
        }
    }

    /// Accept a teleport request, or a watch request when none is pending
    fn accept_request(&mut self, player: SteamId, now: Instant) {
        let state = &mut self.state;
        let live = state.host.human_players();
        let is_live = |id: SteamId| live.contains(&id);

        let host = state.host.as_mut();
        let mut result = state
            .teleports
            .accept(player, now, is_live, |req| perform_request(host, req));
        if matches!(result, Err(RequestError::NoPending)) {
            result = state
                .watches
                .accept(player, now, is_live, |req| perform_request(host, req));
        }

        match result {
            Ok(accepted) => {
                let request = accepted.request;
                let requester = request.requester;
                if !accepted.succeeded {
                    state.tell(player, "Request failed");
                    state.tell(requester, "Request failed");
                    return;
                }

                let target_name = state.display_name(request.target);
                let requester_name = state.display_name(requester);
                let (own, other) = match request.kind {
                    RequestKind::TeleportHere => (
                        format!("Teleported to {}", requester_name),
                        format!("{} teleported to you", target_name),
                    ),
                    RequestKind::TeleportTo => (
                        "Request accepted".to_string(),
                        format!("Teleported to {}", target_name),
                    ),
                    RequestKind::Watch => (
                        format!("Now watching {}", requester_name),
                        format!("{} is watching you", target_name),
                    ),
                };
                state.tell(player, &own);
                state.tell(requester, &other);
            }
            Err(RequestError::NoPending) => state.tell(player, "No pending request"),
            Err(RequestError::Expired) => state.tell(player, "Request expired"),
            Err(RequestError::Stale) => state.tell(player, "Request is no longer valid, the player left"),
        }
    }

    // Toggles

    fn toggle_god(&mut self, player: SteamId) {
        let enabled = self.state.settings.toggle(player, PracticeFlags::GOD_MODE);
        self.state.host.set_takes_damage(player, !enabled);
        self.state.tell(
            player,
            if enabled { "God mode enabled" } else { "God mode disabled" },
        );
    }

    fn toggle(&mut self, player: SteamId, flag: PracticeFlags, label: &str) {
        let enabled = self.state.settings.toggle(player, flag);
        let status = if enabled { "enabled" } else { "disabled" };
        self.state.tell(player, &format!("{} {}", label, status));
    }

    fn help(&mut self, player: SteamId) {
        self.state.tell_key(player, "commands.help", &[]);
        for line in HELP_LINES {
            self.state.tell(player, line);
        }
        if self.state.admins.is_admin_id(player) {
            for line in ADMIN_HELP_LINES {
                self.state.tell(player, line);
            }
        }
    }

    // Statistics

    fn playtime_command(&mut self, player: SteamId, now: Instant) {
        let session = self.state.playtime.session_seconds(player, now);
        self.state.tell_duration(
            player,
            "playtime.current.hours",
            "playtime.current.minutes",
            session,
        );

        let Some(store) = self.state.store.clone() else {
            self.state.tell_duration(
                player,
                "playtime.total.hours",
                "playtime.total.minutes",
                session,
            );
            return;
        };

        let unflushed = self.unflushed_seconds(player, now);
        store.player_data(player, move |state: &mut PracticeState, result| {
            if !state.playtime.is_connected(player) {
                return;
            }
            match result {
                Ok(Some(data)) => {
                    let total = u64::try_from(data.total_playtime_seconds).unwrap_or(0) + unflushed;
                    state.tell_duration(player, "playtime.total.hours", "playtime.total.minutes", total);
                }
                Ok(None) => state.tell_key(player, "player.nodata", &[]),
                Err(_) => state.tell(player, "Failed to load playtime"),
            }
        });
    }

    fn stats_command(&mut self, player: SteamId, now: Instant) {
        self.state.tell_key(player, "stats.title", &[]);
        let session = self.state.playtime.session_seconds(player, now);
        self.state.tell_duration(
            player,
            "stats.currentsession.hours",
            "stats.currentsession.minutes",
            session,
        );

        let Some(store) = self.state.store.clone() else {
            return;
        };

        let unflushed = self.unflushed_seconds(player, now);
        store.player_data(player, move |state: &mut PracticeState, result| {
            if !state.playtime.is_connected(player) {
                return;
            }
            match result {
                Ok(Some(data)) => {
                    let total = u64::try_from(data.total_playtime_seconds).unwrap_or(0) + unflushed;
                    state.tell_duration(
                        player,
                        "stats.totalplaytime.hours",
                        "stats.totalplaytime.minutes",
                        total,
                    );
                }
                Ok(None) => state.tell_key(player, "player.nodata", &[]),
                Err(_) => state.tell(player, "Failed to load stats"),
            }
        });
        store.session_count(player, move |state: &mut PracticeState, result| {
            if state.playtime.is_connected(player) {
                if let Ok(count) = result {
                    state.tell_key(player, "stats.totalsessions", &[&count]);
                }
            }
        });
        store.player_count(move |state: &mut PracticeState, result| {
            if state.playtime.is_connected(player) {
                if let Ok(count) = result {
                    state.tell_key(player, "stats.totalplayers", &[&count]);
                }
            }
        });
    }

    /// Session time not yet committed by a flush
    fn unflushed_seconds(&self, player: SteamId, now: Instant) -> u64 {
        self.state
            .playtime
            .last_flush_time(player)
            .map(|last| now.saturating_duration_since(last).as_secs())
            .unwrap_or(0)
    }

    fn language_command(&mut self, player: SteamId, info: &CommandInfo) {
        let code = info.arg(1).to_lowercase();
        let Ok(language) = code.parse::<Language>() else {
            self.state.tell(player, "Usage: .lang <en|zh>");
            return;
        };

        self.state.localizer.set_language(player, language);
        if let Some(store) = &self.state.store {
            store.update_language(player, language.code().to_string());
        }

        let message = match language {
            Language::En => "Language set to English",
            Language::Zh => "语言已设置为中文",
        };
        self.state.tell(player, message);
    }

    // Admin

    fn admin_command(&mut self, player: SteamId, info: &CommandInfo) {
        let state = &mut self.state;
        if !state.admins.is_admin_id(player) {
            state.tell(player, "You do not have permission to use this command");
            return;
        }

        let id = info.arg(2);
        match info.arg(1).to_lowercase().as_str() {
            "add" => {
                if state.admins.add(id) {
                    info!(%player, admin = id, "Admin added");
                    state.tell(player, &format!("Added admin {}", id));
                } else {
                    state.tell(player, "Invalid SteamID64 or already an admin");
                }
            }
            "remove" => {
                if state.admins.remove(id) {
                    info!(%player, admin = id, "Admin removed");
                    state.tell(player, &format!("Removed admin {}", id));
                } else {
                    state.tell(player, "Invalid SteamID64 or not an admin");
                }
            }
            "reload" => {
                state.admins.reload();
                let count = state.admins.len();
                state.tell(player, &format!("Admin list reloaded ({} admins)", count));
            }
            "list" => {
                let admins = state.admins.admins().collect::<Vec<_>>().join(", ");
                state.tell(player, &format!("Admins: {}", admins));
            }
            _ => state.tell(player, &format!("Usage: {}", ADMIN_HELP_LINES[0])),
        }
    }

    /// Tell non-admins off; true when `player` may run admin commands
    fn require_admin(&mut self, player: SteamId) -> bool {
        if self.state.admins.is_admin_id(player) {
            return true;
        }
        self.state.tell(player, "This command is for admins only");
        false
    }

    fn game_mode_command(&mut self, player: SteamId, info: &CommandInfo) {
        if !self.require_admin(player) {
            return;
        }
        let state = &mut self.state;

        if info.arg(2).is_empty() {
            state.tell(player, "Usage: .gm <players> <mode>");
            state.tell(player, "Modes: normal (n/0), spectator (spec/s/1)");
            return;
        }
        let mode = match info.arg(2).parse::<GameMode>() {
            Ok(mode) => mode,
            Err(e) => {
                state.tell(player, &e.to_string());
                state.tell(player, "Modes: normal (n/0), spectator (spec/s/1)");
                return;
            }
        };
        if mode == GameMode::Normal {
            state.tell(player, "Switching back to normal mode is disabled");
            return;
        }

        let list = info.arg(1);
        let targets = state.resolve_players(player, list);
        if targets.is_empty() {
            state.tell(player, &format!("Player not found: {}", list));
            return;
        }

        let mut changed = 0;
        for target in targets {
            if state.host.change_team(target, Team::Spectator) {
                state.tell(target, &format!("Your game mode is now {}", mode));
                changed += 1;
            }
        }
        info!(%player, changed, %mode, "Game mode changed");
        state.tell(player, &format!("Set {} players to {}", changed, mode));
    }

    /// Move every other human player to the caller
    fn teleport_all_here(&mut self, player: SteamId) {
        if !self.require_admin(player) {
            return;
        }
        let state = &mut self.state;

        let moved = state
            .host
            .human_players()
            .into_iter()
            .filter(|&other| other != player)
            .filter(|&other| state.teleport_to_player(other, player, false))
            .count();
        state.tell(player, &format!("Teleported {} players to you", moved));
    }

    fn spectate_all(&mut self, player: SteamId) {
        if !self.require_admin(player) {
            return;
        }
        let state = &mut self.state;

        let others: Vec<SteamId> = state
            .host
            .human_players()
            .into_iter()
            .filter(|&other| other != player)
            .collect();
        let moved = others
            .into_iter()
            .filter(|&other| state.host.change_team(other, Team::Spectator))
            .count();
        state.tell(player, &format!("Moved {} players to spectator", moved));
    }

    /// Make players spectate the caller without asking
    fn watch_me(&mut self, player: SteamId, info: &CommandInfo) {
        if !self.require_admin(player) {
            return;
        }
        let state = &mut self.state;

        let list = info.arg(1);
        if list.is_empty() {
            state.tell(player, "Usage: /watchme <players>");
            return;
        }
        let targets = state.resolve_players(player, list);
        if targets.is_empty() {
            state.tell(player, &format!("Player not found: {}", list));
            return;
        }

        let name = state.display_name(player);
        let mut watching = 0;
        for target in targets {
            if target == player {
                state.tell(player, "Cannot make yourself watch yourself");
                continue;
            }
            if state.host.spectate(target, player) {
                state.tell(target, &format!("An admin asked you to watch {}", name));
                watching += 1;
            }
        }
        state.tell(player, &format!("{} players are now watching you", watching));
    }

    // World

    fn spawn_command(&mut self, player: SteamId, info: &CommandInfo) {
        if info.rest().is_empty() {
            self.state
                .tell(player, "Usage: .sp index=<n> [side=ct|t] | type=best|worst | random");
            return;
        }
        let selection = match parse_spawn_args(info.rest()) {
            Ok(selection) => selection,
            Err(e) => {
                self.state.tell(player, &e.to_string());
                return;
            }
        };

        let state = &mut self.state;
        let own_team = state.host.player_team(player);
        let (team, point, description) = match selection {
            SpawnSelection::Index { index, side } => {
                let team = side.unwrap_or(own_team);
                (team, state.spawns.by_index(team, index), format!("spawn #{}", index))
            }
            SpawnSelection::Type(spawn_type) => (
                own_team,
                state.spawns.by_type(own_team, spawn_type),
                format!("{} spawn", spawn_type),
            ),
            SpawnSelection::Random => (
                own_team,
                state.spawns.random(own_team, &mut rand::thread_rng()),
                "random spawn".to_string(),
            ),
        };
        let point = point.cloned();
        let team_name = team
            .side()
            .map(str::to_uppercase)
            .unwrap_or_else(|| team.to_string());

        let Some(point) = point else {
            state.tell(player, &format!("No {} for {}", description, team_name));
            return;
        };
        if state
            .host
            .teleport(player, point.teleport_position(), Some(point.angles))
        {
            state.tell(player, &format!("Teleported to {} ({})", description, team_name));
        } else {
            state.tell(player, "Teleport failed");
        }
    }

    fn clear_effects(&mut self, player: SteamId, target: ClearTarget) {
        let cleared = self.state.host.remove_entities(target.designer_name());
        debug!(%player, cleared, %target, "Cleared grenade effects");
        self.state.tell(player, &format!("Cleared {} {}", cleared, target));
    }

    fn break_props(&mut self, player: SteamId) {
        let host = &mut self.state.host;
        let broken: usize = BREAKABLE_CLASSES
            .iter()
            .map(|class| host.break_entities(class))
            .sum();
        debug!(%player, broken, "Broke map props");
        self.state.tell(player, &format!("Broke {} breakables", broken));
    }
}
