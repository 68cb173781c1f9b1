//! Recording game host for tests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use cs2prac_core::grenades::ThrowRecord;
use cs2prac_sdk::{EntityHandle, QAngle, SteamId, Team, Vector};

use crate::host::{GameHost, LiveBot, Pose};

#[derive(Debug, Clone, Default)]
pub struct MockPlayer {
    pub name: String,
    pub pose: Option<Pose>,
    pub weapon: Option<String>,
    pub team: Team,
}

/// World state shared between the test and the host
#[derive(Debug, Default)]
pub struct World {
    pub players: HashMap<SteamId, MockPlayer>,
    pub in_sight: HashMap<SteamId, SteamId>,
    pub bots: Vec<LiveBot>,
    pub valid_handles: HashSet<EntityHandle>,
    pub spawn_points: HashMap<Team, Vec<Pose>>,
    /// Entity counts by designer name
    pub entities: HashMap<String, usize>,

    pub chat: Vec<(SteamId, String)>,
    pub center: Vec<(SteamId, String)>,
    pub commands: Vec<String>,
    pub teleports: Vec<(SteamId, Vector)>,
    pub spectates: Vec<(SteamId, SteamId)>,
    pub throws: Vec<(SteamId, usize)>,
    pub takes_damage: HashMap<SteamId, bool>,
    pub flash_cleared: Vec<SteamId>,
    pub respawned: Vec<EntityHandle>,
    pub placed: Vec<(EntityHandle, Vector, bool)>,
    pub team_changes: Vec<(SteamId, Team)>,
    pub broken: Vec<String>,
}

impl World {
    pub fn add_player(&mut self, id: SteamId, name: &str, position: Vector) {
        self.players.insert(
            id,
            MockPlayer {
                name: name.to_string(),
                pose: Some(Pose {
                    position,
                    angles: QAngle::default(),
                }),
                weapon: Some("weapon_m4a1".to_string()),
                team: Team::CounterTerrorist,
            },
        );
    }

    pub fn add_bot(&mut self, handle: EntityHandle, name: &str, team: Team) {
        self.bots.push(LiveBot {
            handle,
            name: name.to_string(),
            team,
        });
        self.valid_handles.insert(handle);
    }

    /// Chat lines sent to one player, prefix stripped
    pub fn chat_for(&self, id: SteamId) -> Vec<String> {
        self.chat
            .iter()
            .filter(|(to, _)| *to == id)
            .map(|(_, line)| {
                line.strip_prefix(crate::CHAT_PREFIX)
                    .unwrap_or(line)
                    .trim_start()
                    .to_string()
            })
            .collect()
    }

    pub fn last_chat(&self, id: SteamId) -> Option<String> {
        self.chat_for(id).pop()
    }
}

#[derive(Clone, Default)]
pub struct MockHost {
    pub world: Arc<Mutex<World>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameHost for MockHost {
    fn is_connected(&self, player: SteamId) -> bool {
        self.world.lock().players.contains_key(&player)
    }

    fn player_name(&self, player: SteamId) -> Option<String> {
        self.world.lock().players.get(&player).map(|p| p.name.clone())
    }

    fn player_pose(&self, player: SteamId) -> Option<Pose> {
        self.world.lock().players.get(&player).and_then(|p| p.pose)
    }

    fn active_weapon(&self, player: SteamId) -> Option<String> {
        self.world
            .lock()
            .players
            .get(&player)
            .and_then(|p| p.weapon.clone())
    }

    fn player_team(&self, player: SteamId) -> Team {
        self.world
            .lock()
            .players
            .get(&player)
            .map(|p| p.team)
            .unwrap_or_default()
    }

    fn human_players(&self) -> Vec<SteamId> {
        let mut ids: Vec<SteamId> = self.world.lock().players.keys().copied().collect();
        ids.sort();
        ids
    }

    fn player_in_sight(&self, player: SteamId) -> Option<SteamId> {
        self.world.lock().in_sight.get(&player).copied()
    }

    fn random_player(&self) -> Option<SteamId> {
        self.human_players().first().copied()
    }

    fn print_to_chat(&mut self, player: SteamId, message: &str) {
        self.world.lock().chat.push((player, message.to_string()));
    }

    fn print_to_center(&mut self, player: SteamId, message: &str) {
        self.world.lock().center.push((player, message.to_string()));
    }

    fn execute_command(&mut self, command: &str) {
        self.world.lock().commands.push(command.to_string());
    }

    fn teleport(&mut self, player: SteamId, position: Vector, angles: Option<QAngle>) -> bool {
        let mut world = self.world.lock();
        let Some(state) = world.players.get_mut(&player) else {
            return false;
        };
        let angles = angles.unwrap_or_default();
        state.pose = Some(Pose { position, angles });
        world.teleports.push((player, position));
        true
    }

    fn spectate(&mut self, observer: SteamId, target: SteamId) -> bool {
        self.world.lock().spectates.push((observer, target));
        true
    }

    fn change_team(&mut self, player: SteamId, team: Team) -> bool {
        let mut world = self.world.lock();
        let Some(state) = world.players.get_mut(&player) else {
            return false;
        };
        state.team = team;
        world.team_changes.push((player, team));
        true
    }

    fn spawn_points(&self, team: Team) -> Vec<Pose> {
        self.world
            .lock()
            .spawn_points
            .get(&team)
            .cloned()
            .unwrap_or_default()
    }

    fn remove_entities(&mut self, designer_name: &str) -> usize {
        self.world
            .lock()
            .entities
            .remove(designer_name)
            .unwrap_or(0)
    }

    fn break_entities(&mut self, designer_name: &str) -> usize {
        let mut world = self.world.lock();
        let count = world.entities.remove(designer_name).unwrap_or(0);
        if count > 0 {
            world.broken.push(designer_name.to_string());
        }
        count
    }

    fn throw_grenade(&mut self, player: SteamId, record: &ThrowRecord) -> bool {
        self.world.lock().throws.push((player, record.index));
        true
    }

    fn set_takes_damage(&mut self, player: SteamId, takes_damage: bool) -> bool {
        self.world.lock().takes_damage.insert(player, takes_damage);
        true
    }

    fn clear_flash(&mut self, player: SteamId) {
        self.world.lock().flash_cleared.push(player);
    }

    fn live_bots(&self) -> Vec<LiveBot> {
        self.world.lock().bots.clone()
    }

    fn is_bot_valid(&self, handle: EntityHandle) -> bool {
        self.world.lock().valid_handles.contains(&handle)
    }

    fn find_bot(&self, name: &str) -> Option<EntityHandle> {
        let world = self.world.lock();
        world
            .bots
            .iter()
            .find(|bot| bot.name == name && world.valid_handles.contains(&bot.handle))
            .map(|bot| bot.handle)
    }

    fn respawn_bot(&mut self, handle: EntityHandle) -> bool {
        let mut world = self.world.lock();
        if !world.valid_handles.contains(&handle) {
            return false;
        }
        world.respawned.push(handle);
        true
    }

    fn place_bot(
        &mut self,
        handle: EntityHandle,
        position: Vector,
        _rotation: QAngle,
        crouched: bool,
    ) -> bool {
        self.world.lock().placed.push((handle, position, crouched));
        true
    }

    fn rename_bot(&mut self, handle: EntityHandle, name: &str) -> bool {
        let mut world = self.world.lock();
        match world.bots.iter_mut().find(|bot| bot.handle == handle) {
            Some(bot) => {
                bot.name = name.to_string();
                true
            }
            None => false,
        }
    }
}

pub const ALICE: SteamId = SteamId::new(76561198000000001);
pub const BOB: SteamId = SteamId::new(76561198000000002);
/// Admin listed in the default admin file
pub const ADMIN: SteamId = SteamId::new(76561198000000000);

/// A loaded plugin on a temp directory with Alice and Bob online
pub struct Harness {
    pub plugin: crate::PracticePlugin,
    pub host: MockHost,
    pub start: std::time::Instant,
    _dir: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let host = MockHost::new();
        {
            let mut world = host.world.lock();
            world.add_player(ALICE, "Alice", Vector::new(100.0, 200.0, 64.0));
            world.add_player(BOB, "Bob", Vector::new(-50.0, 0.0, 16.0));
        }

        let start = std::time::Instant::now();
        let plugin = crate::PracticePlugin::load(
            cs2prac_core::config::PracticeConfig::default(),
            Box::new(host.clone()),
            dir.path(),
            start,
        );

        Self {
            plugin,
            host,
            start,
            _dir: dir,
        }
    }

    pub fn at(&self, secs: f64) -> std::time::Instant {
        self.start + std::time::Duration::from_secs_f64(secs)
    }

    pub fn chat(&mut self, player: SteamId, message: &str, secs: f64) -> cs2prac_core::CommandResult {
        let now = self.at(secs);
        self.plugin.on_chat(player, message, now)
    }

    pub fn last_chat(&self, player: SteamId) -> String {
        self.host.world.lock().last_chat(player).unwrap_or_default()
    }

    /// Run frames until `done` holds or a few seconds pass
    pub fn pump_until(&mut self, secs: f64, mut done: impl FnMut(&World) -> bool) {
        let now = self.at(secs);
        for _ in 0..500 {
            self.plugin.on_game_frame(now);
            if done(&self.host.world.lock()) {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("condition never held");
    }
}
