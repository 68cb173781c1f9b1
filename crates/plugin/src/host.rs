//! The game host seam
//!
//! Everything that touches the game world goes through [`GameHost`]. The
//! engine binding implements it; tests use a recording mock.

use cs2prac_core::grenades::ThrowRecord;
use cs2prac_sdk::{EntityHandle, QAngle, SteamId, Team, Vector};

/// Where a player stands and looks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vector,
    pub angles: QAngle,
}

/// A live bot as seen by the host
#[derive(Debug, Clone, PartialEq)]
pub struct LiveBot {
    pub handle: EntityHandle,
    pub name: String,
    pub team: Team,
}

/// Engine operations the plugin needs
///
/// Called only from the main thread.
pub trait GameHost: Send {
    // Players

    /// Whether a human player is connected and valid
    fn is_connected(&self, player: SteamId) -> bool;

    fn player_name(&self, player: SteamId) -> Option<String>;

    /// Pose of the player's pawn, `None` when dead or not spawned
    fn player_pose(&self, player: SteamId) -> Option<Pose>;

    /// Designer name of the active weapon
    fn active_weapon(&self, player: SteamId) -> Option<String>;

    fn player_team(&self, player: SteamId) -> Team;

    /// Connected human players
    fn human_players(&self) -> Vec<SteamId>;

    /// Human player under the crosshair of `player`
    fn player_in_sight(&self, player: SteamId) -> Option<SteamId>;

    /// A random connected human player
    fn random_player(&self) -> Option<SteamId>;

    // Output

    fn print_to_chat(&mut self, player: SteamId, message: &str);

    fn print_to_center(&mut self, player: SteamId, message: &str);

    /// Run a server console command
    fn execute_command(&mut self, command: &str);

    // World

    /// Move a player, optionally setting the view angles
    fn teleport(&mut self, player: SteamId, position: Vector, angles: Option<QAngle>) -> bool;

    /// Switch `observer` to spectator and watch `target`
    fn spectate(&mut self, observer: SteamId, target: SteamId) -> bool;

    fn change_team(&mut self, player: SteamId, team: Team) -> bool;

    /// Spawn entities of a team in map order
    fn spawn_points(&self, team: Team) -> Vec<Pose>;

    /// Remove every entity with the designer name; returns how many
    fn remove_entities(&mut self, designer_name: &str) -> usize;

    /// Break every entity with the designer name; returns how many
    fn break_entities(&mut self, designer_name: &str) -> usize;

    /// Throw a grenade again from a recorded throw
    fn throw_grenade(&mut self, player: SteamId, record: &ThrowRecord) -> bool;

    fn set_takes_damage(&mut self, player: SteamId, takes_damage: bool) -> bool;

    /// Cancel the flash effect on a player
    fn clear_flash(&mut self, player: SteamId);

    // Bots

    fn live_bots(&self) -> Vec<LiveBot>;

    /// Whether a bot handle still points at a live bot
    fn is_bot_valid(&self, handle: EntityHandle) -> bool;

    fn find_bot(&self, name: &str) -> Option<EntityHandle>;

    fn respawn_bot(&mut self, handle: EntityHandle) -> bool;

    /// Teleport a bot and set its stance
    fn place_bot(
        &mut self,
        handle: EntityHandle,
        position: Vector,
        rotation: QAngle,
        crouched: bool,
    ) -> bool;

    fn rename_bot(&mut self, handle: EntityHandle, name: &str) -> bool;
}
