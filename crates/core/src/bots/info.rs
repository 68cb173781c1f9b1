//! Spawn parameters of a managed bot

use std::time::SystemTime;

use cs2prac_sdk::{QAngle, Team, Vector};

/// Weapon handed to a bot when the spawner's weapon is unknown
pub const DEFAULT_BOT_WEAPON: &str = "weapon_ak47";

/// Where and how a managed bot stands
#[derive(Debug, Clone, PartialEq)]
pub struct BotSpawnInfo {
    pub position: Vector,
    pub rotation: QAngle,
    pub crouched: bool,
    /// Weapon the bot is given after every (re)spawn
    pub weapon: String,
    pub team: Team,
    /// Name requested by the spawner, if any
    pub custom_name: Option<String>,
    pub spawned_at: SystemTime,
}

impl BotSpawnInfo {
    pub fn new(position: Vector, rotation: QAngle, team: Team) -> Self {
        Self {
            position,
            rotation,
            crouched: false,
            weapon: DEFAULT_BOT_WEAPON.to_string(),
            team,
            custom_name: None,
            spawned_at: SystemTime::now(),
        }
    }

    pub fn crouched(mut self, crouched: bool) -> Self {
        self.crouched = crouched;
        self
    }

    pub fn weapon(mut self, weapon: impl Into<String>) -> Self {
        self.weapon = weapon.into();
        self
    }

    pub fn custom_name(mut self, name: Option<String>) -> Self {
        self.custom_name = name;
        self
    }

    /// Position the bot is placed at, lowered when crouching
    pub fn stand_position(&self) -> Vector {
        if self.crouched {
            self.position.offset(0.0, 0.0, -CROUCH_DROP)
        } else {
            self.position
        }
    }
}

/// Height a crouching bot is lowered by
pub const CROUCH_DROP: f32 = 18.0;
