//! Per-player practice toggles
//!
//! Chat commands like `.god` or `.impact` flip a flag for the caller. The
//! host reads the flags when applying damage, drawing impacts or handling
//! flashes.

use std::collections::HashMap;

use bitflags::bitflags;
use cs2prac_sdk::SteamId;

bitflags! {
    /// Practice toggles for one player
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PracticeFlags: u32 {
        /// Player takes no damage
        const GOD_MODE = 1 << 0;
        /// Bullet impacts are drawn for the player
        const SHOW_IMPACT = 1 << 1;
        /// Flashbangs do not blind the player
        const BLIND_IMMUNE = 1 << 2;
    }
}

/// Toggle state for every connected player
#[derive(Debug, Default)]
pub struct PlayerSettings {
    flags: HashMap<SteamId, PracticeFlags>,
}

impl PlayerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a flag and return whether it is now set
    pub fn toggle(&mut self, player: SteamId, flag: PracticeFlags) -> bool {
        let flags = self.flags.entry(player).or_default();
        flags.toggle(flag);
        let enabled = flags.contains(flag);
        tracing::debug!(%player, ?flag, enabled, "Toggled practice flag");
        enabled
    }

    pub fn has(&self, player: SteamId, flag: PracticeFlags) -> bool {
        self.flags(player).contains(flag)
    }

    pub fn flags(&self, player: SteamId) -> PracticeFlags {
        self.flags.get(&player).copied().unwrap_or_default()
    }

    pub fn remove_player(&mut self, player: SteamId) {
        self.flags.remove(&player);
    }
}
