//! World entities the practice commands remove or break

use std::fmt;

/// Designer names of map props `.break` destroys
pub const BREAKABLE_CLASSES: &[&str] = &[
    "func_breakable",
    "func_breakable_surf",
    "prop_dynamic",
    "prop_physics",
    "prop_physics_multiplayer",
    "func_physbox",
    "item_crate",
];

/// Grenade effects that can be cleared from the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    /// Smoke clouds, `.qy`
    Smokes,
    /// Molotov and incendiary fires, `.qh`
    Fires,
}

impl ClearTarget {
    /// Designer name of the entities to remove
    pub const fn designer_name(&self) -> &'static str {
        match self {
            Self::Smokes => "smokegrenade_projectile",
            Self::Fires => "inferno",
        }
    }
}

impl fmt::Display for ClearTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Smokes => "smokes",
            Self::Fires => "fires",
        })
    }
}
