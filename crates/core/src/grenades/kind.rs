//! Grenade kinds and name tables

use std::fmt;

/// The five throwable grenade kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GrenadeKind {
    Smoke = 1,
    Flashbang = 2,
    /// Molotov or incendiary grenade
    Incendiary = 3,
    HeGrenade = 4,
    Decoy = 5,
}

/// All kinds in type-code order
pub const ALL_KINDS: [GrenadeKind; 5] = [
    GrenadeKind::Smoke,
    GrenadeKind::Flashbang,
    GrenadeKind::Incendiary,
    GrenadeKind::HeGrenade,
    GrenadeKind::Decoy,
];

impl GrenadeKind {
    /// Classify a weapon or short name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_lowercase().as_str() {
            "weapon_smokegrenade" | "smokegrenade" | "smoke" => Self::Smoke,
            "weapon_flashbang" | "flashbang" | "flash" => Self::Flashbang,
            "weapon_incgrenade" | "weapon_molotov" | "incgrenade" | "molotov" | "incendiary" => {
                Self::Incendiary
            }
            "weapon_hegrenade" | "hegrenade" | "he" => Self::HeGrenade,
            "weapon_decoy" | "decoy" => Self::Decoy,
            _ => return None,
        };
        Some(kind)
    }

    /// Map the numeric type code used by `.rethrow type=N`
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Smoke),
            2 => Some(Self::Flashbang),
            3 => Some(Self::Incendiary),
            4 => Some(Self::HeGrenade),
            5 => Some(Self::Decoy),
            _ => None,
        }
    }

    /// Numeric type code
    pub const fn code(&self) -> i32 {
        *self as i32
    }

    /// Canonical weapon name
    pub const fn weapon_name(&self) -> &'static str {
        match self {
            Self::Smoke => "weapon_smokegrenade",
            Self::Flashbang => "weapon_flashbang",
            Self::Incendiary => "weapon_incgrenade",
            Self::HeGrenade => "weapon_hegrenade",
            Self::Decoy => "weapon_decoy",
        }
    }

    /// Projectile entity the host creates when replaying a throw
    pub const fn projectile_name(&self) -> &'static str {
        match self {
            Self::Smoke => "smokegrenade_projectile",
            Self::Flashbang => "flashbang_projectile",
            Self::Incendiary => "molotov_projectile",
            Self::HeGrenade => "hegrenade_projectile",
            Self::Decoy => "decoy_projectile",
        }
    }

    /// English display name
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Smoke => "Smoke",
            Self::Flashbang => "Flashbang",
            Self::Incendiary => "Incendiary",
            Self::HeGrenade => "HE Grenade",
            Self::Decoy => "Decoy",
        }
    }

    /// Chinese display name
    pub const fn display_name_zh(&self) -> &'static str {
        match self {
            Self::Smoke => "烟雾弹",
            Self::Flashbang => "闪光弹",
            Self::Incendiary => "火焰弹",
            Self::HeGrenade => "手雷",
            Self::Decoy => "诱饵弹",
        }
    }
}

impl fmt::Display for GrenadeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Map a spawned projectile's designer name to the weapon that threw it
pub fn projectile_weapon_name(designer_name: &str) -> Option<&'static str> {
    match designer_name {
        "smokegrenade_projectile" => Some("weapon_smokegrenade"),
        "flashbang_projectile" => Some("weapon_flashbang"),
        "hegrenade_projectile" => Some("weapon_hegrenade"),
        "decoy_projectile" => Some("weapon_decoy"),
        "molotov_projectile" => Some("weapon_molotov"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(GrenadeKind::from_name("molotov"), Some(GrenadeKind::Incendiary));
        assert_eq!(GrenadeKind::from_name("WEAPON_INCGRENADE"), Some(GrenadeKind::Incendiary));
        assert_eq!(GrenadeKind::from_name("he"), Some(GrenadeKind::HeGrenade));
        assert_eq!(GrenadeKind::from_name("Flash"), Some(GrenadeKind::Flashbang));
        assert_eq!(GrenadeKind::from_name("weapon_ak47"), None);
        assert_eq!(GrenadeKind::from_name(""), None);
    }

    #[test]
    fn test_codes_round_trip() {
        for kind in ALL_KINDS {
            assert_eq!(GrenadeKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(GrenadeKind::from_code(0), None);
        assert_eq!(GrenadeKind::from_code(6), None);
    }

    #[test]
    fn test_projectile_names_classify() {
        for kind in ALL_KINDS {
            let weapon = projectile_weapon_name(kind.projectile_name()).unwrap();
            assert_eq!(GrenadeKind::from_name(weapon), Some(kind));
        }
        assert_eq!(projectile_weapon_name("prop_physics"), None);
    }
}
