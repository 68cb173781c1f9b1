//! Per-player message localization
//!
//! Players choose between English and Chinese. English messages come from a
//! [`Catalog`] supplied by the host; Chinese messages come from the built-in
//! table. An unknown key resolves to the key itself.

mod catalog;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use cs2prac_sdk::SteamId;

pub use catalog::{format_template, Catalog, StaticCatalog};

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    /// Language code as stored in the database
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for language codes other than `en` and `zh`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Whether `code` names a supported language
pub fn is_valid_language(code: &str) -> bool {
    code.parse::<Language>().is_ok()
}

/// Resolves message keys in each player's language
pub struct Localizer {
    languages: HashMap<SteamId, Language>,
    english: Box<dyn Catalog>,
    chinese: StaticCatalog,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Box::new(StaticCatalog::english()))
    }
}

impl Localizer {
    /// Create a localizer with the host's English catalog
    pub fn new(english: Box<dyn Catalog>) -> Self {
        Self {
            languages: HashMap::new(),
            english,
            chinese: StaticCatalog::chinese(),
        }
    }

    /// Render `key` for `player`
    ///
    /// Never fails. Unknown keys come back unchanged.
    pub fn resolve(&self, player: SteamId, key: &str, args: &[&dyn fmt::Display]) -> String {
        let catalog: &dyn Catalog = match self.language(player) {
            Language::En => self.english.as_ref(),
            Language::Zh => &self.chinese,
        };

        match catalog.template(key) {
            Some(template) => format_template(template, args),
            None => key.to_string(),
        }
    }

    pub fn set_language(&mut self, player: SteamId, language: Language) {
        self.languages.insert(player, language);
    }

    /// Selected language, English when unset
    pub fn language(&self, player: SteamId) -> Language {
        self.languages.get(&player).copied().unwrap_or_default()
    }

    /// Whether a language was loaded or chosen for the player
    pub fn has_language(&self, player: SteamId) -> bool {
        self.languages.contains_key(&player)
    }

    pub fn remove_player(&mut self, player: SteamId) {
        self.languages.remove(&player);
    }
}
