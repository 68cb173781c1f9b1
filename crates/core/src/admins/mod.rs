//! Admin list persisted as a plain text file
//!
//! One SteamID64 per line. Blank lines and lines starting with `//` or `#`
//! are ignored, as are lines that are not exactly 17 digits. The file is
//! rewritten whole on every change.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use cs2prac_sdk::SteamId;

/// Placeholder admin written to a fresh file
pub const DEFAULT_ADMIN: &str = "76561198000000000";

const HEADER: &[&str] = &[
    "// cs2prac admin list",
    "// One SteamID64 (17 digits) per line",
    "// Lines starting with // or # are comments",
    "//",
    "// Find your SteamID64 at https://steamid.io/",
    "//",
    "// Admins:",
];

/// Admin file errors
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("failed to access admin file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The admin set and the file backing it
pub struct AdminStore {
    path: PathBuf,
    admins: BTreeSet<String>,
}

impl AdminStore {
    /// Open the admin file, creating a default one if it is missing
    ///
    /// Never fails: if the file cannot be read, the store falls back to the
    /// default placeholder admin in memory.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            admins: BTreeSet::new(),
        };
        store.reload();
        store
    }

    /// Read the admin file into a fresh set
    ///
    /// A missing file is created with the default template first.
    pub fn load(&self) -> Result<BTreeSet<String>, AdminError> {
        if !self.path.exists() {
            self.write_default()?;
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        Ok(parse_admins(&content))
    }

    /// Discard the in-memory set and re-read the file
    pub fn reload(&mut self) {
        match self.load() {
            Ok(admins) => {
                tracing::info!(path = ?self.path, count = admins.len(), "Loaded admin list");
                self.admins = admins;
            }
            Err(e) => {
                tracing::error!("Failed to load admin list, using default admin: {}", e);
                self.admins = BTreeSet::from([DEFAULT_ADMIN.to_string()]);
            }
        }
    }

    /// Write the header and every admin to the file
    pub fn save(&self) -> Result<(), AdminError> {
        let mut lines: Vec<&str> = HEADER.to_vec();
        lines.extend(self.admins.iter().map(String::as_str));
        let mut content = lines.join("\n");
        content.push('\n');
        self.write(&content)
    }

    /// Add an admin and persist
    ///
    /// Returns false for malformed ids or ids already present.
    pub fn add(&mut self, id: &str) -> bool {
        let id = id.trim();
        if !SteamId::is_valid_str(id) || !self.admins.insert(id.to_string()) {
            return false;
        }
        self.persist("add", id);
        true
    }

    /// Remove an admin and persist
    ///
    /// Returns false for malformed ids or ids not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let id = id.trim();
        if !SteamId::is_valid_str(id) || !self.admins.remove(id) {
            return false;
        }
        self.persist("remove", id);
        true
    }

    pub fn is_admin(&self, id: &str) -> bool {
        self.admins.contains(id)
    }

    /// Check a player by identity
    pub fn is_admin_id(&self, id: SteamId) -> bool {
        self.admins.contains(&id.to_string())
    }

    /// Admin ids in ascending order
    pub fn admins(&self) -> impl Iterator<Item = &str> {
        self.admins.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, operation: &str, id: &str) {
        match self.save() {
            Ok(()) => tracing::info!(operation, id, "Admin list updated"),
            Err(e) => tracing::error!(operation, id, "Failed to save admin list: {}", e),
        }
    }

    fn write_default(&self) -> Result<(), AdminError> {
        let mut lines: Vec<&str> = HEADER.to_vec();
        lines.push(DEFAULT_ADMIN);
        let mut content = lines.join("\n");
        content.push('\n');
        self.write(&content)?;
        tracing::info!(path = ?self.path, "Created default admin list");
        Ok(())
    }

    fn write(&self, content: &str) -> Result<(), AdminError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        std::fs::write(&self.path, content).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> AdminError {
        AdminError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn parse_admins(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//") && !line.starts_with('#'))
        .filter(|line| {
            let valid = SteamId::is_valid_str(line);
            if !valid {
                tracing::warn!(line, "Skipping malformed admin entry");
            }
            valid
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "76561198000000001";

    #[test]
    fn test_missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("admins.cfg");

        let store = AdminStore::open(&path);
        assert!(path.exists());
        assert_eq!(store.len(), 1);
        assert!(store.is_admin(DEFAULT_ADMIN));
    }

    #[test]
    fn test_add_save_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admins.cfg");

        let mut store = AdminStore::open(&path);
        assert!(store.add(ID));
        store.save().unwrap();

        let reopened = AdminStore::open(&path);
        assert!(reopened.is_admin(ID));

        assert!(store.remove(ID));
        store.reload();
        assert!(!store.is_admin(ID));
        assert!(!AdminStore::open(&path).is_admin(ID));
    }

    #[test]
    fn test_add_remove_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = AdminStore::open(dir.path().join("admins.cfg"));

        assert!(!store.add("12345"));
        assert!(!store.add("7656119800000000x"));
        assert!(store.add(ID));
        assert!(!store.add(ID));

        assert!(!store.remove("76561198999999999"));
        assert!(store.remove(ID));
        assert!(!store.remove(ID));
    }

    #[test]
    fn test_parse_skips_comments_and_malformed() {
        let content = "\
// comment
# another comment

76561198000000001
  76561198000000002  
not-an-id
7656119800000000
";
        let admins = parse_admins(content);
        assert_eq!(admins.len(), 2);
        assert!(admins.contains("76561198000000001"));
        assert!(admins.contains("76561198000000002"));
    }

    #[test]
    fn test_reload_discards_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admins.cfg");
        let mut store = AdminStore::open(&path);

        std::fs::write(&path, "76561198000000005\n").unwrap();
        store.reload();

        assert_eq!(store.admins().collect::<Vec<_>>(), vec!["76561198000000005"]);
        assert!(store.is_admin_id(SteamId::new(76561198000000005)));
    }

    #[test]
    fn test_unreadable_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as text
        let path = dir.path().join("admins.cfg");
        std::fs::create_dir(&path).unwrap();

        let store = AdminStore::open(&path);
        assert_eq!(store.admins().collect::<Vec<_>>(), vec![DEFAULT_ADMIN]);
    }
}
