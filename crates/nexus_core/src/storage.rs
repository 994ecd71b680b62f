//! Persistence adapter.
//!
//! A key-value contract ([`KeyValueStore`]) with two implementations, and a
//! typed [`Storage`] wrapper used by the application. `Storage` is
//! best-effort: every failure is logged and swallowed, saves report `false`
//! and loads fall back to defaults.
//!
//! File layout for [`FileStore`]:
//! ```text
//! .nexus/store/
//! ├── nexus_projects     # JSON array of projects
//! ├── nexus_settings     # JSON settings object
//! └── nexus_theme        # "dark" | "light"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{CoreError, CoreResult};
use crate::models::Project;

/// Storage keys used by the application.
pub struct StorageKeys;

impl StorageKeys {
    pub const PROJECTS: &'static str = "nexus_projects";
    pub const SETTINGS: &'static str = "nexus_settings";
    pub const THEME: &'static str = "nexus_theme";

    pub const ALL: [&'static str; 3] = [Self::PROJECTS, Self::SETTINGS, Self::THEME];
}

/// Synchronous key-value store.
pub trait KeyValueStore: Send + Sync {
    fn save(&self, key: &str, value: &str) -> CoreResult<()>;
    fn load(&self, key: &str) -> CoreResult<Option<String>>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// One file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Store rooted at `<workspace>/.nexus/store`.
    pub fn for_workspace(workspace_root: impl AsRef<Path>) -> Self {
        Self::new(workspace_root.as_ref().join(".nexus").join("store"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> CoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn save(&self, key: &str, value: &str) -> CoreResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;
        // Keys never contain '.', so the scratch file cannot shadow another key.
        let scratch = self.root.join(format!(".{}.tmp", key));
        fs::write(&scratch, value)?;
        if let Err(e) = fs::rename(&scratch, &path) {
            let _ = fs::remove_file(&scratch);
            return Err(e.into());
        }
        Ok(())
    }

    fn load(&self, key: &str) -> CoreResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Process-local store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub dark_mode: bool,
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            notifications: true,
        }
    }
}

/// Typed, best-effort access to stored application data.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// File-backed storage for a workspace.
    pub fn for_workspace(workspace_root: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(FileStore::for_workspace(workspace_root)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn save_projects(&self, projects: &[Project]) -> bool {
        self.save_json(StorageKeys::PROJECTS, projects, "projects")
    }

    /// Load stored projects, or an empty list.
    pub fn load_projects(&self) -> Vec<Project> {
        self.load_json(StorageKeys::PROJECTS, "projects")
            .unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) -> bool {
        self.save_json(StorageKeys::SETTINGS, settings, "settings")
    }

    pub fn load_settings(&self) -> Settings {
        self.load_json(StorageKeys::SETTINGS, "settings")
            .unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) -> bool {
        match self.store.save(StorageKeys::THEME, theme.as_str()) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving theme: {}", e);
                false
            }
        }
    }

    /// Stored theme; dark when nothing was stored.
    pub fn load_theme(&self) -> Theme {
        match self.store.load(StorageKeys::THEME) {
            Ok(None) => Theme::Dark,
            Ok(Some(value)) if value.trim() == "dark" => Theme::Dark,
            Ok(Some(_)) => Theme::Light,
            Err(e) => {
                error!("Error loading theme: {}", e);
                Theme::Dark
            }
        }
    }

    /// Remove every key the application writes.
    pub fn clear_all(&self) -> bool {
        let mut ok = true;
        for key in StorageKeys::ALL {
            if let Err(e) = self.store.remove(key) {
                error!("Error clearing {}: {}", key, e);
                ok = false;
            }
        }
        ok
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, what: &str) -> bool {
        let result = serde_json::to_string(value)
            .map_err(CoreError::from)
            .and_then(|json| self.store.save(key, &json));

        match result {
            Ok(()) => {
                debug!(key, "Saved {}", what);
                true
            }
            Err(e) => {
                error!("Error saving {}: {}", what, e);
                false
            }
        }
    }

    fn load_json<T: for<'de> Deserialize<'de>>(&self, key: &str, what: &str) -> Option<T> {
        let result = self.store.load(key).and_then(|raw| match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        });

        match result {
            Ok(value) => value,
            Err(e) => {
                error!("Error loading {}: {}", what, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Store that fails every call.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn save(&self, _key: &str, _value: &str) -> CoreResult<()> {
            Err(CoreError::Io(std::io::Error::other("disk full")))
        }

        fn load(&self, _key: &str) -> CoreResult<Option<String>> {
            Err(CoreError::Io(std::io::Error::other("disk gone")))
        }

        fn remove(&self, _key: &str) -> CoreResult<()> {
            Err(CoreError::Io(std::io::Error::other("read only")))
        }
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path().join("store"));

        assert_eq!(store.load("nexus_theme").unwrap(), None);
        store.save("nexus_theme", "light").unwrap();
        assert_eq!(store.load("nexus_theme").unwrap().as_deref(), Some("light"));
        store.remove("nexus_theme").unwrap();
        assert_eq!(store.load("nexus_theme").unwrap(), None);
    }

    #[test]
    fn test_file_store_overwrite_replaces_whole_value() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path());

        store.save("nexus_projects", &"x".repeat(4096)).unwrap();
        store.save("nexus_projects", "[]").unwrap();

        assert_eq!(store.load("nexus_projects").unwrap().as_deref(), Some("[]"));
        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["nexus_projects".to_string()]);
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path());
        assert!(matches!(
            store.save("../escape", "x"),
            Err(CoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_theme_defaults_to_dark() {
        let storage = Storage::in_memory();
        assert_eq!(storage.load_theme(), Theme::Dark);

        assert!(storage.save_theme(Theme::Light));
        assert_eq!(storage.load_theme(), Theme::Light);
    }

    #[test]
    fn test_settings_defaults() {
        let storage = Storage::in_memory();
        assert_eq!(storage.load_settings(), Settings::default());

        let settings = Settings {
            dark_mode: false,
            notifications: false,
        };
        assert!(storage.save_settings(&settings));
        assert_eq!(storage.load_settings(), settings);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let storage = Storage::new(Arc::new(BrokenStore));

        assert!(!storage.save_projects(&[]));
        assert!(storage.load_projects().is_empty());
        assert!(!storage.save_theme(Theme::Light));
        assert_eq!(storage.load_theme(), Theme::Dark);
        assert!(!storage.clear_all());
    }

    #[test]
    fn test_corrupt_projects_load_empty() {
        let store = Arc::new(MemoryStore::new());
        store.save(StorageKeys::PROJECTS, "{not json").unwrap();

        let storage = Storage::new(store);
        assert!(storage.load_projects().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let storage = Storage::in_memory();
        storage.save_theme(Theme::Light);
        storage.save_settings(&Settings::default());

        assert!(storage.clear_all());
        assert_eq!(storage.load_theme(), Theme::Dark);
    }
}
