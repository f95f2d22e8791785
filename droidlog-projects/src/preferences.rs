use anyhow::{Context, Result};
use chrono::Utc;
use droidlog_core::Severity;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const MAX_RECENT_APPS: usize = 10;
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";
const APP_DIR_NAME: &str = "droidlog";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentApp {
    pub package_name: String,
    pub app_name: String,
    /// unix seconds
    #[serde(default)]
    pub last_used: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub recent_apps: Vec<RecentApp>,
    #[serde(with = "severity_token")]
    pub preferred_log_level: Severity,
    pub custom_scan_paths: Vec<PathBuf>,
    pub last_used_package: Option<String>,
}

// stored as a plain token; anything unrecognised reads back as Info
mod severity_token {
    use droidlog_core::Severity;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(level: &Severity, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(level.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Severity, D::Error> {
        let token = Option::<String>::deserialize(deserializer)?;
        Ok(Severity::parse_or_default(token.as_deref()))
    }
}

/// `<config dir>/droidlog/preferences.json`
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(PREFERENCES_FILE_NAME))
}

/// preferences backed by a json file
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferenceStore {
    /// Load from `path`. A missing or unreadable file yields defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(prefs) => prefs,
                Err(e) => {
                    log::warn!(
                        "Ignoring corrupt preferences at {}: {}",
                        path.display(),
                        e
                    );
                    Preferences::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => {
                log::warn!("Could not read preferences at {}: {}", path.display(), e);
                Preferences::default()
            }
        };

        log::debug!("PreferenceStore: loaded {}", path.display());
        Self { path, prefs }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// write through a temp file so a crash never leaves half a file behind
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.prefs)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        log::debug!("PreferenceStore: saved {}", self.path.display());
        Ok(())
    }

    pub fn recent_apps(&self) -> &[RecentApp] {
        &self.prefs.recent_apps
    }

    /// move (or insert) the app to the front, keeping at most MAX_RECENT_APPS
    pub fn add_recent_app(&mut self, package_name: &str, app_name: &str) {
        let recent = &mut self.prefs.recent_apps;
        recent.retain(|app| app.package_name != package_name);
        recent.insert(
            0,
            RecentApp {
                package_name: package_name.to_string(),
                app_name: app_name.to_string(),
                last_used: Utc::now().timestamp(),
            },
        );
        recent.truncate(MAX_RECENT_APPS);
    }

    pub fn clear_recent_apps(&mut self) {
        self.prefs.recent_apps.clear();
    }

    pub fn preferred_log_level(&self) -> Severity {
        self.prefs.preferred_log_level
    }

    pub fn set_preferred_log_level(&mut self, level: Severity) {
        self.prefs.preferred_log_level = level;
    }

    pub fn custom_scan_paths(&self) -> &[PathBuf] {
        &self.prefs.custom_scan_paths
    }

    /// returns false if the path was already present
    pub fn add_custom_scan_path(&mut self, path: PathBuf) -> bool {
        if self.prefs.custom_scan_paths.contains(&path) {
            return false;
        }
        self.prefs.custom_scan_paths.push(path);
        true
    }

    pub fn remove_custom_scan_path(&mut self, path: &Path) -> bool {
        let before = self.prefs.custom_scan_paths.len();
        self.prefs.custom_scan_paths.retain(|p| p != path);
        before != self.prefs.custom_scan_paths.len()
    }

    pub fn last_used_package(&self) -> Option<&str> {
        self.prefs.last_used_package.as_deref()
    }

    pub fn set_last_used_package(&mut self, package_name: &str) {
        self.prefs.last_used_package = Some(package_name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> PreferenceStore {
        PreferenceStore::load("/nonexistent/droidlog/preferences.json")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let store = store();
        assert!(store.recent_apps().is_empty());
        assert_eq!(store.preferred_log_level(), Severity::Info);
        assert_eq!(store.last_used_package(), None);
    }

    #[test]
    fn test_re_adding_moves_to_front_without_duplicates() {
        let mut store = store();
        store.add_recent_app("com.x", "X");
        store.add_recent_app("com.y", "Y");
        store.add_recent_app("com.x", "X");

        let packages: Vec<&str> = store
            .recent_apps()
            .iter()
            .map(|app| app.package_name.as_str())
            .collect();
        assert_eq!(packages, vec!["com.x", "com.y"]);
    }

    #[test]
    fn test_recent_apps_are_capped() {
        let mut store = store();
        for i in 0..15 {
            store.add_recent_app(&format!("com.app{i}"), "App");
        }
        store.add_recent_app("com.app3", "App");

        assert_eq!(store.recent_apps().len(), MAX_RECENT_APPS);
        assert_eq!(store.recent_apps()[0].package_name, "com.app3");
        assert_eq!(store.recent_apps()[1].package_name, "com.app14");
        assert_eq!(
            store
                .recent_apps()
                .iter()
                .filter(|app| app.package_name == "com.app3")
                .count(),
            1
        );
    }

    #[test]
    fn test_scan_paths_are_unique() {
        let mut store = store();
        assert!(store.add_custom_scan_path(PathBuf::from("/src")));
        assert!(!store.add_custom_scan_path(PathBuf::from("/src")));
        assert!(store.remove_custom_scan_path(Path::new("/src")));
        assert!(!store.remove_custom_scan_path(Path::new("/src")));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE_NAME);

        let mut store = PreferenceStore::load(&path);
        store.add_recent_app("com.example.app", "Example");
        store.set_preferred_log_level(Severity::Warning);
        store.set_last_used_package("com.example.app");
        store.add_custom_scan_path(PathBuf::from("/src/mobile"));
        store.save().unwrap();

        let reloaded = PreferenceStore::load(&path);
        assert_eq!(reloaded.preferences(), store.preferences());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"preferredLogLevel\": \"warning\""));
        assert!(raw.contains("\"recentApps\""));
    }

    #[test]
    fn test_unknown_level_reads_as_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        fs::write(&path, r#"{"preferredLogLevel": "LOUD", "lastUsedPackage": "com.a"}"#).unwrap();

        let store = PreferenceStore::load(&path);
        assert_eq!(store.preferred_log_level(), Severity::Info);
        assert_eq!(store.last_used_package(), Some("com.a"));
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let store = PreferenceStore::load(&path);
        assert_eq!(store.preferences(), &Preferences::default());
    }
}
