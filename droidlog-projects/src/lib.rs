// droidlog-projects - app discovery and user preferences for droidlog (internal)
//
// Finds React Native projects on disk to offer in the app picker, and keeps
// recent apps, the preferred log level and extra scan paths between runs.

mod discovery;
mod manifest;
mod preferences;

pub use discovery::{
    DEFAULT_MAX_DEPTH, Project, default_scan_roots, discover_projects, find_project_dirs,
    is_project_dir, read_project,
};
pub use manifest::{gradle_package_name, manifest_package_name, string_resource_app_name};
pub use preferences::{
    MAX_RECENT_APPS, PREFERENCES_FILE_NAME, PreferenceStore, Preferences, RecentApp,
    default_preferences_path,
};
