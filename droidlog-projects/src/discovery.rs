use crate::manifest::{
    GRADLE_FILES, app_json_display_name, gradle_package_name, manifest_package_name,
    package_json_name, string_resource_app_name,
};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_MAX_DEPTH: usize = 4;

// directories that never contain a project root worth scanning
const SKIPPED_DIRS: [&str; 6] = ["node_modules", "build", "Pods", "target", "dist", "vendor"];

// common places people keep their checkouts, relative to the home directory
const HOME_PROJECT_DIRS: [&str; 6] = [
    "Projects",
    "projects",
    "Developer",
    "dev",
    "code",
    "workspace",
];

/// a React Native (or plain Android) app found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub package_name: String,
    pub app_name: String,
}

fn is_skipped(dir_name: &str) -> bool {
    dir_name.starts_with('.') || SKIPPED_DIRS.contains(&dir_name)
}

fn app_gradle_file(dir: &Path) -> Option<PathBuf> {
    let app_dir = dir.join("android").join("app");
    GRADLE_FILES
        .iter()
        .map(|name| app_dir.join(name))
        .find(|path| path.is_file())
}

/// a project root has a package.json next to an android/app gradle file
pub fn is_project_dir(dir: &Path) -> bool {
    dir.join("package.json").is_file() && app_gradle_file(dir).is_some()
}

/// Recursively find project roots under `base_path`, at most `max_depth` levels down.
/// The walk does not descend into a project once found.
pub fn find_project_dirs(base_path: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut project_dirs = Vec::new();

    if is_project_dir(base_path) {
        project_dirs.push(base_path.to_path_buf());
        return project_dirs;
    }
    if max_depth == 0 {
        return project_dirs;
    }

    if let Ok(entries) = fs::read_dir(base_path) {
        for entry in entries.flatten() {
            let path = entry.path();

            // file_type() does not follow symlinks, which keeps cycles out
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Some(dir_name) = path.file_name().and_then(|n| n.to_str())
                && is_skipped(dir_name)
            {
                continue;
            }

            let mut subdirs = find_project_dirs(&path, max_depth - 1);
            project_dirs.append(&mut subdirs);
        }
    }

    project_dirs
}

/// read names from a project root; `None` if no package name can be found
pub fn read_project(dir: &Path) -> Option<Project> {
    let app_dir = dir.join("android").join("app");

    let gradle_package = app_gradle_file(dir)
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|gradle| gradle_package_name(&gradle));
    let package_name = gradle_package.or_else(|| {
        fs::read_to_string(app_dir.join("src/main/AndroidManifest.xml"))
            .ok()
            .and_then(|xml| manifest_package_name(&xml))
    });
    let Some(package_name) = package_name else {
        log::debug!("No package name found in {}", dir.display());
        return None;
    };

    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    let name = package_json_name(dir).unwrap_or(dir_name);

    let app_name = app_json_display_name(dir)
        .or_else(|| {
            fs::read_to_string(app_dir.join("src/main/res/values/strings.xml"))
                .ok()
                .and_then(|xml| string_resource_app_name(&xml))
        })
        .unwrap_or_else(|| name.clone());

    Some(Project {
        name,
        path: dir.to_path_buf(),
        package_name,
        app_name,
    })
}

/// Scan every root, dedupe by package name (first root wins) and sort by name.
pub fn discover_projects(roots: &[PathBuf], max_depth: usize) -> Vec<Project> {
    let mut seen = HashSet::new();
    let mut projects = Vec::new();

    for root in roots {
        if !root.is_dir() {
            log::debug!("Skipping missing scan path {}", root.display());
            continue;
        }
        let dirs = find_project_dirs(root, max_depth);
        log::debug!("Found {} project dir(s) under {}", dirs.len(), root.display());

        for dir in dirs {
            if let Some(project) = read_project(&dir)
                && seen.insert(project.package_name.clone())
            {
                projects.push(project);
            }
        }
    }

    projects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    projects
}

/// current directory, the usual checkout folders in `home`, then user-configured paths
pub fn default_scan_roots(
    cwd: Option<&Path>,
    home: Option<&Path>,
    custom: &[PathBuf],
) -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(cwd) = cwd {
        roots.push(cwd.to_path_buf());
    }
    if let Some(home) = home {
        roots.extend(
            HOME_PROJECT_DIRS
                .iter()
                .map(|dir| home.join(dir))
                .filter(|path| path.is_dir()),
        );
    }
    roots.extend(custom.iter().cloned());

    let mut seen = HashSet::new();
    roots.retain(|root| seen.insert(root.clone()));
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_dirs() {
        assert!(is_skipped("node_modules"));
        assert!(is_skipped(".git"));
        assert!(is_skipped(".gradle"));
        assert!(!is_skipped("apps"));
    }

    #[test]
    fn test_default_roots_dedupe_and_keep_order() {
        let cwd = PathBuf::from("/work/app");
        let custom = vec![PathBuf::from("/opt/src"), PathBuf::from("/work/app")];
        let roots = default_scan_roots(Some(&cwd), None, &custom);
        assert_eq!(roots, vec![PathBuf::from("/work/app"), PathBuf::from("/opt/src")]);
    }
}
