use crate::prompt::Prompter;
use droidlog_android::Device;
use droidlog_core::{Severity, validate_package_name};
use droidlog_projects::{Project, RecentApp};
use std::io;

/// the app chosen for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTarget {
    pub package_name: String,
    pub app_name: String,
}

impl AppTarget {
    /// display name from a known project when there is one, else the package itself
    pub fn for_package(package_name: &str, recent: &[RecentApp], projects: &[Project]) -> Self {
        let app_name = recent
            .iter()
            .find(|app| app.package_name == package_name)
            .map(|app| app.app_name.clone())
            .or_else(|| {
                projects
                    .iter()
                    .find(|p| p.package_name == package_name)
                    .map(|p| p.app_name.clone())
            })
            .unwrap_or_else(|| package_name.to_string());

        Self {
            package_name: package_name.to_string(),
            app_name,
        }
    }
}

enum AppChoice<'a> {
    Recent(&'a RecentApp),
    Project(&'a Project),
    Manual,
}

pub fn choose_device<P: Prompter + ?Sized>(
    prompter: &mut P,
    devices: &[Device],
) -> io::Result<String> {
    let items: Vec<String> = devices.iter().map(|d| d.id.clone()).collect();
    let index = prompter.select("Several devices are connected, pick one", &items, 0)?;
    Ok(devices[index].id.clone())
}

/// Recent apps first, then discovered projects not already listed, then manual entry.
pub fn choose_app<P: Prompter + ?Sized>(
    prompter: &mut P,
    recent: &[RecentApp],
    projects: &[Project],
) -> io::Result<AppTarget> {
    let mut choices = Vec::new();
    let mut items = Vec::new();

    for app in recent {
        items.push(format!("{} ({})  [recent]", app.app_name, app.package_name));
        choices.push(AppChoice::Recent(app));
    }
    for project in projects
        .iter()
        .filter(|p| !recent.iter().any(|app| app.package_name == p.package_name))
    {
        items.push(format!(
            "{} ({})  {}",
            project.app_name,
            project.package_name,
            project.path.display()
        ));
        choices.push(AppChoice::Project(project));
    }

    if choices.is_empty() {
        return enter_package(prompter, recent, projects);
    }

    items.push("Enter a package name".to_string());
    choices.push(AppChoice::Manual);

    let index = prompter.select("Which app do you want to watch?", &items, 0)?;
    match choices[index] {
        AppChoice::Recent(app) => Ok(AppTarget {
            package_name: app.package_name.clone(),
            app_name: app.app_name.clone(),
        }),
        AppChoice::Project(project) => Ok(AppTarget {
            package_name: project.package_name.clone(),
            app_name: project.app_name.clone(),
        }),
        AppChoice::Manual => enter_package(prompter, recent, projects),
    }
}

/// ask until the answer is a valid package name
fn enter_package<P: Prompter + ?Sized>(
    prompter: &mut P,
    recent: &[RecentApp],
    projects: &[Project],
) -> io::Result<AppTarget> {
    loop {
        let answer = prompter.input("Package name (e.g. com.example.app)")?;
        match validate_package_name(&answer) {
            Ok(package) => return Ok(AppTarget::for_package(package, recent, projects)),
            Err(e) => prompter.notice(&format!("Invalid package name: {}", e))?,
        }
    }
}

pub fn choose_level<P: Prompter + ?Sized>(
    prompter: &mut P,
    preferred: Severity,
) -> io::Result<Severity> {
    let items: Vec<String> = Severity::ALL
        .iter()
        .map(|level| format!("{} ({})", level.name(), level.letter()))
        .collect();
    let index = prompter.select("Minimum log level", &items, preferred as usize)?;
    Ok(Severity::ALL[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::VecDeque, path::PathBuf};

    /// answers from a script, recording every menu it was shown
    #[derive(Default)]
    struct ScriptedPrompter {
        selections: VecDeque<usize>,
        inputs: VecDeque<&'static str>,
        menus: Vec<Vec<String>>,
        notices: Vec<String>,
    }

    impl Prompter for ScriptedPrompter {
        fn select(&mut self, _title: &str, items: &[String], default: usize) -> io::Result<usize> {
            self.menus.push(items.to_vec());
            Ok(self.selections.pop_front().unwrap_or(default))
        }

        fn input(&mut self, _title: &str) -> io::Result<String> {
            self.inputs
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        }

        fn notice(&mut self, message: &str) -> io::Result<()> {
            self.notices.push(message.to_string());
            Ok(())
        }
    }

    fn recent(package: &str, name: &str) -> RecentApp {
        RecentApp {
            package_name: package.into(),
            app_name: name.into(),
            last_used: 0,
        }
    }

    fn project(package: &str, name: &str) -> Project {
        Project {
            name: name.to_lowercase(),
            path: PathBuf::from("/src").join(name.to_lowercase()),
            package_name: package.into(),
            app_name: name.into(),
        }
    }

    #[test]
    fn test_recent_apps_come_first_and_are_not_repeated() {
        let mut prompter = ScriptedPrompter {
            selections: VecDeque::from([1]),
            ..Default::default()
        };
        let recent = [recent("com.shop", "Shop")];
        let projects = [project("com.shop", "Shop"), project("com.wallet", "Wallet")];

        let target = choose_app(&mut prompter, &recent, &projects).unwrap();

        assert_eq!(target.package_name, "com.wallet");
        assert_eq!(target.app_name, "Wallet");
        assert_eq!(prompter.menus[0].len(), 3);
        assert!(prompter.menus[0][0].contains("[recent]"));
    }

    #[test]
    fn test_manual_entry_reprompts_until_valid() {
        let mut prompter = ScriptedPrompter {
            selections: VecDeque::from([1]),
            inputs: VecDeque::from(["", "123bad", "com.example.app"]),
            ..Default::default()
        };
        let projects = [project("com.wallet", "Wallet")];

        let target = choose_app(&mut prompter, &[], &projects).unwrap();

        assert_eq!(
            target,
            AppTarget {
                package_name: "com.example.app".into(),
                app_name: "com.example.app".into(),
            }
        );
        assert_eq!(prompter.notices.len(), 2);
    }

    #[test]
    fn test_no_candidates_goes_straight_to_manual_entry() {
        let mut prompter = ScriptedPrompter {
            inputs: VecDeque::from(["com.example.app"]),
            ..Default::default()
        };

        let target = choose_app(&mut prompter, &[], &[]).unwrap();
        assert_eq!(target.package_name, "com.example.app");
        assert!(prompter.menus.is_empty());
    }

    #[test]
    fn test_manual_entry_reuses_known_app_name() {
        let projects = [project("com.wallet", "Wallet")];
        let target = AppTarget::for_package("com.wallet", &[], &projects);
        assert_eq!(target.app_name, "Wallet");
    }

    #[test]
    fn test_level_defaults_to_preferred() {
        let mut prompter = ScriptedPrompter::default();
        assert_eq!(
            choose_level(&mut prompter, Severity::Warning).unwrap(),
            Severity::Warning
        );
        assert_eq!(prompter.menus[0].len(), 6);
    }

    #[test]
    fn test_choose_device() {
        let mut prompter = ScriptedPrompter {
            selections: VecDeque::from([1]),
            ..Default::default()
        };
        let devices = [
            Device {
                id: "emulator-5554".into(),
                status: "device".into(),
            },
            Device {
                id: "R58M123".into(),
                status: "device".into(),
            },
        ];
        assert_eq!(choose_device(&mut prompter, &devices).unwrap(), "R58M123");
    }
}
