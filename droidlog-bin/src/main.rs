mod cli;
mod logging;
mod picker;
mod prompt;
mod sink;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use crossterm::{
    execute,
    style::{Attribute, Print, SetAttribute, SetForegroundColor},
};
use droidlog_android::{AdbBridge, PipelineController, PipelineDesc};
use droidlog_core::{Severity, StreamError, TeardownReason, theme, validate_package_name};
use droidlog_projects::{
    PreferenceStore, Project, default_preferences_path, default_scan_roots, discover_projects,
};
use picker::AppTarget;
use prompt::TermPrompter;
use sink::TerminalSink;
use std::{
    env, fs,
    io::{self, IsTerminal},
    process::ExitCode,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.debug, cli.log_file.as_deref()) {
        eprintln!("Warning: {:#}", e);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::debug!("droidlog: {:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let prefs_path = cli
        .preferences
        .clone()
        .or_else(default_preferences_path)
        .context("could not determine the config directory, pass --preferences")?;
    let mut store = PreferenceStore::load(prefs_path);

    // maintenance flags only edit the preferences
    if update_preferences(&cli, &mut store)? {
        store.save()?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.list_projects {
        print_projects(&scan_projects(&cli, &store));
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting the async runtime")?;

    let mut desc = cli.pipeline_desc();
    let mut prompter = TermPrompter::stdio();

    let devices = match runtime.block_on(AdbBridge::new(desc.clone()).devices()) {
        Ok(devices) => devices,
        Err(e) => {
            log::error!("Device query failed: {}", e);
            eprintln!("Error: {}\n\n{}", e, e.hint());
            return Ok(ExitCode::FAILURE);
        }
    };
    if !devices.connected {
        eprintln!(
            "No Android device connected. Plug one in (with USB debugging on) or start an emulator."
        );
        return Ok(ExitCode::FAILURE);
    }
    if desc.serial.is_none() && devices.count > 1 {
        let serial = picker::choose_device(&mut prompter, &devices.devices)?;
        desc = desc.with_serial(Some(serial));
    }

    let target = choose_target(&cli, &store, &mut prompter)?;
    let level = match cli.level {
        Some(level) => level,
        None => picker::choose_level(&mut prompter, store.preferred_log_level())?,
    };

    store.add_recent_app(&target.package_name, &target.app_name);
    store.set_last_used_package(&target.package_name);
    store.set_preferred_log_level(level);
    if let Err(e) = store.save() {
        log::warn!("Could not save preferences: {:#}", e);
    }

    let color = !cli.no_color && io::stdout().is_terminal();
    runtime.block_on(stream(desc, &target, level, color))
}

/// apply --add-scan-path, --remove-scan-path and --clear-recent; true if any was given
fn update_preferences(cli: &Cli, store: &mut PreferenceStore) -> Result<bool> {
    for path in &cli.add_scan_path {
        let path = fs::canonicalize(path)
            .with_context(|| format!("scan path {} is not accessible", path.display()))?;
        if store.add_custom_scan_path(path.clone()) {
            eprintln!("Added scan path {}", path.display());
        } else {
            eprintln!("{} is already a scan path", path.display());
        }
    }
    for path in &cli.remove_scan_path {
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
        if store.remove_custom_scan_path(&canonical) || store.remove_custom_scan_path(path) {
            eprintln!("Removed scan path {}", path.display());
        } else {
            eprintln!("{} was not a scan path", path.display());
        }
    }
    if cli.clear_recent {
        store.clear_recent_apps();
        eprintln!("Cleared recent apps");
    }

    Ok(!cli.add_scan_path.is_empty() || !cli.remove_scan_path.is_empty() || cli.clear_recent)
}

fn scan_projects(cli: &Cli, store: &PreferenceStore) -> Vec<Project> {
    let cwd = env::current_dir().ok();
    let home = dirs::home_dir();
    let roots = default_scan_roots(cwd.as_deref(), home.as_deref(), store.custom_scan_paths());
    log::debug!("scanning {} roots for projects", roots.len());
    discover_projects(&roots, cli.max_depth)
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        eprintln!("No projects found. Add a directory with --add-scan-path.");
        return;
    }
    for project in projects {
        println!(
            "{}\t{}\t{}",
            project.package_name,
            project.app_name,
            project.path.display()
        );
    }
}

fn choose_target(
    cli: &Cli,
    store: &PreferenceStore,
    prompter: &mut impl prompt::Prompter,
) -> Result<AppTarget> {
    let requested = if cli.last {
        Some(
            store
                .last_used_package()
                .context("no package has been used yet, run without --last")?,
        )
    } else {
        cli.package.as_deref()
    };

    if let Some(package) = requested {
        let package = validate_package_name(package)
            .with_context(|| format!("invalid package name '{}'", package))?;
        return Ok(AppTarget::for_package(package, store.recent_apps(), &[]));
    }

    let projects = scan_projects(cli, store);
    Ok(picker::choose_app(prompter, store.recent_apps(), &projects)?)
}

async fn stream(
    desc: PipelineDesc,
    target: &AppTarget,
    level: Severity,
    color: bool,
) -> Result<ExitCode> {
    let controller = PipelineController::new(desc);
    let mut session = match controller.start(&target.package_name, level).await {
        Ok(session) => session,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            if e.is_not_found() {
                eprintln!("\nInstall Android SDK Platform-Tools or point --adb at the binary.");
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    session.arm(interrupt_signal())?;

    print_banner(target, level, session.pid());

    let mut sink = TerminalSink::stdio(color);
    match session.run(&mut sink).await {
        Ok(TeardownReason::Interrupt) => {
            eprintln!("\nStopped.");
            Ok(ExitCode::SUCCESS)
        }
        Ok(reason) => {
            log::info!("log stream ended: {}", reason);
            Ok(ExitCode::SUCCESS)
        }
        // reader went away (e.g. piped into head)
        Err(StreamError::Display(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            log::error!("Log stream failed: {}", e);
            eprintln!("Error: log stream failed: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_banner(target: &AppTarget, level: Severity, pid: Option<&str>) {
    let scope = match pid {
        Some(pid) => format!("pid {}", pid),
        None => "not running, matching by package name".to_string(),
    };
    let result = execute!(
        io::stderr(),
        SetForegroundColor(theme::ACCENT_COLOR),
        SetAttribute(Attribute::Bold),
        Print(format!(
            "{} ({}) [{}] at {} and above. Press Ctrl+C to stop.\n",
            target.app_name,
            target.package_name,
            scope,
            level.name()
        )),
        SetAttribute(Attribute::Reset),
    );
    if let Err(e) = result {
        log::debug!("could not print banner: {}", e);
    }
}

/// resolves on ctrl-c, or SIGTERM on unix
async fn interrupt_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = sigterm.recv() => log::debug!("received SIGTERM"),
                }
            }
            Err(e) => {
                log::warn!("Could not listen for SIGTERM: {}", e);
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Could not listen for Ctrl+C: {}", e);
        // without a handler the default disposition still ends the process
        std::future::pending::<()>().await;
    }
}
