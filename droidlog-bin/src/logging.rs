use anyhow::{Context, Result};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::{fs::File, path::Path};

/// Diagnostics go to stderr (warnings, or everything with `--debug`), and
/// optionally in full to `log_file`. stdout stays reserved for device logs.
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let term_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
    }

    CombinedLogger::init(loggers).context("installing the logger")?;
    Ok(())
}
