use crate::output::{self, print_json};
use crate::session::{Locations, Session};
use anyhow::Context;
use challenge_core::{counter, io};
use std::path::PathBuf;

/// `challenge init`: non-interactive setup.
///
/// Writes the config only when none exists, so re-running never clobbers
/// user settings. Creates the base directory, the log root and the day
/// counter (at day 1) when missing.
pub fn run(locations: Locations, base_dir: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let config_existed = locations.config.exists();
    let mut session = Session::load(locations)?;

    if !config_existed {
        if let Some(dir) = base_dir {
            session.config.paths.base_dir = dir;
        }
        session
            .config
            .save(&session.locations.config)
            .context("failed to write config")?;
    } else if base_dir.is_some() {
        output::warning(format!(
            "Config already exists at {}; leaving base_dir unchanged (use 'challenge config set paths.base_dir=...')",
            session.locations.config.display()
        ));
    }

    let base = session.config.paths.base_dir.clone();
    let log_root = session.config.paths.log_root();
    let created_base = io::ensure_dir(&base)?;
    io::ensure_dir(&log_root)?;
    let day = counter::read_or_init(&session.locations.counter)
        .context("failed to initialize day counter")?;

    if json {
        return print_json(&serde_json::json!({
            "config": session.locations.config,
            "config_created": !config_existed,
            "base_dir": base,
            "base_dir_created": created_base,
            "log_root": log_root,
            "current_day": day,
        }));
    }

    if config_existed {
        output::info(format!("Using existing config: {}", session.locations.config.display()));
    } else {
        output::success(format!("Created config: {}", session.locations.config.display()));
    }
    println!("Base directory: {}", base.display());
    println!("Logs:           {}", log_root.display());
    println!("Current day:    {day}");
    println!("\nRun 'challenge start' to begin Day {day}.");
    Ok(())
}
