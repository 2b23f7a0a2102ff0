use crate::output::{self, print_json};
use crate::session::{Locations, Session};
use anyhow::Context;
use challenge_core::{counter, paths, scaffold};
use chrono::{Datelike, Local};
use std::path::Path;
use std::process::{Command, Stdio};

const TMUX_SESSION: &str = "coding-challenge";

/// `challenge start`: scaffold the current day and open its README.
pub fn run(
    locations: Locations,
    no_launch: bool,
    ignore_rest_day: bool,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::load_valid(locations)?;
    let config = &session.config;

    let now = Local::now();
    if !ignore_rest_day && config.preferences.is_rest_day(now.weekday()) {
        output::warning("Today is a rest day. Time for rest, not coding.");
        return Ok(());
    }

    session.require_base_dir()?;
    let day = counter::read_or_init(&session.locations.counter)
        .context("failed to read day counter")?;
    let scaffold =
        scaffold::prepare_day(config, day, now.naive_local()).context("failed to prepare day")?;
    let pos = &scaffold.position;

    if json {
        print_json(&scaffold)?;
    } else {
        if scaffold.created_log {
            output::success(format!("Created new log file: {}", scaffold.log_file.display()));
        }
        if scaffold.created_readme {
            output::success(format!(
                "Setting up Day {} (Phase {}, Week {})",
                pos.absolute_day,
                pos.phase,
                pos.week_formatted()
            ));
        } else {
            output::info(format!("Using existing README for Day {}", pos.absolute_day));
        }
        if pos.beyond_end {
            output::warning(format!(
                "Day {} is past the end of the challenge ({} days); continuing in phase {}.",
                pos.absolute_day, config.challenge.total_days, pos.phase
            ));
        }
        println!("Project directory: {}", scaffold.project_dir.display());
    }

    if no_launch {
        return Ok(());
    }
    launch(
        &config.preferences.editor,
        &scaffold.project_dir,
        config.preferences.use_tmux,
    )
}

/// Open the README in the editor, inside a fresh tmux session when enabled,
/// and wait for it to exit.
fn launch(editor: &str, dir: &Path, use_tmux: bool) -> anyhow::Result<()> {
    let editor_cmd = format!("{editor} {}", paths::README_FILE);

    let status = if use_tmux && which::which("tmux").is_ok() {
        let _ = Command::new("tmux")
            .args(["kill-session", "-t", TMUX_SESSION])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        output::success(format!("Starting tmux session with {editor}..."));
        tracing::debug!(session = TMUX_SESSION, dir = %dir.display(), "launching tmux");
        Command::new("tmux")
            .args(["new-session", "-s", TMUX_SESSION, &editor_cmd])
            .current_dir(dir)
            .status()
            .context("failed to launch tmux")?
    } else {
        if use_tmux {
            output::warning("tmux is not installed; opening the editor directly.");
        }
        output::success(format!("Opening project directory with {editor}..."));
        let mut parts = editor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("preferences.editor is empty"))?;
        Command::new(program)
            .args(parts)
            .arg(paths::README_FILE)
            .current_dir(dir)
            .status()
            .with_context(|| format!("failed to launch editor '{program}'"))?
    };

    if !status.success() {
        tracing::warn!(?status, "editor session exited with an error");
    }
    Ok(())
}
