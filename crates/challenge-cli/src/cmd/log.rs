use crate::output::{self, print_json};
use crate::session::{Locations, Session};
use anyhow::Context;
use challenge_core::progress_log::{self, ReconcileOptions, WeekMeta};
use challenge_core::{counter, paths, ChallengeError};

/// `challenge log [DAY]`: copy a day's README sections into its weekly log.
pub fn run(locations: Locations, day: Option<i64>, force: bool, json: bool) -> anyhow::Result<()> {
    let session = Session::load_valid(locations)?;
    let config = &session.config;

    let current = counter::read(&session.locations.counter)?;
    let day = match day {
        Some(d) if d < 1 => return Err(ChallengeError::InvalidDay(d).into()),
        Some(d) => u32::try_from(d).map_err(|_| ChallengeError::InvalidDay(d))?,
        None => current,
    };
    if day > current {
        return Err(ChallengeError::FutureDay { day, current }.into());
    }

    let pos = config.challenge.locate(day)?;
    let readme = paths::readme_path(config, &pos);
    if !readme.is_file() {
        return Err(ChallengeError::SourceNotFound(readme).into());
    }
    let week = WeekMeta::for_position(&config.challenge, &pos)?;
    let log_path = paths::log_file_path(config, pos.phase, pos.week_in_phase);

    let mut opts = ReconcileOptions {
        force,
        heading: None,
    };
    let report = match progress_log::reconcile(day, &readme, &log_path, &week, &opts) {
        Err(ChallengeError::EntryExists { .. }) if !json => {
            output::warning(format!(
                "Day {day} already exists in {}",
                log_path.display()
            ));
            if !output::confirm("Do you want to replace it?")? {
                println!("Operation canceled.");
                return Ok(());
            }
            opts.force = true;
            progress_log::reconcile(day, &readme, &log_path, &week, &opts)
                .context("failed to update progress log")?
        }
        other => other?,
    };

    if json {
        return print_json(&report);
    }
    if report.created_log {
        output::info(format!("Created new log file: {}", log_path.display()));
    }
    output::success(format!(
        "Progress for Day {day} successfully logged to {}",
        report.log_path.display()
    ));
    Ok(())
}
