use crate::output::{self, print_json};
use crate::session::{Locations, Session};
use anyhow::Context;
use challenge_core::git::{self, Git, DEFAULT_REMOTE};
use challenge_core::{counter, paths, scaffold, ChallengeError};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Serialize)]
struct RepoOutcome {
    dir: PathBuf,
    committed: bool,
    pushed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct PushOutcome {
    day: u32,
    message: String,
    repos: Vec<RepoOutcome>,
    next_day: u32,
    next_week: scaffold::NextWeek,
}

/// `challenge push`: commit the day's work, push it, and advance the
/// counter.
///
/// Git problems are reported as warnings; the counter moves on regardless.
pub fn run(
    locations: Locations,
    message: Option<String>,
    no_push: bool,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::load_valid(locations)?;
    let config = &session.config;
    session.require_base_dir()?;

    let day = counter::read(&session.locations.counter)?;
    let pos = config.challenge.locate(day)?;
    let readme = paths::readme_path(config, &pos);
    if !readme.is_file() {
        return Err(ChallengeError::SourceNotFound(readme).into());
    }

    let default_message = format!(
        "Complete Day {} - Phase {} Week {}",
        day,
        pos.phase,
        pos.week_formatted()
    );
    let message = match message {
        Some(m) if !m.trim().is_empty() => m,
        _ if !json && std::io::stdin().is_terminal() => {
            let answer = output::prompt(&format!(
                "Commit message (default: \"{default_message}\"): "
            ))?;
            if answer.is_empty() {
                default_message
            } else {
                answer
            }
        }
        _ => default_message,
    };

    let mut repos = Vec::new();
    if git::available() {
        let push = config.preferences.auto_push && !no_push;
        for dir in repo_dirs(&session) {
            let outcome = commit_repo(Git::new(&dir), &message, push);
            if let Some(err) = &outcome.error {
                tracing::warn!(dir = %dir.display(), error = %err, "git step failed");
                if !json {
                    output::warning(format!("Warning: git failed in {}: {err}", dir.display()));
                }
            } else if !json {
                report_repo(&outcome);
            }
            repos.push(outcome);
        }
    } else if !json {
        output::warning("git is not installed; skipping commit and push.");
    }

    let next_day = day + 1;
    counter::write(&session.locations.counter, next_day).context("failed to advance day counter")?;
    let next_week = scaffold::prepare_next_week(config, day)?;

    if json {
        return print_json(&PushOutcome {
            day,
            message,
            repos,
            next_day,
            next_week,
        });
    }
    if let Some(dir) = &next_week.phase_log_dir {
        output::info(format!("Prepared logs for the next phase: {}", dir.display()));
    }
    if let Some(dir) = &next_week.week_dir {
        output::info(format!("Prepared next week: {}", dir.display()));
    }
    output::success(format!("Day counter incremented to {next_day}"));
    Ok(())
}

/// The challenge repository, plus the log root when it lives outside it
/// and is a repository of its own.
fn repo_dirs(session: &Session) -> Vec<PathBuf> {
    let base = session.base_dir().to_path_buf();
    let log_root = session.config.paths.log_root();
    let mut dirs = vec![base.clone()];
    if !log_root.starts_with(&base) && Git::new(&log_root).is_repo() {
        dirs.push(log_root);
    }
    dirs
}

fn commit_repo(repo: Git, message: &str, push: bool) -> RepoOutcome {
    let mut outcome = RepoOutcome {
        dir: repo.dir().to_path_buf(),
        committed: false,
        pushed: false,
        error: None,
    };
    if let Err(e) = commit_and_push(&repo, message, push, &mut outcome) {
        outcome.error = Some(e.to_string());
    }
    outcome
}

fn commit_and_push(
    repo: &Git,
    message: &str,
    push: bool,
    outcome: &mut RepoOutcome,
) -> challenge_core::Result<()> {
    if !repo.is_repo() {
        repo.init()?;
    }
    repo.add_all()?;
    outcome.committed = repo.commit(message)?;
    if push && repo.has_remote(DEFAULT_REMOTE)? {
        repo.push(DEFAULT_REMOTE)?;
        outcome.pushed = true;
    }
    Ok(())
}

fn report_repo(outcome: &RepoOutcome) {
    let dir = outcome.dir.display();
    if outcome.committed {
        output::success(format!("Committed changes in {dir}"));
    } else {
        output::info(format!("Nothing to commit in {dir}"));
    }
    if outcome.pushed {
        output::success(format!("Pushed to {DEFAULT_REMOTE}"));
    }
}
