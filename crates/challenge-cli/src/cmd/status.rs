use crate::output::{self, field, print_json, progress_bar};
use crate::session::{Locations, Session};
use challenge_core::git::{self, Git};
use challenge_core::status::{GitFacts, StatusReport};
use challenge_core::{counter, paths};
use chrono::Local;
use colored::Colorize;
use std::path::Path;

const BAR_WIDTH: usize = 50;

/// `challenge status`: progress, schedule and repository summary.
pub fn run(locations: Locations, json: bool) -> anyhow::Result<()> {
    let session = Session::load_valid(locations)?;
    let config = &session.config;

    let current_day = counter::read(&session.locations.counter)?;
    let git = git_facts(session.base_dir());
    let report = StatusReport::build(config, current_day, Local::now().date_naive(), git)?;

    if json {
        return print_json(&report);
    }

    let pos = &report.position;
    println!("{}", "6/7 Coding Challenge Status".bold());
    println!();
    field("Current day:", format!("{}/{}", report.current_day, report.total_days));
    field(
        "Phase:",
        format!("{}/{} ({})", pos.phase, report.phase_count, pos.phase_name),
    );
    field(
        "Day in phase:",
        format!("{}/{}", pos.day_in_phase, report.phase_days),
    );
    field("Week in phase:", pos.week_formatted());
    field(
        "Overall week:",
        format!(
            "{} (day {}/{} of the week)",
            report.overall_week, report.day_in_week, report.days_per_week
        ),
    );
    if pos.beyond_end {
        output::warning("The challenge is complete; you are past the final day.");
    }

    println!();
    println!(
        "{} {:.1}%",
        progress_bar(report.days_completed, report.total_days, BAR_WIDTH),
        report.percent_complete
    );
    field("Days completed:", report.days_completed);
    field("Days remaining:", report.days_remaining);

    println!();
    field("Started:", report.start_date);
    let schedule = match report.schedule_delta {
        0 => "on schedule".green().to_string(),
        d if d > 0 => format!("{d} day(s) ahead of schedule").green().to_string(),
        d => format!("{} day(s) behind schedule", -d).yellow().to_string(),
    };
    field("Schedule:", schedule);
    field("Estimated completion:", report.estimated_completion);

    if !report.milestones.is_empty() {
        println!();
        println!("{}", "Upcoming milestones".bold());
        for m in &report.milestones {
            println!(
                "  Day {:>3}  {:<20} {} day(s) left, around {}",
                m.day, m.label, m.days_remaining, m.target_date
            );
        }
    }

    let readme = paths::readme_path(config, pos);
    println!();
    if readme.is_file() {
        field("Today's README:", readme.display());
    } else {
        output::info("Today's project has not been started; run 'challenge start'.");
    }

    if let Some(git) = &report.git {
        println!();
        println!("{}", "Repository".bold());
        if git.clean {
            output::success("  Working tree clean");
        } else {
            output::warning("  Uncommitted changes; run 'challenge push' when done");
        }
        match (git.last_commit, git.days_since_commit) {
            (Some(date), Some(days)) => println!("  Last commit: {date} ({days} day(s) ago)"),
            _ => println!("  No commits yet"),
        }
        println!(
            "  Commit streak: {} day(s) (longest {})",
            git.current_streak, git.longest_streak
        );
    }
    Ok(())
}

/// Gather repository facts for the base directory; `None` when it is not a
/// repository or git is unavailable. Failures degrade to `None` with a log
/// line.
fn git_facts(base: &Path) -> Option<GitFacts> {
    let repo = Git::new(base);
    if !git::available() || !repo.is_repo() {
        return None;
    }
    match read_facts(&repo) {
        Ok(facts) => Some(facts),
        Err(e) => {
            tracing::warn!(error = %e, "could not read git status");
            None
        }
    }
}

fn read_facts(repo: &Git) -> challenge_core::Result<GitFacts> {
    Ok(GitFacts {
        has_changes: repo.has_changes()?,
        last_commit: repo.last_commit_date()?,
        commit_dates: repo.commit_dates()?,
    })
}
