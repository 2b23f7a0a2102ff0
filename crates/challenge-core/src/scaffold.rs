//! Directory and file scaffolding for a challenge day.

use crate::challenge::DayPosition;
use crate::config::Config;
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::progress_log::{self, WeekMeta};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct DayScaffold {
    pub position: DayPosition,
    pub project_dir: PathBuf,
    pub readme: PathBuf,
    pub log_file: PathBuf,
    pub created_readme: bool,
    pub created_log: bool,
}

/// README written for a new day. Every `## ` heading is one the log
/// reconciler knows how to copy; the comments are hints and never reach
/// the log.
pub fn readme_template(pos: &DayPosition, started: NaiveDateTime) -> String {
    format!(
        "# Day {day} - Phase {phase}: {name} (Week {week})

## Today's Focus
- [ ] Primary goal:
- [ ] Secondary goal:
- [ ] Stretch goal:

## Challenge Connection
<!-- Course or material this day builds on, and how it is applied. -->

## Project Context
<!-- What is being built and where it fits in the phase. -->

## Tools & Technologies
<!-- Languages, libraries and tools used today. -->

## Progress Log
- Started: {started}
-

## Code Highlight
<!-- A snippet worth remembering. -->

## Challenges Faced
<!-- What got in the way and how it was handled. -->

## Learning Resources Used
<!-- Docs, articles, videos. -->

## Reflections
-

## Tomorrow's Plan
<!-- First thing to pick up next session. -->
",
        day = pos.absolute_day,
        phase = pos.phase,
        name = pos.phase_name,
        week = pos.week_formatted(),
        started = started.format("%Y-%m-%d %H:%M"),
    )
}

/// Create the project directory, weekly log and README for `day`.
/// Existing files are left alone.
pub fn prepare_day(config: &Config, day: u32, now: NaiveDateTime) -> Result<DayScaffold> {
    let position = config.challenge.locate(day)?;
    let project_dir = paths::project_dir(config, &position);
    io::ensure_dir(&project_dir)?;

    let log_file = paths::log_file_path(config, position.phase, position.week_in_phase);
    let week = WeekMeta::for_position(&config.challenge, &position)?;
    let created_log = progress_log::ensure_log_file(&log_file, &week)?;

    let readme = project_dir.join(paths::README_FILE);
    let created_readme =
        io::write_if_missing(&readme, readme_template(&position, now).as_bytes())?;

    tracing::debug!(
        day,
        dir = %project_dir.display(),
        created_readme,
        created_log,
        "prepared day"
    );
    Ok(DayScaffold {
        position,
        project_dir,
        readme,
        log_file,
        created_readme,
        created_log,
    })
}

/// Directories created ahead of the day after `day` when it opens a new
/// week or phase.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NextWeek {
    pub week_dir: Option<PathBuf>,
    pub phase_log_dir: Option<PathBuf>,
}

pub fn prepare_next_week(config: &Config, day: u32) -> Result<NextWeek> {
    let current = config.challenge.locate(day)?;
    let next = config.challenge.locate(day + 1)?;

    let mut out = NextWeek::default();
    if next.phase == current.phase && next.week_in_phase == current.week_in_phase {
        return Ok(out);
    }

    let week_dir = paths::week_dir(config, &next);
    io::ensure_dir(&week_dir)?;
    out.week_dir = Some(week_dir);

    if next.phase != current.phase {
        let log_dir = paths::phase_log_dir(config, next.phase);
        io::ensure_dir(&log_dir)?;
        out.phase_log_dir = Some(log_dir);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress_log::{reconcile, ReconcileOptions};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn config(dir: &TempDir) -> Config {
        Config::defaults(dir.path())
    }

    #[test]
    fn prepare_day_creates_tree() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let s = prepare_day(&cfg, 8, now()).unwrap();

        assert!(s.created_readme);
        assert!(s.created_log);
        assert!(s.project_dir.ends_with("phase1_ruby/week02/day8"));
        let readme = std::fs::read_to_string(&s.readme).unwrap();
        assert!(readme.starts_with("# Day 8 - Phase 1: Ruby Backend (Week 02)\n"));
        assert!(readme.contains("- Started: 2026-01-05 09:30"));

        let log = std::fs::read_to_string(&s.log_file).unwrap();
        assert!(log.starts_with("# Week 02 (Days 7-12)\n"));
    }

    #[test]
    fn prepare_day_keeps_existing_readme() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let first = prepare_day(&cfg, 1, now()).unwrap();
        std::fs::write(&first.readme, "## Today's Focus\nmine\n").unwrap();

        let again = prepare_day(&cfg, 1, now()).unwrap();
        assert!(!again.created_readme);
        assert!(!again.created_log);
        assert_eq!(
            std::fs::read_to_string(&again.readme).unwrap(),
            "## Today's Focus\nmine\n"
        );
    }

    #[test]
    fn fresh_template_logs_only_focus_and_progress() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let s = prepare_day(&cfg, 1, now()).unwrap();
        let week = WeekMeta::for_position(&cfg.challenge, &s.position).unwrap();
        reconcile(1, &s.readme, &s.log_file, &week, &ReconcileOptions::default()).unwrap();

        let log = std::fs::read_to_string(&s.log_file).unwrap();
        assert!(log.contains("#### Today's Focus:\n- [ ] Primary goal:"));
        assert!(log.contains("#### Progress Log:\n- Started: 2026-01-05 09:30"));
        assert!(log.contains("#### Reflections:"));
        assert!(!log.contains("Code Highlight"));
        assert!(!log.contains("<!--"));
    }

    #[test]
    fn next_week_created_at_week_boundary() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);

        let mid = prepare_next_week(&cfg, 3).unwrap();
        assert!(mid.week_dir.is_none());

        let boundary = prepare_next_week(&cfg, 6).unwrap();
        let week_dir = boundary.week_dir.unwrap();
        assert!(week_dir.ends_with("phase1_ruby/week02"));
        assert!(week_dir.is_dir());
        assert!(boundary.phase_log_dir.is_none());
    }

    #[test]
    fn next_phase_gets_log_dir() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let next = prepare_next_week(&cfg, 100).unwrap();
        assert!(next.week_dir.unwrap().ends_with("phase2_python/week01"));
        assert!(next.phase_log_dir.unwrap().ends_with("logs/phase2"));
    }
}
