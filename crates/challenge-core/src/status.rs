//! Progress, schedule and streak figures behind `challenge status`.

use crate::challenge::DayPosition;
use crate::config::Config;
use crate::error::Result;
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Repository facts gathered by the caller (usually via [`crate::git::Git`]).
#[derive(Debug, Clone, Default)]
pub struct GitFacts {
    pub has_changes: bool,
    pub last_commit: Option<NaiveDate>,
    /// Distinct commit dates, any order.
    pub commit_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GitSummary {
    pub clean: bool,
    pub last_commit: Option<NaiveDate>,
    pub days_since_commit: Option<i64>,
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Milestone {
    pub day: u32,
    pub label: String,
    pub days_remaining: u32,
    pub target_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub current_day: u32,
    pub total_days: u32,
    pub days_completed: u32,
    pub days_remaining: u32,
    pub percent_complete: f64,
    pub position: DayPosition,
    pub phase_count: usize,
    pub phase_days: u32,
    pub overall_week: u32,
    pub day_in_week: u32,
    pub days_per_week: u32,
    pub start_date: NaiveDate,
    pub elapsed_days: i64,
    pub expected_day: i64,
    /// Positive when ahead of schedule, negative when behind.
    pub schedule_delta: i64,
    pub estimated_completion: NaiveDate,
    pub milestones: Vec<Milestone>,
    pub git: Option<GitSummary>,
}

impl StatusReport {
    pub fn build(
        config: &Config,
        current_day: u32,
        today: NaiveDate,
        git: Option<GitFacts>,
    ) -> Result<Self> {
        let challenge = &config.challenge;
        let position = challenge.locate(current_day)?;
        let dpw = challenge.days_per_week.max(1);
        let total_days = challenge.total_days;

        let days_completed = current_day - 1;
        let days_remaining = total_days.saturating_sub(days_completed);
        let percent_complete = if total_days == 0 {
            0.0
        } else {
            (f64::from(days_completed) / f64::from(total_days) * 1000.0).round() / 10.0
        };

        let start_date = config
            .installation
            .install_date()
            .unwrap_or_else(|| today - Days::new(u64::from(days_completed)));
        let elapsed_days = (today - start_date).num_days();
        let elapsed_weeks = elapsed_days.div_euclid(7);
        let expected_day =
            elapsed_weeks * i64::from(dpw) + elapsed_days.rem_euclid(7).min(i64::from(dpw));
        let schedule_delta = i64::from(days_completed) - expected_day;

        let estimated_completion = if schedule_delta < 0 && elapsed_weeks > 0 && days_completed > 0
        {
            // Behind schedule: project the pace actually achieved so far.
            let pace = f64::from(days_completed) / elapsed_weeks as f64;
            let weeks = (f64::from(days_remaining) / pace).ceil() as u64;
            today + Days::new(weeks * 7)
        } else {
            on_schedule_date(today, days_remaining, dpw)
        };

        let mut milestones = Vec::new();
        for &phase in challenge.phases.keys() {
            let end = challenge.phase_end_day(phase)?;
            if end >= current_day && end < total_days {
                milestones.push(milestone(end, format!("Phase {phase} Complete"), current_day, today, dpw));
            }
        }
        if current_day <= total_days {
            milestones.push(milestone(
                total_days,
                "Challenge Complete".to_string(),
                current_day,
                today,
                dpw,
            ));
        }

        let git = git.map(|facts| GitSummary {
            clean: !facts.has_changes,
            last_commit: facts.last_commit,
            days_since_commit: facts.last_commit.map(|d| (today - d).num_days()),
            current_streak: current_streak(&facts.commit_dates, today),
            longest_streak: longest_streak(&facts.commit_dates),
        });

        Ok(Self {
            current_day,
            total_days,
            days_completed,
            days_remaining,
            percent_complete,
            phase_count: challenge.phase_count(),
            phase_days: challenge.phase(position.phase)?.days,
            overall_week: challenge.overall_week(current_day),
            day_in_week: challenge.day_in_week(current_day),
            days_per_week: dpw,
            position,
            start_date,
            elapsed_days,
            expected_day,
            schedule_delta,
            estimated_completion,
            milestones,
            git,
        })
    }
}

/// Calendar date after `days` more working days at `dpw` days per week.
fn on_schedule_date(today: NaiveDate, days: u32, dpw: u32) -> NaiveDate {
    let offset = (days / dpw) * 7 + days % dpw;
    today + Days::new(u64::from(offset))
}

fn milestone(day: u32, label: String, current_day: u32, today: NaiveDate, dpw: u32) -> Milestone {
    let days_remaining = day - current_day + 1;
    Milestone {
        day,
        label,
        days_remaining,
        target_date: on_schedule_date(today, days_remaining, dpw),
    }
}

/// Consecutive commit days ending today.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while dates.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive commit days.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut sorted = dates.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for date in sorted {
        run = match prev {
            Some(p) if (date - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn config(install: &str) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::defaults(dir.path());
        cfg.installation.install_date = install.to_string();
        (dir, cfg)
    }

    #[test]
    fn progress_figures() {
        let (_dir, cfg) = config("2026-01-05");
        let report = StatusReport::build(&cfg, 51, d(2026, 2, 2), None).unwrap();
        assert_eq!(report.days_completed, 50);
        assert_eq!(report.days_remaining, 450);
        assert_eq!(report.percent_complete, 10.0);
        assert_eq!(report.position.phase, 1);
        assert_eq!(report.overall_week, 9);
        assert_eq!(report.day_in_week, 3);
        assert_eq!(report.phase_days, 100);
    }

    #[test]
    fn schedule_delta_counts_working_days() {
        // Four full weeks since install: 24 working days expected.
        let (_dir, cfg) = config("2026-01-05");
        let today = d(2026, 2, 2);

        let on_track = StatusReport::build(&cfg, 25, today, None).unwrap();
        assert_eq!(on_track.expected_day, 24);
        assert_eq!(on_track.schedule_delta, 0);

        let ahead = StatusReport::build(&cfg, 28, today, None).unwrap();
        assert_eq!(ahead.schedule_delta, 3);

        let behind = StatusReport::build(&cfg, 13, today, None).unwrap();
        assert_eq!(behind.schedule_delta, -12);
        // 12 days done in 4 weeks = 3/week; 488 remaining -> 163 weeks.
        assert_eq!(behind.estimated_completion, today + Days::new(163 * 7));
    }

    #[test]
    fn completion_on_schedule() {
        let (_dir, cfg) = config("2026-01-05");
        let today = d(2026, 1, 5);
        let report = StatusReport::build(&cfg, 1, today, None).unwrap();
        // 500 days = 83 weeks + 2 days.
        assert_eq!(report.estimated_completion, today + Days::new(83 * 7 + 2));
    }

    #[test]
    fn missing_install_date_is_inferred() {
        let (_dir, cfg) = config("");
        let today = d(2026, 3, 1);
        let report = StatusReport::build(&cfg, 11, today, None).unwrap();
        assert_eq!(report.start_date, d(2026, 2, 19));
    }

    #[test]
    fn milestones_list_remaining_phase_ends() {
        let (_dir, cfg) = config("2026-01-05");
        let report = StatusReport::build(&cfg, 150, d(2026, 6, 1), None).unwrap();
        let days: Vec<u32> = report.milestones.iter().map(|m| m.day).collect();
        assert_eq!(days, vec![200, 300, 400, 500]);
        assert_eq!(report.milestones[0].label, "Phase 2 Complete");
        assert_eq!(report.milestones[0].days_remaining, 51);
        assert_eq!(report.milestones[3].label, "Challenge Complete");
    }

    #[test]
    fn finished_challenge_has_no_milestones() {
        let (_dir, cfg) = config("2026-01-05");
        let report = StatusReport::build(&cfg, 501, d(2027, 9, 1), None).unwrap();
        assert!(report.milestones.is_empty());
        assert_eq!(report.days_remaining, 0);
        assert!(report.position.beyond_end);
    }

    #[test]
    fn streaks() {
        let today = d(2026, 1, 10);
        let dates = vec![
            d(2026, 1, 1),
            d(2026, 1, 2),
            d(2026, 1, 3),
            d(2026, 1, 4),
            d(2026, 1, 8),
            d(2026, 1, 9),
            d(2026, 1, 10),
        ];
        assert_eq!(current_streak(&dates, today), 3);
        assert_eq!(longest_streak(&dates), 4);
        assert_eq!(current_streak(&dates, d(2026, 1, 11)), 0);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn git_summary_is_derived() {
        let (_dir, cfg) = config("2026-01-05");
        let today = d(2026, 1, 7);
        let facts = GitFacts {
            has_changes: true,
            last_commit: Some(d(2026, 1, 6)),
            commit_dates: vec![d(2026, 1, 5), d(2026, 1, 6)],
        };
        let git = StatusReport::build(&cfg, 3, today, Some(facts))
            .unwrap()
            .git
            .unwrap();
        assert!(!git.clean);
        assert_eq!(git.days_since_commit, Some(1));
        assert_eq!(git.current_streak, 0);
        assert_eq!(git.longest_streak, 2);
    }
}
