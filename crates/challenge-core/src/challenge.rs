//! Day/phase/week arithmetic over a variable-length phase structure.
//!
//! Every position is derived from the absolute day number and the
//! [`ChallengeConfig`]; nothing here touches the filesystem.

use crate::error::{ChallengeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// ChallengeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub name: String,
    pub dir: String,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeConfig {
    /// Keyed by phase number; JSON stores the keys as strings ("1", "2", ...).
    pub phases: BTreeMap<u32, PhaseConfig>,
    pub days_per_week: u32,
    pub total_days: u32,
    /// Fixed phase length from the original 5x100 layout. Only consulted when
    /// a phase entry has no `days` of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_per_phase: Option<u32>,
}

pub const LEGACY_DAYS_PER_PHASE: u32 = 100;
pub const DEFAULT_DAYS_PER_WEEK: u32 = 6;

impl Default for ChallengeConfig {
    fn default() -> Self {
        let phases = [
            ("Ruby Backend", "phase1_ruby"),
            ("Python Data Analysis", "phase2_python"),
            ("JavaScript Frontend", "phase3_javascript"),
            ("Full-Stack Projects", "phase4_fullstack"),
            ("ML Finance Applications", "phase5_ml_finance"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (name, dir))| {
            (
                i as u32 + 1,
                PhaseConfig {
                    name: name.to_string(),
                    dir: dir.to_string(),
                    days: LEGACY_DAYS_PER_PHASE,
                },
            )
        })
        .collect::<BTreeMap<_, _>>();
        let total_days = phases.values().map(|p| p.days).sum();
        Self {
            phases,
            days_per_week: DEFAULT_DAYS_PER_WEEK,
            total_days,
            days_per_phase: None,
        }
    }
}

// ---------------------------------------------------------------------------
// DayPosition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPosition {
    pub absolute_day: u32,
    pub phase: u32,
    pub day_in_phase: u32,
    pub week_in_phase: u32,
    pub phase_dir: String,
    pub phase_name: String,
    /// True when `absolute_day` lies past `total_days` and was resolved into
    /// the last phase.
    pub beyond_end: bool,
}

impl DayPosition {
    pub fn week_formatted(&self) -> String {
        format_week(self.week_in_phase)
    }
}

/// Zero-padded two digit week label used in directory and log file names.
pub fn format_week(week_in_phase: u32) -> String {
    format!("{week_in_phase:02}")
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

impl ChallengeConfig {
    pub fn phase(&self, phase: u32) -> Result<&PhaseConfig> {
        self.phases
            .get(&phase)
            .ok_or_else(|| ChallengeError::ConfigInvalid(format!("phase {phase} is not defined")))
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Sum of the day counts of all phases before `phase`, saturating at
    /// `u32::MAX`.
    pub fn days_before_phase(&self, phase: u32) -> u32 {
        self.phases
            .range(..phase)
            .fold(0u32, |acc, (_, p)| acc.saturating_add(p.days))
    }

    /// Absolute day on which `phase` ends.
    pub fn phase_end_day(&self, phase: u32) -> Result<u32> {
        self.days_before_phase(phase)
            .checked_add(self.phase(phase)?.days)
            .ok_or_else(day_overflow)
    }

    /// Resolve an absolute day into its phase and week.
    ///
    /// Days past the end of the last phase stay in the last phase with
    /// `day_in_phase` counting on, so logging keeps working after completion.
    pub fn locate(&self, absolute_day: u32) -> Result<DayPosition> {
        if absolute_day < 1 {
            return Err(ChallengeError::InvalidDay(i64::from(absolute_day)));
        }
        if self.days_per_week == 0 {
            return Err(ChallengeError::ConfigInvalid(
                "days_per_week must be at least 1".to_string(),
            ));
        }

        let mut before = 0u32;
        let mut found = None;
        for (&number, phase) in &self.phases {
            let end = before.checked_add(phase.days).ok_or_else(day_overflow)?;
            if absolute_day <= end {
                found = Some((number, phase, before, false));
                break;
            }
            before = end;
        }

        let (number, phase, before, beyond_end) = match found {
            Some(hit) => hit,
            None => {
                let (&number, phase) = self.phases.iter().next_back().ok_or_else(|| {
                    ChallengeError::ConfigInvalid("no phases configured".to_string())
                })?;
                (number, phase, before - phase.days, true)
            }
        };

        let day_in_phase = absolute_day - before;
        Ok(DayPosition {
            absolute_day,
            phase: number,
            day_in_phase,
            week_in_phase: (day_in_phase - 1) / self.days_per_week + 1,
            phase_dir: phase.dir.clone(),
            phase_name: phase.name.clone(),
            beyond_end,
        })
    }

    /// Absolute first and last day of a week within a phase. The last week of
    /// a phase may be short; its end is clamped to the phase's final day.
    pub fn week_day_range(&self, phase: u32, week_in_phase: u32) -> Result<(u32, u32)> {
        if week_in_phase < 1 {
            return Err(ChallengeError::InvalidDay(i64::from(week_in_phase)));
        }
        let offset = self.days_before_phase(phase);
        let phase_end = self.phase_end_day(phase)?;
        let end_of_week = |week: u32| {
            week.checked_mul(self.days_per_week)
                .and_then(|d| d.checked_add(offset))
                .ok_or_else(day_overflow)
        };
        let start = end_of_week(week_in_phase - 1)?.checked_add(1).ok_or_else(day_overflow)?;
        let full_end = end_of_week(week_in_phase)?;
        // Weeks past the phase's end (only reachable for days beyond the
        // challenge) keep their full span.
        let end = if start > phase_end {
            full_end
        } else {
            full_end.min(phase_end)
        };
        Ok((start, end))
    }

    /// Week number counted from day 1 of the challenge, ignoring phases.
    pub fn overall_week(&self, absolute_day: u32) -> u32 {
        (absolute_day.saturating_sub(1)) / self.days_per_week.max(1) + 1
    }

    /// 1-based position of a day within its overall week.
    pub fn day_in_week(&self, absolute_day: u32) -> u32 {
        (absolute_day.saturating_sub(1)) % self.days_per_week.max(1) + 1
    }
}

fn day_overflow() -> ChallengeError {
    ChallengeError::ConfigInvalid("phase day counts overflow the day range".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
