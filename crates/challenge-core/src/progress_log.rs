//! Weekly progress logs.
//!
//! A weekly log is a markdown file with a title, a `## Week Overview` the
//! user edits by hand, and a `## Daily Logs` section holding one entry per
//! day in ascending order:
//!
//! ```text
//! # Week 01 (Days 1-6)
//!
//! ## Week Overview
//! ...
//!
//! ## Daily Logs
//!
//! ### Day 1
//! #### Today's Focus:
//! ...
//! ```
//!
//! [`reconcile`] copies the sections of a day's README into that day's
//! entry, replacing an older entry for the same day when forced.

use crate::challenge::{ChallengeConfig, DayPosition};
use crate::error::{ChallengeError, Result};
use crate::io;
use crate::markdown::{self, heading_level};
use serde::Serialize;
use std::ops::Range;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Source sections
// ---------------------------------------------------------------------------

/// A `## <title>` section of the daily README that is copied into the log.
#[derive(Debug, Clone, Copy)]
pub struct LogSection {
    pub title: &'static str,
    /// Older README templates used these headings for the same section.
    pub aliases: &'static [&'static str],
    /// Emitted even when missing or empty in the source.
    pub always: bool,
}

pub const LOG_SECTIONS: &[LogSection] = &[
    LogSection {
        title: "Today's Focus",
        aliases: &[],
        always: true,
    },
    LogSection {
        title: "Challenge Connection",
        aliases: &["Launch School Connection"],
        always: false,
    },
    LogSection {
        title: "Project Context",
        aliases: &[],
        always: false,
    },
    LogSection {
        title: "Tools & Technologies",
        aliases: &[],
        always: false,
    },
    LogSection {
        title: "Progress Log",
        aliases: &[],
        always: true,
    },
    LogSection {
        title: "Code Highlight",
        aliases: &[],
        always: false,
    },
    LogSection {
        title: "Challenges Faced",
        aliases: &[],
        always: false,
    },
    LogSection {
        title: "Learning Resources Used",
        aliases: &[],
        always: false,
    },
    LogSection {
        title: "Reflections",
        aliases: &[],
        always: false,
    },
    LogSection {
        title: "Tomorrow's Plan",
        aliases: &[],
        always: false,
    },
];

/// Sections of `doc` that belong in a log entry, in log order, as
/// `(heading, body)` pairs. The heading is the one the source used.
pub fn extract_log_sections(doc: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for section in LOG_SECTIONS {
        let found = std::iter::once(section.title)
            .chain(section.aliases.iter().copied())
            .find_map(|title| markdown::extract_section(doc, title).map(|body| (title, body)));

        match found {
            Some((title, body)) if !body.is_empty() || section.always => {
                out.push((title.to_string(), body));
            }
            None if section.always => out.push((section.title.to_string(), String::new())),
            _ => {}
        }
    }
    out
}

// ---------------------------------------------------------------------------
// DayHeading
// ---------------------------------------------------------------------------

/// Heading style of day entries. Early logs used `## Day N`; current logs
/// nest entries one level deeper under `## Daily Logs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayHeading {
    Legacy,
    #[default]
    Nested,
}

impl DayHeading {
    pub fn level(self) -> usize {
        match self {
            DayHeading::Legacy => 2,
            DayHeading::Nested => 3,
        }
    }

    pub fn render(self, day: u32) -> String {
        format!("{} Day {day}", "#".repeat(self.level()))
    }

    /// Day number if `line` is a day heading in this style.
    pub fn parse(self, line: &str) -> Option<u32> {
        if heading_level(line) != Some(self.level()) {
            return None;
        }
        let digits = line[self.level()..].trim().strip_prefix("Day ")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Style of an existing log: legacy only when it has `## Day N` entries
    /// and no nested ones.
    pub fn detect(content: &str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let fenced = markdown::fenced_lines(&lines);
        let has = |style: DayHeading| {
            lines
                .iter()
                .zip(&fenced)
                .any(|(l, &in_fence)| !in_fence && style.parse(l).is_some())
        };
        if has(DayHeading::Legacy) && !has(DayHeading::Nested) {
            DayHeading::Legacy
        } else {
            DayHeading::Nested
        }
    }
}

// ---------------------------------------------------------------------------
// Week file template
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekMeta {
    pub week_number: u32,
    pub week_start: u32,
    pub week_end: u32,
}

impl WeekMeta {
    /// Week number and absolute day span of the week containing `pos`.
    /// Past the end of the challenge the span is a full week, not clamped to
    /// the final day.
    pub fn for_position(challenge: &ChallengeConfig, pos: &DayPosition) -> Result<Self> {
        let (week_start, mut week_end) = challenge.week_day_range(pos.phase, pos.week_in_phase)?;
        if pos.beyond_end {
            let full = week_start.saturating_add(challenge.days_per_week.max(1) - 1);
            week_end = week_end.max(full).max(pos.absolute_day);
        }
        Ok(Self {
            week_number: pos.week_in_phase,
            week_start,
            week_end,
        })
    }
}

pub const DAILY_LOGS_HEADING: &str = "## Daily Logs";

pub fn week_template(week: &WeekMeta) -> String {
    format!(
        "# Week {:02} (Days {}-{})\n\
         \n\
         ## Week Overview\n\
         - **Focus**: \n\
         - **Challenge Connection**: \n\
         - **Weekly Goals**:\n  \
           - \n  \
           - \n  \
           - \n\
         \n\
         {DAILY_LOGS_HEADING}\n\
         \n",
        week.week_number, week.week_start, week.week_end
    )
}

/// Create the weekly log with its template if it does not exist yet.
/// Returns true if the file was created.
pub fn ensure_log_file(path: &Path, week: &WeekMeta) -> Result<bool> {
    let created = io::write_if_missing(path, week_template(week).as_bytes())?;
    if created {
        tracing::debug!(path = %path.display(), "created weekly log");
    }
    Ok(created)
}

// ---------------------------------------------------------------------------
// Entry layout
// ---------------------------------------------------------------------------

/// Lines of a rendered day entry, ending with one blank line.
///
/// Body lines outside code fences that would end the entry are escaped with
/// a backslash. A fence a section leaves open is closed.
pub fn render_entry(day: u32, sections: &[(String, String)], heading: DayHeading) -> Vec<String> {
    let mut lines = vec![heading.render(day)];
    for (title, body) in sections {
        lines.push(format!("#### {title}:"));
        let body: Vec<&str> = body.lines().collect();
        let fenced = markdown::fenced_lines(&body);
        for (line, in_fence) in body.iter().zip(fenced) {
            if !in_fence && ends_entry(line, heading) {
                lines.push(format!("\\{line}"));
            } else {
                lines.push((*line).to_string());
            }
        }
        if let Some(marker) = markdown::unclosed_fence(&body) {
            lines.push(marker.to_string());
        }
        lines.push(String::new());
    }
    lines
}

fn ends_entry(line: &str, heading: DayHeading) -> bool {
    heading.parse(line).is_some() || matches!(heading_level(line), Some(level) if level <= 2)
}

/// Indices of day headings outside code fences, with their day numbers.
fn day_headings(lines: &[String], fenced: &[bool], heading: DayHeading) -> Vec<(usize, u32)> {
    lines
        .iter()
        .enumerate()
        .filter(|&(i, _)| !fenced[i])
        .filter_map(|(i, l)| heading.parse(l).map(|n| (i, n)))
        .collect()
}

/// Line range of the entry for `day`: its heading up to (not including) the
/// next day heading or level-1/2 heading. Lines in code fences never start
/// or end an entry.
pub fn find_entry(lines: &[String], day: u32, heading: DayHeading) -> Option<Range<usize>> {
    let fenced = markdown::fenced_lines(lines);
    let start = day_headings(lines, &fenced, heading)
        .into_iter()
        .find(|&(_, n)| n == day)
        .map(|(i, _)| i)?;
    let end = (start + 1..lines.len())
        .find(|&i| !fenced[i] && ends_entry(&lines[i], heading))
        .unwrap_or(lines.len());
    Some(start..end)
}

/// Index at which the entry for `day` keeps the entries in ascending order:
/// before the first later day, else at the end of the daily logs section.
pub fn insertion_index(lines: &[String], day: u32, heading: DayHeading) -> usize {
    let fenced = markdown::fenced_lines(lines);
    let entries = day_headings(lines, &fenced, heading);

    if let Some(&(index, _)) = entries.iter().find(|&&(_, n)| n > day) {
        return index;
    }

    let anchor = entries.last().map(|&(i, _)| i).or_else(|| {
        (0..lines.len()).find(|&i| !fenced[i] && lines[i].trim_end() == DAILY_LOGS_HEADING)
    });
    let Some(anchor) = anchor else {
        return lines.len();
    };

    (anchor + 1..lines.len())
        .find(|&i| {
            !fenced[i]
                && heading.parse(&lines[i]).is_none()
                && matches!(heading_level(&lines[i]), Some(level) if level <= 2)
        })
        .unwrap_or(lines.len())
}

/// Merge a rendered entry into the log text. Any existing entry for the day
/// is replaced. Returns the new text and whether an entry was replaced.
pub fn merge_entry(log: &str, day: u32, entry: Vec<String>, heading: DayHeading) -> (String, bool) {
    let mut lines: Vec<String> = log.lines().map(str::to_string).collect();

    let replaced = match find_entry(&lines, day, heading) {
        Some(range) => {
            lines.drain(range);
            true
        }
        None => false,
    };

    let index = insertion_index(&lines, day, heading);
    let mut block = entry;
    if index > 0 && !lines[index - 1].trim().is_empty() {
        block.insert(0, String::new());
    }
    lines.splice(index..index, block);

    let mut lines = markdown::collapse_blank_lines(lines);
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    (text, replaced)
}

// ---------------------------------------------------------------------------
// reconcile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Replace an existing entry instead of failing with `EntryExists`.
    pub force: bool,
    /// Heading style to use; `None` detects it from the existing file.
    pub heading: Option<DayHeading>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub day: u32,
    pub log_path: PathBuf,
    pub created_log: bool,
    pub replaced: bool,
    pub heading: DayHeading,
}

/// Write the entry for `day` into the weekly log at `log_path`, built from
/// the README at `source`.
///
/// The log is created from the week template when missing. An existing
/// entry for `day` is an error unless `opts.force` is set, in which case
/// it is replaced in place. The file is left untouched on every error.
pub fn reconcile(
    day: u32,
    source: &Path,
    log_path: &Path,
    week: &WeekMeta,
    opts: &ReconcileOptions,
) -> Result<ReconcileReport> {
    if day < 1 {
        return Err(ChallengeError::InvalidDay(i64::from(day)));
    }
    if !source.is_file() {
        return Err(ChallengeError::SourceNotFound(source.to_path_buf()));
    }
    let doc = std::fs::read_to_string(source)?;

    let created_log = ensure_log_file(log_path, week)?;
    let log = std::fs::read_to_string(log_path)?;
    let heading = opts.heading.unwrap_or_else(|| DayHeading::detect(&log));

    let lines: Vec<String> = log.lines().map(str::to_string).collect();
    if !opts.force && find_entry(&lines, day, heading).is_some() {
        return Err(ChallengeError::EntryExists {
            day,
            path: log_path.to_path_buf(),
        });
    }

    let entry = render_entry(day, &extract_log_sections(&doc), heading);
    let (updated, replaced) = merge_entry(&log, day, entry, heading);
    io::atomic_write(log_path, updated.as_bytes())?;

    tracing::debug!(day, path = %log_path.display(), replaced, "reconciled log entry");
    Ok(ReconcileReport {
        day,
        log_path: log_path.to_path_buf(),
        created_log,
        replaced,
        heading,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
