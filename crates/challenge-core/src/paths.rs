use crate::challenge::{format_week, DayPosition};
use crate::config::Config;
use crate::error::{ChallengeError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File name constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = ".cc-config.json";
pub const COUNTER_FILE: &str = ".cc-current-day";
pub const README_FILE: &str = "README.md";
pub const LOGS_DIR: &str = "logs";

// ---------------------------------------------------------------------------
// Home-relative defaults
// ---------------------------------------------------------------------------

pub fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or(ChallengeError::HomeNotFound)
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

pub fn counter_path(home: &Path) -> PathBuf {
    home.join(COUNTER_FILE)
}

// ---------------------------------------------------------------------------
// Challenge layout
// ---------------------------------------------------------------------------

/// `<base_dir>/<phase dir>/week<NN>`
pub fn week_dir(config: &Config, pos: &DayPosition) -> PathBuf {
    config
        .paths
        .base_dir
        .join(&pos.phase_dir)
        .join(format!("week{}", pos.week_formatted()))
}

/// `<base_dir>/<phase dir>/week<NN>/day<N>`
pub fn project_dir(config: &Config, pos: &DayPosition) -> PathBuf {
    week_dir(config, pos).join(format!("day{}", pos.absolute_day))
}

pub fn readme_path(config: &Config, pos: &DayPosition) -> PathBuf {
    project_dir(config, pos).join(README_FILE)
}

/// `<log root>/phase<P>`
pub fn phase_log_dir(config: &Config, phase: u32) -> PathBuf {
    config.paths.log_root().join(format!("phase{phase}"))
}

/// `<log root>/phase<P>/week<NN>.md`
pub fn log_file_path(config: &Config, phase: u32, week_in_phase: u32) -> PathBuf {
    phase_log_dir(config, phase).join(format!("week{}.md", format_week(week_in_phase)))
}
