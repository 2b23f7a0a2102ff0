use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("not initialized: run 'challenge init' first ({0} not found)")]
    NotInitialized(PathBuf),

    #[error("day counter not found at {0}: run 'challenge init' first")]
    CounterMissing(PathBuf),

    #[error("source document not found: {0} (initialize the day with 'challenge start')")]
    SourceNotFound(PathBuf),

    #[error("an entry for Day {day} already exists in {}", path.display())]
    EntryExists { day: u32, path: PathBuf },

    #[error("invalid day number {0}: days start from 1")]
    InvalidDay(i64),

    #[error("cannot log for future day {day}: current day is {current}")]
    FutureDay { day: u32, current: u32 },

    #[error("invalid challenge configuration: {0}")]
    ConfigInvalid(String),

    #[error("unknown or mistyped config key '{key}': {reason}")]
    UnknownConfigKey { key: String, reason: String },

    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChallengeError>;
