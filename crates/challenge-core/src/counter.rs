//! The persisted day counter: a single integer naming the next day to work on.

use crate::error::{ChallengeError, Result};
use crate::io;
use std::path::Path;

/// Read the counter. Content that is not a positive integer reads as day 1.
pub fn read(path: &Path) -> Result<u32> {
    if !path.exists() {
        return Err(ChallengeError::CounterMissing(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(parse(&raw))
}

/// Read the counter, creating it at day 1 when it does not exist yet.
pub fn read_or_init(path: &Path) -> Result<u32> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "initializing day counter");
        write(path, 1)?;
        return Ok(1);
    }
    read(path)
}

pub fn write(path: &Path, day: u32) -> Result<()> {
    io::atomic_write(path, day.to_string().as_bytes())
}

fn parse(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(day) if day >= 1 => day,
        _ => {
            tracing::warn!(content = raw.trim(), "day counter is not a positive integer, using 1");
            1
        }
    }
}
