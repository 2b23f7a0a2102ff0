//! Thin wrapper over the `git` binary for the challenge repository.
//!
//! Every call shells out with the repository as working directory and
//! parses plain stdout; there is no libgit binding.

use crate::error::{ChallengeError, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

pub const DEFAULT_REMOTE: &str = "origin";

pub fn available() -> bool {
    which::which("git").is_ok()
}

#[derive(Debug, Clone)]
pub struct Git {
    dir: PathBuf,
}

impl Git {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_repo(&self) -> bool {
        self.dir.join(".git").exists()
    }

    pub fn init(&self) -> Result<()> {
        self.run_ok(&["init", "--quiet"]).map(drop)
    }

    pub fn add_all(&self) -> Result<()> {
        self.run_ok(&["add", "."]).map(drop)
    }

    /// True if the working tree or index differs from HEAD (or anything is
    /// untracked).
    pub fn has_changes(&self) -> Result<bool> {
        let out = self.run_ok(&["status", "--porcelain"])?;
        Ok(!out.trim().is_empty())
    }

    /// Commit staged changes. Returns false when there was nothing to commit.
    pub fn commit(&self, message: &str) -> Result<bool> {
        if !self.has_changes()? {
            return Ok(false);
        }
        self.run_ok(&["commit", "--quiet", "-m", message])?;
        Ok(true)
    }

    pub fn has_remote(&self, name: &str) -> Result<bool> {
        let out = self.run_ok(&["remote"])?;
        Ok(out.lines().any(|l| l.trim() == name))
    }

    pub fn push(&self, remote: &str) -> Result<()> {
        self.run_ok(&["push", remote, "HEAD"]).map(drop)
    }

    /// Date of the most recent commit, or `None` in a repository without
    /// commits.
    pub fn last_commit_date(&self) -> Result<Option<NaiveDate>> {
        let out = self.run(&["log", "-1", "--format=%cd", "--date=short"])?;
        if !out.status.success() {
            return Ok(None);
        }
        Ok(parse_dates(&String::from_utf8_lossy(&out.stdout)).into_iter().next())
    }

    /// Distinct commit dates, oldest first.
    pub fn commit_dates(&self) -> Result<Vec<NaiveDate>> {
        let out = self.run(&["log", "--format=%cd", "--date=short"])?;
        if !out.status.success() {
            return Ok(Vec::new());
        }
        let mut dates = parse_dates(&String::from_utf8_lossy(&out.stdout));
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(dir = %self.dir.display(), ?args, "git");
        Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ChallengeError::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                message: e.to_string(),
            })
    }

    fn run_ok(&self, args: &[&str]) -> Result<String> {
        let out = self.run(args)?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let stdout = String::from_utf8_lossy(&out.stdout);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(ChallengeError::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                message,
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

fn parse_dates(out: &str) -> Vec<NaiveDate> {
    out.lines()
        .filter_map(|l| NaiveDate::parse_from_str(l.trim(), "%Y-%m-%d").ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_dates_skips_garbage() {
        let dates = parse_dates("2026-01-05\n\nnot a date\n2026-01-03\n");
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn plain_directory_is_not_a_repo() {
        let dir = TempDir::new().unwrap();
        assert!(!Git::new(dir.path()).is_repo());
    }

    #[test]
    fn init_and_inspect_empty_repo() {
        if !available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let git = Git::new(dir.path());
        git.init().unwrap();
        assert!(git.is_repo());
        assert!(!git.has_changes().unwrap());
        assert_eq!(git.last_commit_date().unwrap(), None);
        assert!(git.commit_dates().unwrap().is_empty());
        assert!(!git.has_remote(DEFAULT_REMOTE).unwrap());

        std::fs::write(dir.path().join("notes.md"), "x").unwrap();
        assert!(git.has_changes().unwrap());
    }
}
