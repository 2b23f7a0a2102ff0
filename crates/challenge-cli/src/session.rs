use anyhow::Context;
use challenge_core::config::{Config, ConfigSource};
use challenge_core::{paths, ChallengeError};
use std::path::{Path, PathBuf};

use crate::output;

/// File locations for one invocation.
///
/// Priority for each file:
/// 1. `--config` / `--counter` flag or `CHALLENGE_CONFIG` / `CHALLENGE_COUNTER`
///    env var (passed in as `explicit`)
/// 2. `~/.cc-config.json` / `~/.cc-current-day`
#[derive(Debug, Clone)]
pub struct Locations {
    pub home: PathBuf,
    pub config: PathBuf,
    pub counter: PathBuf,
}

impl Locations {
    pub fn resolve(config: Option<&Path>, counter: Option<&Path>) -> anyhow::Result<Self> {
        let home = paths::home_dir().context("failed to locate home directory")?;
        Ok(Self {
            config: config
                .map(Path::to_path_buf)
                .unwrap_or_else(|| paths::config_path(&home)),
            counter: counter
                .map(Path::to_path_buf)
                .unwrap_or_else(|| paths::counter_path(&home)),
            home,
        })
    }
}

/// Loaded configuration plus the locations it came from.
pub struct Session {
    pub locations: Locations,
    pub config: Config,
}

impl Session {
    /// Load the config (falling back to defaults when it is missing or
    /// malformed) and apply the color preference.
    pub fn load(locations: Locations) -> anyhow::Result<Self> {
        let config =
            Config::load(&locations.config, &locations.home).context("failed to load config")?;
        if !config.preferences.display_colors {
            colored::control::set_override(false);
        }
        if config.source == ConfigSource::Malformed {
            output::warning(format!(
                "Warning: config file {} is malformed, using defaults",
                locations.config.display()
            ));
        }
        Ok(Self { locations, config })
    }

    /// Like [`Session::load`], then reject a challenge structure the
    /// calculator cannot work with.
    pub fn load_valid(locations: Locations) -> anyhow::Result<Self> {
        let session = Self::load(locations)?;
        session
            .config
            .ensure_valid()
            .with_context(|| format!("check {}", session.locations.config.display()))?;
        Ok(session)
    }

    pub fn base_dir(&self) -> &Path {
        &self.config.paths.base_dir
    }

    /// Fail with guidance when the challenge base directory is missing.
    pub fn require_base_dir(&self) -> anyhow::Result<()> {
        if !self.base_dir().is_dir() {
            return Err(ChallengeError::NotInitialized(self.base_dir().to_path_buf()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_paths_win() {
        let dir = TempDir::new().unwrap();
        let cfg = dir.path().join("cfg.json");
        let counter = dir.path().join("day");
        let loc = Locations::resolve(Some(&cfg), Some(&counter)).unwrap();
        assert_eq!(loc.config, cfg);
        assert_eq!(loc.counter, counter);
    }

    #[test]
    fn load_valid_rejects_bad_totals() {
        let dir = TempDir::new().unwrap();
        let cfg = dir.path().join("cfg.json");
        std::fs::write(
            &cfg,
            r#"{"preferences": {"display_colors": false}, "challenge": {"total_days": 7}}"#,
        )
        .unwrap();
        let loc = Locations::resolve(Some(&cfg), Some(&dir.path().join("day"))).unwrap();
        let err = Session::load_valid(loc).err().unwrap();
        assert!(format!("{err:#}").contains("total_days is 7"));
    }
}
