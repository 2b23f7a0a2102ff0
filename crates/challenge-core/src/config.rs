use crate::challenge::{ChallengeConfig, LEGACY_DAYS_PER_PHASE};
use crate::error::{ChallengeError, Result};
use crate::io;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: &str = "3.0.0";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub name: String,
    #[serde(default)]
    pub github_username: String,
    #[serde(default)]
    pub github_email: String,
    #[serde(default)]
    pub use_github: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRepoType {
    Local,
    Github,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub base_dir: PathBuf,
    pub bin_dir: PathBuf,
    /// Name or URL of a separate repository for the weekly logs.
    #[serde(default)]
    pub log_repo: String,
    #[serde(default = "default_log_repo_type")]
    pub log_repo_type: LogRepoType,
    /// Root of the weekly logs; empty means `<base_dir>/logs`.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_repo_type() -> LogRepoType {
    LogRepoType::Local
}

impl PathsConfig {
    pub fn log_root(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => self.base_dir.join(crate::paths::LOGS_DIR),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub editor: String,
    pub use_tmux: bool,
    pub auto_push: bool,
    pub display_colors: bool,
    /// Weekday names (`"Sun"`, `"saturday"`, ...) on which `start` refuses to
    /// open a new day.
    #[serde(default = "default_rest_days")]
    pub rest_days: Vec<String>,
}

fn default_rest_days() -> Vec<String> {
    vec!["Sun".to_string()]
}

impl Preferences {
    pub fn is_rest_day(&self, weekday: chrono::Weekday) -> bool {
        self.rest_days
            .iter()
            .filter_map(|d| d.parse::<chrono::Weekday>().ok())
            .any(|d| d == weekday)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installation {
    pub install_date: String,
    pub last_updated: String,
}

impl Installation {
    pub fn install_date(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(&self.install_date, "%Y-%m-%d").ok()
    }
}

/// Where a loaded [`Config`] came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    #[default]
    Defaults,
    /// The file existed but could not be parsed; defaults were used.
    Malformed,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    pub user: UserConfig,
    pub paths: PathsConfig,
    pub preferences: Preferences,
    pub installation: Installation,
    pub challenge: ChallengeConfig,
    #[serde(skip)]
    pub source: ConfigSource,
}

impl Config {
    /// Built-in configuration for a user whose home directory is `home`.
    pub fn defaults(home: &Path) -> Self {
        let today = today();
        Self {
            version: CONFIG_VERSION.to_string(),
            user: UserConfig {
                name: std::env::var("USER").unwrap_or_else(|_| "User".to_string()),
                github_username: String::new(),
                github_email: String::new(),
                use_github: false,
            },
            paths: PathsConfig {
                base_dir: home.join("projects").join("6-7-coding-challenge"),
                bin_dir: home.join("bin"),
                log_repo: String::new(),
                log_repo_type: LogRepoType::Local,
                log_dir: None,
            },
            preferences: Preferences {
                editor: detect_editor(),
                use_tmux: which::which("tmux").is_ok(),
                auto_push: true,
                display_colors: true,
                rest_days: default_rest_days(),
            },
            installation: Installation {
                install_date: today.clone(),
                last_updated: today,
            },
            challenge: ChallengeConfig::default(),
            source: ConfigSource::Defaults,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Load `path` merged over the defaults.
    ///
    /// A missing file yields the defaults. A file that is not valid JSON, or
    /// whose merged values have the wrong types, also yields the defaults
    /// (with `source == Malformed`) rather than an error.
    pub fn load(path: &Path, home: &Path) -> Result<Self> {
        let defaults = Self::defaults(home);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(defaults);
        }

        let data = std::fs::read_to_string(path)?;
        match Self::from_json(&data, &defaults) {
            Ok(mut config) => {
                config.source = ConfigSource::File;
                Ok(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "config file is malformed, using defaults");
                Ok(Self {
                    source: ConfigSource::Malformed,
                    ..defaults
                })
            }
        }
    }

    fn from_json(data: &str, defaults: &Self) -> Result<Self> {
        let overlay: Value = serde_json::from_str(data)?;
        let mut merged = serde_json::to_value(defaults)?;

        // Phases from the file replace the default phases as a whole.
        let own_phases = overlay.pointer("/challenge/phases").cloned();
        let own_total = overlay.pointer("/challenge/total_days").is_some();

        deep_merge(&mut merged, overlay);

        if let Some(mut phases) = own_phases {
            let fallback = merged
                .pointer("/challenge/days_per_phase")
                .and_then(Value::as_u64)
                .unwrap_or(u64::from(LEGACY_DAYS_PER_PHASE));
            fill_phase_days(&mut phases, fallback);
            if let Some(slot) = merged.pointer_mut("/challenge/phases") {
                *slot = phases;
            }
            if !own_total {
                let sum: u64 = merged
                    .pointer("/challenge/phases")
                    .and_then(Value::as_object)
                    .map(|m| {
                        m.values()
                            .filter_map(|p| p.get("days").and_then(Value::as_u64))
                            .sum()
                    })
                    .unwrap_or(0);
                if let Some(slot) = merged.pointer_mut("/challenge/total_days") {
                    *slot = Value::from(sum.min(u64::from(u32::MAX)));
                }
            }
        }

        Ok(serde_json::from_value(merged)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut data = serde_json::to_string_pretty(self)?;
        data.push('\n');
        io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    /// Set a dotted key such as `preferences.auto_push` from its string form.
    ///
    /// `true`/`false`, integers and decimals are converted; anything else is
    /// stored as a string. Stamps `installation.last_updated`.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<()> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ChallengeError::UnknownConfigKey {
                key: key.to_string(),
                reason: "empty key segment".to_string(),
            });
        }

        let mut current = serde_json::to_value(&*self)?;
        let section = segments[0];
        if current.get(section).is_none() {
            return Err(ChallengeError::UnknownConfigKey {
                key: key.to_string(),
                reason: format!("no config section '{section}'"),
            });
        }

        let mut overlay = parse_value(raw);
        for segment in segments.iter().rev() {
            let mut map = Map::new();
            map.insert((*segment).to_string(), overlay);
            overlay = Value::Object(map);
        }
        deep_merge(&mut current, overlay);

        let mut updated: Config =
            serde_json::from_value(current).map_err(|e| ChallengeError::UnknownConfigKey {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        updated.installation.last_updated = today();
        updated.source = self.source;
        *self = updated;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut error = |message: String| {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message,
            })
        };
        let challenge = &self.challenge;

        if challenge.phases.is_empty() {
            error("challenge.phases is empty".to_string());
        }
        for (expected, (&number, phase)) in (1u32..).zip(&challenge.phases) {
            if number != expected {
                error(format!(
                    "phase numbers must be contiguous from 1: found {number}, expected {expected}"
                ));
                break;
            }
            if phase.days == 0 {
                error(format!("phase {number} has no days"));
            }
        }
        if challenge.days_per_week == 0 {
            error("days_per_week must be at least 1".to_string());
        }
        let sum: u64 = challenge.phases.values().map(|p| u64::from(p.days)).sum();
        if sum != u64::from(challenge.total_days) {
            error(format!(
                "total_days is {} but the phases add up to {sum}",
                challenge.total_days
            ));
        }

        if challenge.days_per_week > 7 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "days_per_week is {} (more than a calendar week)",
                    challenge.days_per_week
                ),
            });
        }
        for (number, phase) in &challenge.phases {
            if phase.dir.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("phase {number} has an empty directory name"),
                });
            }
        }
        for day in &self.preferences.rest_days {
            if day.parse::<chrono::Weekday>().is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unrecognized rest day '{day}'"),
                });
            }
        }
        if self.paths.log_repo_type == LogRepoType::Github && self.paths.log_repo.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "log_repo_type is github but log_repo is empty".to_string(),
            });
        }

        warnings
    }

    /// Fail with `ConfigInvalid` if validation reports any error.
    pub fn ensure_valid(&self) -> Result<()> {
        let errors: Vec<String> = self
            .validate()
            .into_iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| w.message)
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ChallengeError::ConfigInvalid(errors.join("; ")))
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Merge `overlay` into `base`: objects merge key by key, every other value
/// in the overlay replaces the one in `base`.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) if slot.is_object() && value.is_object() => deep_merge(slot, value),
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn fill_phase_days(phases: &mut Value, fallback: u64) {
    if let Some(map) = phases.as_object_mut() {
        for phase in map.values_mut().filter_map(Value::as_object_mut) {
            phase
                .entry("days")
                .or_insert_with(|| Value::from(fallback));
        }
    }
}

fn parse_value(raw: &str) -> Value {
    match raw.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if raw.contains('.') {
        if let Ok(f) = raw.parse::<f64>() {
            return Value::from(f);
        }
    }
    Value::String(raw.to_string())
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// First editor found on `PATH`, then `$EDITOR`, then `vim`.
pub fn detect_editor() -> String {
    ["nvim", "vim", "code", "emacs", "nano"]
        .into_iter()
        .find(|e| which::which(e).is_ok())
        .map(str::to_string)
        .or_else(|| std::env::var("EDITOR").ok())
        .unwrap_or_else(|| "vim".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
