#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// A throwaway home directory holding the config, the counter and the
/// challenge tree.
struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Env with a config pointing at `<tmp>/challenge`, no rest days and no
    /// colors.
    fn configured() -> Self {
        let env = Self::new();
        env.write_config(&serde_json::json!({
            "paths": { "base_dir": env.base() },
            "preferences": {
                "display_colors": false,
                "use_tmux": false,
                "auto_push": false,
                "rest_days": []
            }
        }));
        env
    }

    fn write_config(&self, value: &serde_json::Value) {
        std::fs::write(self.config(), serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join(".cc-config.json")
    }

    fn counter(&self) -> PathBuf {
        self.dir.path().join(".cc-current-day")
    }

    fn base(&self) -> PathBuf {
        self.dir.path().join("challenge")
    }

    fn set_day(&self, day: u32) {
        std::fs::write(self.counter(), day.to_string()).unwrap();
    }

    fn day(&self) -> String {
        std::fs::read_to_string(self.counter()).unwrap().trim().to_string()
    }

    fn readme(&self, week: &str, day: u32) -> PathBuf {
        self.base()
            .join("phase1_ruby")
            .join(format!("week{week}"))
            .join(format!("day{day}"))
            .join("README.md")
    }

    fn week_log(&self, week: &str) -> PathBuf {
        self.base().join("logs/phase1").join(format!("week{week}.md"))
    }

    fn challenge(&self) -> Command {
        let mut cmd = Command::cargo_bin("challenge").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("CHALLENGE_CONFIG", self.config())
            .env("CHALLENGE_COUNTER", self.counter())
            .env("GIT_AUTHOR_NAME", "Test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "Test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .env_remove("RUST_LOG");
        cmd
    }

    fn start(&self) {
        self.challenge().args(["start", "--no-launch"]).assert().success();
    }

    fn write_focus(&self, day: u32, focus: &str) {
        let path = self.readme("01", day);
        let doc = std::fs::read_to_string(&path).unwrap();
        let updated = doc.replacen("## Today's Focus\n", &format!("## Today's Focus\n{focus}\n"), 1);
        std::fs::write(&path, updated).unwrap();
    }
}

// ---------------------------------------------------------------------------
// challenge init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_base_and_counter() {
    let env = Env::new();
    env.challenge()
        .args(["init", "--base-dir"])
        .arg(env.base())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));

    assert!(env.config().is_file());
    assert!(env.base().is_dir());
    assert!(env.base().join("logs").is_dir());
    assert_eq!(env.day(), "1");

    let config: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(env.config()).unwrap()).unwrap();
    assert_eq!(config["paths"]["base_dir"], env.base().display().to_string());
    assert_eq!(config["challenge"]["total_days"], 500);
}

#[test]
fn init_keeps_existing_config_and_counter() {
    let env = Env::configured();
    env.set_day(42);
    let before = std::fs::read_to_string(env.config()).unwrap();

    env.challenge().arg("init").assert().success();

    assert_eq!(std::fs::read_to_string(env.config()).unwrap(), before);
    assert_eq!(env.day(), "42");
}

// ---------------------------------------------------------------------------
// challenge start
// ---------------------------------------------------------------------------

#[test]
fn start_scaffolds_current_day() {
    let env = Env::configured();
    env.challenge().arg("init").assert().success();

    env.challenge()
        .args(["start", "--no-launch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Setting up Day 1"));

    let readme = std::fs::read_to_string(env.readme("01", 1)).unwrap();
    assert!(readme.starts_with("# Day 1 - Phase 1: Ruby Backend (Week 01)"));
    assert!(readme.contains("## Progress Log\n- Started: "));

    let log = std::fs::read_to_string(env.week_log("01")).unwrap();
    assert!(log.starts_with("# Week 01 (Days 1-6)"));
    assert!(log.contains("## Daily Logs"));
}

#[test]
fn start_keeps_existing_readme() {
    let env = Env::configured();
    env.set_day(1);
    std::fs::create_dir_all(env.base()).unwrap();
    env.start();
    env.write_focus(1, "- keep me");

    env.challenge()
        .args(["start", "--no-launch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Using existing README"));

    let readme = std::fs::read_to_string(env.readme("01", 1)).unwrap();
    assert!(readme.contains("- keep me"));
}

#[test]
fn start_requires_base_dir() {
    let env = Env::configured();
    env.set_day(1);
    env.challenge()
        .args(["start", "--no-launch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("challenge init"));
}

// ---------------------------------------------------------------------------
// challenge log
// ---------------------------------------------------------------------------

fn started_env() -> Env {
    let env = Env::configured();
    env.challenge().arg("init").assert().success();
    env.start();
    env
}

#[test]
fn log_copies_readme_sections() {
    let env = started_env();
    env.write_focus(1, "- build a parser");

    env.challenge()
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress for Day 1 successfully logged"));

    let log = std::fs::read_to_string(env.week_log("01")).unwrap();
    assert!(log.contains("### Day 1\n"));
    assert!(log.contains("#### Today's Focus:"));
    assert!(log.contains("- build a parser"));
    assert!(log.contains("#### Progress Log:"));
    assert!(!log.contains("<!--"));
    assert!(log.ends_with('\n'));
}

#[test]
fn log_declined_leaves_file_untouched() {
    let env = started_env();
    env.challenge().arg("log").assert().success();
    let before = std::fs::read_to_string(env.week_log("01")).unwrap();

    env.write_focus(1, "- changed my mind");
    env.challenge()
        .arg("log")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation canceled."));

    assert_eq!(std::fs::read_to_string(env.week_log("01")).unwrap(), before);
}

#[test]
fn log_confirmed_replaces_entry() {
    let env = started_env();
    env.challenge().arg("log").assert().success();

    env.write_focus(1, "- second draft");
    env.challenge()
        .arg("log")
        .write_stdin("y\n")
        .assert()
        .success();

    let log = std::fs::read_to_string(env.week_log("01")).unwrap();
    assert_eq!(log.matches("### Day 1\n").count(), 1);
    assert!(log.contains("- second draft"));
}

#[test]
fn log_force_is_idempotent() {
    let env = started_env();
    env.write_focus(1, "- steady");
    env.challenge().args(["log", "--force"]).assert().success();
    let first = std::fs::read(env.week_log("01")).unwrap();

    env.challenge().args(["log", "1", "--force"]).assert().success();
    assert_eq!(std::fs::read(env.week_log("01")).unwrap(), first);
}

#[test]
fn log_orders_entries_by_day() {
    let env = started_env();
    env.set_day(3);
    env.start();
    env.challenge().arg("log").assert().success();
    env.challenge().args(["log", "1"]).assert().success();

    let log = std::fs::read_to_string(env.week_log("01")).unwrap();
    let day1 = log.find("### Day 1\n").unwrap();
    let day3 = log.find("### Day 3\n").unwrap();
    assert!(day1 < day3);
}

#[test]
fn log_rejects_future_day() {
    let env = started_env();
    env.challenge()
        .args(["log", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("future day 5"));
}

#[test]
fn log_rejects_non_positive_day() {
    let env = started_env();
    for day in ["0", "-1"] {
        env.challenge()
            .args(["log", day])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid day number"));
    }
}

#[test]
fn log_requires_readme() {
    let env = Env::configured();
    env.challenge().arg("init").assert().success();
    env.challenge()
        .arg("log")
        .assert()
        .failure()
        .stderr(predicate::str::contains("source document not found"));
    assert!(!env.week_log("01").exists());
}

#[test]
fn log_requires_counter() {
    let env = Env::configured();
    env.challenge()
        .arg("log")
        .assert()
        .failure()
        .stderr(predicate::str::contains("day counter not found"));
}

// ---------------------------------------------------------------------------
// challenge push
// ---------------------------------------------------------------------------

#[test]
fn push_advances_counter() {
    let env = started_env();
    env.challenge()
        .args(["push", "--no-push", "-m", "Day one done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day counter incremented to 2"));
    assert_eq!(env.day(), "2");
}

#[test]
fn push_at_week_end_prepares_next_week() {
    let env = started_env();
    env.set_day(6);
    env.start();

    env.challenge()
        .args(["push", "--no-push", "-m", "end of week"])
        .assert()
        .success();

    assert_eq!(env.day(), "7");
    assert!(env.base().join("phase1_ruby/week02").is_dir());
}

#[test]
fn push_requires_todays_readme() {
    let env = Env::configured();
    env.challenge().arg("init").assert().success();
    env.challenge()
        .args(["push", "--no-push"])
        .assert()
        .failure();
    assert_eq!(env.day(), "1");
}

// ---------------------------------------------------------------------------
// challenge status
// ---------------------------------------------------------------------------

#[test]
fn status_json_reports_position() {
    let env = Env::configured();
    env.challenge().arg("init").assert().success();
    env.set_day(107);

    let out = env.challenge().args(["status", "--json"]).output().unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    assert_eq!(report["current_day"], 107);
    assert_eq!(report["days_completed"], 106);
    assert_eq!(report["days_remaining"], 394);
    assert_eq!(report["position"]["phase"], 2);
    assert_eq!(report["position"]["day_in_phase"], 7);
    assert_eq!(report["position"]["week_in_phase"], 2);
    assert_eq!(report["position"]["phase_dir"], "phase2_python");
}

#[test]
fn status_text_shows_progress() {
    let env = Env::configured();
    env.challenge().arg("init").assert().success();

    env.challenge()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current day: 1/500"))
        .stdout(predicate::str::contains("Phase: 1/5 (Ruby Backend)"));
}

// ---------------------------------------------------------------------------
// challenge config
// ---------------------------------------------------------------------------

#[test]
fn config_set_persists_typed_value() {
    let env = Env::configured();
    env.challenge()
        .args(["config", "set", "challenge.days_per_week=5"])
        .assert()
        .success();

    let out = env.challenge().args(["config", "show", "--json"]).output().unwrap();
    let config: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(config["challenge"]["days_per_week"], 5);
    assert_eq!(config["preferences"]["auto_push"], false);
}

#[test]
fn config_set_rejects_unknown_section() {
    let env = Env::configured();
    env.challenge()
        .args(["config", "set", "nope.key=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.key"));
}

#[test]
fn config_validate_flags_total_mismatch() {
    let env = Env::new();
    env.write_config(&serde_json::json!({
        "preferences": { "display_colors": false },
        "challenge": { "total_days": 7 }
    }));
    env.challenge()
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] total_days is 7"));
}

#[test]
fn config_custom_phases_drive_layout() {
    let env = Env::new();
    env.write_config(&serde_json::json!({
        "paths": { "base_dir": env.base() },
        "preferences": { "display_colors": false, "rest_days": [] },
        "challenge": {
            "days_per_week": 5,
            "phases": {
                "1": { "name": "Warmup", "dir": "warmup", "days": 10 },
                "2": { "name": "Main", "dir": "main", "days": 20 }
            }
        }
    }));
    env.challenge().arg("init").assert().success();
    env.set_day(12);
    env.start();

    assert!(env.base().join("main/week01/day12/README.md").is_file());
    assert!(env.base().join("logs/phase2/week01.md").is_file());
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let env = Env::new();
    std::fs::write(env.config(), "{ not json").unwrap();
    env.challenge()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("malformed"));
}

#[test]
fn config_set_refuses_to_overwrite_malformed_config() {
    let env = Env::new();
    std::fs::write(env.config(), "{ not json").unwrap();
    env.challenge()
        .args(["config", "set", "preferences.auto_push=false"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("malformed").and(predicate::str::contains("config reset")),
        );
    assert_eq!(std::fs::read_to_string(env.config()).unwrap(), "{ not json");
}

#[test]
fn config_reset_with_yes_writes_defaults() {
    let env = Env::configured();
    env.challenge()
        .args(["config", "reset", "--yes"])
        .assert()
        .success();
    let config: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(env.config()).unwrap()).unwrap();
    assert_eq!(config["preferences"]["rest_days"], serde_json::json!(["Sun"]));
}
