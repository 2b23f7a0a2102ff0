use crate::output::{self, print_json};
use crate::session::{Locations, Session};
use anyhow::Context;
use challenge_core::config::{Config, ConfigSource, ConfigWarning, WarnLevel};
use clap::Subcommand;
use colored::Colorize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Set one value by dotted key, e.g. preferences.auto_push=false
    Set {
        /// KEY=VALUE
        #[arg(value_name = "KEY=VALUE")]
        assignment: String,
    },

    /// Replace the config with the defaults
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(locations: Locations, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(locations, json),
        ConfigSubcommand::Set { assignment } => set(locations, &assignment, json),
        ConfigSubcommand::Reset { yes } => reset(locations, yes, json),
        ConfigSubcommand::Validate => validate(locations, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(locations: Locations, json: bool) -> anyhow::Result<()> {
    let session = Session::load(locations)?;
    if json {
        return print_json(&session.config);
    }

    println!(
        "{} {}",
        "Configuration:".bold(),
        session.locations.config.display()
    );
    let value = serde_json::to_value(&session.config)?;
    if let Value::Object(sections) = value {
        for (section, body) in sections {
            match body {
                Value::Object(_) => {
                    println!();
                    println!("{}", format!("[{section}]").blue());
                    let mut lines = Vec::new();
                    flatten("", &body, &mut lines);
                    for (key, val) in lines {
                        println!("  {key} = {val}");
                    }
                }
                other => println!("{section} = {}", render(&other)),
            }
        }
    }
    Ok(())
}

/// Dotted `key = value` pairs for every leaf under `value`.
fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        leaf => out.push((prefix.to_string(), render(leaf))),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

fn set(locations: Locations, assignment: &str, json: bool) -> anyhow::Result<()> {
    let (key, raw) = assignment
        .split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| anyhow::anyhow!("expected KEY=VALUE, got '{assignment}'"))?;

    let mut session = Session::load(locations)?;
    if session.config.source == ConfigSource::Malformed {
        anyhow::bail!(
            "config file {} is malformed; fix it by hand or run 'challenge config reset'",
            session.locations.config.display()
        );
    }
    session.config.set_value(key, raw)?;
    session
        .config
        .save(&session.locations.config)
        .context("failed to write config")?;
    let warnings = session.config.validate();

    if json {
        return print_json(&serde_json::json!({
            "key": key,
            "value": raw,
            "warnings": warnings,
        }));
    }
    output::success(format!("Set {key} = {raw}"));
    print_warnings(&warnings);
    Ok(())
}

// ---------------------------------------------------------------------------
// reset
// ---------------------------------------------------------------------------

fn reset(locations: Locations, yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes && !output::confirm("Reset the configuration to defaults?")? {
        println!("Operation canceled.");
        return Ok(());
    }
    let config = Config::defaults(&locations.home);
    config
        .save(&locations.config)
        .context("failed to write config")?;

    if json {
        return print_json(&config);
    }
    output::success(format!(
        "Configuration reset to defaults: {}",
        locations.config.display()
    ));
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(locations: Locations, json: bool) -> anyhow::Result<()> {
    let session = Session::load(locations)?;
    let warnings = session.config.validate();

    if json {
        print_json(&serde_json::json!({
            "warnings": warnings,
        }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        print_warnings(&warnings);
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

fn print_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        match w.level {
            WarnLevel::Warning => println!("{} {}", "[warning]".yellow(), w.message),
            WarnLevel::Error => println!("{} {}", "[error]".red(), w.message),
        }
    }
}
