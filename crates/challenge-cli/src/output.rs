use colored::Colorize;
use serde::Serialize;
use std::io::{BufRead, Write};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn success(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().green());
}

pub fn info(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().blue());
}

pub fn warning(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().yellow());
}

/// Bold label followed by a plain value, e.g. `Phase: 2/5`.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{} {}", label.bold(), value);
}

/// Ask a question on stdout and read one line from stdin. End of input
/// reads as an empty answer.
pub fn prompt(question: &str) -> anyhow::Result<String> {
    print!("{question}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// `(y/n)` confirmation; only `y`/`yes` count as consent.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{question} (y/n): "))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Fixed-width bar: `=` for completed days, one `>` marker, spaces after.
pub fn progress_bar(done: u32, total: u32, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((f64::from(done) / f64::from(total)) * width as f64).round() as usize
    };
    let filled = filled.min(width);
    let remaining = width - filled;
    format!(
        "[{}{}{}]",
        "=".repeat(filled).green(),
        ">".repeat(remaining.min(1)).yellow(),
        " ".repeat(remaining.saturating_sub(1))
    )
}
