mod cmd;
mod output;
mod session;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use session::Locations;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "challenge",
    about = "Daily workflow for the 6/7 coding challenge: scaffold days, log progress, push, track status",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ~/.cc-config.json)
    #[arg(long, global = true, env = "CHALLENGE_CONFIG")]
    config: Option<PathBuf>,

    /// Day counter file (default: ~/.cc-current-day)
    #[arg(long, global = true, env = "CHALLENGE_COUNTER")]
    counter: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config, create the base directory and the day counter
    Init {
        /// Challenge base directory (default: ~/projects/6-7-coding-challenge)
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },

    /// Scaffold the current day and open it in the editor (ccstart)
    Start {
        /// Only create the files; do not launch the editor or tmux
        #[arg(long)]
        no_launch: bool,

        /// Start even on a configured rest day
        #[arg(long)]
        ignore_rest_day: bool,
    },

    /// Copy a day's README sections into its weekly log (cclog)
    Log {
        /// Day to log (default: the current day)
        #[arg(allow_negative_numbers = true)]
        day: Option<i64>,

        /// Replace an existing entry without asking
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Commit and push the day's work, then advance the day counter (ccpush)
    Push {
        /// Commit message (default: "Complete Day N - Phase P Week NN")
        #[arg(long, short = 'm')]
        message: Option<String>,

        /// Commit but never push
        #[arg(long)]
        no_push: bool,
    },

    /// Show progress, schedule and repository status (ccstatus)
    Status,

    /// View or change the configuration (ccconfig)
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = Locations::resolve(cli.config.as_deref(), cli.counter.as_deref()).and_then(
        |locations| match cli.command {
            Commands::Init { base_dir } => cmd::init::run(locations, base_dir, cli.json),
            Commands::Start {
                no_launch,
                ignore_rest_day,
            } => cmd::start::run(locations, no_launch, ignore_rest_day, cli.json),
            Commands::Log { day, force } => cmd::log::run(locations, day, force, cli.json),
            Commands::Push { message, no_push } => {
                cmd::push::run(locations, message, no_push, cli.json)
            }
            Commands::Status => cmd::status::run(locations, cli.json),
            Commands::Config { subcommand } => cmd::config::run(locations, subcommand, cli.json),
        },
    );

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
