pub mod challenge;
pub mod config;
pub mod counter;
pub mod error;
pub mod git;
pub mod io;
pub mod markdown;
pub mod paths;
pub mod progress_log;
pub mod scaffold;
pub mod status;

pub use error::{ChallengeError, Result};
