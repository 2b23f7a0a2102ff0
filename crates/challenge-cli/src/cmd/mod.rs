pub mod config;
pub mod init;
pub mod log;
pub mod push;
pub mod start;
pub mod status;
