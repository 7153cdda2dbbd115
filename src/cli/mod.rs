//! CLI module
//!
//! Command-line interface over the SDK.
//!
//! # Commands
//!
//! - `videos list` - List videos, one page or (with `--all`) every page
//! - `videos get` - Show one video
//! - `videos update` - Edit a video
//! - `videos delete` - Delete a video
//! - `rate-limit` - Show the quota reported by the API

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, VideoCommands};
pub use runner::Runner;
