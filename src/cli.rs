//! Command-line interface definitions for the newsletter.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The SMTP password can be supplied via a flag or environment variable;
//! when neither is present, the run prompts for it interactively before
//! sending (and only if there is anything to send).

use clap::Parser;

/// Command-line arguments for the newsletter pipeline.
///
/// # Examples
///
/// ```sh
/// # Default config and database locations
/// floydian_newsletter
///
/// # Explicit paths, password from the environment
/// SMTP_PASSWORD=... floydian_newsletter -c /etc/floydian/cfg.json -d /var/lib/floydian/aggregations.db
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "cfg.json")]
    pub config: String,

    /// Path to the SQLite database holding each source's latest delivered post
    #[arg(short, long, default_value = "aggregations.db")]
    pub database: String,

    /// SMTP password for the sender account (prompted for when absent)
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,
}
