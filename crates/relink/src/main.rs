// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relink - a guided NVC conversation coach.
//!
//! This is the binary entry point: the HTTP server plus a few commands for
//! reading the local history and checking the configuration.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod history;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relink_config::RelinkConfig;

/// Relink - a guided NVC conversation coach.
#[derive(Parser, Debug)]
#[command(name = "relink", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// List saved conversations, newest first.
    History {
        /// Show at most this many conversations.
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List emotion check-ins.
    Checkins {
        /// Group the last seven days by calendar day.
        #[arg(long)]
        week: bool,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Query the health endpoint of a running server.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Inspect the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate the configuration and print the effective values.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> RelinkConfig {
    let result = match path {
        Some(path) => relink_config::load_and_validate_path(path),
        None => relink_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            relink_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::History { limit, json }) => history::run_history(&config, limit, json).await,
        Some(Commands::Checkins { week, json }) => history::run_checkins(&config, week, json).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Config {
            action: ConfigCommands::Check,
        }) => {
            print_config(&config);
            Ok(())
        }
        None => {
            println!("relink: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Prints the effective configuration with the API key masked.
fn print_config(config: &RelinkConfig) {
    let mut shown = config.clone();
    let key_present = shown.openai.resolved_api_key().is_some();
    shown.openai.api_key = key_present.then(|| "********".to_string());

    println!("relink: configuration is valid");
    match toml::to_string_pretty(&shown) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{shown:#?}"),
    }
    if let Some(warning) = relink_config::api_key_warning(&config.openai) {
        relink_config::render_errors(&[warning]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["relink", "history", "--limit", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::History {
                limit: Some(3),
                json: false
            })
        ));

        let cli = Cli::try_parse_from(["relink", "config", "check", "--config", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Check
            })
        ));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn checkins_week_flag() {
        let cli = Cli::try_parse_from(["relink", "checkins", "--week"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Checkins {
                week: true,
                json: false
            })
        ));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = relink_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.server.port, 3000);
    }
}
