//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::RawSettings;

/// Command-line client for the brig.gs URL shortener
#[derive(Parser, Debug)]
#[command(name = "brig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file (default: ~/.config/brig/config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// API token (overrides BRIG_API_TOKEN and the config file)
    #[arg(long, global = true)]
    pub api_token: Option<String>,

    /// Base URL of the shortener service (overrides BRIG_BASE_URL and the config file)
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Command-line layer of the settings.
    pub fn flags(&self) -> RawSettings {
        RawSettings {
            api_token: self.api_token.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all links
    List {
        /// Print the raw JSON response instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Check whether a short link exists (redirect is not followed)
    Get {
        /// Short ID, may be namespaced (e.g. yt/video)
        short_id: String,
    },

    /// Add a new short link
    Add {
        /// Short ID to use
        short_id: String,
        /// Target URL to map to
        #[arg(value_hint = ValueHint::Url)]
        target_url: String,
    },

    /// Delete a short link
    Delete {
        /// Short ID to delete
        short_id: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config (token masked)
    Show,

    /// Show config file path
    Path,

    /// Create config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_list_with_short_json_flag_when_parsing_then_sets_json() {
        let cli = Cli::try_parse_from(["brig", "list", "-j"]).unwrap();
        assert!(matches!(cli.command, Commands::List { json: true }));
    }

    #[test]
    fn given_global_flags_after_subcommand_when_parsing_then_accepts_them() {
        let cli = Cli::try_parse_from([
            "brig",
            "get",
            "yt/video",
            "--api-token",
            "t0k3n",
            "--base-url",
            "http://localhost:8787",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let flags = cli.flags();
        assert_eq!(flags.api_token.as_deref(), Some("t0k3n"));
        assert_eq!(flags.base_url.as_deref(), Some("http://localhost:8787"));
        match cli.command {
            Commands::Get { short_id } => assert_eq!(short_id, "yt/video"),
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn given_add_without_target_when_parsing_then_fails() {
        assert!(Cli::try_parse_from(["brig", "add", "gh/repo"]).is_err());
    }

    #[test]
    fn given_zero_timeout_when_parsing_then_rejects() {
        assert!(Cli::try_parse_from(["brig", "--timeout", "0", "list"]).is_err());
        let cli = Cli::try_parse_from(["brig", "--timeout", "1", "list"]).unwrap();
        assert_eq!(cli.timeout, Some(1));
    }

    #[test]
    fn given_config_init_force_when_parsing_then_sets_force() {
        let cli = Cli::try_parse_from(["brig", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Init { force: true }
            }
        ));
    }
}
