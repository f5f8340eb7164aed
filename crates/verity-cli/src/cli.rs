//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use verity_store::LeaderboardSort;

/// Verity - Research and score health influencers' public claims.
#[derive(Debug, Parser)]
#[command(name = "verity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file path
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Perplexity API key (overrides the config file)
    #[arg(long, global = true, env = "VERITY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Research an influencer by name and save the result
    Find(FindArgs),

    /// Ask the provider for new influencers to research
    Discover(DiscoverArgs),

    /// Rank stored influencers
    Leaderboard(LeaderboardArgs),

    /// Show a stored influencer and their claims
    Show(ShowArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the find command.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// Influencer name or handle
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Research without saving
    #[arg(long)]
    pub dry_run: bool,
}

impl FindArgs {
    /// The query words joined into one string.
    pub fn query(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for the discover command.
#[derive(Debug, Args)]
pub struct DiscoverArgs {
    /// Research without saving
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the leaderboard command.
#[derive(Debug, Args)]
pub struct LeaderboardArgs {
    /// Ranking key
    #[arg(short, long, value_enum, default_value = "trust")]
    pub sort: SortArg,

    /// Maximum number of rows
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the show command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Influencer handle or record id
    pub influencer: String,
}

/// Arguments for configuration management.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,

    /// Store the Perplexity API key
    SetKey {
        /// API key
        key: String,
    },

    /// Set the research model
    SetModel {
        /// Model name
        model: String,
    },

    /// Set the maximum claims researched per influencer
    MaxClaims {
        /// Claim count (at least 1)
        count: usize,
    },

    /// Add or replace a trusted source
    AddSource {
        /// Source id, e.g. "pubmed"
        id: String,
        /// Display name, e.g. "PubMed Central"
        name: String,
    },

    /// Remove a trusted source
    RemoveSource {
        /// Source id
        id: String,
    },
}

/// Leaderboard sort argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortArg {
    /// Share of verified claims
    Trust,
    /// Follower count
    Followers,
    /// Number of verified claims
    Verified,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<SortArg> for LeaderboardSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Trust => LeaderboardSort::TrustScore,
            SortArg::Followers => LeaderboardSort::Followers,
            SortArg::Verified => LeaderboardSort::Verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_joins_query() {
        let cli = Cli::parse_from(["verity", "find", "Andrew", "Huberman", "--dry-run"]);
        match cli.command {
            Command::Find(args) => {
                assert_eq!(args.query(), "Andrew Huberman");
                assert!(args.dry_run);
            }
            _ => panic!("Expected Find command"),
        }
    }

    #[test]
    fn test_find_requires_query() {
        assert!(Cli::try_parse_from(["verity", "find"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["verity", "leaderboard", "--sort", "followers", "-f", "json", "-vv"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Leaderboard(args) => {
                assert!(matches!(LeaderboardSort::from(args.sort), LeaderboardSort::Followers));
            }
            _ => panic!("Expected Leaderboard command"),
        }
    }

    #[test]
    fn test_config_actions() {
        let cli = Cli::parse_from(["verity", "config", "add-source", "pubmed", "PubMed Central"]);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::AddSource { id, name },
            }) => {
                assert_eq!(id, "pubmed");
                assert_eq!(name, "PubMed Central");
            }
            _ => panic!("Expected config add-source"),
        }

        let cli = Cli::parse_from(["verity", "config", "max-claims", "5"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::MaxClaims { count: 5 }
            })
        ));
    }
}
