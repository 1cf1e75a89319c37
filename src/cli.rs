use crate::patterns::Pattern;
use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bugfix-timing")]
#[command(version)]
#[command(about = "Track bug-fix attempts and whether interesting clock times bring better luck")]
pub struct Args {
    /// Data file holding the attempt history (overrides config and environment)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// TOML config file (defaults to ./bugfix-timing.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Record the outcome of a bug-fix attempt
    Log(LogArgs),

    /// Show which patterns a time has, without recording anything
    Check {
        /// Time to analyze (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Show aggregate statistics and the hypothesis verdict
    Stats {
        /// Emit the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the most recent attempts
    Recent {
        /// Number of attempts to show (defaults to the configured limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Only attempts that showed this pattern (e.g. palindrome, mirror-hour-minute)
        #[arg(short, long, value_parser = Pattern::from_str_loose)]
        pattern: Option<Pattern>,
    },

    /// Analyze all 86,400 seconds of a day for pattern frequency
    Distribution {
        /// Emit the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a set of sample attempts mixing interesting and boring times
    Seed,

    /// Print shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ClapArgs, Debug, PartialEq)]
#[command(group(ArgGroup::new("outcome").required(true).args(["success", "failure"])))]
pub struct LogArgs {
    /// The fix worked
    #[arg(long, short = 's')]
    pub success: bool,

    /// The fix did not work
    #[arg(long, short = 'f')]
    pub failure: bool,

    /// What was being fixed
    #[arg(long, short = 'd', default_value = "Bug fix attempt")]
    pub description: String,

    /// When the attempt happened (defaults to now)
    #[arg(long)]
    pub at: Option<String>,
}

impl LogArgs {
    pub fn successful(&self) -> bool {
        self.success && !self.failure
    }
}

/// Default `tracing` filter for a `-v` count.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "bugfix_timing=warn",
        1 => "bugfix_timing=info",
        _ => "bugfix_timing=debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_log_success() {
        let args = Args::parse_from(["bft", "log", "--success", "-d", "Fixed typo"]);
        match args.command {
            Command::Log(log) => {
                assert!(log.successful());
                assert_eq!(log.description, "Fixed typo");
                assert!(log.at.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(args.data_file.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_parse_log_failure_default_description() {
        let args = Args::parse_from(["bft", "log", "-f", "--at", "12:21:00"]);
        assert_eq!(
            args.command,
            Command::Log(LogArgs {
                success: false,
                failure: true,
                description: "Bug fix attempt".to_string(),
                at: Some("12:21:00".to_string()),
            })
        );
    }

    #[test]
    fn test_args_log_requires_outcome() {
        assert!(Args::try_parse_from(["bft", "log"]).is_err());
    }

    #[test]
    fn test_args_log_rejects_both_outcomes() {
        assert!(Args::try_parse_from(["bft", "log", "-s", "-f"]).is_err());
    }

    #[test]
    fn test_args_global_flags_after_subcommand() {
        let args = Args::parse_from(["bft", "stats", "--json", "--data-file", "x.json", "-vv"]);
        assert_eq!(args.command, Command::Stats { json: true });
        assert_eq!(args.data_file, Some(PathBuf::from("x.json")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_args_recent_limit() {
        let args = Args::parse_from(["bft", "recent", "-n", "3"]);
        assert_eq!(
            args.command,
            Command::Recent {
                limit: Some(3),
                pattern: None
            }
        );
    }

    #[test]
    fn test_args_recent_pattern_parsed_loosely() {
        let args = Args::parse_from(["bft", "recent", "--pattern", "Mirror-Hour-Minute"]);
        assert_eq!(
            args.command,
            Command::Recent {
                limit: None,
                pattern: Some(Pattern::MirrorHourMinute)
            }
        );
        assert!(Args::try_parse_from(["bft", "recent", "-p", "sum_is_prime"]).is_err());
    }

    #[test]
    fn test_args_completions_shell() {
        let args = Args::parse_from(["bft", "completions", "bash"]);
        assert_eq!(args.command, Command::Completions { shell: Shell::Bash });
    }

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(log_filter(0), "bugfix_timing=warn");
        assert_eq!(log_filter(1), "bugfix_timing=info");
        assert_eq!(log_filter(5), "bugfix_timing=debug");
    }

    #[test]
    fn test_command_tree_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
