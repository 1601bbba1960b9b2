//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Mansion mystery: explore rooms, collect clues, accuse a suspect
#[derive(Parser, Debug)]
#[command(name = "detective-quest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr (repeat for more: -d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a case (interactive unless moves or an accusation are given)
    Play {
        /// Scenario file (default: configured scenario or the built-in mansion)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        scenario: Option<PathBuf>,
        /// Scripted moves, e.g. "e,d,s" (e/l = left, d/r = right, s/q = stop)
        #[arg(short, long, value_delimiter = ',')]
        moves: Option<Vec<String>>,
        /// Scripted accusation
        #[arg(short, long)]
        accuse: Option<String>,
    },

    /// Show the room map as a tree
    Map {
        /// Scenario file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        scenario: Option<PathBuf>,
    },

    /// List clues and the suspects they point at
    Suspects {
        /// Scenario file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        scenario: Option<PathBuf>,
    },

    /// Work with scenario files
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommands,
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
pub enum ScenarioCommands {
    /// Print an example scenario file
    Template,

    /// Validate a scenario file
    Check {
        /// Scenario file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the built-in scenario as TOML
    Export,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Print a template config file
    Template,

    /// Show config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_scripted_play_when_parsing_then_splits_moves() {
        let cli = Cli::try_parse_from([
            "detective-quest",
            "-dd",
            "play",
            "--moves",
            "e,d,s",
            "--accuse",
            "Carlos",
        ])
        .unwrap();
        assert_eq!(cli.debug, 2);
        match cli.command {
            Some(Commands::Play { moves, accuse, .. }) => {
                assert_eq!(moves.unwrap(), ["e", "d", "s"]);
                assert_eq!(accuse.as_deref(), Some("Carlos"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
