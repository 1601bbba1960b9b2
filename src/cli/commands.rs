//! Command dispatch: load settings and scenarios, then hand off to the game session

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{GameSession, Scenario};
use crate::cli::args::{Cli, Commands, ConfigCommands, ScenarioCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::{Console, RealFileSystem, ScriptedConsole, TerminalConsole};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Play {
            scenario,
            moves,
            accuse,
        }) => _play(scenario.as_deref(), moves.as_deref(), accuse.as_deref()),
        Some(Commands::Map { scenario }) => _map(scenario.as_deref()),
        Some(Commands::Suspects { scenario }) => _suspects(scenario.as_deref()),
        Some(Commands::Scenario { command }) => match command {
            ScenarioCommands::Template => {
                output::info(&Scenario::template());
                Ok(())
            }
            ScenarioCommands::Check { file } => _scenario_check(file),
            ScenarioCommands::Export => {
                output::info(&Scenario::mansion().to_toml()?);
                Ok(())
            }
        },
        Some(Commands::Config { command }) => _config(command),
        // handled in main
        Some(Commands::Completion { .. }) => Ok(()),
        None => _play(None, None, None),
    }
}

/// Pick the scenario: command line, then configured file, then the built-in mansion.
fn resolve_scenario(explicit: Option<&Path>, settings: &Settings) -> CliResult<Scenario> {
    match explicit.or(settings.scenario.as_deref()) {
        Some(path) => {
            debug!("scenario file: {}", path.display());
            Ok(Scenario::load(&RealFileSystem, path)?)
        }
        None => {
            debug!("using built-in scenario");
            Ok(Scenario::mansion())
        }
    }
}

#[instrument]
fn _play(scenario: Option<&Path>, moves: Option<&[String]>, accuse: Option<&str>) -> CliResult<()> {
    let settings = Settings::load()?;
    let scenario = resolve_scenario(scenario, &settings)?;

    let scripted = moves.is_some() || accuse.is_some();
    let mut scripted_console;
    let mut terminal_console;
    let console: &mut dyn Console = if scripted {
        scripted_console = ScriptedConsole::new(
            moves.unwrap_or_default().iter().cloned(),
            accuse.map(str::to_string),
        )
        .with_echo(true);
        &mut scripted_console
    } else {
        terminal_console = TerminalConsole;
        &mut terminal_console
    };

    let conclusion = GameSession::new(console)
        .reveal_suspects(settings.reveal_suspects)
        .play(&scenario)?;
    debug!(
        accused = %conclusion.accused,
        tally = conclusion.tally,
        verdict = %conclusion.verdict,
        "game over"
    );
    Ok(())
}

#[instrument]
fn _map(scenario: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load()?;
    let scenario = resolve_scenario(scenario, &settings)?;
    let map = scenario.build_map()?;

    output::header(&scenario.title);
    output::info(&map.to_tree_string());
    output::detail(&format!(
        "{} rooms, depth {}, {} dead ends",
        map.len(),
        map.depth(),
        map.leaf_names().len()
    ));
    Ok(())
}

#[instrument]
fn _suspects(scenario: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load()?;
    let scenario = resolve_scenario(scenario, &settings)?;
    let index = scenario.build_index();

    output::header(&format!("{} ({} clues)", scenario.title, index.len()));
    for (clue, suspect) in index.entries() {
        output::action(suspect, &clue);
    }
    Ok(())
}

#[instrument]
fn _scenario_check(file: &Path) -> CliResult<()> {
    let scenario = Scenario::load(&RealFileSystem, file)?;
    for warning in scenario.check()? {
        output::warning(&warning);
    }

    let map = scenario.build_map()?;
    let index = scenario.build_index();
    output::success(&format!(
        "{}: {} rooms, {} clues, {} suspects",
        scenario.title,
        map.len(),
        index.len(),
        index.suspects().len()
    ));
    Ok(())
}

#[instrument]
fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "cannot determine config directory (no home directory?)".to_string(),
                ))
            }
        },
    }
    Ok(())
}
