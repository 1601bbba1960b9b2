//! I/O boundary traits for testability
//!
//! These traits abstract the terminal and the filesystem, allowing the game
//! session and the scenario loader to run against scripted implementations.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// How a console message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Section header
    Header,
    /// Story text
    Narration,
    /// A clue was collected
    Clue,
    /// Good news: conviction, new clue
    Success,
    /// Recoverable mistake by the player
    Warning,
    /// Indented detail line
    Detail,
}

/// Interaction layer used by the game session.
pub trait Console {
    /// Ask for the next move. `Ok(None)` means input is exhausted.
    fn read_direction(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Ask for the accused suspect. `Ok(None)` means input is exhausted.
    fn read_accusation(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Show a message.
    fn say(&mut self, tone: Tone, message: &str) -> io::Result<()>;
}

/// Apply terminal colors for a tone. Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE.
pub fn paint(tone: Tone, message: &str) -> String {
    match tone {
        Tone::Header => message.cyan().bold().to_string(),
        Tone::Narration => message.to_string(),
        Tone::Clue => format!("{} {}", "🔎".yellow(), message.yellow()),
        Tone::Success => format!("{} {}", "✓".green(), message.green()),
        Tone::Warning => format!("{}: {}", "Warning".yellow(), message),
        Tone::Detail => format!("  {}", message),
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Console on stdin/stdout.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{} ", prompt.cyan())?;
        stdout.flush()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
        }
    }
}

impl Console for TerminalConsole {
    fn read_direction(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.read_line(prompt)
    }

    fn read_accusation(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.read_line(prompt)
    }

    fn say(&mut self, tone: Tone, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{}", paint(tone, message))
    }
}

/// Console fed from pre-recorded answers; keeps a transcript of everything said.
///
/// Moves and accusations are separate queues, so a script may hold an accusation
/// without any moves.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    moves: VecDeque<String>,
    accusations: VecDeque<String>,
    transcript: Vec<(Tone, String)>,
    echo: bool,
}

impl ScriptedConsole {
    pub fn new<M, A>(moves: M, accusations: A) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            moves: moves.into_iter().map(Into::into).collect(),
            accusations: accusations.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
            echo: false,
        }
    }

    /// Also print prompts, answers and messages to stdout.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn transcript(&self) -> &[(Tone, String)] {
        &self.transcript
    }

    /// Transcript lines without tones.
    pub fn lines(&self) -> Vec<&str> {
        self.transcript.iter().map(|(_, line)| line.as_str()).collect()
    }

    fn answer(&mut self, prompt: &str, answer: Option<String>) -> io::Result<Option<String>> {
        if self.echo {
            let shown = answer.as_deref().unwrap_or("<end of script>");
            println!("{} {}", prompt.cyan(), shown);
        }
        Ok(answer)
    }
}

impl Console for ScriptedConsole {
    fn read_direction(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let answer = self.moves.pop_front();
        self.answer(prompt, answer)
    }

    fn read_accusation(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let answer = self.accusations.pop_front();
        self.answer(prompt, answer)
    }

    fn say(&mut self, tone: Tone, message: &str) -> io::Result<()> {
        if self.echo {
            println!("{}", paint(tone, message));
        }
        self.transcript.push((tone, message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_script_when_reading_then_queues_are_independent() {
        let mut console = ScriptedConsole::new(["e", "d"], ["Carlos"]);
        assert_eq!(console.read_accusation("?").unwrap().as_deref(), Some("Carlos"));
        assert_eq!(console.read_direction("?").unwrap().as_deref(), Some("e"));
        assert_eq!(console.read_direction("?").unwrap().as_deref(), Some("d"));
        assert_eq!(console.read_direction("?").unwrap(), None);
        assert_eq!(console.read_accusation("?").unwrap(), None);
    }

    #[test]
    fn given_messages_when_saying_then_recorded_in_order() {
        let mut console = ScriptedConsole::new(Vec::<String>::new(), Vec::<String>::new());
        console.say(Tone::Header, "Mansion").unwrap();
        console.say(Tone::Clue, "knife").unwrap();
        assert_eq!(console.lines(), ["Mansion", "knife"]);
        assert_eq!(console.transcript()[1].0, Tone::Clue);
    }

    #[test]
    fn given_plain_tone_when_painting_then_unchanged() {
        assert_eq!(paint(Tone::Narration, "You are in the hall"), "You are in the hall");
        assert!(paint(Tone::Detail, "x").starts_with("  "));
    }
}
