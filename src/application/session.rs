//! Game session: runs one investigation against a console.
//!
//! The session turns console input into investigation inputs and investigation
//! events into console messages. All game rules live in [`Investigation`].

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, Scenario};
use crate::domain::{
    Conclusion, Direction, DomainError, Exits, Investigation, Move, Phase, RoomEvent, Verdict,
    GUILTY_THRESHOLD,
};
use crate::infrastructure::{Console, Tone};

/// Drives a single game from the first room to the verdict.
pub struct GameSession<'c> {
    console: &'c mut dyn Console,
    reveal_suspects: bool,
}

impl<'c> GameSession<'c> {
    pub fn new(console: &'c mut dyn Console) -> Self {
        Self {
            console,
            reveal_suspects: true,
        }
    }

    /// List the known suspects before asking for the accusation.
    pub fn reveal_suspects(mut self, reveal: bool) -> Self {
        self.reveal_suspects = reveal;
        self
    }

    /// Play `scenario` to the end.
    ///
    /// Running out of moves ends the exploration; running out of input while an
    /// accusation is expected fails with [`ApplicationError::InputClosed`].
    #[instrument(level = "debug", skip_all, fields(title = %scenario.title))]
    pub fn play(&mut self, scenario: &Scenario) -> ApplicationResult<Conclusion> {
        let map = scenario.build_map()?;
        let index = scenario.build_index();

        self.say(Tone::Header, &format!("=== {} ===", scenario.title))?;
        let (mut investigation, first) = Investigation::start(map, index);
        self.narrate(&first)?;

        self.explore(&mut investigation)?;
        let conclusion = self.accuse(&mut investigation)?;
        self.report(&conclusion)?;
        Ok(conclusion)
    }

    fn explore(&mut self, investigation: &mut Investigation) -> ApplicationResult<()> {
        while investigation.phase() == Phase::Exploring {
            let prompt = direction_prompt(investigation.exits());
            let Some(token) = self
                .console
                .read_direction(&prompt)
                .with_context("read move")?
            else {
                debug!("no more moves, stopping exploration");
                investigation.advance(Direction::Stop)?;
                self.say(Tone::Narration, "Saindo da exploração...")?;
                break;
            };

            let direction = match token.parse::<Direction>() {
                Ok(direction) => direction,
                Err(e) => {
                    self.say(Tone::Warning, &format!("Opção inválida! {e}"))?;
                    continue;
                }
            };

            match investigation.advance(direction) {
                Ok(Move::Entered(event)) => self.narrate(&event)?,
                Ok(Move::Stopped { room }) => {
                    self.say(Tone::Narration, &format!("Saindo da exploração em {room}..."))?
                }
                Err(DomainError::InvalidDirection { room, direction }) => {
                    let side = match direction {
                        Direction::Left => "à esquerda",
                        _ => "à direita",
                    };
                    self.say(
                        Tone::Warning,
                        &format!("Não existe sala {side} de {room}!"),
                    )?;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn accuse(&mut self, investigation: &mut Investigation) -> ApplicationResult<Conclusion> {
        self.say(Tone::Header, "Pistas coletadas:")?;
        if investigation.ledger().is_empty() {
            self.say(Tone::Detail, "(nenhuma)")?;
        }
        for clue in investigation.ledger() {
            self.say(Tone::Detail, clue)?;
        }

        if self.reveal_suspects {
            let suspects = investigation.suspects().suspects().join(", ");
            self.say(Tone::Narration, &format!("Suspeitos: {suspects}"))?;
        }

        loop {
            let answer = self
                .console
                .read_accusation("Quem é o culpado?")
                .with_context("read accusation")?
                .ok_or(ApplicationError::InputClosed)?;

            match investigation.accuse(&answer) {
                Ok(conclusion) => return Ok(conclusion.clone()),
                Err(DomainError::EmptyAccusation) => {
                    warn!("blank accusation rejected");
                    self.say(Tone::Warning, "Informe o nome de um suspeito.")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn narrate(&mut self, event: &RoomEvent) -> ApplicationResult<()> {
        self.say(
            Tone::Narration,
            &format!("Você está na sala: {}", event.entered_room),
        )?;
        match (&event.clue_found, event.was_new_clue) {
            (Some(clue), Some(true)) => self.say(Tone::Clue, &format!("Pista encontrada: {clue}"))?,
            (Some(clue), _) => self.say(Tone::Detail, &format!("Pista já anotada: {clue}"))?,
            (None, _) => {}
        }
        if event.terminal {
            self.say(Tone::Narration, "Não há mais caminhos a partir daqui.")?;
        }
        Ok(())
    }

    fn report(&mut self, conclusion: &Conclusion) -> ApplicationResult<()> {
        self.say(
            Tone::Narration,
            &format!(
                "{} pista(s) apontam para {} (mínimo {}).",
                conclusion.tally, conclusion.accused, GUILTY_THRESHOLD
            ),
        )?;
        match conclusion.verdict {
            Verdict::Guilty => self.say(
                Tone::Success,
                &format!("{} é culpado(a)! Caso encerrado.", conclusion.accused),
            ),
            Verdict::Insufficient => self.say(
                Tone::Warning,
                &format!(
                    "Provas insuficientes contra {}. O culpado escapou...",
                    conclusion.accused
                ),
            ),
        }
    }

    fn say(&mut self, tone: Tone, message: &str) -> ApplicationResult<()> {
        self.console.say(tone, message).with_context("write to console")
    }
}

/// Prompt listing only the exits that exist.
fn direction_prompt(exits: Exits) -> String {
    let mut options = Vec::with_capacity(3);
    if exits.has_left {
        options.push("e = esquerda");
    }
    if exits.has_right {
        options.push("d = direita");
    }
    options.push("s = sair");
    format!("Escolha seu caminho ({}):", options.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ScriptedConsole;

    #[test]
    fn given_both_exits_when_prompting_then_lists_all_options() {
        let prompt = direction_prompt(Exits {
            has_left: true,
            has_right: true,
        });
        assert_eq!(
            prompt,
            "Escolha seu caminho (e = esquerda, d = direita, s = sair):"
        );
    }

    #[test]
    fn given_only_right_exit_when_prompting_then_hides_left() {
        let prompt = direction_prompt(Exits {
            has_left: false,
            has_right: true,
        });
        assert!(!prompt.contains("esquerda"));
    }

    #[test]
    fn given_winning_path_when_playing_mansion_then_guilty() {
        let mut console = ScriptedConsole::new(["e", "e"], ["Carlos"]);
        let conclusion = GameSession::new(&mut console)
            .play(&Scenario::mansion())
            .unwrap();

        assert_eq!(conclusion.verdict, Verdict::Guilty);
        assert_eq!(conclusion.tally, 2);
        assert_eq!(
            conclusion.clues,
            [
                "Faca desaparecida",
                "Pegadas de lama",
                "Relógio parado às 23h"
            ]
        );
        assert!(console
            .lines()
            .contains(&"Carlos é culpado(a)! Caso encerrado."));
    }

    #[test]
    fn given_no_accusation_when_playing_then_input_closed() {
        let mut console = ScriptedConsole::new(["s"], Vec::<String>::new());
        let result = GameSession::new(&mut console).play(&Scenario::mansion());
        assert!(matches!(result, Err(ApplicationError::InputClosed)));
    }
}
