//! Game orchestrator: explore the room map, collect clues, accuse a suspect.
//!
//! The investigation is a three-phase state machine driven by discrete inputs:
//!
//! ```text
//! Exploring --(leaf reached | stop)--> AwaitingAccusation --(accusation)--> Concluded
//! ```
//!
//! Every call returns control to the caller; the interaction layer decides how
//! inputs are obtained and how events are rendered.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, instrument};

use crate::domain::clue_ledger::ClueLedger;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::room_map::{Exits, Room, RoomId, RoomMap, Side};
use crate::domain::suspect_index::SuspectIndex;

/// Minimum number of matching clues for a conviction.
pub const GUILTY_THRESHOLD: usize = 2;

/// Player decision while exploring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Stop,
}

impl Direction {
    pub fn side(self) -> Option<Side> {
        match self {
            Direction::Left => Some(Side::Left),
            Direction::Right => Some(Side::Right),
            Direction::Stop => None,
        }
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    /// Accepts single letters and words, English or Portuguese, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" | "l" | "left" | "esquerda" => Ok(Direction::Left),
            "d" | "r" | "right" | "direita" => Ok(Direction::Right),
            "s" | "q" | "stop" | "sair" => Ok(Direction::Stop),
            _ => Err(DomainError::UnknownDirection(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Stop => write!(f, "stop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Exploring,
    AwaitingAccusation,
    Concluded,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Exploring => write!(f, "exploring"),
            Phase::AwaitingAccusation => write!(f, "awaiting accusation"),
            Phase::Concluded => write!(f, "concluded"),
        }
    }
}

/// What happened on entering a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEvent {
    pub entered_room: String,
    pub clue_found: Option<String>,
    /// `None` when the room has no clue
    pub was_new_clue: Option<bool>,
    /// The room is a leaf; exploration is over
    pub terminal: bool,
}

/// Outcome of one exploring step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    Entered(RoomEvent),
    Stopped { room: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Guilty,
    Insufficient,
}

impl Verdict {
    pub fn from_tally(tally: usize) -> Self {
        if tally >= GUILTY_THRESHOLD {
            Verdict::Guilty
        } else {
            Verdict::Insufficient
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Guilty => write!(f, "guilty"),
            Verdict::Insufficient => write!(f, "insufficient evidence"),
        }
    }
}

/// Final report of a concluded investigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conclusion {
    pub accused: String,
    /// Collected clues in ascending order
    pub clues: Vec<String>,
    pub tally: usize,
    pub verdict: Verdict,
}

/// One game: owns the map, the suspect index and the clue ledger.
#[derive(Debug)]
pub struct Investigation {
    map: RoomMap,
    index: SuspectIndex,
    ledger: ClueLedger,
    current: RoomId,
    phase: Phase,
    conclusion: Option<Conclusion>,
}

impl Investigation {
    /// Start a game in the root room. The returned event describes that first arrival.
    #[instrument(level = "debug", skip_all)]
    pub fn start(map: RoomMap, index: SuspectIndex) -> (Self, RoomEvent) {
        let root = map.root();
        let mut investigation = Self {
            map,
            index,
            ledger: ClueLedger::new(),
            current: root,
            phase: Phase::Exploring,
            conclusion: None,
        };
        let event = investigation.enter(root);
        (investigation, event)
    }

    /// Apply a player decision while exploring.
    ///
    /// A direction without a room behind it fails with [`DomainError::InvalidDirection`]
    /// and leaves the game where it was.
    #[instrument(level = "debug", skip(self), fields(room = %self.current_room().name))]
    pub fn advance(&mut self, direction: Direction) -> DomainResult<Move> {
        self.expect_phase(Phase::Exploring)?;

        let Some(side) = direction.side() else {
            self.phase = Phase::AwaitingAccusation;
            info!("exploration stopped by player");
            return Ok(Move::Stopped {
                room: self.current_room().name.clone(),
            });
        };

        match self.map.child(self.current, side) {
            Some(next) => Ok(Move::Entered(self.enter(next))),
            None => Err(DomainError::InvalidDirection {
                room: self.current_room().name.clone(),
                direction,
            }),
        }
    }

    /// Accuse a suspect and close the case.
    ///
    /// The name is trimmed; a blank name fails with [`DomainError::EmptyAccusation`]
    /// and the game keeps waiting for an accusation.
    #[instrument(level = "debug", skip(self))]
    pub fn accuse(&mut self, accused: &str) -> DomainResult<&Conclusion> {
        self.expect_phase(Phase::AwaitingAccusation)?;

        let accused = accused.trim();
        if accused.is_empty() {
            return Err(DomainError::EmptyAccusation);
        }

        let tally = self.tally(accused);
        let verdict = Verdict::from_tally(tally);
        info!(accused, tally, %verdict, "case closed");

        self.phase = Phase::Concluded;
        Ok(&*self.conclusion.insert(Conclusion {
            accused: accused.to_string(),
            clues: self.ledger.to_vec(),
            tally,
            verdict,
        }))
    }

    /// Count collected clues pointing at `accused`. Clues missing from the index count for nobody.
    pub fn tally(&self, accused: &str) -> usize {
        let accused = accused.trim();
        self.ledger
            .iter()
            .filter(|clue| self.index.resolve(clue) == Some(accused))
            .count()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_room(&self) -> &Room {
        &self.map[self.current]
    }

    pub fn exits(&self) -> Exits {
        self.map.exits(self.current)
    }

    pub fn ledger(&self) -> &ClueLedger {
        &self.ledger
    }

    pub fn suspects(&self) -> &SuspectIndex {
        &self.index
    }

    pub fn map(&self) -> &RoomMap {
        &self.map
    }

    pub fn conclusion(&self) -> Option<&Conclusion> {
        self.conclusion.as_ref()
    }

    fn enter(&mut self, id: RoomId) -> RoomEvent {
        self.current = id;
        let room = &self.map[id];

        let was_new_clue = room.clue.as_deref().map(|clue| self.ledger.insert(clue));
        let terminal = room.is_leaf();
        if terminal {
            self.phase = Phase::AwaitingAccusation;
        }
        debug!(room = %room.name, ?was_new_clue, terminal, "entered room");

        RoomEvent {
            entered_room: room.name.clone(),
            clue_found: room.clue.clone(),
            was_new_clue,
            terminal,
        }
    }

    fn expect_phase(&self, expected: Phase) -> DomainResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DomainError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}
