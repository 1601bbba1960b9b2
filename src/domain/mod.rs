//! Domain layer: the room map, the clue ledger, the suspect index and the game rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod clue_ledger;
pub mod error;
pub mod investigation;
pub mod room_map;
pub mod suspect_index;

pub use clue_ledger::{ClueEntry, ClueLedger};
pub use error::{DomainError, DomainResult};
pub use investigation::{
    Conclusion, Direction, Investigation, Move, Phase, RoomEvent, Verdict, GUILTY_THRESHOLD,
};
pub use room_map::{Exits, Room, RoomId, RoomMap, RoomSpec, Side};
pub use suspect_index::SuspectIndex;
