//! Detective Quest: explore a mansion, collect clues, accuse a suspect.
//!
//! Layers, innermost first:
//! - [`domain`]: room map, clue ledger, suspect index and the investigation state machine
//! - [`application`]: scenarios and the interactive game session
//! - [`infrastructure`]: console and filesystem boundaries
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
