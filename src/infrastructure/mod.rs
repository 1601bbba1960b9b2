//! Infrastructure layer: terminal and filesystem implementations
//!
//! This layer implements the I/O boundary traits used by the application layer.

pub mod traits;

pub use traits::{Console, FileSystem, RealFileSystem, ScriptedConsole, TerminalConsole, Tone};
