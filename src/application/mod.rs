//! Application layer: scenarios and the game session
//!
//! This layer wires domain types to the console boundary and to scenario data.

pub mod error;
pub mod error_ext;
pub mod scenario;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use scenario::Scenario;
pub use session::GameSession;
