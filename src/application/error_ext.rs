//! Error conversion helpers for console and file I/O
//!
//! Provides an extension trait for attaching context to `io::Result`s.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// console.read_accusation("Who did it?")
    ///     .with_context("read accusation")?;
    /// ```
    fn with_context(self, action: impl std::fmt::Display) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, action: impl std::fmt::Display) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: action.to_string(),
            source: Box::new(e),
        })
    }
}
