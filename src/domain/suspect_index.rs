//! Static lookup from clue to the suspect it incriminates.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{instrument, warn};

/// Clue → suspect table, immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuspectIndex {
    by_clue: HashMap<String, String>,
}

impl SuspectIndex {
    /// Build the index from `(clue, suspect)` pairs. A repeated clue keeps the last suspect.
    #[instrument(level = "debug", skip(pairs))]
    pub fn build<I, C, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, S)>,
        C: Into<String>,
        S: Into<String>,
    {
        let mut by_clue = HashMap::new();
        for (clue, suspect) in pairs {
            let (clue, suspect) = (clue.into(), suspect.into());
            if let Some(previous) = by_clue.insert(clue.clone(), suspect.clone()) {
                if previous != suspect {
                    warn!(%clue, %previous, %suspect, "clue reassigned to another suspect");
                }
            }
        }
        Self { by_clue }
    }

    /// Suspect named by `clue`, if the clue was ever registered.
    pub fn resolve(&self, clue: &str) -> Option<&str> {
        self.by_clue.get(clue).map(String::as_str)
    }

    /// Distinct suspect names in alphabetical order.
    pub fn suspects(&self) -> Vec<&str> {
        self.by_clue
            .values()
            .map(String::as_str)
            .unique()
            .sorted()
            .collect()
    }

    /// All pairs sorted by clue.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        self.by_clue
            .iter()
            .map(|(clue, suspect)| (clue.as_str(), suspect.as_str()))
            .sorted()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_clue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_clue.is_empty()
    }
}
