//! Scenario data: the rooms and the clue → suspect pairs of one playable case.
//!
//! Scenarios come either from the built-in mansion or from a TOML file:
//!
//! ```toml
//! title = "The Manor"
//!
//! [[rooms]]
//! name = "Hall"
//! clue = "muddy boots"
//! left = "Kitchen"
//!
//! [[rooms]]
//! name = "Kitchen"
//!
//! [[suspects]]
//! clue = "muddy boots"
//! suspect = "Carlos"
//! ```
//!
//! The first room is where the game starts. Exits refer to rooms by name.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{RoomMap, RoomSpec, SuspectIndex, GUILTY_THRESHOLD};
use crate::infrastructure::FileSystem;

/// One room as written in a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

impl RoomEntry {
    fn new(name: &str, clue: Option<&str>, left: Option<&str>, right: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            clue: clue.map(str::to_string),
            left: left.map(str::to_string),
            right: right.map(str::to_string),
        }
    }
}

/// A clue and the suspect it points at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspectEntry {
    pub clue: String,
    pub suspect: String,
}

/// A playable case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub title: String,
    pub rooms: Vec<RoomEntry>,
    #[serde(default)]
    pub suspects: Vec<SuspectEntry>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::mansion()
    }
}

impl Scenario {
    /// The built-in case.
    ///
    /// ```text
    /// Hall de Entrada
    /// ├── Sala de Estar
    /// │   ├── Cozinha
    /// │   └── Jardim
    /// └── Biblioteca
    ///     ├── Escritório
    ///     └── Porão
    /// ```
    pub fn mansion() -> Self {
        let rooms = vec![
            RoomEntry::new(
                "Hall de Entrada",
                Some("Pegadas de lama"),
                Some("Sala de Estar"),
                Some("Biblioteca"),
            ),
            RoomEntry::new(
                "Sala de Estar",
                Some("Relógio parado às 23h"),
                Some("Cozinha"),
                Some("Jardim"),
            ),
            RoomEntry::new("Cozinha", Some("Faca desaparecida"), None, None),
            RoomEntry::new("Jardim", Some("Luva de jardinagem rasgada"), None, None),
            RoomEntry::new(
                "Biblioteca",
                Some("Página arrancada do diário"),
                Some("Escritório"),
                Some("Porão"),
            ),
            RoomEntry::new("Escritório", Some("Carta anônima"), None, None),
            RoomEntry::new("Porão", Some("Frasco de veneno vazio"), None, None),
        ];
        let suspects = [
            ("Pegadas de lama", "Carlos"),
            ("Faca desaparecida", "Carlos"),
            ("Página arrancada do diário", "Carlos"),
            ("Luva de jardinagem rasgada", "Daniel"),
            ("Carta anônima", "Beatriz"),
            ("Frasco de veneno vazio", "Beatriz"),
        ]
        .into_iter()
        .map(|(clue, suspect)| SuspectEntry {
            clue: clue.to_string(),
            suspect: suspect.to_string(),
        })
        .collect();

        Self {
            title: "Detective Quest: O Mistério da Mansão".to_string(),
            rooms,
            suspects,
        }
    }

    /// Parse a scenario from TOML. `origin` names the source in error messages.
    pub fn from_toml(content: &str, origin: &str) -> ApplicationResult<Self> {
        let scenario: Self = toml::from_str(content)
            .map_err(|e| ApplicationError::scenario(origin, e.message().to_string()))?;
        scenario.validate(origin)?;
        Ok(scenario)
    }

    /// Load a scenario file.
    #[instrument(level = "debug", skip(fs))]
    pub fn load(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<Self> {
        if !fs.is_file(path) {
            return Err(ApplicationError::ScenarioNotFound(path.to_path_buf()));
        }
        let content = fs
            .read_to_string(path)
            .with_context(format!("read scenario {}", path.display()))?;
        let scenario = Self::from_toml(&content, &path.display().to_string())?;
        debug!(
            rooms = scenario.rooms.len(),
            clues = scenario.suspects.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ApplicationError::scenario(&self.title, format!("serialize: {e}")))
    }

    fn validate(&self, origin: &str) -> ApplicationResult<()> {
        if self.rooms.is_empty() {
            return Err(ApplicationError::scenario(origin, "no rooms defined"));
        }
        if let Some(room) = self.rooms.iter().find(|r| r.name.trim().is_empty()) {
            return Err(ApplicationError::scenario(
                origin,
                format!("room with blank name (clue {:?})", room.clue),
            ));
        }
        if let Some(entry) = self
            .suspects
            .iter()
            .find(|s| s.clue.is_empty() || s.suspect.trim().is_empty())
        {
            return Err(ApplicationError::scenario(
                origin,
                format!("incomplete suspect entry {:?} -> {:?}", entry.clue, entry.suspect),
            ));
        }
        Ok(())
    }

    /// Resolve room names to positions, producing the declarative input of [`RoomMap::build`].
    pub fn room_specs(&self) -> ApplicationResult<Vec<RoomSpec>> {
        let mut positions = HashMap::with_capacity(self.rooms.len());
        for (pos, room) in self.rooms.iter().enumerate() {
            if positions.insert(room.name.as_str(), pos).is_some() {
                return Err(ApplicationError::scenario(
                    &self.title,
                    format!("room {:?} defined twice", room.name),
                ));
            }
        }

        let lookup = |from: &str, to: &Option<String>| -> ApplicationResult<Option<usize>> {
            match to {
                None => Ok(None),
                Some(name) => positions.get(name.as_str()).copied().map(Some).ok_or_else(|| {
                    ApplicationError::scenario(
                        &self.title,
                        format!("room {from:?} leads to unknown room {name:?}"),
                    )
                }),
            }
        };

        self.rooms
            .iter()
            .map(|room| {
                Ok(RoomSpec {
                    name: room.name.clone(),
                    clue: room.clue.clone(),
                    left: lookup(&room.name, &room.left)?,
                    right: lookup(&room.name, &room.right)?,
                })
            })
            .collect()
    }

    pub fn build_map(&self) -> ApplicationResult<RoomMap> {
        Ok(RoomMap::build(&self.room_specs()?)?)
    }

    pub fn build_index(&self) -> SuspectIndex {
        SuspectIndex::build(
            self.suspects
                .iter()
                .map(|entry| (entry.clue.as_str(), entry.suspect.as_str())),
        )
    }

    /// Build the case and report what makes it unfair.
    ///
    /// Warns about indexed clues no room offers, and when no root-to-leaf path
    /// collects [`GUILTY_THRESHOLD`] distinct clues against a single suspect.
    pub fn check(&self) -> ApplicationResult<Vec<String>> {
        let map = self.build_map()?;
        let index = self.build_index();
        let mut warnings = Vec::new();

        let offered: HashSet<&str> = map
            .iter()
            .filter_map(|(_, room)| room.clue.as_deref())
            .collect();
        for (clue, suspect) in index.entries() {
            if !offered.contains(clue) {
                warnings.push(format!("clue {clue:?} ({suspect}) is not found in any room"));
            }
        }

        if best_tally(&map, &index) < GUILTY_THRESHOLD {
            warnings.push(format!(
                "no path collects {GUILTY_THRESHOLD} clues against one suspect, the case cannot be solved"
            ));
        }
        Ok(warnings)
    }

    /// Generate a template scenario file.
    pub fn template() -> String {
        r#"# Detective Quest scenario
#
# The first room is where the investigation starts. Every room may carry
# one clue and lead to at most two other rooms (left and right), named by
# their "name". A room without exits ends the exploration.
#
# A suspect is convicted when at least two collected clues point at them.

title = "The Manor"

[[rooms]]
name = "Hall"
clue = "muddy boots"
left = "Kitchen"
right = "Study"

[[rooms]]
name = "Kitchen"
clue = "missing knife"

[[rooms]]
name = "Study"
clue = "burnt letter"

[[suspects]]
clue = "muddy boots"
suspect = "Carlos"

[[suspects]]
clue = "missing knife"
suspect = "Carlos"

[[suspects]]
clue = "burnt letter"
suspect = "Beatriz"
"#
        .to_string()
    }
}

/// Highest tally any single suspect reaches on any root-to-leaf path.
fn best_tally(map: &RoomMap, index: &SuspectIndex) -> usize {
    map.paths()
        .iter()
        .flat_map(|path| {
            // the ledger keeps a clue once, however many rooms offer it
            let clues: HashSet<&str> = path
                .iter()
                .filter_map(|id| map[*id].clue.as_deref())
                .collect();
            clues
                .into_iter()
                .filter_map(|clue| index.resolve(clue))
                .counts()
                .into_values()
        })
        .max()
        .unwrap_or(0)
}
