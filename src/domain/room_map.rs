//! Arena-based room map: the fixed binary tree the player explores.

use std::collections::HashMap;
use std::fmt;
use std::ops;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Non-owning reference to a room inside a [`RoomMap`].
pub type RoomId = Index;

/// Declarative description of one room.
///
/// `left` and `right` are positions in the spec list handed to [`RoomMap::build`];
/// the first spec is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSpec {
    pub name: String,
    pub clue: Option<String>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl RoomSpec {
    pub fn new(name: impl Into<String>, clue: Option<&str>) -> Self {
        Self {
            name: name.into(),
            clue: clue.map(str::to_string),
            left: None,
            right: None,
        }
    }

    pub fn with_exits(mut self, left: Option<usize>, right: Option<usize>) -> Self {
        self.left = left;
        self.right = right;
        self
    }
}

/// Which child of a room to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Available exits of a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exits {
    pub has_left: bool,
    pub has_right: bool,
}

impl Exits {
    pub fn is_empty(&self) -> bool {
        !self.has_left && !self.has_right
    }
}

/// Room node stored in the arena.
#[derive(Debug)]
pub struct Room {
    /// Display name of the room
    pub name: String,
    /// Clue found here; never an empty string
    pub clue: Option<String>,
    left: Option<RoomId>,
    right: Option<RoomId>,
}

impl Room {
    pub fn exits(&self) -> Exits {
        Exits {
            has_left: self.left.is_some(),
            has_right: self.right.is_some(),
        }
    }

    /// A room without exits ends the exploration.
    pub fn is_leaf(&self) -> bool {
        self.exits().is_empty()
    }

    pub fn child(&self, side: Side) -> Option<RoomId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.clue {
            Some(clue) => write!(f, "{} [clue: {}]", self.name, clue),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Immutable binary tree of rooms.
///
/// Built once from [`RoomSpec`]s and never mutated afterwards. Rooms are owned by the
/// arena; [`RoomId`]s handed out are plain references into it.
#[derive(Debug)]
pub struct RoomMap {
    arena: Arena<Room>,
    root: RoomId,
}

impl RoomMap {
    /// Build the map from a declarative room list. The first spec is the root.
    ///
    /// Fails with [`DomainError::Allocation`] when the list does not describe a single
    /// binary tree: no rooms, a child position out of range, a room used as a child
    /// twice (or the root used as a child), or rooms unreachable from the root.
    #[instrument(level = "debug", skip(specs), fields(rooms = specs.len()))]
    pub fn build(specs: &[RoomSpec]) -> DomainResult<Self> {
        if specs.is_empty() {
            return Err(DomainError::allocation("no rooms given"));
        }

        let mut arena = Arena::with_capacity(specs.len());
        let mut visited = vec![false; specs.len()];
        let mut root = None;
        let mut stack: Vec<(usize, Option<(RoomId, Side)>)> = vec![(0, None)];

        while let Some((pos, parent)) = stack.pop() {
            if std::mem::replace(&mut visited[pos], true) {
                return Err(DomainError::allocation(format!(
                    "room {:?} is reachable along more than one path",
                    specs[pos].name
                )));
            }

            let spec = &specs[pos];
            let room_id = arena.insert(Room {
                name: spec.name.clone(),
                clue: spec.clue.clone().filter(|c| !c.is_empty()),
                left: None,
                right: None,
            });

            match parent {
                Some((parent_id, side)) => {
                    if let Some(parent_room) = arena.get_mut(parent_id) {
                        match side {
                            Side::Left => parent_room.left = Some(room_id),
                            Side::Right => parent_room.right = Some(room_id),
                        }
                    }
                }
                None => root = Some(room_id),
            }

            for (side, child) in [(Side::Right, spec.right), (Side::Left, spec.left)] {
                if let Some(child) = child {
                    if child >= specs.len() {
                        return Err(DomainError::allocation(format!(
                            "room {:?} has a {} exit to unknown room #{}",
                            spec.name, side, child
                        )));
                    }
                    stack.push((child, Some((room_id, side))));
                }
            }
        }

        if let Some(orphan) = visited.iter().position(|seen| !seen) {
            return Err(DomainError::allocation(format!(
                "room {:?} is not reachable from {:?}",
                specs[orphan].name, specs[0].name
            )));
        }

        let root = root.ok_or_else(|| DomainError::allocation("no root room"))?;
        debug!("built room map with {} rooms", arena.len());
        Ok(Self { arena, root })
    }

    pub fn root(&self) -> RoomId {
        self.root
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.arena.get(id)
    }

    /// Exits of a room; an id not belonging to this map has none.
    pub fn exits(&self, id: RoomId) -> Exits {
        self.room(id).map(Room::exits).unwrap_or_default()
    }

    pub fn is_leaf(&self, id: RoomId) -> bool {
        self.exits(id).is_empty()
    }

    pub fn child(&self, id: RoomId, side: Side) -> Option<RoomId> {
        self.room(id).and_then(|room| room.child(side))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order walk, left before right.
    pub fn iter(&self) -> RoomIterator<'_> {
        RoomIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((id, level)) = stack.pop() {
            if let Some(room) = self.room(id) {
                deepest = deepest.max(level);
                stack.extend(
                    [room.left, room.right]
                        .into_iter()
                        .flatten()
                        .map(|child| (child, level + 1)),
                );
            }
        }
        deepest
    }

    /// Every root-to-leaf path, left to right. Each path starts at the root.
    pub fn paths(&self) -> Vec<Vec<RoomId>> {
        let mut paths = Vec::new();
        let mut path: Vec<RoomId> = Vec::new();
        let mut stack = vec![(self.root, 0)];
        while let Some((id, level)) = stack.pop() {
            let Some(room) = self.room(id) else { continue };
            path.truncate(level);
            path.push(id);
            if room.is_leaf() {
                paths.push(path.clone());
            }
            // right first so left is visited first
            stack.extend(room.right.map(|c| (c, level + 1)));
            stack.extend(room.left.map(|c| (c, level + 1)));
        }
        paths
    }

    /// Names of all rooms where exploration ends, left to right.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, room)| room.is_leaf())
            .map(|(_, room)| room.name.as_str())
            .collect()
    }

    /// Render the map as a `termtree` for display.
    ///
    /// Built bottom-up: in reverse pre-order every child is finished before its parent.
    pub fn to_tree_string(&self) -> Tree<String> {
        let order: Vec<_> = self.iter().collect();
        let mut built: HashMap<RoomId, Tree<String>> = HashMap::with_capacity(order.len());
        for (id, room) in order.into_iter().rev() {
            let leaves: Vec<_> = [room.left, room.right]
                .into_iter()
                .flatten()
                .filter_map(|child| built.remove(&child))
                .collect();
            built.insert(id, Tree::new(room.to_string()).with_leaves(leaves));
        }
        built
            .remove(&self.root)
            .unwrap_or_else(|| Tree::new("?".to_string()))
    }
}

impl ops::Index<RoomId> for RoomMap {
    type Output = Room;

    /// Panics if `id` was not handed out by this map.
    fn index(&self, id: RoomId) -> &Room {
        &self.arena[id]
    }
}

pub struct RoomIterator<'a> {
    map: &'a RoomMap,
    stack: Vec<RoomId>,
}

impl<'a> RoomIterator<'a> {
    fn new(map: &'a RoomMap) -> Self {
        Self {
            map,
            stack: vec![map.root],
        }
    }
}

impl<'a> Iterator for RoomIterator<'a> {
    type Item = (RoomId, &'a Room);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(room) = self.map.room(current) {
                // right first so left is visited first
                self.stack.extend(room.right);
                self.stack.extend(room.left);
                return Some((current, room));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //        hall
    //       /    \
    //   living   library
    //   /    \
    // kitchen garden
    fn mansion_specs() -> Vec<RoomSpec> {
        vec![
            RoomSpec::new("Hall", Some("footprints")).with_exits(Some(1), Some(2)),
            RoomSpec::new("Living Room", None).with_exits(Some(3), Some(4)),
            RoomSpec::new("Library", Some("torn page")),
            RoomSpec::new("Kitchen", Some("knife")),
            RoomSpec::new("Garden", Some("")),
        ]
    }

    #[test]
    fn given_mansion_specs_when_building_then_links_children() {
        let map = RoomMap::build(&mansion_specs()).unwrap();
        assert_eq!(map.len(), 5);

        let hall = map.root();
        assert_eq!(map.room(hall).unwrap().name, "Hall");
        assert_eq!(
            map.exits(hall),
            Exits {
                has_left: true,
                has_right: true
            }
        );

        let living = map.child(hall, Side::Left).unwrap();
        let kitchen = map.child(living, Side::Left).unwrap();
        assert_eq!(map.room(kitchen).unwrap().name, "Kitchen");
        assert!(map.is_leaf(kitchen));
        assert_eq!(map.child(kitchen, Side::Right), None);
    }

    #[test]
    fn given_empty_clue_when_building_then_room_has_no_clue() {
        let map = RoomMap::build(&mansion_specs()).unwrap();
        let garden = map.iter().find(|(_, r)| r.name == "Garden").unwrap().1;
        assert_eq!(garden.clue, None);
    }

    #[test]
    fn given_mansion_when_walking_then_visits_preorder_left_first() {
        let map = RoomMap::build(&mansion_specs()).unwrap();
        let names: Vec<_> = map.iter().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, ["Hall", "Living Room", "Kitchen", "Garden", "Library"]);
        assert_eq!(map.leaf_names(), ["Kitchen", "Garden", "Library"]);
        assert_eq!(map.depth(), 3);
    }

    #[test]
    fn given_single_room_when_building_then_root_is_leaf() {
        let map = RoomMap::build(&[RoomSpec::new("Cellar", None)]).unwrap();
        assert!(map.is_leaf(map.root()));
        assert_eq!(map.depth(), 1);
    }

    #[test]
    fn given_no_specs_when_building_then_fails() {
        let err = RoomMap::build(&[]).unwrap_err();
        assert!(matches!(err, DomainError::Allocation { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn given_out_of_range_child_when_building_then_fails() {
        let specs = vec![RoomSpec::new("Hall", None).with_exits(Some(7), None)];
        assert!(matches!(
            RoomMap::build(&specs),
            Err(DomainError::Allocation { .. })
        ));
    }

    #[test]
    fn given_shared_child_when_building_then_fails() {
        let specs = vec![
            RoomSpec::new("Hall", None).with_exits(Some(1), Some(1)),
            RoomSpec::new("Study", None),
        ];
        assert!(RoomMap::build(&specs).is_err());
    }

    #[test]
    fn given_cycle_back_to_root_when_building_then_fails() {
        let specs = vec![
            RoomSpec::new("Hall", None).with_exits(Some(1), None),
            RoomSpec::new("Study", None).with_exits(None, Some(0)),
        ];
        assert!(RoomMap::build(&specs).is_err());
    }

    #[test]
    fn given_unreachable_room_when_building_then_fails() {
        let specs = vec![RoomSpec::new("Hall", None), RoomSpec::new("Attic", None)];
        let err = RoomMap::build(&specs).unwrap_err();
        assert!(err.to_string().contains("Attic"));
    }

    #[test]
    fn given_map_when_rendering_then_marks_clues() {
        let map = RoomMap::build(&mansion_specs()).unwrap();
        let rendered = map.to_tree_string().to_string();
        assert!(rendered.starts_with("Hall [clue: footprints]"));
        assert!(rendered.contains("Kitchen [clue: knife]"));
        assert!(rendered.contains("Garden\n"));
    }

    fn corridor(len: usize) -> RoomMap {
        let specs: Vec<_> = (0..len)
            .map(|pos| {
                RoomSpec::new(format!("Room{pos}"), None)
                    .with_exits((pos + 1 < len).then_some(pos + 1), None)
            })
            .collect();
        RoomMap::build(&specs).unwrap()
    }

    #[test]
    fn given_long_corridor_when_measuring_depth_then_no_recursion() {
        let map = corridor(200_000);
        assert_eq!(map.depth(), 200_000);
        let paths = map.paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 200_000);
    }

    #[test]
    fn given_deep_corridor_when_rendering_then_nests_every_room() {
        let map = corridor(500);
        let rendered = map.to_tree_string().to_string();
        assert_eq!(rendered.lines().count(), 500);
        assert!(rendered.lines().last().unwrap().ends_with("Room499"));
    }

    #[test]
    fn given_mansion_when_listing_paths_then_one_per_leaf_left_first() {
        let map = RoomMap::build(&mansion_specs()).unwrap();
        let names: Vec<Vec<&str>> = map
            .paths()
            .iter()
            .map(|path| path.iter().map(|id| map[*id].name.as_str()).collect())
            .collect();
        assert_eq!(
            names,
            [
                vec!["Hall", "Living Room", "Kitchen"],
                vec!["Hall", "Living Room", "Garden"],
                vec!["Hall", "Library"],
            ]
        );
    }
}
