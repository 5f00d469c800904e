//! Sparse map of explored rooms.
//!
//! Rooms live on an integer lattice. The graph only ever grows: once a
//! coordinate has an identifier it keeps it, so leaving and re-entering a room
//! always finds the same stage.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;
use std::fmt;

use crate::resources::stage::StageId;
use crate::resources::tilegrid::Edge;

/// Integer room coordinate. `y` grows downwards, like screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RoomCoord {
    pub x: i32,
    pub y: i32,
}

impl RoomCoord {
    pub const ORIGIN: RoomCoord = RoomCoord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor reached by leaving through `edge`.
    pub fn neighbor(self, edge: Edge) -> RoomCoord {
        let (dx, dy) = edge.step();
        RoomCoord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for RoomCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Append-only mapping from room coordinate to stage identifier.
#[derive(Resource, Debug, Clone)]
pub struct WorldGraph {
    rooms: FxHashMap<RoomCoord, StageId>,
    current: RoomCoord,
}

impl Default for WorldGraph {
    fn default() -> Self {
        Self::new(StageId::START)
    }
}

impl WorldGraph {
    /// Graph holding only the origin, mapped to `start`.
    pub fn new(start: StageId) -> Self {
        let mut rooms = FxHashMap::default();
        rooms.insert(RoomCoord::ORIGIN, start);
        Self {
            rooms,
            current: RoomCoord::ORIGIN,
        }
    }

    /// Coordinate of the room the actor occupies.
    pub fn current(&self) -> RoomCoord {
        self.current
    }

    /// Identifier stored for `coord`, or `None` if it was never visited.
    pub fn lookup(&self, coord: RoomCoord) -> Option<StageId> {
        self.rooms.get(&coord).copied()
    }

    /// Identifier for `coord`, generating and recording one on first visit.
    ///
    /// Returns the identifier and whether it was freshly generated.
    pub fn resolve_or_insert_with(
        &mut self,
        coord: RoomCoord,
        generate: impl FnOnce() -> StageId,
    ) -> (StageId, bool) {
        match self.rooms.get(&coord) {
            Some(&id) => (id, false),
            None => {
                let id = generate();
                self.rooms.insert(coord, id);
                (id, true)
            }
        }
    }

    /// Record `id` for `coord` unless the coordinate already has one.
    pub fn record(&mut self, coord: RoomCoord, id: StageId) -> StageId {
        *self.rooms.entry(coord).or_insert(id)
    }

    /// Make `coord` the occupied room, recording `id` if it is new.
    pub fn enter(&mut self, coord: RoomCoord, id: StageId) -> StageId {
        self.current = coord;
        self.record(coord, id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Visited rooms sorted by coordinate (row-major).
    pub fn rooms(&self) -> Vec<(RoomCoord, StageId)> {
        let mut rooms: Vec<_> = self.rooms.iter().map(|(c, id)| (*c, *id)).collect();
        rooms.sort_by_key(|(c, _)| (c.y, c.x));
        rooms
    }
}
