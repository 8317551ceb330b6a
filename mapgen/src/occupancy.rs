use serde::{Deserialize, Serialize};

use crate::ids::ZoneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    /// Unclaimed; a candidate for paths or objects.
    Possible,
    /// Carved walkable path tile.
    Free,
    /// Permanently blocked, reserved for an obstacle.
    Blocked,
    /// Occupied by an object's footprint.
    Used,
}

/// Occupancy bookkeeping kept per-tile by [`crate::tile_map::TileMap`],
/// independent of the tile's terrain/ground data (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occupancy {
    pub state: TileState,
    pub is_road: bool,
    pub zone_id: Option<ZoneId>,
    pub nearest_object_distance: f32,
}

impl Default for Occupancy {
    fn default() -> Self {
        Self {
            state: TileState::Possible,
            is_road: false,
            zone_id: None,
            nearest_object_distance: f32::INFINITY,
        }
    }
}

impl Occupancy {
    pub fn is_possible(&self) -> bool {
        self.state == TileState::Possible
    }

    pub fn is_free(&self) -> bool {
        self.state == TileState::Free
    }

    pub fn is_blocked(&self) -> bool {
        self.state == TileState::Blocked
    }

    pub fn is_used(&self) -> bool {
        self.state == TileState::Used
    }

    pub fn should_be_blocked(&self) -> bool {
        self.is_blocked()
    }
}
