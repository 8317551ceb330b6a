use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;

/// Terrain painted under a tile. `Neutral` is the default; a fortification
/// or decoration can paint its owning race's terrain, modeled here as an
/// opaque id rather than an exhaustive enum (the race roster is part of the
/// out-of-scope game data catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Neutral,
    Race(String),
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ground {
    Normal,
    Water,
    Mountain,
}

impl Default for Ground {
    fn default() -> Self {
        Ground::Normal
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub ground: Ground,
    pub tree_image: Option<String>,
    /// Set when an object's entrance sits on this tile: pathfinding may step
    /// onto it even if otherwise not `Free`.
    pub visitable: bool,
    /// True once an object's footprint or an obstacle occupies the tile.
    pub blocked: bool,
    pub blocking_objects: Vec<ObjectId>,
    pub visitable_objects: Vec<ObjectId>,
}

impl Tile {
    /// Sets terrain and ground together, enforcing the invariant that water
    /// or mountain ground always carries neutral terrain.
    pub fn set_terrain_ground(&mut self, terrain: Terrain, ground: Ground) {
        self.ground = ground;
        self.terrain = if matches!(ground, Ground::Water | Ground::Mountain) {
            Terrain::Neutral
        } else {
            terrain
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_ground_forces_neutral_terrain() {
        let mut t = Tile::default();
        t.set_terrain_ground(Terrain::Race("orc".into()), Ground::Water);
        assert_eq!(t.terrain, Terrain::Neutral);
        assert_eq!(t.ground, Ground::Water);
    }

    #[test]
    fn mountain_ground_forces_neutral_terrain() {
        let mut t = Tile::default();
        t.set_terrain_ground(Terrain::Race("human".into()), Ground::Mountain);
        assert_eq!(t.terrain, Terrain::Neutral);
    }

    #[test]
    fn normal_ground_keeps_requested_terrain() {
        let mut t = Tile::default();
        t.set_terrain_ground(Terrain::Race("human".into()), Ground::Normal);
        assert_eq!(t.terrain, Terrain::Race("human".into()));
    }
}
