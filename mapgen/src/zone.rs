use catalog::{BorderType, ZoneType};

use crate::ids::{ObjectId, ZoneId};
use crate::position::{Position, VPosition};
use crate::tile_map::RoadInfo;

/// Per-zone state accumulated across the fill pipeline (§2, §3). The map's
/// tiles carry their own `zone_id` back-reference (`TileMap::get_zone_id`);
/// this struct is the zone's own bookkeeping of what it has claimed and
/// placed so far.
#[derive(Debug, Clone)]
pub struct Zone {
    pub id: ZoneId,
    pub zone_type: ZoneType,
    pub border_type: BorderType,
    pub gap_chance: u32,
    /// Normalized center, as drawn by the layout step before pixel
    /// coordinates exist.
    pub center: VPosition,
    /// Resolved map-space anchor, set once the map size is known.
    pub pos: Position,
    pub min: Position,
    pub max: Position,
    pub owner_id: Option<u8>,
    pub subrace: Option<String>,

    /// Tiles still open for fractal carving or object placement.
    pub possible_tiles: Vec<Position>,
    /// Carved path tiles (`Free`), accumulated by `crunchPath`/`connectPath`.
    pub free_paths: Vec<Position>,
    /// Object ids that participate in the road network (fortifications,
    /// ruins, sites).
    pub road_nodes: Vec<ObjectId>,
    pub roads: Vec<RoadInfo>,

    pub neutral_cities: Vec<ObjectId>,
    pub merchants: Vec<ObjectId>,
    pub mages: Vec<ObjectId>,
    pub mercenaries: Vec<ObjectId>,
    pub trainers: Vec<ObjectId>,
    pub markets: Vec<ObjectId>,
    pub ruins: Vec<ObjectId>,
    /// Resource name to the crystal object placed for it.
    pub mines: Vec<(String, ObjectId)>,
    pub stacks: Vec<ObjectId>,
    pub bags: Vec<ObjectId>,

    /// Objects queued by an earlier step (e.g. a mine's crystal) that must
    /// be connected to the path network before the zone is considered done
    /// (§4.5).
    pub required_objects: Vec<ObjectId>,
    /// Objects placed opportunistically near another object rather than
    /// through the normal farthest-tile search (§4.5).
    pub close_objects: Vec<ObjectId>,
    /// Obstacles and landmarks placed during border/decoration passes.
    pub decorations: Vec<ObjectId>,
}

impl Zone {
    pub fn new(id: ZoneId, zone_type: ZoneType, border_type: BorderType, gap_chance: u32, center: VPosition) -> Self {
        Self {
            id,
            zone_type,
            border_type,
            gap_chance,
            center,
            pos: Position::new(0, 0),
            min: Position::new(0, 0),
            max: Position::new(0, 0),
            owner_id: None,
            subrace: None,
            possible_tiles: Vec::new(),
            free_paths: Vec::new(),
            road_nodes: Vec::new(),
            roads: Vec::new(),
            neutral_cities: Vec::new(),
            merchants: Vec::new(),
            mages: Vec::new(),
            mercenaries: Vec::new(),
            trainers: Vec::new(),
            markets: Vec::new(),
            ruins: Vec::new(),
            mines: Vec::new(),
            stacks: Vec::new(),
            bags: Vec::new(),
            required_objects: Vec::new(),
            close_objects: Vec::new(),
            decorations: Vec::new(),
        }
    }

    /// Resolves the normalized center and a half-extent into map-space
    /// bounding box, clamped to the map (§4 layout step).
    pub fn resolve_bounds(&mut self, map_width: i32, map_height: i32, half_extent: i32) {
        self.pos = self.center.to_position(map_width, map_height);
        self.min = Position::new((self.pos.x - half_extent).max(0), (self.pos.y - half_extent).max(0));
        self.max = Position::new(
            (self.pos.x + half_extent).min(map_width - 1),
            (self.pos.y + half_extent).min(map_height - 1),
        );
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    pub fn is_starting_zone(&self) -> bool {
        matches!(self.zone_type, ZoneType::PlayerStart | ZoneType::AiStart)
    }

    pub fn remove_possible_tile(&mut self, pos: Position) {
        self.possible_tiles.retain(|&p| p != pos);
    }

    pub fn all_road_capable_objects(&self) -> impl Iterator<Item = &ObjectId> {
        self.neutral_cities
            .iter()
            .chain(self.merchants.iter())
            .chain(self.mages.iter())
            .chain(self.mercenaries.iter())
            .chain(self.trainers.iter())
            .chain(self.markets.iter())
            .chain(self.ruins.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_bounds_clamps_to_map() {
        let mut z = Zone::new(ZoneId(0), ZoneType::PlayerStart, BorderType::Open, 0, VPosition::set_center(0.0, 0.0));
        z.resolve_bounds(100, 100, 20);
        assert_eq!(z.min, Position::new(0, 0));
        assert!(z.max.x <= 99 && z.max.y <= 99);
    }

    #[test]
    fn contains_respects_bounding_box() {
        let mut z = Zone::new(ZoneId(0), ZoneType::Treasure, BorderType::Closed, 0, VPosition::set_center(0.5, 0.5));
        z.resolve_bounds(100, 100, 10);
        assert!(z.contains(z.pos));
        assert!(!z.contains(Position::new(0, 0)));
    }
}
