use std::collections::HashMap;

use tracing::trace;

use crate::ids::{IdAllocator, ObjectId, ZoneId};
use crate::map_element::MapElement;
use crate::object::ScenarioObject;
use crate::occupancy::{Occupancy, TileState};
use crate::position::Position;
use crate::tile::Tile;

/// A carved road segment between two map elements, recorded by
/// [`crate::road_builder::connect_roads`] (§4.9).
#[derive(Debug, Clone)]
pub struct RoadInfo {
    pub source: ObjectId,
    pub dest: ObjectId,
    pub path: Vec<Position>,
}

/// Owns the tile array, the per-tile occupancy state, and every scenario
/// object on the map (§3 Ownership). `MapElement`s stored in `elements` are
/// weak references: id + footprint only, looked up by id into `objects` for
/// the full payload.
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    occupancy: Vec<Occupancy>,
    ids: IdAllocator,
    elements: HashMap<ObjectId, MapElement>,
    objects: HashMap<ObjectId, ScenarioObject>,
    road_nodes: Vec<ObjectId>,
    roads: Vec<RoadInfo>,
}

impl TileMap {
    pub fn new(width: i32, height: i32) -> Self {
        let count = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::default(); count],
            occupancy: vec![Occupancy::default(); count],
            ids: IdAllocator::default(),
            elements: HashMap::new(),
            objects: HashMap::new(),
            road_nodes: Vec::new(),
            roads: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_in_the_map(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn is_at_the_border(&self, pos: Position) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x == self.width - 1 || pos.y == self.height - 1
    }

    fn idx(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    pub fn tile(&self, pos: Position) -> &Tile {
        &self.tiles[self.idx(pos)]
    }

    pub fn tile_mut(&mut self, pos: Position) -> &mut Tile {
        let i = self.idx(pos);
        &mut self.tiles[i]
    }

    pub fn occupancy(&self, pos: Position) -> &Occupancy {
        &self.occupancy[self.idx(pos)]
    }

    fn occupancy_mut(&mut self, pos: Position) -> &mut Occupancy {
        let i = self.idx(pos);
        &mut self.occupancy[i]
    }

    pub fn get_zone_id(&self, pos: Position) -> Option<ZoneId> {
        self.occupancy(pos).zone_id
    }

    pub fn set_zone_id(&mut self, pos: Position, zone_id: ZoneId) {
        self.occupancy_mut(pos).zone_id = Some(zone_id);
    }

    pub fn is_possible(&self, pos: Position) -> bool {
        self.occupancy(pos).is_possible()
    }

    pub fn is_free(&self, pos: Position) -> bool {
        self.occupancy(pos).is_free()
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        self.occupancy(pos).is_blocked()
    }

    pub fn should_be_blocked(&self, pos: Position) -> bool {
        self.occupancy(pos).should_be_blocked()
    }

    pub fn is_used(&self, pos: Position) -> bool {
        self.occupancy(pos).is_used()
    }

    pub fn state(&self, pos: Position) -> TileState {
        self.occupancy(pos).state
    }

    pub fn set_occupied(&mut self, pos: Position, state: TileState) {
        self.occupancy_mut(pos).state = state;
    }

    pub fn is_road(&self, pos: Position) -> bool {
        self.occupancy(pos).is_road
    }

    pub fn set_road(&mut self, pos: Position, is_road: bool) {
        self.occupancy_mut(pos).is_road = is_road;
    }

    pub fn get_nearest_object_distance(&self, pos: Position) -> f32 {
        self.occupancy(pos).nearest_object_distance
    }

    pub fn set_nearest_object_distance(&mut self, pos: Position, dist: f32) {
        self.occupancy_mut(pos).nearest_object_distance = dist;
    }

    /// Updates every tile's nearest-object distance against a newly placed
    /// object's anchor position (§4.1).
    pub fn update_distances(&mut self, anchor: Position) {
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                let d = anchor.squared_distance(pos);
                let i = self.idx(pos);
                if d < self.occupancy[i].nearest_object_distance {
                    self.occupancy[i].nearest_object_distance = d;
                }
            }
        }
    }

    pub fn foreach_neighbor(&self, pos: Position, mut f: impl FnMut(Position)) {
        for (dx, dy) in Position::ALL_NEIGHBORS {
            let n = pos.add(dx, dy);
            if self.is_in_the_map(n) {
                f(n);
            }
        }
    }

    pub fn foreach_direct_neighbor(&self, pos: Position, mut f: impl FnMut(Position)) {
        for (dx, dy) in Position::DIRECT_NEIGHBORS {
            let n = pos.add(dx, dy);
            if self.is_in_the_map(n) {
                f(n);
            }
        }
    }

    pub fn foreach_diagonal_neighbor(&self, pos: Position, mut f: impl FnMut(Position)) {
        for (dx, dy) in Position::DIAGONAL_NEIGHBORS {
            let n = pos.add(dx, dy);
            if self.is_in_the_map(n) {
                f(n);
            }
        }
    }

    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let mut out = Vec::with_capacity(8);
        self.foreach_neighbor(pos, |n| out.push(n));
        out
    }

    pub fn direct_neighbors(&self, pos: Position) -> Vec<Position> {
        let mut out = Vec::with_capacity(4);
        self.foreach_direct_neighbor(pos, |n| out.push(n));
        out
    }

    pub fn mint_id(&mut self) -> ObjectId {
        self.ids.next()
    }

    pub fn object(&self, id: ObjectId) -> Option<&ScenarioObject> {
        self.objects.get(&id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut ScenarioObject> {
        self.objects.get_mut(&id)
    }

    pub fn element(&self, id: ObjectId) -> Option<&MapElement> {
        self.elements.get(&id)
    }

    pub fn road_nodes(&self) -> &[ObjectId] {
        &self.road_nodes
    }

    pub fn add_road_node(&mut self, id: ObjectId) {
        self.road_nodes.push(id);
    }

    pub fn roads(&self) -> &[RoadInfo] {
        &self.roads
    }

    pub fn add_road(&mut self, info: RoadInfo) {
        self.roads.push(info);
    }

    /// Registers a footprint + object under `id` (already minted). This is
    /// the single low-level commit point every variant-specific placement
    /// helper funnels through (§9 Polymorphic placement).
    pub fn insert_object(&mut self, id: ObjectId, elem: MapElement, object: ScenarioObject) {
        trace!(object_id = id.0, x = elem.pos.x, y = elem.pos.y, "inserting scenario object");
        self.elements.insert(id, elem);
        self.objects.insert(id, object);
    }

    pub fn all_objects(&self) -> impl Iterator<Item = (&ObjectId, &ScenarioObject)> {
        self.objects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_detection() {
        let map = TileMap::new(10, 10);
        assert!(map.is_at_the_border(Position::new(0, 5)));
        assert!(map.is_at_the_border(Position::new(9, 5)));
        assert!(!map.is_at_the_border(Position::new(5, 5)));
    }

    #[test]
    fn update_distances_takes_the_minimum() {
        let mut map = TileMap::new(5, 5);
        map.update_distances(Position::new(0, 0));
        map.update_distances(Position::new(4, 4));
        let d = map.get_nearest_object_distance(Position::new(0, 0));
        assert_eq!(d, 0.0);
        let mid = map.get_nearest_object_distance(Position::new(2, 2));
        assert!(mid <= Position::new(0, 0).squared_distance(Position::new(2, 2)));
    }

    #[test]
    fn neighbors_exclude_out_of_map() {
        let map = TileMap::new(10, 10);
        let n = map.neighbors(Position::new(0, 0));
        assert_eq!(n.len(), 3);
    }
}
