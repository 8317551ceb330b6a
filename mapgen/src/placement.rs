use util::{GenError, GenResult};

use crate::ids::ObjectId;
use crate::map_element::MapElement;
use crate::object::ScenarioObject;
use crate::occupancy::TileState;
use crate::pathfinding::connect_path;
use crate::position::Position;
use crate::rng::GenRng;
use crate::tile_map::TileMap;
use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Success,
    CannotFit,
    SealedOff,
}

fn footprint_fits(map: &TileMap, zone: &Zone, elem: &MapElement) -> bool {
    elem.footprint().iter().all(|&p| zone.contains(p) && map.is_possible(p))
}

/// Rejects any footprint that would touch the map's outer edge (§4.4): a
/// placed object must sit fully inside the map, never flush against it.
fn touches_map_border(map: &TileMap, elem: &MapElement) -> bool {
    elem.touches_rect(0, 0, map.width(), map.height()) || elem.footprint().iter().any(|&p| map.is_at_the_border(p))
}

/// Searches `zone.possible_tiles` for the anchor that maximizes distance
/// from whatever has already been placed, among anchors whose footprint
/// fully fits and whose entrance clears `min_distance` from the nearest
/// object (§4.4 `findPlaceForObject`).
pub fn find_place_for_object(
    map: &TileMap,
    zone: &Zone,
    rng: &mut GenRng,
    width: i32,
    height: i32,
    min_distance: f32,
) -> Option<MapElement> {
    let mut candidates: Vec<Position> = zone.possible_tiles.clone();
    rng.shuffle(&mut candidates);

    let mut best: Option<(MapElement, f32)> = None;
    for anchor in candidates {
        let elem = MapElement::new(anchor, width, height);
        if touches_map_border(map, &elem) {
            continue;
        }
        if !footprint_fits(map, zone, &elem) {
            continue;
        }
        let dist = map.get_nearest_object_distance(elem.entrance());
        if dist < min_distance {
            continue;
        }
        if best.as_ref().map(|(_, d)| dist > *d).unwrap_or(true) {
            best = Some((elem, dist));
        }
    }
    best.map(|(elem, _)| elem)
}

/// Spiral search for a footprint near `anchor`, used to place objects that
/// must sit close to another object rather than maximize spread (§4.5
/// close objects: mines beside their crystal, guards beside what they
/// guard).
pub fn find_place_near(map: &TileMap, zone: &Zone, anchor: Position, width: i32, height: i32, max_radius: i32) -> Option<MapElement> {
    for radius in 0..=max_radius {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let elem = MapElement::new(anchor.add(dx, dy), width, height);
                if footprint_fits(map, zone, &elem) {
                    return Some(elem);
                }
            }
        }
    }
    None
}

/// Installs `elem`'s footprint as `Used`/soft-`Free`, attempts to stitch its
/// entrance into the zone's path network, and on success commits `object`
/// under a freshly minted id. On failure the footprint tiles already sealed
/// by `connect_path`'s own exhaustion handling are left sealed (they were
/// genuinely unreachable), but the footprint itself is rolled back so the
/// caller can retry elsewhere (§4.4 `tryToPlaceObjectAndConnectToPath`).
pub fn try_to_place_object_and_connect_to_path(
    map: &mut TileMap,
    zone: &mut Zone,
    elem: MapElement,
    build: impl FnOnce(MapElement) -> ScenarioObject,
) -> GenResult<(ObjectId, PlaceOutcome)> {
    if !footprint_fits(map, zone, &elem) {
        return Ok((ObjectId(u32::MAX), PlaceOutcome::CannotFit));
    }

    for &p in &elem.blocked_offsets() {
        map.set_occupied(p, TileState::Used);
        zone.remove_possible_tile(p);
    }
    for &p in &elem.soft_tiles() {
        if map.is_possible(p) {
            map.set_occupied(p, TileState::Free);
            zone.remove_possible_tile(p);
        }
    }
    map.tile_mut(elem.entrance()).visitable = true;

    match connect_path(map, zone, elem.entrance()) {
        Ok(_) => {
            map.update_distances(elem.entrance());
            let id = map.mint_id();
            let object = build(elem.clone());
            map.insert_object(id, elem, object);
            Ok((id, PlaceOutcome::Success))
        }
        Err(err) => {
            for &p in &elem.blocked_offsets() {
                map.set_occupied(p, TileState::Possible);
            }
            for &p in &elem.soft_tiles() {
                map.set_occupied(p, TileState::Possible);
            }
            map.tile_mut(elem.entrance()).visitable = false;
            if matches!(err, GenError::LackOfSpace { .. }) {
                Ok((ObjectId(u32::MAX), PlaceOutcome::SealedOff))
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{BorderType, ZoneType};

    use crate::ids::ZoneId;
    use crate::object::{Crystal, ScenarioObject};
    use crate::position::VPosition;

    fn open_zone(map: &mut TileMap) -> Zone {
        for y in 0..map.height() {
            for x in 0..map.width() {
                map.set_occupied(Position::new(x, y), TileState::Possible);
            }
        }
        let mut zone = Zone::new(ZoneId(0), ZoneType::PlayerStart, BorderType::Open, 0, VPosition::set_center(0.5, 0.5));
        zone.pos = Position::new(map.width() / 2, map.height() / 2);
        zone.min = Position::new(0, 0);
        zone.max = Position::new(map.width() - 1, map.height() - 1);
        for y in 0..map.height() {
            for x in 0..map.width() {
                zone.possible_tiles.push(Position::new(x, y));
            }
        }
        map.set_occupied(zone.pos, TileState::Free);
        zone.remove_possible_tile(zone.pos);
        zone.free_paths.push(zone.pos);
        zone
    }

    #[test]
    fn find_place_for_object_returns_a_fitting_footprint() {
        let mut map = TileMap::new(30, 30);
        let zone = open_zone(&mut map);
        let mut rng = GenRng::from_seed(9);
        let elem = find_place_for_object(&map, &zone, &mut rng, 2, 2, 0.0).unwrap();
        assert!(elem.footprint().iter().all(|&p| map.is_possible(p)));
    }

    #[test]
    fn successful_placement_commits_the_object_and_connects_it() {
        let mut map = TileMap::new(30, 30);
        let mut zone = open_zone(&mut map);
        let mut rng = GenRng::from_seed(9);
        let elem = find_place_for_object(&map, &zone, &mut rng, 1, 1, 0.0).unwrap();
        let (id, outcome) = try_to_place_object_and_connect_to_path(&mut map, &mut zone, elem, |elem| {
            ScenarioObject::Crystal(Crystal {
                elem,
                resource: "gold_ore".into(),
            })
        })
        .unwrap();
        assert_eq!(outcome, PlaceOutcome::Success);
        assert!(map.object(id).is_some());
    }
}
