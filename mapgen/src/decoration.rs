use catalog::{BorderType, Catalogs};

use crate::map_element::MapElement;
use crate::object::{Landmark, ScenarioObject};
use crate::occupancy::TileState;
use crate::position::Position;
use crate::rng::GenRng;
use crate::settings::GeneratorSettings;
use crate::tile::Ground;
use crate::tile_map::TileMap;
use crate::zone::Zone;

fn is_on_border_ring(zone: &Zone, pos: Position) -> bool {
    pos.x == zone.min.x || pos.x == zone.max.x || pos.y == zone.min.y || pos.y == zone.max.y
}

/// Paints a zone's outer ring according to its border type (§4.9): `Water`
/// drowns it, `Closed` seals it, `Open` leaves it walkable, and `SemiOpen`
/// rolls the zone's `gap_chance` per tile between the two.
pub fn create_border(map: &mut TileMap, zone: &mut Zone, rng: &mut GenRng) {
    let ring: Vec<Position> = zone
        .possible_tiles
        .iter()
        .copied()
        .filter(|&p| is_on_border_ring(zone, p))
        .collect();

    for p in ring {
        match zone.border_type {
            BorderType::Water => {
                map.tile_mut(p).set_terrain_ground(crate::tile::Terrain::Neutral, Ground::Water);
                map.set_occupied(p, TileState::Blocked);
                zone.remove_possible_tile(p);
            }
            BorderType::Closed => {
                map.set_occupied(p, TileState::Blocked);
                zone.remove_possible_tile(p);
            }
            BorderType::Open => {
                map.set_occupied(p, TileState::Free);
                zone.remove_possible_tile(p);
                zone.free_paths.push(p);
            }
            BorderType::SemiOpen => {
                if rng.chance(zone.gap_chance) {
                    map.set_occupied(p, TileState::Free);
                    zone.free_paths.push(p);
                } else {
                    map.set_occupied(p, TileState::Blocked);
                }
                zone.remove_possible_tile(p);
            }
        }
    }
}

fn square_fits(map: &TileMap, zone: &Zone, anchor: Position, size: i32) -> bool {
    (0..size).all(|dy| (0..size).all(|dx| {
        let p = anchor.add(dx, dy);
        zone.contains(p) && map.is_blocked(p)
    }))
}

/// Scans the zone's bounding box for an anchor whose footprint is entirely
/// `Blocked` (obstacles land on reserved-for-obstacles space, not on
/// whatever is still buildable — §4.9).
fn find_square(map: &TileMap, zone: &Zone, size: i32) -> Option<Position> {
    (zone.min.y..=zone.max.y)
        .flat_map(|y| (zone.min.x..=zone.max.x).map(move |x| Position::new(x, y)))
        .find(|&p| square_fits(map, zone, p, size))
}

/// Greedily fills remaining open space with obstacles, trying the largest
/// catalog mountain footprint first and falling back to smaller ones
/// (§4.9). Each candidate has a chance of becoming a themed landmark of the
/// same footprint instead of a plain mountain.
pub fn create_obstacles(map: &mut TileMap, zone: &mut Zone, rng: &mut GenRng, catalogs: &dyn Catalogs, settings: &GeneratorSettings) {
    let mut sizes: Vec<u8> = catalogs.mountain_sizes().to_vec();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    if sizes.is_empty() {
        sizes.push(1);
    }

    for &size in &sizes {
        let size = size as i32;
        loop {
            let Some(anchor) = find_square(map, zone, size) else {
                break;
            };
            let footprint: Vec<Position> = (0..size).flat_map(|dy| (0..size).map(move |dx| (dx, dy))).map(|(dx, dy)| anchor.add(dx, dy)).collect();

            if rng.chance(settings.landmark_substitution_pct) {
                if let Some(landmark) = catalogs.landmarks_of_size(size as u8).first() {
                    let id = map.mint_id();
                    let elem = MapElement::new(anchor, size, size);
                    for &p in &footprint {
                        map.set_occupied(p, TileState::Blocked);
                        zone.remove_possible_tile(p);
                    }
                    map.insert_object(
                        id,
                        elem.clone(),
                        ScenarioObject::Landmark(Landmark {
                            elem,
                            type_id: landmark.id.clone(),
                        }),
                    );
                    zone.decorations.push(id);
                    continue;
                }
            }

            for &p in &footprint {
                map.tile_mut(p).set_terrain_ground(crate::tile::Terrain::Neutral, Ground::Mountain);
                map.set_occupied(p, TileState::Blocked);
                zone.remove_possible_tile(p);
            }
        }
    }
}

/// Decides the fate of every remaining `Possible` tile (§4.9): a
/// `forest_pct` roll either turns it into forested, walked-over ground
/// (`Used`) or frees it into the path network. No tile is left dangling
/// as `Possible` after this pass.
pub fn paint_forest(map: &mut TileMap, zone: &mut Zone, rng: &mut GenRng, forest_pct: u8) {
    let candidates: Vec<Position> = zone.possible_tiles.clone();
    for p in candidates {
        if rng.chance(forest_pct as u32) {
            map.tile_mut(p).tree_image = Some("forest".to_string());
            map.set_occupied(p, TileState::Used);
            zone.remove_possible_tile(p);
        } else {
            map.set_occupied(p, TileState::Free);
            zone.remove_possible_tile(p);
            zone.free_paths.push(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ZoneType;

    use crate::ids::ZoneId;
    use crate::position::VPosition;

    fn bounded_zone(map: &mut TileMap, border_type: BorderType) -> Zone {
        for y in 0..map.height() {
            for x in 0..map.width() {
                map.set_occupied(Position::new(x, y), TileState::Possible);
            }
        }
        let mut zone = Zone::new(ZoneId(0), ZoneType::PlayerStart, border_type, 50, VPosition::set_center(0.5, 0.5));
        zone.min = Position::new(0, 0);
        zone.max = Position::new(map.width() - 1, map.height() - 1);
        for y in 0..map.height() {
            for x in 0..map.width() {
                zone.possible_tiles.push(Position::new(x, y));
            }
        }
        zone
    }

    #[test]
    fn water_border_blocks_and_floods_the_ring() {
        let mut map = TileMap::new(10, 10);
        let mut zone = bounded_zone(&mut map, BorderType::Water);
        let mut rng = GenRng::from_seed(1);
        create_border(&mut map, &mut zone, &mut rng);
        assert_eq!(map.tile(Position::new(0, 5)).ground, Ground::Water);
        assert!(map.is_blocked(Position::new(0, 5)));
    }

    #[test]
    fn open_border_is_walkable() {
        let mut map = TileMap::new(10, 10);
        let mut zone = bounded_zone(&mut map, BorderType::Open);
        let mut rng = GenRng::from_seed(1);
        create_border(&mut map, &mut zone, &mut rng);
        assert!(map.is_free(Position::new(0, 5)));
    }
}
