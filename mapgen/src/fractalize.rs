use catalog::ZoneType;

use crate::occupancy::TileState;
use crate::pathfinding::crunch_path;
use crate::rng::GenRng;
use crate::settings::GeneratorSettings;
use crate::tile_map::TileMap;
use crate::zone::Zone;

/// Carves a zone's fractal path network (§4.3). A junction zone has no
/// interior settlement to branch away from, so it skips straight to the
/// final pruning pass and keeps whatever `possible_tiles` the layout step
/// handed it as connection stubs.
pub fn fractalize(map: &mut TileMap, zone: &mut Zone, rng: &mut GenRng, settings: &GeneratorSettings) {
    if zone.free_paths.is_empty() {
        zone.free_paths.push(zone.pos);
        map.set_occupied(zone.pos, TileState::Free);
        zone.remove_possible_tile(zone.pos);
    }

    if !matches!(zone.zone_type, ZoneType::Junction) {
        grow_network(map, zone, rng, settings);
    }

    prune_stray_tiles(map, zone, settings);
}

fn grow_network(map: &mut TileMap, zone: &mut Zone, rng: &mut GenRng, settings: &GeneratorSettings) {
    // An iteration cap stands in for "until no productive branch remains":
    // each round either grows a new branch or runs out of possible tiles,
    // so this always terminates well before the cap in practice.
    for _ in 0..64 {
        if zone.possible_tiles.is_empty() {
            break;
        }
        let Some(&start) = rng.pick(&zone.free_paths) else {
            break;
        };
        let Some(&dst) = rng.pick(&zone.possible_tiles) else {
            break;
        };
        let branch = crunch_path(map, rng, start, dst, settings.fractal_min_distance);
        if branch.len() <= 1 {
            break;
        }
        // `crunch_path` already carved every `Possible` tile it stepped onto
        // `Free`; this just syncs the zone's own bookkeeping to match.
        for &p in &branch[1..] {
            zone.remove_possible_tile(p);
            zone.free_paths.push(p);
        }
    }
}

/// Blocks any remaining `possible_tiles` that sit too far from the carved
/// network to be worth keeping open for later placement (§4.3 final pass).
fn prune_stray_tiles(map: &mut TileMap, zone: &mut Zone, settings: &GeneratorSettings) {
    let threshold = settings.fractal_min_distance * settings.fractal_prune_fraction;
    let stray: Vec<_> = zone
        .possible_tiles
        .iter()
        .copied()
        .filter(|&p| {
            zone.free_paths
                .iter()
                .map(|&f| f.squared_distance(p))
                .fold(f32::INFINITY, f32::min)
                > threshold
        })
        .collect();

    for p in stray {
        map.set_occupied(p, TileState::Blocked);
        zone.remove_possible_tile(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::BorderType;

    use crate::ids::ZoneId;
    use crate::position::{Position, VPosition};

    fn seeded_zone(map: &mut TileMap, zone_type: ZoneType) -> Zone {
        for y in 0..map.height() {
            for x in 0..map.width() {
                map.set_occupied(Position::new(x, y), TileState::Possible);
            }
        }
        let mut zone = Zone::new(ZoneId(0), zone_type, BorderType::Open, 0, VPosition::set_center(0.5, 0.5));
        zone.pos = Position::new(map.width() / 2, map.height() / 2);
        for y in 0..map.height() {
            for x in 0..map.width() {
                zone.possible_tiles.push(Position::new(x, y));
            }
        }
        zone
    }

    #[test]
    fn fractalize_produces_a_connected_free_network() {
        let mut map = TileMap::new(40, 40);
        let mut zone = seeded_zone(&mut map, ZoneType::PlayerStart);
        let mut rng = GenRng::from_seed(11);
        let settings = GeneratorSettings::default();
        fractalize(&mut map, &mut zone, &mut rng, &settings);
        assert!(zone.free_paths.len() > 1);
        for &p in &zone.free_paths {
            assert!(map.is_free(p));
        }
    }

    #[test]
    fn junction_zone_skips_branch_growth() {
        let mut map = TileMap::new(20, 20);
        let mut zone = seeded_zone(&mut map, ZoneType::Junction);
        let mut rng = GenRng::from_seed(5);
        let settings = GeneratorSettings::default();
        fractalize(&mut map, &mut zone, &mut rng, &settings);
        assert_eq!(zone.free_paths.len(), 1);
    }
}
