use util::GenResult;

use crate::pathfinding::create_road;
use crate::tile_map::{RoadInfo, TileMap};
use crate::zone::Zone;

/// Connects every road-network node in a zone with a minimum spanning tree
/// of surveyed roads (§4.9 `connectRoads`). Prim's algorithm: grow a
/// connected set one cheapest edge at a time, where an edge's cost is the
/// straight-line distance between the two elements' entrances.
pub fn connect_roads(map: &mut TileMap, zone: &mut Zone) -> GenResult<()> {
    let nodes = zone.road_nodes.clone();
    if nodes.len() < 2 {
        return Ok(());
    }

    let mut connected = vec![nodes[0]];
    let mut remaining: Vec<_> = nodes[1..].to_vec();

    while !remaining.is_empty() {
        let mut best: Option<(usize, usize, f32)> = None;
        for (ri, &r) in remaining.iter().enumerate() {
            let Some(r_entrance) = map.element(r).map(|e| e.entrance()) else {
                continue;
            };
            for &c in &connected {
                let Some(c_entrance) = map.element(c).map(|e| e.entrance()) else {
                    continue;
                };
                let cost = r_entrance.squared_distance(c_entrance);
                if best.map(|(_, _, b)| cost < b).unwrap_or(true) {
                    best = Some((ri, nodes.iter().position(|&n| n == c).unwrap(), cost));
                }
            }
        }

        let Some((ri, ci, _)) = best else {
            break;
        };
        let from = nodes[ci];
        let to = remaining[ri];
        let from_pos = map.element(from).unwrap().entrance();
        let to_pos = map.element(to).unwrap().entrance();

        if let Ok(path) = create_road(map, from_pos, to_pos) {
            for &p in &path {
                map.set_road(p, true);
            }
            map.add_road(RoadInfo {
                source: from,
                dest: to,
                path: path.clone(),
            });
            zone.roads.push(RoadInfo {
                source: from,
                dest: to,
                path,
            });
        }
        connected.push(to);
        remaining.remove(ri);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{BorderType, ZoneType};

    use crate::ids::ZoneId;
    use crate::map_element::MapElement;
    use crate::object::{Fortification, FortificationTier, Group, Inventory, ScenarioObject};
    use crate::occupancy::TileState;
    use crate::position::{Position, VPosition};

    fn village(map: &mut TileMap, pos: Position) -> crate::ids::ObjectId {
        let elem = MapElement::new(pos, 2, 2);
        for p in elem.blocked_offsets() {
            map.set_occupied(p, TileState::Used);
        }
        let id = map.mint_id();
        map.insert_object(
            id,
            elem.clone(),
            ScenarioObject::Fortification(Fortification {
                elem,
                tier: FortificationTier::Village,
                garrison: Group::default(),
                visitor: None,
                owner_id: None,
                subrace: "human".into(),
                name: "Outpost".into(),
                level: 1,
                inventory: Inventory::default(),
            }),
        );
        id
    }

    #[test]
    fn spanning_tree_connects_every_node_with_n_minus_one_roads() {
        let mut map = TileMap::new(30, 30);
        for y in 0..30 {
            for x in 0..30 {
                map.set_occupied(Position::new(x, y), TileState::Free);
            }
        }
        let mut zone = Zone::new(ZoneId(0), ZoneType::PlayerStart, BorderType::Open, 0, VPosition::set_center(0.5, 0.5));
        let a = village(&mut map, Position::new(2, 2));
        let b = village(&mut map, Position::new(20, 2));
        let c = village(&mut map, Position::new(10, 20));
        zone.road_nodes = vec![a, b, c];

        connect_roads(&mut map, &mut zone).unwrap();
        assert_eq!(zone.roads.len(), 2);
    }
}
