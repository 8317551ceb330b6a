use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use util::{GenError, GenResult};

use crate::occupancy::TileState;
use crate::position::Position;
use crate::rng::GenRng;
use crate::tile_map::TileMap;
use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scored {
    f: f32,
    pos: Position,
}

impl Eq for Scored {}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the lowest f-score first.
        other.f.partial_cmp(&self.f).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct(came_from: &HashMap<Position, Position>, mut current: Position) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Generic A* over the map grid. `step_cost` returns `None` to veto a move
/// into `to`, `Some(cost)` otherwise; `is_goal` stops the search at the
/// first expanded node it accepts.
fn astar(
    map: &TileMap,
    start: Position,
    is_goal: impl Fn(Position) -> bool,
    step_cost: impl Fn(&TileMap, Position, Position) -> Option<f32>,
    heuristic: impl Fn(Position) -> f32,
) -> Option<Vec<Position>> {
    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_score: HashMap<Position, f32> = HashMap::new();

    g_score.insert(start, 0.0);
    open.push(Scored {
        f: heuristic(start),
        pos: start,
    });

    let mut visited = HashMap::new();

    while let Some(Scored { pos: current, .. }) = open.pop() {
        if visited.contains_key(&current) {
            continue;
        }
        visited.insert(current, true);

        if is_goal(current) {
            return Some(reconstruct(&came_from, current));
        }

        let mut neighbors = Vec::with_capacity(8);
        map.foreach_neighbor(current, |n| neighbors.push(n));

        for next in neighbors {
            let Some(step) = step_cost(map, current, next) else {
                continue;
            };
            let tentative = g_score[&current] + step;
            if tentative < *g_score.get(&next).unwrap_or(&f32::INFINITY) {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                open.push(Scored {
                    f: tentative + heuristic(next),
                    pos: next,
                });
            }
        }
    }
    None
}

fn closed_set(map: &TileMap, start: Position, is_goal: impl Fn(Position) -> bool, step_cost: impl Fn(&TileMap, Position, Position) -> Option<f32>) -> Vec<Position> {
    // Re-run a plain flood fill with the same traversal predicate to recover
    // the set of tiles a failed search actually reached, so callers can seal
    // them off (§4.2 `connectPath` exhaustion behavior).
    let mut frontier = vec![start];
    let mut seen = HashMap::new();
    seen.insert(start, true);
    let mut reached = Vec::new();
    while let Some(current) = frontier.pop() {
        if is_goal(current) {
            continue;
        }
        reached.push(current);
        let mut neighbors = Vec::with_capacity(8);
        map.foreach_neighbor(current, |n| neighbors.push(n));
        for next in neighbors {
            if seen.contains_key(&next) {
                continue;
            }
            if step_cost(map, current, next).is_some() {
                seen.insert(next, true);
                frontier.push(next);
            }
        }
    }
    reached
}

/// Cost of stepping onto `to` while carving toward a zone's center: `Free`
/// tiles are cheapest (reuse existing paths), `Possible` tiles cost more,
/// `Blocked`/`Used` tiles (other than the destination) veto the move.
fn carve_step_cost(map: &TileMap, _from: Position, to: Position) -> Option<f32> {
    if !map.is_in_the_map(to) {
        return None;
    }
    match map.state(to) {
        TileState::Free => Some(1.0),
        TileState::Possible => Some(3.0),
        TileState::Blocked => None,
        TileState::Used => {
            if map.tile(to).visitable {
                Some(1.0)
            } else {
                None
            }
        }
    }
}

/// A* from `start` to the zone's center, painting the discovered path
/// `Free` on success (§4.2 `connectWithCenter`).
pub fn connect_with_center(map: &mut TileMap, zone: &Zone, start: Position) -> GenResult<Vec<Position>> {
    let goal = zone.pos;
    let path = astar(
        map,
        start,
        |p| p == goal || map.is_free(p),
        carve_step_cost,
        |p| p.squared_distance(goal),
    )
    .ok_or_else(|| GenError::internal(zone.id.0, "no path to zone center"))?;

    for &p in &path {
        if map.is_possible(p) {
            map.set_occupied(p, TileState::Free);
        }
    }
    Ok(path)
}

/// Greedy steepest-descent walk from `src` toward `dst` (§4.2 `crunchPath`),
/// used to carve the fractal branches (§4.3). Only 4-connected neighbors are
/// considered, keeping the carved network 4-connected per the `freePaths ∪
/// roadTiles` invariant (§8); each `Possible` tile stepped onto is carved
/// `Free` immediately. Stops on reaching `dst`, an existing `Free` tile, or
/// once the walk strays `min_distance` (squared) from `src` with no
/// closer-to-`dst` neighbor left to take.
pub fn crunch_path(map: &mut TileMap, rng: &mut GenRng, src: Position, dst: Position, min_distance: f32) -> Vec<Position> {
    let mut path = vec![src];
    let mut current = src;
    loop {
        if current == dst || (current != src && map.is_free(current)) {
            break;
        }
        if current.squared_distance(src) >= min_distance {
            break;
        }
        let current_dist = current.squared_distance(dst);
        let mut candidates: Vec<Position> = Vec::new();
        map.foreach_direct_neighbor(current, |n| {
            if map.is_in_the_map(n) && !map.is_blocked(n) && !path.contains(&n) && n.squared_distance(dst) < current_dist {
                candidates.push(n);
            }
        });
        if candidates.is_empty() {
            break;
        }
        candidates.sort_by(|a, b| {
            a.squared_distance(dst)
                .partial_cmp(&b.squared_distance(dst))
                .unwrap_or(Ordering::Equal)
        });
        // Keep the closest few and let the rng break ties, rather than
        // deterministically always taking the single closest neighbor.
        let keep = candidates.len().min(3);
        let pick = rng.pick_index(keep).unwrap_or(0);
        current = candidates[pick];
        if map.is_possible(current) {
            map.set_occupied(current, TileState::Free);
        }
        path.push(current);
    }
    path
}

/// A* from `start` to the nearest `Free` tile. On total exhaustion, every
/// `Possible` tile the search actually reached is sealed to `Blocked` and
/// dropped from the zone's `possible_tiles` (§4.2 `connectPath`).
pub fn connect_path(map: &mut TileMap, zone: &mut Zone, start: Position) -> GenResult<Vec<Position>> {
    let found = astar(map, start, |p| map.is_free(p) && p != start, carve_step_cost, |_| 0.0);
    if let Some(path) = found {
        for &p in &path {
            if map.is_possible(p) {
                map.set_occupied(p, TileState::Free);
            }
        }
        return Ok(path);
    }

    let reached = closed_set(map, start, |p| map.is_free(p) && p != start, carve_step_cost);
    for p in reached {
        if map.is_possible(p) {
            map.set_occupied(p, TileState::Blocked);
            zone.remove_possible_tile(p);
        }
    }
    Err(GenError::lack_of_space(zone.id.0, (start.x, start.y), 0))
}

fn road_step_cost(map: &TileMap, from: Position, to: Position) -> Option<f32> {
    if !map.is_in_the_map(to) || map.tile(to).ground == crate::tile::Ground::Water {
        return None;
    }
    if map.is_blocked(to) && !map.tile(to).visitable {
        return None;
    }
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    if dx + dy == 1 {
        Some(1.0)
    } else {
        // Diagonal: forbid cutting between two blocked orthogonal corners.
        let corner_a = Position::new(from.x, to.y);
        let corner_b = Position::new(to.x, from.y);
        if map.is_blocked(corner_a) && map.is_blocked(corner_b) {
            None
        } else {
            Some(2.1)
        }
    }
}

/// A* road-surveying pass between two existing map elements (§4.9
/// `createRoad`): straight steps cost 1, diagonal steps cost 2.1 and are
/// rejected when they would cut between two blocked orthogonal tiles.
pub fn create_road(map: &TileMap, from: Position, to: Position) -> GenResult<Vec<Position>> {
    astar(map, from, |p| p == to, road_step_cost, |p| p.squared_distance(to).sqrt())
        .ok_or_else(|| GenError::internal(0, "no road route between map elements"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{BorderType, ZoneType};

    use crate::ids::ZoneId;
    use crate::position::VPosition;

    fn open_zone(map: &mut TileMap) -> Zone {
        for y in 0..map.height() {
            for x in 0..map.width() {
                map.set_occupied(Position::new(x, y), TileState::Possible);
            }
        }
        let mut zone = Zone::new(ZoneId(0), ZoneType::PlayerStart, BorderType::Open, 0, VPosition::set_center(0.5, 0.5));
        zone.pos = Position::new(map.width() / 2, map.height() / 2);
        zone
    }

    #[test]
    fn connect_with_center_reaches_goal_and_paints_free() {
        let mut map = TileMap::new(20, 20);
        let zone = open_zone(&mut map);
        let path = connect_with_center(&mut map, &zone, Position::new(0, 0)).unwrap();
        assert_eq!(*path.last().unwrap(), zone.pos);
        for p in &path {
            assert!(map.is_free(*p));
        }
    }

    #[test]
    fn crunch_path_walks_toward_dst_and_paints_free() {
        let mut map = TileMap::new(40, 40);
        let _zone = open_zone(&mut map);
        let mut rng = GenRng::from_seed(3);
        let src = Position::new(20, 20);
        let dst = Position::new(25, 20);
        let path = crunch_path(&mut map, &mut rng, src, dst, 100.0);
        assert!(path.len() > 1);
        for &p in &path[1..] {
            assert!(map.is_free(p));
        }
    }

    #[test]
    fn connect_path_seals_off_unreachable_pocket() {
        let mut map = TileMap::new(10, 10);
        let mut zone = open_zone(&mut map);
        // No Free tile exists anywhere, so the search must exhaust and seal.
        let start = Position::new(5, 5);
        let before = map.is_possible(start);
        assert!(before);
        let result = connect_path(&mut map, &mut zone, start);
        assert!(result.is_err());
        assert!(map.is_blocked(start));
    }

    #[test]
    fn create_road_prefers_straight_line() {
        let mut map = TileMap::new(10, 10);
        for y in 0..10 {
            for x in 0..10 {
                map.set_occupied(Position::new(x, y), TileState::Free);
            }
        }
        let path = create_road(&map, Position::new(0, 0), Position::new(5, 0)).unwrap();
        assert_eq!(path.len(), 6);
    }
}
