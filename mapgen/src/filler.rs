use catalog::{Catalogs, RequestedBag, RequestedStack, ZoneTemplate, ZoneType};
use util::GenResult;

use crate::composer::{compose_bag_loot, compose_stack};
use crate::decoration::{create_border, create_obstacles, paint_forest};
use crate::fractalize::fractalize;
use crate::ids::ObjectId;
use crate::object::{Bag, Crystal, ScenarioObject, Stack};
use crate::occupancy::TileState;
use crate::pathfinding::connect_path;
use crate::placement::{find_place_for_object, find_place_near, try_to_place_object_and_connect_to_path, PlaceOutcome};
use crate::position::Position;
use crate::rng::GenRng;
use crate::road_builder::connect_roads;
use crate::settings::GeneratorSettings;
use crate::sites::{place_capital, place_neutral_city, place_ruin, place_site};
use crate::tile::{Ground, Terrain};
use crate::tile_map::TileMap;
use crate::zone::Zone;

fn init_terrain(map: &mut TileMap, zone: &Zone) {
    let terrain = match &zone.subrace {
        Some(subrace) => Terrain::Race(subrace.clone()),
        None => Terrain::Neutral,
    };
    let ground = if matches!(zone.zone_type, ZoneType::Water) { Ground::Water } else { Ground::Normal };
    for y in zone.min.y..=zone.max.y {
        for x in zone.min.x..=zone.max.x {
            map.tile_mut(Position::new(x, y)).set_terrain_ground(terrain.clone(), ground);
        }
    }
}

fn init_free_tiles(map: &mut TileMap, zone: &mut Zone) {
    for y in zone.min.y..=zone.max.y {
        for x in zone.min.x..=zone.max.x {
            let pos = Position::new(x, y);
            if map.get_zone_id(pos).is_none() {
                map.set_zone_id(pos, zone.id);
                zone.possible_tiles.push(pos);
            }
        }
    }
}

/// Gold and native-mana crystals are "close objects" (§4.5): the first one
/// of each such resource in a zone is sought near the zone's capital rather
/// than spread out by `find_place_for_object`'s maximize-distance search.
fn is_close_resource(resource: &str) -> bool {
    let lower = resource.to_ascii_lowercase();
    lower == "gold" || lower.contains("mana")
}

/// The zone's capital entrance if one has been placed yet, else the zone
/// center, used as the target a close object seeks proximity to.
fn close_object_target(map: &TileMap, zone: &Zone) -> Position {
    zone.road_nodes
        .first()
        .and_then(|&id| map.element(id))
        .map(|e| e.entrance())
        .unwrap_or(zone.pos)
}

/// Reserves a 1x1 footprint for a crystal without wiring its path
/// connection yet; `create_required_objects` connects every queued mine in
/// one batch afterward (§4.5). The first gold/native-mana crystal per
/// resource is placed close to the capital instead.
fn place_mines(map: &mut TileMap, zone: &mut Zone, rng: &mut GenRng, mines: &std::collections::HashMap<String, u8>) {
    let close_target = close_object_target(map, zone);
    for (resource, &count) in mines {
        for i in 0..count {
            let close = i == 0 && is_close_resource(resource);
            let elem = if close {
                find_place_near(map, zone, close_target, 1, 1, 12)
            } else {
                find_place_for_object(map, zone, rng, 1, 1, 0.0)
            };
            let Some(elem) = elem else {
                continue;
            };
            for p in elem.blocked_offsets() {
                map.set_occupied(p, TileState::Used);
                zone.remove_possible_tile(p);
            }
            let id = map.mint_id();
            map.insert_object(
                id,
                elem.clone(),
                ScenarioObject::Crystal(Crystal {
                    elem,
                    resource: resource.clone(),
                }),
            );
            zone.required_objects.push(id);
            if close {
                zone.close_objects.push(id);
            }
            zone.mines.push((resource.clone(), id));
        }
    }
}

fn create_required_objects(map: &mut TileMap, zone: &mut Zone) -> GenResult<()> {
    let queued = zone.required_objects.clone();
    for id in queued {
        let Some(elem) = map.element(id) else { continue };
        let entrance = elem.entrance();
        connect_path(map, zone, entrance)?;
        map.update_distances(entrance);
    }
    zone.required_objects.clear();
    Ok(())
}

fn place_stack(map: &mut TileMap, zone: &mut Zone, rng: &mut GenRng, catalogs: &dyn Catalogs, settings: &GeneratorSettings, requested: &RequestedStack) -> GenResult<Option<ObjectId>> {
    let Some(elem) = find_place_for_object(map, zone, rng, 1, 1, 0.0) else {
        return Ok(None);
    };
    let composed = compose_stack(rng, catalogs, settings, requested);
    let (id, outcome) = try_to_place_object_and_connect_to_path(map, zone, elem, |elem| {
        ScenarioObject::Stack(Stack {
            elem,
            group: composed.group,
            inventory: composed.inventory,
            leader_id: composed.leader_id,
            owner_id: None,
            subrace: requested.subrace.clone(),
            inside_id: None,
            facing: 0,
            ai_priority: 0,
        })
    })?;
    if matches!(outcome, PlaceOutcome::Success) {
        zone.stacks.push(id);
        Ok(Some(id))
    } else {
        Ok(None)
    }
}

fn place_bag(map: &mut TileMap, zone: &mut Zone, rng: &mut GenRng, catalogs: &dyn Catalogs, requested: &RequestedBag) -> GenResult<Option<ObjectId>> {
    let Some(elem) = find_place_for_object(map, zone, rng, 1, 1, 0.0) else {
        return Ok(None);
    };
    let items = compose_bag_loot(rng, catalogs, requested);
    let image = catalogs.bag_images(requested.water).first().cloned().unwrap_or_default();
    let (id, outcome) = try_to_place_object_and_connect_to_path(map, zone, elem, |elem| {
        ScenarioObject::Bag(Bag {
            elem,
            image,
            item_ids: items,
        })
    })?;
    if matches!(outcome, PlaceOutcome::Success) {
        zone.bags.push(id);
        Ok(Some(id))
    } else {
        Ok(None)
    }
}

/// Runs the full fill pipeline for one zone (§2): terrain, free-tile init,
/// fractal carving, settlements and sites, mines, loose stacks and bags,
/// border and decoration, and finally the internal road network. A water
/// zone short-circuits after painting since nothing else gets placed on it.
pub fn fill_zone(
    map: &mut TileMap,
    zone: &mut Zone,
    tz: &ZoneTemplate,
    rng: &mut GenRng,
    catalogs: &dyn Catalogs,
    settings: &GeneratorSettings,
    forest_pct: u8,
) -> GenResult<()> {
    init_terrain(map, zone);
    init_free_tiles(map, zone);

    if matches!(zone.zone_type, ZoneType::Water) {
        create_border(map, zone, rng);
        return Ok(());
    }

    fractalize(map, zone, rng, settings);

    if zone.is_starting_zone() {
        let subrace = zone.subrace.clone().unwrap_or_else(|| "human".to_string());
        place_capital(map, zone, &subrace, 4, 4)?;
    } else {
        for city in &tz.contents.neutral_cities {
            place_neutral_city(map, zone, rng, catalogs, settings, city)?;
        }
    }

    for s in &tz.contents.merchants {
        place_site(map, zone, rng, catalogs, settings, s)?;
    }
    for s in &tz.contents.mages {
        place_site(map, zone, rng, catalogs, settings, s)?;
    }
    for s in &tz.contents.mercenaries {
        place_site(map, zone, rng, catalogs, settings, s)?;
    }
    for s in &tz.contents.trainers {
        place_site(map, zone, rng, catalogs, settings, s)?;
    }
    for s in &tz.contents.markets {
        place_site(map, zone, rng, catalogs, settings, s)?;
    }
    for r in &tz.contents.ruins {
        place_ruin(map, zone, rng, catalogs, settings, r)?;
    }

    place_mines(map, zone, rng, &tz.contents.mines);
    create_required_objects(map, zone)?;

    for stack in &tz.contents.stacks {
        place_stack(map, zone, rng, catalogs, settings, stack)?;
    }
    for bag in &tz.contents.bags {
        place_bag(map, zone, rng, catalogs, bag)?;
    }

    create_border(map, zone, rng);
    create_obstacles(map, zone, rng, catalogs, settings);
    paint_forest(map, zone, rng, forest_pct);
    connect_roads(map, zone)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{BorderType, FixtureCatalogs, ZoneContents, ZoneType};

    use crate::ids::ZoneId;
    use crate::position::VPosition;

    fn template_zone(zone_type: ZoneType) -> ZoneTemplate {
        ZoneTemplate {
            id: 0,
            zone_type,
            border_type: BorderType::Closed,
            gap_chance: 0,
            owner_id: Some(0),
            subrace: Some("human".into()),
            contents: ZoneContents::default(),
        }
    }

    #[test]
    fn fill_zone_places_a_capital_for_a_starting_zone() {
        let mut map = TileMap::new(40, 40);
        let mut zone = Zone::new(ZoneId(0), ZoneType::PlayerStart, BorderType::Closed, 0, VPosition::set_center(0.5, 0.5));
        zone.subrace = Some("human".into());
        zone.resolve_bounds(40, 40, 15);
        let tz = template_zone(ZoneType::PlayerStart);
        let catalogs = FixtureCatalogs::default();
        let settings = GeneratorSettings::default();
        let mut rng = GenRng::from_seed(13);

        fill_zone(&mut map, &mut zone, &tz, &mut rng, &catalogs, &settings, 15).unwrap();
        assert_eq!(zone.road_nodes.len(), 1);
    }

    #[test]
    fn water_zone_short_circuits_after_painting() {
        let mut map = TileMap::new(20, 20);
        let mut zone = Zone::new(ZoneId(1), ZoneType::Water, BorderType::Water, 0, VPosition::set_center(0.5, 0.5));
        zone.resolve_bounds(20, 20, 8);
        let tz = template_zone(ZoneType::Water);
        let catalogs = FixtureCatalogs::default();
        let settings = GeneratorSettings::default();
        let mut rng = GenRng::from_seed(3);

        fill_zone(&mut map, &mut zone, &tz, &mut rng, &catalogs, &settings, 15).unwrap();
        assert!(zone.road_nodes.is_empty());
    }
}
