use catalog::{Catalogs, ItemType, RequestedCity, RequestedRuin, RequestedSite, RequestedStack, SiteKind};
use util::GenResult;

use crate::composer::{compose_loot, compose_stack};
use crate::ids::ObjectId;
use crate::map_element::MapElement;
use crate::object::{
    Fortification, FortificationTier, Group, Inventory, Ruin, Site, SiteContents, SiteVariant, Stack,
};
use crate::placement::{find_place_for_object, find_place_near, try_to_place_object_and_connect_to_path};
use crate::rng::GenRng;
use crate::settings::GeneratorSettings;
use crate::tile_map::TileMap;
use crate::zone::Zone;

fn site_kind_to_variant(kind: SiteKind) -> Option<SiteVariant> {
    match kind {
        SiteKind::Merchant => Some(SiteVariant::Merchant),
        SiteKind::Mage => Some(SiteVariant::Mage),
        SiteKind::Mercenary => Some(SiteVariant::Mercenary),
        SiteKind::Trainer => Some(SiteVariant::Trainer),
        SiteKind::ResourceMarket => Some(SiteVariant::ResourceMarket),
        SiteKind::Ruin => None,
    }
}

/// Places and composes a guarding stack right beside a just-placed object's
/// entrance, if the request asked for one (§4.8 `guardObject`).
fn guard_object(
    map: &mut TileMap,
    zone: &mut Zone,
    rng: &mut GenRng,
    catalogs: &dyn Catalogs,
    settings: &GeneratorSettings,
    anchor_entrance: crate::position::Position,
    requested: &Option<RequestedStack>,
) -> Option<ObjectId> {
    let requested = requested.as_ref()?;
    let elem = find_place_near(map, zone, anchor_entrance, 1, 1, 3)?;
    let composed = compose_stack(rng, catalogs, settings, requested);
    let (id, outcome) =
        try_to_place_object_and_connect_to_path(map, zone, elem, |elem| {
            crate::object::ScenarioObject::Stack(Stack {
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
        })
        .ok()?;
    if matches!(outcome, crate::placement::PlaceOutcome::Success) {
        zone.stacks.push(id);
        Some(id)
    } else {
        None
    }
}

fn build_contents(catalogs: &dyn Catalogs, rng: &mut GenRng, kind: SiteKind, budget: u32) -> SiteContents {
    match kind {
        SiteKind::Merchant | SiteKind::ResourceMarket => {
            let items = compose_loot(
                rng,
                catalogs,
                budget,
                &[],
                &[],
                &[ItemType::Weapon, ItemType::Armor, ItemType::Valuable, ItemType::Misc],
            );
            SiteContents {
                item_ids: items,
                stock: budget,
                ..Default::default()
            }
        }
        SiteKind::Mage => {
            let mut pool = catalogs.spells_of_type("arcane");
            rng.shuffle(&mut pool);
            let mut spells = Vec::new();
            let mut remaining = budget as i64;
            for spell in pool {
                if spell.value as i64 <= remaining {
                    remaining -= spell.value as i64;
                    spells.push(spell.id.clone());
                }
                if remaining <= 0 {
                    break;
                }
            }
            SiteContents {
                spell_ids: spells,
                stock: budget,
                ..Default::default()
            }
        }
        SiteKind::Mercenary => {
            let mut pool = catalogs.units_by_subrace("any");
            if pool.is_empty() {
                pool = catalogs.units_by_subrace("human");
            }
            rng.shuffle(&mut pool);
            let mut units = Vec::new();
            let mut remaining = budget as i64;
            for unit in pool {
                if unit.enroll_cost as i64 <= remaining {
                    remaining -= unit.enroll_cost as i64;
                    units.push(unit.id.clone());
                }
                if remaining <= 0 {
                    break;
                }
            }
            SiteContents {
                unit_ids: units,
                stock: budget,
                ..Default::default()
            }
        }
        SiteKind::Trainer => SiteContents {
            stock: budget,
            ..Default::default()
        },
        SiteKind::Ruin => SiteContents::default(),
    }
}

/// Places one non-ruin site variant (§4.8): a 3x3 footprint at least
/// `site_min_distance` from the nearest other object.
pub fn place_site(
    map: &mut TileMap,
    zone: &mut Zone,
    rng: &mut GenRng,
    catalogs: &dyn Catalogs,
    settings: &GeneratorSettings,
    requested: &RequestedSite,
) -> GenResult<Option<ObjectId>> {
    let Some(variant) = site_kind_to_variant(requested.kind) else {
        return Ok(None);
    };
    let Some(elem) = find_place_for_object(
        map,
        zone,
        rng,
        settings.site_probe_size,
        settings.site_probe_size,
        settings.site_min_distance,
    ) else {
        return Ok(None);
    };

    let budget = rng.pick_value(&requested.budget_value).max(0) as u32;
    let title = catalogs.site_text(requested.kind).first().cloned().unwrap_or_default();
    let image = catalogs
        .site_images(requested.kind)
        .first()
        .cloned()
        .unwrap_or_default();
    let contents = build_contents(catalogs, rng, requested.kind, budget);

    let entrance = elem.entrance();
    let (id, outcome) = try_to_place_object_and_connect_to_path(map, zone, elem, |elem| {
        crate::object::ScenarioObject::Site(Site {
            elem,
            variant,
            title,
            description: String::new(),
            image,
            ai_priority: 0,
            contents,
            guard_id: None,
        })
    })?;
    if !matches!(outcome, crate::placement::PlaceOutcome::Success) {
        return Ok(None);
    }

    let guard_id = guard_object(map, zone, rng, catalogs, settings, entrance, &requested.guard);
    if let Some(guard_id) = guard_id {
        if let Some(crate::object::ScenarioObject::Site(site)) = map.object_mut(id) {
            site.guard_id = Some(guard_id);
        }
    }
    map.add_road_node(id);
    zone.road_nodes.push(id);
    record_site(zone, requested.kind, id);
    Ok(Some(id))
}

fn record_site(zone: &mut Zone, kind: SiteKind, id: ObjectId) {
    match kind {
        SiteKind::Merchant => zone.merchants.push(id),
        SiteKind::Mage => zone.mages.push(id),
        SiteKind::Mercenary => zone.mercenaries.push(id),
        SiteKind::Trainer => zone.trainers.push(id),
        SiteKind::ResourceMarket => zone.markets.push(id),
        SiteKind::Ruin => {}
    }
}

/// Places a ruin (§4.8): loot and gold composed from the request, an
/// optional guard, no exchange contents.
pub fn place_ruin(
    map: &mut TileMap,
    zone: &mut Zone,
    rng: &mut GenRng,
    catalogs: &dyn Catalogs,
    settings: &GeneratorSettings,
    requested: &RequestedRuin,
) -> GenResult<Option<ObjectId>> {
    let Some(elem) = find_place_for_object(
        map,
        zone,
        rng,
        settings.site_probe_size,
        settings.site_probe_size,
        settings.site_min_distance,
    ) else {
        return Ok(None);
    };

    let gold = rng.pick_value(&requested.gold).max(0) as u32;
    let loot = compose_loot(rng, catalogs, 0, &requested.loot_item_pool, &[], &[]);
    let item_id = rng.pick(&loot).cloned();
    let title = catalogs.site_text(SiteKind::Ruin).first().cloned().unwrap_or_default();
    let image = catalogs.site_images(SiteKind::Ruin).first().cloned().unwrap_or_default();

    let entrance = elem.entrance();
    let (id, outcome) = try_to_place_object_and_connect_to_path(map, zone, elem, |elem| {
        crate::object::ScenarioObject::Ruin(Ruin {
            elem,
            title,
            image,
            guard_id: None,
            gold,
            item_id,
        })
    })?;
    if !matches!(outcome, crate::placement::PlaceOutcome::Success) {
        return Ok(None);
    }

    let guard_id = guard_object(map, zone, rng, catalogs, settings, entrance, &requested.guard);
    if let Some(guard_id) = guard_id {
        if let Some(crate::object::ScenarioObject::Ruin(ruin)) = map.object_mut(id) {
            ruin.guard_id = Some(guard_id);
        }
    }
    map.add_road_node(id);
    zone.road_nodes.push(id);
    zone.ruins.push(id);
    Ok(Some(id))
}

/// Places a tiered neutral city (§4.8): 4x4 footprint, `city_min_distance`
/// spacing, garrisoned per the request.
pub fn place_neutral_city(
    map: &mut TileMap,
    zone: &mut Zone,
    rng: &mut GenRng,
    catalogs: &dyn Catalogs,
    settings: &GeneratorSettings,
    requested: &RequestedCity,
) -> GenResult<Option<ObjectId>> {
    let Some(elem) = find_place_for_object(
        map,
        zone,
        rng,
        settings.city_probe_size,
        settings.city_probe_size,
        settings.city_min_distance,
    ) else {
        return Ok(None);
    };

    let garrison_request = catalog::RequestedStack {
        value: requested.garrison_value,
        subrace: Some(requested.subrace.clone()),
        leader_ids: vec![],
        forbidden_units: vec![],
    };
    let composed = compose_stack(rng, catalogs, settings, &garrison_request);
    let name = catalogs
        .city_names(&requested.subrace)
        .first()
        .cloned()
        .unwrap_or_else(|| "Free City".to_string());

    let (id, outcome) = try_to_place_object_and_connect_to_path(map, zone, elem, |elem| {
        crate::object::ScenarioObject::Fortification(Fortification {
            elem,
            tier: FortificationTier::Village,
            garrison: composed.group,
            visitor: None,
            owner_id: None,
            subrace: requested.subrace.clone(),
            name,
            level: requested.tier,
            inventory: composed.inventory,
        })
    })?;
    if !matches!(outcome, crate::placement::PlaceOutcome::Success) {
        return Ok(None);
    }
    map.add_road_node(id);
    zone.road_nodes.push(id);
    zone.neutral_cities.push(id);
    Ok(Some(id))
}

/// Places a starting zone's capital at the zone center with a cleared
/// entrance, rather than searching for a spaced-out spot the way other
/// fortifications do (§4.8 capitals).
pub fn place_capital(
    map: &mut TileMap,
    zone: &mut Zone,
    subrace: &str,
    width: i32,
    height: i32,
) -> GenResult<ObjectId> {
    let elem = MapElement::new(
        crate::position::Position::new(zone.pos.x - width / 2, zone.pos.y - height / 2),
        width,
        height,
    );
    for p in elem.blocked_offsets() {
        map.set_occupied(p, crate::occupancy::TileState::Used);
        zone.remove_possible_tile(p);
    }
    map.tile_mut(elem.entrance()).visitable = true;
    map.set_occupied(elem.entrance(), crate::occupancy::TileState::Free);
    zone.free_paths.push(elem.entrance());
    map.update_distances(elem.entrance());

    let id = map.mint_id();
    map.insert_object(
        id,
        elem.clone(),
        crate::object::ScenarioObject::Fortification(Fortification {
            elem,
            tier: FortificationTier::Capital,
            garrison: Group::default(),
            visitor: None,
            owner_id: zone.owner_id,
            subrace: subrace.to_string(),
            name: "Capital".to_string(),
            level: 1,
            inventory: Inventory::default(),
        }),
    );
    map.add_road_node(id);
    zone.road_nodes.push(id);
    Ok(id)
}
