use catalog::{validate_template, Catalogs, Template};
use tracing::info;
use util::GenResult;

use crate::filler::fill_zone;
use crate::ids::ZoneId;
use crate::position::VPosition;
use crate::rng::GenRng;
use crate::settings::GeneratorSettings;
use crate::tile_map::TileMap;
use crate::zone::Zone;

/// Lays each template zone out on a simple grid of normalized centers.
/// Real zone geometry is handed down by an external layout step that is
/// out of scope here (§1 Non-goals); this is a deterministic stand-in so
/// the generator has somewhere concrete to put each zone's footprint.
fn grid_centers(count: usize) -> Vec<VPosition> {
    if count == 0 {
        return Vec::new();
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = (count + cols - 1) / cols;
    (0..count)
        .map(|i| {
            let col = i % cols;
            let row = i / cols;
            let fx = (col as f32 + 0.5) / cols as f32;
            let fy = (row as f32 + 0.5) / rows as f32;
            VPosition::set_center(fx, fy)
        })
        .collect()
}

/// Top-level entry point wiring a template, a catalog set, and a seed
/// through every zone (§5 Concurrency model: strictly sequential, one
/// shared PRNG stream — nothing here runs zones in parallel).
pub struct Generator<'a> {
    catalogs: &'a dyn Catalogs,
    settings: GeneratorSettings,
}

impl<'a> Generator<'a> {
    pub fn new(catalogs: &'a dyn Catalogs, settings: GeneratorSettings) -> Self {
        Self { catalogs, settings }
    }

    pub fn generate(&self, template: &Template, seed: u64, map_width: i32, map_height: i32) -> GenResult<TileMap> {
        validate_template(template)?;
        info!(seed, map_width, map_height, zones = template.zones.len(), "starting scenario generation");

        let mut map = TileMap::new(map_width, map_height);
        let mut rng = GenRng::from_seed(seed);

        let centers = grid_centers(template.zones.len());
        let half_extent = (map_width.min(map_height) / 2).max(4);

        let mut zones: Vec<Zone> = template
            .zones
            .iter()
            .zip(centers.into_iter())
            .map(|(tz, center)| {
                let mut zone = Zone::new(ZoneId(tz.id), tz.zone_type, tz.border_type, tz.gap_chance as u32, center);
                zone.owner_id = tz.owner_id;
                zone.subrace = tz.subrace.clone();
                zone.resolve_bounds(map_width, map_height, half_extent);
                zone
            })
            .collect();

        for (zone, tz) in zones.iter_mut().zip(template.zones.iter()) {
            info!(zone_id = tz.id, zone_type = ?tz.zone_type, "filling zone");
            fill_zone(&mut map, zone, tz, &mut rng, self.catalogs, &self.settings, template.settings.forest_pct)?;
        }

        for zone in &zones {
            for c in template.connections.iter().filter(|c| c.from == zone.id.0) {
                info!(from = c.from, to = c.to, "connection declared between zones (inter-zone roads not yet surveyed)");
            }
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{BorderType, FixtureCatalogs, Settings, Template, ZoneContents, ZoneTemplate, ZoneType};
    use std::collections::HashMap;

    fn minimal_template() -> Template {
        Template {
            settings: Settings {
                name: "Test Scenario".into(),
                description: String::new(),
                max_players: 2,
                size_min: 48,
                size_max: 48,
                roads_pct: 50,
                forest_pct: 10,
                starting_gold: 500,
                starting_native_mana: 0,
                iterations: 1,
                custom_parameters: HashMap::new(),
                forbidden_units: vec![],
                forbidden_items: vec![],
                forbidden_spells: vec![],
            },
            zones: vec![
                ZoneTemplate {
                    id: 0,
                    zone_type: ZoneType::PlayerStart,
                    border_type: BorderType::Closed,
                    gap_chance: 0,
                    owner_id: Some(0),
                    subrace: Some("human".into()),
                    contents: ZoneContents::default(),
                },
                ZoneTemplate {
                    id: 1,
                    zone_type: ZoneType::AiStart,
                    border_type: BorderType::Closed,
                    gap_chance: 0,
                    owner_id: Some(1),
                    subrace: Some("orc".into()),
                    contents: ZoneContents::default(),
                },
            ],
            connections: vec![],
            diplomacy: vec![],
            scenario_variables: HashMap::new(),
        }
    }

    #[test]
    fn generate_produces_a_capital_per_starting_zone() {
        let catalogs = FixtureCatalogs::default();
        let generator = Generator::new(&catalogs, GeneratorSettings::default());
        let template = minimal_template();
        let map = generator.generate(&template, 77, 80, 80).unwrap();
        let capitals = map
            .all_objects()
            .filter(|(_, o)| {
                matches!(
                    o,
                    crate::object::ScenarioObject::Fortification(f) if f.tier == crate::object::FortificationTier::Capital
                )
            })
            .count();
        assert_eq!(capitals, 2);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let catalogs = FixtureCatalogs::default();
        let generator = Generator::new(&catalogs, GeneratorSettings::default());
        let template = minimal_template();
        let map_a = generator.generate(&template, 55, 80, 80).unwrap();
        let map_b = generator.generate(&template, 55, 80, 80).unwrap();
        assert_eq!(map_a.all_objects().count(), map_b.all_objects().count());
    }
}
