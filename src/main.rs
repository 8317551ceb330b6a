//! Minimal harness: builds a small fixture template and catalog set, runs
//! one generation pass, and logs a summary of what came out. Not a CLI —
//! there is no argument parsing surface to maintain, just a fixed demo run
//! useful for sanity-checking the pipeline end to end.

use std::collections::HashMap;

use catalog::{
    BorderType, FixtureCatalogs, ItemInfo, ItemType, RandomValue, Reach, RequestedSite,
    RequestedStack, Settings, SiteKind, Template, UnitInfo, ZoneContents, ZoneTemplate, ZoneType,
};
use mapgen::settings::GeneratorSettings;
use mapgen::Generator;
use tracing::info;

fn fixture_catalogs() -> FixtureCatalogs {
    let mut c = FixtureCatalogs::default();
    c.min_leader_value = 20;
    c.min_soldier_value = 5;
    c.leadership_item_id = "banner_of_command".into();
    c.mountain_sizes = vec![3, 2, 1];

    for (id, subrace, value, is_leader, is_big, leadership) in [
        ("human_knight_captain", "human", 45, true, false, 4),
        ("human_footman", "human", 12, false, false, 0),
        ("human_archer", "human", 10, false, false, 0),
        ("human_griffin", "human", 30, false, true, 0),
        ("orc_warlord", "orc", 40, true, false, 3),
        ("orc_grunt", "orc", 10, false, false, 0),
        ("orc_ogre", "orc", 25, false, true, 0),
    ] {
        c.units.insert(
            id.to_string(),
            UnitInfo {
                id: id.to_string(),
                value,
                enroll_cost: value,
                level: 1,
                hp: 20,
                move_points: 2,
                reach: Reach::Melee,
                is_big,
                subrace: subrace.to_string(),
                leadership,
                is_leader,
            },
        );
    }

    c.items.insert(
        "banner_of_command".to_string(),
        ItemInfo {
            id: "banner_of_command".to_string(),
            item_type: ItemType::Leadership,
            value: 15,
        },
    );
    c.items.insert(
        "ring_of_wit".to_string(),
        ItemInfo {
            id: "ring_of_wit".to_string(),
            item_type: ItemType::Valuable,
            value: 25,
        },
    );

    c.city_names.insert("human".to_string(), vec!["Oakhaven".to_string()]);
    c.city_names.insert("orc".to_string(), vec!["Skarnak".to_string()]);
    c.site_text
        .insert(SiteKind::Merchant, vec!["A traveling merchant's stall.".to_string()]);
    c.site_images.insert(SiteKind::Merchant, vec!["merchant_hut".to_string()]);
    c.site_text.insert(SiteKind::Ruin, vec!["Crumbled stonework.".to_string()]);
    c.site_images.insert(SiteKind::Ruin, vec!["ruin_small".to_string()]);

    c
}

fn fixture_template() -> Template {
    let mut merchant_contents = ZoneContents::default();
    merchant_contents.merchants.push(RequestedSite {
        kind: SiteKind::Merchant,
        budget_value: RandomValue::new(50, 100),
        guard: Some(RequestedStack {
            value: RandomValue::new(20, 40),
            subrace: Some("human".to_string()),
            leader_ids: vec![],
            forbidden_units: vec![],
        }),
    });

    Template {
        settings: Settings {
            name: "Demo Scenario".to_string(),
            description: "Harness fixture run".to_string(),
            max_players: 2,
            size_min: 64,
            size_max: 64,
            roads_pct: 60,
            forest_pct: 15,
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
                subrace: Some("human".to_string()),
                contents: merchant_contents,
            },
            ZoneTemplate {
                id: 1,
                zone_type: ZoneType::AiStart,
                border_type: BorderType::Closed,
                gap_chance: 0,
                owner_id: Some(1),
                subrace: Some("orc".to_string()),
                contents: ZoneContents::default(),
            },
            ZoneTemplate {
                id: 2,
                zone_type: ZoneType::Junction,
                border_type: BorderType::SemiOpen,
                gap_chance: 40,
                owner_id: None,
                subrace: None,
                contents: ZoneContents::default(),
            },
        ],
        connections: vec![],
        diplomacy: vec![],
        scenario_variables: HashMap::new(),
    }
}

fn main() {
    util::logging::init_tracing();

    let catalogs = fixture_catalogs();
    let generator = Generator::new(&catalogs, GeneratorSettings::default());
    let template = fixture_template();

    match generator.generate(&template, 42, 96, 96) {
        Ok(map) => {
            let object_count = map.all_objects().count();
            let road_count = map.roads().len();
            info!(object_count, road_count, "generation finished");
        }
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            std::process::exit(1);
        }
    }
}
