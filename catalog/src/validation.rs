//! Pre-generation template validation (§6). Rejections here are
//! [`util::GenError::TemplateInvalid`]; they abort generation before any
//! tile is touched.

use std::collections::HashSet;

use util::{GenError, GenResult};

use crate::template::Template;

pub fn validate_template(template: &Template) -> GenResult<()> {
    let settings = &template.settings;

    if template.starting_zone_count() > settings.max_players as usize {
        return Err(GenError::template_invalid(format!(
            "template declares {} starting zones but max_players is {}",
            template.starting_zone_count(),
            settings.max_players
        )));
    }

    if settings.size_min > settings.size_max {
        return Err(GenError::template_invalid(format!(
            "size_min {} exceeds size_max {}",
            settings.size_min, settings.size_max
        )));
    }

    let mut seen_pairs: HashSet<(u8, u8)> = HashSet::new();
    for entry in &template.diplomacy {
        if entry.alliance && entry.always_at_war {
            return Err(GenError::template_invalid(format!(
                "diplomacy entry ({}, {}) declares both alliance and always_at_war",
                entry.civ_a, entry.civ_b
            )));
        }
        if entry.permanent_alliance && !entry.alliance {
            return Err(GenError::template_invalid(format!(
                "diplomacy entry ({}, {}) declares permanent_alliance without alliance",
                entry.civ_a, entry.civ_b
            )));
        }
        let key = if entry.civ_a <= entry.civ_b {
            (entry.civ_a, entry.civ_b)
        } else {
            (entry.civ_b, entry.civ_a)
        };
        if !seen_pairs.insert(key) {
            return Err(GenError::template_invalid(format!(
                "duplicate diplomacy relation between civs {} and {}",
                entry.civ_a, entry.civ_b
            )));
        }
    }

    let zone_ids: HashSet<u32> = template.zones.iter().map(|z| z.id).collect();
    for conn in &template.connections {
        if !zone_ids.contains(&conn.from) || !zone_ids.contains(&conn.to) {
            return Err(GenError::template_invalid(format!(
                "connection references unknown zone ({} -> {})",
                conn.from, conn.to
            )));
        }
        if !(0.0..=1.0).contains(&conn.size) {
            return Err(GenError::template_invalid(format!(
                "connection ({} -> {}) size {} out of range 0..1",
                conn.from, conn.to, conn.size
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::*;
    use std::collections::HashMap;

    fn base_settings() -> Settings {
        Settings {
            name: "t".into(),
            description: String::new(),
            max_players: 2,
            size_min: 48,
            size_max: 144,
            roads_pct: 50,
            forest_pct: 20,
            starting_gold: 1000,
            starting_native_mana: 0,
            iterations: 1,
            custom_parameters: HashMap::new(),
            forbidden_units: vec![],
            forbidden_items: vec![],
            forbidden_spells: vec![],
        }
    }

    fn zone(id: u32, zone_type: ZoneType) -> ZoneTemplate {
        ZoneTemplate {
            id,
            zone_type,
            border_type: BorderType::Closed,
            gap_chance: 0,
            owner_id: None,
            subrace: None,
            contents: ZoneContents::default(),
        }
    }

    #[test]
    fn rejects_too_many_starting_zones() {
        let mut t = Template {
            settings: base_settings(),
            zones: vec![
                zone(0, ZoneType::PlayerStart),
                zone(1, ZoneType::PlayerStart),
                zone(2, ZoneType::AiStart),
            ],
            connections: vec![],
            diplomacy: vec![],
            scenario_variables: HashMap::new(),
        };
        t.settings.max_players = 2;
        assert!(validate_template(&t).is_err());
    }

    #[test]
    fn rejects_alliance_and_always_at_war() {
        let t = Template {
            settings: base_settings(),
            zones: vec![zone(0, ZoneType::PlayerStart)],
            connections: vec![],
            diplomacy: vec![DiplomacyEntry {
                civ_a: 0,
                civ_b: 1,
                relation: 50,
                alliance: true,
                always_at_war: true,
                permanent_alliance: false,
            }],
            scenario_variables: HashMap::new(),
        };
        assert!(validate_template(&t).is_err());
    }

    #[test]
    fn rejects_duplicate_relation() {
        let t = Template {
            settings: base_settings(),
            zones: vec![zone(0, ZoneType::PlayerStart)],
            connections: vec![],
            diplomacy: vec![
                DiplomacyEntry {
                    civ_a: 0,
                    civ_b: 1,
                    relation: 50,
                    alliance: false,
                    always_at_war: false,
                    permanent_alliance: false,
                },
                DiplomacyEntry {
                    civ_a: 1,
                    civ_b: 0,
                    relation: 10,
                    alliance: false,
                    always_at_war: false,
                    permanent_alliance: false,
                },
            ],
            scenario_variables: HashMap::new(),
        };
        assert!(validate_template(&t).is_err());
    }

    #[test]
    fn accepts_well_formed_template() {
        let t = Template {
            settings: base_settings(),
            zones: vec![zone(0, ZoneType::PlayerStart), zone(1, ZoneType::AiStart)],
            connections: vec![Connection {
                from: 0,
                to: 1,
                size: 0.5,
                guard: None,
            }],
            diplomacy: vec![],
            scenario_variables: HashMap::new(),
        };
        assert!(validate_template(&t).is_ok());
    }
}
