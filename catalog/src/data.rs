//! Game data catalogs (Input 2): units, items, spells, landmarks and the
//! other read-only tables the zone filler consults. The core never owns or
//! parses these; it borrows a `&dyn Catalogs` for the duration of a run.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Leadership,
    Valuable,
    Weapon,
    Armor,
    Misc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    Merchant,
    Mage,
    Mercenary,
    Trainer,
    ResourceMarket,
    Ruin,
}

#[derive(Debug, Clone)]
pub struct UnitInfo {
    pub id: String,
    pub value: u32,
    pub enroll_cost: u32,
    pub level: u8,
    pub hp: u32,
    pub move_points: u32,
    pub reach: Reach,
    pub is_big: bool,
    pub subrace: String,
    /// Soldier slots this unit can lead, when it carries a leader role.
    pub leadership: u32,
    pub is_leader: bool,
}

#[derive(Debug, Clone)]
pub struct ItemInfo {
    pub id: String,
    pub item_type: ItemType,
    pub value: u32,
}

#[derive(Debug, Clone)]
pub struct SpellInfo {
    pub id: String,
    pub spell_type: String,
    pub level: u8,
    pub value: u32,
}

#[derive(Debug, Clone)]
pub struct LandmarkInfo {
    pub id: String,
    pub size: u8,
    pub is_mountain: bool,
}

/// Immutable, borrowed read access to every game-data table the filler
/// needs. Production code backs this with the loaded ruleset; tests back it
/// with [`FixtureCatalogs`].
pub trait Catalogs {
    fn unit(&self, id: &str) -> Option<&UnitInfo>;
    fn item(&self, id: &str) -> Option<&ItemInfo>;
    fn spell(&self, id: &str) -> Option<&SpellInfo>;
    fn landmark(&self, id: &str) -> Option<&LandmarkInfo>;

    fn units_by_subrace(&self, subrace: &str) -> Vec<&UnitInfo>;
    fn leaders_by_subrace(&self, subrace: &str) -> Vec<&UnitInfo>;
    fn items_of_type(&self, item_type: ItemType) -> Vec<&ItemInfo>;
    fn spells_of_type(&self, spell_type: &str) -> Vec<&SpellInfo>;
    fn landmarks_of_size(&self, size: u8) -> Vec<&LandmarkInfo>;

    fn city_names(&self, subrace: &str) -> &[String];
    fn site_text(&self, kind: SiteKind) -> &[String];
    fn site_images(&self, kind: SiteKind) -> &[String];
    /// Mountain footprint sizes, sorted largest first.
    fn mountain_sizes(&self) -> &[u8];
    fn bag_images(&self, water: bool) -> &[String];

    fn min_leader_value(&self) -> u32;
    fn min_soldier_value(&self) -> u32;

    fn leadership_item_id(&self) -> &str;
}

/// An in-memory, hand-built catalog for tests and the harness binary.
#[derive(Debug, Default)]
pub struct FixtureCatalogs {
    pub units: HashMap<String, UnitInfo>,
    pub items: HashMap<String, ItemInfo>,
    pub spells: HashMap<String, SpellInfo>,
    pub landmarks: HashMap<String, LandmarkInfo>,
    pub city_names: HashMap<String, Vec<String>>,
    pub site_text: HashMap<SiteKind, Vec<String>>,
    pub site_images: HashMap<SiteKind, Vec<String>>,
    pub mountain_sizes: Vec<u8>,
    pub bag_images_land: Vec<String>,
    pub bag_images_water: Vec<String>,
    pub min_leader_value: u32,
    pub min_soldier_value: u32,
    pub leadership_item_id: String,
}

impl Catalogs for FixtureCatalogs {
    fn unit(&self, id: &str) -> Option<&UnitInfo> {
        self.units.get(id)
    }

    fn item(&self, id: &str) -> Option<&ItemInfo> {
        self.items.get(id)
    }

    fn spell(&self, id: &str) -> Option<&SpellInfo> {
        self.spells.get(id)
    }

    fn landmark(&self, id: &str) -> Option<&LandmarkInfo> {
        self.landmarks.get(id)
    }

    fn units_by_subrace(&self, subrace: &str) -> Vec<&UnitInfo> {
        self.units
            .values()
            .filter(|u| !u.is_leader && u.subrace == subrace)
            .collect()
    }

    fn leaders_by_subrace(&self, subrace: &str) -> Vec<&UnitInfo> {
        self.units
            .values()
            .filter(|u| u.is_leader && u.subrace == subrace)
            .collect()
    }

    fn items_of_type(&self, item_type: ItemType) -> Vec<&ItemInfo> {
        self.items.values().filter(|i| i.item_type == item_type).collect()
    }

    fn spells_of_type(&self, spell_type: &str) -> Vec<&SpellInfo> {
        self.spells.values().filter(|s| s.spell_type == spell_type).collect()
    }

    fn landmarks_of_size(&self, size: u8) -> Vec<&LandmarkInfo> {
        self.landmarks.values().filter(|l| l.size == size).collect()
    }

    fn city_names(&self, subrace: &str) -> &[String] {
        self.city_names.get(subrace).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn site_text(&self, kind: SiteKind) -> &[String] {
        self.site_text.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn site_images(&self, kind: SiteKind) -> &[String] {
        self.site_images.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn mountain_sizes(&self) -> &[u8] {
        &self.mountain_sizes
    }

    fn bag_images(&self, water: bool) -> &[String] {
        if water {
            &self.bag_images_water
        } else {
            &self.bag_images_land
        }
    }

    fn min_leader_value(&self) -> u32 {
        self.min_leader_value
    }

    fn min_soldier_value(&self) -> u32 {
        self.min_soldier_value
    }

    fn leadership_item_id(&self) -> &str {
        &self.leadership_item_id
    }
}
