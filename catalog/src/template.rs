//! Template description (Input 1): the declarative record a scenario is
//! generated from. Loading/parsing this from a script is out of scope; this
//! module only defines the in-memory shape the core consumes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::SiteKind;
use crate::random_value::RandomValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneType {
    PlayerStart,
    AiStart,
    Treasure,
    Junction,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderType {
    Water,
    Open,
    Closed,
    SemiOpen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub name: String,
    pub description: String,
    /// 1..4
    pub max_players: u8,
    /// 48..144
    pub size_min: u32,
    pub size_max: u32,
    /// 0..100
    pub roads_pct: u8,
    /// 0..100
    pub forest_pct: u8,
    /// 0..9999
    pub starting_gold: u32,
    /// 0..9999
    pub starting_native_mana: u32,
    pub iterations: u32,
    pub custom_parameters: HashMap<String, String>,
    pub forbidden_units: Vec<String>,
    pub forbidden_items: Vec<String>,
    pub forbidden_spells: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedStack {
    pub value: RandomValue,
    pub subrace: Option<String>,
    pub leader_ids: Vec<String>,
    pub forbidden_units: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedSite {
    pub kind: SiteKind,
    pub budget_value: RandomValue,
    pub guard: Option<RequestedStack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCity {
    pub tier: u8,
    pub subrace: String,
    pub garrison_value: RandomValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedRuin {
    pub guard: Option<RequestedStack>,
    pub gold: RandomValue,
    pub loot_item_pool: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedBag {
    pub loot_value: RandomValue,
    pub required_items: Vec<String>,
    pub water: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneContents {
    pub neutral_cities: Vec<RequestedCity>,
    pub merchants: Vec<RequestedSite>,
    pub mages: Vec<RequestedSite>,
    pub mercenaries: Vec<RequestedSite>,
    pub trainers: Vec<RequestedSite>,
    pub markets: Vec<RequestedSite>,
    pub ruins: Vec<RequestedRuin>,
    /// Resource id -> quantity of mines requested in this zone.
    pub mines: HashMap<String, u8>,
    pub stacks: Vec<RequestedStack>,
    pub bags: Vec<RequestedBag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneTemplate {
    pub id: u32,
    pub zone_type: ZoneType,
    pub border_type: BorderType,
    /// 0..100, used when `border_type == SemiOpen`.
    pub gap_chance: u8,
    pub owner_id: Option<u8>,
    pub subrace: Option<String>,
    /// The zone's tile set, handed down by the (out-of-scope) geometry
    /// layout step. Stored as width/height-relative fractions is not
    /// required here; the filler receives concrete tiles separately.
    pub contents: ZoneContents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: u32,
    pub to: u32,
    /// 0.0..1.0
    pub size: f32,
    pub guard: Option<RequestedStack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiplomacyEntry {
    pub civ_a: u8,
    pub civ_b: u8,
    /// 0..100
    pub relation: u8,
    pub alliance: bool,
    pub always_at_war: bool,
    pub permanent_alliance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub settings: Settings,
    pub zones: Vec<ZoneTemplate>,
    pub connections: Vec<Connection>,
    pub diplomacy: Vec<DiplomacyEntry>,
    pub scenario_variables: HashMap<String, String>,
}

impl Template {
    pub fn zone(&self, id: u32) -> Option<&ZoneTemplate> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn starting_zone_count(&self) -> usize {
        self.zones
            .iter()
            .filter(|z| matches!(z.zone_type, ZoneType::PlayerStart | ZoneType::AiStart))
            .count()
    }
}
