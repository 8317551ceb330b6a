use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;
use crate::map_element::MapElement;

/// A single soldier/leader placed into one of a [`Group`]'s six slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotUnit {
    pub unit_id: String,
    pub is_leader: bool,
    pub is_big: bool,
}

/// Six indexed slots arranged as two rows of three columns (§3 Group).
/// `{0, 2, 4}` is the front line, `{1, 3, 5}` the back line; column `k` is
/// the pair `(2k, 2k+1)`, and a "big" unit occupies both slots of its
/// column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    pub slots: [Option<SlotUnit>; 6],
}

pub const FRONT_LINE: [usize; 3] = [0, 2, 4];
pub const BACK_LINE: [usize; 3] = [1, 3, 5];

impl Group {
    pub fn is_frontline(slot: usize) -> bool {
        slot % 2 == 0
    }

    pub fn column_of(slot: usize) -> usize {
        slot / 2
    }

    pub fn column_slots(column: usize) -> (usize, usize) {
        (column * 2, column * 2 + 1)
    }

    pub fn free_slots(&self) -> Vec<usize> {
        (0..6).filter(|&i| self.slots[i].is_none()).collect()
    }

    pub fn leader_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| matches!(s, Some(u) if u.is_leader))
    }

    pub fn soldier_count(&self) -> usize {
        // Count occupied slots once per unit: a big unit fills two slots
        // but represents one creature taking two columns of leadership
        // capacity, so we count occupied slots rather than distinct units.
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Places `unit` into `slot` (and its paired slot, for a big unit).
    /// Returns `false` if the placement would violate slot invariants.
    pub fn place(&mut self, slot: usize, unit: SlotUnit) -> bool {
        if slot >= 6 || self.slots[slot].is_some() {
            return false;
        }
        if unit.is_leader && self.leader_slot().is_some() {
            return false;
        }
        if unit.is_big {
            let column = Self::column_of(slot);
            let (a, b) = Self::column_slots(column);
            if self.slots[a].is_some() || self.slots[b].is_some() {
                return false;
            }
            self.slots[a] = Some(unit.clone());
            self.slots[b] = Some(unit);
            true
        } else {
            self.slots[slot] = Some(unit);
            true
        }
    }

    /// Invariant check used by tests and by the composer after assembly:
    /// at most one leader, a big unit's pair references the same unit, and
    /// (when a leader is present) its leadership covers the slots used by
    /// soldiers.
    pub fn check_invariants(&self, leadership_of: impl Fn(&str) -> u32) -> bool {
        let leaders: Vec<usize> = (0..6)
            .filter(|&i| matches!(&self.slots[i], Some(u) if u.is_leader))
            .collect();
        if leaders.len() > 1 {
            return false;
        }
        for column in 0..3 {
            let (a, b) = Self::column_slots(column);
            match (&self.slots[a], &self.slots[b]) {
                (Some(ua), Some(ub)) if ua.is_big || ub.is_big => {
                    if !(ua.is_big && ub.is_big && ua.unit_id == ub.unit_id) {
                        return false;
                    }
                }
                _ => {}
            }
        }
        if let Some(leader_slot) = leaders.first() {
            let leader_id = self.slots[*leader_slot].as_ref().unwrap().unit_id.clone();
            let soldier_slot_count = self.slots.iter().filter(|s| s.is_some()).count() - 1;
            if leadership_of(&leader_id) < soldier_slot_count as u32 {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Gold,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub item_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FortificationTier {
    Village,
    Capital,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fortification {
    pub elem: MapElement,
    pub tier: FortificationTier,
    pub garrison: Group,
    /// Stack id of a visitor currently inside, if any.
    pub visitor: Option<ObjectId>,
    pub owner_id: Option<u8>,
    pub subrace: String,
    pub name: String,
    pub level: u8,
    pub inventory: Inventory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stack {
    pub elem: MapElement,
    pub group: Group,
    pub inventory: Inventory,
    pub leader_id: Option<String>,
    pub owner_id: Option<u8>,
    pub subrace: Option<String>,
    /// Footprint of a fortification this stack garrisons/visits, if any.
    pub inside_id: Option<ObjectId>,
    pub facing: u8,
    pub ai_priority: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteVariant {
    Merchant,
    Mage,
    Mercenary,
    Trainer,
    ResourceMarket,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteContents {
    pub item_ids: Vec<String>,
    pub spell_ids: Vec<String>,
    pub unit_ids: Vec<String>,
    pub exchange_rates: Vec<(String, u32)>,
    pub stock: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub elem: MapElement,
    pub variant: SiteVariant,
    pub title: String,
    pub description: String,
    pub image: String,
    pub ai_priority: i32,
    pub contents: SiteContents,
    pub guard_id: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ruin {
    pub elem: MapElement,
    pub title: String,
    pub image: String,
    pub guard_id: Option<ObjectId>,
    pub gold: u32,
    pub item_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    pub elem: MapElement,
    pub resource: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bag {
    pub elem: MapElement,
    pub image: String,
    pub item_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmark {
    pub elem: MapElement,
    pub type_id: String,
}

/// Tagged union of every scenario object variant (§9 Ownership graph: a
/// tagged-variant store rather than runtime downcasts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioObject {
    Fortification(Fortification),
    Stack(Stack),
    Site(Site),
    Ruin(Ruin),
    Crystal(Crystal),
    Bag(Bag),
    Landmark(Landmark),
}

impl ScenarioObject {
    pub fn elem(&self) -> &MapElement {
        match self {
            ScenarioObject::Fortification(o) => &o.elem,
            ScenarioObject::Stack(o) => &o.elem,
            ScenarioObject::Site(o) => &o.elem,
            ScenarioObject::Ruin(o) => &o.elem,
            ScenarioObject::Crystal(o) => &o.elem,
            ScenarioObject::Bag(o) => &o.elem,
            ScenarioObject::Landmark(o) => &o.elem,
        }
    }

    /// Fortifications, ruins and sites register themselves as road network
    /// nodes (§9 Polymorphic placement); stacks, crystals, bags and
    /// landmarks do not.
    pub fn is_road_node(&self) -> bool {
        matches!(
            self,
            ScenarioObject::Fortification(_) | ScenarioObject::Ruin(_) | ScenarioObject::Site(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str) -> SlotUnit {
        SlotUnit {
            unit_id: id.into(),
            is_leader: false,
            is_big: false,
        }
    }

    #[test]
    fn at_most_one_leader() {
        let mut g = Group::default();
        let mut leader = unit("l1");
        leader.is_leader = true;
        assert!(g.place(2, leader.clone()));
        assert!(!g.place(3, leader));
    }

    #[test]
    fn big_unit_occupies_both_column_slots_with_same_id() {
        let mut g = Group::default();
        let mut big = unit("dragon");
        big.is_big = true;
        assert!(g.place(0, big));
        assert_eq!(g.slots[0].as_ref().unwrap().unit_id, "dragon");
        assert_eq!(g.slots[1].as_ref().unwrap().unit_id, "dragon");
        assert!(g.check_invariants(|_| 10));
    }

    #[test]
    fn front_and_back_line_partition_is_correct() {
        for s in FRONT_LINE {
            assert!(Group::is_frontline(s));
        }
        for s in BACK_LINE {
            assert!(!Group::is_frontline(s));
        }
    }
}
