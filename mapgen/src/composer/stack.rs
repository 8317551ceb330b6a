use catalog::{Catalogs, RequestedStack, UnitInfo};

use crate::composer::constrained_sum::constrained_sum;
use crate::object::{Group, Inventory, SlotUnit, BACK_LINE, FRONT_LINE};
use crate::rng::GenRng;
use crate::settings::GeneratorSettings;

/// Result of composing one stack's garrison: the filled [`Group`], the
/// leader's unit id (if any), and anything added to the stack's inventory
/// as a side effect of composition (§4.6).
pub struct ComposedStack {
    pub group: Group,
    pub leader_id: Option<String>,
    pub inventory: Inventory,
    pub value_spent: u32,
}

fn eligible_leaders<'a>(catalogs: &'a dyn Catalogs, requested: &RequestedStack, subrace: &str) -> Vec<&'a UnitInfo> {
    catalogs
        .leaders_by_subrace(subrace)
        .into_iter()
        .filter(|u| !requested.forbidden_units.contains(&u.id))
        .filter(|u| requested.leader_ids.is_empty() || requested.leader_ids.contains(&u.id))
        .collect()
}

/// Picks the best-value leader the budget can afford, relaxing a minimum
/// value coefficient downward over up to 5 sweeps (§4.6 leader selection).
/// If every sweep fails, falls back to the weakest leader the budget can
/// still afford, so a stack with any affordable leader never comes back
/// leaderless.
fn pick_leader<'a>(
    rng: &mut GenRng,
    candidates: &[&'a UnitInfo],
    budget: u32,
    settings: &GeneratorSettings,
) -> Option<&'a UnitInfo> {
    let mut coeff = settings.leader_min_value_coeff_start;
    for _ in 0..5 {
        let mut affordable: Vec<&'a UnitInfo> = candidates
            .iter()
            .copied()
            .filter(|u| u.value <= budget && u.value as f32 >= budget as f32 * coeff)
            .collect();
        if !affordable.is_empty() {
            affordable.sort_by_key(|u| u.value);
            let best_value = affordable.last().unwrap().value;
            let top: Vec<&'a UnitInfo> = affordable.into_iter().filter(|u| u.value == best_value).collect();
            let pick = rng.pick_index(top.len()).unwrap_or(0);
            return Some(top[pick]);
        }
        coeff = (coeff - settings.leader_min_value_coeff_step).max(0.0);
    }

    let mut affordable: Vec<&'a UnitInfo> = candidates.iter().copied().filter(|u| u.value <= budget).collect();
    if affordable.is_empty() {
        return None;
    }
    affordable.sort_by_key(|u| u.value);
    Some(affordable[0])
}

fn pick_soldier<'a>(rng: &mut GenRng, candidates: &[&'a UnitInfo], budget: i64) -> Option<&'a UnitInfo> {
    let affordable: Vec<&'a UnitInfo> = candidates.iter().copied().filter(|u| u.value as i64 <= budget).collect();
    if affordable.is_empty() {
        return None;
    }
    let idx = rng.pick_index(affordable.len())?;
    Some(affordable[idx])
}

/// Places the leader in the back line when a slot is free there, since a
/// leader fights from the rear; falls back to the front line for a
/// single-leader, no-soldiers stack.
fn leader_slot(group: &Group) -> Option<usize> {
    BACK_LINE
        .into_iter()
        .find(|&s| group.slots[s].is_none())
        .or_else(|| FRONT_LINE.into_iter().find(|&s| group.slots[s].is_none()))
}

/// Composes a garrison/patrol stack's `Group` from a value budget (§4.6):
/// roll the total value, pick an affordable leader, split what's left into
/// soldier sub-budgets, fill slots (front line first, honoring big-unit
/// column pairing), then spend any leftover on a tighten pass and a
/// leadership item if the leader can't quite cover the soldier count.
pub fn compose_stack(
    rng: &mut GenRng,
    catalogs: &dyn Catalogs,
    settings: &GeneratorSettings,
    requested: &RequestedStack,
) -> ComposedStack {
    let subrace = requested.subrace.clone().unwrap_or_else(|| "human".to_string());
    let total_value = rng.pick_value(&requested.value).max(0) as u32;

    let leader_candidates = eligible_leaders(catalogs, requested, &subrace);
    let leader = pick_leader(rng, &leader_candidates, total_value, settings);

    let mut group = Group::default();
    let mut spent = 0u32;
    let mut leader_id = None;
    if let Some(leader) = leader {
        if let Some(slot) = leader_slot(&group) {
            group.place(
                slot,
                SlotUnit {
                    unit_id: leader.id.clone(),
                    is_leader: true,
                    is_big: leader.is_big,
                },
            );
            leader_id = Some(leader.id.clone());
            spent += leader.value;
        }
    }

    let remaining_value = total_value.saturating_sub(spent) as i64;
    let free_slots = group.free_slots();
    let soldier_candidates: Vec<&UnitInfo> = catalogs
        .units_by_subrace(&subrace)
        .into_iter()
        .filter(|u| !requested.forbidden_units.contains(&u.id))
        .collect();
    let min_soldier_value = catalogs.min_soldier_value() as i64;

    if !free_slots.is_empty() && !soldier_candidates.is_empty() && remaining_value >= min_soldier_value {
        let max_parts = free_slots.len();
        let affordable_parts = (remaining_value / min_soldier_value.max(1)).max(1) as usize;
        let parts = affordable_parts.min(max_parts).max(1);
        let max_each = remaining_value - min_soldier_value * (parts as i64 - 1);
        let budgets = constrained_sum(rng, remaining_value, parts, min_soldier_value.min(remaining_value / parts as i64), max_each.max(min_soldier_value));

        for (i, &slot) in free_slots.iter().take(parts).enumerate() {
            if group.slots[slot].is_some() {
                continue;
            }
            let sub_budget = budgets.get(i).copied().unwrap_or(0);
            let is_big_slot_available = {
                let column = Group::column_of(slot);
                let (a, b) = Group::column_slots(column);
                group.slots[a].is_none() && group.slots[b].is_none()
            };
            let mut pool: Vec<&UnitInfo> = soldier_candidates
                .iter()
                .copied()
                .filter(|u| !u.is_big || is_big_slot_available)
                .collect();
            pool.retain(|u| u.value as i64 <= sub_budget.max(min_soldier_value));
            if pool.is_empty() {
                continue;
            }
            if let Some(unit) = pick_soldier(rng, &pool, sub_budget.max(min_soldier_value)) {
                if group.place(
                    slot,
                    SlotUnit {
                        unit_id: unit.id.clone(),
                        is_leader: false,
                        is_big: unit.is_big,
                    },
                ) {
                    spent += unit.value;
                }
            }
        }
    }

    // Tighten pass: spend whatever is still left by upgrading the cheapest
    // placed soldier to a pricier affordable one, capped to avoid looping
    // forever over a catalog with no headroom.
    let mut leftover = total_value.saturating_sub(spent) as i64;
    let mut iterations = 0;
    while leftover > 0 && iterations < settings.tighten_max_iterations {
        iterations += 1;
        let Some(cheapest_slot) = group
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Some(u) if !u.is_leader))
            .min_by_key(|(_, s)| catalogs.unit(&s.as_ref().unwrap().unit_id).map(|u| u.value).unwrap_or(0))
            .map(|(i, _)| i)
        else {
            break;
        };
        let current_value = group.slots[cheapest_slot]
            .as_ref()
            .and_then(|s| catalogs.unit(&s.unit_id))
            .map(|u| u.value)
            .unwrap_or(0);
        let budget = current_value as i64 + leftover;
        let Some(upgrade) = soldier_candidates
            .iter()
            .filter(|u| u.value as i64 <= budget && u.value as i64 > current_value as i64)
            .max_by_key(|u| u.value)
        else {
            break;
        };
        leftover -= upgrade.value as i64 - current_value as i64;
        group.slots[cheapest_slot] = Some(SlotUnit {
            unit_id: upgrade.id.clone(),
            is_leader: false,
            is_big: upgrade.is_big,
        });
    }

    let mut inventory = Inventory::default();
    if let Some(ref leader) = leader_id {
        let base_leadership = catalogs.unit(leader).map(|u| u.leadership).unwrap_or(0);
        let soldier_count = group.soldier_count().saturating_sub(1) as u32;
        // Each item grants +1 Leadership; keep attaching them until the
        // leader supports the whole produced group (§4.6 step 8).
        let mut leadership = base_leadership;
        while leadership < soldier_count {
            inventory.item_ids.push(catalogs.leadership_item_id().to_string());
            leadership += 1;
        }
    }

    ComposedStack {
        group,
        leader_id,
        inventory,
        value_spent: spent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{FixtureCatalogs, Reach, RandomValue};

    fn fixture() -> FixtureCatalogs {
        let mut c = FixtureCatalogs::default();
        c.min_soldier_value = 5;
        c.min_leader_value = 20;
        c.leadership_item_id = "banner_of_command".into();
        c.units.insert(
            "orc_warlord".into(),
            UnitInfo {
                id: "orc_warlord".into(),
                value: 40,
                enroll_cost: 40,
                level: 4,
                hp: 60,
                move_points: 2,
                reach: Reach::Melee,
                is_big: false,
                subrace: "orc".into(),
                leadership: 3,
                is_leader: true,
            },
        );
        c.units.insert(
            "orc_grunt".into(),
            UnitInfo {
                id: "orc_grunt".into(),
                value: 10,
                enroll_cost: 10,
                level: 1,
                hp: 15,
                move_points: 2,
                reach: Reach::Melee,
                is_big: false,
                subrace: "orc".into(),
                leadership: 0,
                is_leader: false,
            },
        );
        c.units.insert(
            "orc_ogre".into(),
            UnitInfo {
                id: "orc_ogre".into(),
                value: 25,
                enroll_cost: 25,
                level: 3,
                hp: 50,
                move_points: 1,
                reach: Reach::Melee,
                is_big: true,
                subrace: "orc".into(),
                leadership: 0,
                is_leader: false,
            },
        );
        c
    }

    #[test]
    fn compose_stack_picks_a_leader_and_fills_soldier_slots() {
        let catalogs = fixture();
        let settings = GeneratorSettings::default();
        let requested = RequestedStack {
            value: RandomValue::fixed(150),
            subrace: Some("orc".into()),
            leader_ids: vec![],
            forbidden_units: vec![],
        };
        let mut rng = GenRng::from_seed(21);
        let composed = compose_stack(&mut rng, &catalogs, &settings, &requested);
        assert_eq!(composed.leader_id.as_deref(), Some("orc_warlord"));
        assert!(composed.group.soldier_count() >= 2);
    }

    #[test]
    fn deterministic_for_a_fixed_seed() {
        let catalogs = fixture();
        let settings = GeneratorSettings::default();
        let requested = RequestedStack {
            value: RandomValue::new(50, 150),
            subrace: Some("orc".into()),
            leader_ids: vec![],
            forbidden_units: vec![],
        };
        let mut rng_a = GenRng::from_seed(99);
        let mut rng_b = GenRng::from_seed(99);
        let a = compose_stack(&mut rng_a, &catalogs, &settings, &requested);
        let b = compose_stack(&mut rng_b, &catalogs, &settings, &requested);
        assert_eq!(a.leader_id, b.leader_id);
        assert_eq!(a.value_spent, b.value_spent);
    }
}
