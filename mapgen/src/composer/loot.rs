use catalog::{Catalogs, ItemInfo, ItemType, RequestedBag};

use crate::rng::GenRng;

/// Fills a loot list from a value budget (§4.7): required items are taken
/// first and always included regardless of cost, then the remaining budget
/// is spent on random catalog items of allowed types, in random order,
/// skipping anything that would overshoot what's left.
pub fn compose_loot(
    rng: &mut GenRng,
    catalogs: &dyn Catalogs,
    budget: u32,
    required_items: &[String],
    forbidden_items: &[String],
    allowed_types: &[ItemType],
) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut remaining = budget as i64;

    for id in required_items {
        items.push(id.clone());
        if let Some(info) = catalogs.item(id) {
            remaining -= info.value as i64;
        }
    }

    let mut pool: Vec<&ItemInfo> = allowed_types
        .iter()
        .flat_map(|t| catalogs.items_of_type(*t))
        .filter(|i| !forbidden_items.contains(&i.id) && !required_items.contains(&i.id))
        .collect();
    rng.shuffle(&mut pool);

    for candidate in pool {
        if candidate.value as i64 <= remaining {
            items.push(candidate.id.clone());
            remaining -= candidate.value as i64;
        }
    }

    items
}

/// Composes a loot bag's contents from a [`RequestedBag`] (§4.7, §4.8): a
/// value budget plus any required items, drawn from land or water item
/// pools depending on the bag's placement.
pub fn compose_bag_loot(rng: &mut GenRng, catalogs: &dyn Catalogs, requested: &RequestedBag) -> Vec<String> {
    let budget = rng.pick_value(&requested.loot_value).max(0) as u32;
    compose_loot(
        rng,
        catalogs,
        budget,
        &requested.required_items,
        &[],
        &[ItemType::Valuable, ItemType::Weapon, ItemType::Armor, ItemType::Misc],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{FixtureCatalogs, RandomValue};

    fn fixture() -> FixtureCatalogs {
        let mut c = FixtureCatalogs::default();
        c.items.insert(
            "ring_of_wit".into(),
            ItemInfo {
                id: "ring_of_wit".into(),
                item_type: ItemType::Valuable,
                value: 30,
            },
        );
        c.items.insert(
            "rusty_sword".into(),
            ItemInfo {
                id: "rusty_sword".into(),
                item_type: ItemType::Weapon,
                value: 5,
            },
        );
        c
    }

    #[test]
    fn required_items_always_included_even_if_over_budget() {
        let catalogs = fixture();
        let mut rng = GenRng::from_seed(2);
        let items = compose_loot(&mut rng, &catalogs, 0, &["ring_of_wit".to_string()], &[], &[ItemType::Valuable]);
        assert_eq!(items, vec!["ring_of_wit".to_string()]);
    }

    #[test]
    fn stays_within_budget_for_optional_items() {
        let catalogs = fixture();
        let mut rng = GenRng::from_seed(6);
        let requested = RequestedBag {
            loot_value: RandomValue::fixed(4),
            required_items: vec![],
            water: false,
        };
        let items = compose_bag_loot(&mut rng, &catalogs, &requested);
        assert!(items.is_empty());
    }
}
