//! Post-fetch derivation passes
//!
//! Runs once per successful upstream fetch, before the payload enters the
//! cache: the task reverse-unlock pass and the ammunition enrichment pass.
//! Both are pure, synchronous and tolerant of missing optional fields; a
//! record missing its own id is dropped rather than failing the dataset.

use crate::model::{AmmoRound, AmmoSheet, BestSale, RawAmmo, Task, Tier, TierThreshold, UnlockEntry};
use std::collections::{BTreeMap, HashMap};

/// Map label attached to unlock entries for tasks with no map
pub const GLOBAL_LABEL: &str = "Global";

/// Trader label attached to unlock entries for tasks with no trader
const UNKNOWN_TRADER: &str = "?";

/// Tier thresholds, highest first. Lower bounds are inclusive.
const TIER_TABLE: &[(Tier, i64, &str)] = &[
    (Tier::S, 55, "#e74c3c"),
    (Tier::A, 45, "#e67e22"),
    (Tier::B, 35, "#f1c40f"),
    (Tier::C, 25, "#2ecc71"),
    (Tier::D, 15, "#3498db"),
    (Tier::F, 0, "#95a5a6"),
];

/// Classify a penetration power into its tier.
///
/// A pure step function; two rounds with equal penetration always land in
/// the same tier.
pub fn tier_for(penetration: i64) -> Tier {
    match penetration {
        p if p >= 55 => Tier::S,
        p if p >= 45 => Tier::A,
        p if p >= 35 => Tier::B,
        p if p >= 25 => Tier::C,
        p if p >= 15 => Tier::D,
        _ => Tier::F,
    }
}

/// The fixed threshold table shipped alongside the ammunition sheet
pub fn tier_thresholds() -> Vec<TierThreshold> {
    TIER_TABLE
        .iter()
        .map(|(tier, min_pen, color)| TierThreshold {
            tier: *tier,
            min_pen: *min_pen,
            color: (*color).to_string(),
        })
        .collect()
}

/// Attach the reverse-dependency index to a freshly fetched task list.
///
/// Single forward pass: for every task B that declares A as a prerequisite,
/// A accumulates an unlock entry describing B. Afterwards every surviving
/// task carries a concrete unlock list, empty when nothing depends on it.
/// Tasks without an id are dropped.
pub fn attach_unlocks(tasks: &mut Vec<Task>) {
    tasks.retain(|t| t.id.is_some());

    let mut unlocks: HashMap<String, Vec<UnlockEntry>> = HashMap::new();

    for task in tasks.iter() {
        for requirement in &task.task_requirements {
            let parent_id = match requirement.task.as_ref().and_then(|t| t.id.as_ref()) {
                Some(id) => id.clone(),
                None => continue,
            };

            unlocks.entry(parent_id).or_default().push(UnlockEntry {
                name: task
                    .name
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                map: task
                    .map
                    .as_ref()
                    .and_then(|m| m.name.clone())
                    .unwrap_or_else(|| GLOBAL_LABEL.to_string()),
                trader: task
                    .trader
                    .as_ref()
                    .and_then(|t| t.name.clone())
                    .unwrap_or_else(|| UNKNOWN_TRADER.to_string()),
            });
        }
    }

    for task in tasks.iter_mut() {
        if let Some(id) = task.id.as_deref() {
            task.unlocks = unlocks.remove(id).unwrap_or_default();
        }
    }
}

/// Enrich raw ammunition records into the full sheet.
///
/// Records without an underlying item (or item id) are skipped. Numeric
/// fields default to 0 (projectile count to 1, tracer to false). The flat
/// list is sorted by caliber ascending then penetration descending, and
/// additionally grouped by caliber.
pub fn enrich_ammo(raw: Vec<RawAmmo>) -> AmmoSheet {
    let mut all: Vec<AmmoRound> = raw.into_iter().filter_map(enrich_round).collect();

    all.sort_by(|a, b| {
        a.caliber
            .cmp(&b.caliber)
            .then_with(|| b.penetration.cmp(&a.penetration))
    });

    let mut by_caliber: BTreeMap<String, Vec<AmmoRound>> = BTreeMap::new();
    for round in &all {
        by_caliber
            .entry(round.caliber.clone())
            .or_default()
            .push(round.clone());
    }

    let calibers = by_caliber.keys().cloned().collect();

    AmmoSheet {
        all,
        by_caliber,
        calibers,
        tier_thresholds: tier_thresholds(),
    }
}

fn enrich_round(raw: RawAmmo) -> Option<AmmoRound> {
    let item = raw.item?;
    let id = item.id?;

    let best_sale = best_sale(&item.sell_for);
    let buy_price = item
        .buy_for
        .iter()
        .filter_map(|offer| offer.price_rub)
        .min()
        .unwrap_or(0);

    let penetration = raw.penetration_power.unwrap_or(0);

    Some(AmmoRound {
        id,
        name: item.name.unwrap_or_default(),
        short_name: item.short_name.unwrap_or_default(),
        icon_link: item.icon_link,
        caliber: raw.caliber.unwrap_or_else(|| "Unknown".to_string()),
        damage: raw.damage.unwrap_or(0),
        penetration,
        armor_damage: raw.armor_damage.unwrap_or(0),
        fragmentation_chance: raw.fragmentation_chance.unwrap_or(0.0),
        tracer: raw.tracer.unwrap_or(false),
        tracer_color: raw.tracer_color,
        projectile_count: raw.projectile_count.unwrap_or(1),
        initial_speed: raw.initial_speed.unwrap_or(0.0),
        buy_price,
        tier: tier_for(penetration),
        best_sale,
    })
}

/// Maximum-price sale offer; ties broken by encounter order (first wins).
fn best_sale(offers: &[crate::model::MarketOffer]) -> BestSale {
    let mut best = BestSale::default();
    let mut best_price: Option<i64> = None;

    for offer in offers {
        let price = offer.price_rub.unwrap_or(0);
        if best_price.map_or(true, |current| price > current) {
            best_price = Some(price);
            best = BestSale {
                price,
                vendor: offer
                    .vendor
                    .as_ref()
                    .and_then(|v| v.name.clone())
                    .unwrap_or_else(|| "None".to_string()),
            };
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AmmoItem, MapRef, MarketOffer, TaskRef, TaskRequirement, TraderRef, VendorRef};

    fn task(id: &str, name: &str, map: Option<&str>, trader: Option<&str>, reqs: &[&str]) -> Task {
        Task {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            map: map.map(|m| MapRef {
                name: Some(m.to_string()),
            }),
            trader: trader.map(|t| TraderRef {
                name: Some(t.to_string()),
                image_link: None,
            }),
            task_requirements: reqs
                .iter()
                .map(|r| TaskRequirement {
                    task: Some(TaskRef {
                        id: Some(r.to_string()),
                        name: None,
                    }),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn round(id: &str, caliber: &str, pen: i64) -> RawAmmo {
        RawAmmo {
            item: Some(AmmoItem {
                id: Some(id.to_string()),
                name: Some(id.to_uppercase()),
                short_name: Some(id.to_string()),
                ..Default::default()
            }),
            caliber: Some(caliber.to_string()),
            penetration_power: Some(pen),
            ..Default::default()
        }
    }

    fn offer(price: i64, vendor: &str) -> MarketOffer {
        MarketOffer {
            price_rub: Some(price),
            vendor: Some(VendorRef {
                name: Some(vendor.to_string()),
            }),
        }
    }

    #[test]
    fn test_tier_boundaries_exact() {
        let cases = [
            (55, Tier::S),
            (54, Tier::A),
            (45, Tier::A),
            (44, Tier::B),
            (35, Tier::B),
            (34, Tier::C),
            (25, Tier::C),
            (24, Tier::D),
            (15, Tier::D),
            (14, Tier::F),
            (0, Tier::F),
        ];
        for (pen, expected) in cases {
            assert_eq!(tier_for(pen), expected, "penetration {}", pen);
        }
    }

    #[test]
    fn test_tier_extremes() {
        assert_eq!(tier_for(100), Tier::S);
        assert_eq!(tier_for(-5), Tier::F);
    }

    #[test]
    fn test_reverse_index_completeness() {
        let mut tasks = vec![
            task("a", "Gunsmith", Some("Customs"), Some("Mechanic"), &[]),
            task("b", "Farming", None, Some("Mechanic"), &["a"]),
            task("c", "Signal", Some("Woods"), None, &["a", "b"]),
        ];
        attach_unlocks(&mut tasks);

        // For every task B with prerequisite A, A.unlocks names B
        let a = &tasks[0];
        assert_eq!(a.unlocks.len(), 2);
        assert_eq!(
            a.unlocks[0],
            UnlockEntry {
                name: "Farming".to_string(),
                map: "Global".to_string(),
                trader: "Mechanic".to_string(),
            }
        );
        assert_eq!(
            a.unlocks[1],
            UnlockEntry {
                name: "Signal".to_string(),
                map: "Woods".to_string(),
                trader: "?".to_string(),
            }
        );

        let b = &tasks[1];
        assert_eq!(b.unlocks.len(), 1);
        assert_eq!(b.unlocks[0].name, "Signal");
    }

    #[test]
    fn test_unlocks_empty_not_absent() {
        let mut tasks = vec![task("leaf", "Leaf", None, None, &["root"])];
        attach_unlocks(&mut tasks);
        // No dependents: empty list, and still serialized
        assert!(tasks[0].unlocks.is_empty());
        let value = serde_json::to_value(&tasks[0]).unwrap();
        assert!(value.get("unlocks").is_some());
    }

    #[test]
    fn test_idless_tasks_dropped_but_rest_survive() {
        let mut tasks = vec![
            Task::default(), // no id
            task("a", "Kept", None, None, &[]),
        ];
        attach_unlocks(&mut tasks);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_requirement_without_task_ref_ignored() {
        let mut tasks = vec![task("a", "A", None, None, &[])];
        tasks[0].task_requirements.push(TaskRequirement { task: None });
        attach_unlocks(&mut tasks);
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_best_sale_first_maximum_wins() {
        let offers = vec![
            offer(100, "Prapor"),
            offer(250, "Therapist"),
            offer(250, "Fence"),
            offer(50, "Skier"),
        ];
        let best = best_sale(&offers);
        assert_eq!(best.price, 250);
        assert_eq!(best.vendor, "Therapist");
    }

    #[test]
    fn test_best_sale_defaults_without_offers() {
        let best = best_sale(&[]);
        assert_eq!(best.price, 0);
        assert_eq!(best.vendor, "None");
    }

    #[test]
    fn test_enrich_skips_itemless_records() {
        let sheet = enrich_ammo(vec![
            RawAmmo::default(), // no item
            round("bt", "Caliber545x39", 42),
        ]);
        assert_eq!(sheet.all.len(), 1);
        assert_eq!(sheet.all[0].id, "bt");
    }

    #[test]
    fn test_enrich_defaults() {
        let mut raw = round("blank", "Caliber545x39", 0);
        raw.penetration_power = None;
        raw.damage = None;
        raw.projectile_count = None;
        raw.tracer = None;

        let sheet = enrich_ammo(vec![raw]);
        let r = &sheet.all[0];
        assert_eq!(r.penetration, 0);
        assert_eq!(r.damage, 0);
        assert_eq!(r.projectile_count, 1);
        assert!(!r.tracer);
        assert_eq!(r.tier, Tier::F);
    }

    #[test]
    fn test_sheet_sorted_and_grouped() {
        let sheet = enrich_ammo(vec![
            round("m995", "Caliber556x45NATO", 53),
            round("bt", "Caliber545x39", 42),
            round("ps", "Caliber545x39", 28),
            round("bs", "Caliber545x39", 57),
        ]);

        // Flat list: caliber ascending, penetration descending within caliber
        let order: Vec<&str> = sheet.all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["bs", "bt", "ps", "m995"]);

        // byCaliber[c] is exactly the subset of all with caliber == c
        for (caliber, rounds) in &sheet.by_caliber {
            let expected: Vec<&str> = sheet
                .all
                .iter()
                .filter(|r| &r.caliber == caliber)
                .map(|r| r.id.as_str())
                .collect();
            let actual: Vec<&str> = rounds.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(actual, expected);
        }

        // calibers is the sorted distinct key set
        assert_eq!(
            sheet.calibers,
            vec!["Caliber545x39".to_string(), "Caliber556x45NATO".to_string()]
        );
    }

    #[test]
    fn test_threshold_table_matches_step_function() {
        let table = tier_thresholds();
        assert_eq!(table.len(), 6);
        for threshold in &table {
            assert_eq!(tier_for(threshold.min_pen), threshold.tier);
        }
    }
}
