//! Data model for tasks, ammunition and map details
//!
//! Mirrors the upstream GraphQL shapes on the way in (camelCase wire names,
//! nearly everything nullable) and the client contract on the way out.
//! Optional relationships deserialize to `None`/empty instead of failing, so
//! one malformed record never aborts a whole dataset.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Deserialize a JSON `null` as the type's default value.
///
/// The upstream API returns `null` rather than `[]` for absent lists.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Shared references
// ============================================================================

/// Minimal item reference as embedded in tasks and rewards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_link: Option<String>,
}

/// Map reference embedded in a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Trader reference embedded in a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
}

// ============================================================================
// Tasks
// ============================================================================

/// A quest: prerequisites, rewards, objectives and the derived unlock list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min_player_level: Option<u32>,
    /// Absent map means the task is global (available on every map)
    #[serde(default)]
    pub map: Option<MapRef>,
    #[serde(default)]
    pub trader: Option<TraderRef>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub needed_keys: Vec<KeyRequirement>,
    #[serde(default)]
    pub start_rewards: Option<StartRewards>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub objectives: Vec<TaskObjective>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub task_requirements: Vec<TaskRequirement>,
    /// Tasks that list this one as a prerequisite. Computed after each fetch;
    /// always present on output, empty when nothing depends on this task.
    #[serde(default)]
    pub unlocks: Vec<UnlockEntry>,
}

/// One group of keys required for a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyRequirement {
    #[serde(default, deserialize_with = "null_to_default")]
    pub keys: Vec<KeyRef>,
}

/// Key item reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_link: Option<String>,
}

/// Items handed out when the task is accepted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRewards {
    #[serde(default, deserialize_with = "null_to_default")]
    pub items: Vec<RewardItem>,
}

/// One start-of-quest reward stack
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardItem {
    #[serde(default)]
    pub item: Option<ItemRef>,
    #[serde(default)]
    pub count: u32,
}

/// A single task objective with its kind-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskObjective {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub detail: ObjectiveDetail,
}

/// Kind-specific objective payload
///
/// Item objectives carry the item, count and found-in-raid flag; mark
/// objectives carry the marker item. Everything else has no extra payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectiveDetail {
    #[serde(rename_all = "camelCase")]
    Item {
        item: ItemRef,
        #[serde(default)]
        count: u32,
        #[serde(default)]
        found_in_raid: bool,
    },
    #[serde(rename_all = "camelCase")]
    Mark { marker_item: ItemRef },
    Plain {},
}

impl Default for ObjectiveDetail {
    fn default() -> Self {
        ObjectiveDetail::Plain {}
    }
}

/// Prerequisite reference as declared by the upstream source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRequirement {
    #[serde(default)]
    pub task: Option<TaskRef>,
}

/// Bare task reference inside a requirement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Descriptor of a task unlocked by completing another one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockEntry {
    pub name: String,
    /// Map name, or `"Global"` when the dependent task has no map
    pub map: String,
    /// Trader name, or `"?"` when absent
    pub trader: String,
}

// ============================================================================
// Ammunition
// ============================================================================

/// Raw ammunition record as returned by the upstream API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAmmo {
    #[serde(default)]
    pub item: Option<AmmoItem>,
    #[serde(default)]
    pub caliber: Option<String>,
    #[serde(default)]
    pub damage: Option<i64>,
    #[serde(default)]
    pub penetration_power: Option<i64>,
    #[serde(default)]
    pub armor_damage: Option<i64>,
    #[serde(default)]
    pub fragmentation_chance: Option<f64>,
    #[serde(default)]
    pub tracer: Option<bool>,
    #[serde(default)]
    pub tracer_color: Option<String>,
    #[serde(default)]
    pub projectile_count: Option<i64>,
    #[serde(default)]
    pub initial_speed: Option<f64>,
}

/// Underlying item of an ammunition record, with its market offers
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmoItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub icon_link: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub sell_for: Vec<MarketOffer>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub buy_for: Vec<MarketOffer>,
}

/// A single buy or sell offer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketOffer {
    #[serde(rename = "priceRUB", default)]
    pub price_rub: Option<i64>,
    #[serde(default)]
    pub vendor: Option<VendorRef>,
}

/// Vendor reference inside an offer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Single-letter classification derived from penetration power
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::F => "F",
        }
    }
}

/// Best resale option for a round; `{0, "None"}` when it has no offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSale {
    pub price: i64,
    pub vendor: String,
}

impl Default for BestSale {
    fn default() -> Self {
        Self {
            price: 0,
            vendor: "None".to_string(),
        }
    }
}

/// Enriched ammunition record served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmoRound {
    pub id: String,
    pub name: String,
    pub short_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_link: Option<String>,
    pub caliber: String,
    pub damage: i64,
    pub penetration: i64,
    pub armor_damage: i64,
    pub fragmentation_chance: f64,
    pub tracer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracer_color: Option<String>,
    pub projectile_count: i64,
    pub initial_speed: f64,
    pub buy_price: i64,
    pub tier: Tier,
    pub best_sale: BestSale,
}

/// Tier threshold metadata for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierThreshold {
    pub tier: Tier,
    pub min_pen: i64,
    pub color: String,
}

/// Full ammunition dataset: flat, grouped, plus presentation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmoSheet {
    pub all: Vec<AmmoRound>,
    pub by_caliber: BTreeMap<String, Vec<AmmoRound>>,
    pub calibers: Vec<String>,
    pub tier_thresholds: Vec<TierThreshold>,
}

// ============================================================================
// Map details
// ============================================================================

/// World position of a map feature
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// Extraction point
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extract {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

/// Spawn zone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spawn {
    #[serde(default)]
    pub zone_name: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub sides: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub categories: Vec<String>,
}

/// Boss spawn definition with its candidate locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossSpawn {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spawn_chance: Option<f64>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub spawn_locations: Vec<BossLocation>,
}

/// One candidate location for a boss spawn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BossLocation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub chance: Option<f64>,
    #[serde(default)]
    pub position: Option<Position>,
}

/// Loot container placement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootPlacement {
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub loot_container: Option<LootContainerRef>,
}

/// Loot container type reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootContainerRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub normalized_name: Option<String>,
}

/// Environmental hazard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hazard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hazard_type: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

/// Everything the client needs to render one map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub normalized_name: Option<String>,
    #[serde(default)]
    pub coordinate_rotation: Option<f64>,
    #[serde(default)]
    pub players: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub enemies: Vec<String>,
    #[serde(default)]
    pub raid_duration: Option<u32>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub extracts: Vec<Extract>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub spawns: Vec<Spawn>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub bosses: Vec<BossSpawn>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub loot_containers: Vec<LootPlacement>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub hazards: Vec<Hazard>,
}

impl MapDetail {
    /// The canonical empty detail served for unknown maps and upstream
    /// failures: the name echoes the request, all collections are empty.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
