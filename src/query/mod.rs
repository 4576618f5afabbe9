//! Map identifier normalization and task selection
//!
//! Every accepted external spelling of a map name resolves to one canonical
//! label through a fixed synonym table; the canonical label doubles as the
//! cache key for map details. Selection over the derived task list follows
//! the inclusive policy: global (map-less) tasks are available on every map.

use crate::model::Task;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Canonical label meaning "no map" (global quests)
pub const NO_MAP: &str = "Any";

/// Sentinel identifier meaning "no filtering at all"
pub const ALL: &str = "ALL";

lazy_static! {
    /// Lowercased accepted spelling -> canonical map label
    static ref MAP_SYNONYMS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("customs", "Customs");
        m.insert("factory", "Factory");
        m.insert("woods", "Woods");
        m.insert("interchange", "Interchange");
        m.insert("shoreline", "Shoreline");
        m.insert("reserve", "Reserve");
        m.insert("lighthouse", "Lighthouse");
        m.insert("streets", "Streets of Tarkov");
        m.insert("streets of tarkov", "Streets of Tarkov");
        m.insert("ground zero", "Ground Zero");
        m.insert("groundzero", "Ground Zero");
        m.insert("labs", "The Lab");
        m.insert("lab", "The Lab");
        m.insert("the lab", "The Lab");
        m.insert("any", NO_MAP);
        m
    };
}

/// What a request's map identifier resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSelector {
    /// Return every task, unfiltered
    All,
    /// Only tasks with no map
    Global,
    /// Tasks on this canonical map, plus global tasks
    Named(String),
}

/// Resolve an identifier to its canonical map label.
///
/// Case- and whitespace-insensitive; identifiers not in the synonym table
/// pass through trimmed, so an unknown map simply selects nothing.
pub fn canonical_label(identifier: &str) -> String {
    let trimmed = identifier.trim();
    let key = trimmed.to_lowercase();
    MAP_SYNONYMS
        .get(key.as_str())
        .map(|label| (*label).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Resolve an identifier to a selector over the task list
pub fn resolve(identifier: &str) -> MapSelector {
    let trimmed = identifier.trim();
    if trimmed.eq_ignore_ascii_case(ALL) {
        return MapSelector::All;
    }

    let canonical = canonical_label(trimmed);
    if canonical == NO_MAP {
        MapSelector::Global
    } else {
        MapSelector::Named(canonical)
    }
}

/// Select tasks for a resolved map, sorted by name ascending.
///
/// A missing task name sorts as the empty string so malformed input never
/// breaks the ordering.
pub fn select_by_map(tasks: &[Task], selector: &MapSelector) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|task| {
            let map_name = task.map.as_ref().and_then(|m| m.name.as_deref());
            match selector {
                MapSelector::All => true,
                MapSelector::Global => map_name.is_none(),
                // Global tasks have no map restriction, so they show up on
                // every per-map listing alongside the map's own tasks.
                MapSelector::Named(label) => {
                    map_name.is_none() || map_name == Some(label.as_str())
                }
            }
        })
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        let a_name = a.name.as_deref().unwrap_or("");
        let b_name = b.name.as_deref().unwrap_or("");
        a_name.cmp(b_name)
    });

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MapRef;

    fn task(name: &str, map: Option<&str>) -> Task {
        Task {
            id: Some(name.to_lowercase().replace(' ', "-")),
            name: Some(name.to_string()),
            map: map.map(|m| MapRef {
                name: Some(m.to_string()),
            }),
            ..Default::default()
        }
    }

    fn fixture() -> Vec<Task> {
        vec![
            task("Checking", Some("Customs")),
            task("Background Check", Some("Customs")),
            task("Shortage", None),
            task("Forest Cleaning", Some("Woods")),
        ]
    }

    #[test]
    fn test_canonical_label_synonyms() {
        assert_eq!(canonical_label("customs"), "Customs");
        assert_eq!(canonical_label("  Factory "), "Factory");
        assert_eq!(canonical_label("streets"), "Streets of Tarkov");
        assert_eq!(canonical_label("Streets of Tarkov"), "Streets of Tarkov");
        assert_eq!(canonical_label("groundzero"), "Ground Zero");
        assert_eq!(canonical_label("GROUND ZERO"), "Ground Zero");
        assert_eq!(canonical_label("Labs"), "The Lab");
        assert_eq!(canonical_label("the lab"), "The Lab");
        assert_eq!(canonical_label("any"), NO_MAP);
        // Unknown identifiers pass through trimmed
        assert_eq!(canonical_label(" Atlantis "), "Atlantis");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("ALL"), MapSelector::All);
        assert_eq!(resolve("all"), MapSelector::All);
        assert_eq!(resolve("Any"), MapSelector::Global);
        assert_eq!(
            resolve("customs"),
            MapSelector::Named("Customs".to_string())
        );
    }

    #[test]
    fn test_select_all_returns_everything_sorted() {
        let tasks = fixture();
        let selected = select_by_map(&tasks, &MapSelector::All);
        assert_eq!(selected.len(), tasks.len());
        let names: Vec<&str> = selected.iter().filter_map(|t| t.name.as_deref()).collect();
        assert_eq!(
            names,
            vec!["Background Check", "Checking", "Forest Cleaning", "Shortage"]
        );
    }

    #[test]
    fn test_select_global_only() {
        let tasks = fixture();
        let selected = select_by_map(&tasks, &MapSelector::Global);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name.as_deref(), Some("Shortage"));
    }

    #[test]
    fn test_select_named_includes_global() {
        let tasks = fixture();
        let selected = select_by_map(&tasks, &MapSelector::Named("Customs".to_string()));
        let names: Vec<&str> = selected.iter().filter_map(|t| t.name.as_deref()).collect();
        // Both the map's own tasks and the global task are present
        assert_eq!(names, vec!["Background Check", "Checking", "Shortage"]);
    }

    #[test]
    fn test_select_unknown_map_yields_global_only() {
        let tasks = fixture();
        let selected = select_by_map(&tasks, &MapSelector::Named("Atlantis".to_string()));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name.as_deref(), Some("Shortage"));
    }

    #[test]
    fn test_missing_name_sorts_first() {
        let mut tasks = fixture();
        tasks.push(Task {
            id: Some("nameless".to_string()),
            name: None,
            ..Default::default()
        });
        let selected = select_by_map(&tasks, &MapSelector::All);
        assert!(selected[0].name.is_none());
    }
}
