//! Data model for the city client: the wire schema as the backend sends
//! it, and the normalized mirror the rest of the client works with.
//!
//! Normalization happens exactly once, at this boundary. The backend may
//! send a building position as `x`/`y` or as `world_x`/`world_y`; both
//! collapse to one canonical pair here. An entity missing both is
//! malformed and gets skipped, never crashing the reload.

use serde::Deserialize;
use std::collections::BTreeMap;

// ---------------- Wire schema (tolerant) -----------------

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawBuilding {
    #[serde(rename = "type")]
    pub building_type: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub world_x: Option<f64>,
    pub world_y: Option<f64>,
    pub level: Option<u32>,
    pub upgrade_start: Option<f64>,
    pub upgrade_end: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub gold: f64,
    pub wood: f64,
    pub gems: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct WorldBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawWorld {
    pub bounds: Option<WorldBounds>,
    pub radius: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub build_cost_gold: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawGameState {
    pub resources: Resources,
    /// Kept as raw JSON so one wrong-typed entity is skipped on its own
    /// instead of failing the whole document.
    pub buildings: BTreeMap<String, serde_json::Value>,
    pub world: RawWorld,
    pub catalog: BTreeMap<String, CatalogEntry>,
}

// ---------------- Normalized mirror -----------------

pub const TOWN_HALL_TYPE: &str = "townhall";
pub const DEFAULT_WORLD_RADIUS: i32 = 3;

impl WorldBounds {
    pub fn from_radius(radius: i32) -> Self {
        let r = radius.max(0);
        Self {
            min_x: -r,
            max_x: r,
            min_y: -r,
            max_y: r,
        }
    }

    pub fn contains(&self, wx: i32, wy: i32) -> bool {
        wx >= self.min_x && wx <= self.max_x && wy >= self.min_y && wy <= self.max_y
    }
}

/// Read-only mirror of a remote building, with the canonical world
/// position attached.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub id: String,
    pub building_type: String,
    pub level: u32,
    pub world_x: i32,
    pub world_y: i32,
    pub upgrade_start: Option<f64>,
    pub upgrade_end: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeProgress {
    /// Completed fraction in `[0, 1]`.
    pub pct: f64,
    pub remaining_secs: f64,
}

impl Building {
    pub fn from_raw(id: &str, raw: &RawBuilding) -> Option<Building> {
        let building_type = raw.building_type.clone()?;
        let wx = raw.world_x.or(raw.x)?;
        let wy = raw.world_y.or(raw.y)?;
        Some(Building {
            id: id.to_string(),
            building_type,
            level: raw.level.unwrap_or(1),
            world_x: wx.trunc() as i32,
            world_y: wy.trunc() as i32,
            upgrade_start: raw.upgrade_start,
            upgrade_end: raw.upgrade_end,
        })
    }

    pub fn upgrading(&self) -> bool {
        self.upgrade_end.is_some()
    }

    pub fn upgrade_progress(&self, now_sec: f64) -> Option<UpgradeProgress> {
        let start = self.upgrade_start?;
        let end = self.upgrade_end?;
        if end <= start {
            return None;
        }
        Some(UpgradeProgress {
            pct: ((now_sec - start) / (end - start)).clamp(0.0, 1.0),
            remaining_secs: (end - now_sec).max(0.0),
        })
    }
}

/// Normalized state applied after each successful reload.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub resources: Resources,
    pub buildings: Vec<Building>,
    pub bounds: WorldBounds,
    /// building type -> build cost in gold
    pub catalog: BTreeMap<String, u64>,
}

impl GameState {
    pub fn from_raw(raw: RawGameState, fallback_costs: &BTreeMap<String, u64>) -> GameState {
        let buildings = raw
            .buildings
            .iter()
            .filter_map(|(id, v)| {
                let b = serde_json::from_value::<RawBuilding>(v.clone()).ok()?;
                Building::from_raw(id, &b)
            })
            .collect();

        let bounds = raw
            .world
            .bounds
            .or_else(|| raw.world.radius.map(WorldBounds::from_radius))
            .unwrap_or_else(|| WorldBounds::from_radius(DEFAULT_WORLD_RADIUS));

        // Server catalog wins when present; otherwise the config table.
        let catalog = if raw.catalog.is_empty() {
            fallback_costs.clone()
        } else {
            raw.catalog
                .iter()
                .map(|(k, v)| {
                    let cost = v
                        .build_cost_gold
                        .map(|c| c.max(0.0) as u64)
                        .or_else(|| fallback_costs.get(k).copied())
                        .unwrap_or(100);
                    (k.clone(), cost)
                })
                .collect()
        };

        GameState {
            resources: raw.resources,
            buildings,
            bounds,
            catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> BTreeMap<String, u64> {
        [("farm".to_string(), 100), ("townhall".to_string(), 200)]
            .into_iter()
            .collect()
    }

    #[test]
    fn normalizes_both_position_conventions() {
        let raw: RawGameState = serde_json::from_str(
            r#"{
                "buildings": {
                    "a": {"type": "farm", "x": 2, "y": 3},
                    "b": {"type": "house", "world_x": -1, "world_y": 4},
                    "c": {"type": "barracks"}
                }
            }"#,
        )
        .unwrap();
        let gs = GameState::from_raw(raw, &fallback());
        assert_eq!(gs.buildings.len(), 2, "positionless entity is skipped");
        let a = gs.buildings.iter().find(|b| b.id == "a").unwrap();
        assert_eq!((a.world_x, a.world_y), (2, 3));
        let b = gs.buildings.iter().find(|b| b.id == "b").unwrap();
        assert_eq!((b.world_x, b.world_y), (-1, 4));
    }

    #[test]
    fn wrong_typed_entity_is_skipped_without_sinking_the_reload() {
        let raw: RawGameState = serde_json::from_str(
            r#"{
                "resources": {"gold": 50},
                "buildings": {
                    "good": {"type": "farm", "x": 1, "y": 1},
                    "bad": {"type": "house", "x": "oops", "y": 2}
                }
            }"#,
        )
        .expect("document parses even with a bad entity inside");
        let gs = GameState::from_raw(raw, &fallback());
        assert_eq!(gs.resources.gold, 50.0);
        assert_eq!(gs.buildings.len(), 1);
        assert_eq!(gs.buildings[0].id, "good");
    }

    #[test]
    fn world_x_wins_over_x_when_both_present() {
        let raw: RawBuilding = serde_json::from_str(
            r#"{"type": "farm", "x": 1, "y": 1, "world_x": 5, "world_y": 6}"#,
        )
        .unwrap();
        let b = Building::from_raw("id", &raw).unwrap();
        assert_eq!((b.world_x, b.world_y), (5, 6));
    }

    #[test]
    fn missing_fields_fall_back_to_safe_defaults() {
        let gs = GameState::from_raw(
            serde_json::from_str("{}").unwrap(),
            &fallback(),
        );
        assert_eq!(gs.resources, Resources::default());
        assert!(gs.buildings.is_empty());
        assert_eq!(gs.bounds, WorldBounds::from_radius(DEFAULT_WORLD_RADIUS));
        assert_eq!(gs.catalog, fallback());
    }

    #[test]
    fn radius_expands_to_symmetric_bounds() {
        let b = WorldBounds::from_radius(3);
        assert_eq!(
            b,
            WorldBounds {
                min_x: -3,
                max_x: 3,
                min_y: -3,
                max_y: 3
            }
        );
        assert!(b.contains(0, 0));
        assert!(b.contains(-3, 3));
        assert!(!b.contains(4, 0));
    }

    #[test]
    fn server_catalog_overrides_config_costs() {
        let raw: RawGameState = serde_json::from_str(
            r#"{"catalog": {"farm": {"build_cost_gold": 120}, "mill": {}}}"#,
        )
        .unwrap();
        let gs = GameState::from_raw(raw, &fallback());
        assert_eq!(gs.catalog.get("farm"), Some(&120));
        // unknown type without a cost gets the generic fallback
        assert_eq!(gs.catalog.get("mill"), Some(&100));
        // config-only types disappear when the server sends a catalog
        assert_eq!(gs.catalog.get("townhall"), None);
    }

    #[test]
    fn upgrade_progress_clamps_and_reports_remaining() {
        let b = Building {
            id: "x".into(),
            building_type: "farm".into(),
            level: 1,
            world_x: 0,
            world_y: 0,
            upgrade_start: Some(1000.0),
            upgrade_end: Some(1100.0),
        };
        let p = b.upgrade_progress(1050.0).unwrap();
        assert_eq!(p.pct, 0.5);
        assert_eq!(p.remaining_secs, 50.0);
        assert_eq!(b.upgrade_progress(2000.0).unwrap().pct, 1.0);
        assert_eq!(b.upgrade_progress(0.0).unwrap().pct, 0.0);
    }
}
