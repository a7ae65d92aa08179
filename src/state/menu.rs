//! Context menu model: modes, generated actions and their client-side
//! affordability, plus the hit regions recorded by the renderer.
//!
//! Affordability here is UI advice only; the backend stays authoritative
//! for costs and legality. A disabled action must never be dispatchable,
//! which the input machine enforces at the hit-test step.

use crate::model::{Building, TOWN_HALL_TYPE};
use std::collections::BTreeMap;

/// One gem per started 5-minute block.
pub const GEM_BLOCK_SECS: f64 = 300.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedupMode {
    Finish,
    Reduce { seconds: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionKind {
    Build { building_type: String },
    Upgrade { building_id: String },
    Demolish { building_id: String },
    Speedup { building_id: String, mode: SpeedupMode },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuAction {
    pub kind: ActionKind,
    pub label: String,
    pub cost_gold: Option<u64>,
    pub cost_gems: Option<u64>,
    pub time_secs: Option<u64>,
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuMode {
    #[default]
    Closed,
    Empty,
    Building,
    Confirm,
}

/// Clickable regions of the last drawn menu frame; rewritten by the
/// renderer every frame the menu is visible.
#[derive(Clone, Debug, Default)]
pub struct HitRegions {
    pub close: Option<Rect>,
    /// row rect + index into `ContextMenu::actions`
    pub rows: Vec<(Rect, usize)>,
    pub confirm_yes: Option<Rect>,
    pub confirm_no: Option<Rect>,
}

impl HitRegions {
    pub fn clear(&mut self) {
        self.close = None;
        self.rows.clear();
        self.confirm_yes = None;
        self.confirm_no = None;
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContextMenu {
    pub mode: MenuMode,
    pub tile_x: i32,
    pub tile_y: i32,
    pub building: Option<Building>,
    pub actions: Vec<MenuAction>,
    pub confirm: Option<MenuAction>,
    pub hit: HitRegions,
}

impl ContextMenu {
    pub fn is_open(&self) -> bool {
        self.mode != MenuMode::Closed
    }

    pub fn open_at(&mut self, vx: i32, vy: i32, building: Option<Building>, actions: Vec<MenuAction>) {
        self.mode = if building.is_some() {
            MenuMode::Building
        } else {
            MenuMode::Empty
        };
        self.tile_x = vx;
        self.tile_y = vy;
        self.building = building;
        self.actions = actions;
        self.confirm = None;
        self.hit.clear();
    }

    pub fn close(&mut self) {
        self.mode = MenuMode::Closed;
        self.building = None;
        self.actions.clear();
        self.confirm = None;
        self.hit.clear();
    }
}

pub fn speedup_gem_cost(remaining_secs: f64) -> u64 {
    let blocks = (remaining_secs.max(0.0) / GEM_BLOCK_SECS).ceil() as u64;
    blocks.max(1)
}

/// Build list for an empty tile: one action per placeable type (the
/// unique town hall excluded), affordable first, then cheapest.
pub fn empty_tile_actions(catalog: &BTreeMap<String, u64>, gold: f64) -> Vec<MenuAction> {
    let mut out: Vec<MenuAction> = catalog
        .iter()
        .filter(|(t, _)| t.as_str() != TOWN_HALL_TYPE)
        .map(|(t, &cost)| MenuAction {
            kind: ActionKind::Build {
                building_type: t.clone(),
            },
            label: t.to_uppercase(),
            cost_gold: Some(cost),
            cost_gems: None,
            time_secs: Some(30),
            enabled: gold >= cost as f64,
        })
        .collect();

    out.sort_by(|a, b| {
        b.enabled
            .cmp(&a.enabled)
            .then(a.cost_gold.cmp(&b.cost_gold))
    });
    out
}

/// Action list for an occupied tile: upgrade, speedups while an upgrade
/// runs, demolish unless it is the town hall.
pub fn building_actions(
    b: &Building,
    catalog: &BTreeMap<String, u64>,
    gold: f64,
    gems: f64,
    now_sec: f64,
) -> Vec<MenuAction> {
    let mut out = Vec::new();

    let upgrading = b.upgrading();
    let up_cost = catalog.get(&b.building_type).copied().unwrap_or(100);
    out.push(MenuAction {
        kind: ActionKind::Upgrade {
            building_id: b.id.clone(),
        },
        label: "UPGRADE".to_string(),
        cost_gold: Some(up_cost),
        cost_gems: None,
        time_secs: Some(45),
        enabled: !upgrading && gold >= up_cost as f64,
    });

    if upgrading {
        let remaining = b
            .upgrade_progress(now_sec)
            .map(|p| p.remaining_secs)
            .unwrap_or(0.0);

        let finish_cost = speedup_gem_cost(remaining);
        out.push(MenuAction {
            kind: ActionKind::Speedup {
                building_id: b.id.clone(),
                mode: SpeedupMode::Finish,
            },
            label: "SPEEDUP (FINISH)".to_string(),
            cost_gold: None,
            cost_gems: Some(finish_cost),
            time_secs: None,
            enabled: gems >= finish_cost as f64,
        });

        let reduce_cost = speedup_gem_cost(remaining.min(GEM_BLOCK_SECS));
        out.push(MenuAction {
            kind: ActionKind::Speedup {
                building_id: b.id.clone(),
                mode: SpeedupMode::Reduce {
                    seconds: GEM_BLOCK_SECS as u32,
                },
            },
            label: "SPEEDUP (-5m)".to_string(),
            cost_gold: None,
            cost_gems: Some(reduce_cost),
            time_secs: None,
            enabled: gems >= reduce_cost as f64,
        });
    }

    out.push(MenuAction {
        kind: ActionKind::Demolish {
            building_id: b.id.clone(),
        },
        label: "DEMOLISH".to_string(),
        cost_gold: Some(0),
        cost_gems: None,
        time_secs: Some(0),
        enabled: b.building_type != TOWN_HALL_TYPE,
    });

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BTreeMap<String, u64> {
        [
            ("townhall", 200),
            ("farm", 100),
            ("lumbermill", 150),
            ("house", 80),
            ("barracks", 300),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    fn upgrading_building() -> Building {
        Building {
            id: "b1".into(),
            building_type: "farm".into(),
            level: 2,
            world_x: 0,
            world_y: 0,
            upgrade_start: Some(1000.0),
            upgrade_end: Some(1100.0),
        }
    }

    #[test]
    fn build_list_excludes_town_hall_and_sorts_affordable_then_cheapest() {
        let actions = empty_tile_actions(&catalog(), 120.0);
        let labels: Vec<&str> = actions.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, ["HOUSE", "FARM", "LUMBERMILL", "BARRACKS"]);
        let enabled: Vec<bool> = actions.iter().map(|a| a.enabled).collect();
        assert_eq!(enabled, [true, true, false, false]);
    }

    #[test]
    fn speedup_cost_is_one_gem_per_started_five_minutes() {
        assert_eq!(speedup_gem_cost(0.0), 1);
        assert_eq!(speedup_gem_cost(50.0), 1);
        assert_eq!(speedup_gem_cost(300.0), 1);
        assert_eq!(speedup_gem_cost(301.0), 2);
        assert_eq!(speedup_gem_cost(1500.0), 5);
    }

    #[test]
    fn upgrading_building_offers_speedups_and_blocks_second_upgrade() {
        let b = upgrading_building();
        let actions = building_actions(&b, &catalog(), 10_000.0, 3.0, 1050.0);
        assert_eq!(actions.len(), 4);
        assert!(!actions[0].enabled, "upgrade blocked while one is running");
        // 50s remain → 1 gem for both finish and -5m
        assert_eq!(actions[1].cost_gems, Some(1));
        assert_eq!(actions[2].cost_gems, Some(1));
        assert!(actions[1].enabled && actions[2].enabled);
    }

    #[test]
    fn town_hall_cannot_be_demolished() {
        let mut b = upgrading_building();
        b.building_type = TOWN_HALL_TYPE.to_string();
        b.upgrade_start = None;
        b.upgrade_end = None;
        let actions = building_actions(&b, &catalog(), 0.0, 0.0, 0.0);
        let demolish = actions.iter().find(|a| a.label == "DEMOLISH").unwrap();
        assert!(!demolish.enabled);
    }

    #[test]
    fn speedups_disabled_without_gems() {
        let b = upgrading_building();
        let actions = building_actions(&b, &catalog(), 0.0, 0.0, 1050.0);
        assert!(!actions[1].enabled);
        assert!(!actions[2].enabled);
    }
}
