//! Pointer handling over the shared city state. Every pointer-down in
//! canvas space resolves to at most one command; all menu navigation is
//! local and only confirmed actions leave this module.

use crate::state::gesture::TapDecision;
use crate::state::menu::{self, ActionKind, MenuMode, SpeedupMode};
use crate::state::CityState;

#[derive(Clone, Debug, PartialEq)]
pub enum DispatchRequest {
    Place {
        building_type: String,
        world_x: i32,
        world_y: i32,
    },
    Upgrade {
        building_id: String,
    },
    Demolish {
        building_id: String,
    },
    Speedup {
        building_id: String,
        mode: SpeedupMode,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    None,
    Dispatch(DispatchRequest),
}

/// Hover tracking; frozen while the menu is open so the highlighted
/// tile stays the one the menu refers to.
pub fn pointer_move(s: &mut CityState, px: f64, py: f64) {
    if s.menu.is_open() {
        return;
    }
    let (w, h) = (s.world.view.w, s.world.view.h);
    s.hover = s.proj.screen_to_tile(s.origin, px, py, w, h);
}

pub fn pointer_down(
    s: &mut CityState,
    px: f64,
    py: f64,
    touch: bool,
    now_ms: f64,
    now_sec: f64,
) -> Command {
    match s.menu.mode {
        MenuMode::Confirm => confirm_click(s, px, py),
        MenuMode::Empty | MenuMode::Building => open_menu_click(s, px, py),
        MenuMode::Closed => canvas_click(s, px, py, touch, now_ms, now_sec),
    }
}

fn confirm_click(s: &mut CityState, px: f64, py: f64) -> Command {
    if let Some(yes) = s.menu.hit.confirm_yes {
        if yes.contains(px, py) {
            let action = s.menu.confirm.take();
            let tile = (s.menu.tile_x, s.menu.tile_y);
            s.menu.close();
            if let Some(action) = action {
                if action.enabled {
                    return Command::Dispatch(to_request(action.kind, s, tile));
                }
            }
            return Command::None;
        }
    }
    if let Some(no) = s.menu.hit.confirm_no {
        if no.contains(px, py) {
            s.menu.close();
            return Command::None;
        }
    }
    if let Some(close) = s.menu.hit.close {
        if close.contains(px, py) {
            s.menu.close();
            return Command::None;
        }
    }
    // clicks outside the buttons keep the confirmation up
    Command::None
}

fn open_menu_click(s: &mut CityState, px: f64, py: f64) -> Command {
    if let Some(close) = s.menu.hit.close {
        if close.contains(px, py) {
            s.menu.close();
            return Command::None;
        }
    }
    let hit_row = s
        .menu
        .hit
        .rows
        .iter()
        .find(|(rect, _)| rect.contains(px, py))
        .map(|&(_, idx)| idx);
    if let Some(idx) = hit_row {
        if let Some(action) = s.menu.actions.get(idx).cloned() {
            if action.enabled {
                s.menu.mode = MenuMode::Confirm;
                s.menu.confirm = Some(action);
                s.menu.hit.clear();
                return Command::None;
            }
        }
    }
    // disabled row or a click elsewhere both dismiss
    s.menu.close();
    Command::None
}

fn canvas_click(
    s: &mut CityState,
    px: f64,
    py: f64,
    touch: bool,
    now_ms: f64,
    now_sec: f64,
) -> Command {
    let (w, h) = (s.world.view.w, s.world.view.h);
    let Some((vx, vy)) = s.proj.screen_to_tile(s.origin, px, py, w, h) else {
        s.gesture.reset();
        return Command::None;
    };

    if touch {
        match s.gesture.on_tap(vx, vy, now_ms) {
            TapDecision::Select => {
                s.hover = Some((vx, vy));
                return Command::None;
            }
            TapDecision::Open => {}
        }
    } else {
        s.gesture.reset();
    }

    open_menu_for_tile(s, vx, vy, now_sec);
    Command::None
}

fn open_menu_for_tile(s: &mut CityState, vx: i32, vy: i32, now_sec: f64) {
    s.hover = Some((vx, vy));
    let building = s.world.building_at(vx, vy).cloned();
    let actions = match &building {
        Some(b) => menu::building_actions(b, &s.catalog, s.resources.gold, s.resources.gems, now_sec),
        None => menu::empty_tile_actions(&s.catalog, s.resources.gold),
    };
    s.menu.open_at(vx, vy, building, actions);
}

fn to_request(kind: ActionKind, s: &CityState, tile: (i32, i32)) -> DispatchRequest {
    match kind {
        ActionKind::Build { building_type } => {
            let (wx, wy) = s.world.view_to_world(tile.0, tile.1);
            DispatchRequest::Place {
                building_type,
                world_x: wx,
                world_y: wy,
            }
        }
        ActionKind::Upgrade { building_id } => DispatchRequest::Upgrade { building_id },
        ActionKind::Demolish { building_id } => DispatchRequest::Demolish { building_id },
        ActionKind::Speedup { building_id, mode } => DispatchRequest::Speedup { building_id, mode },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CityConfig;
    use crate::state::menu::{MenuAction, Rect};
    use crate::state::CityState;

    fn test_state() -> CityState {
        let config = CityConfig::default();
        let catalog = config.build_cost_gold.clone();
        let mut s = CityState::new(config);
        s.catalog = catalog;
        s.resources.gold = 1000.0;
        // center a 7x7 view on the radius-3 world and put the origin so
        // tile math is easy: tile (3,3) projects to screen (0, 192).
        s.origin = (0.0, 0.0);
        s
    }

    fn tile_center(s: &CityState, vx: i32, vy: i32) -> (f64, f64) {
        let (sx, sy) = s.proj.tile_to_screen(vx, vy);
        (s.origin.0 + sx, s.origin.1 + sy + s.proj.tile_h / 2.0)
    }

    #[test]
    fn mouse_click_on_empty_tile_opens_build_menu() {
        let mut s = test_state();
        let (px, py) = tile_center(&s, 3, 3);
        let cmd = pointer_down(&mut s, px, py, false, 0.0, 0.0);
        assert_eq!(cmd, Command::None);
        assert_eq!(s.menu.mode, MenuMode::Empty);
        assert!(!s.menu.actions.is_empty());
    }

    #[test]
    fn touch_needs_two_taps_on_same_tile() {
        let mut s = test_state();
        let (px, py) = tile_center(&s, 2, 2);
        assert_eq!(pointer_down(&mut s, px, py, true, 0.0, 0.0), Command::None);
        assert_eq!(s.menu.mode, MenuMode::Closed);
        assert_eq!(s.hover, Some((2, 2)));
        pointer_down(&mut s, px, py, true, 1000.0, 1.0);
        assert_eq!(s.menu.mode, MenuMode::Empty);
    }

    #[test]
    fn touch_tap_on_different_tile_rearms_instead_of_opening() {
        let mut s = test_state();
        let (ax, ay) = tile_center(&s, 2, 2);
        let (bx, by) = tile_center(&s, 4, 4);
        pointer_down(&mut s, ax, ay, true, 0.0, 0.0);
        pointer_down(&mut s, bx, by, true, 500.0, 0.5);
        assert_eq!(s.menu.mode, MenuMode::Closed);
        pointer_down(&mut s, bx, by, true, 900.0, 0.9);
        assert_eq!(s.menu.mode, MenuMode::Empty);
    }

    #[test]
    fn click_outside_viewport_is_ignored() {
        let mut s = test_state();
        let cmd = pointer_down(&mut s, -5000.0, -5000.0, false, 0.0, 0.0);
        assert_eq!(cmd, Command::None);
        assert_eq!(s.menu.mode, MenuMode::Closed);
    }

    #[test]
    fn confirm_yes_dispatches_place_with_world_coordinates() {
        let mut s = test_state();
        let (px, py) = tile_center(&s, 3, 3);
        pointer_down(&mut s, px, py, false, 0.0, 0.0);

        // pick the first (enabled) row once the renderer records it
        s.menu.hit.rows.push((Rect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 }, 0));
        pointer_down(&mut s, 5.0, 5.0, false, 10.0, 0.01);
        assert_eq!(s.menu.mode, MenuMode::Confirm);

        s.menu.hit.confirm_yes = Some(Rect { x: 100.0, y: 100.0, w: 10.0, h: 10.0 });
        let cmd = pointer_down(&mut s, 105.0, 105.0, false, 20.0, 0.02);
        match cmd {
            Command::Dispatch(DispatchRequest::Place { world_x, world_y, .. }) => {
                // default offset is (-3,-3), so view tile (3,3) is world (0,0)
                assert_eq!((world_x, world_y), (0, 0));
            }
            other => panic!("expected a place request, got {other:?}"),
        }
        assert_eq!(s.menu.mode, MenuMode::Closed);
    }

    #[test]
    fn confirm_yes_on_disabled_action_dispatches_nothing() {
        let mut s = test_state();
        s.menu.open_at(3, 3, None, vec![]);
        s.menu.mode = MenuMode::Confirm;
        s.menu.confirm = Some(MenuAction {
            kind: ActionKind::Upgrade { building_id: "b1".into() },
            label: "UPGRADE".into(),
            cost_gold: Some(100),
            cost_gems: None,
            time_secs: Some(45),
            enabled: false,
        });
        s.menu.hit.confirm_yes = Some(Rect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 });
        let cmd = pointer_down(&mut s, 5.0, 5.0, false, 0.0, 0.0);
        assert_eq!(cmd, Command::None);
        assert_eq!(s.menu.mode, MenuMode::Closed);
    }

    #[test]
    fn disabled_row_click_closes_menu() {
        let mut s = test_state();
        s.resources.gold = 0.0;
        let (px, py) = tile_center(&s, 3, 3);
        pointer_down(&mut s, px, py, false, 0.0, 0.0);
        assert_eq!(s.menu.mode, MenuMode::Empty);
        assert!(s.menu.actions.iter().all(|a| !a.enabled));

        s.menu.hit.rows.push((Rect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 }, 0));
        pointer_down(&mut s, 5.0, 5.0, false, 10.0, 0.01);
        assert_eq!(s.menu.mode, MenuMode::Closed);
    }

    #[test]
    fn hover_is_frozen_while_menu_open() {
        let mut s = test_state();
        let (px, py) = tile_center(&s, 3, 3);
        pointer_down(&mut s, px, py, false, 0.0, 0.0);
        let before = s.hover;
        let (qx, qy) = tile_center(&s, 1, 1);
        pointer_move(&mut s, qx, qy);
        assert_eq!(s.hover, before);
    }
}
