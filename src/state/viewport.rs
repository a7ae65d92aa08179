//! Viewport/world model: the fixed-size window of tiles, its world
//! offset clamped against world bounds, and the sparse grid mirroring
//! remote building placements.

use crate::model::{Building, WorldBounds, DEFAULT_WORLD_RADIUS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub w: i32,
    pub h: i32,
    /// World coordinate of the viewport's top-left cell.
    pub offset_x: i32,
    pub offset_y: i32,
}

#[derive(Clone, Debug)]
pub struct WorldModel {
    pub view: Viewport,
    pub bounds: WorldBounds,
    /// Remote mirror, re-derived on every reload.
    buildings: Vec<Building>,
    /// Row-major `w*h` cells; each holds an index into `buildings`.
    grid: Vec<Option<usize>>,
}

fn clamp_axis(requested: i32, min: i32, max: i32, size: i32) -> i32 {
    // When the viewport is wider than the world this pins to `min`,
    // keeping the whole world visible instead of inverting the range.
    let hi = min.max(max - (size - 1));
    requested.clamp(min, hi)
}

impl WorldModel {
    pub fn new(w: i32, h: i32) -> Self {
        let mut m = Self {
            view: Viewport {
                w: w.max(1),
                h: h.max(1),
                offset_x: 0,
                offset_y: 0,
            },
            bounds: WorldBounds::from_radius(DEFAULT_WORLD_RADIUS),
            buildings: Vec::new(),
            grid: Vec::new(),
        };
        m.set_offset(0, 0);
        m
    }

    pub fn view_to_world(&self, vx: i32, vy: i32) -> (i32, i32) {
        (self.view.offset_x + vx, self.view.offset_y + vy)
    }

    pub fn world_to_view(&self, wx: i32, wy: i32) -> (i32, i32) {
        (wx - self.view.offset_x, wy - self.view.offset_y)
    }

    pub fn in_view(&self, vx: i32, vy: i32) -> bool {
        vx >= 0 && vy >= 0 && vx < self.view.w && vy < self.view.h
    }

    pub fn building_at(&self, vx: i32, vy: i32) -> Option<&Building> {
        if !self.in_view(vx, vy) {
            return None;
        }
        let idx = (vy * self.view.w + vx) as usize;
        self.grid
            .get(idx)
            .copied()
            .flatten()
            .and_then(|i| self.buildings.get(i))
    }

    /// Reallocates the grid and re-clamps the offset for the new size.
    pub fn set_view_size(&mut self, w: i32, h: i32) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.view.w = w;
        self.view.h = h;
        self.set_offset(self.view.offset_x, self.view.offset_y);
    }

    /// Clamps each axis independently, then rebuilds the grid.
    pub fn set_offset(&mut self, ox: i32, oy: i32) {
        self.view.offset_x = clamp_axis(ox, self.bounds.min_x, self.bounds.max_x, self.view.w);
        self.view.offset_y = clamp_axis(oy, self.bounds.min_y, self.bounds.max_y, self.view.h);
        self.rebuild();
    }

    pub fn shift_view(&mut self, dx: i32, dy: i32) {
        self.set_offset(self.view.offset_x + dx, self.view.offset_y + dy);
    }

    /// Centers the viewport on world tile (0,0).
    pub fn recenter_to_zero(&mut self) {
        self.set_offset(-((self.view.w - 1) / 2), -((self.view.h - 1) / 2));
    }

    /// Replaces the remote mirror after a reload. The current offset is
    /// re-clamped against the (possibly changed) bounds.
    pub fn set_world(&mut self, bounds: WorldBounds, buildings: Vec<Building>) {
        self.bounds = bounds;
        self.buildings = buildings;
        self.set_offset(self.view.offset_x, self.view.offset_y);
    }

    /// Full clear + repopulate. Never patched incrementally: offset and
    /// world changes are infrequent, and a full rebuild rules out stale
    /// entries.
    fn rebuild(&mut self) {
        let cells = (self.view.w * self.view.h) as usize;
        self.grid.clear();
        self.grid.resize(cells, None);
        for (i, b) in self.buildings.iter().enumerate() {
            let (vx, vy) = self.world_to_view(b.world_x, b.world_y);
            if vx >= 0 && vy >= 0 && vx < self.view.w && vy < self.view.h {
                self.grid[(vy * self.view.w + vx) as usize] = Some(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn building(id: &str, wx: i32, wy: i32) -> Building {
        Building {
            id: id.into(),
            building_type: "farm".into(),
            level: 1,
            world_x: wx,
            world_y: wy,
            upgrade_start: None,
            upgrade_end: None,
        }
    }

    #[test]
    fn offset_clamps_to_world_bounds() {
        let mut m = WorldModel::new(3, 3);
        m.set_world(WorldBounds::from_radius(5), Vec::new());
        m.set_offset(100, -100);
        // max allowed = max_x - (w-1) = 5 - 2 = 3
        assert_eq!((m.view.offset_x, m.view.offset_y), (3, -5));
        m.set_offset(0, 0);
        assert_eq!((m.view.offset_x, m.view.offset_y), (0, 0));
    }

    #[test]
    fn oversized_viewport_pins_to_min() {
        let mut m = WorldModel::new(9, 9);
        m.set_world(WorldBounds::from_radius(2), Vec::new());
        m.set_offset(0, 0);
        assert_eq!((m.view.offset_x, m.view.offset_y), (-2, -2));
    }

    #[test]
    fn recenter_scenario_7x7_radius_3() {
        let mut m = WorldModel::new(7, 7);
        m.set_world(WorldBounds::from_radius(3), vec![building("hall", 0, 0)]);
        m.recenter_to_zero();
        assert_eq!((m.view.offset_x, m.view.offset_y), (-3, -3));
        let b = m.building_at(3, 3).expect("building at center cell");
        assert_eq!(b.id, "hall");
    }

    #[test]
    fn rebuild_keeps_grid_and_offset_consistent() {
        let mut m = WorldModel::new(7, 7);
        m.set_world(
            WorldBounds::from_radius(3),
            vec![building("a", -3, -3), building("b", 3, 3), building("c", 9, 9)],
        );
        m.recenter_to_zero();
        assert_eq!(m.building_at(0, 0).map(|b| b.id.as_str()), Some("a"));
        assert_eq!(m.building_at(6, 6).map(|b| b.id.as_str()), Some("b"));
        // every occupant's world coord converts back to its cell
        for vx in 0..7 {
            for vy in 0..7 {
                if let Some(b) = m.building_at(vx, vy) {
                    assert_eq!(m.world_to_view(b.world_x, b.world_y), (vx, vy));
                }
            }
        }
    }

    #[test]
    fn pan_moves_buildings_through_the_viewport() {
        // radius 5 leaves offset room [-5, -1] for a 7-wide view, so the
        // pan below is not swallowed by the clamp
        let mut m = WorldModel::new(7, 7);
        m.set_world(WorldBounds::from_radius(5), vec![building("a", 0, 0)]);
        m.recenter_to_zero();
        assert_eq!(m.building_at(3, 3).map(|b| b.id.as_str()), Some("a"));
        m.shift_view(1, 0);
        assert_eq!(m.building_at(2, 3).map(|b| b.id.as_str()), Some("a"));
        assert!(m.building_at(3, 3).is_none());
    }

    #[test]
    fn pan_against_the_border_is_a_no_op() {
        let mut m = WorldModel::new(7, 7);
        m.set_world(WorldBounds::from_radius(3), vec![building("a", 0, 0)]);
        m.recenter_to_zero();
        // 7-wide view over a 7-wide world: the offset range collapses
        // to a single value on both axes
        m.shift_view(1, 0);
        assert_eq!((m.view.offset_x, m.view.offset_y), (-3, -3));
        assert_eq!(m.building_at(3, 3).map(|b| b.id.as_str()), Some("a"));
    }

    #[test]
    fn resize_reclamps_and_keeps_grid_dimensions() {
        let mut m = WorldModel::new(7, 7);
        m.set_world(WorldBounds::from_radius(3), vec![building("a", 3, 3)]);
        m.set_offset(3, 3); // clamps to (−3..3) range with w=7 → (-3,-3)
        m.set_view_size(3, 3);
        // offset re-clamped for the smaller window: max = 3-(3-1) = 1
        assert_eq!((m.view.offset_x, m.view.offset_y), (-3, -3));
        m.set_offset(10, 10);
        assert_eq!((m.view.offset_x, m.view.offset_y), (1, 1));
        assert_eq!(m.building_at(2, 2).map(|b| b.id.as_str()), Some("a"));
    }
}
