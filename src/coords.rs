//! Isometric coordinate mapping and the deterministic tile hash.
//!
//! All functions here are pure; the screen origin (where viewport tile
//! (0,0) is drawn) is passed in explicitly so the inverse mapping stays
//! the exact algebraic inverse of the forward one.

/// Forward/backward projection between viewport tiles and screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoProjection {
    pub tile_w: f64,
    pub tile_h: f64,
}

impl IsoProjection {
    /// Top corner of the tile diamond, relative to the screen origin.
    pub fn tile_to_screen(&self, x: i32, y: i32) -> (f64, f64) {
        self.tile_to_screen_f(x as f64, y as f64)
    }

    pub fn tile_to_screen_f(&self, x: f64, y: f64) -> (f64, f64) {
        ((y - x) * (self.tile_w / 2.0), (x + y) * (self.tile_h / 2.0))
    }

    /// Pixel where a sprite's base should sit: center of the diamond.
    pub fn ground_point(&self, origin: (f64, f64), x: i32, y: i32) -> (f64, f64) {
        let (sx, sy) = self.tile_to_screen(x, y);
        (origin.0 + sx, origin.1 + sy + self.tile_h / 2.0)
    }

    /// Inverse of `tile_to_screen` composed with the origin, floored to
    /// integers. `None` when the result falls outside the viewport.
    pub fn screen_to_tile(
        &self,
        origin: (f64, f64),
        px: f64,
        py: f64,
        view_w: i32,
        view_h: i32,
    ) -> Option<(i32, i32)> {
        let a = (px - origin.0) / (self.tile_w / 2.0);
        let b = (py - origin.1) / (self.tile_h / 2.0);

        let x = ((b - a) / 2.0).floor() as i32;
        let y = ((b + a) / 2.0).floor() as i32;

        if x < 0 || y < 0 || x >= view_w || y >= view_h {
            return None;
        }
        Some((x, y))
    }
}

/// Screen origin that puts the viewport's center tile ground point at
/// the canvas center.
pub fn center_origin(
    proj: &IsoProjection,
    canvas_w: f64,
    canvas_h: f64,
    view_w: i32,
    view_h: i32,
) -> (f64, f64) {
    let cx = (view_w - 1) as f64 / 2.0;
    let cy = (view_h - 1) as f64 / 2.0;
    let (sx, sy) = proj.tile_to_screen_f(cx, cy);
    (
        (canvas_w / 2.0 - sx).floor(),
        (canvas_h / 2.0 - sy - proj.tile_h / 2.0).floor(),
    )
}

/// Deterministic per-tile pseudo-random value in `[0, 1)`, keyed by
/// world coordinates so terrain variation is stable across pans and
/// reloads. Not a security-relevant hash.
pub fn hash2(x: i32, y: i32) -> f64 {
    let mixed = (x as i64)
        .wrapping_mul(374_761_393)
        .wrapping_add((y as i64).wrapping_mul(668_265_263));
    let mut n = mixed as i32;
    n ^= n >> 13;
    let n = (n as u32).wrapping_mul(1_274_126_177);
    n as f64 / 4_294_967_296.0
}
