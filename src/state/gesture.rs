//! Two-tap recognizer for touch input. The first tap on a tile selects
//! it; a second tap on the same tile inside the window opens the menu.

pub const DOUBLE_TAP_WINDOW_MS: f64 = 2500.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapDecision {
    Select,
    Open,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TapGesture {
    pending: Option<(i32, i32, f64)>,
}

impl TapGesture {
    pub fn on_tap(&mut self, vx: i32, vy: i32, now_ms: f64) -> TapDecision {
        if let Some((px, py, at)) = self.pending {
            if px == vx && py == vy && now_ms - at <= DOUBLE_TAP_WINDOW_MS {
                self.pending = None;
                return TapDecision::Open;
            }
        }
        self.pending = Some((vx, vy, now_ms));
        TapDecision::Select
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }
}
