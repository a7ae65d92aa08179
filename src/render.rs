//! Canvas renderer. One full repaint per frame: terrain diamonds back
//! to front, building sprites in the same depth order, then the
//! untransformed overlays (labels, context menu, status line). The menu
//! pass also rewrites the hit regions the pointer handler tests against.

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::coords::hash2;
use crate::state::menu::{MenuAction, MenuMode, Rect};
use crate::state::CityState;
use crate::util::format_time;

const MENU_W: f64 = 380.0;
const MENU_H_LIST: f64 = 220.0;
const MENU_H_LIST_TALL: f64 = 360.0;
const MENU_ROW_H: f64 = 56.0;
const MENU_ROW_GAP: f64 = 12.0;
const CONFIRM_BTN_W: f64 = 140.0;
const CONFIRM_BTN_H: f64 = 64.0;

/// Back-to-front paint order for a `w x h` viewport: ascending `x + y`,
/// ties resolved by x so the order is total and stable.
pub fn depth_sorted_tiles(w: i32, h: i32) -> Vec<(i32, i32)> {
    let mut tiles = Vec::with_capacity((w * h) as usize);
    for x in 0..w {
        for y in 0..h {
            tiles.push((x, y));
        }
    }
    tiles.sort_by_key(|&(x, y)| (x + y, x));
    tiles
}

/// Uniform scale fitting a sprite into the tile footprint, clamped so
/// tiny and huge source images stay readable.
pub fn sprite_scale(
    img_w: f64,
    img_h: f64,
    tile_w: f64,
    tile_h: f64,
    fit: &crate::config::VisualFit,
) -> f64 {
    if img_w <= 0.0 || img_h <= 0.0 {
        return fit.min_scale;
    }
    let s = (tile_w * fit.max_w / img_w).min(tile_h * fit.max_h / img_h);
    s.clamp(fit.min_scale, fit.max_scale)
}

/// Progress bar dimensions derived from the drawn sprite size.
pub fn bar_size(sprite_w: f64, sprite_h: f64) -> (f64, f64) {
    (
        (sprite_w * 0.55).clamp(72.0, 140.0),
        (sprite_h * 0.055).clamp(8.0, 14.0),
    )
}

struct QueuedLabel {
    text: String,
    x: f64,
    y: f64,
}

pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    canvas_w: f64,
    canvas_h: f64,
    s: &mut CityState,
    now_sec: f64,
    now_ms: f64,
) {
    ctx.set_fill_style_str("#111");
    ctx.fill_rect(0.0, 0.0, canvas_w, canvas_h);

    let tiles = depth_sorted_tiles(s.world.view.w, s.world.view.h);
    let mut labels: Vec<QueuedLabel> = Vec::new();

    draw_terrain(ctx, s, &tiles, now_ms);
    draw_buildings(ctx, s, &tiles, now_sec, &mut labels);

    ctx.set_text_align("center");
    ctx.set_font("16px sans-serif");
    for label in &labels {
        ctx.set_fill_style_str("rgba(0,0,0,0.55)");
        let w = ctx
            .measure_text(&label.text)
            .map(|m| m.width())
            .unwrap_or(80.0);
        ctx.fill_rect(label.x - w / 2.0 - 8.0, label.y - 16.0, w + 16.0, 22.0);
        ctx.set_fill_style_str("#fff");
        ctx.fill_text(&label.text, label.x, label.y).ok();
    }

    draw_menu(ctx, canvas_w, canvas_h, s);

    if let Some(msg) = s.status.fresh(now_ms) {
        ctx.set_text_align("left");
        ctx.set_font("14px sans-serif");
        ctx.set_fill_style_str("rgba(255,255,255,0.85)");
        ctx.fill_text(msg, 12.0, canvas_h - 14.0).ok();
    }
}

fn draw_terrain(ctx: &CanvasRenderingContext2d, s: &CityState, tiles: &[(i32, i32)], now_ms: f64) {
    let tw = s.proj.tile_w;
    let th = s.proj.tile_h;

    for &(vx, vy) in tiles {
        let (sx, sy) = s.proj.tile_to_screen(vx, vy);
        ctx.save();
        ctx.translate(s.origin.0 + sx, s.origin.1 + sy).ok();

        let (wx, wy) = s.world.view_to_world(vx, vy);
        let inside = s.world.bounds.contains(wx, wy);

        let (top_b, bot_b) = if inside {
            let r = hash2(wx, wy);
            (0.7 + r * 0.1, 0.6 + r * 0.08)
        } else {
            (0.18, 0.14)
        };

        let grad = ctx.create_linear_gradient(0.0, 0.0, 0.0, th);
        let _ = grad.add_color_stop(0.0, &terrain_rgb(top_b));
        let _ = grad.add_color_stop(1.0, &terrain_rgb(bot_b));
        ctx.set_fill_style_canvas_gradient(&grad);

        ctx.begin_path();
        ctx.move_to(0.0, 0.0);
        ctx.line_to(tw / 2.0, th / 2.0);
        ctx.line_to(0.0, th);
        ctx.line_to(-tw / 2.0, th / 2.0);
        ctx.close_path();
        ctx.fill();

        ctx.set_stroke_style_str("rgba(0,0,0,0.12)");
        ctx.set_line_width(1.0);
        ctx.stroke();

        let building = s.world.building_at(vx, vy);
        let hovered = s.hover == Some((vx, vy));

        // pulsing underglow while an upgrade runs
        if building.map(|b| b.upgrading()).unwrap_or(false) {
            let pulse = if (now_ms / 400.0) as u64 % 2 == 0 {
                0.22
            } else {
                0.14
            };
            ctx.set_fill_style_str(&format!("rgba(255,60,60,{pulse})"));
            ctx.fill();
        }

        if hovered {
            match building {
                None => {
                    if inside {
                        ctx.set_fill_style_str("rgba(0,255,0,0.14)");
                        ctx.fill();
                    }
                }
                Some(_) => {
                    ctx.set_stroke_style_str("rgba(80,160,255,0.95)");
                    ctx.set_line_width(2.0);
                    ctx.stroke();
                }
            }
        }

        ctx.restore();
    }
}

fn terrain_rgb(b: f64) -> String {
    format!(
        "rgb({},{},{})",
        (210.0 * b) as u32,
        (185.0 * b) as u32,
        (150.0 * b) as u32
    )
}

fn draw_buildings(
    ctx: &CanvasRenderingContext2d,
    s: &CityState,
    tiles: &[(i32, i32)],
    now_sec: f64,
    labels: &mut Vec<QueuedLabel>,
) {
    let fit = s.config.visual_fit;

    for &(vx, vy) in tiles {
        let Some(b) = s.world.building_at(vx, vy) else {
            continue;
        };
        let (gx, gy) = s.proj.ground_point(s.origin, vx, vy);

        let img = s.assets.get(&b.building_type);
        let (dw, dh, dy) = match img {
            Some(img) if img.natural_width() > 0 => {
                let scale = sprite_scale(
                    img.natural_width() as f64,
                    img.natural_height() as f64,
                    s.proj.tile_w,
                    s.proj.tile_h,
                    &fit,
                );
                let dw = img.natural_width() as f64 * scale;
                let dh = img.natural_height() as f64 * scale;
                let dy = gy - dh + fit.ground_lift_px;
                draw_sprite(ctx, img, gx - dw / 2.0, dy, dw, dh);
                (dw, dh, dy)
            }
            _ => {
                // sprite missing or failed to load, draw a flat marker
                let dw = s.proj.tile_w * 0.5;
                let dh = s.proj.tile_h * 0.9;
                let dy = gy - dh + fit.ground_lift_px;
                ctx.set_fill_style_str("rgba(120,120,140,0.8)");
                ctx.fill_rect(gx - dw / 2.0, dy, dw, dh);
                (dw, dh, dy)
            }
        };

        if s.hover == Some((vx, vy)) {
            labels.push(QueuedLabel {
                text: format!("{} (Lvl {})", b.building_type.to_uppercase(), b.level),
                x: gx,
                y: gy - 62.0,
            });
        }

        if let Some(p) = b.upgrade_progress(now_sec) {
            let (bar_w, bar_h) = bar_size(dw, dh);
            let bx = gx - bar_w / 2.0;
            let by = dy + dh * 0.58;

            ctx.set_fill_style_str("rgba(0,0,0,0.55)");
            ctx.fill_rect(bx - 3.0, by - 3.0, bar_w + 6.0, bar_h + 6.0);
            ctx.set_fill_style_str("rgba(255,255,255,0.18)");
            ctx.fill_rect(bx, by, bar_w, bar_h);
            ctx.set_fill_style_str("#ffb020");
            ctx.fill_rect(bx, by, bar_w * p.pct, bar_h);
            ctx.set_stroke_style_str("rgba(0,0,0,0.7)");
            ctx.set_line_width(1.0);
            ctx.stroke_rect(bx, by, bar_w, bar_h);

            let remaining = format_time(p.remaining_secs.ceil() as u64);
            labels.push(QueuedLabel {
                text: format!("{} {}%", remaining, (p.pct * 100.0).round() as u32),
                x: gx,
                y: by - 10.0,
            });
        }
    }
}

fn draw_sprite(ctx: &CanvasRenderingContext2d, img: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) {
    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h);
}

fn draw_menu(ctx: &CanvasRenderingContext2d, canvas_w: f64, canvas_h: f64, s: &mut CityState) {
    if !s.menu.is_open() {
        return;
    }
    s.menu.hit.clear();

    let h = match s.menu.mode {
        MenuMode::Confirm => MENU_H_LIST,
        _ if s.menu.actions.len() > 2 => MENU_H_LIST_TALL,
        _ => MENU_H_LIST,
    };
    let x = ((canvas_w - MENU_W) / 2.0).floor();
    let y = ((canvas_h - h) / 2.0).floor();

    ctx.set_fill_style_str("rgba(15,18,24,0.96)");
    ctx.fill_rect(x, y, MENU_W, h);
    ctx.set_stroke_style_str("rgba(120,150,200,0.6)");
    ctx.set_line_width(2.0);
    ctx.stroke_rect(x, y, MENU_W, h);

    ctx.set_text_align("left");
    ctx.set_font("bold 18px sans-serif");
    ctx.set_fill_style_str("#fff");
    let title = match (&s.menu.building, s.menu.mode) {
        (_, MenuMode::Confirm) => "CONFIRM".to_string(),
        (Some(b), _) => format!("{} (Lvl {})", b.building_type.to_uppercase(), b.level),
        (None, _) => "BUILD".to_string(),
    };
    ctx.fill_text(&title, x + 16.0, y + 32.0).ok();

    let close = Rect {
        x: x + MENU_W - 44.0,
        y: y + 6.0,
        w: 38.0,
        h: 38.0,
    };
    ctx.set_fill_style_str("rgba(255,255,255,0.12)");
    ctx.fill_rect(close.x, close.y, close.w, close.h);
    ctx.set_fill_style_str("#fff");
    ctx.set_text_align("center");
    ctx.fill_text("x", close.x + close.w / 2.0, close.y + 26.0).ok();
    s.menu.hit.close = Some(close);

    match s.menu.mode {
        MenuMode::Confirm => draw_confirm(ctx, s, x, y, h),
        _ => draw_rows(ctx, s, x, y),
    }
}

fn action_meta(action: &MenuAction) -> String {
    let mut parts = Vec::new();
    if let Some(g) = action.cost_gold {
        parts.push(format!("{g}g"));
    }
    if let Some(g) = action.cost_gems {
        parts.push(format!("{g} gems"));
    }
    if let Some(t) = action.time_secs {
        if t > 0 {
            parts.push(format_time(t));
        }
    }
    parts.join(" \u{2022} ")
}

fn draw_rows(ctx: &CanvasRenderingContext2d, s: &mut CityState, x: f64, y: f64) {
    let actions = s.menu.actions.clone();
    let mut row_y = y + 54.0;

    for (idx, action) in actions.iter().enumerate() {
        let rect = Rect {
            x: x + 16.0,
            y: row_y,
            w: MENU_W - 32.0,
            h: MENU_ROW_H,
        };

        if action.enabled {
            ctx.set_fill_style_str("rgba(60,90,140,0.85)");
        } else {
            ctx.set_fill_style_str("rgba(60,60,70,0.6)");
        }
        ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);

        ctx.set_text_align("left");
        ctx.set_font("bold 16px sans-serif");
        ctx.set_fill_style_str(if action.enabled { "#fff" } else { "#9aa0aa" });
        ctx.fill_text(&action.label, rect.x + 12.0, rect.y + 24.0).ok();

        ctx.set_font("13px sans-serif");
        ctx.fill_text(&action_meta(action), rect.x + 12.0, rect.y + 44.0).ok();

        s.menu.hit.rows.push((rect, idx));
        row_y += MENU_ROW_H + MENU_ROW_GAP;
    }
}

fn draw_confirm(ctx: &CanvasRenderingContext2d, s: &mut CityState, x: f64, y: f64, h: f64) {
    let Some(action) = s.menu.confirm.clone() else {
        return;
    };

    ctx.set_text_align("center");
    ctx.set_font("bold 16px sans-serif");
    ctx.set_fill_style_str("#fff");
    ctx.fill_text(&action.label, x + MENU_W / 2.0, y + 76.0).ok();
    ctx.set_font("14px sans-serif");
    ctx.fill_text(&action_meta(&action), x + MENU_W / 2.0, y + 102.0).ok();

    let yes = Rect {
        x: x + 40.0,
        y: y + h - 86.0,
        w: CONFIRM_BTN_W,
        h: CONFIRM_BTN_H,
    };
    let no = Rect {
        x: x + MENU_W - 40.0 - CONFIRM_BTN_W,
        y: y + h - 86.0,
        w: CONFIRM_BTN_W,
        h: CONFIRM_BTN_H,
    };

    ctx.set_fill_style_str(if action.enabled {
        "rgba(46,160,67,0.9)"
    } else {
        "rgba(46,160,67,0.35)"
    });
    ctx.fill_rect(yes.x, yes.y, yes.w, yes.h);
    ctx.set_fill_style_str("rgba(200,60,60,0.9)");
    ctx.fill_rect(no.x, no.y, no.w, no.h);

    ctx.set_font("bold 18px sans-serif");
    ctx.set_fill_style_str("#fff");
    ctx.fill_text("YES", yes.x + yes.w / 2.0, yes.y + 40.0).ok();
    ctx.fill_text("NO", no.x + no.w / 2.0, no.y + 40.0).ok();

    s.menu.hit.confirm_yes = Some(yes);
    s.menu.hit.confirm_no = Some(no);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualFit;

    #[test]
    fn depth_order_is_back_to_front() {
        let tiles = depth_sorted_tiles(3, 3);
        assert_eq!(tiles.first(), Some(&(0, 0)));
        assert_eq!(tiles.last(), Some(&(2, 2)));
        for pair in tiles.windows(2) {
            let a = pair[0].0 + pair[0].1;
            let b = pair[1].0 + pair[1].1;
            assert!(a <= b);
        }
        assert_eq!(tiles.len(), 9);
    }

    #[test]
    fn sprite_scale_clamps_both_ends() {
        let fit = VisualFit {
            max_w: 0.78,
            max_h: 0.78,
            min_scale: 0.18,
            max_scale: 0.75,
            ground_lift_px: 35.0,
        };
        // tiny source image would want a huge scale
        assert_eq!(sprite_scale(10.0, 10.0, 128.0, 64.0, &fit), 0.75);
        // giant source image would want a tiny scale
        assert_eq!(sprite_scale(5000.0, 5000.0, 128.0, 64.0, &fit), 0.18);
        // mid-size lands between the clamps
        let s = sprite_scale(200.0, 100.0, 128.0, 64.0, &fit);
        assert!(s > 0.18 && s < 0.75);
    }

    #[test]
    fn progress_bar_stays_readable() {
        assert_eq!(bar_size(40.0, 40.0), (72.0, 8.0));
        assert_eq!(bar_size(1000.0, 1000.0), (140.0, 14.0));
        // mid-range sizes scale with the sprite instead of clamping
        let (w, h) = bar_size(180.0, 200.0);
        assert!((w - 99.0).abs() < 1e-9, "bar width {w}");
        assert!((h - 11.0).abs() < 1e-9, "bar height {h}");
    }
}
