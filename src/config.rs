//! Frontend-only configuration defaults. No runtime state lives here:
//! the world size and building data come from the backend, and the
//! session (api base + user id) is editable in the in-game menu.

use std::collections::BTreeMap;

/// How a building sprite is fitted into its 1x1 tile footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualFit {
    /// Max sprite width as a fraction of tile width.
    pub max_w: f64,
    /// Max sprite height as a fraction of tile height.
    pub max_h: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Positive = sprite sits deeper into the tile (toward the ground).
    pub ground_lift_px: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CityConfig {
    pub api_base: String,
    pub user_id: String,

    /// Viewport size in tiles. The world size comes from the backend.
    pub viewport_w: i32,
    pub viewport_h: i32,

    pub tile_width: f64,
    pub tile_height: f64,
    pub visual_fit: VisualFit,

    /// UI pre-check costs; the server stays authoritative.
    pub build_cost_gold: BTreeMap<String, u64>,
    pub image_map: Vec<(String, String)>,
}

impl Default for CityConfig {
    fn default() -> Self {
        let build_cost_gold = [
            ("townhall", 200),
            ("farm", 100),
            ("lumbermill", 150),
            ("house", 80),
            ("barracks", 300),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let image_map = [
            ("townhall", "assets/realm/Castles/castlekeep_01.png"),
            ("farm", "assets/realm/Fields Farms/field_01a.png"),
            ("lumbermill", "assets/realm/Mills/windmill_01a.png"),
            ("house", "assets/realm/Houses/house_01a.png"),
            ("barracks", "assets/realm/Barracks/Barracks_01.png"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            api_base: "https://city.api.ventureout.cz".to_string(),
            user_id: "test123".to_string(),
            viewport_w: 7,
            viewport_h: 7,
            tile_width: 128.0,
            tile_height: 64.0,
            visual_fit: VisualFit {
                max_w: 0.78,
                max_h: 0.78,
                min_scale: 0.18,
                max_scale: 0.75,
                ground_lift_px: 35.0,
            },
            build_cost_gold,
            image_map,
        }
    }
}
