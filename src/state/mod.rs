pub mod gesture;
pub mod input;
pub mod menu;
pub mod session;
pub mod status;
pub mod viewport;

use std::collections::BTreeMap;

use crate::assets::AssetStore;
use crate::config::CityConfig;
use crate::coords::{self, IsoProjection};
use crate::model::{GameState, Resources};
use gesture::TapGesture;
use menu::ContextMenu;
use session::Session;
use status::StatusLine;
use viewport::WorldModel;

/// Everything the render loop and the pointer handlers share. Owned by
/// the app component behind a single `Rc<RefCell<..>>`.
pub struct CityState {
    pub config: CityConfig,
    pub session: Session,
    pub proj: IsoProjection,
    /// canvas-space pixel position of the viewport's center tile anchor
    pub origin: (f64, f64),
    pub world: WorldModel,
    pub resources: Resources,
    pub catalog: BTreeMap<String, u64>,
    pub menu: ContextMenu,
    pub gesture: TapGesture,
    pub hover: Option<(i32, i32)>,
    pub status: StatusLine,
    pub assets: AssetStore,
    pub load_in_flight: bool,
    pub load_seq: u64,
    pub applied_seq: u64,
}

impl CityState {
    pub fn new(config: CityConfig) -> Self {
        let session = Session {
            api_base: config.api_base.clone(),
            user_id: config.user_id.clone(),
        };
        let proj = IsoProjection {
            tile_w: config.tile_width,
            tile_h: config.tile_height,
        };
        let world = WorldModel::new(config.viewport_w, config.viewport_h);
        let catalog = config.build_cost_gold.clone();
        CityState {
            config,
            session,
            proj,
            origin: (0.0, 0.0),
            world,
            resources: Resources::default(),
            catalog,
            menu: ContextMenu::default(),
            gesture: TapGesture::default(),
            hover: None,
            status: StatusLine::default(),
            assets: AssetStore::default(),
            load_in_flight: false,
            load_seq: 0,
            applied_seq: 0,
        }
    }

    /// Swap in a freshly fetched snapshot. The menu is left alone so a
    /// background refresh never yanks an open dialog away.
    pub fn apply_game_state(&mut self, gs: GameState) {
        self.resources = gs.resources;
        self.catalog = gs.catalog;
        self.world.set_world(gs.bounds, gs.buildings);
    }

    pub fn recenter_origin(&mut self, canvas_w: f64, canvas_h: f64) {
        self.origin = coords::center_origin(
            &self.proj,
            canvas_w,
            canvas_h,
            self.world.view.w,
            self.world.view.h,
        );
    }
}
