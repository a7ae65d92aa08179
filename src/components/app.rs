use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent};
use yew::prelude::*;

use super::{hud_panel::HudPanel, pan_controls::PanControls, settings_modal::SettingsModal};
use crate::config::CityConfig;
use crate::state::input::{self, Command};
use crate::state::session::Session;
use crate::state::CityState;
use crate::{api, assets, render};

const RELOAD_INTERVAL_MS: i32 = 8000;

/// Values lifted out of the canvas state once per frame so the yew side
/// only re-renders when something the panels show actually changed.
#[derive(Clone, Debug, Default, PartialEq)]
struct HudSnapshot {
    gold: i64,
    wood: i64,
    gems: i64,
    user: String,
}

fn canvas_point(canvas: &HtmlCanvasElement, e: &PointerEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let scale_x = if rect.width() > 0.0 {
        canvas.width() as f64 / rect.width()
    } else {
        1.0
    };
    let scale_y = if rect.height() > 0.0 {
        canvas.height() as f64 / rect.height()
    } else {
        1.0
    };
    (
        (e.client_x() as f64 - rect.left()) * scale_x,
        (e.client_y() as f64 - rect.top()) * scale_y,
    )
}

#[function_component(App)]
pub fn app() -> Html {
    let canvas_ref = use_node_ref();
    let city = use_mut_ref(|| {
        let config = CityConfig::default();
        let session = Session::load(&config);
        let mut s = CityState::new(config);
        s.session = session;
        s
    });
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let hud = use_state(HudSnapshot::default);
    let open_settings = use_state(|| false);

    // Main mount effect (canvas sizing, events, loops, initial load)
    {
        let canvas_ref = canvas_ref.clone();
        let city_setup = city.clone();
        let draw_ref_setup = draw_ref.clone();
        let hud_handle = hud.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no global `window` exists");
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");

            let compute_and_apply_canvas_size = {
                let canvas = canvas.clone();
                let window = window.clone();
                let city = city_setup.clone();
                move || {
                    let dpr = window.device_pixel_ratio().clamp(1.0, 3.0);
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0);
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0);
                    canvas.set_width((width * dpr).max(0.0) as u32);
                    canvas.set_height((height * dpr).max(0.0) as u32);
                    city.borrow_mut()
                        .recenter_origin(canvas.width() as f64, canvas.height() as f64);
                }
            };
            compute_and_apply_canvas_size();

            // Draw closure
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let city = city_setup.clone();
                let hud = hud_handle.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas.get_context("2d").ok().flatten() {
                        Some(c) => c.dyn_into::<CanvasRenderingContext2d>().unwrap(),
                        None => return,
                    };
                    let w = canvas.width() as f64;
                    let h = canvas.height() as f64;
                    let now_ms = js_sys::Date::now();
                    let now_sec = now_ms / 1000.0;
                    let mut s = city.borrow_mut();
                    render::draw_frame(&ctx, w, h, &mut s, now_sec, now_ms);
                    let snap = HudSnapshot {
                        gold: s.resources.gold.floor() as i64,
                        wood: s.resources.wood.floor() as i64,
                        gems: s.resources.gems.floor() as i64,
                        user: s.session.user_id.clone(),
                    };
                    drop(s);
                    if *hud != snap {
                        hud.set(snap);
                    }
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure);

            // RAF loop
            let raf_id: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
            {
                let raf_id_clone = raf_id.clone();
                let draw_ref_loop = draw_ref_setup.clone();
                let window_loop = window.clone();
                let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
                    Rc::new(RefCell::new(None));
                let closure_cell_clone = closure_cell.clone();
                *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    if let Some(f) = &*draw_ref_loop.borrow() {
                        f();
                    }
                    if let Ok(id) = window_loop.request_animation_frame(
                        closure_cell_clone
                            .borrow()
                            .as_ref()
                            .unwrap()
                            .as_ref()
                            .unchecked_ref(),
                    ) {
                        *raf_id_clone.borrow_mut() = Some(id);
                    }
                })
                    as Box<dyn FnMut()>));
                if let Ok(id) = window.request_animation_frame(
                    closure_cell
                        .borrow()
                        .as_ref()
                        .unwrap()
                        .as_ref()
                        .unchecked_ref(),
                ) {
                    *raf_id.borrow_mut() = Some(id);
                }
            }

            // Pointer events
            let pointermove_cb = {
                let canvas = canvas.clone();
                let city = city_setup.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    let (px, py) = canvas_point(&canvas, &e);
                    input::pointer_move(&mut city.borrow_mut(), px, py);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointermove",
                    pointermove_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            let pointerdown_cb = {
                let canvas = canvas.clone();
                let city = city_setup.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    e.prevent_default();
                    let (px, py) = canvas_point(&canvas, &e);
                    let touch = e.pointer_type() == "touch";
                    let now_ms = js_sys::Date::now();
                    let cmd = input::pointer_down(
                        &mut city.borrow_mut(),
                        px,
                        py,
                        touch,
                        now_ms,
                        now_ms / 1000.0,
                    );
                    if let Command::Dispatch(req) = cmd {
                        api::spawn_dispatch(city.clone(), req);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointerdown",
                    pointerdown_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            let contextmenu_cb = {
                Closure::wrap(Box::new(move |e: web_sys::Event| {
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            let resize_cb = {
                let compute_and_apply_canvas_size = compute_and_apply_canvas_size.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    compute_and_apply_canvas_size();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .unwrap();

            // Background refresh so other sessions' changes show up
            let reload_tick = {
                let city = city_setup.clone();
                Closure::wrap(Box::new(move || {
                    api::spawn_reload(city.clone());
                }) as Box<dyn FnMut()>)
            };
            let reload_tick_id = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    reload_tick.as_ref().unchecked_ref(),
                    RELOAD_INTERVAL_MS,
                )
                .unwrap();

            // Sprites first, then the initial state load
            {
                let city = city_setup.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let image_map = city.borrow().config.image_map.clone();
                    let store = assets::preload(&image_map).await;
                    city.borrow_mut().assets = store;
                    api::spawn_reload(city);
                });
            }

            // Cleanup
            let window_clone = window.clone();
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "pointermove",
                    pointermove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "pointerdown",
                    pointerdown_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                window_clone.clear_interval_with_handle(reload_tick_id);
                if let Some(id) = *raf_id.borrow() {
                    let _ = window_clone.cancel_animation_frame(id);
                }
                let _keep_alive = (
                    &pointermove_cb,
                    &pointerdown_cb,
                    &contextmenu_cb,
                    &resize_cb,
                    &reload_tick,
                );
            }
        });
    }

    let pan_cb = |dx: i32, dy: i32| {
        let city = city.clone();
        Callback::from(move |()| {
            city.borrow_mut().world.shift_view(dx, dy);
        })
    };
    let recenter_cb: Callback<()> = {
        let city = city.clone();
        Callback::from(move |()| {
            city.borrow_mut().world.recenter_to_zero();
        })
    };
    let open_settings_cb: Callback<()> = {
        let open_settings = open_settings.clone();
        Callback::from(move |()| open_settings.set(true))
    };
    let close_settings_cb: Callback<()> = {
        let open_settings = open_settings.clone();
        Callback::from(move |()| open_settings.set(false))
    };
    let save_session_cb: Callback<(String, String)> = {
        let city = city.clone();
        let open_settings = open_settings.clone();
        Callback::from(move |(api_base, user_id): (String, String)| {
            {
                let mut s = city.borrow_mut();
                s.session.api_base = api_base;
                s.session.user_id = user_id;
                s.session.store();
                s.world.recenter_to_zero();
            }
            api::spawn_reload(city.clone());
            open_settings.set(false);
        })
    };
    let new_game_cb: Callback<String> = {
        let city = city.clone();
        let open_settings = open_settings.clone();
        Callback::from(move |desired: String| {
            let desired = if desired.is_empty() {
                None
            } else {
                Some(desired)
            };
            api::spawn_new_game(city.clone(), desired);
            open_settings.set(false);
        })
    };
    let credit_gems_cb: Callback<u64> = {
        let city = city.clone();
        Callback::from(move |gems: u64| {
            api::spawn_credit_gems(city.clone(), gems);
        })
    };
    let expand_cb: Callback<u32> = {
        let city = city.clone();
        Callback::from(move |steps: u32| {
            api::spawn_expand(city.clone(), steps);
        })
    };

    let (api_base, user_id) = {
        let s = city.borrow();
        (s.session.api_base.clone(), s.session.user_id.clone())
    };

    html! {<div style="position:relative; width:100vw; height:100vh; overflow:hidden;">
        <canvas ref={canvas_ref.clone()} id="city-canvas" style="display:block; width:100%; height:100%; touch-action:none;"></canvas>
        <HudPanel gold={hud.gold} wood={hud.wood} gems={hud.gems} user={hud.user.clone()} />
        <PanControls
            on_pan_left={pan_cb(-1, 1)}
            on_pan_right={pan_cb(1, -1)}
            on_pan_up={pan_cb(-1, -1)}
            on_pan_down={pan_cb(1, 1)}
            on_recenter={recenter_cb}
            on_open_settings={open_settings_cb} />
        <SettingsModal show={*open_settings}
            api_base={api_base}
            user_id={user_id}
            on_close={close_settings_cb}
            on_save={save_session_cb}
            on_new_game={new_game_cb}
            on_credit_gems={credit_gems_cb}
            on_expand={expand_cb} />
    </div>}
}
