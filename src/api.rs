//! HTTP bridge to the authoritative city service. Every mutation is
//! fire-and-forget from the caller's point of view: the spawned task
//! posts, reports through the status line, and always schedules a
//! state reload so the client converges on whatever the server decided.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use gloo_net::http::Request;
use wasm_bindgen_futures::spawn_local;

use crate::model::{GameState, RawGameState};
use crate::state::input::DispatchRequest;
use crate::state::menu::SpeedupMode;
use crate::state::CityState;
use crate::util::clog;

const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

#[derive(Debug)]
pub enum ApiError {
    Network(String),
    Status(u16, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Status(code, body) if body.is_empty() => write!(f, "HTTP {code}"),
            ApiError::Status(code, body) => write!(f, "HTTP {code}: {body}"),
        }
    }
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// The settings modal accepts a base with or without a trailing slash;
/// paths below always add their own.
fn base_url(raw: &str) -> &str {
    raw.trim_end_matches('/')
}

fn idempotency_key() -> String {
    let t = js_sys::Date::now() as u64;
    let r = (js_sys::Math::random() * 1e9) as u64;
    format!("{t:x}-{r:x}")
}

async fn fetch_state(url: &str) -> Result<RawGameState, ApiError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !resp.ok() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status(resp.status(), body));
    }
    resp.json::<RawGameState>()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))
}

async fn post_json(
    url: &str,
    body: &serde_json::Value,
    idempotency: Option<&str>,
) -> Result<serde_json::Value, ApiError> {
    let mut req = Request::post(url);
    if let Some(key) = idempotency {
        req = req.header(IDEMPOTENCY_HEADER, key);
    }
    let resp = req
        .json(body)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !resp.ok() {
        let text = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status(resp.status(), text));
    }
    resp.json::<serde_json::Value>()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))
}

/// Reload the full game state. Single-flight: a reload already on the
/// wire suppresses new ones, and a response that lost the race against
/// a newer one is dropped instead of applied.
pub fn spawn_reload(city: Rc<RefCell<CityState>>) {
    let (url, seq) = {
        let mut s = city.borrow_mut();
        if s.load_in_flight {
            return;
        }
        s.load_in_flight = true;
        s.load_seq += 1;
        (
            format!("{}/city/{}", base_url(&s.session.api_base), s.session.user_id),
            s.load_seq,
        )
    };

    spawn_local(async move {
        let result = fetch_state(&url).await;
        let mut s = city.borrow_mut();
        s.load_in_flight = false;
        match result {
            Ok(raw) => {
                if seq <= s.applied_seq {
                    return;
                }
                s.applied_seq = seq;
                let fallback = s.config.build_cost_gold.clone();
                s.apply_game_state(GameState::from_raw(raw, &fallback));
                s.status.set("State loaded.", now_ms());
            }
            Err(e) => {
                clog(&format!("reload failed: {e}"));
                s.status.set(format!("Load failed: {e}"), now_ms());
            }
        }
    });
}

/// Send one confirmed player action, then reload regardless of outcome.
pub fn spawn_dispatch(city: Rc<RefCell<CityState>>, req: DispatchRequest) {
    let (base, user) = {
        let s = city.borrow();
        (base_url(&s.session.api_base).to_string(), s.session.user_id.clone())
    };

    let (url, body, pending) = match req {
        DispatchRequest::Place {
            building_type,
            world_x,
            world_y,
        } => (
            format!("{base}/city/{user}/place"),
            serde_json::json!({
                "building_type": building_type,
                "x": world_x,
                "y": world_y,
                "world_x": world_x,
                "world_y": world_y,
            }),
            "Placing...",
        ),
        DispatchRequest::Upgrade { building_id } => (
            format!("{base}/city/{user}/upgrade"),
            serde_json::json!({ "building_id": building_id }),
            "Upgrading...",
        ),
        DispatchRequest::Demolish { building_id } => (
            format!("{base}/city/{user}/demolish"),
            serde_json::json!({ "building_id": building_id }),
            "Demolishing...",
        ),
        DispatchRequest::Speedup { building_id, mode } => {
            let body = match mode {
                SpeedupMode::Finish => serde_json::json!({
                    "building_id": building_id,
                    "mode": "finish",
                }),
                SpeedupMode::Reduce { seconds } => serde_json::json!({
                    "building_id": building_id,
                    "mode": "reduce",
                    "seconds": seconds,
                }),
            };
            (format!("{base}/city/{user}/speedup_upgrade"), body, "Speeding up...")
        }
    };

    city.borrow_mut().status.set(pending, now_ms());

    spawn_local(async move {
        let result = post_json(&url, &body, None).await;
        {
            let mut s = city.borrow_mut();
            match &result {
                Ok(_) => s.status.set("Done.", now_ms()),
                Err(e) => s.status.set(format!("Action failed: {e}"), now_ms()),
            }
        }
        spawn_reload(city);
    });
}

/// Development gem purchase. Retries of the same logical purchase reuse
/// the idempotency key so the server credits once.
pub fn spawn_credit_gems(city: Rc<RefCell<CityState>>, gems: u64) {
    let (base, user) = {
        let s = city.borrow();
        (base_url(&s.session.api_base).to_string(), s.session.user_id.clone())
    };
    let key = idempotency_key();
    let url = format!("{base}/shop/credit_gems");
    let body = serde_json::json!({
        "user_id": user,
        "gems": gems,
        "provider": "dev",
        "purchase_id": key,
    });

    spawn_local(async move {
        let result = post_json(&url, &body, Some(&key)).await;
        {
            let mut s = city.borrow_mut();
            match &result {
                Ok(_) => s.status.set(format!("Credited {gems} gems."), now_ms()),
                Err(e) => s.status.set(format!("Purchase failed: {e}"), now_ms()),
            }
        }
        spawn_reload(city);
    });
}

/// Spend gems to push the world border out by `steps` rings.
pub fn spawn_expand(city: Rc<RefCell<CityState>>, steps: u32) {
    let (base, user) = {
        let s = city.borrow();
        (base_url(&s.session.api_base).to_string(), s.session.user_id.clone())
    };
    let key = idempotency_key();
    let url = format!("{base}/city/{user}/expand_gems");
    let body = serde_json::json!({ "steps": steps });

    spawn_local(async move {
        let result = post_json(&url, &body, Some(&key)).await;
        {
            let mut s = city.borrow_mut();
            match &result {
                Ok(_) => s.status.set("World expanded.", now_ms()),
                Err(e) => s.status.set(format!("Expand failed: {e}"), now_ms()),
            }
        }
        spawn_reload(city);
    });
}

/// Ask the server for a fresh city, adopt the returned user id and
/// persist it, then load the new state.
pub fn spawn_new_game(city: Rc<RefCell<CityState>>, desired_user: Option<String>) {
    let base = base_url(&city.borrow().session.api_base).to_string();
    let url = format!("{base}/new_game");
    let body = match desired_user {
        Some(user) => serde_json::json!({ "user_id": user }),
        None => serde_json::json!({}),
    };

    spawn_local(async move {
        let result = post_json(&url, &body, None).await;
        {
            let mut s = city.borrow_mut();
            match &result {
                Ok(value) => {
                    if let Some(user_id) = value.get("user_id").and_then(|v| v.as_str()) {
                        s.session.user_id = user_id.to_string();
                        s.session.store();
                    }
                    s.world.recenter_to_zero();
                    s.status.set("New game started.", now_ms());
                }
                Err(e) => s.status.set(format!("New game failed: {e}"), now_ms()),
            }
        }
        spawn_reload(city);
    });
}

#[cfg(test)]
mod tests {
    use super::base_url;

    #[test]
    fn base_url_tolerates_trailing_slashes() {
        assert_eq!(base_url("https://city.example/"), "https://city.example");
        assert_eq!(base_url("https://city.example//"), "https://city.example");
        assert_eq!(base_url("https://city.example"), "https://city.example");
    }
}
