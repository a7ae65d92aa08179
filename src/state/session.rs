use crate::config::CityConfig;
use serde::{Deserialize, Serialize};

const SESSION_KEY: &str = "isocity_session";

/// Persisted connection identity: which backend to talk to and as whom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub api_base: String,
    pub user_id: String,
}

impl Session {
    pub fn load(config: &CityConfig) -> Self {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                if let Ok(Some(raw)) = storage.get_item(SESSION_KEY) {
                    if let Ok(session) = serde_json::from_str::<Session>(&raw) {
                        return session;
                    }
                }
            }
        }
        Session {
            api_base: config.api_base.clone(),
            user_id: config.user_id.clone(),
        }
    }

    pub fn store(&self) {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                if let Ok(raw) = serde_json::to_string(self) {
                    let _ = storage.set_item(SESSION_KEY, &raw);
                }
            }
        }
    }
}
