//! Sprite preloading. Every image element is created up front and the
//! first frame waits for all of them to settle, load or fail; a failed
//! sprite simply never draws and the tile keeps its terrain.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::util::clog;

#[derive(Default)]
pub struct AssetStore {
    images: HashMap<String, HtmlImageElement>,
}

impl AssetStore {
    pub fn get(&self, building_type: &str) -> Option<&HtmlImageElement> {
        self.images.get(building_type)
    }
}

pub async fn preload(image_map: &[(String, String)]) -> AssetStore {
    let mut images = HashMap::new();
    let mut pending = Vec::new();

    for (building_type, url) in image_map {
        let Ok(img) = HtmlImageElement::new() else {
            continue;
        };

        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let done = Closure::once_into_js(move |_: web_sys::Event| {
                let _ = resolve.call0(&JsValue::NULL);
            });
            img.set_onload(Some(done.unchecked_ref()));
            img.set_onerror(Some(done.unchecked_ref()));
        });

        img.set_src(url);
        images.insert(building_type.clone(), img);
        pending.push(JsFuture::from(promise));
    }

    for fut in pending {
        let _ = fut.await;
    }
    clog(&format!("assets: {} sprites settled", images.len()));

    AssetStore { images }
}
