mod api;
mod assets;
mod components;
mod config;
mod coords;
mod model;
mod render;
mod state;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
