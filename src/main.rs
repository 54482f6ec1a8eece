use std::rc::Rc;

mod audio;
mod components;
mod config;
mod error;
mod model;
mod state;
mod util;

use components::app::{App, AppProps};
use config::SiteConfig;

fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let config = match web_sys::window().and_then(|w| w.document()) {
        Some(document) => SiteConfig::load(&document),
        None => SiteConfig::default(),
    };
    log::info!("counting down to {}", config.countdown.target_date);

    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
