//! Task Sync Frontend Entry Point

mod app;
mod backend;
mod components;
mod config;
mod context;
mod domain;
mod logging;
mod view_model;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let loaded = AppConfig::from_document();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    logging::init(config.log_level());
    if let Err(err) = &loaded {
        log::warn!("ignoring page configuration: {err}");
    }

    mount_to_body(move || view! { <App config=config /> });
}
