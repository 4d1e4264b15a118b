mod api;
mod authoring;
mod catalog;
mod chat;
mod config;
mod content;
mod error;
mod liveness;
mod logging;
mod models;
mod pdf;
mod preferences;
mod router;
mod state;
mod storage;
mod transcript;
mod ui;

use leptos::*;
use tracing::info;

use crate::config::AppConfig;
use crate::ui::App;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load();
    logging::init_tracing(&config.log_filter);
    info!(
        build = %config.build.hash,
        server = %config.default_server_url,
        "dinner-os starting"
    );

    mount_to_body(move || view! { <App config=config /> });
}
