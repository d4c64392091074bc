//! Menu Admin Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod error;
mod models;
mod reorder;
mod store;
mod sync;
mod tree;

use app::App;
use config::AppConfig;
use leptos::prelude::*;
use rolling_logger::LogBuffer;

fn main() {
    console_error_panic_hook::set_once();

    // Logger first, so configuration warnings are captured
    let default_capacity = AppConfig::default().log_capacity;
    let logs = rolling_logger::init_logger("MenuAdmin", default_capacity)
        .unwrap_or_else(|_| LogBuffer::new(default_capacity));
    let config = AppConfig::load();
    logs.resize(config.log_capacity);

    mount_to_body(move || view! { <App config=config logs=logs /> });
}
