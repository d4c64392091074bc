//! Menu Admin App
//!
//! Root component: wires the controller, store and context, and loads the
//! menu on mount and on every reload.

use leptos::prelude::*;
use reactive_stores::Store;
use rolling_logger::LogBuffer;
use tracing::info;

use crate::commands::HttpMenuApi;
use crate::components::{ActivityLog, MenuItemForm, MenuTreeView, NoticeBar};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::models::MenuId;
use crate::store::{store_rows, MenuViewState};
use crate::sync::SyncController;

#[component]
pub fn App(config: AppConfig, logs: LogBuffer) -> impl IntoView {
    // State
    let reload_trigger = signal(0u32);
    let adding_under = signal::<Option<MenuId>>(None);
    let editing = signal::<Option<MenuId>>(None);
    let store = Store::new(MenuViewState::default());

    info!("[APP] using menu API at {}", config.api_base_url);
    let controller = SyncController::new(HttpMenuApi::new(&config));

    let ctx = AppContext::new(
        reload_trigger,
        adding_under,
        editing,
        controller,
        logs,
        store,
        config.notice_timeout_ms,
    );
    provide_context(ctx);
    provide_context(store);

    // Load on mount and whenever a reload is requested
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        info!("[APP] loading menu, trigger={}", trigger);
        ctx.refresh();
    });

    let item_count = move || store_rows(&store).len();

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"Menu"</h1>
                <span class="item-count">{move || format!("{} items", item_count())}</span>
                <button class="reload-btn" title="Reload from server" on:click=move |_| ctx.reload()>
                    "Reload"
                </button>
            </header>

            <NoticeBar />

            <main class="main-content">
                <MenuItemForm />
                <MenuTreeView />
            </main>

            <ActivityLog />
        </div>
    }
}
