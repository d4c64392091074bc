//! Application Context
//!
//! Shared state provided via Leptos Context API. Every remote operation goes
//! through here: it runs the sync controller on the UI task and publishes
//! the result to the store.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use rolling_logger::LogBuffer;

use crate::commands::HttpMenuApi;
use crate::models::MenuId;
use crate::reorder::DropTarget;
use crate::store::{store_publish, AppStore};
use crate::sync::SyncController;

pub type MenuController = SyncController<HttpMenuApi>;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload the menu from the backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload the menu from the backend - write
    set_reload_trigger: WriteSignal<u32>,
    /// Which item to add a child under (None = top level) - read
    pub adding_under: ReadSignal<Option<MenuId>>,
    /// Which item to add a child under (None = top level) - write
    set_adding_under: WriteSignal<Option<MenuId>>,
    /// Item whose edit form is open - read
    pub editing: ReadSignal<Option<MenuId>>,
    /// Item whose edit form is open - write
    set_editing: WriteSignal<Option<MenuId>>,
    controller: StoredValue<Rc<MenuController>, LocalStorage>,
    logs: StoredValue<LogBuffer>,
    store: AppStore,
    pub notice_timeout_ms: u32,
}

impl AppContext {
    pub fn new(
        reload_trigger: (ReadSignal<u32>, WriteSignal<u32>),
        adding_under: (ReadSignal<Option<MenuId>>, WriteSignal<Option<MenuId>>),
        editing: (ReadSignal<Option<MenuId>>, WriteSignal<Option<MenuId>>),
        controller: MenuController,
        logs: LogBuffer,
        store: AppStore,
        notice_timeout_ms: u32,
    ) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            adding_under: adding_under.0,
            set_adding_under: adding_under.1,
            editing: editing.0,
            set_editing: editing.1,
            controller: StoredValue::new_local(Rc::new(controller)),
            logs: StoredValue::new(logs),
            store,
            notice_timeout_ms,
        }
    }

    /// Trigger a reload of the menu
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    /// Set parent for new child item
    pub fn set_adding_under(&self, parent_id: Option<MenuId>) {
        self.set_adding_under.set(parent_id);
    }

    /// Open (or close, with None) the inline edit form
    pub fn set_editing(&self, id: Option<MenuId>) {
        self.set_editing.set(id);
    }

    fn controller(&self) -> Rc<MenuController> {
        self.controller.get_value()
    }

    /// Push the controller's state to the view
    pub fn publish(&self) {
        self.controller.with_value(|controller| store_publish(&self.store, controller));
    }

    /// Fetch the menu and replace whatever is shown
    pub fn refresh(&self) {
        let ctx = *self;
        spawn_local(async move {
            let _ = ctx.controller().refresh().await;
            ctx.publish();
        });
    }

    /// Apply a drop right away, then persist it
    pub fn reorder(&self, source: MenuId, target: DropTarget) {
        let controller = self.controller();
        let start = controller.begin_move(&source, &target);
        self.publish();

        let ctx = *self;
        spawn_local(async move {
            let _ = controller.finish_move(start).await;
            ctx.publish();
        });
    }

    pub fn add_item<F>(&self, text: String, url: String, parent_id: Option<MenuId>, on_success: F)
    where
        F: FnOnce() + 'static,
    {
        let ctx = *self;
        spawn_local(async move {
            let result = ctx.controller().add_item(&text, Some(&url), parent_id).await;
            ctx.publish();
            if result.is_ok() {
                on_success();
            }
        });
    }

    pub fn edit_item<F>(&self, id: MenuId, text: String, url: String, on_success: F)
    where
        F: FnOnce() + 'static,
    {
        let ctx = *self;
        spawn_local(async move {
            let result = ctx.controller().edit_item(&id, &text, Some(&url)).await;
            ctx.publish();
            if result.is_ok() {
                on_success();
            }
        });
    }

    /// Delete an item and its sub-items
    pub fn delete_item(&self, id: MenuId) {
        let ctx = *self;
        spawn_local(async move {
            let _ = ctx.controller().delete_item(&id).await;
            ctx.publish();
        });
    }

    pub fn dismiss(&self, notice_id: u64) {
        self.controller.with_value(|controller| controller.dismiss(notice_id));
        self.publish();
    }

    /// Recent log lines, oldest first
    pub fn log_lines(&self) -> Vec<String> {
        self.logs.with_value(|logs| logs.snapshot().iter().map(ToString::to_string).collect())
    }
}
