//! Reactive View State
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The sync
//! controller owns the menu; this store holds what the view last rendered.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::commands::MenuApi;
use crate::models::MenuId;
use crate::sync::{Notice, SyncController};
use crate::tree::MenuRow;

#[derive(Clone, Debug, Default, Store)]
pub struct MenuViewState {
    /// Menu rows in display order
    pub rows: Vec<MenuRow>,
    /// Messages waiting to be dismissed
    pub notices: Vec<Notice>,
    /// False until the first successful fetch
    pub loaded: bool,
}

/// Type alias for the store
pub type AppStore = Store<MenuViewState>;

/// Get the store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Copy the controller's current state into the store
pub fn store_publish<A: MenuApi>(store: &AppStore, controller: &SyncController<A>) {
    store.rows().set(controller.rows());
    store.notices().set(controller.notices());
    store.loaded().set(controller.is_loaded());
}

pub fn store_rows(store: &AppStore) -> Vec<MenuRow> {
    store.rows().get()
}

pub fn store_notices(store: &AppStore) -> Vec<Notice> {
    store.notices().get()
}

pub fn store_loaded(store: &AppStore) -> bool {
    store.loaded().get()
}

/// Label of a row by id, for prompts
pub fn store_label(store: &AppStore, id: &MenuId) -> Option<String> {
    store.rows().with(|rows| rows.iter().find(|row| row.id == *id).map(|row| row.text.clone()))
}
