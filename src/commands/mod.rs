//! Menu API Bindings
//!
//! The remote menu authority, behind a trait so the sync controller can be
//! driven by an in-memory fake in tests.

mod menu;

use async_trait::async_trait;

use crate::error::MenuResult;
use crate::models::{CreateMenuItem, EditMenuItem, MenuId, MenuItem, MoveMenuItem};

pub use menu::HttpMenuApi;

/// Remote menu authority.
///
/// Not `Send`: browser fetch futures live on the single UI thread.
#[async_trait(?Send)]
pub trait MenuApi {
    /// `GET /menu`
    async fn fetch_menu(&self) -> MenuResult<Vec<MenuItem>>;

    /// `POST /menu`
    async fn create_item(&self, item: &CreateMenuItem) -> MenuResult<()>;

    /// `PUT /menu/{id}` with label and link
    async fn update_item(&self, id: &MenuId, edit: &EditMenuItem) -> MenuResult<()>;

    /// `PUT /menu/{id}` with the new position
    async fn move_item(&self, id: &MenuId, body: &MoveMenuItem) -> MenuResult<()>;

    /// `DELETE /menu/{id}`, sub-items included
    async fn delete_item(&self, id: &MenuId) -> MenuResult<()>;
}
