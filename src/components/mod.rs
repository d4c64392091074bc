//! UI Components
//!
//! Leptos components for the menu editor.

mod activity_log;
mod delete_confirm_button;
mod drop_zone;
mod edit_item_form;
mod menu_item_form;
mod menu_item_row;
mod menu_tree_view;
mod notice_bar;

pub use activity_log::ActivityLog;
pub use delete_confirm_button::DeleteConfirmButton;
pub use drop_zone::DropZone;
pub use edit_item_form::EditItemForm;
pub use menu_item_form::MenuItemForm;
pub use menu_item_row::MenuItemRow;
pub use menu_tree_view::MenuTreeView;
pub use notice_bar::NoticeBar;

use crate::models::MenuId;
use crate::reorder::DropTarget;

/// Drag-and-drop signals for menu rows
pub type MenuDnd = leptos_dragdrop::DndSignals<MenuId, DropTarget>;
