//! Menu Item Row Component
//!
//! One item of the flattened tree: drag handle, label, link and actions.
//! Hovering a row while dragging makes it the new parent.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_item_mouseenter, make_on_mouseleave, make_on_mousedown};

use crate::components::{DeleteConfirmButton, EditItemForm, MenuDnd};
use crate::context::AppContext;
use crate::reorder::DropTarget;
use crate::tree::MenuRow;

/// Pixels of indentation per tree level
const INDENT_PX: usize = 24;

#[component]
pub fn MenuItemRow(row: MenuRow, dnd: MenuDnd) -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let MenuRow { id, text, url, depth, order, has_children, .. } = row;
    let url = url.unwrap_or_default();

    let on_mousedown = make_on_mousedown(dnd, id.clone());
    let on_mouseenter = make_on_item_mouseenter(dnd, id.clone(), DropTarget::MakeChildOf(id.clone()));
    let on_mouseleave = make_on_mouseleave(dnd);

    let child_target = DropTarget::MakeChildOf(id.clone());
    let row_class = {
        let id = id.clone();
        move || {
            let mut c = String::from("menu-row");
            if dnd.is_dragging(&id) { c.push_str(" dragging"); }
            if dnd.is_target(&child_target) { c.push_str(" drop-target"); }
            c
        }
    };

    let is_editing = {
        let id = id.clone();
        move || ctx.editing.with(|editing| editing.as_ref() == Some(&id))
    };

    let start_edit = {
        let id = id.clone();
        move |_: web_sys::MouseEvent| {
            // The click that ends a drag is not an edit
            if !dnd.drag_just_ended_read.get_untracked() {
                ctx.set_editing(Some(id.clone()));
            }
        }
    };

    let add_child = {
        let id = id.clone();
        move |_: web_sys::MouseEvent| ctx.set_adding_under(Some(id.clone()))
    };

    let move_to_top = {
        let id = id.clone();
        move |_: web_sys::MouseEvent| ctx.reorder(id.clone(), DropTarget::TopLevelAppend)
    };

    let prompt = if has_children { "Delete with sub-items?" } else { "Delete?" };
    let on_delete = {
        let id = id.clone();
        Callback::new(move |_: ()| ctx.delete_item(id.clone()))
    };

    let edit_id = id.clone();
    let edit_text = text.clone();
    let edit_url = url.clone();

    view! {
        <div
            class=row_class
            style=format!("margin-left: {}px;", depth * INDENT_PX)
            on:mousedown=on_mousedown
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        >
            <Show
                when=is_editing
                fallback=move || {
                    let text = text.clone();
                    let url = url.clone();
                    view! {
                        <span class="drag-handle" title="Drag to move">"⠿"</span>
                        <span class="menu-order">{order}</span>
                        <span class="menu-text" on:click=start_edit.clone()>{text}</span>
                        {(!url.is_empty()).then(|| view! {
                            <a class="menu-url" href=url.clone() target="_blank">{url.clone()}</a>
                        })}
                    }
                }
            >
                <EditItemForm id=edit_id.clone() text=edit_text.clone() url=edit_url.clone() />
            </Show>

            <span class="menu-actions">
                <button class="add-child-btn" title="Add sub-item" on:click=add_child.clone()>"+"</button>
                {(depth > 0).then(|| view! {
                    <button class="top-level-btn" title="Move to top level" on:click=move_to_top.clone()>
                        "⇤"
                    </button>
                })}
                <DeleteConfirmButton prompt=prompt on_confirm=on_delete />
            </span>
        </div>
    }
}
