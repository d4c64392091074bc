//! Menu Tree View Component
//!
//! Displays the menu as indented rows with drag-and-drop support.
//! Uses leptos-dragdrop: a zone before each top-level row inserts there,
//! hovering a row nests under it, the trailing zone appends at top level.

use leptos::prelude::*;
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals};
use tracing::debug;

use crate::components::{DropZone, MenuDnd, MenuItemRow};
use crate::context::AppContext;
use crate::reorder::DropTarget;
use crate::store::{store_loaded, store_rows, use_app_store};

#[component]
pub fn MenuTreeView() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    let dnd: MenuDnd = create_dnd_signals();

    bind_global_mouseup(dnd, move |dragged_id, target| {
        debug!("[DND] drop {} on {:?}", dragged_id, target);
        ctx.reorder(dragged_id, target);
    });

    let rows = move || store_rows(&store);

    view! {
        <div class="menu-tree">
            <Show
                when=move || store_loaded(&store)
                fallback=|| view! { <p class="loading">"Loading menu..."</p> }
            >
                <Show
                    when=move || !rows().is_empty()
                    fallback=|| view! { <p class="empty-hint">"The menu is empty."</p> }
                >
                    <For
                        each=rows
                        key=|row| row.clone()
                        children=move |row| {
                            let zone = (row.depth == 0).then(|| view! {
                                <DropZone dnd=dnd target=DropTarget::InsertBeforeSibling(row.id.clone()) />
                            });
                            view! {
                                {zone}
                                <MenuItemRow row=row dnd=dnd />
                            }
                        }
                    />
                </Show>
            </Show>

            <DropZone dnd=dnd target=DropTarget::TopLevelAppend label="Move to end of top level" />
        </div>
    }
}
