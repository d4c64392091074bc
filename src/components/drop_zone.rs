//! Drop Zone Component
//!
//! A horizontal line between rows that accepts the dragged item.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mouseleave, make_on_zone_mouseenter};

use crate::components::MenuDnd;
use crate::reorder::DropTarget;

/// Drop zone shown while dragging; hidden otherwise
#[component]
pub fn DropZone(
    dnd: MenuDnd,
    target: DropTarget,
    /// Text shown inside the zone while dragging
    #[prop(optional, into)]
    label: Option<String>,
) -> impl IntoView {
    let on_mouseenter = make_on_zone_mouseenter(dnd, target.clone());
    let on_mouseleave = make_on_mouseleave(dnd);

    let zone_class = move || {
        let mut c = String::from("drop-zone");
        if !dnd.drag_active() { c.push_str(" hidden"); }
        if dnd.is_target(&target) { c.push_str(" active"); }
        c
    };

    view! {
        <div
            class=zone_class
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        >
            {label.map(|text| view! { <span class="drop-zone-label">{text}</span> })}
        </div>
    }
}
