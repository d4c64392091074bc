//! Edit Item Form Component
//!
//! Inline form replacing a row's label while it is being edited.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::models::MenuId;

#[component]
pub fn EditItemForm(
    id: MenuId,
    #[prop(into)] text: String,
    #[prop(into)] url: String,
) -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let (text, set_text) = signal(text);
    let (url, set_url) = signal(url);

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.edit_item(id.clone(), text.get_untracked(), url.get_untracked(), move || {
            ctx.set_editing(None);
        });
    };

    view! {
        <form
            class="edit-item-form"
            on:submit=save
            on:mousedown=|ev| ev.stop_propagation()
        >
            <input
                type="text"
                placeholder="Label"
                prop:value=move || text.get()
                on:input=move |ev| set_text.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="URL (optional)"
                prop:value=move || url.get()
                on:input=move |ev| set_url.set(event_target_value(&ev))
            />
            <button type="submit">"Save"</button>
            <button type="button" class="cancel-btn" on:click=move |_| ctx.set_editing(None)>
                "Cancel"
            </button>
        </form>
    }
}
