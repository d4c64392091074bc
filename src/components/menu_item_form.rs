//! Menu Item Form Component
//!
//! Creates a top-level item, or a child of the item picked with "+".

use leptos::prelude::*;

use crate::context::AppContext;
use crate::models::validate_label;
use crate::store::{store_label, use_app_store};

#[component]
pub fn MenuItemForm() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    let (text, set_text) = signal(String::new());
    let (url, set_url) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let create_item = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let label = text.get_untracked();
        if let Err(e) = validate_label(&label) {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_error.set(None);
        let parent = ctx.adding_under.get_untracked();
        ctx.add_item(label, url.get_untracked(), parent, move || {
            set_text.set(String::new());
            set_url.set(String::new());
            ctx.set_adding_under(None);
        });
    };

    let parent_label = move || {
        ctx.adding_under
            .get()
            .map(|pid| store_label(&store, &pid).unwrap_or_else(|| format!("#{}", pid)))
    };

    view! {
        <form class="menu-item-form" on:submit=create_item>
            <div class="menu-item-form-row">
                <input
                    type="text"
                    placeholder=move || match parent_label() {
                        Some(label) => format!("Label of new item under {}...", label),
                        None => "Label of new top-level item...".to_string(),
                    }
                    prop:value=move || text.get()
                    on:input=move |ev| {
                        set_text.set(event_target_value(&ev));
                        set_error.set(None);
                    }
                />
                <input
                    type="text"
                    placeholder="URL (optional)"
                    prop:value=move || url.get()
                    on:input=move |ev| set_url.set(event_target_value(&ev))
                />
                <button type="submit">"Add"</button>
            </div>

            {move || error.get().map(|msg| view! { <p class="form-error">{msg}</p> })}

            {move || parent_label().map(|label| view! {
                <button type="button" class="cancel-btn" on:click=move |_| ctx.set_adding_under(None)>
                    "Cancel (under " {label} ")"
                </button>
            })}
        </form>
    }
}
