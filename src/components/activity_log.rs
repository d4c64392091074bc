//! Activity Log Component
//!
//! Collapsible view of the in-memory log buffer.

use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn ActivityLog() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let (open, set_open) = signal(false);
    let (lines, set_lines) = signal(Vec::<String>::new());

    let toggle = move |_: web_sys::MouseEvent| {
        let now_open = !open.get_untracked();
        if now_open {
            set_lines.set(ctx.log_lines());
        }
        set_open.set(now_open);
    };

    view! {
        <section class="activity-log">
            <div class="activity-log-header">
                <button class="activity-log-toggle" on:click=toggle>
                    {move || if open.get() { "Hide activity" } else { "Show activity" }}
                </button>
                <Show when=move || open.get()>
                    <button class="activity-log-refresh" on:click=move |_| set_lines.set(ctx.log_lines())>
                        "Refresh"
                    </button>
                </Show>
            </div>
            <Show when=move || open.get()>
                <pre class="activity-log-lines">
                    {move || lines.get().join("\n")}
                </pre>
            </Show>
        </section>
    }
}
