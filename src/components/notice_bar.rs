//! Notice Bar Component
//!
//! Success and error messages from the sync controller. Info notices go
//! away on their own; errors stay until dismissed.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::AppContext;
use crate::store::{store_notices, use_app_store};
use crate::sync::{Notice, NoticeLevel};

#[component]
pub fn NoticeBar() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="notice-bar">
            <For
                each=move || store_notices(&store)
                key=|notice| notice.id
                children=move |notice| view! { <NoticeItem notice=notice /> }
            />
        </div>
    }
}

#[component]
fn NoticeItem(notice: Notice) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let Notice { id, level, message } = notice;

    if level == NoticeLevel::Info && ctx.notice_timeout_ms > 0 {
        let timeout = ctx.notice_timeout_ms;
        spawn_local(async move {
            TimeoutFuture::new(timeout).await;
            ctx.dismiss(id);
        });
    }

    let class = match level {
        NoticeLevel::Info => "notice notice-info",
        NoticeLevel::Error => "notice notice-error",
    };

    view! {
        <div class=class role="status">
            <span class="notice-message">{message}</span>
            <button class="notice-dismiss" title="Dismiss" on:click=move |_| ctx.dismiss(id)>"×"</button>
        </div>
    }
}
