//! Transient notice toasts.
//!
//! Notices are pushed through [`AppContext::notify`] and removed by a timer;
//! clicking one dismisses it early.

use dfs_console_core::NoticeLevel;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/notice/notice.module.css");

#[component]
pub fn NoticeStack() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <div class=css::stack role="status" aria-live="polite">
            <For
                each=move || ctx.notices.get()
                key=|shown| shown.id
                children=move |shown| {
                    let id = shown.id;
                    let (icon, level_class) = match shown.notice.level {
                        NoticeLevel::Info => (ic::INFO, css::info),
                        NoticeLevel::Success => (ic::SUCCESS, css::success),
                        NoticeLevel::Error => (ic::ERROR, css::error),
                    };
                    view! {
                        <div
                            class=format!("{} {}", css::notice, level_class)
                            on:click=move |_| ctx.dismiss(id)
                        >
                            <span class=css::icon><Icon icon=icon /></span>
                            <span class=css::message>{shown.notice.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
