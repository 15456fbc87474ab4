//! Login screen.

use dfs_console_core::Notice;
use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::APP_NAME;
use crate::models::AppRoute;
use crate::utils;

stylance::import_crate_style!(css, "src/components/login/login.module.css");
stylance::import_crate_style!(shared, "src/components/shared.module.css");

#[component]
pub fn Login() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let submit = move || {
        if busy.get_untracked() {
            return;
        }
        let user = username.get_untracked().trim().to_string();
        let pass = password.get_untracked();
        if user.is_empty() || pass.is_empty() {
            ctx.notify(Notice::info("Enter both username and password"));
            return;
        }

        busy.set(true);
        spawn_local(async move {
            match utils::client().login(&user, &pass).await {
                Ok(()) => {
                    log::info!("logged in as {}", user);
                    ctx.logged_in(user);
                    ctx.notify(Notice::success("Login successful"));
                    AppRoute::Dashboard.push();
                }
                Err(e) => ctx.report("login", e),
            }
            busy.set(false);
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        submit();
    };

    view! {
        <div class=css::page>
            <form class=css::card on:submit=on_submit>
                <h1 class=css::title>
                    <Icon icon=ic::SERVER />
                    <span>{APP_NAME}</span>
                </h1>
                <div class=shared::field>
                    <label for="username">"Username"</label>
                    <input
                        id="username"
                        class=shared::input
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                </div>
                <div class=shared::field>
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        class=shared::input
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </div>
                <button
                    type="submit"
                    class=format!("{} {} {}", shared::button, shared::primary, css::submit)
                    disabled=move || busy.get()
                >
                    {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
