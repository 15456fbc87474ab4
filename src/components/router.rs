//! Application router component.
//!
//! Uses native hashchange events instead of leptos_router for hash routing.
//!
//! # Architecture
//!
//! - **URL hash is the source of truth**: the current screen is derived from `#/...`
//! - **Session guard**: every route but `#/login` requires a session; the
//!   login screen redirects to the dashboard once logged in
//! - **hashchange events**: browser back/forward buttons work automatically

use leptos::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::Closure;

use crate::app::AppContext;
use crate::components::dashboard::Dashboard;
use crate::components::files::FileBrowserPage;
use crate::components::frame::Frame;
use crate::components::login::Login;
use crate::components::users::{UserEdit, UserList};
use crate::models::AppRoute;

/// Current route, provided to every screen.
#[derive(Clone, Copy)]
pub struct RouteContext(pub Memo<AppRoute>);

/// Main application router.
#[component]
pub fn AppRouter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let route = RwSignal::new(AppRoute::current());

    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        let closure = Closure::wrap(Box::new(move || {
            route.set(AppRoute::current());
        }) as Box<dyn Fn()>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }

        // Keep the closure alive for the lifetime of the app
        closure.forget();
    }

    // Session guard
    Effect::new(move |_| {
        let current = route.get();
        let logged_in = ctx.is_logged_in();
        if !logged_in && !current.is_public() {
            log::debug!("no session, redirecting {} to login", current.to_hash());
            AppRoute::Login.replace();
        } else if logged_in && current.is_public() {
            AppRoute::Dashboard.replace();
        }
    });

    let route_memo = Memo::new(move |_| route.get());
    provide_context(RouteContext(route_memo));

    view! {
        {move || match route_memo.get() {
            AppRoute::Login => view! { <Login /> }.into_any(),
            other => view! { <Frame>{screen(other)}</Frame> }.into_any(),
        }}
    }
}

fn screen(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <Dashboard /> }.into_any(),
        AppRoute::Users => view! { <UserList /> }.into_any(),
        AppRoute::UserEdit { username } => view! { <UserEdit username=username /> }.into_any(),
        AppRoute::Files {
            username,
            namespace,
        } => view! { <FileBrowserPage username=username namespace=namespace /> }.into_any(),
        AppRoute::Login | AppRoute::NotFound => view! {
            <div style="padding: 48px; text-align: center; color: #8c8c8c;">
                <h2>"404"</h2>
                <p>"Nothing lives at this address."</p>
                <a href=AppRoute::Dashboard.to_hash()>"Back to dashboard"</a>
            </div>
        }
        .into_any(),
    }
}
