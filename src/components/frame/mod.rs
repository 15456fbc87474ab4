//! Page frame: header, navigation menu and logout.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::router::RouteContext;
use crate::config::APP_NAME;
use crate::models::AppRoute;

stylance::import_crate_style!(css, "src/components/frame/frame.module.css");

#[component]
pub fn Frame(children: Children) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let route_ctx = use_context::<RouteContext>().expect("RouteContext must be provided");

    let section = Signal::derive(move || route_ctx.0.get().section());
    let username = Signal::derive(move || ctx.user.get().unwrap_or_default());

    let on_logout = move |_: leptos::ev::MouseEvent| {
        ctx.logout();
        AppRoute::Login.push();
    };

    view! {
        <div class=css::frame>
            <header class=css::header>
                <span class=css::brand>
                    <Icon icon=ic::SERVER />
                    <span>{APP_NAME}</span>
                </span>
                <nav class=css::menu>
                    <MenuLink
                        route=AppRoute::Dashboard
                        icon=ic::DASHBOARD
                        label="Dashboard"
                        active=Signal::derive(move || section.get() == Some("dashboard"))
                    />
                    <MenuLink
                        route=AppRoute::Users
                        icon=ic::USERS
                        label="Users"
                        active=Signal::derive(move || section.get() == Some("users"))
                    />
                </nav>
                <span class=css::account>
                    <Icon icon=ic::USER />
                    <span class=css::username>{username}</span>
                    <button class=css::logout on:click=on_logout title="Log out">
                        <Icon icon=ic::LOGOUT />
                    </button>
                </span>
            </header>
            <main class=css::content>{children()}</main>
        </div>
    }
}

#[component]
fn MenuLink(
    route: AppRoute,
    icon: icondata::Icon,
    label: &'static str,
    active: Signal<bool>,
) -> impl IntoView {
    let class = move || {
        if active.get() {
            format!("{} {}", css::menuItem, css::menuItemActive)
        } else {
            css::menuItem.to_string()
        }
    };

    view! {
        <a class=class href=route.to_hash()>
            <Icon icon=icon />
            <span>{label}</span>
        </a>
    }
}
