//! Breadcrumb bar with a copy-path action.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::FilesController;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/files/files.module.css");
stylance::import_crate_style!(shared, "src/components/shared.module.css");

#[component]
pub fn PathBar() -> impl IntoView {
    let controller = use_context::<FilesController>().expect("FilesController must be provided");
    let browser = controller.browser;

    let crumbs = Memo::new(move |_| browser.with(|b| b.breadcrumbs()));
    let at_root = Memo::new(move |_| crumbs.with(Vec::is_empty));

    let home_class = move || {
        if at_root.get() {
            format!("{} {}", css::crumb, css::crumbCurrent)
        } else {
            css::crumb.to_string()
        }
    };

    view! {
        <nav class=css::pathbar>
            <button
                class=home_class
                disabled=move || at_root.get()
                on:click=move |_| controller.navigate("/")
            >
                <Icon icon=ic::HOME />
                <span>"Home"</span>
            </button>
            {move || {
                let crumbs = crumbs.get();
                let last = crumbs.len().saturating_sub(1);
                crumbs
                    .into_iter()
                    .enumerate()
                    .map(|(idx, crumb)| {
                        let is_current = idx == last;
                        let class = if is_current {
                            format!("{} {}", css::crumb, css::crumbCurrent)
                        } else {
                            css::crumb.to_string()
                        };
                        view! {
                            <span class=css::separator><Icon icon=ic::CHEVRON_RIGHT /></span>
                            <button
                                class=class
                                title=crumb.target
                                disabled=is_current
                                on:click=move |_| controller.open_crumb(idx)
                            >
                                <Icon icon=ic::FOLDER />
                                <span>{crumb.label}</span>
                            </button>
                        }
                    })
                    .collect_view()
            }}
            <span class=css::spacer></span>
            <Show when=move || browser.with(|b| b.is_loading())>
                <span class=shared::muted>"Loading..."</span>
            </Show>
            <button
                class=shared::link
                title="Copy current path"
                on:click=move |_| {
                    let path = browser.with_untracked(|b| b.current_path().to_string());
                    controller.copy_path(path);
                }
            >
                <Icon icon=ic::COPY />
                "Copy path"
            </button>
        </nav>
    }
}
