//! Directory listing with selection and per-file actions.

use dfs_console_core::{DirEntry, StorageLookup};
use leptos::prelude::*;
use leptos_icons::Icon;

use super::FilesController;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/files/files.module.css");
stylance::import_crate_style!(shared, "src/components/shared.module.css");

#[component]
pub fn FileTable() -> impl IntoView {
    let controller = use_context::<FilesController>().expect("FilesController must be provided");
    let browser = controller.browser;
    let file_actions = browser.with_untracked(|b| b.allows_file_actions());

    // Rows are keyed by listing generation so a refresh rebuilds them.
    let rows = move || {
        browser.with(|b| {
            let generation = b.generation();
            b.entries()
                .iter()
                .cloned()
                .map(|entry| (generation, entry))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <table class=shared::table>
            <thead>
                <tr>
                    <th class=css::checkCell>
                        <input
                            type="checkbox"
                            aria-label="Select all"
                            prop:checked=move || browser.with(|b| b.all_selected())
                            on:change=move |ev| controller.select_all(event_target_checked(&ev))
                        />
                    </th>
                    <th>"Name"</th>
                    <th class=css::sizeCell>"Size"</th>
                    {file_actions.then(|| view! {
                        <th>"Locations"</th>
                        <th>"Actions"</th>
                    })}
                </tr>
            </thead>
            <tbody>
                <For
                    each=rows
                    key=|(generation, entry)| (*generation, entry.name.clone())
                    children=move |(_, entry)| view! { <FileRow entry=entry file_actions=file_actions /> }
                />
            </tbody>
        </table>
        <Show when=move || browser.with(|b| b.entries().is_empty() && !b.is_loading())>
            <div class=shared::empty>"This directory is empty"</div>
        </Show>
    }
}

#[component]
fn FileRow(entry: DirEntry, file_actions: bool) -> impl IntoView {
    let controller = use_context::<FilesController>().expect("FilesController must be provided");
    let browser = controller.browser;

    let name = StoredValue::new(entry.name.clone());
    let is_dir = entry.is_dir();
    let size = entry.display_size();
    let icon = if is_dir { ic::FOLDER } else { ic::FILE };

    let checked = move || browser.with(|b| b.is_selected(&name.read_value()));
    let on_check = move |ev: leptos::ev::Event| {
        controller.toggle(&name.read_value(), event_target_checked(&ev));
    };

    let label = if is_dir {
        view! {
            <button
                class=format!("{} {}", shared::link, css::dirLink)
                on:click=move |_| controller.open(&name.read_value())
            >
                <Icon icon=icon />
                <span>{entry.name}</span>
            </button>
        }
        .into_any()
    } else {
        view! {
            <span class=css::fileName>
                <Icon icon=icon />
                <span>{entry.name}</span>
            </span>
        }
        .into_any()
    };

    view! {
        <tr>
            <td class=css::checkCell>
                <input type="checkbox" prop:checked=checked on:change=on_check />
            </td>
            <td>{label}</td>
            <td class=css::sizeCell>{size}</td>
            {file_actions.then(|| view! {
                <td>{(!is_dir).then(|| view! { <Locations name=name /> })}</td>
                <td class=css::actions>
                    {(!is_dir).then(|| view! {
                        <button class=shared::link title="Download" on:click=move |_| controller.download(&name.read_value())>
                            <Icon icon=ic::DOWNLOAD />
                        </button>
                    })}
                    <button class=shared::link title="Copy path" on:click=move |_| controller.copy_entry_path(&name.read_value())>
                        <Icon icon=ic::COPY />
                    </button>
                    {(!is_dir).then(|| view! {
                        <button class=shared::link title="Replica count" on:click=move |_| controller.request_replica_edit(&name.read_value())>
                            <Icon icon=ic::REPLICAS />
                        </button>
                    })}
                    {(!is_dir).then(|| view! {
                        <button
                            class=format!("{} {}", shared::link, shared::linkDanger)
                            title="Delete"
                            on:click=move |_| controller.request_delete(&name.read_value())
                        >
                            <Icon icon=ic::TRASH />
                        </button>
                    })}
                </td>
            })}
        </tr>
    }
}

/// Replica hosts of one file, fetched on demand.
#[component]
fn Locations(name: StoredValue<String>) -> impl IntoView {
    let controller = use_context::<FilesController>().expect("FilesController must be provided");
    let browser = controller.browser;

    move || {
        browser.with(|b| match b.storage_lookup(&name.read_value()) {
            StorageLookup::Unfetched => view! {
                <button class=shared::link on:click=move |_| controller.locate(&name.read_value())>
                    <Icon icon=ic::LOCATION />
                    "Locate"
                </button>
            }
            .into_any(),
            StorageLookup::Loading => view! { <span class=shared::muted>"Loading..."</span> }.into_any(),
            StorageLookup::Fetched([]) => view! { <span class=shared::muted>"No replicas"</span> }.into_any(),
            StorageLookup::Fetched(hosts) => hosts
                .iter()
                .map(|host| view! { <span class=shared::tag>{host.clone()}</span> })
                .collect_view()
                .into_any(),
        })
    }
}
