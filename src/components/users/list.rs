//! User table with edit, delete and trash shortcuts.

use dfs_console_core::{Namespace, Notice, User};
use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::modal::Modal;
use crate::models::AppRoute;
use crate::utils;

stylance::import_crate_style!(shared, "src/components/shared.module.css");

#[component]
pub fn UserList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let users = RwSignal::new(Vec::<User>::new());
    let loading = RwSignal::new(false);
    let pending_delete = RwSignal::new(None::<String>);
    let deleting = RwSignal::new(false);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match utils::client().list_users().await {
                Ok(list) => users.set(list),
                Err(e) => ctx.report("user list", e),
            }
            loading.set(false);
        });
    };
    load();

    let confirm_delete = Callback::new(move |_: ()| {
        let Some(username) = pending_delete.get_untracked() else {
            return;
        };
        deleting.set(true);
        spawn_local(async move {
            match utils::client().delete_user(&username).await {
                Ok(()) => {
                    log::info!("deleted user {}", username);
                    ctx.notify(Notice::success(format!("User {} deleted", username)));
                    pending_delete.set(None);
                    load();
                }
                Err(e) => ctx.report("delete user", e),
            }
            deleting.set(false);
        });
    });

    let add_href = AppRoute::UserEdit { username: None }.to_hash();
    let add_class = format!("{} {}", shared::button, shared::primary);

    view! {
        <section class=shared::card>
            <h2 class=shared::cardTitle>
                <span>"Users"</span>
                <a class=add_class href=add_href>
                    <Icon icon=ic::PLUS />
                    "Add user"
                </a>
            </h2>
            <table class=shared::table>
                <thead>
                    <tr>
                        <th>"Username"</th>
                        <th>"Secret"</th>
                        <th>"Files"</th>
                        <th>"Storage"</th>
                        <th>"DataNode quota"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || users.get()
                        key=|u| u.username.clone()
                        children=move |user| view! { <UserRow user=user pending_delete=pending_delete /> }
                    />
                </tbody>
            </table>
            <Show when=move || users.with(Vec::is_empty) && !loading.get()>
                <div class=shared::empty>"No users"</div>
            </Show>
        </section>

        <Modal
            title="Delete user".to_string()
            open=Signal::derive(move || pending_delete.with(Option::is_some))
            busy=deleting
            ok_label="Delete".to_string()
            on_ok=confirm_delete
            on_cancel=Callback::new(move |_| pending_delete.set(None))
        >
            <p>
                "Delete user "
                <strong>{move || pending_delete.get().unwrap_or_default()}</strong>
                "? This cannot be undone."
            </p>
        </Modal>
    }
}

#[component]
fn UserRow(user: User, pending_delete: RwSignal<Option<String>>) -> impl IntoView {
    let files = AppRoute::files(user.username.clone(), Namespace::Normal).to_hash();
    let trash = AppRoute::files(user.username.clone(), Namespace::Trash).to_hash();
    let edit = AppRoute::UserEdit {
        username: Some(user.username.clone()),
    }
    .to_hash();
    let storage = user.display_storage_size();
    let name_for_delete = user.username.clone();
    let quota = user.storage_info.data_nodes.clone();

    view! {
        <tr>
            <td><a class=shared::link href=files>{user.username}</a></td>
            <td><span class=shared::muted>{user.secret}</span></td>
            <td>{user.storage_info.file_count}</td>
            <td>{storage}</td>
            <td>
                {if quota.is_empty() {
                    view! { <span class=shared::muted>"No quota"</span> }.into_any()
                } else {
                    quota
                        .into_iter()
                        .map(|host| view! { <span class=shared::tag>{host}</span> })
                        .collect_view()
                        .into_any()
                }}
            </td>
            <td>
                <a class=shared::link href=edit>
                    <Icon icon=ic::EDIT />
                    "Edit"
                </a>
                <button
                    class=format!("{} {}", shared::link, shared::linkDanger)
                    on:click=move |_| pending_delete.set(Some(name_for_delete.clone()))
                >
                    <Icon icon=ic::TRASH />
                    "Delete"
                </button>
                <a class=shared::link href=trash>
                    <Icon icon=ic::RESTORE />
                    "Trash"
                </a>
            </td>
        </tr>
    }
}
