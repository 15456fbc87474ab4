//! Add or modify a user.

use dfs_console_core::{DataNode, Notice, User};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::models::AppRoute;
use crate::utils;

stylance::import_crate_style!(shared, "src/components/shared.module.css");
stylance::import_crate_style!(css, "src/components/users/users.module.css");

/// Form contents before submission.
#[derive(Clone, Debug, Default, PartialEq)]
struct UserForm {
    username: String,
    secret: String,
    data_nodes: Vec<String>,
}

impl UserForm {
    fn from_user(user: User) -> Self {
        Self {
            username: user.username,
            secret: user.secret,
            data_nodes: user.storage_info.data_nodes,
        }
    }

    /// Both fields are required.
    fn validate(&self) -> Result<User, &'static str> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Username is required");
        }
        if self.secret.is_empty() {
            return Err("Secret is required");
        }
        Ok(User::new(username, self.secret.clone(), self.data_nodes.clone()))
    }

    fn set_quota(&mut self, host: &str, allowed: bool) {
        let present = self.data_nodes.iter().any(|h| h == host);
        if allowed && !present {
            self.data_nodes.push(host.to_string());
        } else if !allowed {
            self.data_nodes.retain(|h| h != host);
        }
    }
}

#[component]
pub fn UserEdit(username: Option<String>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let editing = username.is_some();
    let form = RwSignal::new(UserForm {
        username: username.clone().unwrap_or_default(),
        ..Default::default()
    });
    let hosts = RwSignal::new(Vec::<DataNode>::new());
    let saving = RwSignal::new(false);

    spawn_local(async move {
        let client = utils::client();
        match client.data_nodes().await {
            Ok(nodes) => hosts.set(nodes),
            Err(e) => ctx.report("DataNode list", e),
        }
        if let Some(name) = username {
            match client.get_user(&name).await {
                Ok(Some(user)) => form.set(UserForm::from_user(user)),
                Ok(None) => ctx.notify(Notice::error(format!("User {} not found", name))),
                Err(e) => ctx.report("load user", e),
            }
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let user = match form.with_untracked(UserForm::validate) {
            Ok(user) => user,
            Err(msg) => {
                ctx.notify(Notice::info(msg));
                return;
            }
        };

        saving.set(true);
        spawn_local(async move {
            let client = utils::client();
            let result = if editing {
                client.modify_user(&user).await
            } else {
                client.add_user(&user).await
            };
            match result {
                Ok(()) => {
                    let verb = if editing { "updated" } else { "created" };
                    log::info!("user {} {}", user.username, verb);
                    ctx.notify(Notice::success(format!("User {} {}", user.username, verb)));
                    AppRoute::Users.push();
                }
                Err(e) => ctx.report("save user", e),
            }
            saving.set(false);
        });
    };

    view! {
        <section class=shared::card>
            <h2 class=shared::cardTitle>
                {if editing { "Edit user" } else { "Add user" }}
            </h2>
            <form class=css::form on:submit=on_submit>
                <div class=shared::field>
                    <label for="username">"Username"</label>
                    <input
                        id="username"
                        class=shared::input
                        disabled=editing
                        prop:value=move || form.with(|f| f.username.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.username = value);
                        }
                    />
                </div>
                <div class=shared::field>
                    <label for="secret">"Secret"</label>
                    <input
                        id="secret"
                        class=shared::input
                        prop:value=move || form.with(|f| f.secret.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.secret = value);
                        }
                    />
                </div>
                <div class=shared::field>
                    <label>"DataNode quota"</label>
                    <div class=css::quota>
                        <For
                            each=move || hosts.get()
                            key=|n| n.hostname.clone()
                            children=move |node| {
                                let host = node.hostname.clone();
                                let host_for_check = host.clone();
                                let checked = move || form.with(|f| f.data_nodes.contains(&host_for_check));
                                view! {
                                    <label class=css::quotaItem>
                                        <input
                                            type="checkbox"
                                            prop:checked=checked
                                            on:change=move |ev| {
                                                let allowed = event_target_checked(&ev);
                                                form.update(|f| f.set_quota(&host, allowed));
                                            }
                                        />
                                        <span>{node.hostname}</span>
                                    </label>
                                }
                            }
                        />
                        <Show when=move || hosts.with(Vec::is_empty)>
                            <span class=shared::muted>"No DataNodes available"</span>
                        </Show>
                    </div>
                </div>
                <div class=css::actions>
                    <a class=shared::button href=AppRoute::Users.to_hash()>"Cancel"</a>
                    <button
                        type="submit"
                        class=format!("{} {}", shared::button, shared::primary)
                        disabled=move || saving.get()
                    >
                        "Save"
                    </button>
                </div>
            </form>
        </section>
    }
}
