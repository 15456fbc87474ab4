//! File browser screen.
//!
//! The [`FileBrowser`] state machine lives in a signal. [`FilesController`]
//! takes the tickets it hands out, runs the matching REST call on
//! `spawn_local`, and feeds the result back through the `apply_*` methods.

mod dialogs;
mod file_table;
mod pathbar;

use dfs_console_core::browser::driver;
use dfs_console_core::{FileBrowser, ListingRequest, Namespace, Notice};
use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::client_config;
use crate::models::AppRoute;
use crate::utils::{self, dom};

use dialogs::{BatchConfirm, ReplicaEditor};
use file_table::FileTable;
use pathbar::PathBar;

stylance::import_crate_style!(shared, "src/components/shared.module.css");
stylance::import_crate_style!(css, "src/components/files/files.module.css");

// =============================================================================
// Controller
// =============================================================================

/// Drives the browser signal. `Copy`, so every handler can own one.
#[derive(Clone, Copy)]
pub struct FilesController {
    pub browser: RwSignal<FileBrowser>,
    ctx: AppContext,
}

impl FilesController {
    fn new(username: String, namespace: Namespace, ctx: AppContext) -> Self {
        Self {
            browser: RwSignal::new(FileBrowser::new(username, namespace)),
            ctx,
        }
    }

    fn load(self, request: ListingRequest) {
        spawn_local(async move {
            let result = driver::fetch_listing(&utils::client(), &request).await;
            let notice = self
                .browser
                .try_update(|b| b.apply_listing(&request, result))
                .flatten();
            self.ctx.notify_opt(notice);
        });
    }

    pub fn navigate(self, target: &str) {
        if let Some(request) = self.browser.try_update(|b| b.navigate(target)) {
            self.load(request);
        }
    }

    pub fn refresh(self) {
        if let Some(request) = self.browser.try_update(|b| b.refresh()) {
            self.load(request);
        }
    }

    pub fn open(self, name: &str) {
        if let Some(request) = self.browser.try_update(|b| b.open(name)).flatten() {
            self.load(request);
        }
    }

    pub fn open_crumb(self, index: usize) {
        if let Some(request) = self.browser.try_update(|b| b.open_crumb(index)).flatten() {
            self.load(request);
        }
    }

    pub fn toggle(self, name: &str, checked: bool) {
        self.browser.update(|b| b.toggle(name, checked));
    }

    pub fn select_all(self, checked: bool) {
        self.browser.update(|b| b.select_all(checked));
    }

    pub fn request_batch(self) {
        if let Some(Err(notice)) = self.browser.try_update(|b| b.request_batch_action()) {
            self.ctx.notify(notice);
        }
    }

    pub fn request_delete(self, name: &str) {
        self.browser.update(|b| {
            b.request_single_delete(name);
        });
    }

    pub fn cancel_batch(self) {
        self.browser.update(|b| b.cancel_batch());
    }

    pub fn confirm_batch(self) {
        let Some(request) = self.browser.try_update(|b| b.confirm_batch()).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = driver::execute_batch(&utils::client(), &request).await;
            let Some(outcome) = self.browser.try_update(|b| b.apply_batch(&request, result)) else {
                return;
            };
            self.ctx.notify_opt(outcome.notice);
            if let Some(refresh) = outcome.refresh {
                self.load(refresh);
            }
        });
    }

    pub fn request_replica_edit(self, name: &str) {
        self.browser.update(|b| {
            b.request_replica_edit(name);
        });
    }

    pub fn set_replica_value(self, value: u8) {
        self.browser.update(|b| b.set_replica_value(value));
    }

    pub fn cancel_replica_edit(self) {
        self.browser.update(|b| b.cancel_replica_edit());
    }

    pub fn confirm_replica(self) {
        let Some(request) = self.browser.try_update(|b| b.confirm_replica()).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = driver::execute_replica_change(&utils::client(), &request).await;
            let notice = self
                .browser
                .try_with_untracked(|b| b.apply_replica(&request, result))
                .flatten();
            self.ctx.notify_opt(notice);
        });
    }

    pub fn locate(self, name: &str) {
        let Some(request) = self
            .browser
            .try_update(|b| b.request_storage_locations(name))
            .flatten()
        else {
            return;
        };
        spawn_local(async move {
            let result = driver::fetch_storage_locations(&utils::client(), &request).await;
            let notice = self
                .browser
                .try_update(|b| b.apply_storage_locations(&request, result))
                .flatten();
            self.ctx.notify_opt(notice);
        });
    }

    /// Copy `path` to the clipboard and confirm with a notice.
    pub fn copy_path(self, path: String) {
        spawn_local(async move {
            match dom::copy_to_clipboard(&path).await {
                Ok(()) => self.ctx.notify(Notice::success(format!("Copied {}", path))),
                Err(e) => log::warn!("clipboard write failed: {}", e),
            }
        });
    }

    pub fn copy_entry_path(self, name: &str) {
        let path = self.browser.with_untracked(|b| b.entry_path(name));
        self.copy_path(path);
    }

    pub fn download(self, name: &str) {
        let url = self.browser.with_untracked(|b| {
            client_config().download_url(b.username(), b.current_path(), name)
        });
        log::debug!("download {}", url);
        dom::open_in_new_tab(&url);
    }
}

// =============================================================================
// Page
// =============================================================================

/// File browser for `username` in `namespace`.
///
/// A new route mounts a new page, so the namespace never changes under a
/// live browser.
#[component]
pub fn FileBrowserPage(username: String, namespace: Namespace) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let controller = FilesController::new(username.clone(), namespace, ctx);
    provide_context(controller);
    controller.refresh();

    let browser = controller.browser;
    let is_trash = namespace.is_trash();
    let title = if is_trash {
        format!("Trash of {}", username)
    } else {
        format!("Files of {}", username)
    };
    let other_view = AppRoute::files(
        username,
        if is_trash { Namespace::Normal } else { Namespace::Trash },
    )
    .to_hash();
    let other_label = if is_trash { "Back to files" } else { "View trash" };
    let (title_icon, batch_icon) = if is_trash {
        (ic::TRASH, ic::RESTORE)
    } else {
        (ic::FOLDER, ic::TRASH)
    };
    let batch_class = format!(
        "{} {}",
        shared::button,
        if is_trash { shared::primary } else { shared::danger }
    );
    let batch_label = Signal::derive(move || browser.with(|b| b.batch_kind().label()));
    let selected = Signal::derive(move || browser.with(|b| b.selection().len()));

    view! {
        <section class=shared::card>
            <h2 class=shared::cardTitle>
                <span class=css::title>
                    <Icon icon=title_icon />
                    {title}
                </span>
                <span class=css::toolbar>
                    <a class=shared::button href=other_view>
                        {other_label}
                    </a>
                    <button class=shared::button on:click=move |_| controller.refresh()>
                        <Icon icon=ic::REFRESH />
                        "Refresh"
                    </button>
                    <button
                        class=batch_class
                        on:click=move |_| controller.request_batch()
                    >
                        <Icon icon=batch_icon />
                        {move || match selected.get() {
                            0 => format!("{} selected", batch_label.get()),
                            n => format!("{} selected ({})", batch_label.get(), n),
                        }}
                    </button>
                </span>
            </h2>
            <PathBar />
            <FileTable />
        </section>
        <BatchConfirm />
        <ReplicaEditor />
    }
}
