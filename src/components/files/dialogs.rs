//! Batch confirmation and replica editor dialogs.

use dfs_console_core::Phase;
use dfs_console_core::browser::{MAX_REPLICAS, MIN_REPLICAS};
use leptos::prelude::*;

use super::FilesController;
use crate::components::modal::Modal;

stylance::import_crate_style!(css, "src/components/files/files.module.css");
stylance::import_crate_style!(shared, "src/components/shared.module.css");

#[component]
pub fn BatchConfirm() -> impl IntoView {
    let controller = use_context::<FilesController>().expect("FilesController must be provided");
    let browser = controller.browser;

    let open = Signal::derive(move || browser.with(|b| matches!(b.phase(), Phase::Confirming(_))));
    let label = Signal::derive(move || {
        browser.with(|b| {
            b.pending()
                .map(|p| p.kind.label())
                .unwrap_or_else(|| b.batch_kind().label())
                .to_string()
        })
    });
    let paths = Signal::derive(move || {
        browser.with(|b| b.pending().map(|p| p.paths.clone()).unwrap_or_default())
    });

    view! {
        <Modal
            title=Signal::derive(move || format!("{} these entries?", label.get()))
            open=open
            ok_label=label
            on_ok=Callback::new(move |_| controller.confirm_batch())
            on_cancel=Callback::new(move |_| controller.cancel_batch())
        >
            <ul class=css::pathList>
                {move || {
                    paths
                        .get()
                        .into_iter()
                        .map(|path| view! { <li>{path}</li> })
                        .collect_view()
                }}
            </ul>
        </Modal>
    }
}

#[component]
pub fn ReplicaEditor() -> impl IntoView {
    let controller = use_context::<FilesController>().expect("FilesController must be provided");
    let browser = controller.browser;

    let open = Signal::derive(move || browser.with(|b| *b.phase() == Phase::EditingReplicaCount));
    let target = move || browser.with(|b| b.replica_edit().map(|e| e.path.clone()).unwrap_or_default());
    let value = move || browser.with(|b| b.replica_edit().map_or(MIN_REPLICAS, |e| e.value));

    view! {
        <Modal
            title="Replica count".to_string()
            open=open
            on_ok=Callback::new(move |_| controller.confirm_replica())
            on_cancel=Callback::new(move |_| controller.cancel_replica_edit())
        >
            <p class=shared::muted>{target}</p>
            <div class=shared::field>
                <label for="replicas">"Replicas"</label>
                <input
                    id="replicas"
                    type="number"
                    class=shared::input
                    min=MIN_REPLICAS.to_string()
                    max=MAX_REPLICAS.to_string()
                    prop:value=move || value().to_string()
                    on:input=move |ev| {
                        if let Ok(n) = event_target_value(&ev).trim().parse::<u8>() {
                            controller.set_replica_value(n);
                        }
                    }
                />
            </div>
            <p class=shared::muted>
                "The listing does not reflect the new count until it is refreshed."
            </p>
        </Modal>
    }
}
