//! Cluster overview: NameNode and DataNode tables.

use dfs_console_core::{DataNode, NameNode};
use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::utils;

stylance::import_crate_style!(shared, "src/components/shared.module.css");
stylance::import_crate_style!(css, "src/components/dashboard/dashboard.module.css");

#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let name_nodes = RwSignal::new(Vec::<NameNode>::new());
    let data_nodes = RwSignal::new(Vec::<DataNode>::new());
    let loading = RwSignal::new(false);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            let client = utils::client();
            match client.name_nodes().await {
                Ok(nodes) => name_nodes.set(nodes),
                Err(e) => ctx.report("NameNode list", e),
            }
            match client.data_nodes().await {
                Ok(nodes) => data_nodes.set(nodes),
                Err(e) => ctx.report("DataNode list", e),
            }
            loading.set(false);
        });
    };
    load();

    view! {
        <section class=shared::card>
            <h2 class=shared::cardTitle>
                <span>"NameNodes"</span>
                <button class=shared::button disabled=move || loading.get() on:click=move |_| load()>
                    <Icon icon=ic::REFRESH />
                    "Refresh"
                </button>
            </h2>
            <table class=shared::table>
                <thead>
                    <tr>
                        <th>"Node ID"</th>
                        <th>"Hostname"</th>
                        <th>"HTTP port"</th>
                        <th>"NIO port"</th>
                        <th>"Backup node"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || name_nodes.get()
                        key=|n| (n.node_id, n.hostname.clone())
                        children=|n| view! {
                            <tr>
                                <td>{or_dash(n.node_id)}</td>
                                <td>{n.hostname}</td>
                                <td>{or_dash(n.http_port)}</td>
                                <td>{or_dash(n.nio_port)}</td>
                                <td>{or_dash(n.backup_node_info)}</td>
                            </tr>
                        }
                    />
                </tbody>
            </table>
            <Show when=move || name_nodes.with(Vec::is_empty) && !loading.get()>
                <div class=shared::empty>"No NameNodes reported"</div>
            </Show>
        </section>

        <section class=shared::card>
            <h2 class=shared::cardTitle>"DataNodes"</h2>
            <table class=shared::table>
                <thead>
                    <tr>
                        <th>"Node ID"</th>
                        <th>"Hostname"</th>
                        <th>"Status"</th>
                        <th>"Storage"</th>
                        <th>"Last heartbeat"</th>
                        <th>"HTTP port"</th>
                        <th>"NIO port"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || data_nodes.get()
                        key=|n| (n.node_id, n.hostname.clone())
                        children=|n| view! { <DataNodeRow node=n /> }
                    />
                </tbody>
            </table>
            <Show when=move || data_nodes.with(Vec::is_empty) && !loading.get()>
                <div class=shared::empty>"No DataNodes reported"</div>
            </Show>
        </section>
    }
}

#[component]
fn DataNodeRow(node: DataNode) -> impl IntoView {
    let percent = node.use_percent_value().unwrap_or(0.0).clamp(0.0, 100.0);
    let summary = node.usage_summary();
    let status = or_dash(node.status.clone());
    let online = node
        .status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("online") || s.eq_ignore_ascii_case("up"));
    let status_class = if online {
        format!("{} {}", shared::tag, shared::tagGreen)
    } else {
        format!("{} {}", shared::tag, shared::tagRed)
    };

    view! {
        <tr>
            <td>{or_dash(node.node_id)}</td>
            <td>{node.hostname}</td>
            <td><span class=status_class>{status}</span></td>
            <td>
                <div class=css::usage>
                    <div class=css::bar>
                        <div class=css::fill style=format!("width: {:.1}%", percent)></div>
                    </div>
                    <span class=shared::muted>{summary}</span>
                </div>
            </td>
            <td>{or_dash(node.latest_heartbeat_time)}</td>
            <td>{or_dash(node.http_port)}</td>
            <td>{or_dash(node.nio_port)}</td>
        </tr>
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "--".to_string())
}
