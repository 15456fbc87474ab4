//! Confirmation dialog.

use leptos::prelude::*;

stylance::import_crate_style!(shared, "src/components/shared.module.css");

/// Modal with OK / Cancel buttons. Rendered only while `open` is true.
#[component]
pub fn Modal(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] open: Signal<bool>,
    #[prop(into, default = Signal::stored(false))] busy: Signal<bool>,
    #[prop(into, default = Signal::stored("OK".to_string()))] ok_label: Signal<String>,
    on_ok: Callback<()>,
    on_cancel: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    let children = StoredValue::new(children);

    view! {
        <Show when=move || open.get()>
            <div class=shared::backdrop on:click=move |_| on_cancel.run(())>
                <div
                    class=shared::modal
                    role="dialog"
                    on:click=|ev: leptos::ev::MouseEvent| ev.stop_propagation()
                >
                    <h3 class=shared::modalTitle>{move || title.get()}</h3>
                    {children.with_value(|children| children())}
                    <div class=shared::modalFooter>
                        <button class=shared::button on:click=move |_| on_cancel.run(())>
                            "Cancel"
                        </button>
                        <button
                            class=format!("{} {}", shared::button, shared::primary)
                            disabled=move || busy.get()
                            on:click=move |_| on_ok.run(())
                        >
                            {move || ok_label.get()}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
