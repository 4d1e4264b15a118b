use gloo_timers::callback::Timeout;
use leptos::*;

#[component]
pub fn Dialog(
    #[prop(into)] open: Signal<bool>,
    on_close: Callback<()>,
    #[prop(into)] title: String,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="dialog-backdrop" on:click=move |_| on_close.call(())>
                <div
                    class="dialog-panel"
                    role="dialog"
                    aria-modal="true"
                    on:click=|ev| ev.stop_propagation()
                >
                    <h3 class="dialog-title">{title.clone()}</h3>
                    {children()}
                </div>
            </div>
        </Show>
    }
}

/// A message that clears itself after a few seconds. A newer message resets the timer.
#[derive(Clone, Copy)]
pub struct Notice {
    message: RwSignal<Option<String>>,
    generation: StoredValue<u64>,
    timeout_ms: u32,
}

impl Notice {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            message: create_rw_signal(None),
            generation: store_value(0),
            timeout_ms,
        }
    }

    pub fn show(&self, text: impl Into<String>) {
        let generation = self.generation.get_value().wrapping_add(1);
        self.generation.set_value(generation);
        self.message.set(Some(text.into()));

        let message = self.message;
        let current = self.generation;
        Timeout::new(self.timeout_ms, move || {
            if current.try_get_value() == Some(generation) {
                let _ = message.try_set(None);
            }
        })
        .forget();
    }

    pub fn dismiss(&self) {
        self.message.set(None);
    }
}

#[component]
pub fn NoticeBanner(notice: Notice) -> impl IntoView {
    move || {
        notice.message.get().map(|text| {
            view! {
                <div class="notice" role="alert" on:click=move |_| notice.dismiss()>
                    {text}
                </div>
            }
        })
    }
}
