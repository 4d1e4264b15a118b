use leptos::*;
use tracing::info;

use crate::config::format_relative_age;
use crate::router::{Route, use_navigator};
use crate::state::use_app_state;
use crate::ui::widgets::Dialog;

#[component]
pub fn HomePage() -> impl IntoView {
    let app = use_app_state();
    let nav = use_navigator();

    let prefs = create_rw_signal(app.preferences.ensure_defaults());
    let store = store_value(app.preferences.clone());
    let settings_open = create_rw_signal(false);
    let name_input = create_rw_signal(String::new());
    let url_input = create_rw_signal(String::new());

    let open_settings = move |_| {
        prefs.with_untracked(|current| {
            name_input.set(current.display_name.clone().unwrap_or_default());
            url_input.set(current.server_url.clone());
        });
        settings_open.set(true);
    };

    let save_settings = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let updated = store.with_value(|store| {
            store.update(&name_input.get_untracked(), &url_input.get_untracked())
        });
        info!(server = %updated.server_url, "preferences updated");
        prefs.set(updated);
        settings_open.set(false);
    };

    let greeting = move || {
        prefs.with(|p| match p.display_name.as_deref() {
            Some(name) => format!("What's for dinner, {name}?"),
            None => "Welcome to Dinner OS".to_string(),
        })
    };

    let build = app.config.build.clone();
    let now = (js_sys::Date::now() / 1000.0) as i64;
    let stamp = format!(
        "build {} · {}",
        build.hash,
        format_relative_age(build.epoch, now)
    );

    view! {
        <div class="page home">
            <header class="page-header">
                <h1>"Dinner OS"</h1>
                <button class="icon" title="Settings" on:click=open_settings>
                    "⚙"
                </button>
            </header>
            <p class="greeting">{greeting}</p>
            <nav class="home-menu">
                <button class="menu-card" on:click=move |_| nav.navigate(Route::Discover)>
                    <span class="menu-title">"Discover"</span>
                    <span class="menu-hint">"Chat your way to tonight's dinner"</span>
                </button>
                <button class="menu-card" on:click=move |_| nav.navigate(Route::Favorites)>
                    <span class="menu-title">"Old Favorites"</span>
                    <span class="menu-hint">"Browse the recipes you kept"</span>
                </button>
            </nav>
            <footer class="build-stamp">{stamp}</footer>

            <Dialog
                open=Signal::derive(move || settings_open.get())
                on_close=Callback::new(move |_| settings_open.set(false))
                title="Settings"
            >
                <form class="settings-form" on:submit=save_settings>
                    <label>
                        "First name"
                        <input
                            type="text"
                            prop:value=move || name_input.get()
                            on:input=move |ev| name_input.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Server URL"
                        <input
                            type="url"
                            prop:value=move || url_input.get()
                            on:input=move |ev| url_input.set(event_target_value(&ev))
                        />
                    </label>
                    <div class="dialog-actions">
                        <button type="button" on:click=move |_| settings_open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" class="primary">
                            "Save"
                        </button>
                    </div>
                </form>
            </Dialog>
        </div>
    }
}
