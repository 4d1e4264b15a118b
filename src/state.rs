use std::rc::Rc;

use leptos::*;

use crate::api::{HttpBackend, RecipeBackend};
use crate::config::AppConfig;
use crate::preferences::PreferenceStore;
use crate::storage::SharedStore;

/// App-wide services handed to every view through context.
#[derive(Clone)]
pub struct AppState {
    pub config: Rc<AppConfig>,
    pub store: SharedStore,
    pub preferences: PreferenceStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        let preferences = PreferenceStore::new(
            store.clone(),
            config.default_server_url.clone(),
            config.default_display_name.clone(),
        );
        Self {
            config: Rc::new(config),
            store,
            preferences,
        }
    }

    /// Backend client for the URL stored right now. Views take one on mount
    /// and keep it; a settings change applies from the next mount.
    pub fn backend(&self) -> Rc<dyn RecipeBackend> {
        Rc::new(HttpBackend::new(&self.preferences.server_url()))
    }
}

pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}
