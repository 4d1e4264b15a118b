use tracing::{debug, warn};

use crate::config::normalize_server_url;
use crate::storage::SharedStore;

pub const DISPLAY_NAME_KEY: &str = "firstName";
pub const SERVER_URL_KEY: &str = "dinnerServerUrl";

/// Typed access to the user's display name and backend URL.
///
/// Neither value is ever deleted. The server URL falls back to the configured
/// default when absent, and [`PreferenceStore::ensure_defaults`] writes that
/// default through on first visit.
#[derive(Clone)]
pub struct PreferenceStore {
    store: SharedStore,
    default_server_url: String,
    default_display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub display_name: Option<String>,
    pub server_url: String,
}

impl PreferenceStore {
    pub fn new(
        store: SharedStore,
        default_server_url: impl Into<String>,
        default_display_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            default_server_url: default_server_url.into(),
            default_display_name: default_display_name.into(),
        }
    }

    pub fn display_name(&self) -> Option<String> {
        self.store
            .get(DISPLAY_NAME_KEY)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Name used when attributing chat turns.
    pub fn display_name_or_default(&self) -> String {
        self.display_name()
            .unwrap_or_else(|| self.default_display_name.clone())
    }

    pub fn stored_server_url(&self) -> Option<String> {
        self.store
            .get(SERVER_URL_KEY)
            .map(|url| normalize_server_url(&url))
            .filter(|url| !url.is_empty())
    }

    pub fn server_url(&self) -> String {
        self.stored_server_url()
            .unwrap_or_else(|| self.default_server_url.clone())
    }

    pub fn load(&self) -> Preferences {
        Preferences {
            display_name: self.display_name(),
            server_url: self.server_url(),
        }
    }

    pub fn ensure_defaults(&self) -> Preferences {
        if self.stored_server_url().is_none() {
            debug!("no server url stored, writing default {}", self.default_server_url);
            self.write(SERVER_URL_KEY, &self.default_server_url);
        }
        self.load()
    }

    /// Applies a settings submission. Blank values leave the stored value untouched.
    pub fn update(&self, display_name: &str, server_url: &str) -> Preferences {
        let name = display_name.trim();
        if !name.is_empty() {
            self.write(DISPLAY_NAME_KEY, name);
        }

        let url = normalize_server_url(server_url);
        if !url.is_empty() {
            self.write(SERVER_URL_KEY, &url);
        }

        self.load()
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!("failed to persist preference: {err}");
        }
    }
}
