use leptos::*;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

/// Same set `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Discover,
    Favorites,
    NewRecipe,
    Recipe(String),
}

impl Route {
    /// Unknown paths land on the home view.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = trimmed.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/discover" => Self::Discover,
            "/favorites" => Self::Favorites,
            "/new-recipe" => Self::NewRecipe,
            other => match other.strip_prefix("/recipe/") {
                Some(segment) if !segment.is_empty() && !segment.contains('/') => {
                    let name = percent_decode_str(segment).decode_utf8_lossy().into_owned();
                    Self::Recipe(name)
                }
                _ => Self::Home,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Discover => "/discover".to_string(),
            Self::Favorites => "/favorites".to_string(),
            Self::NewRecipe => "/new-recipe".to_string(),
            Self::Recipe(name) => format!("/recipe/{}", utf8_percent_encode(name, COMPONENT)),
        }
    }
}

/// Current route plus History API plumbing, shared through context.
#[derive(Clone, Copy)]
pub struct Navigator {
    current: RwSignal<Route>,
}

impl Navigator {
    pub fn install() -> Self {
        let initial = web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .map(|path| Route::parse(&path))
            .unwrap_or(Route::Home);
        let current = create_rw_signal(initial);

        if let Some(window) = web_sys::window() {
            let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                let Some(path) = web_sys::window().and_then(|w| w.location().pathname().ok())
                else {
                    return;
                };
                let route = Route::parse(&path);
                debug!("popstate -> {route:?}");
                current.set(route);
            });
            let _ = window
                .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref());
            callback.forget();
        }

        Self { current }
    }

    pub fn route(&self) -> Route {
        self.current.get()
    }

    pub fn navigate(&self, route: Route) {
        let path = route.path();
        let pushed = web_sys::window()
            .and_then(|window| window.history().ok())
            .map(|history| history.push_state_with_url(&JsValue::NULL, "", Some(&path)));
        if let Some(Err(err)) = pushed {
            warn!("history push to {path} failed: {err:?}");
        }
        self.current.set(route);
    }

    /// History back, like the browser button. The `popstate` listener picks up
    /// the new route. Without an earlier entry this navigates to `fallback`.
    pub fn back_or(&self, fallback: Route) {
        let history = web_sys::window().and_then(|window| window.history().ok());
        let Some(history) = history.filter(|h| h.length().map_or(false, has_previous_entry))
        else {
            self.navigate(fallback);
            return;
        };
        if let Err(err) = history.back() {
            warn!("history back failed: {err:?}");
            self.navigate(fallback);
        }
    }
}

/// A fresh tab has a single History entry; stepping back would leave the app.
fn has_previous_entry(history_length: u32) -> bool {
    history_length > 1
}

pub fn use_navigator() -> Navigator {
    expect_context::<Navigator>()
}
