mod discover;
mod favorites;
mod home;
mod message_chat;
mod new_recipe;
mod pdf_viewer;
mod recipe_page;
mod widgets;

use leptos::*;
use tracing::debug;

use crate::config::AppConfig;
use crate::router::{Navigator, Route};
use crate::state::AppState;
use crate::storage::open_default_store;

use discover::DiscoverPage;
use favorites::FavoritesPage;
use home::HomePage;
use new_recipe::NewRecipePage;
use recipe_page::RecipePage;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    provide_context(AppState::new(config, open_default_store()));
    let navigator = Navigator::install();
    provide_context(navigator);

    let page = move || {
        let route = navigator.route();
        debug!("rendering {route:?}");
        match route {
            Route::Home => view! { <HomePage /> }.into_view(),
            Route::Discover => view! { <DiscoverPage /> }.into_view(),
            Route::Favorites => view! { <FavoritesPage /> }.into_view(),
            Route::NewRecipe => view! { <NewRecipePage /> }.into_view(),
            Route::Recipe(name) => view! { <RecipePage name=name /> }.into_view(),
        }
    };

    view! { <main class="dinner-os">{page}</main> }
}
