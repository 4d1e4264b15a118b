use leptos::*;
use tracing::{debug, info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::catalog::{self, CatalogEntry, SelectionSet};
use crate::liveness::{Generation, Liveness};
use crate::models::recipe_title;
use crate::router::{Route, use_navigator};
use crate::state::use_app_state;
use crate::ui::widgets::{Dialog, Notice, NoticeBanner};

fn delete_prompt(count: usize) -> String {
    let noun = if count == 1 { "recipe" } else { "recipes" };
    format!("Delete {count} {noun}? This cannot be undone.")
}

#[component]
pub fn FavoritesPage() -> impl IntoView {
    let app = use_app_state();
    let nav = use_navigator();
    let liveness = Liveness::for_view();
    let backend = store_value(app.backend());
    let notice = Notice::new(app.config.notice_timeout_ms);

    let files = create_rw_signal(Vec::<String>::new());
    let error = create_rw_signal(None::<String>);
    let loading = create_rw_signal(true);
    let selecting = create_rw_signal(false);
    let selection = create_rw_signal(SelectionSet::default());
    let confirm_open = create_rw_signal(false);
    let deleting = create_rw_signal(false);

    // Reload on mount and whenever selection mode flips.
    let live_load = liveness.clone();
    let loads = Generation::default();
    create_effect(move |_| {
        selecting.track();
        loading.set(true);
        let ticket = loads.next();
        let loads = loads.clone();
        let backend = backend.get_value();
        let liveness = live_load.clone();
        spawn_local(async move {
            let fetch = catalog::fetch_listing(backend.as_ref());
            let Some(listing) = liveness.settle(fetch).await else {
                return;
            };
            if !loads.is_current(ticket) {
                debug!("dropping superseded recipe listing");
                return;
            }
            files.set(listing.files);
            error.set(listing.error);
            loading.set(false);
        });
    });

    let live_delete = liveness.clone();
    let delete_selected = Callback::new(move |()| {
        confirm_open.set(false);
        let references = selection.with_untracked(SelectionSet::references);
        if references.is_empty() || deleting.get_untracked() {
            return;
        }
        deleting.set(true);

        let backend = backend.get_value();
        let liveness = live_delete.clone();
        spawn_local(async move {
            let deletes = catalog::delete_all(backend.as_ref(), &references);
            let Some(result) = liveness.settle(deletes).await else {
                return;
            };
            deleting.set(false);
            match result {
                Ok(()) => {
                    info!("deleted {} recipes", references.len());
                    selection.update(SelectionSet::clear);
                    selecting.set(false);
                }
                Err(err) => {
                    warn!("{err}");
                    notice.show(format!("Could not delete everything: {err}"));
                }
            }
        });
    });

    let open_card = Callback::new(move |reference: String| {
        if selecting.get_untracked() {
            selection.update(|s| {
                s.toggle(&reference);
            });
        } else {
            nav.navigate(Route::Recipe(reference));
        }
    });

    let leave_selection = move |_| {
        selection.update(SelectionSet::clear);
        selecting.set(false);
    };

    let header_actions = move || {
        if selecting.get() {
            view! {
                <button on:click=leave_selection>"Cancel"</button>
                <button
                    class="danger"
                    disabled=move || deleting.get() || selection.with(SelectionSet::is_empty)
                    on:click=move |_| confirm_open.set(true)
                >
                    {move || if deleting.get() { "Deleting…" } else { "Delete" }}
                </button>
            }
            .into_view()
        } else {
            view! { <button on:click=move |_| selecting.set(true)>"Select"</button> }.into_view()
        }
    };

    let entries = move || files.with(|f| catalog::visible_entries(f, selecting.get()));
    let is_empty = move || !loading.get() && error.with(Option::is_none) && files.with(Vec::is_empty);

    view! {
        <div class="page favorites">
            <header class="page-header">
                <button class="back" on:click=move |_| nav.navigate(Route::Home)>
                    "← Back"
                </button>
                <h2>"Old Favorites"</h2>
                <div class="actions">{header_actions}</div>
            </header>
            <NoticeBanner notice=notice />
            {move || {
                error
                    .get()
                    .map(|message| {
                        view! {
                            <div class="error-banner" role="alert">
                                "There was a problem loading your recipes: "
                                {message}
                            </div>
                        }
                    })
            }}
            <Show when=move || loading.get()>
                <p class="status">"Loading recipes…"</p>
            </Show>
            <div class="recipe-grid">
                <For
                    each=entries
                    key=|entry| entry.clone()
                    children=move |entry| match entry {
                        CatalogEntry::AddNew => {
                            view! {
                                <button
                                    class="recipe-card add"
                                    on:click=move |_| nav.navigate(Route::NewRecipe)
                                >
                                    <span class="recipe-card-title">"+ Add a recipe"</span>
                                </button>
                            }
                                .into_view()
                        }
                        CatalogEntry::Recipe(reference) => {
                            let title = recipe_title(&reference).to_string();
                            let marked = {
                                let reference = reference.clone();
                                move || selection.with(|s| s.contains(&reference))
                            };
                            let card_class = {
                                let marked = marked.clone();
                                move || {
                                    if selecting.get() && marked() {
                                        "recipe-card selected"
                                    } else {
                                        "recipe-card"
                                    }
                                }
                            };
                            view! {
                                <button
                                    class=card_class
                                    on:click=move |_| open_card.call(reference.clone())
                                >
                                    <Show when=move || selecting.get()>
                                        <span class="check">
                                            {
                                                let marked = marked.clone();
                                                move || if marked() { "☑" } else { "☐" }
                                            }
                                        </span>
                                    </Show>
                                    <span class="recipe-card-title">{title}</span>
                                </button>
                            }
                                .into_view()
                        }
                    }
                />
            </div>
            <Show when=is_empty>
                <div class="empty-state">
                    <p>"No saved recipes yet."</p>
                    <button class="primary" on:click=move |_| nav.navigate(Route::Discover)>
                        "Find something in Discover"
                    </button>
                </div>
            </Show>
            <Dialog
                open=Signal::derive(move || confirm_open.get())
                on_close=Callback::new(move |_| confirm_open.set(false))
                title="Delete recipes"
            >
                <p>{move || delete_prompt(selection.with(SelectionSet::len))}</p>
                <div class="dialog-actions">
                    <button on:click=move |_| confirm_open.set(false)>"Cancel"</button>
                    <button class="danger" on:click=move |_| delete_selected.call(())>
                        "Delete"
                    </button>
                </div>
            </Dialog>
        </div>
    }
}
