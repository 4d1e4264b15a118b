use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::authoring::{self, SubmitOutcome};
use crate::content::render_markdown;
use crate::error::ValidationErrors;
use crate::liveness::Liveness;
use crate::router::{Route, use_navigator};
use crate::state::use_app_state;
use crate::ui::widgets::Dialog;

#[component]
pub fn NewRecipePage() -> impl IntoView {
    let app = use_app_state();
    let nav = use_navigator();
    let liveness = Liveness::for_view();
    let backend = store_value(app.backend());

    let title = create_rw_signal(String::new());
    let content = create_rw_signal(String::new());
    let errors = create_rw_signal(ValidationErrors::default());
    let saving = create_rw_signal(false);
    let outcome = create_rw_signal(None::<SubmitOutcome>);

    let save = Callback::new(move |()| {
        if saving.get_untracked() {
            return;
        }
        let draft = match authoring::validate(&title.get_untracked(), &content.get_untracked()) {
            Ok(draft) => draft,
            Err(found) => {
                errors.set(found);
                return;
            }
        };
        errors.set(ValidationErrors::default());
        saving.set(true);

        let backend = backend.get_value();
        let liveness = liveness.clone();
        spawn_local(async move {
            let Some(result) = liveness.settle(authoring::submit(backend.as_ref(), &draft)).await
            else {
                return;
            };
            saving.set(false);
            outcome.set(Some(result));
        });
    });

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        save.call(());
    };

    let field_error = move |pick: fn(&ValidationErrors) -> Option<String>| {
        move || {
            errors
                .with(pick)
                .map(|message| view! { <p class="field-error">{message}</p> })
        }
    };

    let result_body = move || {
        outcome.get().map(|result| {
            let status = if result.success { "result success" } else { "result failure" };
            let view_button = result.reference.map(|reference| {
                view! {
                    <button
                        class="primary"
                        on:click=move |_| {
                            outcome.set(None);
                            nav.navigate(Route::Recipe(reference.clone()));
                        }
                    >
                        "View Recipe"
                    </button>
                }
            });
            view! {
                <p class=status>{result.message}</p>
                <div class="dialog-actions">
                    <button on:click=move |_| outcome.set(None)>"Close"</button>
                    {view_button}
                </div>
            }
        })
    };

    view! {
        <div class="page new-recipe">
            <header class="page-header">
                <button
                    class="back"
                    disabled=move || saving.get()
                    on:click=move |_| nav.back_or(Route::Favorites)
                >
                    "← Back"
                </button>
                <h2>"New Recipe"</h2>
                <div class="actions">
                    <button
                        class="primary"
                        disabled=move || saving.get()
                        on:click=move |_| save.call(())
                    >
                        "Save"
                    </button>
                </div>
            </header>
            <form class="recipe-form" on:submit=submit>
                <label>
                    "Title"
                    <input
                        type="text"
                        placeholder="Grandma's lasagna"
                        disabled=move || saving.get()
                        prop:value=move || title.get()
                        on:input=move |ev| title.set(event_target_value(&ev))
                    />
                </label>
                {field_error(|e| e.title.clone())}
                <label>
                    "Recipe"
                    <textarea
                        rows="16"
                        placeholder="Ingredients, steps, notes… Markdown works."
                        disabled=move || saving.get()
                        prop:value=move || content.get()
                        on:input=move |ev| content.set(event_target_value(&ev))
                    ></textarea>
                </label>
                {field_error(|e| e.content.clone())}
            </form>
            <section class="recipe-preview">
                <h3>"Preview"</h3>
                <article
                    class="recipe markdown"
                    inner_html=move || content.with(|source| render_markdown(source))
                ></article>
            </section>
            <Dialog
                open=Signal::derive(move || saving.get())
                on_close=Callback::new(|_| {})
                title="Saving"
            >
                <p class="status">"Saving your recipe magic…"</p>
            </Dialog>
            <Dialog
                open=Signal::derive(move || outcome.with(Option::is_some))
                on_close=Callback::new(move |_| outcome.set(None))
                title="New Recipe"
            >
                {result_body}
            </Dialog>
        </div>
    }
}
