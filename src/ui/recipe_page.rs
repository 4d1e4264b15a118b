use std::rc::Rc;

use leptos::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::content::{ContentKind, RecipeBody, RecipePayload};
use crate::error::RenderError;
use crate::liveness::Liveness;
use crate::models::recipe_title;
use crate::pdf::ObjectUrl;
use crate::router::{Route, use_navigator};
use crate::state::use_app_state;
use crate::ui::pdf_viewer::PdfViewer;

#[derive(Debug, Clone)]
enum RecipeView {
    Loading,
    Failed(String),
    Markup(String),
    Document(Result<Rc<ObjectUrl>, RenderError>),
}

impl RecipeView {
    fn from_payload(payload: RecipePayload) -> Self {
        match payload.into_body() {
            RecipeBody::Markup(html) => RecipeView::Markup(html),
            RecipeBody::Document(bytes) => RecipeView::Document(
                ObjectUrl::from_bytes(&bytes, ContentKind::Pdf.mime_type()).map(Rc::new),
            ),
        }
    }
}

/// Text shown in place of a recipe whose document failed to render.
fn fallback_message(errors: &Errors) -> String {
    let details = errors
        .clone()
        .into_iter()
        .map(|(_, err)| err.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    format!("This recipe could not be displayed: {details}")
}

#[component]
pub fn RecipePage(name: String) -> impl IntoView {
    let app = use_app_state();
    let nav = use_navigator();
    let liveness = Liveness::for_view();
    let backend = app.backend();
    let state = create_rw_signal(RecipeView::Loading);
    let title = recipe_title(&name).to_string();

    spawn_local(async move {
        let Some(result) = liveness.settle(backend.load_recipe(&name)).await else {
            return;
        };
        let next = match result {
            Ok(bytes) => RecipeView::from_payload(RecipePayload::new(&name, bytes)),
            Err(err) => {
                warn!("loading recipe {name} failed: {err}");
                RecipeView::Failed(err.to_string())
            }
        };
        state.set(next);
    });

    let body = move || match state.get() {
        RecipeView::Loading => view! { <p class="status">"Loading recipe…"</p> }.into_view(),
        RecipeView::Failed(message) => view! {
            <div class="error-banner" role="alert">
                "There was a problem loading your recipe: "
                {message}
            </div>
        }
        .into_view(),
        RecipeView::Markup(html) => {
            view! { <article class="recipe markdown" inner_html=html></article> }.into_view()
        }
        RecipeView::Document(document) => view! {
            <ErrorBoundary fallback=|errors| {
                view! {
                    <div class="error-banner" role="alert">
                        {move || errors.with(fallback_message)}
                    </div>
                }
            }>
                {document.map(|url| view! { <PdfViewer url=url /> })}
            </ErrorBoundary>
        }
        .into_view(),
    };

    view! {
        <div class="page recipe-page">
            <header class="page-header">
                <button class="back" on:click=move |_| nav.navigate(Route::Favorites)>
                    "← Back"
                </button>
                <h2>{title}</h2>
            </header>
            {body}
        </div>
    }
}
