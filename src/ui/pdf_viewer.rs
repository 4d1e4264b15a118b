use std::rc::Rc;

use leptos::*;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use crate::error::RenderError;
use crate::liveness::Liveness;
use crate::pdf::{self, ObjectUrl};
use crate::state::use_app_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Loading,
    Rendering { done: u32, total: u32 },
    Finished,
}

impl Progress {
    fn label(self) -> Option<String> {
        match self {
            Progress::Loading => Some("Opening recipe…".to_string()),
            Progress::Rendering { done, total } if done < total => {
                Some(format!("Rendering page {} of {total}…", done + 1))
            }
            Progress::Rendering { .. } | Progress::Finished => None,
        }
    }
}

/// Renders every page of a PDF into stacked canvases. Failures surface as an
/// `Err` for the enclosing `ErrorBoundary`.
#[component]
pub fn PdfViewer(url: Rc<ObjectUrl>) -> impl IntoView {
    let scale = use_app_state().config.pdf_render_scale;
    let liveness = Liveness::for_view();
    let pages = create_node_ref::<html::Div>();
    let progress = create_rw_signal(Progress::Loading);
    let failure = create_rw_signal(None::<RenderError>);

    pages.on_load(move |container| {
        spawn_local(async move {
            let element: &web_sys::HtmlElement = &container;
            let result = pdf::render_document(url.as_str(), element, scale, &liveness, |done, total| {
                let _ = progress.try_set(Progress::Rendering { done, total });
            })
            .await;
            if !liveness.is_alive() {
                return;
            }
            match result {
                Ok(count) => {
                    debug!("rendered {count} pdf pages");
                    progress.set(Progress::Finished);
                }
                Err(err) => {
                    warn!("pdf render failed: {err}");
                    failure.set(Some(err));
                }
            }
        });
    });

    view! {
        <div class="pdf-viewer">
            {move || failure.get().map(Err::<(), RenderError>)}
            <p class="status">{move || progress.get().label()}</p>
            <div class="pdf-pages" node_ref=pages></div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_label_tracks_the_next_page() {
        assert_eq!(
            Progress::Rendering { done: 1, total: 3 }.label().as_deref(),
            Some("Rendering page 2 of 3…")
        );
        assert_eq!(Progress::Rendering { done: 3, total: 3 }.label(), None);
        assert_eq!(Progress::Finished.label(), None);
    }
}
