//! PDF recipes, rendered page by page with pdf.js (`window.pdfjsLib`).

use std::future::Future;

use js_sys::{Object, Promise, Reflect, Uint8Array};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Url};

use crate::error::RenderError;
use crate::liveness::Liveness;

#[wasm_bindgen]
extern "C" {
    type PdfLoadingTask;
    type PdfDocument;
    type PdfPage;
    type PdfViewport;
    type PdfRenderTask;

    #[wasm_bindgen(catch, js_namespace = pdfjsLib, js_name = getDocument)]
    fn get_document(src: &str) -> Result<PdfLoadingTask, JsValue>;

    #[wasm_bindgen(method, getter)]
    fn promise(this: &PdfLoadingTask) -> Promise;

    #[wasm_bindgen(method, getter = numPages)]
    fn num_pages(this: &PdfDocument) -> u32;

    #[wasm_bindgen(method, js_name = getPage)]
    fn get_page(this: &PdfDocument, number: u32) -> Promise;

    #[wasm_bindgen(method)]
    fn destroy(this: &PdfDocument) -> Promise;

    #[wasm_bindgen(method, js_name = getViewport)]
    fn get_viewport(this: &PdfPage, params: &JsValue) -> PdfViewport;

    #[wasm_bindgen(method, getter)]
    fn width(this: &PdfViewport) -> f64;

    #[wasm_bindgen(method, getter)]
    fn height(this: &PdfViewport) -> f64;

    #[wasm_bindgen(method)]
    fn render(this: &PdfPage, params: &JsValue) -> PdfRenderTask;

    #[wasm_bindgen(method, getter = promise)]
    fn render_promise(this: &PdfRenderTask) -> Promise;
}

/// A `blob:` URL for fetched bytes, revoked on drop.
#[derive(Debug)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Result<Self, RenderError> {
        let array = Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|err| RenderError::ObjectUrl(describe(&err)))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|err| RenderError::ObjectUrl(describe(&err)))?;
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.0);
    }
}

/// Loads the whole document, then renders one page at a time into its own
/// canvas appended to `container`. Stops quietly if the view goes away.
/// Returns the number of pages rendered.
pub async fn render_document(
    url: &str,
    container: &HtmlElement,
    scale: f64,
    liveness: &Liveness,
    mut on_page: impl FnMut(u32, u32),
) -> Result<u32, RenderError> {
    let task = get_document(url).map_err(|err| RenderError::Load(describe(&err)))?;
    let document: PdfDocument = JsFuture::from(task.promise())
        .await
        .map_err(|err| RenderError::Load(describe(&err)))?
        .unchecked_into();

    let total = document.num_pages();
    debug!("pdf loaded with {total} pages");

    let doc = &document;
    render_pages(
        total,
        liveness,
        move |number| render_page(doc, number, container, scale),
        &mut on_page,
        || {
            let _ = doc.destroy();
        },
    )
    .await
}

/// Renders pages in order until one fails or the view goes away. `release`
/// runs once on every exit path, a failed page included.
async fn render_pages<F, Fut>(
    total: u32,
    liveness: &Liveness,
    mut render: F,
    on_page: &mut impl FnMut(u32, u32),
    release: impl FnOnce(),
) -> Result<u32, RenderError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<(), RenderError>>,
{
    let mut outcome = Ok(0);
    for number in 1..=total {
        if !liveness.is_alive() {
            break;
        }
        if let Err(err) = render(number).await {
            outcome = Err(err);
            break;
        }
        outcome = Ok(number);
        on_page(number, total);
    }
    release();
    outcome
}

async fn render_page(
    document: &PdfDocument,
    number: u32,
    container: &HtmlElement,
    scale: f64,
) -> Result<(), RenderError> {
    let page_error = |err: JsValue| RenderError::Page {
        page: number,
        message: describe(&err),
    };

    let page: PdfPage = JsFuture::from(document.get_page(number))
        .await
        .map_err(page_error)?
        .unchecked_into();

    let viewport_params = Object::new();
    Reflect::set(&viewport_params, &"scale".into(), &scale.into()).map_err(page_error)?;
    let viewport = page.get_viewport(&viewport_params);

    let document_node = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| page_error(JsValue::from_str("no document")))?;
    let canvas: HtmlCanvasElement = document_node
        .create_element("canvas")
        .map_err(page_error)?
        .unchecked_into();
    canvas.set_width(viewport.width().ceil() as u32);
    canvas.set_height(viewport.height().ceil() as u32);
    canvas.set_class_name("pdf-page");

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(page_error)?
        .ok_or_else(|| page_error(JsValue::from_str("canvas 2d context unavailable")))?
        .unchecked_into();

    container.append_child(&canvas).map_err(page_error)?;

    let render_params = Object::new();
    Reflect::set(&render_params, &"canvasContext".into(), &context).map_err(page_error)?;
    Reflect::set(&render_params, &"viewport".into(), &viewport).map_err(page_error)?;
    JsFuture::from(page.render(&render_params).render_promise())
        .await
        .map_err(page_error)?;
    Ok(())
}

fn describe(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}
