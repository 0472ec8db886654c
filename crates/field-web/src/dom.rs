use anyhow::anyhow;
use field_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn window() -> anyhow::Result<web::Window> {
    web::window().ok_or_else(|| anyhow!("no window"))
}

pub fn body(document: &web::Document) -> anyhow::Result<web::HtmlElement> {
    document.body().ok_or_else(|| anyhow!("no body"))
}

/// Milliseconds on the same clock as animation frame timestamps.
#[inline]
pub fn now_ms() -> f64 {
    web::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn viewport(window: &web::Window) -> Viewport {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0) as f32
    };
    Viewport::new(read(window.inner_width()), read(window.inner_height()))
}

/// Device pixel ratio capped at 2.
#[inline]
pub fn pixel_ratio(window: &web::Window) -> f64 {
    let dpr = window.device_pixel_ratio();
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(2.0)
    } else {
        1.0
    }
}

pub fn hardware_threads(window: &web::Window) -> u32 {
    let n = window.navigator().hardware_concurrency();
    if n.is_finite() && n > 0.0 {
        n as u32
    } else {
        0
    }
}

pub fn reduced_motion_query(window: &web::Window) -> Option<web::MediaQueryList> {
    window.match_media(REDUCED_MOTION_QUERY).ok().flatten()
}

/// Scrollable height of the document, at least 1.
pub fn max_scroll(window: &web::Window, document: &web::Document) -> f32 {
    let inner = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    (height - inner).max(1.0) as f32
}

#[inline]
pub fn scroll_y(window: &web::Window) -> f32 {
    window.scroll_y().unwrap_or(0.0) as f32
}

pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web::Element>().ok())
        .collect()
}

/// Removes `child` from `parent` only if it is still attached there.
pub fn detach(parent: &web::Element, child: &web::Element) {
    let attached = child
        .parent_element()
        .is_some_and(|p| p.is_same_node(Some(parent.as_ref())));
    if attached {
        let _ = parent.remove_child(child);
    }
}
