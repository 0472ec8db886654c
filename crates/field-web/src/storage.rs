//! Best-effort browser storage.

use field_core::KeyValueStore;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use crate::dom;

/// Keys cleared by a demo reset.
pub const RESET_KEYS: [&str; 8] = [
    "evaluation_done",
    "evaluation_registered",
    "aurora_evaluation_done",
    "aurora_demo_lock",
    "aurora_demo_lock_v1_2026_03",
    "aurora_demo_executed",
    "aurora_demo_fingerprint",
    "aurora_demo_session",
];

const RESET_PARAMS: [&str; 3] = ["reset", "fresh", "r"];
const RESET_PATH: &str = "/demo";

/// `localStorage` where access failures read as absent.
#[derive(Clone, Default)]
pub struct LocalStore {
    storage: Option<web::Storage>,
}

impl LocalStore {
    pub fn open() -> Self {
        let storage = web::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("[storage] localStorage unavailable");
        }
        Self { storage }
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Some(s) = &self.storage {
            if s.set_item(key, value).is_err() {
                log::warn!("[storage] write failed key={key}");
            }
        }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }
}

/// Clears demo state and reloads on `/demo` when the URL asks for it.
pub fn reset_if_requested() -> bool {
    let Some(window) = web::window() else {
        return false;
    };
    let search = window.location().search().unwrap_or_default();
    let Ok(params) = web::UrlSearchParams::new_with_str(&search) else {
        return false;
    };
    if !RESET_PARAMS.iter().any(|p| params.has(p)) {
        return false;
    }

    let local = window.local_storage().ok().flatten();
    let session = window.session_storage().ok().flatten();
    let html_doc = dom::window_document().and_then(|d| d.dyn_into::<web::HtmlDocument>().ok());
    for key in RESET_KEYS {
        if let Some(s) = &local {
            let _ = s.remove_item(key);
        }
        if let Some(s) = &session {
            let _ = s.remove_item(key);
        }
        if let Some(doc) = &html_doc {
            let _ = doc.set_cookie(&format!("{key}=; Max-Age=0; path=/"));
        }
    }

    log::info!("[storage] demo reset");
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(RESET_PATH));
    }
    let _ = window.location().reload();
    true
}
