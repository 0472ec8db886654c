#![cfg(target_arch = "wasm32")]
//! Browser entry points: mount the decision field and the scroll-stage
//! driver, reset demo state, and the small funnel helpers the pages call.

mod canvas;
mod dom;
mod events;
mod field;
mod frame;
mod overlay;
mod source;
mod stage;
mod storage;

use std::cell::RefCell;

use field_core::{Dispose, Disposer, Slot};
use wasm_bindgen::prelude::*;
use web_sys as web;

use crate::field::FieldInstance;
use crate::stage::StageDriver;
use crate::storage::LocalStore;

thread_local! {
    static FIELD: RefCell<Slot<FieldInstance>> = RefCell::new(Slot::new());
    static STAGE: RefCell<Slot<StageDriver>> = RefCell::new(Slot::new());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("field-web starting");
    Ok(())
}

fn to_js(e: anyhow::Error) -> JsValue {
    log::error!("[field] mount failed: {e:#}");
    JsValue::from_str(&format!("{e:#}"))
}

/// Returned by every mount; `dispose` tears the instance down and is safe
/// to call more than once.
#[wasm_bindgen]
pub struct MountHandle {
    disposer: RefCell<Disposer>,
}

#[wasm_bindgen]
impl MountHandle {
    pub fn dispose(&self) {
        if let Ok(mut d) = self.disposer.try_borrow_mut() {
            d.dispose();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn disposed(&self) -> bool {
        self.disposer.try_borrow().map_or(true, |d| d.is_spent())
    }
}

impl MountHandle {
    fn new(disposer: Disposer) -> Self {
        Self {
            disposer: RefCell::new(disposer),
        }
    }
}

/// Mounts the field into `root`, replacing any field mounted earlier.
#[wasm_bindgen(js_name = mountDecisionField)]
pub fn mount_decision_field(root: web::Element) -> Result<MountHandle, JsValue> {
    let ticket = FIELD
        .with(|slot| slot.borrow_mut().mount(|| FieldInstance::mount(root)))
        .map_err(to_js)?;
    Ok(MountHandle::new(Disposer::new(move || {
        FIELD.with(|slot| {
            if let Ok(mut slot) = slot.try_borrow_mut() {
                slot.release(ticket);
            }
        })
    })))
}

/// Starts the scroll-stage driver for the current page.
#[wasm_bindgen(js_name = mountStageDriver)]
pub fn mount_stage_driver() -> Result<MountHandle, JsValue> {
    let ticket = STAGE
        .with(|slot| slot.borrow_mut().mount(StageDriver::mount))
        .map_err(to_js)?;
    Ok(MountHandle::new(Disposer::new(move || {
        STAGE.with(|slot| {
            if let Ok(mut slot) = slot.try_borrow_mut() {
                slot.release(ticket);
            }
        })
    })))
}

/// Clears demo state and reloads when the URL carries a reset flag.
#[wasm_bindgen(js_name = demoResetIfRequested)]
pub fn demo_reset_if_requested() -> bool {
    storage::reset_if_requested()
}

/// Hashes the answers and stores the result for the overlay.
#[wasm_bindgen(js_name = recordFingerprint)]
pub fn record_fingerprint(category: &str, a: bool, b: bool, c: bool, timestamp: f64) -> String {
    let fingerprint = funnel::fingerprint::create_fingerprint(category, [a, b, c], timestamp as i64);
    LocalStore::open().set(funnel::fingerprint::FINGERPRINT_KEY, &fingerprint);
    fingerprint
}

/// The three lines shown for these answers.
#[wasm_bindgen(js_name = decisionCopy)]
pub fn decision_copy(scenario: &str, a: bool, b: bool, c: bool) -> js_sys::Array {
    let decision = funnel::decision::evaluate_decision(scenario, [a, b, c]);
    decision
        .copy
        .lines()
        .iter()
        .map(|line| JsValue::from_str(line))
        .collect()
}
