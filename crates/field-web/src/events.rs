//! Event subscriptions that detach themselves when dropped.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// One DOM event listener. Removed from its target on drop.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new<F>(
        target: &web::EventTarget,
        kind: &'static str,
        capture: bool,
        handler: F,
    ) -> Result<Self, JsValue>
    where
        F: FnMut(web::Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let options = web::AddEventListenerOptions::new();
        options.set_capture(capture);
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            capture,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.kind,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// Attribute observer on one element. Disconnected on drop.
pub struct AttributeWatch {
    observer: web::MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web::MutationObserver)>,
}

impl AttributeWatch {
    pub fn new<F>(target: &web::Element, attributes: &[&str], mut on_change: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let callback = Closure::wrap(Box::new(move |_records: js_sys::Array, _obs: web::MutationObserver| {
            on_change();
        }) as Box<dyn FnMut(js_sys::Array, web::MutationObserver)>);
        let observer = web::MutationObserver::new(callback.as_ref().unchecked_ref())?;

        let filter: js_sys::Array = attributes.iter().map(|a| JsValue::from_str(a)).collect();
        let init = web::MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_filter(&filter);
        observer.observe_with_options(target, &init)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for AttributeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Everything a mounted instance listens to, torn down together.
#[derive(Default)]
pub struct Subscriptions {
    listeners: Vec<Listener>,
    watches: Vec<AttributeWatch>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen<F>(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        capture: bool,
        handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(web::Event) + 'static,
    {
        self.listeners.push(Listener::new(target, kind, capture, handler)?);
        Ok(())
    }

    pub fn watch(&mut self, watch: AttributeWatch) {
        self.watches.push(watch);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len() + self.watches.len()
    }

    /// Detaches everything in reverse order of attachment.
    pub fn clear(&mut self) {
        while self.watches.pop().is_some() {}
        while self.listeners.pop().is_some() {}
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.clear();
    }
}
