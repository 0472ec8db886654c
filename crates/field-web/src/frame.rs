use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Closure<dyn FnMut(f64)>;

/// Self-chaining `requestAnimationFrame` loop.
///
/// `on_frame` receives the frame timestamp and returns whether the loop
/// should keep going. `stop` cancels the pending callback; `shutdown`
/// additionally drops the callback so nothing can run afterwards.
pub struct FrameLoop {
    tick: Rc<RefCell<Option<Tick>>>,
    pending: Rc<Cell<Option<i32>>>,
    alive: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn new<F>(mut on_frame: F) -> Self
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let tick: Rc<RefCell<Option<Tick>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));
        let alive = Rc::new(Cell::new(true));

        let weak_tick: Weak<RefCell<Option<Tick>>> = Rc::downgrade(&tick);
        let pending_tick = pending.clone();
        let alive_tick = alive.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            pending_tick.set(None);
            if !alive_tick.get() || !on_frame(ts) || !alive_tick.get() {
                return;
            }
            if let Some(tick) = weak_tick.upgrade() {
                schedule(&tick, &pending_tick);
            }
        }) as Box<dyn FnMut(f64)>));

        Self {
            tick,
            pending,
            alive,
        }
    }

    /// Requests a frame unless one is already pending.
    pub fn start(&self) {
        if self.alive.get() && self.pending.get().is_none() {
            schedule(&self.tick, &self.pending);
        }
    }

    pub fn stop(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
    }

    pub fn shutdown(&self) {
        self.alive.set(false);
        self.stop();
        if let Ok(mut tick) = self.tick.try_borrow_mut() {
            tick.take();
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn schedule(tick: &RefCell<Option<Tick>>, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else { return };
    let Ok(tick) = tick.try_borrow() else { return };
    if let Some(cb) = tick.as_ref() {
        if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            pending.set(Some(id));
        }
    }
}
