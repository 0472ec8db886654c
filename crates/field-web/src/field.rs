//! One mounted decision field: canvas, overlay, listeners and frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use field_core::constants::HOVER_PULSE_POWER;
use field_core::timing::FrameGate;
use field_core::{
    Dispose, Environment, FieldController, HoverGate, LoopCommand, StateSource,
};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::canvas::CanvasSurface;
use crate::dom;
use crate::events::Subscriptions;
use crate::frame::FrameLoop;
use crate::overlay::OverlayView;
use crate::source::BodyDataset;
use crate::storage::LocalStore;

const ACTION_SELECTOR: &str = "a,button,[role='button']";

struct Runtime {
    controller: FieldController,
    surface: CanvasSurface,
    overlay: OverlayView,
    store: LocalStore,
    gate: FrameGate,
    hover: HoverGate<web::Element>,
}

impl Runtime {
    fn sync_overlay(&mut self, now_ms: f64) {
        if let Some(content) = self.controller.take_overlay(now_ms, &self.store) {
            self.overlay.show(&content);
        }
    }
}

type Shared = Rc<RefCell<Runtime>>;

fn follow(command: LoopCommand, frame_loop: &FrameLoop, gate: &mut FrameGate) {
    match command {
        LoopCommand::Start => {
            gate.reset();
            frame_loop.start();
        }
        LoopCommand::Stop => frame_loop.stop(),
        LoopCommand::Keep => {}
    }
}

pub struct FieldInstance {
    root: web::Element,
    canvas: web::Element,
    overlay: web::Element,
    runtime: Shared,
    frame_loop: Rc<FrameLoop>,
    subscriptions: Subscriptions,
}

impl FieldInstance {
    pub fn mount(root: web::Element) -> anyhow::Result<Self> {
        let window = dom::window()?;
        let document = dom::window_document().ok_or_else(|| anyhow!("no document"))?;
        if !root.is_connected() {
            return Err(field_core::FieldError::RootMissing.into());
        }
        let body = dom::body(&document)?;

        let mut surface = CanvasSurface::create(&document)?;
        let overlay = OverlayView::create(&document)?;
        let canvas: web::Element = surface.element().clone().unchecked_into();
        let overlay_el = overlay.element().clone();

        let viewport = dom::viewport(&window);
        surface.resize(viewport, dom::pixel_ratio(&window));

        let media = dom::reduced_motion_query(&window);
        let reduced_motion = media.as_ref().is_some_and(|m| m.matches());
        let source = BodyDataset::new(body.clone().unchecked_into());
        let now = dom::now_ms();
        let controller = FieldController::new(
            Environment {
                viewport,
                reduced_motion,
                visible: !document.hidden(),
                seed: rand::random(),
            },
            &source.read(),
            now,
        );

        root.append_child(&canvas)
            .map_err(|e| anyhow!("append canvas: {e:?}"))?;
        root.append_child(&overlay_el)
            .map_err(|e| anyhow!("append overlay: {e:?}"))?;

        let runtime: Shared = Rc::new(RefCell::new(Runtime {
            controller,
            surface,
            overlay,
            store: LocalStore::open(),
            gate: FrameGate::for_threads(dom::hardware_threads(&window)),
            hover: HoverGate::default(),
        }));

        let frame_loop = Rc::new(FrameLoop::new({
            let runtime = runtime.clone();
            move |ts| {
                let Ok(mut rt) = runtime.try_borrow_mut() else {
                    return true;
                };
                let rt = &mut *rt;
                if !rt.gate.admit(ts) {
                    return rt.controller.is_running();
                }
                rt.controller.frame(ts, &mut rt.surface);
                rt.sync_overlay(ts);
                rt.controller.is_running()
            }
        }));

        let mut instance = Self {
            root,
            canvas,
            overlay: overlay_el,
            runtime,
            frame_loop,
            subscriptions: Subscriptions::new(),
        };
        if let Err(e) = instance.bind(&window, &document, media, &source) {
            instance.dispose();
            return Err(e);
        }

        {
            let mut rt = instance.runtime.borrow_mut();
            let rt = &mut *rt;
            if rt.controller.is_running() {
                instance.frame_loop.start();
            } else {
                rt.controller.render_static(now, &mut rt.surface);
            }
            rt.sync_overlay(now);
            log::info!(
                "[field] mounted regime={} nodes={} running={} listeners={}",
                rt.controller.regime().name(),
                rt.controller.node_count(),
                rt.controller.is_running(),
                instance.subscriptions.len()
            );
        }
        Ok(instance)
    }

    fn bind(
        &mut self,
        window: &web::Window,
        document: &web::Document,
        media: Option<web::MediaQueryList>,
        source: &BodyDataset,
    ) -> anyhow::Result<()> {
        let js = |e: wasm_bindgen::JsValue| anyhow!("listener: {e:?}");
        let win: &web::EventTarget = window.as_ref();
        let doc: &web::EventTarget = document.as_ref();

        {
            let (rt, w) = (self.runtime.clone(), window.clone());
            self.subscriptions
                .listen(win, "resize", false, move |_| {
                    let Ok(mut rt) = rt.try_borrow_mut() else { return };
                    let rt = &mut *rt;
                    let vp = dom::viewport(&w);
                    rt.surface.resize(vp, dom::pixel_ratio(&w));
                    rt.controller.resize(vp, dom::now_ms(), &mut rt.surface);
                })
                .map_err(js)?;
        }
        {
            let rt = self.runtime.clone();
            self.subscriptions
                .listen(win, "pointermove", true, move |ev| {
                    let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else { return };
                    if let Ok(mut rt) = rt.try_borrow_mut() {
                        rt.controller
                            .pointer_move(Vec2::new(ev.client_x() as f32, ev.client_y() as f32));
                    }
                })
                .map_err(js)?;
        }
        {
            let rt = self.runtime.clone();
            self.subscriptions
                .listen(win, "pointerleave", false, move |_| {
                    if let Ok(mut rt) = rt.try_borrow_mut() {
                        rt.controller.pointer_leave();
                    }
                })
                .map_err(js)?;
        }
        {
            let (rt, w, d) = (self.runtime.clone(), window.clone(), document.clone());
            self.subscriptions
                .listen(win, "scroll", true, move |_| {
                    if let Ok(mut rt) = rt.try_borrow_mut() {
                        rt.controller
                            .scroll(dom::scroll_y(&w), dom::max_scroll(&w, &d));
                    }
                })
                .map_err(js)?;
        }
        {
            let (rt, lp, d) = (self.runtime.clone(), self.frame_loop.clone(), document.clone());
            self.subscriptions
                .listen(doc, "visibilitychange", false, move |_| {
                    let Ok(mut rt) = rt.try_borrow_mut() else { return };
                    let rt = &mut *rt;
                    let command = rt.controller.set_visible(!d.hidden());
                    follow(command, &lp, &mut rt.gate);
                })
                .map_err(js)?;
        }
        {
            let rt = self.runtime.clone();
            self.subscriptions
                .listen(doc, "pointerover", true, move |ev| {
                    let Some(target) = ev.target().and_then(|t| t.dyn_into::<web::Element>().ok())
                    else {
                        return;
                    };
                    let Ok(Some(action)) = target.closest(ACTION_SELECTOR) else {
                        return;
                    };
                    let Ok(mut rt) = rt.try_borrow_mut() else { return };
                    let rect = action.get_bounding_client_rect();
                    if rt.hover.admit(action, dom::now_ms()) {
                        let center = Vec2::new(
                            (rect.left() + rect.width() * 0.5) as f32,
                            (rect.top() + rect.height() * 0.5) as f32,
                        );
                        rt.controller.pulse(center, HOVER_PULSE_POWER);
                    }
                })
                .map_err(js)?;
        }
        if let Some(media) = media {
            let (rt, lp, m) = (self.runtime.clone(), self.frame_loop.clone(), media.clone());
            let target: &web::EventTarget = media.as_ref();
            self.subscriptions
                .listen(target, "change", false, move |_| {
                    let Ok(mut rt) = rt.try_borrow_mut() else { return };
                    let rt = &mut *rt;
                    let command =
                        rt.controller
                            .set_reduced_motion(m.matches(), dom::now_ms(), &mut rt.surface);
                    follow(command, &lp, &mut rt.gate);
                })
                .map_err(js)?;
        }

        let (rt, reader) = (self.runtime.clone(), source.clone());
        let watch = source.subscribe(Box::new(move || {
            let Ok(mut rt) = rt.try_borrow_mut() else { return };
            let rt = &mut *rt;
            let now = dom::now_ms();
            if rt.controller.apply(&reader.read(), now, &mut rt.surface) {
                rt.sync_overlay(now);
            }
        }));
        if let Some(watch) = watch {
            self.subscriptions.watch(watch);
        }
        Ok(())
    }
}

impl Dispose for FieldInstance {
    fn dispose(&mut self) {
        self.frame_loop.shutdown();
        self.subscriptions.clear();
        if let Ok(mut rt) = self.runtime.try_borrow_mut() {
            rt.controller.destroy();
        }
        dom::detach(&self.root, &self.canvas);
        dom::detach(&self.root, &self.overlay);
    }
}
