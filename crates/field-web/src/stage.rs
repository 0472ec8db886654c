//! Scroll-stage driver: turns page position into body state attributes.
//!
//! Reads `[data-field-stage]` sections, interpolates a marker line between
//! them and writes `data-field-progress`, `data-regime` and
//! `data-scroll-velocity` on the body while the values settle. A mounted
//! field picks those up through its attribute watch. Product entries
//! (`[data-product]`) set the group focus and algorithm on hover or focus,
//! and the optional products menu opens and closes from its toggle.

use std::cell::RefCell;
use std::rc::Rc;

use field_core::progress::{
    interpolate_progress, sort_stages, ProgressSmoother, StagePoint, MARKER_FRACTION,
};
use field_core::{Algorithm, Dispose};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::events::Subscriptions;
use crate::frame::FrameLoop;
use crate::source::{ATTR_ALGORITHM, ATTR_FOCUS, ATTR_REGIME, ATTR_SCROLL_VELOCITY};

const ATTR_PROGRESS: &str = "data-field-progress";
const ATTR_STAGE: &str = "data-field-stage";
const ATTR_PRODUCT_FOCUS: &str = "data-product-focus";
const ATTR_PRODUCTS_OPEN: &str = "data-products-open";

const STAGE_SELECTOR: &str = "[data-field-stage]";
const PRODUCT_SELECTOR: &str = "[data-product]";
const MENU_SELECTOR: &str = "[data-products-menu]";
const TOGGLE_SELECTOR: &str = "[data-products-toggle]";

struct StageState {
    smoother: ProgressSmoother,
    stages: Vec<StagePoint>,
    stage_nodes: Vec<web::Element>,
    menu_open: bool,
}

impl StageState {
    fn reload_stages(&mut self, window: &web::Window) {
        self.stages = read_stages(window, &self.stage_nodes);
    }

    fn refresh_target(&mut self, window: &web::Window) {
        let marker = dom::scroll_y(window) + dom::viewport(window).height * MARKER_FRACTION;
        self.smoother
            .set_target(interpolate_progress(&self.stages, marker));
    }
}

fn read_stages(window: &web::Window, nodes: &[web::Element]) -> Vec<StagePoint> {
    let scroll_y = dom::scroll_y(window);
    let mut points: Vec<StagePoint> = nodes
        .iter()
        .map(|node| {
            let top = scroll_y + node.get_bounding_client_rect().top() as f32;
            StagePoint::parse(top, node.get_attribute(ATTR_STAGE).as_deref())
        })
        .collect();
    sort_stages(&mut points);
    points
}

fn write_state(body: &web::Element, smoother: &ProgressSmoother) {
    let _ = body.set_attribute(ATTR_PROGRESS, &smoother.progress_attr());
    let _ = body.set_attribute(ATTR_REGIME, smoother.regime().name());
    let _ = body.set_attribute(ATTR_SCROLL_VELOCITY, &smoother.velocity_attr());
}

fn set_product_focus(body: &web::Element, node: &web::Element) {
    let product = node.get_attribute("data-product").unwrap_or_default();
    let group = node.get_attribute("data-group").unwrap_or_default();
    let algorithm = node
        .get_attribute("data-field-algorithm")
        .unwrap_or_else(|| Algorithm::Core.name().to_owned());
    let _ = body.set_attribute(ATTR_PRODUCT_FOCUS, &product);
    let _ = body.set_attribute(ATTR_FOCUS, &group);
    let _ = body.set_attribute(ATTR_ALGORITHM, &algorithm);
}

fn clear_product_focus(body: &web::Element) {
    let _ = body.remove_attribute(ATTR_PRODUCT_FOCUS);
    let _ = body.remove_attribute(ATTR_FOCUS);
    let _ = body.set_attribute(ATTR_ALGORITHM, Algorithm::Core.name());
}

/// Products menu and the button that toggles it.
#[derive(Clone)]
struct Menu {
    panel: web::HtmlElement,
    toggle: web::HtmlElement,
}

impl Menu {
    fn find(document: &web::Document) -> Option<Self> {
        let pick = |sel: &str| {
            document
                .query_selector(sel)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
        };
        Some(Self {
            panel: pick(MENU_SELECTOR)?,
            toggle: pick(TOGGLE_SELECTOR)?,
        })
    }

    fn open(&self, body: &web::Element, state: &mut StageState) {
        if state.menu_open {
            return;
        }
        state.menu_open = true;
        self.panel.set_hidden(false);
        let _ = body.set_attribute(ATTR_PRODUCTS_OPEN, "true");
        let _ = self.toggle.set_attribute("aria-expanded", "true");
    }

    fn close(&self, body: &web::Element, state: &mut StageState) {
        if !state.menu_open {
            return;
        }
        state.menu_open = false;
        let _ = body.set_attribute(ATTR_PRODUCTS_OPEN, "false");
        let _ = self.toggle.set_attribute("aria-expanded", "false");
        self.panel.set_hidden(true);
    }

    fn contains(&self, node: Option<&web::Node>) -> bool {
        self.panel.contains(node) || self.toggle.contains(node)
    }

    fn holds_focus(&self, document: &web::Document) -> bool {
        document
            .active_element()
            .is_some_and(|el| self.panel.contains(Some(el.as_ref())))
    }
}

/// Clears product focus unless keyboard focus is still inside the menu.
fn leave_products(body: &web::Element, document: &web::Document, menu: Option<&Menu>) {
    if menu.is_some_and(|m| m.holds_focus(document)) {
        return;
    }
    clear_product_focus(body);
}

pub struct StageDriver {
    body: web::Element,
    menu: Option<Menu>,
    state: Rc<RefCell<StageState>>,
    frame_loop: Rc<FrameLoop>,
    subscriptions: Subscriptions,
}

impl StageDriver {
    pub fn mount() -> anyhow::Result<Self> {
        let window = dom::window()?;
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let body: web::Element = dom::body(&document)?.unchecked_into();

        let initial = body
            .get_attribute(ATTR_PROGRESS)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .unwrap_or(0.0);
        let stage_nodes = dom::query_all(&document, STAGE_SELECTOR);
        let state = Rc::new(RefCell::new(StageState {
            smoother: ProgressSmoother::new(initial, dom::scroll_y(&window), dom::now_ms()),
            stages: read_stages(&window, &stage_nodes),
            stage_nodes,
            menu_open: false,
        }));

        let frame_loop = Rc::new(FrameLoop::new({
            let (state, body, w) = (state.clone(), body.clone(), window.clone());
            move |_ts| {
                let Ok(mut st) = state.try_borrow_mut() else {
                    return true;
                };
                let reduced = dom::reduced_motion_query(&w).is_some_and(|m| m.matches());
                let settling = st.smoother.step(reduced);
                write_state(&body, &st.smoother);
                settling
            }
        }));

        let mut driver = Self {
            body,
            menu: Menu::find(&document),
            state,
            frame_loop,
            subscriptions: Subscriptions::new(),
        };
        if let Err(e) = driver.bind(&window, &document) {
            driver.dispose();
            return Err(anyhow::anyhow!("stage listener: {e:?}"));
        }

        if driver.menu.is_some() {
            let _ = driver.body.set_attribute(ATTR_PRODUCTS_OPEN, "false");
        }
        if !driver.body.has_attribute(ATTR_ALGORITHM) {
            let _ = driver.body.set_attribute(ATTR_ALGORITHM, Algorithm::Core.name());
        }
        {
            let mut st = driver.state.borrow_mut();
            st.refresh_target(&window);
            write_state(&driver.body, &st.smoother);
            log::info!(
                "[stage] mounted stages={} products_menu={}",
                st.stages.len(),
                driver.menu.is_some()
            );
        }
        driver.frame_loop.start();
        Ok(driver)
    }

    fn bind(&mut self, window: &web::Window, document: &web::Document) -> Result<(), wasm_bindgen::JsValue> {
        let win: &web::EventTarget = window.as_ref();
        let doc: &web::EventTarget = document.as_ref();

        {
            let (st, lp, w) = (self.state.clone(), self.frame_loop.clone(), window.clone());
            self.subscriptions.listen(win, "scroll", false, move |_| {
                let Ok(mut st) = st.try_borrow_mut() else { return };
                st.smoother.on_scroll(dom::scroll_y(&w), dom::now_ms());
                st.refresh_target(&w);
                lp.start();
            })?;
        }
        {
            let (st, lp, w) = (self.state.clone(), self.frame_loop.clone(), window.clone());
            self.subscriptions.listen(win, "resize", false, move |_| {
                let Ok(mut st) = st.try_borrow_mut() else { return };
                st.reload_stages(&w);
                st.refresh_target(&w);
                lp.start();
            })?;
        }

        for node in dom::query_all(document, PRODUCT_SELECTOR) {
            let target: &web::EventTarget = node.as_ref();
            for kind in ["pointerenter", "focus"] {
                let (body, node) = (self.body.clone(), node.clone());
                self.subscriptions
                    .listen(target, kind, false, move |_| set_product_focus(&body, &node))?;
            }
            {
                let (body, d, menu) = (self.body.clone(), document.clone(), self.menu.clone());
                self.subscriptions.listen(target, "pointerleave", false, move |_| {
                    leave_products(&body, &d, menu.as_ref())
                })?;
            }
            {
                let (body, d, menu) = (self.body.clone(), document.clone(), self.menu.clone());
                self.subscriptions.listen(target, "blur", false, move |_| {
                    // Focus moves after blur; check where it landed on the next task.
                    let (body, d, menu) = (body.clone(), d.clone(), menu.clone());
                    let later = Closure::once_into_js(move || {
                        leave_products(&body, &d, menu.as_ref())
                    });
                    if let Some(w) = web::window() {
                        let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                            later.unchecked_ref(),
                            0,
                        );
                    }
                })?;
            }
        }

        let Some(menu) = self.menu.clone() else {
            return Ok(());
        };
        {
            let (body, d, m) = (self.body.clone(), document.clone(), menu.clone());
            let panel: &web::EventTarget = menu.panel.as_ref();
            self.subscriptions.listen(panel, "pointerleave", false, move |_| {
                leave_products(&body, &d, Some(&m))
            })?;
        }
        {
            let (st, body, m) = (self.state.clone(), self.body.clone(), menu.clone());
            let toggle: &web::EventTarget = menu.toggle.as_ref();
            self.subscriptions.listen(toggle, "click", false, move |_| {
                let Ok(mut st) = st.try_borrow_mut() else { return };
                if st.menu_open {
                    m.close(&body, &mut st);
                    clear_product_focus(&body);
                } else {
                    m.open(&body, &mut st);
                }
            })?;
        }
        {
            let (st, body, m) = (self.state.clone(), self.body.clone(), menu.clone());
            self.subscriptions.listen(doc, "pointerdown", false, move |ev| {
                let Ok(mut st) = st.try_borrow_mut() else { return };
                if !st.menu_open {
                    return;
                }
                let target = ev.target().and_then(|t| t.dyn_into::<web::Node>().ok());
                if m.contains(target.as_ref()) {
                    return;
                }
                m.close(&body, &mut st);
                clear_product_focus(&body);
            })?;
        }
        {
            let (st, body, m) = (self.state.clone(), self.body.clone(), menu);
            self.subscriptions.listen(win, "keydown", false, move |ev| {
                let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() else { return };
                if ev.key() != "Escape" {
                    return;
                }
                let Ok(mut st) = st.try_borrow_mut() else { return };
                m.close(&body, &mut st);
                clear_product_focus(&body);
                let _ = m.toggle.focus();
            })?;
        }
        Ok(())
    }
}

impl Dispose for StageDriver {
    fn dispose(&mut self) {
        self.frame_loop.shutdown();
        self.subscriptions.clear();
        if let (Some(menu), Ok(mut st)) = (self.menu.as_ref(), self.state.try_borrow_mut()) {
            menu.close(&self.body, &mut st);
        }
        clear_product_focus(&self.body);
        log::info!("[stage] disposed");
    }
}
