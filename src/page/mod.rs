//! DOM runtime for the page controller.
//!
//! Looks up every element once, installs listeners that turn browser events
//! into `UiEvent`s, and applies the `Effect`s the controller hands back. The
//! runtime lives in a thread-local so listeners and the animation loop can
//! reach it without sharing ownership.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window, window,
};

use crate::config::PageConfig;
use crate::controller::{Effect, PageController, UiEvent};
use crate::error::PageError;
use crate::particles::{Bounds, Rng};
use crate::skills::parse_level;

mod render;

/// Attribute naming the preference a toggle input governs.
const TOGGLE_ATTR: &str = "data-toggle";
/// Attribute holding a skill bar's target percentage.
const LEVEL_ATTR: &str = "data-level";
/// Written on each observed skill bar so observer entries map back to an index.
const SKILL_INDEX_ATTR: &str = "data-skill-index";

struct PageRuntime {
    controller: PageController,
    window: Window,
    document: Document,
    body: HtmlElement,
    root: HtmlElement,
    nav_links: Element,
    easter_egg: Element,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    toggles: Vec<(String, HtmlInputElement)>,
    skill_fills: Vec<HtmlElement>,
    observer: Option<IntersectionObserver>,
}

thread_local! {
    static PAGE: RefCell<Option<PageRuntime>> = RefCell::new(None);
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = RefCell::new(None);
}

pub fn start(config: PageConfig) -> Result<(), PageError> {
    if PAGE.with(|cell| cell.borrow().is_some()) {
        log::warn!("page controller already started; ignoring");
        return Ok(());
    }

    let win = window().ok_or(PageError::NoWindow)?;
    let doc = win.document().ok_or(PageError::NoDocument)?;
    let body = doc
        .body()
        .ok_or_else(|| PageError::MissingElement("body".into()))?;
    let root: HtmlElement = doc
        .document_element()
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(|| PageError::MissingElement("html".into()))?;

    let sel = config.selectors.clone();
    let nav_links = require(&doc, &sel.nav_links)?;
    let menu_toggle = require(&doc, &sel.menu_toggle)?;
    let hint_button = require(&doc, &sel.hint_button)?;
    let easter_egg = require(&doc, &sel.easter_egg)?;
    let canvas: HtmlCanvasElement = require(&doc, &sel.canvas)?
        .dyn_into()
        .map_err(|_| PageError::MissingElement(sel.canvas.clone()))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(PageError::NoCanvasContext)?
        .dyn_into()
        .map_err(|_| PageError::NoCanvasContext)?;

    let mut controller = PageController::new(config, Rng::from_entropy());

    // Toggle inputs: seed `checked` from state once.
    let mut toggles = Vec::new();
    for el in query_all(&doc, &sel.toggles)? {
        let Some(key) = el.get_attribute(TOGGLE_ATTR).filter(|k| !k.is_empty()) else {
            log::warn!("toggle without a {TOGGLE_ATTR} key; skipping");
            continue;
        };
        let Ok(input) = el.dyn_into::<HtmlInputElement>() else {
            log::warn!("toggle '{key}' is not an <input>; skipping");
            continue;
        };
        input.set_checked(controller.preferences().get(&key));
        toggles.push((key, input));
    }

    // Skill bars with a readable level get an index; the rest are left alone.
    let mut skill_fills = Vec::new();
    for el in query_all(&doc, &sel.skill_fills)? {
        let Some(level) = parse_level(el.get_attribute(LEVEL_ATTR).as_deref()) else {
            log::warn!("skill bar with malformed {LEVEL_ATTR}; not observing");
            continue;
        };
        let Ok(fill) = el.dyn_into::<HtmlElement>() else {
            continue;
        };
        let index = controller.register_skill(level);
        fill.set_attribute(SKILL_INDEX_ATTR, &index.to_string())?;
        skill_fills.push(fill);
    }

    log::info!(
        "page controller ready: {} toggles, {} skill bars",
        toggles.len(),
        skill_fills.len()
    );

    let threshold = controller.config().reveal_threshold;
    let observer = if skill_fills.is_empty() {
        None
    } else {
        Some(observe_skills(&skill_fills, threshold)?)
    };

    install_listeners(&win, &doc, &toggles, &menu_toggle, &hint_button)?;

    FRAME_CALLBACK.with(|slot| {
        *slot.borrow_mut() = Some(Closure::wrap(
            Box::new(|_ts: f64| particle_frame()) as Box<dyn FnMut(f64)>
        ));
    });

    let viewport = viewport(&win);
    PAGE.with(|cell| {
        cell.replace(Some(PageRuntime {
            controller,
            window: win,
            document: doc,
            body,
            root,
            nav_links,
            easter_egg,
            canvas,
            ctx,
            toggles,
            skill_fills,
            observer,
        }))
    });

    try_dispatch(UiEvent::Boot { viewport })
}

/// Rewrite every visual from the current preference snapshot.
pub fn sync_ui_from_state() -> Result<(), PageError> {
    with_page(|page| page.apply(Effect::SyncVisuals(page.controller.visuals())))
}

#[cfg(feature = "serde_json")]
pub fn preferences_json() -> Result<String, PageError> {
    with_page(|page| {
        serde_json::to_string(page.controller.preferences())
            .map_err(|e| PageError::Js(e.to_string()))
    })
}

/// Feed one event through the controller and apply its effects.
pub fn try_dispatch(event: UiEvent) -> Result<(), PageError> {
    let effects = PAGE.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map(|page| page.controller.handle(event))
            .ok_or(PageError::NotStarted)
    })?;
    for effect in effects {
        match effect {
            // Frames borrow the runtime themselves; run outside `with_page`.
            Effect::BeginParticleLoop => particle_frame(),
            other => with_page(|page| page.apply(other))?,
        }
    }
    Ok(())
}

fn dispatch(event: UiEvent) {
    if let Err(e) = try_dispatch(event) {
        log::error!("event handling failed: {e}");
    }
}

fn with_page<T>(f: impl FnOnce(&PageRuntime) -> Result<T, PageError>) -> Result<T, PageError> {
    PAGE.with(|cell| {
        let guard = cell.borrow();
        let page = guard.as_ref().ok_or(PageError::NotStarted)?;
        f(page)
    })
}

impl PageRuntime {
    fn apply(&self, effect: Effect) -> Result<(), PageError> {
        match effect {
            Effect::SyncVisuals(visuals) => render::apply_visuals(
                &self.document,
                &self.body,
                &self.root,
                &visuals,
                &self.controller.config().selectors.glass_panels,
            ),
            Effect::SetToggleChecked { key, checked } => {
                for (k, input) in &self.toggles {
                    if *k == key {
                        input.set_checked(checked);
                    }
                }
                Ok(())
            }
            Effect::SetNavOpen(open) => {
                self.nav_links.class_list().toggle_with_force("open", open)?;
                Ok(())
            }
            Effect::RevealSkill { index, width } => {
                let Some(fill) = self.skill_fills.get(index) else {
                    return Ok(());
                };
                fill.style().set_property("width", &width)?;
                if let Some(observer) = &self.observer {
                    observer.unobserve(fill);
                }
                Ok(())
            }
            Effect::ShowToast => Ok(self.easter_egg.class_list().add_1("show")?),
            Effect::HideToast => Ok(self.easter_egg.class_list().remove_1("show")?),
            Effect::ScheduleToastHide { delay_ms } => {
                let hide = Closure::once_into_js(move || dispatch(UiEvent::ToastExpired));
                self.window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        hide.unchecked_ref(),
                        timeout_ms(delay_ms),
                    )?;
                Ok(())
            }
            Effect::Alert(text) => Ok(self.window.alert_with_message(&text)?),
            Effect::ResizeCanvas { width, height } => {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                Ok(())
            }
            Effect::StopParticles { cancel } => {
                if let Some(handle) = cancel {
                    self.window.cancel_animation_frame(handle)?;
                }
                render::clear(&self.ctx, &self.canvas);
                Ok(())
            }
            // driven by `particle_frame`
            Effect::BeginParticleLoop => Ok(()),
        }
    }
}

// --- Listeners ---------------------------------------------------------------

fn install_listeners(
    win: &Window,
    doc: &Document,
    toggles: &[(String, HtmlInputElement)],
    menu_toggle: &Element,
    hint_button: &Element,
) -> Result<(), PageError> {
    for (key, input) in toggles {
        let key = key.clone();
        let source = input.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            dispatch(UiEvent::ToggleChanged {
                key: key.clone(),
                checked: source.checked(),
            });
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            dispatch(UiEvent::MenuClicked);
        }) as Box<dyn FnMut(_)>);
        menu_toggle.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            dispatch(UiEvent::HintRequested);
        }) as Box<dyn FnMut(_)>);
        hint_button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            dispatch(UiEvent::KeyPressed { key: evt.key() });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let resize_win = win.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            dispatch(UiEvent::Resized {
                viewport: viewport(&resize_win),
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn observe_skills(
    fills: &[HtmlElement],
    threshold: f64,
) -> Result<IntersectionObserver, PageError> {
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let index = entry
                    .target()
                    .get_attribute(SKILL_INDEX_ATTR)
                    .and_then(|v| v.parse::<usize>().ok());
                if let Some(index) = index {
                    dispatch(UiEvent::SkillVisibility {
                        index,
                        ratio: entry.intersection_ratio(),
                    });
                }
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    for fill in fills {
        observer.observe(fill);
    }
    Ok(observer)
}

// --- Particle loop -----------------------------------------------------------

/// One animation frame: advance, draw, and reschedule while enabled.
fn particle_frame() {
    let next = PAGE.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(page) = guard.as_mut() else {
            return false;
        };
        let rgb = page.controller.config().particle_rgb;
        let frame = page.controller.particle_frame();
        if frame.particles.is_empty() {
            return frame.schedule_next;
        }
        if let Err(e) = render::draw_frame(&page.ctx, &frame, rgb) {
            log::warn!("particle frame failed to draw: {e}");
        }
        frame.schedule_next
    });
    if next {
        schedule_particle_frame();
    }
}

fn schedule_particle_frame() {
    let handle = FRAME_CALLBACK.with(|slot| {
        let slot = slot.borrow();
        let callback = slot.as_ref()?;
        window()?
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    });
    match handle {
        Some(handle) => PAGE.with(|cell| {
            if let Some(page) = cell.borrow_mut().as_mut() {
                page.controller.frame_requested(handle);
            }
        }),
        None => log::warn!("requestAnimationFrame unavailable; particle loop halted"),
    }
}

// --- DOM helpers -------------------------------------------------------------

fn require(doc: &Document, selector: &str) -> Result<Element, PageError> {
    doc.query_selector(selector)?
        .ok_or_else(|| PageError::MissingElement(selector.to_string()))
}

fn query_all(doc: &Document, selector: &str) -> Result<Vec<Element>, PageError> {
    let list = doc.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// `setTimeout` takes an `i32`; longer delays saturate instead of wrapping.
fn timeout_ms(delay_ms: u32) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

fn viewport(win: &Window) -> Bounds {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Bounds {
        width: dim(win.inner_width()),
        height: dim(win.inner_height()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_delay_saturates_instead_of_wrapping() {
        assert_eq!(timeout_ms(2800), 2800);
        assert_eq!(timeout_ms(3_000_000_000), i32::MAX);
        assert_eq!(timeout_ms(u32::MAX), i32::MAX);
    }
}
