// DOM / canvas writes for visuals and particle frames.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::controller::Frame;
use crate::error::PageError;
use crate::prefs::{ANIM_DURATION_PROPERTY, Visuals};

pub(super) fn apply_visuals(
    document: &Document,
    body: &HtmlElement,
    root: &HtmlElement,
    visuals: &Visuals,
    panel_selector: &str,
) -> Result<(), PageError> {
    let classes = body.class_list();
    for (class, present) in visuals.body_classes() {
        classes.toggle_with_force(class, present)?;
    }

    let panels = document.query_selector_all(panel_selector)?;
    for i in 0..panels.length() {
        let Some(panel) = panels.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let style = panel.style();
        style.set_property("backdrop-filter", &visuals.panel.backdrop_filter)?;
        style.set_property("-webkit-backdrop-filter", &visuals.panel.backdrop_filter)?;
        style.set_property("background", &visuals.panel.background)?;
    }

    root.style()
        .set_property(ANIM_DURATION_PROPERTY, &visuals.anim_duration)?;
    Ok(())
}

pub(super) fn clear(ctx: &CanvasRenderingContext2d, canvas: &HtmlCanvasElement) {
    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
}

pub(super) fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    frame: &Frame<'_>,
    rgb: [u8; 3],
) -> Result<(), PageError> {
    ctx.clear_rect(0.0, 0.0, frame.bounds.width, frame.bounds.height);
    for p in frame.particles {
        ctx.begin_path();
        ctx.set_fill_style_str(&rgba(rgb, p.alpha));
        ctx.arc(p.x, p.y, p.radius, 0.0, std::f64::consts::TAU)?;
        ctx.fill();
    }
    Ok(())
}

fn rgba([r, g, b]: [u8; 3], alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {alpha})")
}
