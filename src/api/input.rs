//! Mouse, touch and keyboard wiring.
//!
//! Handlers only record the pointer into the shared runtime; the next frame
//! does the work. Presses are taken on the canvas, moves and releases on the
//! window so a drag keeps going when the cursor leaves the canvas.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent,
    TouchEvent,
};

use crate::core::{GlobeError, Vec2};

use super::runtime::SharedRuntime;

type Handler = Closure<dyn FnMut(Event)>;

/// Registered listeners; removed again on drop.
pub(crate) struct Listeners {
    entries: Vec<(EventTarget, &'static str, Handler)>,
}

impl Listeners {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }

    fn add(&mut self, target: &EventTarget, kind: &'static str, passive: bool, handler: Handler) -> Result<(), GlobeError> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                handler.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| GlobeError::from_js(&e))?;
        self.entries.push((target.clone(), kind, handler));
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn remove_all(&mut self) {
        for (target, kind, handler) in self.entries.drain(..) {
            if let Err(e) = target.remove_event_listener_with_callback(kind, handler.as_ref().unchecked_ref()) {
                log::warn!("could not remove {} listener: {:?}", kind, e);
            }
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.remove_all();
    }
}

/// Map a client-space point onto the canvas backing store, which may be
/// scaled by CSS.
#[allow(clippy::too_many_arguments)]
pub fn client_to_canvas(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
    rect_width: f64,
    rect_height: f64,
    canvas_width: u32,
    canvas_height: u32,
) -> Vec2 {
    let sx = if rect_width > 0.0 { canvas_width as f64 / rect_width } else { 1.0 };
    let sy = if rect_height > 0.0 { canvas_height as f64 / rect_height } else { 1.0 };
    Vec2::new(
        ((client_x - rect_left) * sx) as f32,
        ((client_y - rect_top) * sy) as f32,
    )
}

fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    client_to_canvas(
        client_x,
        client_y,
        rect.left(),
        rect.top(),
        rect.width(),
        rect.height(),
        canvas.width(),
        canvas.height(),
    )
}

fn first_touch(event: &TouchEvent) -> Option<(f64, f64)> {
    let touch = event.touches().get(0).or_else(|| event.changed_touches().get(0))?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

fn press(runtime: &SharedRuntime, canvas: &HtmlCanvasElement, client_x: f64, client_y: f64, time_ms: f64) -> bool {
    let point = canvas_point(canvas, client_x, client_y);
    match runtime.borrow_mut().as_mut() {
        Some(rt) => rt.core.press(point.x, point.y, time_ms),
        None => false,
    }
}

fn move_to(runtime: &SharedRuntime, canvas: &HtmlCanvasElement, client_x: f64, client_y: f64, time_ms: f64) -> bool {
    let point = canvas_point(canvas, client_x, client_y);
    match runtime.borrow_mut().as_mut() {
        Some(rt) if rt.core.is_dragging() => {
            rt.core.move_pointer(point.x, point.y, time_ms, &mut rt.cue);
            true
        }
        _ => false,
    }
}

fn release(runtime: &SharedRuntime) {
    if let Some(rt) = runtime.borrow_mut().as_mut() {
        rt.core.release();
    }
}

/// Attach every listener the globe needs.
pub(crate) fn attach(runtime: &SharedRuntime, canvas: &HtmlCanvasElement, debug_key: &str) -> Result<Listeners, GlobeError> {
    let win = web_sys::window().ok_or_else(|| GlobeError::Dom("no window".to_string()))?;
    let window: &EventTarget = win.as_ref();
    let canvas_target: &EventTarget = canvas.as_ref();
    let mut listeners = Listeners::new();

    // === Mouse ===
    {
        let (rt, cv) = (runtime.clone(), canvas.clone());
        let handler = Closure::wrap(Box::new(move |e: Event| {
            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                press(&rt, &cv, e.client_x() as f64, e.client_y() as f64, e.time_stamp());
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.add(canvas_target, "mousedown", true, handler)?;
    }
    {
        let (rt, cv) = (runtime.clone(), canvas.clone());
        let handler = Closure::wrap(Box::new(move |e: Event| {
            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                move_to(&rt, &cv, e.client_x() as f64, e.client_y() as f64, e.time_stamp());
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.add(window, "mousemove", true, handler)?;
    }
    {
        let rt = runtime.clone();
        let handler = Closure::wrap(Box::new(move |_e: Event| release(&rt)) as Box<dyn FnMut(Event)>);
        listeners.add(window, "mouseup", true, handler)?;
    }

    // === Touch ===
    // Not passive: a grabbed globe must stop the page from scrolling.
    {
        let (rt, cv) = (runtime.clone(), canvas.clone());
        let handler = Closure::wrap(Box::new(move |e: Event| {
            let Some(te) = e.dyn_ref::<TouchEvent>() else { return };
            if let Some((x, y)) = first_touch(te) {
                if press(&rt, &cv, x, y, e.time_stamp()) {
                    e.prevent_default();
                }
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.add(canvas_target, "touchstart", false, handler)?;
    }
    {
        let (rt, cv) = (runtime.clone(), canvas.clone());
        let handler = Closure::wrap(Box::new(move |e: Event| {
            let Some(te) = e.dyn_ref::<TouchEvent>() else { return };
            if let Some((x, y)) = first_touch(te) {
                if move_to(&rt, &cv, x, y, e.time_stamp()) {
                    e.prevent_default();
                }
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.add(window, "touchmove", false, handler)?;
    }
    for kind in ["touchend", "touchcancel"] {
        let rt = runtime.clone();
        let handler = Closure::wrap(Box::new(move |_e: Event| release(&rt)) as Box<dyn FnMut(Event)>);
        listeners.add(window, kind, true, handler)?;
    }

    // === Keyboard ===
    {
        let rt = runtime.clone();
        let key = debug_key.to_string();
        let handler = Closure::wrap(Box::new(move |e: Event| {
            let Some(ke) = e.dyn_ref::<KeyboardEvent>() else { return };
            if ke.repeat() || !ke.key().eq_ignore_ascii_case(&key) {
                return;
            }
            if let Some(rt) = rt.borrow_mut().as_mut() {
                rt.core.toggle_debug();
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.add(window, "keydown", true, handler)?;
    }

    log::debug!("attached {} input listeners", listeners.len());
    Ok(listeners)
}
