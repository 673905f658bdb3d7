//! Frame loop: one `GlobeCore::tick` per animation frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::core::GlobeError;
use crate::simulation::GlobeCore;

use super::assets::WebShakeCue;
use super::canvas::WebSurface;

/// Everything a running globe owns in the browser.
pub(crate) struct Runtime {
    pub(crate) core: GlobeCore,
    pub(crate) surface: WebSurface,
    pub(crate) cue: WebShakeCue,
}

/// Shared between the frame callback and the input handlers. Browser event
/// dispatch is serialized, so a `RefCell` is enough; `None` once unmounted.
pub(crate) type SharedRuntime = Rc<RefCell<Option<Runtime>>>;

type FrameCallback = Closure<dyn FnMut(f64)>;

fn request_frame(callback: &FrameCallback) -> Result<i32, GlobeError> {
    let window = web_sys::window().ok_or_else(|| GlobeError::Dom("no window".to_string()))?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|e| GlobeError::from_js(&e))
}

/// Handle to a scheduled `requestAnimationFrame` chain.
pub(crate) struct FrameLoop {
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    /// Schedule the first frame. Each frame reschedules itself until the
    /// runtime is gone or a tick fails.
    pub(crate) fn start(runtime: SharedRuntime) -> Result<Self, GlobeError> {
        let pending = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let next = callback.clone();
        let handle = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_timestamp: f64| {
            handle.set(None);

            let keep_going = match runtime.borrow_mut().as_mut() {
                Some(rt) => match rt.core.tick(&mut rt.surface) {
                    Ok(_) => true,
                    Err(e) => {
                        log::error!("animation stopped: {}", e);
                        false
                    }
                },
                None => false,
            };
            if !keep_going {
                return;
            }

            if let Some(cb) = next.borrow().as_ref() {
                match request_frame(cb) {
                    Ok(id) => handle.set(Some(id)),
                    Err(e) => log::error!("could not schedule next frame: {}", e),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        // On error the loop is dropped here, which releases the callback
        let frame_loop = Self { pending, callback };
        let first = {
            let cb = frame_loop.callback.borrow();
            let id = cb.as_ref().map(request_frame);
            id
        };
        frame_loop.pending.set(first.transpose()?);
        Ok(frame_loop)
    }

    pub(crate) fn is_scheduled(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Cancel the pending frame and release the callback.
    pub(crate) fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {:?}", e);
                }
            }
        }
        // Breaks the callback -> self reference cycle
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
