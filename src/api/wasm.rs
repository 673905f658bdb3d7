use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlCanvasElement;

use crate::domain::assets::AssetManifest;
use crate::domain::config::GlobeConfig;
use crate::simulation::{FrameStats, GlobeCore};

use super::assets::{load_layers, WebShakeCue};
use super::canvas::WebSurface;
use super::input::{self, Listeners};
use super::runtime::{FrameLoop, Runtime, SharedRuntime};

/// A mounted globe: the runtime plus what keeps it alive.
struct Mounted {
    runtime: SharedRuntime,
    // Dropped (listeners removed, frame cancelled) on unmount
    _listeners: Listeners,
    frame: FrameLoop,
}

/// The snow globe widget, bound to one canvas.
#[wasm_bindgen]
pub struct SnowGlobe {
    canvas: HtmlCanvasElement,
    config: GlobeConfig,
    manifest: AssetManifest,
    mounted: Rc<RefCell<Option<Mounted>>>,
    /// Bumped by `unmount` so a mount still waiting on assets gives up
    generation: Rc<Cell<u32>>,
    debug: Rc<Cell<bool>>,
    perf_enabled: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl SnowGlobe {
    /// `config_json` and `manifest_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: &str, manifest_json: &str) -> Result<SnowGlobe, JsValue> {
        let config = GlobeConfig::from_json(config_json)?;
        let manifest = AssetManifest::from_json(manifest_json)?;

        canvas.set_width(config.scene.canvas_width as u32);
        canvas.set_height(config.scene.canvas_height as u32);

        Ok(SnowGlobe {
            canvas,
            config,
            manifest,
            mounted: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
            debug: Rc::new(Cell::new(false)),
            perf_enabled: Rc::new(Cell::new(false)),
        })
    }

    /// Load assets, build the world, attach input and start animating.
    /// Resolves to `true` once running, `false` if unmounted meanwhile.
    pub fn mount(&self) -> Promise {
        if self.is_mounted() {
            return Promise::resolve(&JsValue::TRUE);
        }

        let canvas = self.canvas.clone();
        let config = self.config.clone();
        let manifest = self.manifest.clone();
        let mounted = self.mounted.clone();
        let generation = self.generation.clone();
        let debug = self.debug.clone();
        let perf_enabled = self.perf_enabled.clone();
        let started_in = generation.get();

        future_to_promise(async move {
            let images = load_layers(&manifest).await;
            if generation.get() != started_in || mounted.borrow().is_some() {
                log::info!("mount abandoned");
                return Ok(JsValue::FALSE);
            }

            let surface = WebSurface::new(&canvas, images)?;
            let seed = config.scene.seed.unwrap_or_else(random_seed);
            let mut core = GlobeCore::with_seed(config.clone(), seed);
            core.set_debug(debug.get());
            core.enable_perf_metrics(perf_enabled.get());

            let runtime: SharedRuntime = Rc::new(RefCell::new(Some(Runtime {
                core,
                surface,
                cue: WebShakeCue::new(manifest.shake_audio.as_deref()),
            })));

            let listeners = input::attach(&runtime, &canvas, &config.drag.debug_key)?;
            let frame = FrameLoop::start(runtime.clone())?;

            *mounted.borrow_mut() = Some(Mounted {
                runtime,
                _listeners: listeners,
                frame,
            });
            log::info!("snow globe mounted (seed {:#x})", seed);
            Ok(JsValue::TRUE)
        })
    }

    /// Stop animating, remove listeners and drop the world. Safe to call
    /// at any time, including while `mount` is still loading.
    pub fn unmount(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        let Some(mounted) = self.mounted.borrow_mut().take() else {
            return;
        };
        mounted.frame.cancel();
        let runtime = mounted.runtime.borrow_mut().take();
        if let Some(runtime) = runtime {
            runtime.core.shutdown();
        }
        log::info!("snow globe unmounted");
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.is_mounted()
    }

    /// Whether frames are still being scheduled (false after a failed tick)
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.mounted
            .borrow()
            .as_ref()
            .map(|m| m.frame.is_scheduled())
            .unwrap_or(false)
    }

    pub fn set_debug(&self, on: bool) {
        self.debug.set(on);
        self.with_core(|core| core.set_debug(on));
    }

    pub fn is_debug(&self) -> bool {
        self.with_core(|core| core.is_debug()).unwrap_or_else(|| self.debug.get())
    }

    pub fn enable_perf_metrics(&self, enabled: bool) {
        self.perf_enabled.set(enabled);
        self.with_core(|core| core.enable_perf_metrics(enabled));
    }

    /// Stats for the last frame, or `undefined` when not mounted
    pub fn get_perf_stats(&self) -> Option<FrameStats> {
        self.with_core(|core| core.perf_stats())
    }

    pub fn shake(&self) -> f32 {
        self.with_core(|core| core.shake()).unwrap_or(0.0)
    }
}

impl SnowGlobe {
    fn is_mounted(&self) -> bool {
        self.mounted.borrow().is_some()
    }

    fn with_core<T>(&self, f: impl FnOnce(&mut GlobeCore) -> T) -> Option<T> {
        let mounted = self.mounted.borrow();
        let mounted = mounted.as_ref()?;
        let mut runtime = mounted.runtime.borrow_mut();
        runtime.as_mut().map(|rt| f(&mut rt.core))
    }
}

impl Drop for SnowGlobe {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

