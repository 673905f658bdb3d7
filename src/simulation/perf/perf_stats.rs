use wasm_bindgen::prelude::*;

/// Timings and counters for the last tick.
///
/// Only filled in while perf metrics are enabled; otherwise the timings stay
/// at zero and only the counters are kept current.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    pub(super) step_ms: f64,
    pub(super) drag_ms: f64,
    pub(super) forces_ms: f64,
    pub(super) repulsion_ms: f64,
    pub(super) physics_ms: f64,
    pub(super) render_ms: f64,
    pub(super) awake_particles: u32,
    pub(super) sleeping_particles: u32,
    pub(super) settled_this_frame: u32,
    pub(super) woken_this_frame: u32,
    pub(super) repulsion_pairs: u32,
    pub(super) ring_contacts: u32,
    pub(super) particles_drawn: u32,
    pub(super) layers_drawn: u32,
    pub(super) shake: f32,
    pub(super) frame: u32,
}

impl FrameStats {
    pub(crate) fn reset_step(&mut self) {
        let render_ms = self.render_ms;
        let particles_drawn = self.particles_drawn;
        let layers_drawn = self.layers_drawn;
        *self = FrameStats {
            render_ms,
            particles_drawn,
            layers_drawn,
            ..FrameStats::default()
        };
    }
}

#[wasm_bindgen]
impl FrameStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn drag_ms(&self) -> f64 { self.drag_ms }
    #[wasm_bindgen(getter)]
    pub fn forces_ms(&self) -> f64 { self.forces_ms }
    #[wasm_bindgen(getter)]
    pub fn repulsion_ms(&self) -> f64 { self.repulsion_ms }
    #[wasm_bindgen(getter)]
    pub fn physics_ms(&self) -> f64 { self.physics_ms }
    #[wasm_bindgen(getter)]
    pub fn render_ms(&self) -> f64 { self.render_ms }
    #[wasm_bindgen(getter)]
    pub fn awake_particles(&self) -> u32 { self.awake_particles }
    #[wasm_bindgen(getter)]
    pub fn sleeping_particles(&self) -> u32 { self.sleeping_particles }
    #[wasm_bindgen(getter)]
    pub fn settled_this_frame(&self) -> u32 { self.settled_this_frame }
    #[wasm_bindgen(getter)]
    pub fn woken_this_frame(&self) -> u32 { self.woken_this_frame }
    #[wasm_bindgen(getter)]
    pub fn repulsion_pairs(&self) -> u32 { self.repulsion_pairs }
    #[wasm_bindgen(getter)]
    pub fn ring_contacts(&self) -> u32 { self.ring_contacts }
    #[wasm_bindgen(getter)]
    pub fn particles_drawn(&self) -> u32 { self.particles_drawn }
    #[wasm_bindgen(getter)]
    pub fn layers_drawn(&self) -> u32 { self.layers_drawn }
    #[wasm_bindgen(getter)]
    pub fn shake(&self) -> f32 { self.shake }
    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u32 { self.frame }
}
