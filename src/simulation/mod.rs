//! GlobeCore - the headless snow globe.
//!
//! Owns the physics backend, the scene and the simulation state, and runs
//! the systems in frame order. No DOM access happens here: the browser
//! runtime in `api/` feeds it pointer events and a `Surface` to draw on.

use crate::core::{GlobeError, Vec2};
use crate::domain::config::GlobeConfig;
use crate::domain::state::SimulationState;
use crate::render::{self, RenderStats, Surface};
use crate::rigid_body::PhysicsBackend;
use crate::rigid_body_system::ImpulseWorld;
use crate::systems::drag::{self, ShakeCue};
use crate::systems::scene::Scene;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "step/step.rs"]
mod step;

pub use perf_stats::FrameStats;

use perf_timer::PerfTimer;

/// Seed used when the config doesn't pin one and the host doesn't supply one
pub const DEFAULT_SEED: u64 = 0x5eed_9106;

pub struct GlobeCore<B: PhysicsBackend = ImpulseWorld> {
    config: GlobeConfig,
    backend: B,
    scene: Scene,
    state: SimulationState,

    // Perf metrics
    perf_enabled: bool,
    stats: FrameStats,
}

impl GlobeCore<ImpulseWorld> {
    /// Build a globe on the bundled impulse solver.
    pub fn new(config: GlobeConfig) -> Self {
        let seed = config.scene.seed.unwrap_or(DEFAULT_SEED);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: GlobeConfig, seed: u64) -> Self {
        let backend = ImpulseWorld::new(config.physics.clone());
        Self::with_backend(config, backend, seed)
    }

    pub fn from_json(config_json: &str) -> Result<Self, GlobeError> {
        Ok(Self::new(GlobeConfig::from_json(config_json)?))
    }
}

impl<B: PhysicsBackend> GlobeCore<B> {
    /// Build the scene into an empty `backend`.
    pub fn with_backend(config: GlobeConfig, backend: B, seed: u64) -> Self {
        init::create_globe_core(config, backend, seed)
    }

    pub fn config(&self) -> &GlobeConfig { &self.config }

    pub fn state(&self) -> &SimulationState { &self.state }

    pub fn scene(&self) -> &Scene { &self.scene }

    pub fn backend(&self) -> &B { &self.backend }

    pub fn frame(&self) -> u64 { self.state.frame }

    pub fn shake(&self) -> f32 { self.state.shake.strength }

    pub fn is_dragging(&self) -> bool { self.state.drag.is_dragging() }

    pub fn is_debug(&self) -> bool { self.state.debug }

    pub fn container_position(&self) -> Vec2 {
        self.backend.position(self.scene.container)
    }

    pub fn particle_positions(&self) -> Vec<Vec2> {
        self.scene
            .particles
            .handles
            .iter()
            .map(|&h| self.backend.position(h))
            .collect()
    }

    pub fn sleeping_count(&self) -> usize {
        self.scene
            .particles
            .handles
            .iter()
            .filter(|&&h| self.backend.is_sleeping(h))
            .count()
    }

    // === Input ===

    /// Pointer down at canvas coordinates. Returns whether the globe was grabbed.
    pub fn press(&mut self, x: f32, y: f32, time_ms: f64) -> bool {
        let grabbed = drag::press(
            &mut self.state,
            &mut self.backend,
            &self.scene,
            &self.config,
            Vec2::new(x, y),
            time_ms,
        );
        if grabbed {
            log::debug!("globe grabbed at ({:.0}, {:.0})", x, y);
        }
        grabbed
    }

    /// Pointer move. Returns the cursor speed in px/ms.
    pub fn move_pointer<C: ShakeCue + ?Sized>(&mut self, x: f32, y: f32, time_ms: f64, cue: &mut C) -> f32 {
        drag::move_to(&mut self.state, &self.config, Vec2::new(x, y), time_ms, cue)
    }

    pub fn release(&mut self) {
        drag::release(&mut self.state, &mut self.backend, &self.scene, &self.config);
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.set_debug(!self.state.debug);
        self.state.debug
    }

    pub fn set_debug(&mut self, on: bool) {
        if self.state.debug != on {
            log::info!("debug drawing {}", if on { "on" } else { "off" });
        }
        self.state.debug = on;
    }

    // === Frame ===

    /// Advance the simulation by one fixed step (frame steps 1 to 6).
    pub fn step(&mut self) -> Result<(), GlobeError> {
        step::step(self)
    }

    /// Draw the current state (frame step 7).
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> RenderStats {
        let t0 = self.perf_enabled.then(PerfTimer::start);
        let stats = render::render_frame(surface, &self.backend, &self.scene, &self.state, &self.config);
        if let Some(t) = t0 {
            self.stats.render_ms = t.elapsed_ms();
        }
        self.stats.particles_drawn = stats.particles_drawn;
        self.stats.layers_drawn = stats.layers_drawn;
        stats
    }

    /// One full frame. Nothing is drawn when the step fails.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<RenderStats, GlobeError> {
        self.step()?;
        Ok(self.render(surface))
    }

    // === Perf ===

    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.stats = FrameStats::default();
        }
    }

    pub fn perf_stats(&self) -> FrameStats {
        self.stats.clone()
    }

    // === Teardown ===

    /// Remove every body from the backend and hand it back empty, ready for
    /// another `with_backend`.
    pub fn shutdown(mut self) -> B {
        let bodies = self.backend.body_count();
        self.backend.clear();
        log::debug!("globe core shut down ({} bodies released)", bodies);
        self.backend
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
