//! Per-particle force model.
//!
//! Particles are simulated with zero world gravity; this pass supplies a
//! buoyant fall, fluid drag, sway, a soft containment spring and, while the
//! globe is swung, a share of the container's motion. Forces are queued on
//! the backend and consumed by the next step.

use std::f32::consts::PI;

use crate::core::Vec2;
use crate::domain::config::GlobeConfig;
use crate::domain::state::SimulationState;
use crate::rigid_body::PhysicsBackend;

use super::scene::Scene;
use super::shake::is_calm;

/// Counts from one pass, for perf stats and tests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForcePassStats {
    pub awake: u32,
    pub settled: u32,
    pub woken: u32,
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Vertical distance from a point (relative to the globe center) down to the
/// containment circle. Negative once the point is below the glass.
#[inline]
pub fn glass_gap(offset: Vec2, containment: f32) -> f32 {
    let floor = (containment * containment - offset.x * offset.x).max(0.0).sqrt();
    floor - offset.y
}

/// Where a calm particle may come to rest: inside the lower half of the
/// containment disc and within `settle_depth` of the glass beneath it.
#[inline]
pub fn in_settle_band(pos: Vec2, center: Vec2, config: &GlobeConfig) -> bool {
    let offset = pos - center;
    let containment = config.scene.containment_radius;
    offset.y > 0.0
        && offset.length_squared() <= containment * containment
        && glass_gap(offset, containment) <= config.forces.settle_depth
}

pub fn apply_particle_forces<B: PhysicsBackend + ?Sized>(
    state: &SimulationState,
    backend: &mut B,
    scene: &Scene,
    config: &GlobeConfig,
) -> ForcePassStats {
    let f = &config.forces;
    let mult = state.shake.strength;
    let calm = is_calm(mult, &config.shake);
    let t = state.time_seconds();

    let center = backend.position(scene.container);
    let container_velocity = backend.velocity(scene.container);
    let inject = state.drag.is_dragging() && container_velocity.length() > f.inject_threshold;

    let gravity = config.physics.gravity * lerp(f.settle_fall, f.shake_fall, mult);
    let drag_k = lerp(f.rest_drag, f.shake_drag, mult);
    let containment = config.scene.containment_radius;

    let mut stats = ForcePassStats::default();
    let table = &scene.particles;

    for i in 0..table.len() {
        let h = table.handles[i];
        let pos = backend.position(h);
        let vel = backend.velocity(h);
        let offset = pos - center;
        let dist = offset.length();

        if backend.is_sleeping(h) {
            let escaped = dist > containment + f.wake_margin;
            if !(inject || escaped) {
                continue;
            }
            backend.set_sleeping(h, false);
            stats.woken += 1;
        } else if calm && !inject && vel.length() < f.sleep_speed && in_settle_band(pos, center, config) {
            backend.set_velocity(h, Vec2::zero());
            backend.set_angular_velocity(h, 0.0);
            backend.set_sleeping(h, true);
            stats.settled += 1;
            continue;
        }

        stats.awake += 1;
        let m = backend.mass(h);
        let mut force = gravity * m;

        force += (f.ambient_flow - vel) * (m * drag_k);

        if mult > f.sway_threshold {
            let speed = table.sway_speed[i];
            let phase = table.phase[i];
            let arg = pos.y * f.sway_frequency + t * speed + phase + table.depth[i] * PI;
            force.x += m * f.sway_strength * mult * arg.sin();
            force.y += m * f.jitter_strength * mult * (t * speed * 1.7 + phase).cos();
        }

        if dist > containment && dist > 0.0 {
            let inward = offset * (-1.0 / dist);
            force += inward * (m * f.containment_stiffness * (dist - containment));
        }

        backend.apply_force(h, force);

        if inject {
            backend.set_velocity(h, backend.velocity(h) + container_velocity * f.inject_gain);
        }
    }

    stats
}
