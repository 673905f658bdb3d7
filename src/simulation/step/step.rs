use crate::core::GlobeError;
use crate::rigid_body::PhysicsBackend;
use crate::systems::scene::reposition_ring;
use crate::systems::{drag, forces, repulsion, shake};

use super::{GlobeCore, PerfTimer};

/// One fixed step, strictly in order: drag, shake, forces, repulsion,
/// physics, ring. The clock only advances when the physics step succeeds.
pub(super) fn step<B: PhysicsBackend>(core: &mut GlobeCore<B>) -> Result<(), GlobeError> {
    let perf_on = core.perf_enabled;
    core.stats.reset_step();
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };

    // === DRAG + SHAKE ===
    let t0 = perf_on.then(PerfTimer::start);
    drag::apply_drag(&core.state, &mut core.backend, &core.scene, &core.config);
    let container_speed = core.backend.velocity(core.scene.container).length();
    let mult = shake::update_shake(&mut core.state, container_speed, &core.config.shake);
    if let Some(t) = t0 {
        core.stats.drag_ms = t.elapsed_ms();
    }

    // === PARTICLE FORCES ===
    let t0 = perf_on.then(PerfTimer::start);
    let pass = forces::apply_particle_forces(&core.state, &mut core.backend, &core.scene, &core.config);
    if let Some(t) = t0 {
        core.stats.forces_ms = t.elapsed_ms();
    }

    // === REPULSION ===
    let t0 = perf_on.then(PerfTimer::start);
    let pairs = repulsion::apply_repulsion(&mut core.backend, &core.scene, mult, &core.config.repulsion);
    if let Some(t) = t0 {
        core.stats.repulsion_ms = t.elapsed_ms();
    }

    // === PHYSICS ===
    let t0 = perf_on.then(PerfTimer::start);
    core.backend.step()?;
    if let Some(t) = t0 {
        core.stats.physics_ms = t.elapsed_ms();
    }

    // The ring is static, so it is moved after the step to wherever the
    // container ended up.
    reposition_ring(&mut core.backend, &core.scene, core.config.scene.ring_radius);

    core.state.advance_clock();

    let container = core.scene.container;
    let stats = &mut core.stats;
    stats.settled_this_frame = pass.settled;
    stats.woken_this_frame = pass.woken;
    stats.repulsion_pairs = pairs;
    stats.ring_contacts = core
        .backend
        .contacts()
        .iter()
        .filter(|c| c.a != container && c.b != container)
        .count() as u32;
    let sleeping = core
        .scene
        .particles
        .handles
        .iter()
        .filter(|&&h| core.backend.is_sleeping(h))
        .count() as u32;
    stats.sleeping_particles = sleeping;
    stats.awake_particles = core.scene.particles.len() as u32 - sleeping;
    stats.shake = mult;
    stats.frame = core.state.frame as u32;

    if let Some(t) = step_start {
        stats.step_ms = t.elapsed_ms();
    }
    Ok(())
}
